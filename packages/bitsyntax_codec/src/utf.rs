//! UTF-8/16/32 encode/decode routines.

use crate::error::CodecError;
use crate::integer::{Endianness, decode_unsigned, encode_unsigned};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Highest codepoint below the surrogate range.
const MAX_LOW_SCALAR: u32 = 0xD7FF;
/// Lowest codepoint above the surrogate range.
const MIN_HIGH_SCALAR: u32 = 0xE000;
/// Highest valid Unicode scalar value.
const MAX_SCALAR: u32 = 0x10_FFFF;

fn validate_codepoint(codepoint: u32) -> Result<(), CodecError> {
	if codepoint <= MAX_LOW_SCALAR || (MIN_HIGH_SCALAR..=MAX_SCALAR).contains(&codepoint) {
		Ok(())
	} else {
		Err(CodecError::InvalidUnicodeCodepoint(codepoint))
	}
}

/// Encodes `codepoint` as 1-4 UTF-8 bytes.
pub fn encode_utf8(writer: &mut BitWriter, codepoint: u32) -> Result<(), CodecError> {
	validate_codepoint(codepoint)?;

	let ch =
		char::from_u32(codepoint).ok_or(CodecError::InvalidUnicodeCodepoint(codepoint))?;
	let mut buf = [0u8; 4];
	let encoded = ch.encode_utf8(&mut buf);

	writer.append_bytes(encoded.as_bytes());
	Ok(())
}

/// Decodes the minimal valid UTF-8 sequence starting at `offset`, returning the
/// codepoint and the number of bits consumed.
pub fn decode_utf8(reader: &BitReader, offset: usize) -> Result<(u32, usize), CodecError> {
	let leading = reader.read_bits(offset, 8)? as u8;

	let (len, initial_bits, min_codepoint) = if leading & 0x80 == 0 {
		(1usize, (leading & 0x7F) as u32, 0u32)
	} else if leading & 0xE0 == 0xC0 {
		(2, (leading & 0x1F) as u32, 0x80)
	} else if leading & 0xF0 == 0xE0 {
		(3, (leading & 0x0F) as u32, 0x800)
	} else if leading & 0xF8 == 0xF0 {
		(4, (leading & 0x07) as u32, 0x1_0000)
	} else {
		return Err(CodecError::InvalidUtf("invalid UTF-8 leading byte"));
	};

	let mut codepoint = initial_bits;
	for i in 1..len {
		let continuation = reader.read_bits(offset + i * 8, 8)? as u8;

		if continuation & 0xC0 != 0x80 {
			return Err(CodecError::InvalidUtf("invalid UTF-8 continuation byte"));
		}

		codepoint = (codepoint << 6) | (continuation & 0x3F) as u32;
	}

	if codepoint < min_codepoint {
		return Err(CodecError::InvalidUtf("overlong UTF-8 encoding"));
	}

	validate_codepoint(codepoint)?;
	Ok((codepoint, len * 8))
}

/// Encodes `codepoint` as one 16-bit code unit, or a surrogate pair if it lies
/// beyond the Basic Multilingual Plane.
pub fn encode_utf16(writer: &mut BitWriter, codepoint: u32, endianness: Endianness) -> Result<(), CodecError> {
	validate_codepoint(codepoint)?;

	if codepoint <= 0xFFFF {
		encode_unsigned(writer, codepoint as u64, 16, endianness);
		return Ok(());
	}

	let v = codepoint - 0x1_0000;
	let high = 0xD800 + (v >> 10);
	let low = 0xDC00 + (v & 0x3FF);

	encode_unsigned(writer, high as u64, 16, endianness);
	encode_unsigned(writer, low as u64, 16, endianness);
	Ok(())
}

/// Decodes one UTF-16 code unit, or a surrogate pair, starting at `offset`.
pub fn decode_utf16(reader: &BitReader, offset: usize, endianness: Endianness) -> Result<(u32, usize), CodecError> {
	let first = decode_unsigned(reader, offset, 16, endianness)? as u32;

	if (0xD800..=0xDBFF).contains(&first) {
		let second = decode_unsigned(reader, offset + 16, 16, endianness)? as u32;

		if !(0xDC00..=0xDFFF).contains(&second) {
			return Err(CodecError::InvalidUtf("high surrogate not followed by a low surrogate"));
		}

		let codepoint = 0x1_0000 + ((first - 0xD800) << 10) + (second - 0xDC00);
		validate_codepoint(codepoint)?;
		return Ok((codepoint, 32));
	}

	if (0xDC00..=0xDFFF).contains(&first) {
		return Err(CodecError::InvalidUtf("orphaned low surrogate"));
	}

	validate_codepoint(first)?;
	Ok((first, 16))
}

/// Encodes `codepoint` as a single 32-bit word.
pub fn encode_utf32(writer: &mut BitWriter, codepoint: u32, endianness: Endianness) -> Result<(), CodecError> {
	validate_codepoint(codepoint)?;
	encode_unsigned(writer, codepoint as u64, 32, endianness);
	Ok(())
}

/// Decodes a single 32-bit UTF-32 word starting at `offset`.
pub fn decode_utf32(reader: &BitReader, offset: usize, endianness: Endianness) -> Result<(u32, usize), CodecError> {
	let codepoint = decode_unsigned(reader, offset, 32, endianness)? as u32;
	validate_codepoint(codepoint)?;
	Ok((codepoint, 32))
}
