//! Binary, nested bitstring and "rest" codec routines.

use crate::bitstring::BitString;
use crate::error::CodecError;
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// `size * unit`, the effective bit width a segment occupies.
fn effective_bits(size: usize, unit: u16) -> usize {
	size * unit as usize
}

/// Encodes `value` as a Binary segment. When `size_specified`, `size * unit`
/// must equal `value`'s byte length exactly, in whole bytes.
pub fn encode_binary(
	writer: &mut BitWriter,
	value: &[u8],
	size_specified: bool,
	size: usize,
	unit: u16
) -> Result<(), CodecError> {
	if size_specified {
		let bits = effective_bits(size, unit);
		let expected_bytes = bits / 8;

		if bits % 8 != 0 || expected_bytes != value.len() {
			return Err(CodecError::BinarySizeMismatch {
				declared: expected_bytes,
				actual: value.len()
			});
		}
	}

	writer.append_bytes(value);
	Ok(())
}

/// Decodes a Binary segment starting at `offset`. When `size_specified` is
/// false (or `size` is 0), all remaining whole bytes are consumed; otherwise
/// exactly `size * unit` bits are consumed and packed MSB-first into bytes.
pub fn decode_binary(
	reader: &BitReader,
	offset: usize,
	size_specified: bool,
	size: usize,
	unit: u16
) -> Result<(Vec<u8>, usize), CodecError> {
	let bits = if size_specified && size > 0 {
		effective_bits(size, unit)
	} else {
		let remaining = reader.len().saturating_sub(offset);
		(remaining / 8) * 8
	};

	let bytes = reader.slice(offset, bits)?.to_bytes();
	Ok((bytes, bits))
}

/// Encodes `value` as a nested Bitstring segment, appending its bits verbatim.
/// When `size_specified`, `size * unit` must equal `value`'s exact bit length.
pub fn encode_bitstring(
	writer: &mut BitWriter,
	value: &BitString,
	size_specified: bool,
	size: usize,
	unit: u16
) -> Result<(), CodecError> {
	if size_specified {
		let bits = effective_bits(size, unit);

		if bits != value.length() {
			return Err(CodecError::SizeMismatch {
				declared: bits,
				actual: value.length()
			});
		}
	}

	writer.append_bitstring(value);
	Ok(())
}

/// Decodes a nested Bitstring segment starting at `offset`, consuming
/// `size * unit` bits when specified, or the entire remainder otherwise.
pub fn decode_bitstring(
	reader: &BitReader,
	offset: usize,
	size_specified: bool,
	size: usize,
	unit: u16
) -> Result<(BitString, usize), CodecError> {
	let bits = if size_specified {
		effective_bits(size, unit)
	} else {
		reader.len().saturating_sub(offset)
	};

	let slice = reader.slice(offset, bits)?;
	Ok((slice, bits))
}

/// Decodes a `RestBinary` segment: the entire remainder, packed into bytes.
///
/// Byte-alignment of the remainder is a segment-engine precondition, not
/// something this pure codec routine enforces; a caller that doesn't check
/// first only gets the remainder truncated to its last whole byte.
pub fn decode_rest_binary(reader: &BitReader, offset: usize) -> Result<(Vec<u8>, usize), CodecError> {
	let remaining = (reader.len().saturating_sub(offset) / 8) * 8;
	let bytes = reader.slice(offset, remaining)?.to_bytes();
	Ok((bytes, remaining))
}

/// Decodes a `RestBitstring` segment: the entire remainder, of any bit length.
pub fn decode_rest_bitstring(reader: &BitReader, offset: usize) -> Result<(BitString, usize), CodecError> {
	let remaining = reader.len().saturating_sub(offset);
	let slice = reader.slice(offset, remaining)?;
	Ok((slice, remaining))
}
