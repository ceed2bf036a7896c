//! Integer encode/decode routines.
//!
//! Values are always truncated (for unsigned) or reduced modulo `2^width`
//! (for signed, via two's-complement masking) before being packed; this is
//! deliberate, silent behavior, not an error condition.

use crate::error::CodecError;
use crate::reader::BitReader;
use crate::writer::{BitWriter, ones_mask};

/// Byte order used to interpret multi-byte integer and float fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
	Big,
	Little,
	/// Resolved to [`Endianness::Big`] or [`Endianness::Little`] per the host's
	/// byte order at the point of use.
	Native
}

impl Endianness {
	/// Resolves [`Endianness::Native`] to the concrete order of the host platform.
	pub const fn resolve(self) -> Self {
		match self {
			Self::Native if cfg!(target_endian = "big") => Self::Big,
			Self::Native => Self::Little,
			other => other
		}
	}
}

/// Appends the `width` (`<= 64`) least significant bits of `value`, honoring
/// `endianness`. `value` is expected to already be masked to `width` bits by
/// the caller (see [`truncate_unsigned`]/[`truncate_signed`]).
fn append_with_endianness(writer: &mut BitWriter, value: u64, width: u8, endianness: Endianness) {
	if width == 0 {
		return;
	}

	match endianness.resolve() {
		Endianness::Big => writer.append_bits(value, width),
		Endianness::Little => {
			let byte_count = width.div_ceil(8);
			let full_byte_bits = (byte_count - 1) * 8;
			let partial_bits = width - full_byte_bits;

			for i in 0..(byte_count - 1) {
				let byte = (value >> (8 * i)) & 0xFF;
				writer.append_bits(byte, 8);
			}

			let top = (value >> full_byte_bits) & ones_mask(partial_bits);
			writer.append_bits(top, partial_bits);
		}
		Endianness::Native => unreachable!("resolve() never returns Native")
	}
}

/// Inverse of [`append_with_endianness`].
fn read_with_endianness(
	reader: &BitReader,
	offset: usize,
	width: u8,
	endianness: Endianness
) -> Result<u64, CodecError> {
	if width == 0 {
		return Ok(0);
	}

	match endianness.resolve() {
		Endianness::Big => reader.read_bits(offset, width),
		Endianness::Little => {
			let byte_count = width.div_ceil(8);
			let full_byte_bits = (byte_count - 1) * 8;
			let partial_bits = width - full_byte_bits;

			let mut value = 0u64;
			for i in 0..(byte_count - 1) {
				let byte = reader.read_bits(offset + 8 * i as usize, 8)?;
				value |= byte << (8 * i);
			}

			let top = reader.read_bits(offset + full_byte_bits as usize, partial_bits)?;
			value |= top << full_byte_bits;

			Ok(value)
		}
		Endianness::Native => unreachable!("resolve() never returns Native")
	}
}

/// Truncates `value` to its low `width` bits, per the mandatory modulo-`2^width`
/// encode rule.
pub fn truncate_unsigned(value: u64, width: u8) -> u64 {
	value & ones_mask(width)
}

/// Reduces a signed `value` modulo `2^width`, keeping its two's-complement bit
/// pattern (e.g., -129 at width 8 keeps the low 8 bits of its two's-complement
/// representation, numerically 127).
pub fn truncate_signed(value: i64, width: u8) -> u64 {
	(value as u64) & ones_mask(width)
}

/// Encodes an unsigned integer of the given effective bit width.
pub fn encode_unsigned(writer: &mut BitWriter, value: u64, width: u8, endianness: Endianness) {
	append_with_endianness(writer, truncate_unsigned(value, width), width, endianness);
}

/// Encodes a signed integer of the given effective bit width, in two's complement.
pub fn encode_signed(writer: &mut BitWriter, value: i64, width: u8, endianness: Endianness) {
	append_with_endianness(writer, truncate_signed(value, width), width, endianness);
}

/// Decodes an unsigned integer of the given effective bit width starting at `offset`.
pub fn decode_unsigned(
	reader: &BitReader,
	offset: usize,
	width: u8,
	endianness: Endianness
) -> Result<u64, CodecError> {
	read_with_endianness(reader, offset, width, endianness)
}

/// Decodes a signed, two's-complement integer of the given effective bit width,
/// sign-extending from bit `width - 1`.
pub fn decode_signed(
	reader: &BitReader,
	offset: usize,
	width: u8,
	endianness: Endianness
) -> Result<i64, CodecError> {
	let raw = read_with_endianness(reader, offset, width, endianness)?;

	if width == 0 || width == 64 {
		return Ok(raw as i64);
	}

	let shift = 64 - width;
	Ok(((raw << shift) as i64) >> shift)
}
