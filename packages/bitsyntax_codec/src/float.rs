//! IEEE-754 float encode/decode routines.
//!
//! Floats of any supported width are byte-aligned in the stream; callers
//! (the higher-level segment engine) are expected to check alignment and
//! report [`CodecError::NonAlignedFloat`] before reaching these functions,
//! but the checks are duplicated here defensively since this crate has no
//! other caller to rely on.

use crate::error::CodecError;
use crate::integer::{Endianness, decode_unsigned, encode_unsigned};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Encodes `value` as a 16/32/64-bit IEEE-754 float (16-bit uses IEEE-754
/// half-precision). `width` must be one of `{16, 32, 64}`; the validator is
/// responsible for enforcing that before calling this function.
pub fn encode_float(writer: &mut BitWriter, value: f64, width: u8, endianness: Endianness) -> Result<(), CodecError> {
	require_aligned(writer.bit_len() as u64)?;

	let bits = match width {
		16 => f64_to_f16_bits(value) as u64,
		32 => (value as f32).to_bits() as u64,
		64 => value.to_bits(),
		_ => unreachable!("float width must be 16, 32 or 64; the validator enforces this")
	};

	encode_unsigned(writer, bits, width, endianness);
	Ok(())
}

/// Decodes a 16/32/64-bit IEEE-754 float starting at `offset`, widening to `f64`.
pub fn decode_float(reader: &BitReader, offset: usize, width: u8, endianness: Endianness) -> Result<f64, CodecError> {
	require_aligned(offset as u64)?;

	let bits = decode_unsigned(reader, offset, width, endianness)?;

	Ok(match width {
		16 => f16_bits_to_f64(bits as u16),
		32 => f32::from_bits(bits as u32) as f64,
		64 => f64::from_bits(bits),
		_ => unreachable!("float width must be 16, 32 or 64; the validator enforces this")
	})
}

fn require_aligned(bit_position: u64) -> Result<(), CodecError> {
	let misalignment = (bit_position % 8) as u8;

	if misalignment != 0 {
		return Err(CodecError::NonAlignedFloat(misalignment));
	}

	Ok(())
}

/// Converts a double-precision float to IEEE-754 half-precision bits, rounding
/// the intermediate single-precision mantissa to half using round-half-to-even.
fn f64_to_f16_bits(value: f64) -> u16 {
	f32_to_f16_bits(value as f32)
}

fn f32_to_f16_bits(value: f32) -> u16 {
	let bits = value.to_bits();
	let sign = ((bits >> 16) & 0x8000) as u16;
	let exp = ((bits >> 23) & 0xFF) as i32;
	let mantissa = bits & 0x007F_FFFF;

	if exp == 0xFF {
		return if mantissa == 0 {
			sign | 0x7C00 // infinity
		} else {
			// NaN: keep the top mantissa bits, but guarantee a non-zero mantissa
			sign | 0x7C00 | 0x0200 | ((mantissa >> 13) as u16)
		};
	}

	let half_exp = exp - 127 + 15;

	if half_exp >= 0x1F {
		return sign | 0x7C00; // overflow to infinity
	}

	if half_exp <= 0 {
		if half_exp < -10 {
			return sign; // too small even for a subnormal half; flush to zero
		}

		// Normal f32 mantissa, with its implicit leading 1 bit reinstated
		let mantissa_with_implicit = mantissa | 0x0080_0000;
		let shift = (14 - half_exp) as u32;
		let half_mantissa = round_shift_right_to_even(mantissa_with_implicit, shift);

		return sign | half_mantissa as u16;
	}

	let mut half_mantissa = round_shift_right_to_even(mantissa, 13) as u16;
	let mut half_exp = half_exp;

	if half_mantissa & 0x0400 != 0 {
		// Rounding overflowed the mantissa into the exponent field
		half_mantissa = 0;
		half_exp += 1;

		if half_exp >= 0x1F {
			return sign | 0x7C00;
		}
	}

	sign | ((half_exp as u16) << 10) | half_mantissa
}

/// Shifts `value` right by `shift` bits, rounding to nearest, ties to even,
/// based on the bits discarded by the shift.
fn round_shift_right_to_even(value: u32, shift: u32) -> u32 {
	if shift == 0 {
		return value;
	}
	if shift >= 32 {
		return 0;
	}

	let half = 1u32 << (shift - 1);
	let mask = (1u32 << shift) - 1;
	let remainder = value & mask;
	let mut result = value >> shift;

	if remainder > half || (remainder == half && result & 1 == 1) {
		result += 1;
	}

	result
}

/// Converts IEEE-754 half-precision bits to a double-precision float,
/// supporting subnormals, infinities and NaNs.
fn f16_bits_to_f64(bits: u16) -> f64 {
	let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
	let exp = (bits >> 10) & 0x1F;
	let mantissa = (bits & 0x03FF) as f64;

	match exp {
		0 if mantissa == 0.0 => 0.0 * sign,
		0 => sign * mantissa * 2f64.powi(-24),
		0x1F if mantissa == 0.0 => sign * f64::INFINITY,
		0x1F => f64::NAN,
		_ => sign * (1.0 + mantissa / 1024.0) * 2f64.powi(exp as i32 - 15)
	}
}
