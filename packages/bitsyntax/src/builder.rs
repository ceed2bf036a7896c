//! The build-direction engine: an ordered segment accumulator that drives
//! the codec through a [`BitWriter`] on [`Builder::build`].

use bitsyntax_codec::{BitString, BitWriter, encode_binary, encode_bitstring, encode_float, encode_unsigned, encode_utf8, encode_utf16, encode_utf32, truncate_signed, truncate_unsigned};
use log::{debug, trace};

use crate::error::{EngineError, SegmentFailure};
use crate::segment::{BuildSegment, Kind, SegmentOptions, SegmentOrigin, SegmentValue};
use crate::validator;

/// Accumulates segments to encode, in order, and assembles them into a
/// [`BitString`] on [`Builder::build`].
#[derive(Debug, Default)]
pub struct Builder {
	segments: Vec<BuildSegment>
}

impl Builder {
	/// Returns an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a signed Integer segment. Default size is 8 bits.
	pub fn add_integer(&mut self, value: i64, options: SegmentOptions) -> &mut Self {
		let options = Self::with_default_size(options, 8);
		self.push_typed(Kind::Integer, SegmentValue::Integer(value), options)
	}

	/// Appends an unsigned Integer segment. Default size is 8 bits.
	pub fn add_unsigned(&mut self, value: u64, options: SegmentOptions) -> &mut Self {
		let options = Self::with_default_size(options, 8);
		self.push_typed(Kind::Integer, SegmentValue::Unsigned(value), options)
	}

	/// Appends a Float segment. Default size is 64 bits.
	pub fn add_float(&mut self, value: f64, options: SegmentOptions) -> &mut Self {
		let options = Self::with_default_size(options, 64);
		self.push_typed(Kind::Float, SegmentValue::Float(value), options)
	}

	/// Appends a Binary segment. Default size is `value`'s byte length.
	pub fn add_binary(&mut self, value: Vec<u8>, mut options: SegmentOptions) -> &mut Self {
		if !options.size_specified {
			options = options.with_size(value.len() as u64);
		}
		if !options.unit_specified {
			options.unit = 8;
		}
		self.push_typed(Kind::Binary, SegmentValue::Bytes(value), options)
	}

	/// Appends a nested Bitstring segment. Default size is `value`'s bit length.
	pub fn add_bitstring(&mut self, value: BitString, mut options: SegmentOptions) -> &mut Self {
		if !options.size_specified {
			options = options.with_size(value.length() as u64);
		}
		self.push_typed(Kind::Bitstring, SegmentValue::Bitstring(value), options)
	}

	/// Appends a UTF-8-encoded codepoint segment.
	pub fn add_utf8(&mut self, codepoint: u32, options: SegmentOptions) -> &mut Self {
		self.push_typed(Kind::Utf8, SegmentValue::Codepoint(codepoint), options)
	}

	/// Appends a UTF-16-encoded codepoint segment.
	pub fn add_utf16(&mut self, codepoint: u32, options: SegmentOptions) -> &mut Self {
		self.push_typed(Kind::Utf16, SegmentValue::Codepoint(codepoint), options)
	}

	/// Appends a UTF-32-encoded codepoint segment.
	pub fn add_utf32(&mut self, codepoint: u32, options: SegmentOptions) -> &mut Self {
		self.push_typed(Kind::Utf32, SegmentValue::Codepoint(codepoint), options)
	}

	/// Appends a raw, untyped `width`-bit literal. This is the primitive path
	/// that participates in the inter-segment alignment special case (see
	/// [`Builder::needs_pad_to_byte`]); typed segments never trigger it.
	pub fn add_segment(&mut self, value: u64, width: u8) -> &mut Self {
		let options = SegmentOptions::new().with_size(width as u64).with_unit(1);
		self.segments.push(BuildSegment {
			kind: Kind::Integer,
			value: SegmentValue::Unsigned(value),
			options,
			origin: SegmentOrigin::RawBits
		});
		self
	}

	/// Builds a segment list by calling `f` with a fresh builder, then
	/// proceeds exactly as [`Builder::build`].
	pub fn build_dynamically(f: impl FnOnce(&mut Builder)) -> Result<BitString, SegmentFailure> {
		let mut builder = Builder::new();
		f(&mut builder);
		builder.build()
	}

	/// Builds whichever of `on_true` or `on_false` applies, per `condition`.
	pub fn build_conditional(condition: bool, on_true: &Builder, on_false: &Builder) -> Result<BitString, SegmentFailure> {
		if condition { on_true.build() } else { on_false.build() }
	}

	/// Validates and encodes every segment in order, returning the first
	/// failure alongside its segment index.
	pub fn build(&self) -> Result<BitString, SegmentFailure> {
		let mut writer = BitWriter::new();
		let mut previous: Option<&BuildSegment> = None;

		for (index, segment) in self.segments.iter().enumerate() {
			validator::validate(segment.kind, &segment.options, false).map_err(|error| SegmentFailure::at(index, error))?;

			if let Some(prev) = previous
				&& let Some(pad_bits) = Self::needs_pad_to_byte(prev, writer.bit_len(), Self::effective_size_hint(segment))
			{
				writer.append_bits(0, pad_bits);
			}

			trace!("build: segment {index} ({:?}) at bit offset {}", segment.kind, writer.bit_len());

			Self::encode_segment(&mut writer, segment).map_err(|error| SegmentFailure::at(index, error))?;

			previous = Some(segment);
		}

		let result = writer.finalize();
		debug!("build: assembled {} segments into {} bits", self.segments.len(), result.length());

		Ok(result)
	}

	/// Returns a [`BitString`] equal to `base` followed by every segment
	/// this builder would otherwise produce on its own.
	pub fn append_to(&self, base: &BitString) -> Result<BitString, SegmentFailure> {
		let appended = self.build()?;
		let mut writer = BitWriter::new();
		writer.append_bitstring(base);
		writer.append_bitstring(&appended);
		Ok(writer.finalize())
	}

	fn push_typed(&mut self, kind: Kind, value: SegmentValue, options: SegmentOptions) -> &mut Self {
		self.segments.push(BuildSegment { kind, value, options, origin: SegmentOrigin::Typed });
		self
	}

	fn with_default_size(mut options: SegmentOptions, default: u64) -> SegmentOptions {
		if !options.size_specified {
			options.size = default;
		}
		options
	}

	/// The fixed effective bit width a segment will occupy, if knowable
	/// ahead of encoding it. `None` for kinds whose encoded width depends on
	/// the value itself (UTF segments).
	fn effective_size_hint(segment: &BuildSegment) -> Option<u64> {
		match segment.kind {
			Kind::Integer | Kind::Float | Kind::Bitstring => Some(segment.options.effective_size()),
			Kind::Binary if segment.options.size_specified => Some(segment.options.effective_size()),
			_ => None
		}
	}

	/// The narrow inter-segment alignment special case: when the previous
	/// segment was an untyped raw-bit-literal and its combined width with the
	/// next segment's effective width is not a multiple of 8, pad the stream
	/// to the next byte boundary first. Never generalized beyond this one
	/// documented combination.
	fn needs_pad_to_byte(previous: &BuildSegment, bits_written: usize, next_effective_size: Option<u64>) -> Option<u8> {
		if previous.origin != SegmentOrigin::RawBits {
			return None;
		}

		let misalignment = (bits_written % 8) as u8;
		if misalignment == 0 {
			return None;
		}

		let next_size = next_effective_size?;
		let combined = (misalignment as u64 + next_size) % 8;

		if combined != 0 { Some(8 - misalignment) } else { None }
	}

	fn encode_segment(writer: &mut BitWriter, segment: &BuildSegment) -> Result<(), EngineError> {
		let options = &segment.options;

		match segment.kind {
			Kind::Integer => {
				let width = options.effective_size() as u8;
				let bits = match &segment.value {
					SegmentValue::Integer(v) => truncate_signed(*v, width),
					SegmentValue::Unsigned(v) => truncate_unsigned(*v, width),
					_ => unreachable!("Integer segments only ever carry Integer or Unsigned values")
				};
				encode_unsigned(writer, bits, width, options.endianness);
				Ok(())
			}
			Kind::Float => {
				let width = options.effective_size() as u8;
				let SegmentValue::Float(value) = &segment.value else {
					unreachable!("Float segments only ever carry Float values")
				};
				encode_float(writer, *value, width, options.endianness)?;
				Ok(())
			}
			Kind::Binary => {
				let SegmentValue::Bytes(value) = &segment.value else {
					unreachable!("Binary segments only ever carry Bytes values")
				};
				encode_binary(writer, value, options.size_specified, options.size as usize, options.unit)?;
				Ok(())
			}
			Kind::Bitstring => {
				let SegmentValue::Bitstring(value) = &segment.value else {
					unreachable!("Bitstring segments only ever carry Bitstring values")
				};
				encode_bitstring(writer, value, options.size_specified, options.size as usize, options.unit)?;
				Ok(())
			}
			Kind::Utf8 => {
				let SegmentValue::Codepoint(codepoint) = &segment.value else {
					unreachable!("UTF segments only ever carry Codepoint values")
				};
				encode_utf8(writer, *codepoint)?;
				Ok(())
			}
			Kind::Utf16 => {
				let SegmentValue::Codepoint(codepoint) = &segment.value else {
					unreachable!("UTF segments only ever carry Codepoint values")
				};
				encode_utf16(writer, *codepoint, options.endianness)?;
				Ok(())
			}
			Kind::Utf32 => {
				let SegmentValue::Codepoint(codepoint) = &segment.value else {
					unreachable!("UTF segments only ever carry Codepoint values")
				};
				encode_utf32(writer, *codepoint, options.endianness)?;
				Ok(())
			}
			other => unreachable!("Builder never constructs a {other:?} segment")
		}
	}
}

#[cfg(test)]
mod tests {
	use bitsyntax_codec::Endianness;

	use super::*;

	#[test]
	fn simple_three_byte_build() {
		let mut builder = Builder::new();
		builder
			.add_unsigned(1, SegmentOptions::new().with_size(8))
			.add_unsigned(17, SegmentOptions::new().with_size(8))
			.add_unsigned(42, SegmentOptions::new().with_size(8));

		let bits = builder.build().unwrap();
		assert_eq!(bits.length(), 24);
		assert_eq!(bits.to_bytes(), vec![0x01, 0x11, 0x2A]);
	}

	#[test]
	fn size_zero_integer_adds_no_bits() {
		let mut builder = Builder::new();
		builder.add_unsigned(0, SegmentOptions::new().with_size(0));
		let bits = builder.build().unwrap();
		assert_eq!(bits.length(), 0);
	}

	#[test]
	fn oversized_binary_fails_with_segment_index() {
		let mut builder = Builder::new();
		builder
			.add_unsigned(1, SegmentOptions::new().with_size(8))
			.add_binary(b"Hi".to_vec(), SegmentOptions::new().with_size(10));

		let err = builder.build().unwrap_err();
		assert_eq!(err.index, 1);
		assert!(matches!(err.source, EngineError::Codec(bitsyntax_codec::CodecError::BinarySizeMismatch { .. })));
	}

	#[test]
	fn raw_literal_pads_to_byte_boundary_when_misaligned() {
		// 3-bit raw literal, misaligned with the next 8-bit field: pads 5
		// bits before the second segment, for 16 bits total.
		let mut builder = Builder::new();
		builder
			.add_segment(0b101, 3)
			.add_unsigned(0xFF, SegmentOptions::new().with_size(8));

		let bits = builder.build().unwrap();
		assert_eq!(bits.length(), 16);
		assert_eq!(bits.to_bytes(), vec![0b1010_0000, 0xFF]);
	}

	#[test]
	fn raw_literal_does_not_pad_when_already_aligned() {
		// 1-bit raw literal followed by a 15-bit field: already sums to a
		// multiple of 8, so no padding is inserted.
		let mut builder = Builder::new();
		builder.add_segment(1, 1).add_unsigned(0x7FFF, SegmentOptions::new().with_size(15));

		let bits = builder.build().unwrap();
		assert_eq!(bits.length(), 16);
	}

	#[test]
	fn tcp_flags_scenario() {
		let mut builder = Builder::new();
		builder
			.add_unsigned(0, SegmentOptions::new().with_size(2))
			.add_unsigned(0, SegmentOptions::new().with_size(1))
			.add_unsigned(1, SegmentOptions::new().with_size(1))
			.add_unsigned(1, SegmentOptions::new().with_size(1))
			.add_unsigned(1, SegmentOptions::new().with_size(1))
			.add_unsigned(0, SegmentOptions::new().with_size(1))
			.add_unsigned(0, SegmentOptions::new().with_size(1));

		assert_eq!(builder.build().unwrap().to_bytes(), vec![0x38]);
	}

	#[test]
	fn signedness_at_16_bits_scenario() {
		let mut builder = Builder::new();
		builder
			.add_integer(1000, SegmentOptions::new().with_size(16).with_signed(true))
			.add_integer(-1000, SegmentOptions::new().with_size(16).with_signed(true))
			.add_integer(40000, SegmentOptions::new().with_size(16));

		let bits = builder.build().unwrap();
		assert_eq!(bits.length(), 48);
	}

	#[test]
	fn append_to_concatenates_base_and_segments() {
		let base = BitString::from_bytes(vec![0xAA]);
		let mut builder = Builder::new();
		builder.add_unsigned(0xBB, SegmentOptions::new().with_size(8));

		let result = builder.append_to(&base).unwrap();
		assert_eq!(result.to_bytes(), vec![0xAA, 0xBB]);
	}

	#[test]
	fn utf8_codepoint_scenario() {
		let mut builder = Builder::new();
		builder.add_utf8(1024, SegmentOptions::new());
		assert_eq!(builder.build().unwrap().to_bytes(), vec![0xD0, 0x80]);
	}

	#[test]
	fn little_endian_option_is_honored() {
		let mut builder = Builder::new();
		builder.add_unsigned(0x1234, SegmentOptions::new().with_size(16).with_endianness(Endianness::Little));
		assert_eq!(builder.build().unwrap().to_bytes(), vec![0x34, 0x12]);
	}
}
