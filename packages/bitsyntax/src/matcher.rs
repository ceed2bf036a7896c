//! The match-direction engine: an ordered pattern accumulator with a
//! variable registry, decoding each segment against a [`BitString`] on
//! [`Matcher::match_against`].

use bitsyntax_codec::{
	BitReader, BitString, decode_binary, decode_bitstring, decode_float, decode_rest_binary, decode_rest_bitstring, decode_signed,
	decode_unsigned, decode_utf8, decode_utf16, decode_utf32
};
use indexmap::IndexMap;
use log::{debug, trace};

use crate::binding::BindingTarget;
use crate::error::{EngineError, SegmentFailure};
use crate::expr::{self, DynamicSizeContext};
use crate::segment::{Kind, MatchSegment, SegmentOptions, SegmentResult, SegmentValue};
use crate::validator;

/// Accumulates a pattern of segments to decode, in order, binding each
/// segment's decoded value directly into the caller-owned target it
/// borrows, for the lifetime `'a` of the match.
#[derive(Default)]
pub struct Matcher<'a> {
	segments: Vec<MatchSegment<'a>>,
	registered_variables: IndexMap<String, u64>
}

impl<'a> Matcher<'a> {
	/// Returns an empty matcher.
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the dynamic-size context with `name`'s initial value, ahead of
	/// any segment being matched (see DESIGN.md for why this takes a plain
	/// value rather than a live binding-target reference).
	pub fn register_variable(&mut self, name: impl Into<String>, initial_value: u64) -> &mut Self {
		self.registered_variables.insert(name.into(), initial_value);
		self
	}

	/// Appends an Integer pattern segment. Default size is 8 bits.
	pub fn integer(&mut self, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.push(Kind::Integer, target, Self::with_default_size(options, 8))
	}

	/// Appends a Float pattern segment. Default size is 64 bits.
	pub fn float(&mut self, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.push(Kind::Float, target, Self::with_default_size(options, 64))
	}

	/// Appends a Binary pattern segment. Consumes all remaining bytes by
	/// default.
	pub fn binary(&mut self, target: &'a mut dyn BindingTarget, mut options: SegmentOptions) -> &mut Self {
		if !options.unit_specified {
			options.unit = 8;
		}
		self.push(Kind::Binary, target, options)
	}

	/// Appends a nested Bitstring pattern segment. Consumes the entire
	/// remainder by default.
	pub fn bitstring(&mut self, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.push(Kind::Bitstring, target, options)
	}

	/// Appends a generic UTF pattern segment, decoded as UTF-8 (the only
	/// self-synchronizing of the three encodings, so it needs no declared width).
	pub fn utf(&mut self, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.push(Kind::Utf, target, options)
	}

	/// Appends a UTF-8 pattern segment.
	pub fn utf8(&mut self, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.push(Kind::Utf8, target, options)
	}

	/// Appends a UTF-16 pattern segment.
	pub fn utf16(&mut self, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.push(Kind::Utf16, target, options)
	}

	/// Appends a UTF-32 pattern segment.
	pub fn utf32(&mut self, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.push(Kind::Utf32, target, options)
	}

	/// Appends a `RestBinary` pattern segment. Must be the last segment.
	pub fn rest_binary(&mut self, target: &'a mut dyn BindingTarget) -> &mut Self {
		self.push(Kind::RestBinary, target, SegmentOptions::new())
	}

	/// Appends a `RestBitstring` pattern segment. Must be the last segment.
	pub fn rest_bitstring(&mut self, target: &'a mut dyn BindingTarget) -> &mut Self {
		self.push(Kind::RestBitstring, target, SegmentOptions::new())
	}

	fn push(&mut self, kind: Kind, target: &'a mut dyn BindingTarget, options: SegmentOptions) -> &mut Self {
		self.segments.push(MatchSegment { kind, target, options });
		self
	}

	fn with_default_size(mut options: SegmentOptions, default: u64) -> SegmentOptions {
		if !options.size_specified {
			options.size = default;
		}
		options
	}

	/// Walks every pattern segment against `input` in order, resolving
	/// dynamic sizes, binding decoded values into their targets, and
	/// returning one [`SegmentResult`] per segment.
	pub fn match_against(&mut self, input: &BitString) -> Result<Vec<SegmentResult>, SegmentFailure> {
		let mut context = DynamicSizeContext::new();
		for (name, value) in &self.registered_variables {
			context.set(name.clone(), *value);
		}

		let reader = BitReader::new(input);
		let mut offset = 0usize;
		let mut results = Vec::with_capacity(self.segments.len());

		for (index, segment) in self.segments.iter_mut().enumerate() {
			validator::validate(segment.kind, &segment.options, true).map_err(|error| SegmentFailure::at(index, error))?;

			// A resolved dynamic size substitutes for the segment's own `size`
			// field, so it is still subject to the segment's `unit` multiplier
			// on the way to an effective bit width.
			let effective_size = if segment.options.is_dynamic() {
				let size = Self::resolve_dynamic_size(&segment.options, &context).map_err(|error| SegmentFailure::at(index, error))?;
				size * segment.options.unit as u64
			} else {
				segment.options.effective_size()
			};

			trace!("match: segment {index} ({:?}) at bit offset {offset}", segment.kind);

			let (value, consumed_bits) = Self::decode_segment(&reader, offset, segment.kind, &segment.options, effective_size)
				.map_err(|error| SegmentFailure::at(index, error))?;

			if offset + consumed_bits > input.length() {
				return Err(SegmentFailure::at(
					index,
					EngineError::Codec(bitsyntax_codec::CodecError::InsufficientBits {
						offset,
						requested: consumed_bits,
						available: input.length() - offset
					})
				));
			}

			Self::bind(segment.target, &value).map_err(|error| SegmentFailure::at(index, error))?;

			if let (SegmentValue::Integer(_) | SegmentValue::Unsigned(_), Some(name)) = (&value, &segment.options.name) {
				let as_u64 = match &value {
					SegmentValue::Unsigned(v) => *v,
					SegmentValue::Integer(v) => *v as u64,
					_ => unreachable!()
				};
				context.set(name.clone(), as_u64);
			}

			offset += consumed_bits;

			let remaining = reader
				.slice(offset, input.length() - offset)
				.map_err(|error| SegmentFailure::at(index, EngineError::Codec(error)))?;

			results.push(SegmentResult { value, matched: true, remaining });
		}

		debug!("match: {} segments matched, {} bits consumed of {}", results.len(), offset, input.length());

		Ok(results)
	}

	fn resolve_dynamic_size(options: &SegmentOptions, context: &DynamicSizeContext) -> Result<u64, EngineError> {
		if let Some(expr_source) = &options.dynamic_expr {
			return expr::evaluate(expr_source, context);
		}

		if let Some(name) = &options.dynamic_size {
			return context.get(name).ok_or_else(|| EngineError::UndefinedVariable(name.clone()));
		}

		unreachable!("is_dynamic() guarantees dynamic_expr or dynamic_size is set")
	}

	fn decode_segment(
		reader: &BitReader,
		offset: usize,
		kind: Kind,
		options: &SegmentOptions,
		effective_size: u64
	) -> Result<(SegmentValue, usize), EngineError> {
		match kind {
			Kind::Integer => {
				let width = effective_size as u8;
				let aligned_offset = Self::maybe_align_for_unit(offset, options);

				let value = if options.signed {
					SegmentValue::Integer(decode_signed(reader, aligned_offset, width, options.endianness)?)
				} else {
					SegmentValue::Unsigned(decode_unsigned(reader, aligned_offset, width, options.endianness)?)
				};

				Ok((value, (aligned_offset - offset) + width as usize))
			}
			Kind::Float => {
				let width = effective_size as u8;
				let value = decode_float(reader, offset, width, options.endianness)?;
				Ok((SegmentValue::Float(value), width as usize))
			}
			Kind::Binary => {
				let (size_specified, size, unit) = Self::resolved_size_and_unit(options, effective_size);
				let (bytes, consumed) = decode_binary(reader, offset, size_specified, size, unit)?;
				Ok((SegmentValue::Bytes(bytes), consumed))
			}
			Kind::Bitstring => {
				let (size_specified, size, unit) = Self::resolved_size_and_unit(options, effective_size);
				let (value, consumed) = decode_bitstring(reader, offset, size_specified, size, unit)?;
				Ok((SegmentValue::Bitstring(value), consumed))
			}
			Kind::Utf | Kind::Utf8 => {
				let (codepoint, consumed) = decode_utf8(reader, offset)?;
				Ok((SegmentValue::Codepoint(codepoint), consumed))
			}
			Kind::Utf16 => {
				let (codepoint, consumed) = decode_utf16(reader, offset, options.endianness)?;
				Ok((SegmentValue::Codepoint(codepoint), consumed))
			}
			Kind::Utf32 => {
				let (codepoint, consumed) = decode_utf32(reader, offset, options.endianness)?;
				Ok((SegmentValue::Codepoint(codepoint), consumed))
			}
			Kind::RestBinary => {
				if (reader.len().saturating_sub(offset)) % 8 != 0 {
					return Err(EngineError::InvalidBinaryData);
				}

				let (bytes, consumed) = decode_rest_binary(reader, offset)?;
				Ok((SegmentValue::Bytes(bytes), consumed))
			}
			Kind::RestBitstring => {
				let (value, consumed) = decode_rest_bitstring(reader, offset)?;
				Ok((SegmentValue::Bitstring(value), consumed))
			}
		}
	}

	/// Reduces a Binary or Bitstring segment's options down to the
	/// `(size_specified, size, unit)` triple the codec layer expects, folding
	/// in a dynamic size resolution (already expressed in bits by
	/// `effective_size`) as an always-specified size with unit 1.
	fn resolved_size_and_unit(options: &SegmentOptions, effective_size: u64) -> (bool, usize, u16) {
		if options.is_dynamic() {
			(true, effective_size as usize, 1)
		} else {
			(options.size_specified, options.size as usize, options.unit)
		}
	}

	/// Implements the Integer decode alignment special case: when the unit is
	/// a multiple of 8 and greater than 1, the decode offset is rounded up to
	/// the next byte boundary first.
	fn maybe_align_for_unit(offset: usize, options: &SegmentOptions) -> usize {
		if options.unit > 1 && options.unit % 8 == 0 {
			offset.div_ceil(8) * 8
		} else {
			offset
		}
	}

	fn bind(target: &mut dyn BindingTarget, value: &SegmentValue) -> Result<(), EngineError> {
		match value {
			SegmentValue::Integer(v) => target.bind_integer(*v),
			SegmentValue::Unsigned(v) => target.bind_unsigned(*v),
			SegmentValue::Float(v) => target.bind_float(*v),
			SegmentValue::Bytes(v) => target.bind_bytes(v.clone()),
			SegmentValue::Bitstring(v) => target.bind_bitstring(v.clone()),
			SegmentValue::Codepoint(v) => target.bind_codepoint(*v)
		}
	}
}
