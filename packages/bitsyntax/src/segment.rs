//! The segment model: a closed `Kind` tag, per-segment options shared by both
//! directions, and the build-direction/match-direction value representations
//! (see the crate-level documentation for why these are split).

use bitsyntax_codec::{BitString, Endianness};

use crate::binding::BindingTarget;
use crate::error::EngineError;

/// The closed set of segment kinds a builder or matcher can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// A signed or unsigned integer of arbitrary effective bit width.
	Integer,
	/// An IEEE-754 float of effective width 16, 32 or 64 bits.
	Float,
	/// A raw byte sequence.
	Binary,
	/// A nested bit sequence of arbitrary length.
	Bitstring,
	/// A single Unicode codepoint, encoding left to the caller's choice of width.
	Utf,
	/// A single Unicode codepoint, encoded as UTF-8.
	Utf8,
	/// A single Unicode codepoint, encoded as UTF-16.
	Utf16,
	/// A single Unicode codepoint, encoded as UTF-32.
	Utf32,
	/// The entire remaining input, as a byte sequence; must be byte-aligned.
	RestBinary,
	/// The entire remaining input, as a bitstring of any length.
	RestBitstring
}

/// Marks whether a build-direction segment was created through a typed
/// `add_*` method, or through the untyped raw-bit-literal path
/// (`Builder::add_segment`). Only the latter participates in the
/// inter-segment alignment special case (see `Builder::needs_pad_to_byte`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentOrigin {
	Typed,
	RawBits
}

/// The kind-independent fields shared by every segment, in both directions.
#[derive(Debug, Clone)]
pub struct SegmentOptions {
	pub(crate) size: u64,
	pub(crate) size_specified: bool,
	pub(crate) unit: u16,
	pub(crate) unit_specified: bool,
	pub(crate) endianness: Endianness,
	pub(crate) signed: bool,
	pub(crate) dynamic_size: Option<String>,
	pub(crate) dynamic_expr: Option<String>,
	pub(crate) name: Option<String>
}

impl Default for SegmentOptions {
	fn default() -> Self {
		Self {
			size: 0,
			size_specified: false,
			unit: 1,
			unit_specified: false,
			endianness: Endianness::Big,
			signed: false,
			dynamic_size: None,
			dynamic_expr: None,
			name: None
		}
	}
}

impl SegmentOptions {
	/// Returns the default option set: no explicit size or unit, big-endian,
	/// unsigned, no dynamic size, unnamed.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets an explicit size, in the unit native to the segment's kind.
	pub fn with_size(mut self, size: u64) -> Self {
		self.size = size;
		self.size_specified = true;
		self
	}

	/// Sets an explicit unit multiplier.
	pub fn with_unit(mut self, unit: u16) -> Self {
		self.unit = unit;
		self.unit_specified = true;
		self
	}

	/// Sets the byte order applied to multi-byte fields.
	pub fn with_endianness(mut self, endianness: Endianness) -> Self {
		self.endianness = endianness;
		self
	}

	/// Marks an Integer segment as two's-complement signed.
	pub fn with_signed(mut self, signed: bool) -> Self {
		self.signed = signed;
		self
	}

	/// Supplies the name of a previously registered match variable whose
	/// current value determines this segment's size at match time.
	pub fn with_dynamic_size_variable(mut self, name: impl Into<String>) -> Self {
		self.dynamic_size = Some(name.into());
		self
	}

	/// Supplies an arithmetic expression, evaluated against bound match
	/// variables, that determines this segment's size at match time.
	pub fn with_dynamic_size_expression(mut self, expr: impl Into<String>) -> Self {
		self.dynamic_expr = Some(expr.into());
		self
	}

	/// Names this segment's bound value, making it available to later
	/// dynamic-size expressions and variable references.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Whether this segment's size is resolved at match time rather than fixed
	/// up front.
	pub fn is_dynamic(&self) -> bool {
		self.dynamic_size.is_some() || self.dynamic_expr.is_some()
	}

	/// The effective bit (or byte, for Binary) width implied by `size * unit`.
	pub(crate) fn effective_size(&self) -> u64 {
		self.size * self.unit as u64
	}
}

/// The literal value a build-direction segment encodes.
#[derive(Debug, Clone)]
pub enum SegmentValue {
	/// A signed integer, truncated modulo `2^width` on encode.
	Integer(i64),
	/// An unsigned integer, truncated modulo `2^width` on encode.
	Unsigned(u64),
	/// An IEEE-754 float.
	Float(f64),
	/// A raw byte sequence, for Binary segments.
	Bytes(Vec<u8>),
	/// A nested bit sequence, for Bitstring segments.
	Bitstring(BitString),
	/// A Unicode scalar value, for UTF segments.
	Codepoint(u32)
}

/// One segment of an ordered sequence being assembled by a [`crate::Builder`].
pub struct BuildSegment {
	pub(crate) kind: Kind,
	pub(crate) value: SegmentValue,
	pub(crate) options: SegmentOptions,
	pub(crate) origin: SegmentOrigin
}

/// One segment of an ordered pattern being assembled by a [`crate::Matcher`].
///
/// `target` borrows the caller's own location for the lifetime of the match,
/// rather than owning a boxed copy, so a decoded value lands directly where
/// the caller will read it.
pub struct MatchSegment<'a> {
	pub(crate) kind: Kind,
	pub(crate) target: &'a mut dyn BindingTarget,
	pub(crate) options: SegmentOptions
}

/// The outcome of matching a single segment.
#[derive(Debug, Clone)]
pub struct SegmentResult {
	/// The value this segment decoded to, independent of where it was bound.
	pub value: SegmentValue,
	/// Whether this segment matched. Always `true` for a result that was
	/// actually produced; a failed match short-circuits before a result
	/// is recorded.
	pub matched: bool,
	/// The suffix of the input left after this segment was consumed.
	pub remaining: BitString
}
