//! The unified error taxonomy, wrapping the lower-level [`CodecError`] and
//! adding the segment-engine- and expression-evaluator-only codes.

use bitsyntax_codec::CodecError;
use thiserror::Error;

/// Everything that can go wrong validating, building or matching a segment.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum EngineError {
	/// A lower-level codec failure: insufficient bits, a non-aligned float, an
	/// invalid UTF encoding, or a size mismatch.
	#[error(transparent)]
	Codec(#[from] CodecError),
	/// The matcher was invoked without an input bitstring.
	#[error("invalid segment: no input to match against")]
	InvalidSegment,
	/// A segment's `size` field violates its kind-specific rule.
	#[error("invalid size: {0}")]
	InvalidSize(String),
	/// A segment's `unit` fell outside `[1, 256]`.
	#[error("invalid unit: {0} is outside [1, 256]")]
	InvalidUnit(u16),
	/// An unrecognized type name token. Reserved for a string-parsing facade
	/// built on top of this core; `Kind` itself is always selected through a
	/// typed method, never parsed.
	#[error("invalid type: {0:?}")]
	InvalidType(String),
	/// An unrecognized endianness token. Reserved for a string-parsing facade
	/// built on top of this core; `Endianness` itself is always passed as a
	/// typed value, never parsed.
	#[error("invalid endianness: {0:?}")]
	InvalidEndianness(String),
	/// A Float segment's effective width was not one of 16, 32 or 64 bits.
	#[error("invalid float size: {0} bits is not one of 16, 32 or 64")]
	InvalidFloatSize(u64),
	/// A Binary segment's declared size or supplied value was invalid,
	/// independent of an explicit-size mismatch.
	#[error("invalid binary data")]
	InvalidBinaryData,
	/// A decoded value could not be bound into its target.
	#[error("type mismatch: cannot bind a {decoded_kind} value into this target")]
	TypeMismatch {
		/// The kind of value that was decoded and could not be bound.
		decoded_kind: &'static str
	},
	/// A UTF/UTF8/UTF16/UTF32 segment specified an explicit size, which is
	/// never permitted.
	#[error("UTF segments cannot specify an explicit size")]
	UtfSizeSpecified,
	/// A dynamic-size expression subtracted past zero.
	#[error("underflow evaluating dynamic size expression")]
	Underflow,
	/// A dynamic-size expression divided by zero.
	#[error("division by zero evaluating dynamic size expression")]
	DivideByZero,
	/// A dynamic-size expression referenced a variable with no bound value.
	#[error("undefined variable in dynamic size expression: {0:?}")]
	UndefinedVariable(String),
	/// A dynamic-size expression was empty.
	#[error("empty dynamic size expression")]
	EmptyExpression,
	/// A dynamic-size expression had unbalanced parentheses.
	#[error("mismatched parentheses in dynamic size expression")]
	MismatchedParentheses,
	/// A dynamic-size expression could not otherwise be parsed.
	#[error("invalid dynamic size expression: {0}")]
	InvalidExpression(String)
}

/// An [`EngineError`] paired with the index of the segment it arose from.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("segment {index}: {source}")]
pub struct SegmentFailure {
	/// The zero-based index of the segment that failed, within its builder or
	/// matcher's segment list.
	pub index: usize,
	/// The underlying failure.
	#[source]
	pub source: EngineError
}

impl SegmentFailure {
	pub(crate) fn at(index: usize, source: impl Into<EngineError>) -> Self {
		Self { index, source: source.into() }
	}
}
