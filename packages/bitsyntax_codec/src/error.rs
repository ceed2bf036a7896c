use thiserror::Error;

/// Errors that the pure codec routines in this crate can raise on their own,
/// without any knowledge of segments, builders or matchers.
///
/// This is a strict subset of the full error taxonomy exposed by the `bitsyntax`
/// crate: codes that only make sense once a segment's options (size, unit,
/// dynamic size, …) are known live there instead, and wrap a [`CodecError`]
/// via `#[from]` when they originate here.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum CodecError {
	/// A read requested more bits than remain in the source `BitString`.
	#[error("insufficient bits: requested {requested} bits at offset {offset}, but only {available} remain")]
	InsufficientBits {
		/// The bit offset the read started at.
		offset: usize,
		/// The number of bits requested.
		requested: usize,
		/// The number of bits actually available from `offset`.
		available: usize
	},
	/// A float segment's decode or encode offset was not byte-aligned.
	#[error("float segments must be byte-aligned, but the current offset is {0} bits into the current byte")]
	NonAlignedFloat(u8),
	/// A byte sequence is not valid UTF-8, UTF-16, or the codepoint it decoded to is out of range.
	#[error("invalid UTF encoding: {0}")]
	InvalidUtf(&'static str),
	/// A codepoint fell outside `[0, 0xD7FF] ∪ [0xE000, 0x10FFFF]`.
	#[error("invalid Unicode codepoint: {0:#x}")]
	InvalidUnicodeCodepoint(u32),
	/// An explicit-size binary build did not match the byte length of the supplied value.
	#[error("binary size mismatch: segment declared {declared} bytes, value has {actual} bytes")]
	BinarySizeMismatch {
		/// The declared size, in bytes.
		declared: usize,
		/// The actual size of the value, in bytes.
		actual: usize
	},
	/// An explicit-size bitstring build did not match the bit length of the supplied value.
	#[error("size mismatch: segment declared {declared} bits, value has {actual} bits")]
	SizeMismatch {
		/// The declared size, in bits.
		declared: usize,
		/// The actual bit length of the value.
		actual: usize
	}
}
