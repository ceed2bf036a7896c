//! Pure bit-level codec primitives underlying the `bitsyntax` segment engine.
//!
//! This crate knows nothing about segments, patterns or Erlang-style bit
//! syntax; it only knows how to pack and unpack bits, bytes, integers, floats,
//! UTF encodings and nested bitstrings at arbitrary, non-byte-aligned offsets,
//! most-significant-bit first. The `bitsyntax` crate builds the segment
//! engine on top of the types exported here.

mod binary;
mod bitstring;
mod error;
mod float;
mod integer;
mod reader;
mod utf;
mod writer;

pub use binary::{decode_binary, decode_bitstring, decode_rest_binary, decode_rest_bitstring, encode_binary, encode_bitstring};
pub use bitstring::BitString;
pub use error::CodecError;
pub use float::{decode_float, encode_float};
pub use integer::{Endianness, decode_signed, decode_unsigned, encode_signed, encode_unsigned, truncate_signed, truncate_unsigned};
pub use reader::BitReader;
pub use utf::{decode_utf8, decode_utf16, decode_utf32, encode_utf8, encode_utf16, encode_utf32};
pub use writer::BitWriter;
