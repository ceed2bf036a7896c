//! Erlang-style bit-syntax for Rust: build and match heterogeneous binary
//! data at bit granularity.
//!
//! Producers describe an ordered sequence of typed segments — integers of
//! arbitrary bit width, IEEE floats, raw byte blobs, Unicode codepoints, and
//! nested bitstrings — and [`Builder`] packs them contiguously into a
//! [`BitString`] whose length need not be a multiple of eight. Consumers
//! describe a parallel pattern of segments with [`Matcher`], which decodes
//! each one against an existing [`BitString`] and binds its value straight
//! into a caller-owned location.
//!
//! ```
//! use bitsyntax::{Builder, Matcher, SegmentOptions};
//!
//! // IPv4-header-style packing: a 4-bit version, a 4-bit header length.
//! let mut builder = Builder::new();
//! builder
//! 	.add_unsigned(4, SegmentOptions::new().with_size(4))
//! 	.add_unsigned(5, SegmentOptions::new().with_size(4));
//! let packed = builder.build().unwrap();
//! assert_eq!(packed.to_bytes(), vec![0x45]);
//!
//! let mut version = 0u8;
//! let mut header_len = 0u8;
//! let mut matcher = Matcher::new();
//! matcher
//! 	.integer(&mut version, SegmentOptions::new().with_size(4))
//! 	.integer(&mut header_len, SegmentOptions::new().with_size(4));
//! matcher.match_against(&packed).unwrap();
//! assert_eq!((version, header_len), (4, 5));
//! ```

mod binding;
mod builder;
mod error;
mod expr;
mod matcher;
mod segment;
mod validator;

pub use binding::BindingTarget;
pub use bitsyntax_codec::{BitString, Endianness};
pub use builder::Builder;
pub use error::{EngineError, SegmentFailure};
pub use expr::DynamicSizeContext;
pub use matcher::Matcher;
pub use segment::{Kind, SegmentOptions, SegmentResult, SegmentValue};
