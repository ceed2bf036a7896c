//! Binding targets: the write-through locations a [`crate::Matcher`] binds
//! decoded segment values into, in place of reflected generic pointers.

use bitsyntax_codec::BitString;

use crate::error::EngineError;

/// A location a decoded segment value can be written into.
///
/// Every method has a default implementation that rejects the call with
/// [`EngineError::TypeMismatch`]; concrete targets override only the methods
/// that make sense for the type they wrap.
pub trait BindingTarget {
	/// Binds a signed integer.
	fn bind_integer(&mut self, value: i64) -> Result<(), EngineError> {
		let _ = value;
		Err(EngineError::TypeMismatch { decoded_kind: "integer" })
	}

	/// Binds an unsigned integer.
	fn bind_unsigned(&mut self, value: u64) -> Result<(), EngineError> {
		let _ = value;
		Err(EngineError::TypeMismatch { decoded_kind: "unsigned integer" })
	}

	/// Binds an IEEE-754 float.
	fn bind_float(&mut self, value: f64) -> Result<(), EngineError> {
		let _ = value;
		Err(EngineError::TypeMismatch { decoded_kind: "float" })
	}

	/// Binds a raw byte sequence.
	fn bind_bytes(&mut self, value: Vec<u8>) -> Result<(), EngineError> {
		let _ = value;
		Err(EngineError::TypeMismatch { decoded_kind: "binary" })
	}

	/// Binds a UTF-8 string. Used for UTF segments bound into string-like
	/// targets.
	fn bind_string(&mut self, value: String) -> Result<(), EngineError> {
		let _ = value;
		Err(EngineError::TypeMismatch { decoded_kind: "string" })
	}

	/// Binds a nested bitstring.
	fn bind_bitstring(&mut self, value: BitString) -> Result<(), EngineError> {
		let _ = value;
		Err(EngineError::TypeMismatch { decoded_kind: "bitstring" })
	}

	/// Binds a Unicode scalar value decoded from a UTF segment. The default
	/// implementation forwards to [`BindingTarget::bind_unsigned`], since a
	/// UTF segment decodes to its codepoint as an integer unless the target
	/// overrides this method to interpret it as text.
	fn bind_codepoint(&mut self, value: u32) -> Result<(), EngineError> {
		self.bind_unsigned(value as u64)
	}
}

macro_rules! impl_signed_binding_target {
	($($t:ty),+) => {
		$(
			impl BindingTarget for $t {
				fn bind_integer(&mut self, value: i64) -> Result<(), EngineError> {
					*self = value as $t;
					Ok(())
				}

				fn bind_unsigned(&mut self, value: u64) -> Result<(), EngineError> {
					*self = value as $t;
					Ok(())
				}
			}
		)+
	};
}

macro_rules! impl_unsigned_binding_target {
	($($t:ty),+) => {
		$(
			impl BindingTarget for $t {
				fn bind_integer(&mut self, value: i64) -> Result<(), EngineError> {
					*self = value as $t;
					Ok(())
				}

				fn bind_unsigned(&mut self, value: u64) -> Result<(), EngineError> {
					*self = value as $t;
					Ok(())
				}
			}
		)+
	};
}

impl_signed_binding_target!(i8, i16, i32, i64, i128, isize);
impl_unsigned_binding_target!(u8, u16, u32, u64, u128, usize);

impl BindingTarget for f32 {
	fn bind_float(&mut self, value: f64) -> Result<(), EngineError> {
		*self = value as f32;
		Ok(())
	}
}

impl BindingTarget for f64 {
	fn bind_float(&mut self, value: f64) -> Result<(), EngineError> {
		*self = value;
		Ok(())
	}
}

impl BindingTarget for Vec<u8> {
	fn bind_bytes(&mut self, value: Vec<u8>) -> Result<(), EngineError> {
		*self = value;
		Ok(())
	}

	fn bind_codepoint(&mut self, value: u32) -> Result<(), EngineError> {
		let ch = char::from_u32(value).ok_or(EngineError::TypeMismatch { decoded_kind: "codepoint" })?;
		let mut buf = [0u8; 4];
		*self = ch.encode_utf8(&mut buf).as_bytes().to_vec();
		Ok(())
	}
}

impl BindingTarget for String {
	fn bind_bytes(&mut self, value: Vec<u8>) -> Result<(), EngineError> {
		String::from_utf8(value)
			.map(|s| *self = s)
			.map_err(|_| EngineError::TypeMismatch { decoded_kind: "binary" })
	}

	fn bind_string(&mut self, value: String) -> Result<(), EngineError> {
		*self = value;
		Ok(())
	}

	fn bind_codepoint(&mut self, value: u32) -> Result<(), EngineError> {
		let ch = char::from_u32(value).ok_or(EngineError::TypeMismatch { decoded_kind: "codepoint" })?;
		self.clear();
		self.push(ch);
		Ok(())
	}
}

impl BindingTarget for BitString {
	fn bind_bitstring(&mut self, value: BitString) -> Result<(), EngineError> {
		*self = value;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_targets_bind_both_signed_and_unsigned() {
		let mut i: i32 = 0;
		i.bind_integer(-5).unwrap();
		assert_eq!(i, -5);

		let mut u: u32 = 0;
		u.bind_unsigned(40000).unwrap();
		assert_eq!(u, 40000);
	}

	#[test]
	fn default_methods_reject_mismatched_kinds() {
		let mut i: i32 = 0;
		let err = i.bind_float(1.0).unwrap_err();
		assert!(matches!(err, EngineError::TypeMismatch { .. }));
	}

	#[test]
	fn string_target_binds_codepoint_as_character() {
		let mut s = String::new();
		s.bind_codepoint(0x41).unwrap();
		assert_eq!(s, "A");
	}

	#[test]
	fn string_target_binds_bytes_as_utf8() {
		let mut s = String::new();
		s.bind_bytes(b"Hello".to_vec()).unwrap();
		assert_eq!(s, "Hello");
	}

	#[test]
	fn string_target_rejects_non_utf8_bytes() {
		let mut s = String::new();
		let err = s.bind_bytes(vec![0xFF, 0xFE]).unwrap_err();
		assert!(matches!(err, EngineError::TypeMismatch { .. }));
	}

	#[test]
	fn bytes_target_binds_codepoint_as_utf8() {
		let mut b: Vec<u8> = Vec::new();
		b.bind_codepoint(1024).unwrap();
		assert_eq!(b, vec![0xD0, 0x80]);
	}
}
