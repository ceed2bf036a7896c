//! Per-segment field validation. Checked before any bytes are produced or
//! consumed, so a failing segment never leaves a partial write.

use crate::error::EngineError;
use crate::segment::{Kind, SegmentOptions};

const MAX_UNIT: u16 = 256;
const MAX_INTEGER_BITS: u64 = 64;

fn validate_unit(unit: u16) -> Result<(), EngineError> {
	if unit == 0 || unit > MAX_UNIT {
		return Err(EngineError::InvalidUnit(unit));
	}
	Ok(())
}

/// Validates a segment's options against its kind, ahead of a build.
/// `is_match` distinguishes the stricter match-time Integer size rule
/// (a non-zero size is required) from the build-time exception that permits
/// an explicit size of 0 to produce empty output.
pub(crate) fn validate(kind: Kind, options: &SegmentOptions, is_match: bool) -> Result<(), EngineError> {
	validate_unit(options.unit)?;

	match kind {
		Kind::Integer => {
			if is_match && options.size == 0 {
				return Err(EngineError::InvalidSize("Integer segments must have a non-zero size at match time".into()));
			}

			let width = options.effective_size();
			if width > MAX_INTEGER_BITS {
				return Err(EngineError::InvalidSize(format!(
					"effective Integer width {width} exceeds the {MAX_INTEGER_BITS}-bit representable limit"
				)));
			}
		}
		Kind::Float => {
			let width = options.effective_size();
			if !matches!(width, 16 | 32 | 64) {
				return Err(EngineError::InvalidFloatSize(width));
			}
		}
		Kind::Binary | Kind::Bitstring => {
			// `size >= 0` always holds (size is unsigned); no further
			// structural check applies beyond the shared unit check above.
			// Explicit-size vs. actual-value-length mismatches are reported
			// by the codec layer (`BinarySizeMismatch` / `SizeMismatch`),
			// which has the value in hand to compare against.
		}
		Kind::Utf | Kind::Utf8 | Kind::Utf16 | Kind::Utf32 => {
			if options.size_specified {
				return Err(EngineError::UtfSizeSpecified);
			}
			if options.unit != 1 {
				return Err(EngineError::InvalidUnit(options.unit));
			}
		}
		Kind::RestBinary | Kind::RestBitstring => {}
	}

	Ok(())
}
