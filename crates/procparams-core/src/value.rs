//! Leaf field encoding.
//!
//! Every field of every parameter group implements [`ProfileValue`], which
//! converts it to and from the text stored after `Key=` in a profile. A
//! decode either succeeds and replaces the value, or fails and leaves the
//! value untouched, so a bad line in a file never half-updates a field.

use std::path::PathBuf;

use thiserror::Error;

use crate::curve::{CurveError, CurveRef, DiagonalCurve, FlatCurve};
use crate::keyfile::{escape, join_list, split_list, unescape, EscapeError};
use crate::paths::PathContext;
use crate::threshold::{CurveScalar, ThresholdCurve};

/// One field's text does not match the field's shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found:?}")]
    Invalid {
        expected: &'static str,
        found: String,
    },

    #[error("expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },

    #[error(transparent)]
    Escape(#[from] EscapeError),

    #[error("malformed curve: {0}")]
    Curve(#[from] CurveError),
}

impl ValueError {
    pub(crate) fn invalid(expected: &'static str, found: &str) -> Self {
        ValueError::Invalid {
            expected,
            found: found.to_string(),
        }
    }
}

/// Conversion of one leaf field to and from its persisted text.
pub trait ProfileValue {
    /// Text written after `Key=`.
    fn encode(&self, paths: &PathContext<'_>) -> String;

    /// Replace the value from `raw`. On error the value is unchanged.
    fn decode(&mut self, raw: &str, paths: &PathContext<'_>) -> Result<(), ValueError>;

    /// The field as a curve, for fields that hold one.
    fn as_curve(&self) -> Option<CurveRef<'_>> {
        None
    }
}

// ============================================================================
// Scalars
// ============================================================================

/// Numbers that can appear on their own or as list items.
pub trait ProfileScalar: Copy {
    fn parse_item(raw: &str) -> Result<Self, ValueError>;
    fn format_item(self) -> String;
}

impl ProfileScalar for i32 {
    fn parse_item(raw: &str) -> Result<Self, ValueError> {
        raw.trim()
            .parse()
            .map_err(|_| ValueError::invalid("an integer", raw))
    }

    fn format_item(self) -> String {
        self.to_string()
    }
}

impl ProfileScalar for f64 {
    fn parse_item(raw: &str) -> Result<Self, ValueError> {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ValueError::invalid("a finite number", raw)),
        }
    }

    // `Display` for f64 is the shortest text that parses back to the same value.
    fn format_item(self) -> String {
        self.to_string()
    }
}

impl ProfileValue for i32 {
    fn encode(&self, _: &PathContext<'_>) -> String {
        self.format_item()
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        *self = i32::parse_item(raw)?;
        Ok(())
    }
}

impl ProfileValue for f64 {
    fn encode(&self, _: &PathContext<'_>) -> String {
        self.format_item()
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        *self = f64::parse_item(raw)?;
        Ok(())
    }
}

impl ProfileValue for bool {
    fn encode(&self, _: &PathContext<'_>) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        *self = match raw.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(ValueError::invalid("true or false", raw)),
        };
        Ok(())
    }
}

// ============================================================================
// Text
// ============================================================================

impl ProfileValue for String {
    fn encode(&self, _: &PathContext<'_>) -> String {
        escape(self, false)
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        *self = unescape(raw)?;
        Ok(())
    }
}

impl ProfileValue for PathBuf {
    fn encode(&self, paths: &PathContext<'_>) -> String {
        escape(&paths.relativize(self).to_string_lossy(), false)
    }

    fn decode(&mut self, raw: &str, paths: &PathContext<'_>) -> Result<(), ValueError> {
        let text = unescape(raw)?;
        *self = paths.expand(&PathBuf::from(text));
        Ok(())
    }
}

impl ProfileValue for Vec<String> {
    fn encode(&self, _: &PathContext<'_>) -> String {
        join_list(self.iter().map(|item| escape(item, true)))
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        let items = split_list(raw)
            .into_iter()
            .map(unescape)
            .collect::<Result<Vec<_>, _>>()?;
        *self = items;
        Ok(())
    }
}

// ============================================================================
// Lists
// ============================================================================

fn encode_list<T: ProfileScalar>(items: &[T]) -> String {
    join_list(items.iter().map(|item| item.format_item()))
}

fn decode_list<T: ProfileScalar>(raw: &str) -> Result<Vec<T>, ValueError> {
    split_list(raw).into_iter().map(T::parse_item).collect()
}

impl<const N: usize> ProfileValue for [i32; N] {
    fn encode(&self, _: &PathContext<'_>) -> String {
        encode_list(self)
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        let items = decode_list::<i32>(raw)?;
        *self = items.try_into().map_err(|items: Vec<i32>| ValueError::Arity {
            expected: N,
            found: items.len(),
        })?;
        Ok(())
    }
}

impl<const N: usize> ProfileValue for [f64; N] {
    fn encode(&self, _: &PathContext<'_>) -> String {
        encode_list(self)
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        let items = decode_list::<f64>(raw)?;
        *self = items.try_into().map_err(|items: Vec<f64>| ValueError::Arity {
            expected: N,
            found: items.len(),
        })?;
        Ok(())
    }
}

impl<T: CurveScalar + ProfileScalar> ProfileValue for ThresholdCurve<T> {
    fn encode(&self, _: &PathContext<'_>) -> String {
        encode_list(&self.to_control_points())
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        let points = decode_list::<T>(raw)?;
        if self.set_control_points(&points) {
            Ok(())
        } else {
            Err(ValueError::Arity {
                expected: self.point_count(),
                found: points.len(),
            })
        }
    }
}

// ============================================================================
// Curves
// ============================================================================

impl ProfileValue for DiagonalCurve {
    fn encode(&self, _: &PathContext<'_>) -> String {
        encode_list(self.points())
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        *self = DiagonalCurve::new(decode_list(raw)?)?;
        Ok(())
    }

    fn as_curve(&self) -> Option<CurveRef<'_>> {
        Some(CurveRef::Diagonal(self))
    }
}

impl ProfileValue for FlatCurve {
    fn encode(&self, _: &PathContext<'_>) -> String {
        encode_list(self.points())
    }

    fn decode(&mut self, raw: &str, _: &PathContext<'_>) -> Result<(), ValueError> {
        *self = FlatCurve::new(decode_list(raw)?)?;
        Ok(())
    }

    fn as_curve(&self) -> Option<CurveRef<'_>> {
        Some(CurveRef::Flat(self))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn ctx() -> PathContext<'static> {
        PathContext::verbatim()
    }

    #[test]
    fn test_bool_values() {
        let mut value = false;
        value.decode("true", &ctx()).unwrap();
        assert!(value);
        assert_eq!(value.encode(&ctx()), "true");
        assert!(value.decode("yes", &ctx()).is_err());
        assert!(value, "failed decode must not change the value");
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let mut value = 1.5_f64;
        assert!(value.decode("nan", &ctx()).is_err());
        assert!(value.decode("inf", &ctx()).is_err());
        assert_eq!(value, 1.5);
    }

    #[test]
    fn test_float_encoding_is_exact() {
        let original = 0.1_f64 + 0.2;
        let mut decoded = 0.0_f64;
        decoded.decode(&original.encode(&ctx()), &ctx()).unwrap();
        assert_eq!(decoded.to_bits(), original.to_bits());
    }

    #[test]
    fn test_string_escaping() {
        let original = String::from(" line one\nline two");
        let encoded = original.encode(&ctx());
        assert!(!encoded.contains('\n'));

        let mut decoded = String::new();
        decoded.decode(&encoded, &ctx()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_string_list_with_separator() {
        let original = vec!["a;b".to_string(), "c".to_string()];
        let encoded = original.encode(&ctx());
        assert_eq!(encoded, "a\\;b;c;");

        let mut decoded = Vec::new();
        decoded.decode(&encoded, &ctx()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_array_arity_checked() {
        let mut levels = [0_i32; 3];
        assert_eq!(
            levels.decode("1;2;", &ctx()),
            Err(ValueError::Arity {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(levels, [0, 0, 0]);

        levels.decode("1;2;3;", &ctx()).unwrap();
        assert_eq!(levels, [1, 2, 3]);
    }

    #[test]
    fn test_threshold_decode_keeps_shape() {
        let mut curve = ThresholdCurve::double(0, 0, 2000, 2000, false);
        assert_eq!(curve.encode(&ctx()), "0;0;2000;2000;");

        curve.decode("20;80;1500;1800;", &ctx()).unwrap();
        assert_eq!(curve.to_control_points(), vec![20, 80, 1500, 1800]);

        assert!(matches!(
            curve.decode("20;", &ctx()),
            Err(ValueError::Arity {
                expected: 4,
                found: 1
            })
        ));
    }

    #[test]
    fn test_curve_decode_validates() {
        let mut curve = DiagonalCurve::linear();
        assert!(matches!(
            curve.decode("1;0;0;1;2;", &ctx()),
            Err(ValueError::Curve(_))
        ));
        assert!(curve.is_linear());

        curve.decode("1;0;0;1;1;", &ctx()).unwrap();
        assert_eq!(curve.points(), &[1.0, 0.0, 0.0, 1.0, 1.0]);
        assert!(curve.as_curve().is_some());
    }

    #[test]
    fn test_path_relativized_and_expanded() {
        let base = Path::new("/shots");
        let paths = PathContext::with_base(base);
        let dark = PathBuf::from("/shots/darks/d1.dng");
        assert_eq!(dark.encode(&paths), "darks/d1.dng");

        let mut decoded = PathBuf::new();
        decoded.decode("darks/d1.dng", &paths).unwrap();
        assert_eq!(decoded, dark);
    }
}
