//! Curve control-point sequences.
//!
//! Curves are stored flat, the way they are persisted: a leading type tag
//! followed by the control points. Turning them into lookup tables is the
//! processing pipeline's job; this module only guarantees that a stored
//! sequence is well-formed and hands it over through [`CurveExpander`].
//!
//! # Layouts
//!
//! Diagonal curves (input → output transfer curves):
//! - `[0]` linear
//! - `[1 | 3 | 4, x0, y0, x1, y1, ...]` spline, control cage, Catmull-Rom;
//!   at least two points, every value in `[0, 1]`, x non-decreasing
//! - `[2, s1, s2, s3, highlights, lights, darks, shadows]` parametric;
//!   split points in `[0, 1]`, sliders in `[-100, 100]`
//!
//! Flat curves (per-hue or per-level modulation):
//! - `[0]` linear
//! - `[1, x0, y0, lt0, rt0, ...]` min/max control points, every value in `[0, 1]`
//!
//! An empty sequence is accepted as linear for both families.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::edit_mask::FieldPath;

// ============================================================================
// Errors
// ============================================================================

/// Why a control-point sequence is not well-formed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("unknown curve type tag {0}")]
    UnknownType(f64),

    #[error("curve of type {tag} cannot have {len} values")]
    Arity { tag: u8, len: usize },

    #[error("value {value} at index {index} is outside [{min}, {max}]")]
    OutOfRange {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("control point x at index {index} is lower than the previous one")]
    Unordered { index: usize },
}

// ============================================================================
// Type tags
// ============================================================================

const TAG_LINEAR: u8 = 0;
const TAG_SPLINE: u8 = 1;
const TAG_PARAMETRIC: u8 = 2;
const TAG_CONTROL_CAGE: u8 = 3;
const TAG_CATMULL_ROM: u8 = 4;
const TAG_MIN_MAX: u8 = 1;

fn tag_of(points: &[f64]) -> Result<Option<u8>, CurveError> {
    let Some(&first) = points.first() else {
        return Ok(None);
    };
    if first.fract() != 0.0 || !(0.0..=255.0).contains(&first) {
        return Err(CurveError::UnknownType(first));
    }
    Ok(Some(first as u8))
}

fn check_range(points: &[f64], offset: usize, min: f64, max: f64) -> Result<(), CurveError> {
    for (i, &value) in points.iter().enumerate() {
        if !(min..=max).contains(&value) {
            return Err(CurveError::OutOfRange {
                index: offset + i,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

fn is_linear_sequence(points: &[f64]) -> bool {
    match points {
        [] => true,
        [tag] => *tag == TAG_LINEAR as f64,
        _ => false,
    }
}

/// Check that x values (every `stride` values) do not decrease.
fn check_ordered(body: &[f64], stride: usize) -> Result<(), CurveError> {
    let mut previous = f64::NEG_INFINITY;
    for (i, chunk) in body.chunks(stride).enumerate() {
        if chunk[0] < previous {
            return Err(CurveError::Unordered {
                index: 1 + i * stride,
            });
        }
        previous = chunk[0];
    }
    Ok(())
}

// ============================================================================
// Diagonal curves
// ============================================================================

/// An input → output transfer curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagonalCurve(Vec<f64>);

impl DiagonalCurve {
    /// Validate and wrap a control-point sequence.
    pub fn new(points: Vec<f64>) -> Result<Self, CurveError> {
        Self::validate(&points)?;
        Ok(Self(points))
    }

    /// Identity curve.
    pub fn linear() -> Self {
        Self(vec![TAG_LINEAR as f64])
    }

    /// Wrap a built-in table. Tables are covered by the module tests.
    pub(crate) fn from_table(points: &[f64]) -> Self {
        Self(points.to_vec())
    }

    pub fn points(&self) -> &[f64] {
        &self.0
    }

    pub fn is_linear(&self) -> bool {
        is_linear_sequence(&self.0)
    }

    pub fn validate(points: &[f64]) -> Result<(), CurveError> {
        let Some(tag) = tag_of(points)? else {
            return Ok(());
        };
        let body = &points[1..];
        match tag {
            TAG_LINEAR if body.is_empty() => Ok(()),
            TAG_SPLINE | TAG_CONTROL_CAGE | TAG_CATMULL_ROM
                if body.len() >= 4 && body.len() % 2 == 0 =>
            {
                check_range(body, 1, 0.0, 1.0)?;
                check_ordered(body, 2)
            }
            TAG_PARAMETRIC if body.len() == 7 => {
                check_range(&body[..3], 1, 0.0, 1.0)?;
                check_range(&body[3..], 4, -100.0, 100.0)
            }
            TAG_LINEAR | TAG_SPLINE | TAG_PARAMETRIC | TAG_CONTROL_CAGE | TAG_CATMULL_ROM => {
                Err(CurveError::Arity {
                    tag,
                    len: points.len(),
                })
            }
            _ => Err(CurveError::UnknownType(points[0])),
        }
    }
}

impl Default for DiagonalCurve {
    fn default() -> Self {
        Self::linear()
    }
}

// ============================================================================
// Flat curves
// ============================================================================

/// A modulation curve over a periodic or bounded axis (hue, level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatCurve(Vec<f64>);

impl FlatCurve {
    pub fn new(points: Vec<f64>) -> Result<Self, CurveError> {
        Self::validate(&points)?;
        Ok(Self(points))
    }

    pub fn linear() -> Self {
        Self(vec![TAG_LINEAR as f64])
    }

    pub(crate) fn from_table(points: &[f64]) -> Self {
        Self(points.to_vec())
    }

    pub fn points(&self) -> &[f64] {
        &self.0
    }

    pub fn is_linear(&self) -> bool {
        is_linear_sequence(&self.0)
    }

    pub fn validate(points: &[f64]) -> Result<(), CurveError> {
        let Some(tag) = tag_of(points)? else {
            return Ok(());
        };
        let body = &points[1..];
        match tag {
            TAG_LINEAR if body.is_empty() => Ok(()),
            TAG_MIN_MAX if !body.is_empty() && body.len() % 4 == 0 => {
                check_range(body, 1, 0.0, 1.0)?;
                check_ordered(body, 4)
            }
            TAG_LINEAR | TAG_MIN_MAX => Err(CurveError::Arity {
                tag,
                len: points.len(),
            }),
            _ => Err(CurveError::UnknownType(points[0])),
        }
    }
}

impl Default for FlatCurve {
    fn default() -> Self {
        Self::linear()
    }
}

// ============================================================================
// Expansion seam
// ============================================================================

/// Borrowed view of either curve family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveRef<'a> {
    Diagonal(&'a DiagonalCurve),
    Flat(&'a FlatCurve),
}

impl CurveRef<'_> {
    pub fn points(&self) -> &[f64] {
        match self {
            CurveRef::Diagonal(curve) => curve.points(),
            CurveRef::Flat(curve) => curve.points(),
        }
    }
}

/// Receives curves to build runtime lookup structures from.
///
/// Implemented by the processing pipeline; groups call it once per curve
/// field from `expand_curves`.
pub trait CurveExpander {
    fn expand(&mut self, field: FieldPath, curve: CurveRef<'_>);
}

// ============================================================================
// Built-in default curves
// ============================================================================

pub(crate) const RETINEX_TRANSMISSION: &[f64] = &[
    1.0, 0.00, 0.50, 0.35, 0.35, 0.60, 0.75, 0.35, 0.35, 1.00, 0.50, 0.35, 0.35,
];

pub(crate) const RETINEX_GAIN_TRANSMISSION: &[f64] = &[
    1.0, 0.00, 0.10, 0.35, 0.00, 0.25, 0.25, 0.35, 0.35, 0.70, 0.25, 0.35, 0.35, 1.00, 0.10,
    0.00, 0.00,
];

pub(crate) const COLOR_TONING_COLOR: &[f64] = &[
    1.0, 0.050, 0.62, 0.25, 0.25, 0.585, 0.11, 0.25, 0.25,
];

pub(crate) const COLOR_TONING_OPACITY: &[f64] = &[
    1.0, 0.00, 0.3, 0.35, 0.00, 0.25, 0.8, 0.35, 0.35, 0.70, 0.8, 0.35, 0.35, 1.00, 0.3, 0.00,
    0.00,
];

pub(crate) const COLOR_TONING_CL: &[f64] = &[3.0, 0.00, 0.00, 0.35, 0.65, 1.00, 1.00];

pub(crate) const COLOR_TONING_CL2: &[f64] = &[3.0, 0.00, 0.00, 0.35, 0.65, 1.00, 1.00];

pub(crate) const DENOISE_LUMA: &[f64] = &[1.0, 0.05, 0.15, 0.35, 0.35, 0.55, 0.04, 0.35, 0.35];

pub(crate) const DENOISE_CHROMA: &[f64] = &[1.0, 0.05, 0.50, 0.35, 0.35, 0.35, 0.05, 0.35, 0.35];

pub(crate) const DEFRINGE_HUE: &[f64] = &[
    1.0, 0.166666667, 0.0, 0.35, 0.35, 0.347, 0.0, 0.35, 0.35, 0.513667426, 0.0, 0.35, 0.35,
    0.668944571, 0.0, 0.35, 0.35, 0.8287775246, 0.97835991, 0.35, 0.35, 0.9908883827, 0.0,
    0.35, 0.35,
];

pub(crate) const WAVELET_CONTRAST: &[f64] = &[
    1.0, 0.0, 0.25, 0.35, 0.35, 0.50, 0.75, 0.35, 0.35, 0.90, 0.0, 0.35, 0.35,
];

pub(crate) const WAVELET_OPACITY_RG: &[f64] = &[1.0, 0.0, 0.50, 0.35, 0.35, 1.00, 0.50, 0.35, 0.35];

pub(crate) const WAVELET_OPACITY_BY: &[f64] = &[1.0, 0.0, 0.50, 0.35, 0.35, 1.00, 0.50, 0.35, 0.35];

pub(crate) const WAVELET_OPACITY_W: &[f64] = &[
    1.0, 0.00, 0.35, 0.35, 0.00, 0.35, 0.75, 0.35, 0.35, 0.60, 0.75, 0.35, 0.35, 1.00, 0.35,
    0.00, 0.00,
];

pub(crate) const WAVELET_OPACITY_WL: &[f64] = &[1.0, 0.0, 0.50, 0.35, 0.35, 1.00, 0.50, 0.35, 0.35];
