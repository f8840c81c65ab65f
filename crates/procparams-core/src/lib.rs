//! Procparams Core - processing parameters for a non-destructive raw editor
//!
//! This crate holds the complete, versioned description of how one image is
//! developed: every tool's settings grouped by pipeline stage, the rules for
//! comparing and defaulting them, the on-disk profile format with its schema
//! migrations, and the partial-profile overlay used to layer a few edited
//! settings onto a full working set.
//!
//! The main entry points are [`ParameterSet`], [`ParameterSet::load`] /
//! [`ParameterSet::save`], and [`PartialProfile`].

pub mod curve;
pub mod edit_mask;
pub mod keyfile;
pub mod param_set;
pub mod params;
pub mod partial;
pub mod paths;
pub mod profile;
pub mod threshold;
pub mod value;

pub use curve::{CurveExpander, CurveRef, DiagonalCurve, FlatCurve};
pub use edit_mask::{EditMask, FieldMask, FieldPath};
pub use param_set::ParameterSet;
pub use params::ParamGroup;
pub use partial::{OwnedPartialProfile, PartialProfile};
pub use paths::PathContext;
pub use profile::{LoadReport, LoadStatus, ProfileError};
pub use threshold::ThresholdCurve;

/// Schema version written by this crate. Files stamped lower are migrated on
/// load.
pub const CURRENT_SCHEMA_VERSION: i32 = 327;

/// Producer stamp written to the `[Version]` section.
pub const DEFAULT_APP_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_version_names_crate() {
        assert!(DEFAULT_APP_VERSION.starts_with("procparams-core "));
    }

    #[test]
    fn test_parameter_set_serde_roundtrip() {
        let mut set = ParameterSet::default();
        set.rank = 2;
        set.tone_curve.exposure_compensation = -0.7;
        set.vibrance.ps_threshold = ThresholdCurve::single(10, 60, false);
        set.wavelet.level1_noise = ThresholdCurve::single(0.25, 3.5, false);
        set.iptc
            .insert("Iptc.Application2.City".into(), vec!["Porto".into()]);

        let json = serde_json::to_string(&set).unwrap();
        let restored: ParameterSet = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, set);
        assert_eq!(restored.app_version, set.app_version);
        assert_eq!(restored.schema_version, set.schema_version);
    }

    #[test]
    fn test_json_uses_field_names() {
        let json = serde_json::to_value(ParameterSet::default()).unwrap();
        assert_eq!(json["schema_version"], CURRENT_SCHEMA_VERSION);
        assert_eq!(json["white_balance"]["setting"], "Camera");
        assert_eq!(json["raw"]["bayer"]["method"], "Amaze");
    }
}
