//! Partial profiles: a parameter set paired with an edit mask, overlaid onto
//! another set one field at a time.

use std::path::Path;

use crate::edit_mask::{EditMask, FieldMask};
use crate::param_set::ParameterSet;
use crate::profile::{LoadReport, ProfileError};

/// Borrowed parameters plus an optional mask of the fields they define.
#[derive(Clone, Copy)]
pub struct PartialProfile<'a> {
    params: &'a ParameterSet,
    edited: Option<&'a dyn EditMask>,
}

impl<'a> PartialProfile<'a> {
    pub fn new(params: &'a ParameterSet, edited: Option<&'a dyn EditMask>) -> Self {
        Self { params, edited }
    }

    pub fn params(&self) -> &'a ParameterSet {
        self.params
    }

    /// Copy the profile onto `dest`.
    ///
    /// Without a mask every field and override map is copied. With a mask,
    /// only the marked fields are, and everything else in `dest` is left as
    /// it was. The producer and schema stamps of `dest` are never changed.
    pub fn apply_to(&self, dest: &mut ParameterSet) {
        match self.edited {
            Some(mask) => self.params.overlay_onto(dest, mask),
            None => {
                let app_version = std::mem::take(&mut dest.app_version);
                let schema_version = dest.schema_version;
                *dest = self.params.clone();
                dest.app_version = app_version;
                dest.schema_version = schema_version;
            }
        }
    }
}

/// A partial profile that owns its parameters and mask.
///
/// Cloning copies both, so collections of these can be built and passed
/// around by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnedPartialProfile {
    pub params: Box<ParameterSet>,
    pub edited: FieldMask,
}

impl OwnedPartialProfile {
    /// Baseline parameters with nothing marked.
    pub fn new() -> Self {
        Self::default()
    }

    /// A full profile: `params` with every field marked.
    pub fn from_params(params: ParameterSet) -> Self {
        Self {
            params: Box::new(params),
            edited: FieldMask::all(),
        }
    }

    /// Load a profile file, marking the fields it defines.
    pub fn load(path: &Path) -> Result<(Self, LoadReport), ProfileError> {
        let mut profile = Self::new();
        let report = profile
            .params
            .load(path, Some(&mut profile.edited as &mut dyn EditMask))?;
        Ok((profile, report))
    }

    /// Mark or clear every field.
    pub fn set_all(&mut self, edited: bool) {
        self.edited.set_all(edited);
    }

    /// Stop carrying rank, color label and trash flag.
    pub fn clear_general(&mut self) {
        self.edited.clear_general();
    }

    pub fn as_partial(&self) -> PartialProfile<'_> {
        PartialProfile::new(&self.params, Some(&self.edited))
    }

    pub fn apply_to(&self, dest: &mut ParameterSet) {
        self.as_partial().apply_to(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit_mask::FieldPath;
    use crate::param_set::{EXIF_OVERRIDES, RANK};
    use crate::params::BayerDemosaicMethod;

    fn live_set() -> ParameterSet {
        let mut set = ParameterSet::default();
        set.rank = 3;
        set.tone_curve.contrast = 20;
        set.crop.enabled = true;
        set.crop.w = 1200;
        set.exif.insert("Exif.Image.Artist".into(), "live".into());
        set
    }

    #[test]
    fn test_masked_apply_copies_only_marked_fields() {
        let mut source = ParameterSet::default();
        source.tone_curve.contrast = -15;
        source.tone_curve.brightness = 40;
        source.raw.bayer.method = BayerDemosaicMethod::Dcb;
        source.rank = 5;

        let mut mask = FieldMask::none();
        mask.mark(FieldPath::new("Exposure", "Contrast"), true);
        mask.mark(FieldPath::new("RAW Bayer", "Method"), true);

        let mut dest = live_set();
        let before = dest.clone();
        PartialProfile::new(&source, Some(&mask)).apply_to(&mut dest);

        assert_eq!(dest.tone_curve.contrast, -15);
        assert_eq!(dest.raw.bayer.method, BayerDemosaicMethod::Dcb);
        assert_eq!(dest.tone_curve.brightness, before.tone_curve.brightness);
        assert_eq!(dest.rank, 3);
        assert_eq!(
            before.changed_fields(&dest),
            vec![
                FieldPath::new("Exposure", "Contrast"),
                FieldPath::new("RAW Bayer", "Method"),
            ]
        );
    }

    #[test]
    fn test_unmasked_apply_copies_everything() {
        let mut source = ParameterSet::default();
        source.vibrance.pastels = 12;
        let mut dest = live_set();
        dest.app_version = "editor 5.9".to_string();

        PartialProfile::new(&source, None).apply_to(&mut dest);

        assert_eq!(dest, source);
        assert_eq!(dest.app_version, "editor 5.9");
    }

    #[test]
    fn test_empty_mask_is_noop() {
        let source = ParameterSet::default();
        let mask = FieldMask::none();
        let mut dest = live_set();
        OwnedPartialProfile {
            params: Box::new(source),
            edited: mask,
        }
        .apply_to(&mut dest);
        assert_eq!(dest, live_set());
    }

    #[test]
    fn test_from_params_matches_full_copy() {
        let mut source = ParameterSet::default();
        source.white_balance.temperature = 5200;
        source.iptc.insert("Keywords".into(), vec!["a".into()]);
        let profile = OwnedPartialProfile::from_params(source.clone());

        let mut dest = live_set();
        profile.apply_to(&mut dest);
        assert_eq!(dest, source);
    }

    #[test]
    fn test_clear_general_keeps_rank() {
        let mut source = ParameterSet::default();
        source.rank = 1;
        source.in_trash = true;
        let mut profile = OwnedPartialProfile::from_params(source);
        profile.clear_general();

        let mut dest = live_set();
        profile.apply_to(&mut dest);
        assert_eq!(dest.rank, 3);
        assert!(!dest.in_trash);
        assert!(!profile.edited.is_edited(RANK));
        assert!(profile.edited.is_edited(EXIF_OVERRIDES));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = OwnedPartialProfile::new();
        original.params.vibrance.pastels = 10;
        let mut copy = original.clone();
        copy.params.vibrance.pastels = 20;
        copy.set_all(true);

        assert_eq!(original.params.vibrance.pastels, 10);
        assert!(original.edited.is_empty());
        assert!(!copy.edited.is_empty());
    }

    #[test]
    fn test_load_partial_file_then_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.pp3");
        std::fs::write(
            &path,
            "[Version]\nVersion=327\n[Exposure]\nContrast=33\n[Vibrance]\nEnabled=true\n",
        )
        .unwrap();

        let (profile, report) = OwnedPartialProfile::load(&path).unwrap();
        assert!(report.is_complete());
        assert_eq!(profile.edited.len(), 2);

        let mut dest = live_set();
        profile.apply_to(&mut dest);
        assert_eq!(dest.tone_curve.contrast, 33);
        assert!(dest.vibrance.enabled);
        assert!(dest.crop.enabled);
        assert_eq!(dest.crop.w, 1200);
        assert_eq!(dest.exif.get("Exif.Image.Artist").map(String::as_str), Some("live"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OwnedPartialProfile::load(&dir.path().join("none.pp3")).unwrap_err();
        assert!(matches!(err, ProfileError::NotFound { .. }));
    }
}
