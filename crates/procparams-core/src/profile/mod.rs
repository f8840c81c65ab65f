//! Profile persistence.
//!
//! A profile is the text form of a [`ParameterSet`]: a `[Version]` section,
//! `[General]` metadata, one section per parameter group and optional
//! `[Exif]`/`[IPTC]` override sections (see [`keyfile`](crate::keyfile) for
//! the line grammar).
//!
//! Loading is tolerant. Unknown sections and keys are skipped, a value that
//! does not parse leaves its field at the default and is listed in the
//! [`LoadReport`], and files from older schema versions are migrated (see
//! [`migrate`]). Only a missing or unreadable file, bytes that are not UTF-8,
//! or text with no section structure at all fail the load, and then the
//! target set is untouched. Exif and IPTC tag names are written through
//! [`escape_key`] so any tag text survives as a key.
//!
//! Saving writes each destination through a temporary file in the same
//! directory that is renamed over the target, so a destination either keeps
//! its old content or receives the complete new profile.

mod error;
pub mod migrate;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub use error::ProfileError;

use crate::edit_mask::{EditMask, FieldMask, FieldPath};
use crate::keyfile::{escape, escape_key, unescape, KeyFile, KeyFileError};
use crate::param_set::{
    ParameterSet, EXIF_OVERRIDES, EXIF_SECTION, IPTC_OVERRIDES, IPTC_SECTION, VERSION_SECTION,
};
use crate::paths::PathContext;
use crate::value::{ProfileValue, ValueError};
use crate::CURRENT_SCHEMA_VERSION;

const APP_VERSION_KEY: &str = "AppVersion";
const SCHEMA_VERSION_KEY: &str = "Version";
const SCHEMA_VERSION_FIELD: FieldPath = FieldPath::new(VERSION_SECTION, SCHEMA_VERSION_KEY);

// ============================================================================
// Load report
// ============================================================================

/// Overall outcome of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Every value present in the file was read.
    Complete,
    /// Some values could not be read and kept their defaults.
    PartialDefaults,
}

/// Details of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub status: LoadStatus,
    /// Fields whose stored value could not be read
    pub fallbacks: Vec<FieldPath>,
    /// Schema version stamped in the file (current version if absent)
    pub file_schema_version: i32,
    /// Migration rules applied, in order
    pub migrations_applied: Vec<&'static str>,
}

impl LoadReport {
    fn new(file_schema_version: i32) -> Self {
        Self {
            status: LoadStatus::Complete,
            fallbacks: Vec::new(),
            file_schema_version,
            migrations_applied: Vec::new(),
        }
    }

    fn fall_back(&mut self, field: FieldPath, error: &ValueError) {
        warn!(%field, %error, "profile value ignored, using default");
        self.status = LoadStatus::PartialDefaults;
        self.fallbacks.push(field);
    }

    pub fn is_complete(&self) -> bool {
        self.status == LoadStatus::Complete
    }

    /// The file was written by a newer schema; settings this version does
    /// not know about were dropped.
    pub fn newer_schema(&self) -> bool {
        self.file_schema_version > CURRENT_SCHEMA_VERSION
    }
}

// ============================================================================
// Writing
// ============================================================================

impl ParameterSet {
    /// Save the full profile to `dest` and, if given, the identical bytes to
    /// `dest2`.
    ///
    /// With `relativize_paths`, embedded file references inside `dest`'s
    /// directory are stored relative to it.
    pub fn save(
        &self,
        dest: &Path,
        dest2: Option<&Path>,
        relativize_paths: bool,
    ) -> Result<(), ProfileError> {
        self.write_profile(dest, dest2, relativize_paths, None)
    }

    /// Save only the fields marked in `mask`: the on-disk form of a partial
    /// profile.
    pub fn save_partial(
        &self,
        dest: &Path,
        dest2: Option<&Path>,
        relativize_paths: bool,
        mask: &dyn EditMask,
    ) -> Result<(), ProfileError> {
        self.write_profile(dest, dest2, relativize_paths, Some(mask))
    }

    /// Serialize to profile text.
    pub fn to_profile_string(&self, paths: &PathContext<'_>) -> String {
        self.to_key_file(paths, None).to_string()
    }

    fn write_profile(
        &self,
        dest: &Path,
        dest2: Option<&Path>,
        relativize_paths: bool,
        mask: Option<&dyn EditMask>,
    ) -> Result<(), ProfileError> {
        let paths = PathContext::for_save(dest, relativize_paths);
        let text = self.to_key_file(&paths, mask).to_string();

        for path in std::iter::once(dest).chain(dest2) {
            write_atomic(path, text.as_bytes()).map_err(|source| ProfileError::WriteFailure {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), bytes = text.len(), "saved profile");
        }
        Ok(())
    }

    fn to_key_file(&self, paths: &PathContext<'_>, mask: Option<&dyn EditMask>) -> KeyFile {
        let included = |field: FieldPath| mask.map_or(true, |mask| mask.is_edited(field));
        let mut doc = KeyFile::new();

        doc.set(VERSION_SECTION, APP_VERSION_KEY, escape(&self.app_version, false));
        doc.set(
            VERSION_SECTION,
            SCHEMA_VERSION_KEY,
            CURRENT_SCHEMA_VERSION.to_string(),
        );

        for (field, value) in self.general_fields() {
            if included(field) {
                doc.set(field.section, field.key, value.encode(paths));
            }
        }

        for (section, fields) in self.sections() {
            for (key, value) in fields {
                if included(FieldPath::new(section, key)) {
                    doc.set(section, key, value.encode(paths));
                }
            }
        }

        if included(EXIF_OVERRIDES) {
            write_overrides(&mut doc, EXIF_SECTION, &self.exif, paths);
        }
        if included(IPTC_OVERRIDES) {
            write_overrides(&mut doc, IPTC_SECTION, &self.iptc, paths);
        }
        doc
    }
}

/// Write an override map with escaped tag names. Empty tags have no key form
/// and are skipped.
fn write_overrides<V: ProfileValue>(
    doc: &mut KeyFile,
    section: &str,
    map: &BTreeMap<String, V>,
    paths: &PathContext<'_>,
) {
    for (tag, value) in map {
        if tag.is_empty() {
            warn!(section, "skipping override with an empty tag name");
            continue;
        }
        doc.set(section, escape_key(tag), value.encode(paths));
    }
}

/// Write `contents` to a temporary file next to `path`, then rename it over
/// `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

// ============================================================================
// Reading
// ============================================================================

impl ParameterSet {
    /// Load a profile from `path`, replacing `self`.
    ///
    /// Relative file references in the profile are resolved against its
    /// directory when `path` is absolute. When `mask` is given, every field
    /// is marked present or absent according to what was read.
    ///
    /// On error `self` and `mask` are left untouched.
    pub fn load(
        &mut self,
        path: &Path,
        mask: Option<&mut dyn EditMask>,
    ) -> Result<LoadReport, ProfileError> {
        debug!(path = %path.display(), "loading profile");
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ProfileError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ProfileError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let doc = KeyFile::parse_bytes(&bytes).map_err(|source| ProfileError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        let report = self.from_key_file(doc, &PathContext::for_load(path), mask);
        debug!(
            path = %path.display(),
            schema_version = report.file_schema_version,
            fallbacks = report.fallbacks.len(),
            "loaded profile"
        );
        Ok(report)
    }

    /// Load from profile text, replacing `self`. See [`ParameterSet::load`].
    pub fn from_profile_str(
        &mut self,
        text: &str,
        paths: &PathContext<'_>,
        mask: Option<&mut dyn EditMask>,
    ) -> Result<LoadReport, KeyFileError> {
        let doc = KeyFile::parse(text)?;
        Ok(self.from_key_file(doc, paths, mask))
    }

    fn from_key_file(
        &mut self,
        mut doc: KeyFile,
        paths: &PathContext<'_>,
        mask: Option<&mut dyn EditMask>,
    ) -> LoadReport {
        // An unreadable stamp is treated as current and reported.
        let mut report = LoadReport::new(CURRENT_SCHEMA_VERSION);
        if let Some(raw) = doc.get(VERSION_SECTION, SCHEMA_VERSION_KEY) {
            match raw.trim().parse::<i32>() {
                Ok(version) => report.file_schema_version = version,
                Err(_) => report.fall_back(
                    SCHEMA_VERSION_FIELD,
                    &ValueError::invalid("a schema version", raw),
                ),
            }
        }
        let file_version = report.file_schema_version;
        if report.newer_schema() {
            warn!(
                file_version,
                supported = CURRENT_SCHEMA_VERSION,
                "profile written by a newer schema, unknown settings are ignored"
            );
        }

        report.migrations_applied = migrate::upgrade_document(&mut doc, file_version);

        let mut loaded = ParameterSet::default();
        let mut present = FieldMask::none();

        if let Some(raw) = doc.get(VERSION_SECTION, APP_VERSION_KEY) {
            if let Ok(app_version) = unescape(raw) {
                loaded.app_version = app_version;
            }
        }
        loaded.schema_version = file_version;

        for (field, value) in loaded.general_fields_mut() {
            read_field(&doc, field, value, paths, &mut present, &mut report);
        }
        for (section, fields) in loaded.sections_mut() {
            for (key, value) in fields {
                let field = FieldPath::new(section, key);
                read_field(&doc, field, value, paths, &mut present, &mut report);
            }
        }
        read_overrides(&doc, EXIF_OVERRIDES, &mut loaded.exif, paths, &mut present, &mut report);
        read_overrides(&doc, IPTC_OVERRIDES, &mut loaded.iptc, paths, &mut present, &mut report);

        let param_migrations = migrate::upgrade(&mut loaded, Some(&mut present));
        report.migrations_applied.extend(param_migrations);

        *self = loaded;
        if let Some(mask) = mask {
            for field in ParameterSet::field_paths() {
                mask.mark(field, present.is_edited(field));
            }
        }
        report
    }
}

fn read_field(
    doc: &KeyFile,
    field: FieldPath,
    value: &mut dyn ProfileValue,
    paths: &PathContext<'_>,
    present: &mut FieldMask,
    report: &mut LoadReport,
) {
    let Some(raw) = doc.get(field.section, field.key) else {
        return;
    };
    match value.decode(raw, paths) {
        Ok(()) => present.mark(field, true),
        Err(error) => report.fall_back(field, &error),
    }
}

/// Read an `[Exif]` or `[IPTC]` section into its override map.
///
/// The map is read all-or-nothing: one unreadable entry leaves the map
/// empty and unmarked.
fn read_overrides<V: ProfileValue + Default>(
    doc: &KeyFile,
    field: FieldPath,
    map: &mut BTreeMap<String, V>,
    paths: &PathContext<'_>,
    present: &mut FieldMask,
    report: &mut LoadReport,
) {
    let Some(section) = doc.section(field.section) else {
        return;
    };
    let mut entries = BTreeMap::new();
    for (raw_tag, raw) in section.entries() {
        let mut value = V::default();
        let decoded = unescape(raw_tag)
            .map_err(ValueError::from)
            .and_then(|tag| value.decode(raw, paths).map(|()| tag));
        match decoded {
            Ok(tag) => {
                entries.insert(tag, value);
            }
            Err(error) => {
                report.fall_back(field, &error);
                return;
            }
        }
    }
    *map = entries;
    present.mark(field, true);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::threshold::ThresholdCurve;

    fn edited_set() -> ParameterSet {
        let mut set = ParameterSet::default();
        set.rank = 4;
        set.tone_curve.exposure_compensation = 0.35;
        set.tone_curve.curve =
            crate::curve::DiagonalCurve::new(vec![1.0, 0.0, 0.0, 0.5, 0.6, 1.0, 1.0]).unwrap();
        set.sharpening.threshold = ThresholdCurve::double(10, 60, 1800, 1500, false);
        set.white_balance.setting = "Custom".to_string();
        set.crop.ratio = " 16:9 ".to_string();
        set.exif
            .insert("Exif.Image.Artist".into(), "A. Photographer".into());
        set.iptc.insert(
            "Iptc.Application2.Keywords".into(),
            vec!["harbor".into(), "fog; morning".into()],
        );
        set
    }

    #[test]
    fn test_default_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.pp3");
        let saved = ParameterSet::default();
        saved.save(&path, None, true).unwrap();

        let mut loaded = ParameterSet::default();
        loaded.crop.enabled = true;
        let report = loaded.load(&path, None).unwrap();

        assert!(report.is_complete());
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_edited_round_trip() {
        let saved = edited_set();
        let text = saved.to_profile_string(&PathContext::verbatim());

        let mut loaded = ParameterSet::default();
        let report = loaded
            .from_profile_str(&text, &PathContext::verbatim(), None)
            .unwrap();

        assert!(report.is_complete());
        assert!(report.migrations_applied.is_empty());
        assert_eq!(loaded, saved);
        assert_eq!(loaded.app_version, saved.app_version);
    }

    #[test]
    fn test_version_section_first() {
        let text = ParameterSet::default().to_profile_string(&PathContext::verbatim());
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("[Version]"));
        assert!(lines.next().unwrap().starts_with("AppVersion="));
        assert_eq!(
            lines.next(),
            Some(format!("Version={}", CURRENT_SCHEMA_VERSION).as_str())
        );
        assert_eq!(lines.nth(1), Some("[General]"));
    }

    #[test]
    fn test_empty_override_sections_not_written() {
        let text = ParameterSet::default().to_profile_string(&PathContext::verbatim());
        assert!(!text.contains("[Exif]"));
        assert!(!text.contains("[IPTC]"));
    }

    #[test]
    fn test_missing_key_falls_back_and_is_unmarked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.pp3");
        let mut saved = ParameterSet::default();
        saved.vibrance.pastels = 25;
        saved.tone_curve.contrast = 12;
        saved.save(&path, None, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let edited: String = text
            .lines()
            .filter(|line| *line != "Pastels=25")
            .map(|line| format!("{line}\n"))
            .collect();
        fs::write(&path, edited).unwrap();

        let mut loaded = ParameterSet::default();
        let mut mask = FieldMask::none();
        let report = loaded.load(&path, Some(&mut mask)).unwrap();

        let pastels = FieldPath::new("Vibrance", "Pastels");
        assert!(report.is_complete());
        assert_eq!(loaded.vibrance.pastels, 0);
        assert!(!mask.is_edited(pastels));
        assert_eq!(loaded.tone_curve.contrast, 12);
        for field in ParameterSet::field_paths() {
            let written = field != pastels
                && field != EXIF_OVERRIDES
                && field != IPTC_OVERRIDES;
            assert_eq!(mask.is_edited(field), written, "{field}");
        }
    }

    #[test]
    fn test_bad_value_falls_back_and_continues() {
        let text = "[Version]\nVersion=327\n\
                    [Exposure]\nContrast=lots\nBrightness=7\n\
                    [Sharpening]\nThreshold=1;2;\n";
        let mut loaded = ParameterSet::default();
        let mut mask = FieldMask::all();
        let report = loaded
            .from_profile_str(text, &PathContext::verbatim(), Some(&mut mask))
            .unwrap();

        assert_eq!(report.status, LoadStatus::PartialDefaults);
        assert_eq!(
            report.fallbacks,
            vec![
                FieldPath::new("Exposure", "Contrast"),
                FieldPath::new("Sharpening", "Threshold"),
            ]
        );
        assert_eq!(loaded.tone_curve.brightness, 7);
        assert_eq!(loaded.tone_curve.contrast, 0);
        assert_eq!(
            loaded.sharpening.threshold,
            crate::params::SharpeningParams::default().threshold
        );
        assert!(mask.is_edited(FieldPath::new("Exposure", "Brightness")));
        assert!(!mask.is_edited(FieldPath::new("Exposure", "Contrast")));
        assert_eq!(mask.len(), 1);
    }

    #[test]
    fn test_unknown_sections_and_keys_ignored() {
        let text = "[Version]\nVersion=327\n[Future Tool]\nEnabled=true\n[Exposure]\nNewKnob=3\nBlack=5\n";
        let mut loaded = ParameterSet::default();
        let report = loaded
            .from_profile_str(text, &PathContext::verbatim(), None)
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(loaded.tone_curve.black, 5);
    }

    #[test]
    fn test_newer_schema_is_best_effort() {
        let text = "[Version]\nVersion=9999\n[Exposure]\nBlack=5\n";
        let mut loaded = ParameterSet::default();
        let report = loaded
            .from_profile_str(text, &PathContext::verbatim(), None)
            .unwrap();
        assert!(report.newer_schema());
        assert_eq!(loaded.tone_curve.black, 5);
        assert_eq!(loaded.schema_version, 9999);
    }

    #[test]
    fn test_legacy_file_migrated() {
        let text = "[Version]\nVersion=300\n\
                    [Sharpening]\nThreshold=40\n\
                    [Vibrance]\nPSThreshold=60\n\
                    [Luminance Curve]\nSaturation=15\n\
                    [LensProfile]\nLCPFile=/lcp/lens.lcp\n\
                    [RAW Bayer]\nMethod=bilinear\n";
        let mut loaded = ParameterSet::default();
        let mut mask = FieldMask::none();
        let report = loaded
            .from_profile_str(text, &PathContext::verbatim(), Some(&mut mask))
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.migrations_applied.len(), 5);
        assert_eq!(
            loaded.sharpening.threshold.to_control_points(),
            vec![40, 40, 2000, 2000]
        );
        assert_eq!(loaded.vibrance.ps_threshold.to_control_points(), vec![60, 60]);
        assert_eq!(loaded.lab_curve.chromaticity, 15);
        assert_eq!(
            loaded.lens_profile.mode,
            crate::params::LensCorrectionMode::Lcp
        );
        assert!(mask.is_edited(FieldPath::new("LensProfile", "LcMode")));
        assert_eq!(loaded.raw.bayer.method, crate::params::BayerDemosaicMethod::Fast);
        assert_eq!(loaded.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = ParameterSet::default();
        let err = set.load(&dir.path().join("missing.pp3"), None).unwrap_err();
        assert!(matches!(err, ProfileError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pp3");
        fs::write(&path, "this is not a profile\n").unwrap();

        let mut set = ParameterSet::default();
        set.rank = 2;
        let mut mask = FieldMask::none();
        let err = set.load(&path, Some(&mut mask)).unwrap_err();

        assert!(matches!(err, ProfileError::Malformed { .. }));
        assert_eq!(err.path(), path.as_path());
        assert_eq!(set.rank, 2);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_dual_destination_identical() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.pp3");
        let second = dir.path().join("cache").join("b.pp3");
        fs::create_dir(dir.path().join("cache")).unwrap();

        let mut set = edited_set();
        set.raw.common.dark_frame = dir.path().join("darks").join("iso1600.dng");
        set.save(&first, Some(&second), true).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_write_failure_reported() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("no-such-dir").join("x.pp3");
        let err = ParameterSet::default().save(&target, None, false).unwrap_err();
        assert!(matches!(err, ProfileError::WriteFailure { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_overwrite_existing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.pp3");
        fs::write(&path, "old").unwrap();
        ParameterSet::default().save(&path, None, false).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("[Version]"));
    }

    #[test]
    fn test_paths_relativized_and_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.pp3");
        let inside = dir.path().join("darks").join("iso800.dng");
        let outside = PathBuf::from("/elsewhere/flat.dng");

        let mut set = ParameterSet::default();
        set.raw.common.dark_frame = inside.clone();
        set.raw.common.flat_field_file = outside.clone();
        set.save(&path, None, true).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let expected = PathBuf::from("darks").join("iso800.dng");
        assert!(text.contains(&format!("DarkFrame={}", expected.display())));
        assert!(text.contains("FlatFieldFile=/elsewhere/flat.dng"));

        let mut loaded = ParameterSet::default();
        loaded.load(&path, None).unwrap();
        assert_eq!(loaded.raw.common.dark_frame, inside);
        assert_eq!(loaded.raw.common.flat_field_file, outside);
    }

    #[test]
    fn test_paths_kept_absolute_without_relativize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.pp3");
        let inside = dir.path().join("luts").join("film.png");

        let mut set = ParameterSet::default();
        set.film_simulation.clut_filename = inside.clone();
        set.save(&path, None, false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(&format!("ClutFilename={}", inside.display())));
    }

    #[test]
    fn test_save_partial_writes_marked_fields_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.pp3");
        let mut set = ParameterSet::default();
        set.vibrance.enabled = true;
        set.vibrance.pastels = 30;

        let mask = FieldMask::from_changes(set.changed_fields(&ParameterSet::default()));
        set.save_partial(&path, None, false, &mask).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let doc = KeyFile::parse(&text).unwrap();
        let sections: Vec<_> = doc.sections().map(|s| s.name().to_string()).collect();
        assert_eq!(sections, ["Version", "Vibrance"]);
        assert_eq!(doc.section("Vibrance").map(|s| s.len()), Some(2));

        let mut loaded_mask = FieldMask::none();
        let mut loaded = ParameterSet::default();
        loaded.load(&path, Some(&mut loaded_mask)).unwrap();
        assert_eq!(loaded_mask, mask);
    }

    #[test]
    fn test_override_maps_round_trip() {
        let saved = edited_set();
        let text = saved.to_profile_string(&PathContext::verbatim());
        assert!(text.contains("[Exif]"));
        assert!(text.contains("Iptc.Application2.Keywords=harbor;fog\\; morning;"));

        let mut loaded = ParameterSet::default();
        let mut mask = FieldMask::none();
        loaded
            .from_profile_str(&text, &PathContext::verbatim(), Some(&mut mask))
            .unwrap();
        assert_eq!(loaded.iptc, saved.iptc);
        assert!(mask.is_edited(EXIF_OVERRIDES));
        assert!(mask.is_edited(IPTC_OVERRIDES));
    }

    #[test]
    fn test_unicode_edge_whitespace_round_trip() {
        let mut saved = ParameterSet::default();
        saved.crop.ratio = "3:2\u{3000}".to_string();
        saved
            .exif
            .insert("Exif.Image.Artist".into(), "\u{a0}Ana".into());
        saved
            .exif
            .insert("Exif.Image.Copyright".into(), "\u{b}Ana\u{c}".into());
        let text = saved.to_profile_string(&PathContext::verbatim());

        let mut loaded = ParameterSet::default();
        let report = loaded
            .from_profile_str(&text, &PathContext::verbatim(), None)
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_awkward_tag_names_round_trip() {
        let mut saved = ParameterSet::default();
        for tag in ["Exif.A=B", "[Exif]", "#note", " padded ", "back\\slash"] {
            saved.exif.insert(tag.into(), format!("value of {tag}"));
        }
        saved
            .iptc
            .insert("Iptc=Keywords".into(), vec!["a".into(), "b".into()]);
        let text = saved.to_profile_string(&PathContext::verbatim());

        let doc = KeyFile::parse(&text).unwrap();
        let sections: Vec<_> = doc.sections().map(|s| s.name().to_string()).collect();
        assert_eq!(sections.iter().filter(|name| *name == "Exif").count(), 1);
        assert_eq!(doc.section("Exif").map(|s| s.len()), Some(5));

        let mut loaded = ParameterSet::default();
        let report = loaded
            .from_profile_str(&text, &PathContext::verbatim(), None)
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(loaded.exif, saved.exif);
        assert_eq!(loaded.iptc, saved.iptc);
    }

    #[test]
    fn test_empty_tag_name_skipped_on_save() {
        let mut saved = ParameterSet::default();
        saved.exif.insert(String::new(), "lost".into());
        saved.exif.insert("Exif.Image.Make".into(), "kept".into());
        let text = saved.to_profile_string(&PathContext::verbatim());

        let mut loaded = ParameterSet::default();
        loaded
            .from_profile_str(&text, &PathContext::verbatim(), None)
            .unwrap();
        assert_eq!(loaded.exif.len(), 1);
        assert_eq!(
            loaded.exif.get("Exif.Image.Make").map(String::as_str),
            Some("kept")
        );
    }

    #[test]
    fn test_bad_tag_escape_falls_back() {
        let text = "[Version]\nVersion=327\n[Exif]\nbad\\qtag=x\n";
        let mut loaded = ParameterSet::default();
        let report = loaded
            .from_profile_str(text, &PathContext::verbatim(), None)
            .unwrap();
        assert_eq!(report.fallbacks, vec![EXIF_OVERRIDES]);
        assert!(loaded.exif.is_empty());
    }

    #[test]
    fn test_non_utf8_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.pp3");
        let mut bytes = b"[Exif]\nExif.Image.Artist=Jos".to_vec();
        bytes.push(0xe9);
        bytes.push(b'\n');
        fs::write(&path, bytes).unwrap();

        let mut set = ParameterSet::default();
        set.rank = 2;
        let err = set.load(&path, None).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::Malformed {
                source: KeyFileError::InvalidEncoding { valid_up_to: 28 },
                ..
            }
        ));
        assert_eq!(set.rank, 2);
    }

    #[test]
    fn test_unreadable_schema_version_reported() {
        let text = "[Version]\nVersion=abc\n[Exposure]\nBlack=5\n";
        let mut loaded = ParameterSet::default();
        let report = loaded
            .from_profile_str(text, &PathContext::verbatim(), None)
            .unwrap();

        assert_eq!(report.status, LoadStatus::PartialDefaults);
        assert_eq!(report.fallbacks, vec![SCHEMA_VERSION_FIELD]);
        assert_eq!(report.file_schema_version, CURRENT_SCHEMA_VERSION);
        assert!(report.migrations_applied.is_empty());
        assert_eq!(loaded.tone_curve.black, 5);
    }
}
