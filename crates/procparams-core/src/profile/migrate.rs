//! Schema migrations.
//!
//! Each rule applies to files whose schema version is lower than the rule's
//! `before` version. Document rules rewrite the parsed text before any field
//! is decoded, so renamed keys and retired values are read as their modern
//! equivalents. Parameter rules run on the decoded set afterwards, for
//! changes that depend on several fields at once.
//!
//! Rules run in ascending `before` order and every rule is a no-op on data
//! it has already migrated.

use tracing::info;

use crate::edit_mask::{EditMask, FieldPath};
use crate::keyfile::KeyFile;
use crate::param_set::ParameterSet;
use crate::params::LensCorrectionMode;
use crate::CURRENT_SCHEMA_VERSION;

struct DocumentRule {
    before: i32,
    name: &'static str,
    apply: fn(&mut KeyFile),
}

struct ParamRule {
    before: i32,
    name: &'static str,
    /// Fields marked present when the rule changes something
    touches: &'static [FieldPath],
    apply: fn(&mut ParameterSet) -> bool,
}

const DOCUMENT_RULES: &[DocumentRule] = &[
    DocumentRule {
        before: 302,
        name: "sharpening-threshold-range",
        apply: sharpening_threshold_range,
    },
    DocumentRule {
        before: 302,
        name: "vibrance-threshold-range",
        apply: vibrance_threshold_range,
    },
    DocumentRule {
        before: 303,
        name: "lab-chromaticity-keys",
        apply: lab_chromaticity_keys,
    },
    DocumentRule {
        before: 320,
        name: "retired-demosaic-methods",
        apply: retired_demosaic_methods,
    },
];

const PARAM_RULES: &[ParamRule] = &[ParamRule {
    before: 327,
    name: "lcp-file-implies-lcp-mode",
    touches: &[FieldPath::new("LensProfile", "LcMode")],
    apply: lcp_file_implies_lcp_mode,
}];

/// Upper bound of the legacy single-value sharpening threshold.
const LEGACY_THRESHOLD_MAX: i32 = 2000;

// ============================================================================
// Document rules
// ============================================================================

/// Parse a legacy single-integer value. Already migrated lists do not parse.
fn legacy_scalar(doc: &KeyFile, section: &str, key: &str) -> Option<i32> {
    doc.get(section, key)?.trim().parse().ok()
}

fn sharpening_threshold_range(doc: &mut KeyFile) {
    for section in ["Sharpening", "PostResizeSharpening"] {
        if let Some(t) = legacy_scalar(doc, section, "Threshold") {
            let t = t.clamp(0, LEGACY_THRESHOLD_MAX);
            let max = LEGACY_THRESHOLD_MAX;
            doc.set(section, "Threshold", format!("{t};{t};{max};{max};"));
        }
    }
}

fn vibrance_threshold_range(doc: &mut KeyFile) {
    if let Some(t) = legacy_scalar(doc, "Vibrance", "PSThreshold") {
        doc.set("Vibrance", "PSThreshold", format!("{t};{t};"));
    }
}

fn lab_chromaticity_keys(doc: &mut KeyFile) {
    doc.rename_key("Luminance Curve", "Saturation", "Chromaticity");
    doc.rename_key("Luminance Curve", "AvoidColorClipping", "AvoidColorShift");
}

fn retired_demosaic_methods(doc: &mut KeyFile) {
    let retired = [("RAW Bayer", "bilinear", "fast"), ("RAW X-Trans", "2-pass", "1-pass")];
    for (section, old, new) in retired {
        if doc.get(section, "Method").map(str::trim) == Some(old) {
            doc.set(section, "Method", new);
        }
    }
}

// ============================================================================
// Parameter rules
// ============================================================================

fn lcp_file_implies_lcp_mode(params: &mut ParameterSet) -> bool {
    let lens = &mut params.lens_profile;
    if lens.mode == LensCorrectionMode::None && !lens.lcp_file.as_os_str().is_empty() {
        lens.mode = LensCorrectionMode::Lcp;
        true
    } else {
        false
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Rewrite a parsed document written with `file_version`. Returns the names
/// of the rules that ran.
pub fn upgrade_document(doc: &mut KeyFile, file_version: i32) -> Vec<&'static str> {
    let mut applied = Vec::new();
    for rule in DOCUMENT_RULES.iter().filter(|rule| file_version < rule.before) {
        (rule.apply)(doc);
        info!(rule = rule.name, file_version, "applied profile migration");
        applied.push(rule.name);
    }
    applied
}

/// Bring decoded parameters up to the current schema.
///
/// Runs the parameter rules older than `params.schema_version`, marks the
/// fields they change in `mask`, then stamps `schema_version` with the
/// current version (or keeps a newer one). Running it again is a no-op.
pub fn upgrade(params: &mut ParameterSet, mut mask: Option<&mut dyn EditMask>) -> Vec<&'static str> {
    let mut applied = Vec::new();
    let version = params.schema_version;
    for rule in PARAM_RULES.iter().filter(|rule| version < rule.before) {
        if (rule.apply)(params) {
            info!(rule = rule.name, file_version = version, "applied profile migration");
            if let Some(mask) = mask.as_deref_mut() {
                for &field in rule.touches {
                    mask.mark(field, true);
                }
            }
            applied.push(rule.name);
        }
    }
    params.schema_version = version.max(CURRENT_SCHEMA_VERSION);
    applied
}
