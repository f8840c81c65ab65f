//! The parameter aggregate.
//!
//! [`ParameterSet`] owns one instance of every parameter group plus the
//! image metadata (rank, color label, trash flag, producer and schema
//! stamps, Exif/IPTC overrides). The set of groups is fixed here, in the
//! `parameter_groups!` table, which also fixes their persisted section
//! names and file order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::curve::CurveExpander;
use crate::edit_mask::{EditMask, FieldPath};
use crate::params::*;
use crate::value::ProfileValue;
use crate::{CURRENT_SCHEMA_VERSION, DEFAULT_APP_VERSION};

pub const VERSION_SECTION: &str = "Version";
pub const GENERAL_SECTION: &str = "General";
pub const EXIF_SECTION: &str = "Exif";
pub const IPTC_SECTION: &str = "IPTC";

pub const RANK: FieldPath = FieldPath::new(GENERAL_SECTION, "Rank");
pub const COLOR_LABEL: FieldPath = FieldPath::new(GENERAL_SECTION, "ColorLabel");
pub const IN_TRASH: FieldPath = FieldPath::new(GENERAL_SECTION, "InTrash");

/// The whole Exif override map, as one edit-mask leaf.
pub const EXIF_OVERRIDES: FieldPath = FieldPath::new(EXIF_SECTION, "*");
/// The whole IPTC override map, as one edit-mask leaf.
pub const IPTC_OVERRIDES: FieldPath = FieldPath::new(IPTC_SECTION, "*");

const GENERAL_FIELDS: [FieldPath; 3] = [RANK, COLOR_LABEL, IN_TRASH];

/// Every processing parameter of one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub tone_curve: ToneCurveParams,
    pub retinex: RetinexParams,
    pub lab_curve: LabCurveParams,
    pub rgb_curves: RgbCurvesParams,
    pub color_toning: ColorToningParams,
    pub sharpening: SharpeningParams,
    /// Sharpening applied after resize
    pub pr_sharpening: SharpeningParams,
    pub sharpen_edge: SharpenEdgeParams,
    pub sharpen_micro: SharpenMicroParams,
    pub vibrance: VibranceParams,
    pub white_balance: WbParams,
    pub color_appearance: ColorAppearanceParams,
    pub defringe: DefringeParams,
    pub impulse_denoise: ImpulseDenoiseParams,
    pub dirpyr_denoise: DirPyrDenoiseParams,
    pub epd: EpdParams,
    pub fattal: FattalToneMappingParams,
    pub shadows_highlights: ShadowsHighlightsParams,
    pub crop: CropParams,
    pub coarse: CoarseTransformParams,
    pub common_transform: CommonTransformParams,
    pub rotate: RotateParams,
    pub distortion: DistortionParams,
    pub lens_profile: LensProfParams,
    pub perspective: PerspectiveParams,
    pub gradient: GradientParams,
    pub pc_vignette: PcVignetteParams,
    pub ca_correction: CaCorrectionParams,
    pub vignetting: VignettingParams,
    pub channel_mixer: ChannelMixerParams,
    pub black_white: BlackWhiteParams,
    pub resize: ResizeParams,
    pub color_management: ColorManagementParams,
    pub wavelet: WaveletParams,
    pub dirpyr_equalizer: DirPyrEqualizerParams,
    pub hsv_equalizer: HsvEqualizerParams,
    pub film_simulation: FilmSimulationParams,
    pub raw: RawParams,

    /// Quality rank (0 to 5)
    pub rank: i32,
    pub color_label: i32,
    /// Soft-delete flag
    pub in_trash: bool,
    /// Producer of the parameters
    pub app_version: String,
    /// Schema version the parameters conform to
    pub schema_version: i32,
    /// Exif tag overrides, tag name to value
    pub exif: BTreeMap<String, String>,
    /// IPTC tag overrides, tag name to ordered values
    pub iptc: BTreeMap<String, Vec<String>>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            tone_curve: Default::default(),
            retinex: Default::default(),
            lab_curve: Default::default(),
            rgb_curves: Default::default(),
            color_toning: Default::default(),
            sharpening: Default::default(),
            pr_sharpening: SharpeningParams::post_resize(),
            sharpen_edge: Default::default(),
            sharpen_micro: Default::default(),
            vibrance: Default::default(),
            white_balance: Default::default(),
            color_appearance: Default::default(),
            defringe: Default::default(),
            impulse_denoise: Default::default(),
            dirpyr_denoise: Default::default(),
            epd: Default::default(),
            fattal: Default::default(),
            shadows_highlights: Default::default(),
            crop: Default::default(),
            coarse: Default::default(),
            common_transform: Default::default(),
            rotate: Default::default(),
            distortion: Default::default(),
            lens_profile: Default::default(),
            perspective: Default::default(),
            gradient: Default::default(),
            pc_vignette: Default::default(),
            ca_correction: Default::default(),
            vignetting: Default::default(),
            channel_mixer: Default::default(),
            black_white: Default::default(),
            resize: Default::default(),
            color_management: Default::default(),
            wavelet: Default::default(),
            dirpyr_equalizer: Default::default(),
            hsv_equalizer: Default::default(),
            film_simulation: Default::default(),
            raw: Default::default(),
            rank: 0,
            color_label: 0,
            in_trash: false,
            app_version: DEFAULT_APP_VERSION.to_string(),
            schema_version: CURRENT_SCHEMA_VERSION,
            exif: BTreeMap::new(),
            iptc: BTreeMap::new(),
        }
    }
}

/// Declares the persisted groups of [`ParameterSet`], in file order, and
/// generates the per-group visitation from that one list.
macro_rules! parameter_groups {
    ($($section:literal => $($path:ident).+ : $ty:ty),+ $(,)?) => {
        impl ParameterSet {
            const GROUPS: &'static [(&'static str, &'static [&'static str])] =
                &[$(($section, <$ty as ParamGroup>::KEYS)),+];

            /// Section names of the parameter groups, in file order.
            pub fn group_sections() -> impl Iterator<Item = &'static str> {
                Self::GROUPS.iter().map(|&(section, _)| section)
            }

            /// Every group's fields, keyed by section name, in file order.
            pub fn sections(&self) -> Vec<(&'static str, Vec<(&'static str, &dyn ProfileValue)>)> {
                vec![$(($section, self.$($path).+.fields())),+]
            }

            /// Mutable access to every group's fields, keyed by section name.
            pub fn sections_mut(
                &mut self,
            ) -> Vec<(&'static str, Vec<(&'static str, &mut dyn ProfileValue)>)> {
                vec![$(($section, self.$($path).+.fields_mut())),+]
            }

            fn groups_equal(&self, other: &Self) -> bool {
                $( self.$($path).+ == other.$($path).+ )&&+
            }

            fn diff_groups(&self, other: &Self, out: &mut Vec<FieldPath>) {
                $( self.$($path).+.diff_into(&other.$($path).+, $section, out); )+
            }

            fn overlay_groups(&self, dest: &mut Self, mask: &dyn EditMask) {
                $( self.$($path).+.overlay_onto(&mut dest.$($path).+, $section, mask); )+
            }

            /// Hand every curve of every group to `expander`.
            pub fn expand_curves(&self, expander: &mut dyn CurveExpander) {
                $( self.$($path).+.expand_curves($section, expander); )+
            }
        }
    };
}

parameter_groups! {
    "Exposure" => tone_curve: ToneCurveParams,
    "Retinex" => retinex: RetinexParams,
    "Luminance Curve" => lab_curve: LabCurveParams,
    "RGB Curves" => rgb_curves: RgbCurvesParams,
    "ColorToning" => color_toning: ColorToningParams,
    "Sharpening" => sharpening: SharpeningParams,
    "PostResizeSharpening" => pr_sharpening: SharpeningParams,
    "SharpenEdge" => sharpen_edge: SharpenEdgeParams,
    "SharpenMicro" => sharpen_micro: SharpenMicroParams,
    "Vibrance" => vibrance: VibranceParams,
    "White Balance" => white_balance: WbParams,
    "Color appearance" => color_appearance: ColorAppearanceParams,
    "Defringing" => defringe: DefringeParams,
    "Impulse Denoising" => impulse_denoise: ImpulseDenoiseParams,
    "Directional Pyramid Denoising" => dirpyr_denoise: DirPyrDenoiseParams,
    "EPD" => epd: EpdParams,
    "FattalToneMapping" => fattal: FattalToneMappingParams,
    "Shadows & Highlights" => shadows_highlights: ShadowsHighlightsParams,
    "Crop" => crop: CropParams,
    "Coarse Transformation" => coarse: CoarseTransformParams,
    "Common Properties for Transformations" => common_transform: CommonTransformParams,
    "Rotation" => rotate: RotateParams,
    "Distortion" => distortion: DistortionParams,
    "LensProfile" => lens_profile: LensProfParams,
    "Perspective" => perspective: PerspectiveParams,
    "Gradient" => gradient: GradientParams,
    "PCVignette" => pc_vignette: PcVignetteParams,
    "CACorrection" => ca_correction: CaCorrectionParams,
    "Vignetting Correction" => vignetting: VignettingParams,
    "Channel Mixer" => channel_mixer: ChannelMixerParams,
    "Black & White" => black_white: BlackWhiteParams,
    "Resize" => resize: ResizeParams,
    "Color Management" => color_management: ColorManagementParams,
    "Wavelet" => wavelet: WaveletParams,
    "Directional Pyramid Equalizer" => dirpyr_equalizer: DirPyrEqualizerParams,
    "HSV Equalizer" => hsv_equalizer: HsvEqualizerParams,
    "Film Simulation" => film_simulation: FilmSimulationParams,
    "RAW" => raw.common: RawCommonParams,
    "RAW Bayer" => raw.bayer: BayerSensorParams,
    "RAW X-Trans" => raw.xtrans: XTransSensorParams,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every group and all metadata to the baseline.
    pub fn set_defaults(&mut self) {
        *self = Self::default();
    }

    /// Every maskable leaf: the `[General]` fields, every group field, and
    /// one leaf each for the Exif and IPTC override maps.
    pub fn field_paths() -> impl Iterator<Item = FieldPath> {
        let groups = Self::GROUPS.iter().flat_map(|&(section, keys)| {
            keys.iter().map(move |&key| FieldPath::new(section, key))
        });
        GENERAL_FIELDS
            .into_iter()
            .chain(groups)
            .chain([EXIF_OVERRIDES, IPTC_OVERRIDES])
    }

    pub(crate) fn general_fields(&self) -> [(FieldPath, &dyn ProfileValue); 3] {
        [
            (RANK, &self.rank as &dyn ProfileValue),
            (COLOR_LABEL, &self.color_label as &dyn ProfileValue),
            (IN_TRASH, &self.in_trash as &dyn ProfileValue),
        ]
    }

    pub(crate) fn general_fields_mut(&mut self) -> [(FieldPath, &mut dyn ProfileValue); 3] {
        [
            (RANK, &mut self.rank as &mut dyn ProfileValue),
            (COLOR_LABEL, &mut self.color_label as &mut dyn ProfileValue),
            (IN_TRASH, &mut self.in_trash as &mut dyn ProfileValue),
        ]
    }

    /// Fields whose values differ from `other`, in file order.
    ///
    /// Uses the same comparison as `==`, so the result is empty exactly when
    /// the two sets are equal.
    pub fn changed_fields(&self, other: &Self) -> Vec<FieldPath> {
        let mut out = Vec::new();
        if self.rank != other.rank {
            out.push(RANK);
        }
        if self.color_label != other.color_label {
            out.push(COLOR_LABEL);
        }
        if self.in_trash != other.in_trash {
            out.push(IN_TRASH);
        }
        self.diff_groups(other, &mut out);
        if self.exif != other.exif {
            out.push(EXIF_OVERRIDES);
        }
        if self.iptc != other.iptc {
            out.push(IPTC_OVERRIDES);
        }
        out
    }

    /// Copy the fields marked in `mask` onto `dest`. Override maps are
    /// copied as a whole.
    pub fn overlay_onto(&self, dest: &mut Self, mask: &dyn EditMask) {
        if mask.is_edited(RANK) {
            dest.rank = self.rank;
        }
        if mask.is_edited(COLOR_LABEL) {
            dest.color_label = self.color_label;
        }
        if mask.is_edited(IN_TRASH) {
            dest.in_trash = self.in_trash;
        }
        self.overlay_groups(dest, mask);
        if mask.is_edited(EXIF_OVERRIDES) {
            dest.exif = self.exif.clone();
        }
        if mask.is_edited(IPTC_OVERRIDES) {
            dest.iptc = self.iptc.clone();
        }
    }
}

/// Compares every group and the metadata; `app_version` and
/// `schema_version` are ignored.
impl PartialEq for ParameterSet {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
            && self.color_label == other.color_label
            && self.in_trash == other.in_trash
            && self.groups_equal(other)
            && self.exif == other.exif
            && self.iptc == other.iptc
    }
}
