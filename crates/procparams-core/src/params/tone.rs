//! Tone and luminance stages: exposure, retinex, Lab and RGB curves,
//! local tone mapping and shadows/highlights.

use crate::curve::{self, DiagonalCurve, FlatCurve};

// ============================================================================
// Exposure / tone curve
// ============================================================================

profile_enum! {
    /// How a tone curve is applied to the RGB channels.
    pub enum ToneCurveMode {
        /// Curve applied to each channel individually.
        Standard => "Standard",
        WeightedStandard => "WeightedStd",
        FilmLike => "FilmLike",
        SatAndValueBlending => "SatAndValueBlending",
        /// Luminance channel only, Rec. 709 weights.
        Luminance => "Luminance",
        Perceptual => "Perceptual",
    }
    default = Standard;
}

profile_enum! {
    /// Highlight reconstruction method.
    pub enum HlRecoveryMethod {
        Luminance => "Luminance",
        CieLabBlending => "CIELab blending",
        Color => "Color",
        Blend => "Blend",
    }
    default = Blend;
}

param_group! {
    /// Exposure, tone curves and highlight reconstruction.
    pub struct ToneCurveParams {
        /// Automatic exposure levels
        auto_exposure: bool = false => "Auto",
        /// Clipped fraction targeted by automatic levels
        clip: f64 = 0.02 => "Clip",
        /// Exposure compensation in EV (-5 to 12)
        exposure_compensation: f64 = 0.0 => "Compensation",
        brightness: i32 = 0 => "Brightness",
        contrast: i32 = 0 => "Contrast",
        saturation: i32 = 0 => "Saturation",
        black: i32 = 0 => "Black",
        highlight_compression: i32 = 0 => "HighlightCompr",
        highlight_compression_threshold: i32 = 33 => "HighlightComprThreshold",
        shadow_compression: i32 = 50 => "ShadowCompr",
        hl_recovery_enabled: bool = false => "HLRecoveryEnabled",
        hl_recovery_method: HlRecoveryMethod = HlRecoveryMethod::Blend => "HLRecoveryMethod",
        curve_mode: ToneCurveMode = ToneCurveMode::Standard => "CurveMode",
        curve_mode2: ToneCurveMode = ToneCurveMode::Standard => "CurveMode2",
        curve: DiagonalCurve = DiagonalCurve::linear() => "Curve",
        curve2: DiagonalCurve = DiagonalCurve::linear() => "Curve2",
    }
}

/// Samples in an end bin above which highlights are considered clipped.
const CLIPPED_BIN_LIMIT: u32 = 50;

impl ToneCurveParams {
    /// Whether the raw histograms show enough clipping to warrant highlight
    /// reconstruction: any channel with more than 50 samples in its first
    /// or last bin.
    pub fn hl_reconstruction_necessary(
        red: &[u32; 256],
        green: &[u32; 256],
        blue: &[u32; 256],
    ) -> bool {
        [red, green, blue]
            .iter()
            .any(|hist| hist[0] > CLIPPED_BIN_LIMIT || hist[255] > CLIPPED_BIN_LIMIT)
    }
}

// ============================================================================
// Retinex
// ============================================================================

profile_enum! {
    pub enum RetinexMethod {
        Uniform => "uni",
        Low => "low",
        High => "high",
        Highlights => "highli",
    }
    default = High;
}

profile_enum! {
    pub enum RetinexColorSpace {
        Lab => "Lab",
        HslLog => "HSLLOG",
        HslLinear => "HSLLIN",
    }
    default = Lab;
}

profile_enum! {
    pub enum RetinexGamma {
        None => "none",
        Low => "low",
        Mid => "mid",
        High => "hig",
        Free => "fre",
    }
    default = None;
}

profile_enum! {
    pub enum RetinexMapMethod {
        None => "none",
        Curve => "curv",
        Gaussian => "gaus",
        Mapping => "map",
    }
    default = None;
}

profile_enum! {
    pub enum RetinexViewMethod {
        None => "none",
        Unsharp => "unsharp",
        Mask => "mask",
        Transmission => "tran",
        Transmission2 => "tran2",
    }
    default = None;
}

param_group! {
    /// Retinex local contrast and dehaze.
    pub struct RetinexParams {
        enabled: bool = false => "Enabled",
        strength: i32 = 20 => "Str",
        scale: i32 = 3 => "Scal",
        iterations: i32 = 1 => "Iter",
        gradient: i32 = 1 => "Grad",
        gradient_strength: i32 = 1 => "Grads",
        gamma: f64 = 1.3 => "Gam",
        slope: f64 = 3.0 => "Slope",
        median_map: bool = false => "Median",
        neighbors: i32 = 80 => "Neigh",
        offset: i32 = 0 => "Offs",
        variance: i32 = 200 => "Vart",
        limit_dilation: i32 = 8 => "Limd",
        highlight_limit: i32 = 4 => "highl",
        skal: i32 = 3 => "skal",
        method: RetinexMethod = RetinexMethod::High => "RetinexMethod",
        map_method: RetinexMapMethod = RetinexMapMethod::None => "mapMethod",
        view_method: RetinexViewMethod = RetinexViewMethod::None => "viewMethod",
        color_space: RetinexColorSpace = RetinexColorSpace::Lab => "Retinexcolorspace",
        gamma_method: RetinexGamma = RetinexGamma::None => "Gammaretinex",
        highlights: i32 = 0 => "Highlights",
        highlight_tonal_width: i32 = 80 => "HighlightTonalWidth",
        shadows: i32 = 0 => "Shadows",
        shadow_tonal_width: i32 = 80 => "ShadowTonalWidth",
        radius: i32 = 40 => "Radius",
        cd_curve: DiagonalCurve = DiagonalCurve::linear() => "CDCurve",
        cd_h_curve: DiagonalCurve = DiagonalCurve::linear() => "CDHCurve",
        lh_curve: FlatCurve = FlatCurve::linear() => "LHCurve",
        map_curve: DiagonalCurve = DiagonalCurve::linear() => "MAPCurve",
        transmission_curve: FlatCurve = FlatCurve::from_table(curve::RETINEX_TRANSMISSION) => "TransmissionCurve",
        gain_transmission_curve: FlatCurve = FlatCurve::from_table(curve::RETINEX_GAIN_TRANSMISSION) => "GainTransmissionCurve",
    }
}

// ============================================================================
// Lab adjustments
// ============================================================================

param_group! {
    /// CIELab luminance/chromaticity adjustments and curves.
    pub struct LabCurveParams {
        brightness: i32 = 0 => "Brightness",
        contrast: i32 = 0 => "Contrast",
        chromaticity: i32 = 0 => "Chromaticity",
        avoid_color_shift: bool = false => "AvoidColorShift",
        /// Red and skin-tone protection (0 to 100)
        rst_protection: f64 = 0.0 => "RedAndSkinTonesProtection",
        /// Restrict LC modulation to red and skin tones
        lc_red_skin: bool = true => "LCredsk",
        l_curve: DiagonalCurve = DiagonalCurve::linear() => "LCurve",
        a_curve: DiagonalCurve = DiagonalCurve::linear() => "aCurve",
        b_curve: DiagonalCurve = DiagonalCurve::linear() => "bCurve",
        cc_curve: DiagonalCurve = DiagonalCurve::linear() => "ccCurve",
        ch_curve: FlatCurve = FlatCurve::linear() => "chCurve",
        lh_curve: FlatCurve = FlatCurve::linear() => "lhCurve",
        hh_curve: FlatCurve = FlatCurve::linear() => "hhCurve",
        lc_curve: DiagonalCurve = DiagonalCurve::linear() => "LcCurve",
        cl_curve: DiagonalCurve = DiagonalCurve::linear() => "ClCurve",
    }
}

param_group! {
    /// Per-channel RGB curves.
    pub struct RgbCurvesParams {
        luma_mode: bool = false => "LumaMode",
        r_curve: DiagonalCurve = DiagonalCurve::linear() => "rCurve",
        g_curve: DiagonalCurve = DiagonalCurve::linear() => "gCurve",
        b_curve: DiagonalCurve = DiagonalCurve::linear() => "bCurve",
    }
}

// ============================================================================
// Local tone mapping
// ============================================================================

param_group! {
    /// Edge-preserving decomposition tone mapping.
    pub struct EpdParams {
        enabled: bool = false => "Enabled",
        strength: f64 = 0.5 => "Strength",
        gamma: f64 = 1.0 => "Gamma",
        edge_stopping: f64 = 1.4 => "EdgeStopping",
        scale: f64 = 1.0 => "Scale",
        reweighting_iterates: i32 = 0 => "ReweightingIterates",
    }
}

param_group! {
    /// Fattal et al. 2002 dynamic range compression.
    pub struct FattalToneMappingParams {
        enabled: bool = false => "Enabled",
        threshold: i32 = 0 => "Threshold",
        amount: i32 = 30 => "Amount",
    }
}

param_group! {
    pub struct ShadowsHighlightsParams {
        enabled: bool = false => "Enabled",
        high_quality: bool = false => "HighQuality",
        highlights: i32 = 0 => "Highlights",
        highlight_tonal_width: i32 = 80 => "HighlightTonalWidth",
        shadows: i32 = 0 => "Shadows",
        shadow_tonal_width: i32 = 80 => "ShadowTonalWidth",
        local_contrast: i32 = 0 => "LocalContrast",
        radius: i32 = 40 => "Radius",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamGroup;

    #[test]
    fn test_hl_reconstruction_clean_histograms() {
        let hist = [10_u32; 256];
        assert!(!ToneCurveParams::hl_reconstruction_necessary(
            &hist, &hist, &hist
        ));
    }

    #[test]
    fn test_hl_reconstruction_clipped_top_bin() {
        let clean = [0_u32; 256];
        let mut clipped = [0_u32; 256];
        clipped[255] = 51;
        assert!(ToneCurveParams::hl_reconstruction_necessary(
            &clean, &clipped, &clean
        ));
    }

    #[test]
    fn test_hl_reconstruction_limit_is_exclusive() {
        let clean = [0_u32; 256];
        let mut edge = [0_u32; 256];
        edge[0] = 50;
        assert!(!ToneCurveParams::hl_reconstruction_necessary(
            &edge, &clean, &clean
        ));
    }

    #[test]
    fn test_retinex_defaults_use_builtin_curves() {
        let retinex = RetinexParams::default();
        assert!(!retinex.transmission_curve.is_linear());
        assert!(!retinex.gain_transmission_curve.is_linear());
        assert_eq!(retinex.method, RetinexMethod::High);
    }

    #[test]
    fn test_tone_curve_defaults() {
        let tone = ToneCurveParams::default();
        assert!(tone.curve.is_linear());
        assert_eq!(tone.shadow_compression, 50);
        assert_eq!(ToneCurveParams::KEYS.len(), tone.fields().len());
    }
}
