//! Color stages: toning, vibrance, color appearance, mixers, black and
//! white conversion, color management, HSV equalizer and film simulation.

use std::path::PathBuf;

use crate::curve::{self, DiagonalCurve, FlatCurve};
use crate::threshold::ThresholdCurve;

// ============================================================================
// Color toning
// ============================================================================

profile_enum! {
    pub enum ColorToningMethod {
        Lab => "Lab",
        Lch => "Lch",
        RgbSliders => "RGBSliders",
        RgbCurves => "RGBCurves",
        SplitColor => "Splitco",
        SplitBalance => "Splitbal",
        SplitLuminance => "Splitlr",
    }
    default = Lab;
}

profile_enum! {
    /// Which color curves the toning uses.
    pub enum ColorToningTwoColor {
        Standard => "Std",
        All => "All",
        Separate => "Separ",
        Two => "Two",
    }
    default = Standard;
}

param_group! {
    pub struct ColorToningParams {
        enabled: bool = false => "Enabled",
        method: ColorToningMethod = ColorToningMethod::Lab => "Method",
        luma_mode: bool = true => "Lumamode",
        two_color: ColorToningTwoColor = ColorToningTwoColor::Standard => "Twocolor",
        opacity_curve: FlatCurve = FlatCurve::from_table(curve::COLOR_TONING_OPACITY) => "OpacityCurve",
        color_curve: FlatCurve = FlatCurve::from_table(curve::COLOR_TONING_COLOR) => "ColorCurve",
        sat_protection_threshold: i32 = 30 => "SatProtectionThreshold",
        saturated_opacity: i32 = 80 => "SaturatedOpacity",
        strength: i32 = 50 => "Strength",
        balance: i32 = 0 => "Balance",
        /// Saturation range applied to highlights
        highlights_color_saturation: ThresholdCurve<i32> = ThresholdCurve::single(60, 80, false) => "HighlightsColorSaturation",
        /// Saturation range applied to shadows
        shadows_color_saturation: ThresholdCurve<i32> = ThresholdCurve::single(80, 208, false) => "ShadowsColorSaturation",
        cl_curve: DiagonalCurve = DiagonalCurve::from_table(curve::COLOR_TONING_CL) => "ClCurve",
        cl2_curve: DiagonalCurve = DiagonalCurve::from_table(curve::COLOR_TONING_CL2) => "Cl2Curve",
        red_low: f64 = 0.0 => "Redlow",
        green_low: f64 = 0.0 => "Greenlow",
        blue_low: f64 = 0.0 => "Bluelow",
        red_mid: f64 = 0.0 => "Redmed",
        green_mid: f64 = 0.0 => "Greenmed",
        blue_mid: f64 = 0.0 => "Bluemed",
        red_high: f64 = 0.0 => "Redhigh",
        green_high: f64 = 0.0 => "Greenhigh",
        blue_high: f64 = 0.0 => "Bluehigh",
        sat_low: f64 = 0.0 => "Satlow",
        sat_high: f64 = 0.0 => "Sathigh",
        auto_saturation: bool = true => "Autosat",
    }
}

// ============================================================================
// Vibrance
// ============================================================================

param_group! {
    pub struct VibranceParams {
        enabled: bool = false => "Enabled",
        /// Saturation boost for pastel tones (-100 to 100)
        pastels: i32 = 0 => "Pastels",
        /// Saturation boost for saturated tones (-100 to 100)
        saturated: i32 = 0 => "Saturated",
        /// Boundary between pastel and saturated tones
        ps_threshold: ThresholdCurve<i32> = ThresholdCurve::single(0, 75, false) => "PSThreshold",
        protect_skins: bool = false => "ProtectSkins",
        avoid_color_shift: bool = true => "AvoidColorShift",
        /// Link pastels and saturated
        pastels_saturated_linked: bool = true => "PastSatTog",
        skin_tones_curve: DiagonalCurve = DiagonalCurve::linear() => "SkinTonesCurve",
    }
}

// ============================================================================
// Color appearance (CIECAM02)
// ============================================================================

profile_enum! {
    pub enum CamToneCurveMode {
        Lightness => "Lightness",
        Brightness => "Brightness",
    }
    default = Lightness;
}

profile_enum! {
    pub enum CamColorCurveMode {
        Chroma => "Chroma",
        Saturation => "Saturation",
        Colorfulness => "Colorfullness",
    }
    default = Chroma;
}

profile_enum! {
    pub enum CamSurround {
        Average => "Average",
        Dim => "Dim",
        Dark => "Dark",
        ExtremelyDark => "ExtremelyDark",
    }
    default = Average;
}

profile_enum! {
    pub enum CamWhiteBalanceModel {
        RawTherapee => "RawT",
        RawTherapeeCat02 => "RawTCAT02",
    }
    default = RawTherapee;
}

profile_enum! {
    pub enum CamAlgorithm {
        LightnessChroma => "JC",
        LightnessSaturation => "JS",
        BrightnessColorfulness => "QM",
        All => "ALL",
    }
    default = LightnessChroma;
}

param_group! {
    /// CIECAM02 color appearance model.
    pub struct ColorAppearanceParams {
        enabled: bool = false => "Enabled",
        degree: i32 = 90 => "Degree",
        auto_degree: bool = true => "AutoDegree",
        degree_out: i32 = 90 => "Degreeout",
        auto_degree_out: bool = true => "AutoDegreeout",
        surround: CamSurround = CamSurround::Average => "Surround",
        surround_source: CamSurround = CamSurround::Average => "Surrsrc",
        adapt_luminance: f64 = 16.0 => "AdaptLum",
        bad_pixel_suppression: i32 = 0 => "Badpixsl",
        wb_model: CamWhiteBalanceModel = CamWhiteBalanceModel::RawTherapee => "Model",
        algorithm: CamAlgorithm = CamAlgorithm::LightnessChroma => "Algorithm",
        lightness: f64 = 0.0 => "J-Light",
        brightness: f64 = 0.0 => "Q-Bright",
        chroma: f64 = 0.0 => "C-Chroma",
        saturation: f64 = 0.0 => "S-Chroma",
        colorfulness: f64 = 0.0 => "M-Chroma",
        contrast: f64 = 0.0 => "J-Contrast",
        brightness_contrast: f64 = 0.0 => "Q-Contrast",
        hue: f64 = 0.0 => "H-Hue",
        rst_protection: f64 = 0.0 => "RSTProtection",
        adapt_scene: f64 = 2000.0 => "AdaptScene",
        auto_adapt_scene: bool = true => "AutoAdapscen",
        yb_scene: i32 = 18 => "YbScene",
        auto_yb_scene: bool = true => "Autoybscen",
        surround_from_source: bool = false => "SurrSource",
        gamut: bool = true => "Gamut",
        data_cie: bool = false => "Datacie",
        tone_cie: bool = false => "Tonecie",
        curve_mode: CamToneCurveMode = CamToneCurveMode::Lightness => "CurveMode",
        curve_mode2: CamToneCurveMode = CamToneCurveMode::Lightness => "CurveMode2",
        curve_mode3: CamColorCurveMode = CamColorCurveMode::Chroma => "CurveMode3",
        curve: DiagonalCurve = DiagonalCurve::linear() => "Curve",
        curve2: DiagonalCurve = DiagonalCurve::linear() => "Curve2",
        curve3: DiagonalCurve = DiagonalCurve::linear() => "Curve3",
        temp_out: i32 = 5000 => "Tempout",
        green_out: f64 = 1.0 => "Greenout",
        temp_scene: i32 = 5000 => "Tempsc",
        green_scene: f64 = 1.0 => "Greensc",
        yb_out: i32 = 18 => "Ybout",
    }
}

// ============================================================================
// Mixers and black & white
// ============================================================================

param_group! {
    /// RGB channel mixer, in percent of each source channel.
    pub struct ChannelMixerParams {
        red: [i32; 3] = [100, 0, 0] => "Red",
        green: [i32; 3] = [0, 100, 0] => "Green",
        blue: [i32; 3] = [0, 0, 100] => "Blue",
    }
}

profile_enum! {
    pub enum BlackWhiteMethod {
        Desaturation => "Desaturation",
        LuminanceEqualizer => "LumEqualizer",
        ChannelMixer => "ChannelMixer",
    }
    default = Desaturation;
}

profile_enum! {
    pub enum BlackWhiteCurveMode {
        Standard => "Standard",
        WeightedStandard => "WeightedStd",
        FilmLike => "FilmLike",
        SatAndValueBlending => "SatAndValueBlending",
    }
    default = Standard;
}

profile_enum! {
    pub enum BlackWhiteAlgorithm {
        Linear => "LI",
        SpecialProcessing => "SP",
    }
    default = SpecialProcessing;
}

param_group! {
    pub struct BlackWhiteParams {
        enabled: bool = false => "Enabled",
        method: BlackWhiteMethod = BlackWhiteMethod::Desaturation => "Method",
        auto: bool = false => "Auto",
        complementary_colors: bool = true => "ComplementaryColors",
        /// Channel mixer preset name
        setting: String = String::from("NormalContrast") => "Setting",
        /// Color filter preset name
        filter: String = String::from("None") => "Filter",
        mixer_red: i32 = 33 => "MixerRed",
        mixer_orange: i32 = 33 => "MixerOrange",
        mixer_yellow: i32 = 33 => "MixerYellow",
        mixer_green: i32 = 33 => "MixerGreen",
        mixer_cyan: i32 = 33 => "MixerCyan",
        mixer_blue: i32 = 33 => "MixerBlue",
        mixer_magenta: i32 = 33 => "MixerMagenta",
        mixer_purple: i32 = 33 => "MixerPurple",
        gamma_red: i32 = 0 => "GammaRed",
        gamma_green: i32 = 0 => "GammaGreen",
        gamma_blue: i32 = 0 => "GammaBlue",
        algorithm: BlackWhiteAlgorithm = BlackWhiteAlgorithm::SpecialProcessing => "Algorithm",
        luminance_curve: FlatCurve = FlatCurve::linear() => "LuminanceCurve",
        before_curve_mode: BlackWhiteCurveMode = BlackWhiteCurveMode::Standard => "BeforeCurveMode",
        after_curve_mode: BlackWhiteCurveMode = BlackWhiteCurveMode::Standard => "AfterCurveMode",
        before_curve: DiagonalCurve = DiagonalCurve::linear() => "BeforeCurve",
        after_curve: DiagonalCurve = DiagonalCurve::linear() => "AfterCurve",
    }
}

// ============================================================================
// Color management
// ============================================================================

profile_enum! {
    /// ICC rendering intent for the output profile.
    pub enum RenderingIntent {
        Perceptual => "Perceptual",
        Relative => "Relative",
        Saturation => "Saturation",
        Absolute => "Absolute",
    }
    default = Relative;
}

param_group! {
    /// Input, working and output color spaces.
    pub struct ColorManagementParams {
        /// Input profile name or `(cameraICC)`, `(camera)`, `(none)`
        input_profile: String = String::from("(cameraICC)") => "InputProfile",
        tone_curve: bool = false => "ToneCurve",
        apply_look_table: bool = false => "ApplyLookTable",
        apply_baseline_exposure_offset: bool = true => "ApplyBaselineExposureOffset",
        apply_hue_sat_map: bool = true => "ApplyHueSatMap",
        dcp_illuminant: i32 = 0 => "DCPIlluminant",
        working_profile: String = String::from("ProPhoto") => "WorkingProfile",
        output_profile: String = String::from("RT_sRGB") => "OutputProfile",
        output_intent: RenderingIntent = RenderingIntent::Relative => "OutputProfileIntent",
        output_bpc: bool = true => "OutputBPC",
        gamma: String = String::from("default") => "Gammafree",
        free_gamma: bool = false => "Freegamma",
        gamma_value: f64 = 2.22 => "GammaValue",
        gamma_slope: f64 = 4.5 => "GammaSlope",
    }
}

// ============================================================================
// HSV equalizer and film simulation
// ============================================================================

param_group! {
    pub struct HsvEqualizerParams {
        h_curve: FlatCurve = FlatCurve::linear() => "HCurve",
        s_curve: FlatCurve = FlatCurve::linear() => "SCurve",
        v_curve: FlatCurve = FlatCurve::linear() => "VCurve",
    }
}

param_group! {
    /// Hald CLUT film simulation.
    pub struct FilmSimulationParams {
        enabled: bool = false => "Enabled",
        clut_filename: PathBuf = PathBuf::new() => "ClutFilename",
        /// Blend strength in percent
        strength: i32 = 100 => "Strength",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_toning_default_curves() {
        let toning = ColorToningParams::default();
        assert_eq!(toning.color_curve.points(), curve::COLOR_TONING_COLOR);
        assert_eq!(toning.cl_curve.points()[0], 3.0);
        assert_eq!(toning.highlights_color_saturation.to_control_points(), vec![60, 80]);
    }

    #[test]
    fn test_channel_mixer_identity() {
        let mixer = ChannelMixerParams::default();
        assert_eq!(mixer.red, [100, 0, 0]);
        assert_eq!(mixer.green, [0, 100, 0]);
        assert_eq!(mixer.blue, [0, 0, 100]);
    }

    #[test]
    fn test_vibrance_threshold_is_single_sided() {
        let vibrance = VibranceParams::default();
        assert!(!vibrance.ps_threshold.is_double_sided());
        assert_eq!(vibrance.ps_threshold.evaluate(75, 1.0), 1.0);
    }

    #[test]
    fn test_rendering_intent_names() {
        let names: Vec<_> = RenderingIntent::ALL.iter().map(|i| i.as_str()).collect();
        assert_eq!(names, ["Perceptual", "Relative", "Saturation", "Absolute"]);
    }
}
