//! Detail stages: sharpening, defringing, denoising, wavelet levels and the
//! directional pyramid equalizer.

use crate::curve::{self, DiagonalCurve, FlatCurve};
use crate::threshold::ThresholdCurve;

// ============================================================================
// Sharpening
// ============================================================================

profile_enum! {
    pub enum SharpeningMethod {
        /// Unsharp mask
        UnsharpMask => "usm",
        /// Richardson-Lucy deconvolution
        Deconvolution => "rld",
    }
    default = UnsharpMask;
}

param_group! {
    /// Sharpening, used both before and after resizing.
    pub struct SharpeningParams {
        enabled: bool = false => "Enabled",
        method: SharpeningMethod = SharpeningMethod::UnsharpMask => "Method",
        radius: f64 = 0.5 => "Radius",
        amount: i32 = 200 => "Amount",
        /// Contrast range the unsharp mask is applied to
        threshold: ThresholdCurve<i32> = ThresholdCurve::double(20, 80, 2000, 1200, false) => "Threshold",
        edges_only: bool = false => "OnlyEdges",
        edges_radius: f64 = 1.9 => "EdgedetectionRadius",
        edges_tolerance: i32 = 1800 => "EdgeTolerance",
        halo_control: bool = false => "HalocontrolEnabled",
        halo_control_amount: i32 = 85 => "HalocontrolAmount",
        deconv_radius: f64 = 0.75 => "DeconvRadius",
        deconv_amount: i32 = 75 => "DeconvAmount",
        deconv_damping: i32 = 20 => "DeconvDamping",
        deconv_iterations: i32 = 30 => "DeconvIterations",
    }
}

impl SharpeningParams {
    /// Baseline for sharpening applied after resize: deconvolution tuned
    /// for downscaled output.
    pub fn post_resize() -> Self {
        Self {
            method: SharpeningMethod::Deconvolution,
            deconv_radius: 0.45,
            deconv_amount: 100,
            deconv_damping: 0,
            deconv_iterations: 100,
            ..Self::default()
        }
    }
}

param_group! {
    pub struct SharpenEdgeParams {
        enabled: bool = false => "Enabled",
        passes: i32 = 2 => "Passes",
        amount: f64 = 50.0 => "Strength",
        three_channels: bool = false => "ThreeChannels",
    }
}

param_group! {
    /// Microcontrast sharpening.
    pub struct SharpenMicroParams {
        enabled: bool = false => "Enabled",
        /// Use a 5x5 matrix instead of 3x3
        matrix: bool = false => "Matrix",
        amount: f64 = 20.0 => "Strength",
        uniformity: f64 = 50.0 => "Uniformity",
    }
}

// ============================================================================
// Defringe and denoise
// ============================================================================

param_group! {
    pub struct DefringeParams {
        enabled: bool = false => "Enabled",
        radius: f64 = 2.0 => "Radius",
        threshold: f64 = 13.0 => "Threshold",
        /// Hue ranges the defringe is applied to
        hue_curve: FlatCurve = FlatCurve::from_table(curve::DEFRINGE_HUE) => "HueCurve",
    }
}

param_group! {
    pub struct ImpulseDenoiseParams {
        enabled: bool = false => "Enabled",
        threshold: i32 = 50 => "Threshold",
    }
}

profile_enum! {
    pub enum DenoiseColorSpace {
        Lab => "Lab",
        Rgb => "RGB",
    }
    default = Lab;
}

profile_enum! {
    pub enum DenoiseLumaMethod {
        Slider => "SLI",
        Curve => "CUR",
    }
    default = Slider;
}

profile_enum! {
    pub enum DenoiseChromaMethod {
        Manual => "MAN",
        Automatic => "AUT",
        Preview => "PRE",
        TilesWeighted => "PON",
    }
    default = Manual;
}

profile_enum! {
    pub enum DenoiseAutoChroma {
        Auto => "AUTO",
        Preview => "PREV",
        Manual => "MANU",
    }
    default = Auto;
}

profile_enum! {
    pub enum DenoiseQuality {
        Standard => "shal",
        High => "shbi",
    }
    default = Standard;
}

profile_enum! {
    /// Median filter kernel.
    pub enum MedianType {
        Soft => "soft",
        Size3x3 => "33",
        Soft5x5 => "55soft",
        Size5x5 => "55",
        Size7x7 => "77",
        Size9x9 => "99",
    }
    default = Soft;
}

profile_enum! {
    /// Channels the median filter runs on.
    pub enum MedianMethod {
        None => "none",
        LuminanceOnly => "Lonly",
        Lab => "Lab",
        ChromaOnly => "ab",
        Rgb => "RGB",
    }
    default = None;
}

param_group! {
    /// Wavelet noise reduction.
    pub struct DirPyrDenoiseParams {
        enabled: bool = false => "Enabled",
        enhance: bool = false => "Enhance",
        median: bool = false => "Median",
        perform: bool = false => "Perform",
        luma: f64 = 0.0 => "Luma",
        luma_detail: f64 = 0.0 => "Ldetail",
        chroma: f64 = 15.0 => "Chroma",
        red_chroma: f64 = 0.0 => "Redchro",
        blue_chroma: f64 = 0.0 => "Bluechro",
        gamma: f64 = 1.7 => "Gamma",
        color_space: DenoiseColorSpace = DenoiseColorSpace::Lab => "Method",
        luma_method: DenoiseLumaMethod = DenoiseLumaMethod::Slider => "LMethod",
        chroma_method: DenoiseChromaMethod = DenoiseChromaMethod::Manual => "CMethod",
        auto_chroma_method: DenoiseAutoChroma = DenoiseAutoChroma::Auto => "C2Method",
        quality: DenoiseQuality = DenoiseQuality::Standard => "SMethod",
        median_type: MedianType = MedianType::Soft => "MedMethod",
        median_method: MedianMethod = MedianMethod::None => "MethodMed",
        rgb_median_type: MedianType = MedianType::Soft => "RGBMethod",
        passes: i32 = 1 => "Passes",
        l_curve: FlatCurve = FlatCurve::from_table(curve::DENOISE_LUMA) => "LCurve",
        cc_curve: FlatCurve = FlatCurve::from_table(curve::DENOISE_CHROMA) => "CCCurve",
    }
}

// ============================================================================
// Wavelet levels
// ============================================================================

profile_enum! {
    pub enum WaveletTiles {
        Full => "full",
        Big => "big",
        Lit => "lit",
    }
    default = Full;
}

profile_enum! {
    /// Daubechies wavelet coefficient count.
    pub enum DaubechiesCoefficients {
        D2 => "2_",
        D4 => "4_",
        D6 => "6_",
        D10 => "10_",
        D14 => "14_",
    }
    default = D4;
}

profile_enum! {
    /// Background shown when previewing single levels.
    pub enum WaveletBackground {
        Black => "black",
        Grey => "grey",
        Residual => "resid",
    }
    default = Grey;
}

param_group! {
    /// Wavelet decomposition levels.
    pub struct WaveletParams {
        enabled: bool = false => "Enabled",
        strength: i32 = 100 => "Strength",
        balance: i32 = 0 => "Balance",
        iterations: i32 = 0 => "Iter",
        median: bool = false => "Median",
        median_levels: bool = false => "Medianlev",
        link_edges: bool = true => "Linkedg",
        cb_enabled: bool = false => "CBenab",
        cb_green_high: i32 = 0 => "CBgreenhigh",
        cb_green_mid: i32 = 0 => "CBgreenmed",
        cb_green_low: i32 = 0 => "CBgreenlow",
        cb_blue_high: i32 = 0 => "CBbluehigh",
        cb_blue_mid: i32 = 0 => "CBbluemed",
        cb_blue_low: i32 = 0 => "CBbluelow",
        lipst: bool = false => "Lipst",
        avoid_color_shift: bool = false => "AvoidColorShift",
        tone_mapping: bool = false => "TMr",
        exp_contrast: bool = false => "Expcontrast",
        exp_chroma: bool = false => "Expchroma",
        exp_edge: bool = false => "Expedge",
        exp_residual: bool = false => "Expresid",
        exp_final: bool = false => "Expfinal",
        exp_toning: bool = false => "Exptoning",
        exp_noise: bool = false => "Expnoise",
        /// Contrast per decomposition level
        level_contrast: [i32; 9] = [0; 9] => "LevelContrast",
        /// Chroma per decomposition level
        level_chroma: [i32; 9] = [0; 9] => "LevelChroma",
        /// Number of decomposition levels
        levels: String = String::from("4") => "LevMethod",
        level_choice: String = String::from("all") => "ChoiceLevMethod",
        background: WaveletBackground = WaveletBackground::Grey => "BackMethod",
        tiles: WaveletTiles = WaveletTiles::Full => "TilesMethod",
        daubechies: DaubechiesCoefficients = DaubechiesCoefficients::D4 => "DaubMethod",
        chroma_method: String = String::from("without") => "CHromaMethod",
        green_reinforcement: String = String::from("less") => "Medgreinf",
        chroma_slider_method: String = String::from("SL") => "CHSLromaMethod",
        edge_method: String = String::from("CU") => "EDMethod",
        noise_method: String = String::from("none") => "NPMethod",
        balance_method: String = String::from("none") => "BAMethod",
        tone_mapping_method: String = String::from("cont") => "TMMethod",
        direction_method: String = String::from("all") => "DirMethod",
        hue_skin_method: String = String::from("with") => "HSMethod",
        residual_shadows: i32 = 0 => "ResidualcontShadow",
        residual_highlights: i32 = 0 => "ResidualcontHighlight",
        residual_chroma: i32 = 0 => "Residualchroma",
        residual_tone_mapping: f64 = 0.0 => "ResidualTM",
        residual_gamma: f64 = 1.0 => "Residualgamma",
        final_contrast: i32 = 0 => "ContExtra",
        residual_sky: f64 = 0.0 => "HueRangeResidual",
        threshold_chroma_levels: i32 = 7 => "ThresholdResidHighLight",
        chroma: i32 = 5 => "ThresholdChroma",
        chroma_link: i32 = 0 => "ChromaLink",
        threshold: i32 = 5 => "Threshold",
        threshold2: i32 = 4 => "Threshold2",
        edge_detect: i32 = 90 => "Edgedetect",
        edge_detect_threshold: i32 = 20 => "Edgedetectthr",
        edge_detect_threshold2: i32 = 0 => "EdgedetectthrHi",
        edge_sensitivity: i32 = 60 => "Edgesensi",
        edge_amplification: i32 = 10 => "Edgeampli",
        contrast: i32 = 0 => "Contrast",
        edge_radius: i32 = 15 => "Edgrad",
        edge_value: i32 = 0 => "Edgval",
        edge_threshold: i32 = 10 => "ThrEdg",
        threshold_highlights: i32 = 35 => "ThresholdHighlight",
        threshold_shadows: i32 = 65 => "ThresholdShadow",
        skin_protection: f64 = 0.0 => "SkinProtection",
        hue_skin: ThresholdCurve<i32> = ThresholdCurve::double(-5, 25, 170, 120, false) => "Hueskin",
        hue_range: ThresholdCurve<i32> = ThresholdCurve::double(-260, -250, -130, -140, false) => "HueRange",
        highlight_levels: ThresholdCurve<i32> = ThresholdCurve::double(50, 75, 100, 98, false) => "HLRange",
        shadow_levels: ThresholdCurve<i32> = ThresholdCurve::double(0, 2, 50, 25, false) => "SHRange",
        pastel_levels: ThresholdCurve<i32> = ThresholdCurve::double(0, 2, 30, 20, false) => "Pastlev",
        saturated_levels: ThresholdCurve<i32> = ThresholdCurve::double(30, 45, 130, 100, false) => "Satlev",
        edge_contrast: ThresholdCurve<i32> = ThresholdCurve::double(0, 10, 75, 40, false) => "EdgCont",
        level0_noise: ThresholdCurve<f64> = ThresholdCurve::single(0.0, 0.0, false) => "Level0noise",
        level1_noise: ThresholdCurve<f64> = ThresholdCurve::single(0.0, 0.0, false) => "Level1noise",
        level2_noise: ThresholdCurve<f64> = ThresholdCurve::single(0.0, 0.0, false) => "Level2noise",
        level3_noise: ThresholdCurve<f64> = ThresholdCurve::single(0.0, 0.0, false) => "Level3noise",
        contrast_curve: FlatCurve = FlatCurve::from_table(curve::WAVELET_CONTRAST) => "ContrastCurve",
        opacity_curve_rg: FlatCurve = FlatCurve::from_table(curve::WAVELET_OPACITY_RG) => "OpacityCurveRG",
        opacity_curve_by: FlatCurve = FlatCurve::from_table(curve::WAVELET_OPACITY_BY) => "OpacityCurveBY",
        opacity_curve_w: FlatCurve = FlatCurve::from_table(curve::WAVELET_OPACITY_W) => "OpacityCurveW",
        opacity_curve_wl: FlatCurve = FlatCurve::from_table(curve::WAVELET_OPACITY_WL) => "OpacityCurveWL",
        hh_curve: FlatCurve = FlatCurve::linear() => "HHcurve",
        ch_curve: FlatCurve = FlatCurve::linear() => "CHcurve",
        cl_curve: DiagonalCurve = DiagonalCurve::linear() => "WavclCurve",
    }
}

// ============================================================================
// Directional pyramid equalizer
// ============================================================================

profile_enum! {
    /// Position of the equalizer relative to black and white conversion.
    pub enum CbdlMethod {
        BeforeBlackWhite => "bef",
        AfterBlackWhite => "aft",
    }
    default = BeforeBlackWhite;
}

param_group! {
    /// Contrast by detail levels.
    pub struct DirPyrEqualizerParams {
        enabled: bool = false => "Enabled",
        gamut_lab: bool = false => "Gamutlab",
        method: CbdlMethod = CbdlMethod::BeforeBlackWhite => "cbdlMethod",
        /// Multiplier per detail level, finest first
        multipliers: [f64; 6] = [1.0; 6] => "Mult",
        threshold: f64 = 0.2 => "Threshold",
        skin_protection: f64 = 0.0 => "Skinprotect",
        hue_skin: ThresholdCurve<i32> = ThresholdCurve::double(-5, 25, 170, 120, false) => "Hueskin",
    }
}
