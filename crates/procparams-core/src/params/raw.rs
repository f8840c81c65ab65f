//! Raw preprocessing and demosaicing, split by sensor family.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// Common raw preprocessing
// ============================================================================

profile_enum! {
    pub enum FlatFieldBlurType {
        Area => "Area Flatfield",
        Vertical => "Vertical Flatfield",
        Horizontal => "Horizontal Flatfield",
        VerticalHorizontal => "V+H Flatfield",
    }
    default = Area;
}

param_group! {
    /// Dark frame, flat field and pixel-level corrections shared by every
    /// sensor type.
    pub struct RawCommonParams {
        dark_frame: PathBuf = PathBuf::new() => "DarkFrame",
        dark_frame_auto: bool = false => "DarkFrameAuto",
        flat_field_file: PathBuf = PathBuf::new() => "FlatFieldFile",
        flat_field_auto_select: bool = false => "FlatFieldAutoSelect",
        flat_field_blur_radius: i32 = 32 => "FlatFieldBlurRadius",
        flat_field_blur_type: FlatFieldBlurType = FlatFieldBlurType::Area => "FlatFieldBlurType",
        flat_field_auto_clip_control: bool = false => "FlatFieldAutoClipControl",
        flat_field_clip_control: i32 = 0 => "FlatFieldClipControl",
        ca_auto_correct: bool = false => "CA",
        ca_red: f64 = 0.0 => "CARed",
        ca_blue: f64 = 0.0 => "CABlue",
        hot_pixel_filter: bool = false => "HotPixelFilter",
        dead_pixel_filter: bool = false => "DeadPixelFilter",
        hot_dead_pixel_threshold: i32 = 100 => "HotDeadPixelThresh",
        /// Linear exposure multiplier before demosaicing
        pre_exposure: f64 = 1.0 => "PreExposure",
        pre_preserve: f64 = 0.0 => "PrePreserv",
    }
}

// ============================================================================
// Bayer sensors
// ============================================================================

profile_enum! {
    pub enum BayerDemosaicMethod {
        Amaze => "amaze",
        Igv => "igv",
        Lmmse => "lmmse",
        Eahd => "eahd",
        Hphd => "hphd",
        Vng4 => "vng4",
        Dcb => "dcb",
        Ahd => "ahd",
        Fast => "fast",
        Mono => "mono",
        None => "none",
        PixelShift => "pixelshift",
    }
    default = Amaze;
}

profile_enum! {
    /// Motion detection grid for pixel-shift frames.
    pub enum PixelShiftMotionCorrection {
        Grid1x1 => "1x1",
        Grid1x2 => "1x2",
        Grid3x3 => "3x3",
        Grid5x5 => "5x5",
        Grid7x7 => "7x7",
        Grid3x3New => "3x3new",
    }
    default = Grid3x3New;
}

profile_enum! {
    pub enum PixelShiftMotionMethod {
        Off => "off",
        Automatic => "automatic",
        Custom => "custom",
    }
    default = Automatic;
}

param_group! {
    pub struct BayerSensorParams {
        method: BayerDemosaicMethod = BayerDemosaicMethod::Amaze => "Method",
        /// Frame used from multi-frame raw files
        image_num: i32 = 0 => "ImageNum",
        /// False color suppression steps
        cc_steps: i32 = 0 => "CcSteps",
        pre_black0: f64 = 0.0 => "PreBlack0",
        pre_black1: f64 = 0.0 => "PreBlack1",
        pre_black2: f64 = 0.0 => "PreBlack2",
        pre_black3: f64 = 0.0 => "PreBlack3",
        pre_two_green: bool = true => "PreTwoGreen",
        line_denoise: i32 = 0 => "LineDenoise",
        green_eq_threshold: i32 = 0 => "GreenEqThreshold",
        dcb_iterations: i32 = 2 => "DCBIterations",
        dcb_enhance: bool = true => "DCBEnhance",
        lmmse_iterations: i32 = 2 => "LMMSEIterations",
        pixel_shift_motion: i32 = 0 => "PixelShiftMotion",
        pixel_shift_motion_correction: PixelShiftMotionCorrection = PixelShiftMotionCorrection::Grid3x3New => "PixelShiftMotionCorrection",
        pixel_shift_motion_method: PixelShiftMotionMethod = PixelShiftMotionMethod::Automatic => "PixelShiftMotionCorrectionMethod",
        pixel_shift_stddev_factor_green: f64 = 5.0 => "pixelShiftStddevFactorGreen",
        pixel_shift_stddev_factor_red: f64 = 5.0 => "pixelShiftStddevFactorRed",
        pixel_shift_stddev_factor_blue: f64 = 5.0 => "pixelShiftStddevFactorBlue",
        pixel_shift_eper_iso: f64 = 0.0 => "PixelShiftEperIso",
        pixel_shift_nread_iso: f64 = 0.0 => "PixelShiftNreadIso",
        pixel_shift_prnu: f64 = 1.0 => "PixelShiftPrnu",
        pixel_shift_sigma: f64 = 1.0 => "PixelShiftSigma",
        pixel_shift_sum: f64 = 3.0 => "PixelShiftSum",
        pixel_shift_red_blue_weight: f64 = 0.7 => "PixelShiftRedBlueWeight",
        pixel_shift_show_motion: bool = false => "PixelShiftShowMotion",
        pixel_shift_show_motion_mask_only: bool = false => "PixelShiftShowMotionMaskOnly",
        pixel_shift_automatic: bool = true => "pixelShiftAutomatic",
        pixel_shift_non_green_horizontal: bool = false => "pixelShiftNonGreenHorizontal",
        pixel_shift_non_green_vertical: bool = false => "pixelShiftNonGreenVertical",
        pixel_shift_hole_fill: bool = true => "pixelShiftHoleFill",
        pixel_shift_median: bool = false => "pixelShiftMedian",
        pixel_shift_median3: bool = false => "pixelShiftMedian3",
        pixel_shift_green: bool = true => "pixelShiftGreen",
        pixel_shift_blur: bool = true => "pixelShiftBlur",
        pixel_shift_smooth_factor: f64 = 0.7 => "pixelShiftSmoothFactor",
        pixel_shift_exp0: bool = false => "pixelShiftExp0",
        pixel_shift_lmmse: bool = false => "pixelShiftLmmse",
        pixel_shift_equal_bright: bool = false => "pixelShiftEqualBright",
        pixel_shift_equal_bright_channel: bool = false => "pixelShiftEqualBrightChannel",
        pixel_shift_non_green_cross: bool = true => "pixelShiftNonGreenCross",
        pixel_shift_non_green_cross2: bool = false => "pixelShiftNonGreenCross2",
        pixel_shift_non_green_amaze: bool = false => "pixelShiftNonGreenAmaze",
    }
}

impl BayerSensorParams {
    /// Restore the pixel-shift tuning values, leaving demosaic settings and
    /// the motion display toggles alone.
    pub fn set_pixel_shift_defaults(&mut self) {
        let defaults = Self::default();
        self.pixel_shift_motion = defaults.pixel_shift_motion;
        self.pixel_shift_motion_correction = defaults.pixel_shift_motion_correction;
        self.pixel_shift_motion_method = defaults.pixel_shift_motion_method;
        self.pixel_shift_stddev_factor_green = defaults.pixel_shift_stddev_factor_green;
        self.pixel_shift_stddev_factor_red = defaults.pixel_shift_stddev_factor_red;
        self.pixel_shift_stddev_factor_blue = defaults.pixel_shift_stddev_factor_blue;
        self.pixel_shift_eper_iso = defaults.pixel_shift_eper_iso;
        self.pixel_shift_nread_iso = defaults.pixel_shift_nread_iso;
        self.pixel_shift_prnu = defaults.pixel_shift_prnu;
        self.pixel_shift_sigma = defaults.pixel_shift_sigma;
        self.pixel_shift_sum = defaults.pixel_shift_sum;
        self.pixel_shift_red_blue_weight = defaults.pixel_shift_red_blue_weight;
        self.pixel_shift_automatic = defaults.pixel_shift_automatic;
        self.pixel_shift_non_green_horizontal = defaults.pixel_shift_non_green_horizontal;
        self.pixel_shift_non_green_vertical = defaults.pixel_shift_non_green_vertical;
        self.pixel_shift_hole_fill = defaults.pixel_shift_hole_fill;
        self.pixel_shift_median = defaults.pixel_shift_median;
        self.pixel_shift_median3 = defaults.pixel_shift_median3;
        self.pixel_shift_green = defaults.pixel_shift_green;
        self.pixel_shift_blur = defaults.pixel_shift_blur;
        self.pixel_shift_smooth_factor = defaults.pixel_shift_smooth_factor;
        self.pixel_shift_exp0 = defaults.pixel_shift_exp0;
        self.pixel_shift_lmmse = defaults.pixel_shift_lmmse;
        self.pixel_shift_equal_bright = defaults.pixel_shift_equal_bright;
        self.pixel_shift_equal_bright_channel = defaults.pixel_shift_equal_bright_channel;
        self.pixel_shift_non_green_cross = defaults.pixel_shift_non_green_cross;
        self.pixel_shift_non_green_cross2 = defaults.pixel_shift_non_green_cross2;
        self.pixel_shift_non_green_amaze = defaults.pixel_shift_non_green_amaze;
    }
}

// ============================================================================
// X-Trans sensors
// ============================================================================

profile_enum! {
    pub enum XTransDemosaicMethod {
        ThreePass => "3-pass",
        OnePass => "1-pass",
        Fast => "fast",
        Mono => "mono",
        None => "none",
    }
    default = ThreePass;
}

param_group! {
    pub struct XTransSensorParams {
        method: XTransDemosaicMethod = XTransDemosaicMethod::ThreePass => "Method",
        cc_steps: i32 = 0 => "CcSteps",
        pre_black_red: f64 = 0.0 => "PreBlackRed",
        pre_black_green: f64 = 0.0 => "PreBlackGreen",
        pre_black_blue: f64 = 0.0 => "PreBlackBlue",
    }
}

// ============================================================================
// Raw container
// ============================================================================

/// Raw parameters: common preprocessing plus one group per sensor family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParams {
    pub common: RawCommonParams,
    pub bayer: BayerSensorParams,
    pub xtrans: XTransSensorParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_shift_defaults_keeps_demosaic_settings() {
        let mut bayer = BayerSensorParams::default();
        bayer.method = BayerDemosaicMethod::PixelShift;
        bayer.dcb_iterations = 5;
        bayer.pixel_shift_sigma = 3.5;
        bayer.pixel_shift_hole_fill = false;
        bayer.pixel_shift_show_motion = true;

        bayer.set_pixel_shift_defaults();

        assert_eq!(bayer.method, BayerDemosaicMethod::PixelShift);
        assert_eq!(bayer.dcb_iterations, 5);
        assert_eq!(bayer.pixel_shift_sigma, 1.0);
        assert!(bayer.pixel_shift_hole_fill);
        assert!(bayer.pixel_shift_show_motion);
    }

    #[test]
    fn test_demosaic_names() {
        assert_eq!(
            "pixelshift".parse::<BayerDemosaicMethod>(),
            Ok(BayerDemosaicMethod::PixelShift)
        );
        assert!("bilinear".parse::<BayerDemosaicMethod>().is_err());
        assert_eq!(XTransDemosaicMethod::default().as_str(), "3-pass");
    }
}
