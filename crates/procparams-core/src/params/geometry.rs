//! Geometry stages: crop, rotation, lens corrections, perspective,
//! graduated filters, vignetting and resize.

use std::path::PathBuf;

// ============================================================================
// Crop
// ============================================================================

profile_enum! {
    pub enum CropOrientation {
        AsImage => "As Image",
        Landscape => "Landscape",
        Portrait => "Portrait",
    }
    default = AsImage;
}

profile_enum! {
    /// Composition guide drawn over the crop rectangle.
    pub enum CropGuide {
        None => "None",
        Frame => "Frame",
        RuleOfThirds => "Rule of thirds",
        RuleOfDiagonals => "Rule of diagonals",
        HarmonicMeans => "Harmonic means",
        Grid => "Grid",
        GoldenTriangle1 => "Golden Triangle 1",
        GoldenTriangle2 => "Golden Triangle 2",
        Passport => "ePassport",
        CenteredSquare => "Centered square",
    }
    default = Frame;
}

param_group! {
    /// Crop rectangle in full-size image coordinates.
    pub struct CropParams {
        enabled: bool = false => "Enabled",
        x: i32 = -1 => "X",
        y: i32 = -1 => "Y",
        w: i32 = 15000 => "W",
        h: i32 = 15000 => "H",
        fixed_ratio: bool = true => "FixedRatio",
        /// Aspect ratio label, e.g. `3:2`
        ratio: String = String::from("3:2") => "Ratio",
        orientation: CropOrientation = CropOrientation::AsImage => "Orientation",
        guide: CropGuide = CropGuide::Frame => "Guide",
    }
}

impl CropParams {
    /// Map the crop rectangle onto an image downscaled by `scale`.
    ///
    /// Returns `(x1, x2, y1, y2)` clamped to `width` x `height`. When the
    /// crop is disabled the whole resized frame is returned.
    pub fn map_to_resized(&self, width: i32, height: i32, scale: i32) -> (i32, i32, i32, i32) {
        if !self.enabled {
            return (0, width, 0, height);
        }
        let scale = scale.max(1);
        let x1 = (self.x / scale).max(0).min(width - 1);
        let y1 = (self.y / scale).max(0).min(height - 1);
        let x2 = (self.x.saturating_add(self.w) / scale).max(0).min(width);
        let y2 = (self.y.saturating_add(self.h) / scale).max(0).min(height);
        (x1, x2, y1, y2)
    }
}

// ============================================================================
// Transformations
// ============================================================================

param_group! {
    /// Lossless 90° rotations and flips.
    pub struct CoarseTransformParams {
        /// 0, 90, 180 or 270
        rotate: i32 = 0 => "Rotate",
        horizontal_flip: bool = false => "HorizontalFlip",
        vertical_flip: bool = false => "VerticalFlip",
    }
}

param_group! {
    pub struct CommonTransformParams {
        /// Scale geometric corrections to hide empty borders
        auto_fill: bool = true => "AutoFill",
    }
}

param_group! {
    pub struct RotateParams {
        degree: f64 = 0.0 => "Degree",
    }
}

param_group! {
    pub struct DistortionParams {
        amount: f64 = 0.0 => "Amount",
    }
}

param_group! {
    pub struct PerspectiveParams {
        horizontal: f64 = 0.0 => "Horizontal",
        vertical: f64 = 0.0 => "Vertical",
    }
}

// ============================================================================
// Lens profile
// ============================================================================

profile_enum! {
    /// Source of the lens correction profile.
    pub enum LensCorrectionMode {
        None => "none",
        /// Lensfun database entry matched from the image metadata
        LensfunAutoMatch => "lfauto",
        /// Lensfun database entry chosen by the user
        LensfunManual => "lfmanual",
        /// Adobe LCP file
        Lcp => "lcp",
    }
    default = None;
}

param_group! {
    pub struct LensProfParams {
        mode: LensCorrectionMode = LensCorrectionMode::None => "LcMode",
        lcp_file: PathBuf = PathBuf::new() => "LCPFile",
        use_distortion: bool = true => "UseDistortion",
        use_vignette: bool = true => "UseVignette",
        use_ca: bool = false => "UseCA",
        lensfun_camera_make: String = String::new() => "LFCameraMake",
        lensfun_camera_model: String = String::new() => "LFCameraModel",
        lensfun_lens: String = String::new() => "LFLens",
    }
}

impl LensProfParams {
    pub fn use_lensfun(&self) -> bool {
        matches!(
            self.mode,
            LensCorrectionMode::LensfunAutoMatch | LensCorrectionMode::LensfunManual
        )
    }

    pub fn lf_auto_match(&self) -> bool {
        self.mode == LensCorrectionMode::LensfunAutoMatch
    }

    pub fn lf_manual(&self) -> bool {
        self.mode == LensCorrectionMode::LensfunManual
    }

    /// LCP correction is only active with a profile file set.
    pub fn use_lcp(&self) -> bool {
        self.mode == LensCorrectionMode::Lcp && !self.lcp_file.as_os_str().is_empty()
    }
}

// ============================================================================
// Filters and vignetting
// ============================================================================

param_group! {
    /// Graduated filter.
    pub struct GradientParams {
        enabled: bool = false => "Enabled",
        degree: f64 = 0.0 => "Degree",
        feather: i32 = 25 => "Feather",
        /// Strength in EV
        strength: f64 = 0.6 => "Strength",
        center_x: i32 = 0 => "CenterX",
        center_y: i32 = 0 => "CenterY",
    }
}

param_group! {
    /// Post-crop vignette.
    pub struct PcVignetteParams {
        enabled: bool = false => "Enabled",
        strength: f64 = 0.6 => "Strength",
        feather: i32 = 50 => "Feather",
        roundness: i32 = 50 => "Roundness",
    }
}

param_group! {
    /// Lateral chromatic aberration correction.
    pub struct CaCorrectionParams {
        red: f64 = 0.0 => "Red",
        blue: f64 = 0.0 => "Blue",
    }
}

param_group! {
    /// Lens vignetting correction.
    pub struct VignettingParams {
        amount: i32 = 0 => "Amount",
        radius: i32 = 50 => "Radius",
        strength: i32 = 1 => "Strength",
        center_x: i32 = 0 => "CenterX",
        center_y: i32 = 0 => "CenterY",
    }
}

// ============================================================================
// Resize
// ============================================================================

profile_enum! {
    pub enum ResizeAppliesTo {
        CroppedArea => "Cropped area",
        FullImage => "Full image",
    }
    default = CroppedArea;
}

profile_enum! {
    pub enum ResizeMethod {
        Nearest => "Nearest",
        Bilinear => "Bilinear",
        Bicubic => "Bicubic",
        BicubicSofter => "Bicubic (Softer)",
        BicubicSharper => "Bicubic (Sharper)",
        Lanczos => "Lanczos",
    }
    default = Lanczos;
}

param_group! {
    pub struct ResizeParams {
        enabled: bool = false => "Enabled",
        scale: f64 = 1.0 => "Scale",
        applies_to: ResizeAppliesTo = ResizeAppliesTo::CroppedArea => "AppliesTo",
        method: ResizeMethod = ResizeMethod::Lanczos => "Method",
        /// Which of scale, width, height or bounding box is specified (0 to 3)
        data_specified: i32 = 3 => "DataSpecified",
        width: i32 = 900 => "Width",
        height: i32 = 900 => "Height",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_to_resized_disabled_is_full_frame() {
        let crop = CropParams::default();
        assert_eq!(crop.map_to_resized(600, 400, 4), (0, 600, 0, 400));
    }

    #[test]
    fn test_map_to_resized_scales_and_clamps() {
        let mut crop = CropParams::default();
        crop.enabled = true;
        crop.x = 400;
        crop.y = 200;
        crop.w = 2000;
        crop.h = 3000;
        assert_eq!(crop.map_to_resized(600, 400, 4), (100, 600, 50, 400));
    }

    #[test]
    fn test_map_to_resized_extreme_coordinates() {
        let mut crop = CropParams::default();
        crop.enabled = true;
        crop.x = i32::MAX - 647;
        crop.y = i32::MIN;
        crop.w = 15000;
        crop.h = i32::MIN;
        assert_eq!(crop.map_to_resized(4000, 3000, 1), (3999, 4000, 0, 0));
    }

    #[test]
    fn test_map_to_resized_negative_origin() {
        let mut crop = CropParams::default();
        crop.enabled = true;
        crop.x = -1;
        crop.y = -1;
        crop.w = 100;
        crop.h = 100;
        assert_eq!(crop.map_to_resized(600, 400, 2), (0, 49, 0, 49));
    }

    #[test]
    fn test_map_to_resized_zero_scale() {
        let mut crop = CropParams::default();
        crop.enabled = true;
        crop.x = 10;
        crop.y = 10;
        crop.w = 20;
        crop.h = 20;
        assert_eq!(crop.map_to_resized(100, 100, 0), (10, 30, 10, 30));
    }

    #[test]
    fn test_lens_mode_queries() {
        let mut lens = LensProfParams::default();
        assert!(!lens.use_lensfun());
        assert!(!lens.use_lcp());

        lens.mode = LensCorrectionMode::LensfunAutoMatch;
        assert!(lens.use_lensfun());
        assert!(lens.lf_auto_match());
        assert!(!lens.lf_manual());

        lens.mode = LensCorrectionMode::Lcp;
        assert!(!lens.use_lcp(), "no file set");
        lens.lcp_file = PathBuf::from("/profiles/lens.lcp");
        assert!(lens.use_lcp());
    }
}
