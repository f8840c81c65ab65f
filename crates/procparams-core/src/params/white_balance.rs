//! White balance and the built-in preset table.

use serde::Serialize;

/// Family a white-balance preset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WbKind {
    Camera,
    Auto,
    Daylight,
    Cloudy,
    Shade,
    Water,
    Tungsten,
    Fluorescent,
    Lamp,
    Flash,
    Led,
    /// User-set temperature and tint. Always last in the table.
    Custom,
}

/// One white-balance preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WbPreset {
    /// Name stored in profiles
    pub label: &'static str,
    pub kind: WbKind,
    /// Name shown to users
    pub display_label: &'static str,
    /// Color temperature in Kelvin; 0 when derived from the image
    pub temperature: i32,
    pub green: f64,
    pub equal: f64,
    pub temperature_bias: f64,
}

const fn preset(
    label: &'static str,
    kind: WbKind,
    display_label: &'static str,
    temperature: i32,
    green: f64,
    equal: f64,
) -> WbPreset {
    WbPreset {
        label,
        kind,
        display_label,
        temperature,
        green,
        equal,
        temperature_bias: 0.0,
    }
}

/// Built-in white-balance presets.
pub static WB_PRESETS: &[WbPreset] = &[
    preset("Camera", WbKind::Camera, "Camera", 0, 1.0, 1.0),
    preset("Auto", WbKind::Auto, "Automatic", 0, 1.0, 1.0),
    preset("Daylight", WbKind::Daylight, "Daylight (direct sun)", 5300, 1.0, 1.0),
    preset("Cloudy", WbKind::Cloudy, "Cloudy", 6200, 1.0, 1.0),
    preset("Shade", WbKind::Shade, "Shade", 7600, 1.0, 1.0),
    preset("Water 1", WbKind::Water, "Underwater 1", 35000, 0.3, 1.1),
    preset("Water 2", WbKind::Water, "Underwater 2", 48000, 0.63, 1.38),
    preset("Tungsten", WbKind::Tungsten, "Tungsten", 2856, 1.0, 1.0),
    preset("Fluo F1", WbKind::Fluorescent, "Fluorescent F1 - Daylight", 6430, 1.0, 1.0),
    preset("Fluo F2", WbKind::Fluorescent, "Fluorescent F2 - Cool White", 4230, 1.0, 1.0),
    preset("Fluo F3", WbKind::Fluorescent, "Fluorescent F3 - White", 3450, 1.0, 1.0),
    preset("Fluo F4", WbKind::Fluorescent, "Fluorescent F4 - Warm White", 2940, 1.0, 1.0),
    preset("Fluo F5", WbKind::Fluorescent, "Fluorescent F5 - Daylight", 6350, 1.0, 1.0),
    preset("Fluo F6", WbKind::Fluorescent, "Fluorescent F6 - Lite White", 4150, 1.0, 1.0),
    preset("Fluo F7", WbKind::Fluorescent, "Fluorescent F7 - D65 Daylight Simulator", 6500, 1.0, 1.0),
    preset("Fluo F8", WbKind::Fluorescent, "Fluorescent F8 - D50 Sylvania F40 Design", 5020, 1.0, 1.0),
    preset("Fluo F9", WbKind::Fluorescent, "Fluorescent F9 - Cool White Deluxe", 4330, 1.0, 1.0),
    preset("Fluo F10", WbKind::Fluorescent, "Fluorescent F10 - Philips TL85", 5300, 1.0, 1.0),
    preset("Fluo F11", WbKind::Fluorescent, "Fluorescent F11 - Philips TL84", 4000, 1.0, 1.0),
    preset("Fluo F12", WbKind::Fluorescent, "Fluorescent F12 - Philips TL83", 3000, 1.0, 1.0),
    preset("HMI Lamp", WbKind::Lamp, "HMI", 4800, 1.0, 1.0),
    preset("GTI Lamp", WbKind::Lamp, "GTI", 5000, 1.0, 1.0),
    preset("JudgeIII Lamp", WbKind::Lamp, "JudgeIII", 5100, 1.0, 1.0),
    preset("Solux Lamp 3500K", WbKind::Lamp, "Solux 3500K", 3480, 1.0, 1.0),
    preset("Solux Lamp 4100K", WbKind::Lamp, "Solux 4100K", 3930, 1.0, 1.0),
    preset("Solux Lamp 4700K", WbKind::Lamp, "Solux 4700K", 4700, 1.0, 1.0),
    preset("NG Solux Lamp 4700K", WbKind::Lamp, "Solux 4700K (Gallery)", 4480, 1.0, 1.0),
    preset("LED LSI Lumelex 2040", WbKind::Led, "LSI Lumelex 2040", 2970, 1.0, 1.0),
    preset("LED CRS SP12 WWMR16", WbKind::Led, "CRS SP12 WWMR16", 3050, 1.0, 1.0),
    preset("Flash Standard", WbKind::Flash, "Standard flash", 5500, 1.0, 1.0),
    preset("Flash Leica", WbKind::Flash, "Leica flash", 5500, 1.0, 1.0),
    preset("Flash Kodak", WbKind::Flash, "Kodak flash", 6000, 1.0, 1.0),
    preset("Custom", WbKind::Custom, "Custom", 0, 1.0, 1.0),
];

/// Look up a preset by its stored label.
pub fn find_wb_preset(label: &str) -> Option<&'static WbPreset> {
    WB_PRESETS.iter().find(|preset| preset.label == label)
}

param_group! {
    pub struct WbParams {
        /// Preset label, see [`WB_PRESETS`]
        setting: String = String::from("Camera") => "Setting",
        /// Temperature in Kelvin
        temperature: i32 = 6504 => "Temperature",
        /// Tint
        green: f64 = 1.0 => "Green",
        /// Blue/red equalizer
        equal: f64 = 1.0 => "Equal",
        temperature_bias: f64 = 0.0 => "TemperatureBias",
    }
}

impl WbParams {
    /// The preset named by `setting`, if it is a known label.
    pub fn preset(&self) -> Option<&'static WbPreset> {
        find_wb_preset(&self.setting)
    }

    /// Select `preset`. Presets with a fixed temperature also set the
    /// temperature, tint and equalizer; image-derived presets (camera,
    /// auto, custom) only change the label.
    pub fn apply_preset(&mut self, preset: &WbPreset) {
        self.setting = preset.label.to_string();
        if preset.temperature > 0 {
            self.temperature = preset.temperature;
            self.green = preset.green;
            self.equal = preset.equal;
            self.temperature_bias = preset.temperature_bias;
        }
    }
}
