use crate::model::ProjectError;

/// Export target resolution for a phone model or generic screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevicePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const DEVICE_PRESETS: &[DevicePreset] = &[
    DevicePreset {
        id: "iphone15pro",
        name: "iPhone 15 Pro",
        width: 1179,
        height: 2556,
    },
    DevicePreset {
        id: "iphone15promax",
        name: "iPhone 15 Pro Max",
        width: 1290,
        height: 2796,
    },
    DevicePreset {
        id: "iphone16pro",
        name: "iPhone 16 Pro",
        width: 1206,
        height: 2622,
    },
    DevicePreset {
        id: "iphone16promax",
        name: "iPhone 16 Pro Max",
        width: 1320,
        height: 2868,
    },
    DevicePreset {
        id: "galaxys24",
        name: "Galaxy S24",
        width: 1080,
        height: 2340,
    },
    DevicePreset {
        id: "galaxys24ultra",
        name: "Galaxy S24 Ultra",
        width: 1440,
        height: 3120,
    },
    DevicePreset {
        id: "fhd",
        name: "Full HD (1080p)",
        width: 1080,
        height: 1920,
    },
    DevicePreset {
        id: "qhd",
        name: "QHD (1440p)",
        width: 1440,
        height: 2560,
    },
];

pub const DEFAULT_DEVICE: &str = "iphone15pro";

pub fn find_device(id: &str) -> Result<&'static DevicePreset, ProjectError> {
    DEVICE_PRESETS
        .iter()
        .find(|d| d.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| ProjectError::UnknownDevice(id.to_string()))
}

impl DevicePreset {
    /// Maps a normalized `0.0..=1.0` canvas point to target pixels.
    pub fn to_pixels(&self, x: f32, y: f32) -> (u32, u32) {
        (
            (x.clamp(0.0, 1.0) * self.width as f32).round() as u32,
            (y.clamp(0.0, 1.0) * self.height as f32).round() as u32,
        )
    }
}
