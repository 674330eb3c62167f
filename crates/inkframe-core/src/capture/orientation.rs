use serde::{Deserialize, Serialize};

use crate::bitmap::Orientation;

/// Physical orientation of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// Orientation requested from the video output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VideoOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeRight,
    LandscapeLeft,
}

impl From<DeviceOrientation> for VideoOrientation {
    /// Landscape is mirrored between the two: a device turned left shows
    /// video rotated right. Flat or unknown devices fall back to portrait.
    fn from(device: DeviceOrientation) -> Self {
        match device {
            DeviceOrientation::Portrait
            | DeviceOrientation::Unknown
            | DeviceOrientation::FaceUp
            | DeviceOrientation::FaceDown => VideoOrientation::Portrait,
            DeviceOrientation::PortraitUpsideDown => VideoOrientation::PortraitUpsideDown,
            DeviceOrientation::LandscapeLeft => VideoOrientation::LandscapeRight,
            DeviceOrientation::LandscapeRight => VideoOrientation::LandscapeLeft,
        }
    }
}

impl VideoOrientation {
    /// Rotation a landscape sensor's frames need to appear upright.
    pub fn frame_orientation(self) -> Orientation {
        match self {
            VideoOrientation::Portrait => Orientation::Rotate90CW,
            VideoOrientation::PortraitUpsideDown => Orientation::Rotate270CW,
            VideoOrientation::LandscapeRight => Orientation::Up,
            VideoOrientation::LandscapeLeft => Orientation::Rotate180,
        }
    }
}
