// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use std::sync::Arc;

/// Wire pixel format negotiated with the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed YUV 4:2:2 (fourcc "YUYV")
    Yuyv,
    /// Motion-JPEG compressed frames (fourcc "MJPG")
    Mjpg,
    /// Packed 24-bit RGB (fourcc "RGB3")
    Rgb24,
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Yuyv => write!(f, "YUYV"),
            PixelFormat::Mjpg => write!(f, "MJPG"),
            PixelFormat::Rgb24 => write!(f, "RGB3"),
        }
    }
}

/// One decoded frame, always RGB24 after backend conversion
///
/// Owned by the preview loop for a single iteration; the `Arc` lets a save
/// operation keep the pixels without copying.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB24, `width * height * 3` bytes
    pub data: Arc<[u8]>,
    /// V4L2 buffer sequence number
    pub sequence: u32,
}

impl CameraFrame {
    /// Sample one pixel; coordinates clamp to the frame edge
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let idx = ((y * self.width + x) * 3) as usize;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }
}

/// Device information from V4L2 capability
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    /// Name of the device (V4L2 card)
    pub card: String,
    /// Driver name (V4L2 driver)
    pub driver: String,
    /// Device path (e.g., /dev/video0)
    pub path: String,
    /// Device index parsed from the path
    pub index: usize,
}
