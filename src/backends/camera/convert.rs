// SPDX-License-Identifier: GPL-3.0-only

//! Pixel format converters for camera frames

use crate::errors::CameraError;

/// Convert packed YUYV 4:2:2 to tightly packed RGB24.
///
/// YUYV: Y0 U Y1 V - two pixels share one chroma pair.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CameraError> {
    let pixel_count = (width * height) as usize;
    if data.len() < pixel_count * 2 {
        return Err(CameraError::DecodeError(format!(
            "YUYV buffer too short: {} bytes for {}x{}",
            data.len(),
            width,
            height
        )));
    }

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            let (r, g, b) = yuv_to_rgb(y, u, v);
            rgb.push(r);
            rgb.push(g);
            rgb.push(b);
            if rgb.len() >= pixel_count * 3 {
                break;
            }
        }
        if rgb.len() >= pixel_count * 3 {
            break;
        }
    }
    Ok(rgb)
}

/// Decode one MJPG frame to tightly packed RGB24
pub fn mjpg_to_rgb(data: &[u8]) -> Result<(Vec<u8>, u32, u32), CameraError> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| CameraError::DecodeError(format!("MJPG decode: {}", e)))?;
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width(), rgb.height());
    Ok((rgb.into_raw(), width, height))
}

/// Convert one YUV (BT.601) sample to RGB
fn yuv_to_rgb(y: f32, u: f32, v: f32) -> (u8, u8, u8) {
    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuyv_gray_converts_to_gray() {
        // Two mid-gray pixels: Y=128, neutral chroma
        let data = [128u8, 128, 128, 128];
        let rgb = yuyv_to_rgb(&data, 2, 1).unwrap();
        assert_eq!(rgb.len(), 6);
        for &c in &rgb {
            assert!((126..=130).contains(&c), "expected near-gray, got {}", c);
        }
    }

    #[test]
    fn yuyv_short_buffer_is_decode_error() {
        let data = [0u8; 4];
        assert!(yuyv_to_rgb(&data, 640, 480).is_err());
    }

    #[test]
    fn mjpg_garbage_is_decode_error() {
        assert!(mjpg_to_rgb(&[0u8, 1, 2, 3]).is_err());
    }
}
