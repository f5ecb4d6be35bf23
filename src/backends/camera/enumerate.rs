// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 device enumeration via the QUERYCAP ioctl

use super::types::DeviceInfo;
use std::os::unix::io::{AsRawFd, RawFd};
use tracing::debug;

/// VIDIOC_QUERYCAP ioctl number
const VIDIOC_QUERYCAP: libc::c_ulong = 0x80685600;

/// V4L2 capability structure for VIDIOC_QUERYCAP ioctl
#[repr(C)]
struct V4l2Capability {
    driver: [u8; 16],
    card: [u8; 32],
    bus_info: [u8; 32],
    version: u32,
    capabilities: u32,
    device_caps: u32,
    reserved: [u32; 3],
}

/// Query V4L2 capabilities for an open file descriptor.
fn query_v4l2_cap(fd: RawFd) -> Option<V4l2Capability> {
    let mut cap: V4l2Capability = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, VIDIOC_QUERYCAP as _, &mut cap as *mut V4l2Capability) };
    if result < 0 { None } else { Some(cap) }
}

/// Read a fixed-size null-terminated field as a String
fn cap_string(field: &[u8]) -> String {
    let len = field.iter().position(|&c| c == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..len]).to_string()
}

/// List capture devices under `/dev/video*`, sorted by index.
///
/// Devices that cannot be opened or refuse QUERYCAP are skipped.
pub fn enumerate_devices() -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    let entries: Vec<_> = std::fs::read_dir("/dev")
        .into_iter()
        .flatten()
        .flatten()
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("video"))
                .unwrap_or(false)
        })
        .collect();

    for entry in entries {
        let path = entry.path();
        let path_str = path.to_string_lossy().to_string();
        let Some(index) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("video"))
            .and_then(|n| n.parse::<usize>().ok())
        else {
            continue;
        };

        let Ok(file) = std::fs::File::open(&path) else {
            continue;
        };
        let Some(cap) = query_v4l2_cap(file.as_raw_fd()) else {
            continue;
        };

        let info = DeviceInfo {
            card: cap_string(&cap.card),
            driver: cap_string(&cap.driver),
            path: path_str,
            index,
        };
        debug!(path = %info.path, driver = %info.driver, "Found V4L2 device");
        devices.push(info);
    }

    devices.sort_by_key(|d| d.index);
    devices
}
