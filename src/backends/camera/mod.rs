// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 frame source
//!
//! `FrameSource::open` negotiates a capture format on `/dev/video<N>` and
//! starts a capture thread that owns the device and its mmap stream for the
//! whole session. Frames arrive over a bounded channel; the preview loop
//! drains it non-blocking to always render the latest frame. Dropping the
//! source stops the thread and releases the device on every exit path.

pub mod convert;
pub mod enumerate;
pub mod types;

pub use enumerate::enumerate_devices;
pub use types::{CameraFrame, DeviceInfo, PixelFormat};

use crate::constants::{CAPTURE_HEIGHT, CAPTURE_WIDTH};
use crate::errors::CameraError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError, sync_channel};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

/// How long `read_frame` waits before declaring the device stalled.
/// Generous enough to cover camera warm-up on the first frame.
const FRAME_WAIT: Duration = Duration::from_secs(5);

/// A running camera capture session
#[derive(Debug)]
pub struct FrameSource {
    receiver: Receiver<Result<CameraFrame, CameraError>>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameSource {
    /// Open `/dev/video<device_index>` and start capturing.
    ///
    /// Open and format negotiation happen on the caller's thread so that an
    /// unusable device surfaces as `DeviceUnavailable` before any session
    /// state exists.
    pub fn open(device_index: usize) -> Result<Self, CameraError> {
        let dev = Device::new(device_index)
            .map_err(|e| CameraError::DeviceUnavailable(format!("/dev/video{}: {}", device_index, e)))?;

        let format = Format::new(CAPTURE_WIDTH, CAPTURE_HEIGHT, FourCC::new(b"YUYV"));
        let actual = dev
            .set_format(&format)
            .map_err(|e| CameraError::DeviceUnavailable(format!("set format: {}", e)))?;

        let wire = match &actual.fourcc.repr {
            b"YUYV" => PixelFormat::Yuyv,
            b"MJPG" => PixelFormat::Mjpg,
            b"RGB3" => PixelFormat::Rgb24,
            other => {
                return Err(CameraError::UnsupportedFormat(
                    String::from_utf8_lossy(other).to_string(),
                ));
            }
        };

        info!(
            device = device_index,
            width = actual.width,
            height = actual.height,
            format = %wire,
            "Opened camera"
        );

        let (sender, receiver) = sync_channel(4);
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = running.clone();
        let (width, height) = (actual.width, actual.height);

        let handle = std::thread::Builder::new()
            .name("camera-capture".into())
            .spawn(move || capture_loop(dev, width, height, wire, sender, thread_running))
            .map_err(|e| CameraError::DeviceUnavailable(format!("capture thread: {}", e)))?;

        Ok(Self {
            receiver,
            running,
            handle: Some(handle),
        })
    }

    /// Block for the next frame.
    ///
    /// A stream error, a stalled device, or a dead capture thread all
    /// surface as `DecodeError`; there is no empty-frame success case.
    pub fn read_frame(&mut self) -> Result<CameraFrame, CameraError> {
        match self.receiver.recv_timeout(FRAME_WAIT) {
            Ok(result) => result,
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => Err(CameraError::DecodeError(
                format!("no frame within {:?}", FRAME_WAIT),
            )),
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => Err(
                CameraError::DecodeError("capture thread exited".to_string()),
            ),
        }
    }

    /// Non-blocking poll for a frame; `None` when nothing is queued.
    ///
    /// The preview loop drains this each tick to render only the latest frame.
    pub fn try_frame(&mut self) -> Option<Result<CameraFrame, CameraError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CameraError::DecodeError(
                "capture thread exited".to_string(),
            ))),
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Capture thread panicked during shutdown");
        }
        debug!("Camera released");
    }
}

/// Capture loop running on the camera thread.
///
/// Owns the device and stream; both release when this returns. The first
/// stream or decode failure is sent to the session and ends the loop.
fn capture_loop(
    dev: Device,
    width: u32,
    height: u32,
    wire: PixelFormat,
    sender: SyncSender<Result<CameraFrame, CameraError>>,
    running: Arc<AtomicBool>,
) {
    let mut stream = match MmapStream::with_buffers(&dev, Type::VideoCapture, 4) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = sender.send(Err(CameraError::DecodeError(format!(
                "buffer stream: {}",
                e
            ))));
            return;
        }
    };

    debug!("Capture stream started");

    while running.load(Ordering::SeqCst) {
        let (buf, meta) = match stream.next() {
            Ok(next) => next,
            Err(e) => {
                let _ = sender.try_send(Err(CameraError::DecodeError(e.to_string())));
                break;
            }
        };

        // For compressed formats only `bytesused` bytes of the mapped
        // buffer are valid
        let bytesused = meta.bytesused as usize;
        let buf = if bytesused > 0 && bytesused <= buf.len() {
            &buf[..bytesused]
        } else {
            buf
        };

        if buf.is_empty() {
            let _ = sender.try_send(Err(CameraError::DecodeError(
                "zero-length capture buffer".to_string(),
            )));
            break;
        }

        let frame = match decode_frame(buf, width, height, wire, meta.sequence) {
            Ok(frame) => frame,
            Err(e) => {
                let _ = sender.try_send(Err(e));
                break;
            }
        };

        // Channel full means the preview is behind; drop this frame
        let _ = sender.try_send(Ok(frame));
    }

    debug!("Capture stream stopped");
}

fn decode_frame(
    buf: &[u8],
    width: u32,
    height: u32,
    wire: PixelFormat,
    sequence: u32,
) -> Result<CameraFrame, CameraError> {
    let (data, width, height) = match wire {
        PixelFormat::Yuyv => (convert::yuyv_to_rgb(buf, width, height)?, width, height),
        PixelFormat::Mjpg => convert::mjpg_to_rgb(buf)?,
        PixelFormat::Rgb24 => {
            let expected = (width * height * 3) as usize;
            if buf.len() < expected {
                return Err(CameraError::DecodeError(format!(
                    "RGB3 buffer too short: {} < {}",
                    buf.len(),
                    expected
                )));
            }
            (buf[..expected].to_vec(), width, height)
        }
    };

    Ok(CameraFrame {
        width,
        height,
        data: Arc::from(data.into_boxed_slice()),
        sequence,
    })
}
