// SPDX-License-Identifier: GPL-3.0-only

//! GPIO output pin abstraction
//!
//! The alert stage talks to hardware through the [`PinDriver`] trait.
//! [`SysfsPin`] drives the kernel's sysfs GPIO interface; [`MemoryPin`]
//! records writes so tests can assert on the exact pulse sequence.

use crate::errors::AlertError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Digital output level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    fn sysfs_value(self) -> &'static str {
        match self {
            Level::High => "1",
            Level::Low => "0",
        }
    }
}

/// A single addressable digital output pin
pub trait PinDriver {
    /// Configure `pin` as an output.
    ///
    /// Must be idempotent: initializing an already-initialized pin succeeds.
    fn init_output(&mut self, pin: u8) -> Result<(), AlertError>;

    /// Drive `pin` to `level`
    fn write(&mut self, pin: u8, level: Level) -> Result<(), AlertError>;
}

/// Sysfs-backed GPIO driver (`/sys/class/gpio`)
pub struct SysfsPin {
    root: PathBuf,
}

impl SysfsPin {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/sys/class/gpio"),
        }
    }

    /// Use an alternate sysfs root (tests)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pin_dir(&self, pin: u8) -> PathBuf {
        self.root.join(format!("gpio{}", pin))
    }
}

impl Default for SysfsPin {
    fn default() -> Self {
        Self::new()
    }
}

impl PinDriver for SysfsPin {
    fn init_output(&mut self, pin: u8) -> Result<(), AlertError> {
        // Export the pin; EBUSY means it is already exported, which is fine
        if !self.pin_dir(pin).exists() {
            let export = self.root.join("export");
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .open(&export)
                .map_err(|e| AlertError::PinInit(format!("{}: {}", export.display(), e)))?;
            if let Err(e) = write!(file, "{}", pin)
                && e.raw_os_error() != Some(libc::EBUSY)
            {
                return Err(AlertError::PinInit(format!("export pin {}: {}", pin, e)));
            }
        }

        let direction = self.pin_dir(pin).join("direction");
        std::fs::write(&direction, "out")
            .map_err(|e| AlertError::PinInit(format!("{}: {}", direction.display(), e)))?;

        debug!(pin, "GPIO pin configured as output");
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), AlertError> {
        let value = self.pin_dir(pin).join("value");
        std::fs::write(&value, level.sysfs_value())
            .map_err(|e| AlertError::PinWrite(format!("{}: {}", value.display(), e)))
    }
}

/// In-memory pin driver that records every operation
#[derive(Clone, Default)]
pub struct MemoryPin {
    state: Arc<Mutex<MemoryPinState>>,
}

#[derive(Default)]
struct MemoryPinState {
    init_count: u32,
    writes: Vec<(u8, Level)>,
}

impl MemoryPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `init_output` calls seen
    pub fn init_count(&self) -> u32 {
        self.state.lock().unwrap().init_count
    }

    /// Every `(pin, level)` write in order
    pub fn writes(&self) -> Vec<(u8, Level)> {
        self.state.lock().unwrap().writes.clone()
    }
}

impl PinDriver for MemoryPin {
    fn init_output(&mut self, _pin: u8) -> Result<(), AlertError> {
        self.state.lock().unwrap().init_count += 1;
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), AlertError> {
        self.state.lock().unwrap().writes.push((pin, level));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysfs_init_writes_direction() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("export"), "").unwrap();
        std::fs::create_dir(root.join("gpio5")).unwrap();

        let mut driver = SysfsPin::with_root(root);
        driver.init_output(5).unwrap();
        assert_eq!(std::fs::read_to_string(root.join("gpio5/direction")).unwrap(), "out");

        driver.write(5, Level::High).unwrap();
        assert_eq!(std::fs::read_to_string(root.join("gpio5/value")).unwrap(), "1");
        driver.write(5, Level::Low).unwrap();
        assert_eq!(std::fs::read_to_string(root.join("gpio5/value")).unwrap(), "0");
    }

    #[test]
    fn sysfs_init_is_idempotent_when_exported() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("gpio7")).unwrap();

        // Pin directory already present, export file absent: init must still pass
        let mut driver = SysfsPin::with_root(root);
        driver.init_output(7).unwrap();
        driver.init_output(7).unwrap();
    }
}
