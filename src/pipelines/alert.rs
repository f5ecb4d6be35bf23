// SPDX-License-Identifier: GPL-3.0-only

//! Buzzer alert stage
//!
//! The driver starts `Uninitialized` and configures its pin lazily on the
//! first positive detection. Init is explicit state, not process-global: a
//! second initialization is a no-op, and init failure only disables the
//! alert stage, never the rest of the pipeline.

use crate::backends::gpio::{Level, PinDriver};
use crate::config::AlertConfig;
use crate::errors::AlertError;
use crate::pipelines::results::DetectionResult;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PinState {
    Uninitialized,
    Ready,
}

/// Drives one buzzer pin from detection results
pub struct AlertDriver<P: PinDriver> {
    driver: P,
    pin: u8,
    duration: Duration,
    state: PinState,
}

impl<P: PinDriver> AlertDriver<P> {
    pub fn new(driver: P, config: &AlertConfig) -> Self {
        Self {
            driver,
            pin: config.pin,
            duration: config.duration(),
            state: PinState::Uninitialized,
        }
    }

    /// Sound the buzzer if the result carries a detection.
    ///
    /// A positive result produces exactly one pulse: HIGH, hold, LOW, hold.
    /// A negative result touches neither the pin nor its configuration.
    pub fn fire(&mut self, result: &DetectionResult) -> Result<(), AlertError> {
        if !result.has_detection() {
            debug!("No detection, buzzer stays quiet");
            return Ok(());
        }

        self.ensure_ready()?;

        info!(pin = self.pin, duration_ms = self.duration.as_millis() as u64, "Sounding buzzer");
        self.driver.write(self.pin, Level::High)?;
        std::thread::sleep(self.duration);
        self.driver.write(self.pin, Level::Low)?;
        std::thread::sleep(self.duration);
        Ok(())
    }

    /// Lazy `Uninitialized -> Ready` transition; a no-op once ready
    fn ensure_ready(&mut self) -> Result<(), AlertError> {
        if self.state == PinState::Uninitialized {
            self.driver.init_output(self.pin)?;
            self.state = PinState::Ready;
        }
        Ok(())
    }
}
