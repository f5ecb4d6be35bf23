// SPDX-License-Identifier: GPL-3.0-only

//! Hardware backend abstraction: camera capture and GPIO output

pub mod camera;
pub mod gpio;
