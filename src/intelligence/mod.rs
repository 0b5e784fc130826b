// ABOUTME: Training intelligence derived from user self-reports
// ABOUTME: Currently the daily check-in intensity calculator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

/// Check-in based intensity scaling
pub mod intensity;

pub use intensity::{adjust_intensity, intensity_message, CheckIn, MAX_MULTIPLIER, MIN_MULTIPLIER};
