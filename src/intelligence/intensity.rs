// ABOUTME: Daily check-in readiness scoring that scales the day's training intensity
// ABOUTME: Pure additive adjustments for energy, sleep and soreness clamped to [0.7, 1.1]
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! Intensity Calculator
//!
//! Turns a subjective daily check-in into a multiplier applied to the planned
//! training load. Adjustments are additive from a neutral 1.0:
//!
//! | Signal   | Low (<= 2) | High (>= 4) |
//! |----------|------------|-------------|
//! | Energy   | -0.15      | +0.05       |
//! | Sleep    | -0.10      | +0.02       |
//! | Soreness | +0.02      | -0.10       |
//!
//! The arithmetic runs in integer hundredths so neutral input is exactly `1.0`.

use crate::constants::coach::INTENSITY_BOOST_MESSAGE;
use serde::{Deserialize, Serialize};

/// Neutral multiplier in hundredths
const BASE_HUNDREDTHS: i32 = 100;
const MIN_HUNDREDTHS: i32 = 70;
const MAX_HUNDREDTHS: i32 = 110;

/// Lowest multiplier the calculator returns
pub const MIN_MULTIPLIER: f64 = 0.7;
/// Highest multiplier the calculator returns
pub const MAX_MULTIPLIER: f64 = 1.1;

/// Self-reported readiness on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    /// 1 = exhausted, 5 = full of energy
    pub energy_level: u8,
    /// 1 = terrible sleep, 5 = great sleep
    pub sleep_quality: u8,
    /// 1 = not sore, 5 = very sore
    pub soreness_level: u8,
}

impl CheckIn {
    /// Build a check-in, clamping every value into 1..=5
    #[must_use]
    pub fn new(energy_level: u8, sleep_quality: u8, soreness_level: u8) -> Self {
        Self {
            energy_level: energy_level.clamp(1, 5),
            sleep_quality: sleep_quality.clamp(1, 5),
            soreness_level: soreness_level.clamp(1, 5),
        }
    }

    /// All-threes check-in with no adjustment
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            energy_level: 3,
            sleep_quality: 3,
            soreness_level: 3,
        }
    }
}

const fn energy_adjustment(level: u8) -> i32 {
    match level {
        0..=2 => -15,
        3 => 0,
        _ => 5,
    }
}

const fn sleep_adjustment(quality: u8) -> i32 {
    match quality {
        0..=2 => -10,
        3 => 0,
        _ => 2,
    }
}

const fn soreness_adjustment(level: u8) -> i32 {
    match level {
        0..=2 => 2,
        3 => 0,
        _ => -10,
    }
}

/// Multiplier in hundredths, already clamped
#[must_use]
pub const fn intensity_hundredths(check_in: &CheckIn) -> i32 {
    let raw = BASE_HUNDREDTHS
        + energy_adjustment(check_in.energy_level)
        + sleep_adjustment(check_in.sleep_quality)
        + soreness_adjustment(check_in.soreness_level);

    if raw < MIN_HUNDREDTHS {
        MIN_HUNDREDTHS
    } else if raw > MAX_HUNDREDTHS {
        MAX_HUNDREDTHS
    } else {
        raw
    }
}

/// Training intensity multiplier for a check-in, always within [0.7, 1.1]
#[must_use]
pub fn adjust_intensity(check_in: &CheckIn) -> f64 {
    f64::from(intensity_hundredths(check_in)) / 100.0
}

/// Coaching sentence for a multiplier, `None` when intensity is unchanged
///
/// Below 1.0 the sentence states the percentage reduction; above 1.0 it is a
/// fixed encouragement.
#[must_use]
pub fn intensity_message(multiplier: f64) -> Option<String> {
    if multiplier < 1.0 {
        // Bounded by the clamp, so the cast cannot truncate
        #[allow(clippy::cast_possible_truncation)]
        let percent = ((1.0 - multiplier) * 100.0).round() as i64;
        Some(format!(
            "Based on your check-in, I recommend reducing today's training intensity by {percent}%."
        ))
    } else if multiplier > 1.0 {
        Some(INTENSITY_BOOST_MESSAGE.to_owned())
    } else {
        None
    }
}
