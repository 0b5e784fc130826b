// ABOUTME: Application constants re-exported from repcoach-core
// ABOUTME: Cache sizes, coaching thresholds and canned reply strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

pub use repcoach_core::constants::*;
