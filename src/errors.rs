// ABOUTME: Unified error types re-exported from repcoach-core
// ABOUTME: AppError carries an ErrorCode plus message for every fallible operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

pub use repcoach_core::errors::*;
