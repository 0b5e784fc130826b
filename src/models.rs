// ABOUTME: Routine, workout, set and profile records re-exported from repcoach-core
// ABOUTME: Shared by the persistence layer and the coaching pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

pub use repcoach_core::models::*;
