// ABOUTME: Static prompt text for the action interpreter loaded at compile time
// ABOUTME: Action taxonomy with field shapes plus the training environment context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # System Prompts
//!
//! Prompts live in markdown files next to this module so they can be edited
//! without touching code.

/// Closed action taxonomy with one JSON example per action
pub const COACH_ACTIONS_PROMPT: &str = include_str!("coach_actions.md");

/// Equipment available to the user
pub const EQUIPMENT_CONTEXT: &str = include_str!("equipment.md");
