// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for Fred
//!
//! Handles loading and merging the layered configuration.

pub mod settings;

pub use settings::*;
