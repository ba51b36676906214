// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Workspace-confined file operations.

pub mod manager;

pub use manager::{EntryInfo, FileManager, OpReport, Payload};
