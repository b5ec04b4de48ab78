// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod client;
pub mod server;

pub use client::{ClientConfig, GENERATOR_PATH};
pub use server::{BackendKind, ServerConfig};
