//! inkwright - AI request orchestration for writers
//!
//! A library and CLI that routes writing actions (improve, expand, continue
//! a story, and friends) to whichever AI provider is configured, with
//! credential storage, response caching, connectivity probing, and a
//! deterministic offline fallback when no provider can answer.

// Note: deny (not forbid) to allow #[allow(unsafe_code)] in test helpers for env var manipulation
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod util;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use core::{Action, Orchestrator, Origin, ProcessOutcome, Provider};
pub use error::{ExitCode, InkwrightError, Result};

// Re-export test utilities for external test crates
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;
