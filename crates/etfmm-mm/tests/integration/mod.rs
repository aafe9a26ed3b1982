//! Integration tests for etfmm-mm.
//!
//! These tests drive the engine through full exchange event sequences:
//! - Book gating and pricing cycles
//! - Quote placement, requotes and the action budget
//! - Order status, errors and position changes

pub mod common;
