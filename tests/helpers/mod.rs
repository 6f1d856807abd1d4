//! Test helpers module
//!
//! This module provides utilities and helpers for testing the ChatBuddy application.
//! It includes test environment setup and widget fixtures.

#![allow(dead_code)]

pub mod simple_test;
pub mod test_data;

pub use simple_test::*;
pub use test_data::*;
