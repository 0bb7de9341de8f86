//! # Configuration Module
//!
//! This module centralizes the numeric limits shared by layouts, the arena and
//! the stepping window. Per-traversal settings live in
//! [`crate::window::WindowConfig`]; per-layout settings (byte order, alignment
//! policy) live on [`crate::layout::LayoutDescriptor`].
//!
//! ## Module Organization
//!
//! - [`constants`]: All numeric configuration values with dependency documentation

pub mod constants;
pub use constants::*;
