//! # Vize
//!
//! Migration toolchain for legacy Vue components, written in Rust.
//!
//! This crate re-exports the Vize sub-crates for unified documentation.
//!
//! ## Crates
//!
//! - [`carton`] - Shared collections and string helpers
//! - [`pentimento`] - Class component and Options API migration to `<script setup>`

/// Shared collections and string helpers.
pub use vize_carton as carton;

/// Class component and Options API migration to `<script setup>`.
pub use vize_pentimento as pentimento;
