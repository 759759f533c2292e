//! # vize_pentimento
//!
//! Pentimento - Migrates legacy Vue components to `<script setup>`.
//!
//! ## Name Origin
//!
//! **Pentimento** (/ˌpɛntɪˈmɛntoʊ/) is the trace of an earlier composition
//! showing through a repainted canvas. A painter reworks the picture but the
//! original strokes remain underneath. `vize_pentimento` repaints class
//! components and Options API objects as Composition API code while every
//! expression, comment and string of the original survives verbatim.
//!
//! ## Pipeline
//!
//! 1. Parse the script with `oxc_parser`
//! 2. Detect the legacy idiom ([`detect`])
//! 3. Classify each declaration ([`classify`])
//! 4. Rewrite `this.` references ([`rewrite`])
//! 5. Emit declarations in source order ([`emit`])
//! 6. Optionally reprint with `oxc_codegen` ([`format`])
//!
//! ## Example
//!
//! ```
//! use vize_pentimento::{convert_script, ConvertOptions};
//!
//! let script = r#"
//! export default {
//!   data() {
//!     return { count: 0 }
//!   },
//!   methods: {
//!     inc() { this.count++ }
//!   },
//! }
//! "#;
//!
//! let result = convert_script(script, &ConvertOptions::default()).unwrap();
//! assert!(result.code.contains("const count = ref(0);"));
//! assert!(result.code.contains("function inc() { count.value++ }"));
//! ```

pub mod classify;
pub mod detect;
pub mod emit;
pub mod format;
pub mod fragment;
pub mod lifecycle;
pub mod member;
pub mod props;
pub mod rewrite;
pub mod sfc;

mod driver;
mod error;
mod options;

pub use detect::IdiomKind;
pub use driver::{convert_script, Conversion, Diagnostic};
pub use error::{ConvertError, FormatError};
pub use options::{ConvertOptions, HelperImports, ScriptLang};
pub use sfc::{convert_sfc, locate_script, ScriptBlock, SfcConversion};
