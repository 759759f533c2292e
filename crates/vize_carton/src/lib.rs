//! Carton - The artist's toolbox for Vize.
//!
//! This crate provides the foundational utilities and data structures shared by
//! the Vize crates, much like a carton (artist's portfolio case) holds all the
//! essential tools and materials an artist needs for their work.
//!
//! # Modules
//!
//! - **general**: small string helpers for identifiers and source text
//!
//! # Example
//!
//! ```
//! use vize_carton::{capitalize, CompactString, FxHashSet};
//!
//! let mut names: FxHashSet<CompactString> = FxHashSet::default();
//! names.insert(CompactString::new("count"));
//! assert!(names.contains("count"));
//! assert_eq!(capitalize("string"), "String");
//! ```

pub mod general;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_map, phf_set, Map as PhfMap, Set as PhfSet};

// Re-export shared utilities
pub use general::*;
