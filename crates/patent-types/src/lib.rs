//! # patent-types
//!
//! Shared domain types for the Patent Analytics system.
//!
//! This crate defines the core data structures exchanged between the
//! search-provider client, the analytics core, and the presentation
//! layer:
//! - Patent records: immutable documents returned by a patent search
//!
//! ## Usage
//!
//! ```rust
//! use patent_types::PatentRecord;
//!
//! let record = PatentRecord::new("RU2751234", "Нейронная сеть", "Способ обучения");
//! assert_eq!(record.full_text(), "Нейронная сеть Способ обучения");
//! ```

pub mod record;

pub use record::PatentRecord;
