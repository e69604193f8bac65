//! # tabsum
//!
//! Data summarization engine for delimited survey datasets.
//!
//! tabsum loads a tabular file once into an immutable, column-major
//! [`Table`](table::Table) and answers column selections with plain
//! structured summary records a presentation layer can render directly:
//! no UI awareness, no shared mutable state, no caching. Every
//! summarizer is a pure function of `(&Table, selection, parameters)`:
//! calling it twice with the same inputs yields identical output, and a
//! read-only table can safely be shared across sessions without locking.
//!
//! ## Modules
//!
//! - [`table`] — Column-major table model (Table, Column, ColumnType, validity bitmap)
//! - [`loader`] — Delimited-file loading with per-column type inference
//! - [`classify`] — Categorical/numerical column partition and dataset overview
//! - [`frequency`] — Frequency tables and cross-tabulation for categorical columns
//! - [`describe`] — Descriptive statistics and Pearson correlation matrix
//! - [`distribution`] — Histogram binning and boxplot summaries
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use tabsum::loader::DatasetLoader;
//! use tabsum::classify::classify;
//! use tabsum::describe::describe;
//! use tabsum::frequency::frequency_table;
//!
//! let csv = "region,current age\nnorth,34\nsouth,29\nnorth,41\nnorth,25\n";
//! let table = DatasetLoader::new().load_str(csv).unwrap();
//!
//! let groups = classify(&table);
//! assert_eq!(groups.categorical, vec!["region"]);
//! assert_eq!(groups.numerical, vec!["current age"]);
//!
//! let freq = frequency_table(&table, "region").unwrap();
//! assert_eq!(freq.entries[0].label, "north");
//! assert_eq!(freq.entries[0].count, 3);
//!
//! let stats = describe(&table, "current age").unwrap();
//! assert_eq!(stats.count, 4);
//! ```
//!
//! ## Error model
//!
//! Loading failures are fatal and yield no partial table. Bad selections
//! (unknown column, wrong type group) and bad parameters (zero bin
//! count) are recoverable; the caller re-prompts. Degenerate data
//! (all-missing columns, zero variance, too few co-present observations)
//! is never an error; it degrades to NaN or empty results.

pub mod classify;
pub mod describe;
pub mod distribution;
pub mod error;
pub mod frequency;
pub mod loader;
mod stats;
pub mod table;
