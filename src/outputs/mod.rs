//! Output generation modules for JSON, Markdown, and index files.
//!
//! This module contains submodules responsible for writing a rendered
//! [`crate::models::DigestPage`] to disk:
//!
//! # Submodules
//!
//! - [`json`]: serializes the digest for API-style consumption
//! - [`markdown`]: renders the digest as a human-readable report
//! - [`indexes`]: maintains the append-only index of generated reports
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── hu.json
//!     └── en.json
//!
//! markdown_output_dir/
//! ├── 2025-05-06_hu.md
//! ├── 2025-05-06_en.md
//! └── digests.md            # Master index
//! ```

pub mod indexes;
pub mod json;
pub mod markdown;
