//! Submodel extraction for fixed-column groundwater model input files.
//!
//! This crate provides:
//! - **Per-file-type rewriters** that filter, re-count, and re-emit the
//!   dependent files of a model against caller-supplied retained node and
//!   element sets (boundary conditions, element pumping with nested element
//!   groups, tile drains and their hydrographs, lakes, the node coordinate
//!   table, the aquifer main file)
//! - **Manifest handling** for the top-level file list, including the
//!   `/`-leading absent-file marker for optional components
//! - **An extraction driver** that walks a whole model from its manifest
//!
//! Parsing primitives live in `gws-ascii`; retained-set types and the
//! element-to-node derived-set calculator live in `gws-model`. Every rewrite
//! reads one file fully into memory, edits it there, and writes exactly one
//! new file; the original is never touched.

pub mod aquifer;
pub mod boundary;
pub mod drains;
pub mod error;
pub mod extract;
pub mod lakes;
pub mod manifest;
pub mod names;
pub mod nodes;
pub mod pumping;
mod rewrite;

pub use aquifer::{AquiferReport, write_aquifer_file};
pub use boundary::write_boundary_file;
pub use drains::{DrainHydrographKey, write_drain_file};
pub use error::{Result, SubError};
pub use extract::{Extraction, ExtractionReport};
pub use lakes::write_lake_file;
pub use manifest::{FileSlot, Manifest, read_manifest_file, write_manifest_file};
pub use names::SubmodelNames;
pub use nodes::write_node_file;
pub use pumping::write_pumping_file;
