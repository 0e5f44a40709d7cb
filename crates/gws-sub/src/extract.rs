//! One submodel extraction run over a whole model.
//!
//! The caller supplies the retained element ids (from a GIS selection or a
//! manual list), the node set they imply (usually via
//! [`gws_model::derive_nodes`]), and the output names. `run` walks the model
//! from its manifest, rewrites every dependent file, and blanks manifest
//! slots for components the submodel no longer has.

use std::fs;
use std::path::Path;

use gws_ascii::ParseError;
use gws_model::{ElementAdjacency, RetainedSet, derive_nodes};
use tracing::info;

use crate::drains::DrainHydrographKey;
use crate::error::{Result, SubError};
use crate::manifest::{self, FileSlot};
use crate::names::SubmodelNames;
use crate::{aquifer, lakes, nodes};

/// The retained-id sets and naming for one extraction run. The sets are
/// read-only once built; every rewriter shares them by reference.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub elements: RetainedSet,
    pub nodes: RetainedSet,
    pub names: SubmodelNames,
    pub hydrograph_key: DrainHydrographKey,
}

/// Per-file survival counts for one extraction run. `None` marks a component
/// the source model never had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionReport {
    pub nodes_kept: usize,
    pub parameter_nodes_kept: usize,
    pub anomalies_kept: usize,
    pub boundary_kept: Option<usize>,
    pub has_drains: Option<bool>,
    pub has_pumping: Option<bool>,
    pub has_lakes: Option<bool>,
}

impl Extraction {
    pub fn new(elements: RetainedSet, nodes: RetainedSet, names: SubmodelNames) -> Self {
        Self {
            elements,
            nodes,
            names,
            hydrograph_key: DrainHydrographKey::default(),
        }
    }

    /// Build an extraction whose node set is derived from the retained
    /// elements through the mesh adjacency.
    pub fn from_adjacency(
        adjacency: &ElementAdjacency,
        elements: RetainedSet,
        names: SubmodelNames,
    ) -> Self {
        let nodes = derive_nodes(adjacency, &elements);
        Self::new(elements, nodes, names)
    }

    /// Rewrite the model rooted at `old_manifest` into `out_dir`.
    ///
    /// Component sources are resolved relative to the manifest's directory.
    /// Each per-file rewrite is independent; a failure in any of them aborts
    /// the run with the offending path and line.
    pub fn run(&self, old_manifest: &Path, out_dir: &Path) -> Result<ExtractionReport> {
        let src_dir = old_manifest.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(out_dir).map_err(|e| SubError::io(out_dir, e))?;

        info!(
            manifest = %old_manifest.display(),
            elements = self.elements.len(),
            nodes = self.nodes.len(),
            "extracting submodel"
        );

        let slots = manifest::read_manifest_file(old_manifest)?;
        let node_name = required(old_manifest, &slots.node, "node file")?;
        let aquifer_name = required(old_manifest, &slots.aquifer, "aquifer main file")?;

        let nodes_kept = nodes::write_node_file(
            &src_dir.join(node_name),
            &out_dir.join(&self.names.node_file),
            &self.nodes,
        )?;

        let report = aquifer::write_aquifer_file(
            &src_dir.join(aquifer_name),
            &out_dir.join(&self.names.aquifer_file),
            &self.names,
            &self.nodes,
            &self.elements,
            self.hydrograph_key,
        )?;

        let has_lakes = match &slots.lake.name {
            Some(name) => Some(lakes::write_lake_file(
                &src_dir.join(name),
                &out_dir.join(&self.names.lake_file),
                &self.elements,
            )?),
            None => None,
        };

        manifest::write_manifest_file(
            old_manifest,
            &out_dir.join(&self.names.manifest_file),
            &self.names,
            has_lakes.unwrap_or(false),
        )?;

        info!(
            nodes_kept,
            parameter_nodes = report.parameter_nodes_kept,
            lakes = has_lakes.unwrap_or(false),
            "submodel extraction complete"
        );
        Ok(ExtractionReport {
            nodes_kept,
            parameter_nodes_kept: report.parameter_nodes_kept,
            anomalies_kept: report.anomalies_kept,
            boundary_kept: report.boundary_kept,
            has_drains: report.has_drains,
            has_pumping: report.has_pumping,
            has_lakes,
        })
    }
}

fn required<'a>(manifest: &Path, slot: &'a FileSlot, what: &str) -> Result<&'a String> {
    slot.name.as_ref().ok_or_else(|| {
        SubError::parse(
            manifest,
            ParseError::new(slot.line, format!("required {what} entry is absent")),
        )
    })
}
