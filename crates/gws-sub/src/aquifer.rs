//! Aquifer (groundwater) main file rewriter.
//!
//! The aquifer main file names the optional component files and carries the
//! per-node aquifer parameters:
//! - three file-name slots: boundary conditions (`BCFL`), tile drains
//!   (`TDFL`), element pumping (`PUMPFL`), each either a filename or the
//!   absent marker;
//! - `NL`: number of aquifer layers;
//! - `NDP`: per-node parameter records, one logical record per node spanning
//!   `NL` physical lines (the first carries the node id);
//! - `NEBK`: hydraulic conductivity anomalies, element id in column 1, after
//!   two conversion-factor lines;
//! - one factor line, then per-node initial heads (one line per `NDP` node).
//!
//! Rewriting filters the node-keyed tables against the retained node set and
//! the anomaly section against the retained element set, then delegates each
//! present component file to its own rewriter. A component whose rewrite
//! comes back empty has its slot blanked to the absent marker so a
//! near-empty submodel does not reference a gutted file.

use std::path::Path;

use gws_ascii::{read_count, read_table, skip_data_lines};
use gws_model::RetainedSet;
use tracing::debug;

use crate::drains::DrainHydrographKey;
use crate::error::{Result, SubError};
use crate::manifest::{clear_slot, read_slot, set_slot};
use crate::names::SubmodelNames;
use crate::rewrite;
use crate::{boundary, drains, pumping};

/// What survived an aquifer main file rewrite. `None` means the component
/// file was already absent in the source model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AquiferReport {
    pub parameter_nodes_kept: usize,
    pub anomalies_kept: usize,
    pub boundary_kept: Option<usize>,
    pub has_drains: Option<bool>,
    pub has_pumping: Option<bool>,
}

/// Rewrite the aquifer main file at `old` and every component file it names.
/// Component sources are resolved relative to `old`'s directory; outputs land
/// next to `new`.
pub fn write_aquifer_file(
    old: &Path,
    new: &Path,
    names: &SubmodelNames,
    nodes: &RetainedSet,
    elements: &RetainedSet,
    hydrograph_key: DrainHydrographKey,
) -> Result<AquiferReport> {
    let mut doc = rewrite::load(old)?;
    let parse = |e| SubError::parse(old, e);
    let src_dir = old.parent().unwrap_or_else(|| Path::new("."));
    let out_dir = new.parent().unwrap_or_else(|| Path::new("."));

    // -- component file slots
    let bc_slot = read_slot(&doc, 0).map_err(parse)?;
    let td_slot = read_slot(&doc, bc_slot.line + 1).map_err(parse)?;
    let pump_slot = read_slot(&doc, td_slot.line + 1).map_err(parse)?;

    // -- per-node aquifer parameters
    let nl = read_count(&doc, pump_slot.line + 1, 0).map_err(parse)?;
    let layers = nl.value.max(1);
    let ndp = read_count(&doc, nl.line + 1, 0).map_err(parse)?;
    let (params, end) =
        read_table(&doc, ndp.line + 1, ndp.value, layers).map_err(parse)?;
    let (parameter_nodes_kept, cursor) =
        rewrite::filter_records(&mut doc, ndp.line, &params, end, |r| {
            Ok(nodes.contains(r.int(0)?))
        })
        .map_err(parse)?;

    // -- hydraulic conductivity anomalies
    let nebk = read_count(&doc, cursor, 0).map_err(parse)?;
    let cursor = skip_data_lines(&doc, nebk.line + 1, 2).map_err(parse)?;
    let (anomalies, end) = read_table(&doc, cursor, nebk.value, 1).map_err(parse)?;
    let (anomalies_kept, cursor) =
        rewrite::filter_records(&mut doc, nebk.line, &anomalies, end, |r| {
            Ok(elements.contains(r.int(1)?))
        })
        .map_err(parse)?;

    // -- initial heads, one line per node of the original NDP table
    let cursor = skip_data_lines(&doc, cursor, 1).map_err(parse)?;
    let (heads, end) = read_table(&doc, cursor, ndp.value, 1).map_err(parse)?;
    rewrite::filter_records_uncounted(&mut doc, &heads, end, |r| {
        Ok(nodes.contains(r.int(0)?))
    })
    .map_err(parse)?;

    // -- component files; slot lines all precede the spliced sections, so
    //    patching them by saved index is safe
    let boundary_kept = match &bc_slot.name {
        Some(name) => {
            let kept = boundary::write_boundary_file(
                &src_dir.join(name),
                &out_dir.join(&names.boundary_file),
                nodes,
            )?;
            set_slot(&mut doc, bc_slot.line, &names.boundary_file, "BCFL");
            Some(kept)
        }
        None => None,
    };

    let has_drains = match &td_slot.name {
        Some(name) => {
            let any = drains::write_drain_file(
                &src_dir.join(name),
                &out_dir.join(&names.drain_file),
                nodes,
                hydrograph_key,
            )?;
            if any {
                set_slot(&mut doc, td_slot.line, &names.drain_file, "TDFL");
            } else {
                clear_slot(&mut doc, td_slot.line, "TDFL");
            }
            Some(any)
        }
        None => None,
    };

    let has_pumping = match &pump_slot.name {
        Some(name) => {
            let any = pumping::write_pumping_file(
                &src_dir.join(name),
                &out_dir.join(&names.pumping_file),
                elements,
            )?;
            if any {
                set_slot(&mut doc, pump_slot.line, &names.pumping_file, "PUMPFL");
            } else {
                clear_slot(&mut doc, pump_slot.line, "PUMPFL");
            }
            Some(any)
        }
        None => None,
    };

    rewrite::save(&doc, new)?;
    debug!(
        path = %new.display(),
        parameter_nodes = parameter_nodes_kept,
        anomalies = anomalies_kept,
        "wrote aquifer main file"
    );
    Ok(AquiferReport {
        parameter_nodes_kept,
        anomalies_kept,
        boundary_kept,
        has_drains,
        has_pumping,
    })
}
