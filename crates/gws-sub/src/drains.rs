//! Tile drain file rewriter.
//!
//! Three counted sections, each header followed by three conversion-factor
//! data lines before its records:
//! - `NTD`: tile drains, `<drain_id> <node_id> <elev> <cond> <dest>`;
//! - `NSI`: subsurface irrigation, `<id> <node_id> ...`;
//! - `NOUTTD`: tile drain hydrographs, `<id> <drain_id> ...`.
//!
//! Drain and irrigation records are keyed by the node id in column 1.
//! Hydrograph filtering depends on [`DrainHydrographKey`]: the historical
//! code tested the hydrograph's second column against the surviving drain
//! *node* set even though that column holds a drain id; both readings are
//! available and `ByDrainId` is the default.

use std::path::Path;

use gws_ascii::{read_count, read_table, skip_data_lines};
use gws_model::RetainedSet;
use tracing::debug;

use crate::error::{Result, SubError};
use crate::rewrite;

/// Which field a tile drain hydrograph record is matched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainHydrographKey {
    /// Column 1 is a drain id, matched against the surviving drain ids.
    /// A hydrograph naming a drain id never declared in the `NTD` section is
    /// an inconsistent cross-reference and fatal.
    #[default]
    ByDrainId,
    /// Column 1 matched against the surviving drain node set, reproducing
    /// the historical behavior.
    ByDrainNode,
}

/// Filter the tile drain file at `old` against `nodes` and write the result
/// to `new`. Returns `true` iff any tile drain survives.
pub fn write_drain_file(
    old: &Path,
    new: &Path,
    nodes: &RetainedSet,
    hydrograph_key: DrainHydrographKey,
) -> Result<bool> {
    let mut doc = rewrite::load(old)?;
    let parse = |e| SubError::parse(old, e);

    // -- tile drains
    let ntd = read_count(&doc, 0, 0).map_err(parse)?;
    let cursor = skip_data_lines(&doc, ntd.line + 1, 3).map_err(parse)?;
    let (drains, end) = read_table(&doc, cursor, ntd.value, 1).map_err(parse)?;

    let mut declared_ids = Vec::new();
    let mut kept_ids = Vec::new();
    let mut kept_nodes = Vec::new();
    for record in &drains {
        declared_ids.push(record.int(0).map_err(parse)?);
    }
    let (kept_drains, cursor) = rewrite::filter_records(&mut doc, ntd.line, &drains, end, |r| {
        let id = r.int(0)?;
        let node = r.int(1)?;
        if nodes.contains(node) {
            kept_ids.push(id);
            kept_nodes.push(node);
            Ok(true)
        } else {
            Ok(false)
        }
    })
    .map_err(parse)?;

    // -- subsurface irrigation
    let nsi = read_count(&doc, cursor, 0).map_err(parse)?;
    let cursor = skip_data_lines(&doc, nsi.line + 1, 3).map_err(parse)?;
    let (irrigation, end) = read_table(&doc, cursor, nsi.value, 1).map_err(parse)?;
    let (kept_irrigation, cursor) =
        rewrite::filter_records(&mut doc, nsi.line, &irrigation, end, |r| {
            Ok(nodes.contains(r.int(1)?))
        })
        .map_err(parse)?;

    // -- tile drain hydrographs
    let nouttd = read_count(&doc, cursor, 0).map_err(parse)?;
    let cursor = skip_data_lines(&doc, nouttd.line + 1, 3).map_err(parse)?;
    let (hydrographs, end) = read_table(&doc, cursor, nouttd.value, 1).map_err(parse)?;

    if hydrograph_key == DrainHydrographKey::ByDrainId {
        for record in &hydrographs {
            let drain = record.int(1).map_err(parse)?;
            if !declared_ids.contains(&drain) {
                return Err(SubError::cross_reference(
                    old,
                    record.start,
                    format!("hydrograph references undeclared tile drain {drain}"),
                ));
            }
        }
    }
    let keep: RetainedSet = match hydrograph_key {
        DrainHydrographKey::ByDrainId => kept_ids.iter().copied().collect(),
        DrainHydrographKey::ByDrainNode => kept_nodes.iter().copied().collect(),
    };
    let (kept_hydrographs, _) =
        rewrite::filter_records(&mut doc, nouttd.line, &hydrographs, end, |r| {
            Ok(keep.contains(r.int(1)?))
        })
        .map_err(parse)?;

    rewrite::save(&doc, new)?;
    debug!(
        path = %new.display(),
        drains = kept_drains,
        irrigation = kept_irrigation,
        hydrographs = kept_hydrographs,
        "wrote tile drain file"
    );
    Ok(kept_drains > 0)
}
