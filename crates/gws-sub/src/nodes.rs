//! Node coordinate file rewriter.
//!
//! Layout: comments, an `ND` count header, one coordinate-conversion factor
//! line, then one record per node (`<node_id> <x> <y>`). Records whose node
//! id is outside the retained node set are dropped and `ND` is recounted.

use std::path::Path;

use gws_ascii::{read_count, read_table, skip_data_lines};
use gws_model::RetainedSet;
use tracing::debug;

use crate::error::{Result, SubError};
use crate::rewrite;

/// Filter the node coordinate file at `old` against `nodes` and write the
/// result to `new`. Returns the number of node records kept.
pub fn write_node_file(old: &Path, new: &Path, nodes: &RetainedSet) -> Result<usize> {
    let mut doc = rewrite::load(old)?;
    let parse = |e| SubError::parse(old, e);

    let header = read_count(&doc, 0, 0).map_err(parse)?;
    let cursor = skip_data_lines(&doc, header.line + 1, 1).map_err(parse)?;
    let (records, end) = read_table(&doc, cursor, header.value, 1).map_err(parse)?;
    let (kept, _) = rewrite::filter_records(&mut doc, header.line, &records, end, |r| {
        Ok(nodes.contains(r.int(0)?))
    })
    .map_err(parse)?;

    rewrite::save(&doc, new)?;
    debug!(path = %new.display(), kept, of = header.value, "wrote node coordinate file");
    Ok(kept)
}
