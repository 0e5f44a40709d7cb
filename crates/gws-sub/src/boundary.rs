//! General-head boundary condition file rewriter.
//!
//! Layout: comments, an `NGB` count header, then one record per boundary
//! node (`<node_id> <layer> <conductance> <head> ...`). Records whose node id
//! is outside the retained node set are dropped and `NGB` is recounted.

use std::path::Path;

use gws_ascii::{read_count, read_table};
use gws_model::RetainedSet;
use tracing::debug;

use crate::error::{Result, SubError};
use crate::rewrite;

/// Filter the boundary condition file at `old` against `nodes` and write the
/// result to `new`. Returns the number of boundary records kept.
pub fn write_boundary_file(old: &Path, new: &Path, nodes: &RetainedSet) -> Result<usize> {
    let mut doc = rewrite::load(old)?;

    let header = read_count(&doc, 0, 0).map_err(|e| SubError::parse(old, e))?;
    let (records, end) =
        read_table(&doc, header.line + 1, header.value, 1).map_err(|e| SubError::parse(old, e))?;
    let (kept, _) = rewrite::filter_records(&mut doc, header.line, &records, end, |r| {
        Ok(nodes.contains(r.int(0)?))
    })
    .map_err(|e| SubError::parse(old, e))?;

    rewrite::save(&doc, new)?;
    debug!(path = %new.display(), kept, of = header.value, "wrote boundary condition file");
    Ok(kept)
}
