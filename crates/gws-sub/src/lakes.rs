//! Lake definition file rewriter.
//!
//! One counted section: `NLAKE`, each lake a counted group of the element
//! ids it covers (`<lake_id> <count> <first element> [extras...]` plus one
//! continuation line per further element). A lake left with no elements in
//! the submodel disappears and `NLAKE` decrements.

use std::path::Path;

use gws_ascii::{read_count, read_groups};
use gws_model::RetainedSet;
use tracing::debug;

use crate::error::{Result, SubError};
use crate::rewrite;

/// Filter the lake file at `old` against `elements` and write the result to
/// `new`. Returns `true` iff any lake survives; the driver uses this to
/// reproduce the absent-file marker in the manifest when the submodel has no
/// lakes left.
pub fn write_lake_file(old: &Path, new: &Path, elements: &RetainedSet) -> Result<bool> {
    let mut doc = rewrite::load(old)?;

    let nlake = read_count(&doc, 0, 0).map_err(|e| SubError::parse(old, e))?;
    let (lakes, end) =
        read_groups(&doc, nlake.line + 1, nlake.value).map_err(|e| SubError::parse(old, e))?;
    let (kept, _) = rewrite::filter_groups(&mut doc, nlake.line, &lakes, end, elements)
        .map_err(|e| SubError::parse(old, e))?;

    rewrite::save(&doc, new)?;
    debug!(path = %new.display(), kept, of = nlake.value, "wrote lake file");
    Ok(kept > 0)
}
