//! Element pumping specification file rewriter.
//!
//! Two counted sections:
//! - `NSINK`: one pumping spec per line, element id in column 0;
//! - `NGRP`: delivery element groups (`<id> <count> <first element>` plus one
//!   continuation line per further element).
//!
//! Specs and group members outside the retained element set are dropped. A
//! group whose members are all dropped disappears and `NGRP` decrements;
//! partially covered groups are re-emitted with updated member counts.

use std::path::Path;

use gws_ascii::{read_count, read_groups, read_table};
use gws_model::RetainedSet;
use tracing::debug;

use crate::error::{Result, SubError};
use crate::rewrite;

/// Filter the element pumping file at `old` against `elements` and write the
/// result to `new`. Returns `true` iff any pumping spec survives, which the
/// caller uses to blank the manifest slot for a near-empty submodel.
pub fn write_pumping_file(old: &Path, new: &Path, elements: &RetainedSet) -> Result<bool> {
    let mut doc = rewrite::load(old)?;

    let nsink = read_count(&doc, 0, 0).map_err(|e| SubError::parse(old, e))?;
    let (specs, end) =
        read_table(&doc, nsink.line + 1, nsink.value, 1).map_err(|e| SubError::parse(old, e))?;
    let (kept_specs, cursor) = rewrite::filter_records(&mut doc, nsink.line, &specs, end, |r| {
        Ok(elements.contains(r.int(0)?))
    })
    .map_err(|e| SubError::parse(old, e))?;

    let ngrp = read_count(&doc, cursor, 0).map_err(|e| SubError::parse(old, e))?;
    let (groups, end) =
        read_groups(&doc, ngrp.line + 1, ngrp.value).map_err(|e| SubError::parse(old, e))?;
    let (kept_groups, _) = rewrite::filter_groups(&mut doc, ngrp.line, &groups, end, elements)
        .map_err(|e| SubError::parse(old, e))?;

    rewrite::save(&doc, new)?;
    debug!(
        path = %new.display(),
        specs = kept_specs,
        groups = kept_groups,
        "wrote element pumping file"
    );
    Ok(kept_specs > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gws_ascii::LineDoc;
    use std::fs;

    fn pumping_fixture(group2: &str) -> String {
        format!(
            "\
C  Element pumping specifications
     4                            / NSINK
  1  1  -0.5
  3  1  -0.7
  5  2  -0.2
  7  1  -0.9
C  Delivery element groups
     2                            / NGRP
\t1\t3\t1
\t\t\t2
\t\t\t3
{group2}
"
        )
    }

    #[test]
    fn groups_shrink_but_survive_while_any_member_remains() {
        let dir = tempfile::tempdir().expect("temp dir");
        let old = dir.path().join("epump.dat");
        let new = dir.path().join("epump_sub.dat");
        fs::write(&old, pumping_fixture("\t2\t4\t4\n\t\t\t5\n\t\t\t6\n\t\t\t7"))
            .expect("write fixture");

        let elements: RetainedSet = [1, 3, 5, 6].into_iter().collect();
        let any = write_pumping_file(&old, &new, &elements).expect("rewrite");
        assert!(any);

        let doc = LineDoc::from_file(&new).expect("read output");
        assert_eq!(doc.line(1), Some("     3                            / NSINK"));
        assert_eq!(doc.line(2), Some("  1  1  -0.5"));
        assert_eq!(doc.line(3), Some("  3  1  -0.7"));
        assert_eq!(doc.line(4), Some("  5  2  -0.2"));
        assert_eq!(doc.line(6), Some("     2                            / NGRP"));
        assert_eq!(doc.line(7), Some("\t1\t2\t1"));
        assert_eq!(doc.line(8), Some("\t\t\t3"));
        assert_eq!(doc.line(9), Some("\t2\t2\t5"));
        assert_eq!(doc.line(10), Some("\t\t\t6"));
        assert_eq!(doc.len(), 11);
    }

    #[test]
    fn a_fully_filtered_group_decrements_the_group_count() {
        let dir = tempfile::tempdir().expect("temp dir");
        let old = dir.path().join("epump.dat");
        let new = dir.path().join("epump_sub.dat");
        fs::write(&old, pumping_fixture("\t2\t3\t10\n\t\t\t20\n\t\t\t30"))
            .expect("write fixture");

        let elements: RetainedSet = [1, 2].into_iter().collect();
        let any = write_pumping_file(&old, &new, &elements).expect("rewrite");
        assert!(any);

        let doc = LineDoc::from_file(&new).expect("read output");
        assert_eq!(doc.line(1), Some("     1                            / NSINK"));
        assert_eq!(doc.line(4), Some("     1                            / NGRP"));
        assert_eq!(doc.line(5), Some("\t1\t2\t1"));
        assert_eq!(doc.line(6), Some("\t\t\t2"));
        assert_eq!(doc.len(), 7);
    }

    #[test]
    fn no_surviving_specs_reports_false() {
        let dir = tempfile::tempdir().expect("temp dir");
        let old = dir.path().join("epump.dat");
        let new = dir.path().join("epump_sub.dat");
        fs::write(&old, pumping_fixture("\t2\t1\t4")).expect("write fixture");

        let elements: RetainedSet = [99].into_iter().collect();
        let any = write_pumping_file(&old, &new, &elements).expect("rewrite");
        assert!(!any);

        let doc = LineDoc::from_file(&new).expect("read output");
        assert_eq!(doc.line(1), Some("     0                            / NSINK"));
        assert_eq!(doc.line(3), Some("     0                            / NGRP"));
        assert_eq!(doc.len(), 4);
    }
}
