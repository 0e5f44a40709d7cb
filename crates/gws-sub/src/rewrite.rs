//! Shared mechanics of the per-file-type rewriters.
//!
//! Every rewriter follows the same shape: read the whole file into a
//! [`LineDoc`], read each counted section, keep only entries whose key is in
//! the relevant retained set, splice the survivors back in original relative
//! order, patch the count header, and write the new file. The helpers here
//! carry the splice-and-recount step so the per-file modules only decide
//! which column is the key and which set applies.

use std::path::Path;

use gws_ascii::{Group, LineDoc, ParseError, Record};
use gws_model::RetainedSet;

use crate::error::{Result, SubError};

/// Read a source file into memory; failures are fatal before any parsing.
pub(crate) fn load(path: &Path) -> Result<LineDoc> {
    LineDoc::from_file(path).map_err(|e| SubError::io(path, e))
}

/// Write the rewritten document. Only called after the source parsed in full.
pub(crate) fn save(doc: &LineDoc, path: &Path) -> Result<()> {
    doc.write_file(path).map_err(|e| SubError::io(path, e))
}

/// Filter a record run in place.
///
/// `records` and `end` come straight from `read_table`. Kept records are
/// spliced back verbatim in their original relative order and the count
/// header is patched. Returns the kept count and the new cursor. An empty
/// section (count header already zero) is legal and left untouched.
pub(crate) fn filter_records<F>(
    doc: &mut LineDoc,
    header_line: usize,
    records: &[Record],
    end: usize,
    keep: F,
) -> std::result::Result<(usize, usize), ParseError>
where
    F: FnMut(&Record) -> std::result::Result<bool, ParseError>,
{
    let (kept, next) = filter_records_uncounted(doc, records, end, keep)?;
    doc.set_count(header_line, kept)?;
    Ok((kept, next))
}

/// [`filter_records`] for a record run with no count header of its own, such
/// as the per-node initial-condition table whose length is fixed by an
/// earlier section.
pub(crate) fn filter_records_uncounted<F>(
    doc: &mut LineDoc,
    records: &[Record],
    end: usize,
    mut keep: F,
) -> std::result::Result<(usize, usize), ParseError>
where
    F: FnMut(&Record) -> std::result::Result<bool, ParseError>,
{
    let Some(first) = records.first() else {
        return Ok((0, end));
    };
    let span_start = first.start;
    let span_len = end - span_start;
    let mut kept_lines = Vec::new();
    let mut kept = 0usize;
    for record in records {
        if keep(record)? {
            kept += 1;
            for offset in 0..record.lines {
                let line = doc
                    .line(record.start + offset)
                    .ok_or_else(|| ParseError::new(record.start + offset, "record line out of range"))?;
                kept_lines.push(line.to_string());
            }
        }
    }
    let next = span_start + kept_lines.len();
    doc.splice(span_start, span_len, kept_lines);
    Ok((kept, next))
}

/// Filter a group run in place.
///
/// Each group keeps only members present in `retained`; a group left with no
/// members is removed entirely and the parent count header decremented.
/// Surviving groups are re-emitted with their original ids, updated member
/// counts, and any extra header tokens preserved.
pub(crate) fn filter_groups(
    doc: &mut LineDoc,
    header_line: usize,
    groups: &[Group],
    end: usize,
    retained: &RetainedSet,
) -> std::result::Result<(usize, usize), ParseError> {
    let Some(first) = groups.first() else {
        doc.set_count(header_line, 0)?;
        return Ok((0, end));
    };
    let span_start = first.start;
    let span_len = end - span_start;
    let mut out = Vec::new();
    let mut kept = 0usize;
    for group in groups {
        let members: Vec<i64> = group
            .members
            .iter()
            .copied()
            .filter(|&m| retained.contains(m))
            .collect();
        if members.is_empty() {
            continue;
        }
        kept += 1;
        out.extend(render_group(group, &members));
    }
    let next = span_start + out.len();
    doc.splice(span_start, span_len, out);
    doc.set_count(header_line, kept)?;
    Ok((kept, next))
}

/// Re-emit one group: header with original id and surviving member count,
/// then one continuation line per further member.
fn render_group(group: &Group, members: &[i64]) -> Vec<String> {
    let mut header = format!("\t{}\t{}\t{}", group.id, members.len(), members[0]);
    for extra in &group.extras {
        header.push('\t');
        header.push_str(extra);
    }
    let mut lines = vec![header];
    for &member in &members[1..] {
        lines.push(format!("\t\t\t{member}"));
    }
    lines
}
