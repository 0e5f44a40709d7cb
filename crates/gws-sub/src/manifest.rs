//! File-name slots and the top-level manifest rewriter.
//!
//! A slot is a data line holding either a filename (`    name.dat  / TAG`)
//! or an absent-file marker: a line whose first token begins with `/` where
//! a filename is expected. Rewriters must reproduce the marker, not an empty
//! string, when the target submodel also lacks that optional component.
//!
//! The manifest itself opens with comments and three title lines, then names
//! the node coordinate file (`NODEFL`), the aquifer main file (`GWFL`), and
//! optionally the lake file (`LAKEFL`), in that order.

use std::path::Path;

use gws_ascii::{LineDoc, ParseError, next_value, skip_data_lines};
use tracing::debug;

use crate::error::{Result, SubError};
use crate::names::SubmodelNames;
use crate::rewrite;

/// One file-name slot: the filename if present, and the line it sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSlot {
    pub name: Option<String>,
    pub line: usize,
}

impl FileSlot {
    pub fn is_present(&self) -> bool {
        self.name.is_some()
    }
}

/// Read the slot on the next data line after `cursor`.
pub(crate) fn read_slot(doc: &LineDoc, cursor: usize) -> std::result::Result<FileSlot, ParseError> {
    let token = next_value(doc, cursor, 0, 0)?;
    let name = if token.text.starts_with('/') {
        None
    } else {
        Some(token.text)
    };
    Ok(FileSlot {
        name,
        line: token.line,
    })
}

/// Point a slot at a new filename, regenerating the line with its tag.
pub(crate) fn set_slot(doc: &mut LineDoc, line: usize, name: &str, tag: &str) {
    doc.set_line(line, format!("{:<53}/ {tag}", format!("    {name}")));
}

/// Blank a slot back to the absent-file marker.
pub(crate) fn clear_slot(doc: &mut LineDoc, line: usize, tag: &str) {
    doc.set_line(line, format!("{:<53}/ {tag}", ""));
}

/// The manifest's three slots as read from an existing model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub node: FileSlot,
    pub aquifer: FileSlot,
    pub lake: FileSlot,
}

/// Read the slots of the manifest at `path` without modifying anything.
pub fn read_manifest_file(path: &Path) -> Result<Manifest> {
    let doc = rewrite::load(path)?;
    read_slots(&doc).map_err(|e| SubError::parse(path, e))
}

fn read_slots(doc: &LineDoc) -> std::result::Result<Manifest, ParseError> {
    let cursor = skip_data_lines(doc, 0, 3)?;
    let node = read_slot(doc, cursor)?;
    let aquifer = read_slot(doc, node.line + 1)?;
    let lake = read_slot(doc, aquifer.line + 1)?;
    Ok(Manifest {
        node,
        aquifer,
        lake,
    })
}

/// Rewrite the manifest at `old` for the submodel: present slots point at
/// the new file names, and the lake slot is blanked to the absent marker
/// when the submodel has no lakes left.
pub fn write_manifest_file(
    old: &Path,
    new: &Path,
    names: &SubmodelNames,
    has_lake: bool,
) -> Result<()> {
    let mut doc = rewrite::load(old)?;
    let slots = read_slots(&doc).map_err(|e| SubError::parse(old, e))?;

    if slots.node.is_present() {
        set_slot(&mut doc, slots.node.line, &names.node_file, "NODEFL");
    }
    if slots.aquifer.is_present() {
        set_slot(&mut doc, slots.aquifer.line, &names.aquifer_file, "GWFL");
    }
    if slots.lake.is_present() && has_lake {
        set_slot(&mut doc, slots.lake.line, &names.lake_file, "LAKEFL");
    } else {
        clear_slot(&mut doc, slots.lake.line, "LAKEFL");
    }

    rewrite::save(&doc, new)?;
    debug!(path = %new.display(), has_lake, "wrote manifest file");
    Ok(())
}
