//! Line-document and scanner primitives for fixed-column groundwater model
//! input files.
//!
//! The file grammar is shared by every input file the model reads:
//! - A line whose first character is `C`, `c`, `*` or `#` is a comment and is
//!   preserved verbatim. An empty line is *not* a comment; where a value is
//!   expected it is a malformed-file error.
//! - A data line is a run of whitespace-separated tokens, optionally followed
//!   by a `/ TAG` annotation that is kept unless the line is regenerated.
//! - A count header is a data line whose leading token is the number of
//!   records or groups in the section that follows it.
//!
//! ## Cursor convention
//!
//! All scanner functions share one convention: the cursor passed in is the
//! index of the first line *not yet consumed*, and a line index coming back
//! names the line a value was read from, so callers resume at `line + 1`.
//! `read_table` and `read_groups` return the new cursor directly. A fresh
//! document starts at cursor 0.

use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

/// Scan or parse failure at a specific line of a document (0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line + 1, self.message)
    }
}

impl std::error::Error for ParseError {}

/// True for lines the model treats as comments.
pub fn is_comment(line: &str) -> bool {
    matches!(line.chars().next(), Some('C' | 'c' | '*' | '#'))
}

/// An ordered, mutable sequence of raw text lines from one input file.
///
/// A `LineDoc` is exclusively owned by the call rewriting one file: it is
/// created at the start of a rewrite, edited in memory, written once, and
/// discarded. The source file is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineDoc {
    lines: Vec<String>,
}

impl LineDoc {
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_text(&raw))
    }

    pub fn from_text(raw: &str) -> Self {
        Self {
            lines: raw.lines().map(str::to_string).collect(),
        }
    }

    /// Write all lines to `path`, one per line with a trailing newline.
    pub fn write_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut body = self.lines.join("\n");
        body.push('\n');
        fs::write(path, body)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, i: usize) -> Option<&str> {
        self.lines.get(i).map(String::as_str)
    }

    pub fn is_comment(&self, i: usize) -> bool {
        self.line(i).is_some_and(is_comment)
    }

    pub fn set_line(&mut self, i: usize, line: String) {
        self.lines[i] = line;
    }

    /// Replace `len` lines starting at `start` with `replacement`.
    pub fn splice(&mut self, start: usize, len: usize, replacement: Vec<String>) {
        self.lines.splice(start..start + len, replacement);
    }

    /// Overwrite the leading integer of a count header in place.
    ///
    /// The new value is right-aligned in the column span of the old token, so
    /// alignment and everything after the count (including a `/ TAG`
    /// annotation) survive untouched.
    pub fn set_count(&mut self, i: usize, value: usize) -> Result<(), ParseError> {
        let line = self
            .line(i)
            .ok_or_else(|| ParseError::new(i, "count header line out of range"))?;
        let start = line
            .find(|c: char| !c.is_whitespace())
            .ok_or_else(|| ParseError::new(i, "blank line where a count header was expected"))?;
        let token_len = line[start..]
            .find(char::is_whitespace)
            .unwrap_or(line.len() - start);
        let patched = format!(
            "{}{:>token_len$}{}",
            &line[..start],
            value,
            &line[start + token_len..]
        );
        self.lines[i] = patched;
        Ok(())
    }
}

/// One whitespace-separated value and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
}

/// A count header: leading integer value plus its line index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountHeader {
    pub value: usize,
    pub line: usize,
}

/// A logical record: one data line, or `lines` physical lines when the table
/// is layered. Tokens of all layers are flattened into one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub tokens: Vec<String>,
    pub start: usize,
    pub lines: usize,
}

impl Record {
    /// Parse the token in `column` as an integer id.
    pub fn int(&self, column: usize) -> Result<i64, ParseError> {
        let token = self.tokens.get(column).ok_or_else(|| {
            ParseError::new(
                self.start,
                format!(
                    "column {column} missing: record has {} value(s)",
                    self.tokens.len()
                ),
            )
        })?;
        token.parse::<i64>().map_err(|_| {
            ParseError::new(self.start, format!("expected an integer id, found '{token}'"))
        })
    }
}

/// A counted group: header `<id> <count> <first member> [extras...]` followed
/// by `count - 1` continuation lines of one member id each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub members: Vec<i64>,
    /// Header tokens after the first member id, preserved on rewrite.
    pub extras: Vec<String>,
    pub start: usize,
    pub lines: usize,
}

/// Advance past a contiguous run of comment lines.
///
/// No-op when `i` already names a data line. Reaching the end of the document
/// inside the run is an error; sections never end in an open comment run.
pub fn skip_comments(doc: &LineDoc, mut i: usize) -> Result<usize, ParseError> {
    while doc.is_comment(i) {
        i += 1;
    }
    if i >= doc.len() {
        return Err(ParseError::new(
            doc.len(),
            "unexpected end of file while skipping comments",
        ));
    }
    Ok(i)
}

/// Advance past `n` data lines, each possibly preceded by a comment run.
pub fn skip_data_lines(doc: &LineDoc, mut i: usize, n: usize) -> Result<usize, ParseError> {
    for _ in 0..n {
        i = skip_comments(doc, i)? + 1;
    }
    Ok(i)
}

/// Skip `skip_data_lines_first` data lines, then a final comment run, and
/// return the requested column of the next data line.
pub fn next_value(
    doc: &LineDoc,
    i: usize,
    column: usize,
    skip_data_lines_first: usize,
) -> Result<Token, ParseError> {
    let i = skip_data_lines(doc, i, skip_data_lines_first)?;
    let i = skip_comments(doc, i)?;
    let line = doc.line(i).unwrap_or_default();
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(ParseError::new(i, "empty data line where a value was expected"));
    }
    let token = tokens.get(column).ok_or_else(|| {
        ParseError::new(
            i,
            format!("column {column} missing: line has {} value(s)", tokens.len()),
        )
    })?;
    Ok(Token {
        text: token.to_string(),
        line: i,
    })
}

/// Read a count header: `next_value` specialised to a leading record count.
pub fn read_count(
    doc: &LineDoc,
    i: usize,
    skip_data_lines_first: usize,
) -> Result<CountHeader, ParseError> {
    let token = next_value(doc, i, 0, skip_data_lines_first)?;
    let value = token.text.parse::<usize>().map_err(|_| {
        ParseError::new(
            token.line,
            format!("expected a record count, found '{}'", token.text),
        )
    })?;
    Ok(CountHeader {
        value,
        line: token.line,
    })
}

/// Read a run of `count` logical records of `layers` physical lines each.
///
/// The run may be preceded by a comment run; the `count * layers` data lines
/// themselves are contiguous. The first line of a record carries the id and
/// layer-1 values, continuation lines carry only further-layer values.
/// Returns the records and the new cursor.
pub fn read_table(
    doc: &LineDoc,
    i: usize,
    count: usize,
    layers: usize,
) -> Result<(Vec<Record>, usize), ParseError> {
    if count == 0 {
        return Ok((Vec::new(), i));
    }
    let layers = layers.max(1);
    let mut i = skip_comments(doc, i)?;
    let mut records = Vec::with_capacity(count);
    for r in 0..count {
        let start = i;
        let mut tokens = Vec::new();
        for _ in 0..layers {
            let line = doc.line(i).ok_or_else(|| {
                ParseError::new(
                    doc.len(),
                    format!("file ends inside a {count}-record table at record {}", r + 1),
                )
            })?;
            if is_comment(line) {
                return Err(ParseError::new(
                    i,
                    format!("comment line inside a {count}-record table"),
                ));
            }
            let row: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if row.is_empty() {
                return Err(ParseError::new(i, "empty data line inside a record table"));
            }
            tokens.extend(row);
            i += 1;
        }
        records.push(Record {
            tokens,
            start,
            lines: layers,
        });
    }
    Ok((records, i))
}

/// Read `group_count` counted groups. Returns the groups and the new cursor.
pub fn read_groups(
    doc: &LineDoc,
    i: usize,
    group_count: usize,
) -> Result<(Vec<Group>, usize), ParseError> {
    if group_count == 0 {
        return Ok((Vec::new(), i));
    }
    let mut i = skip_comments(doc, i)?;
    let mut groups = Vec::with_capacity(group_count);
    for g in 0..group_count {
        let start = i;
        let header = doc.line(i).ok_or_else(|| {
            ParseError::new(doc.len(), format!("file ends at group {} of {group_count}", g + 1))
        })?;
        if is_comment(header) {
            return Err(ParseError::new(i, "comment line where a group header was expected"));
        }
        let tokens: Vec<&str> = header.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(ParseError::new(
                i,
                format!(
                    "group header needs <id> <count> <first member>, found {} value(s)",
                    tokens.len()
                ),
            ));
        }
        let id = parse_int(tokens[0], i)?;
        let member_count = tokens[1].parse::<usize>().map_err(|_| {
            ParseError::new(i, format!("expected a member count, found '{}'", tokens[1]))
        })?;
        if member_count == 0 {
            return Err(ParseError::new(i, format!("group {id} declares zero members")));
        }
        let mut members = vec![parse_int(tokens[2], i)?];
        let extras: Vec<String> = tokens[3..].iter().map(|t| t.to_string()).collect();
        i += 1;
        for _ in 1..member_count {
            let line = doc.line(i).ok_or_else(|| {
                ParseError::new(doc.len(), format!("file ends inside group {id}"))
            })?;
            if is_comment(line) {
                return Err(ParseError::new(i, format!("comment line inside group {id}")));
            }
            let member = line.split_whitespace().next().ok_or_else(|| {
                ParseError::new(i, format!("empty continuation line in group {id}"))
            })?;
            members.push(parse_int(member, i)?);
            i += 1;
        }
        groups.push(Group {
            id,
            members,
            extras,
            start,
            lines: i - start,
        });
    }
    Ok((groups, i))
}

fn parse_int(token: &str, line: usize) -> Result<i64, ParseError> {
    token
        .parse::<i64>()
        .map_err(|_| ParseError::new(line, format!("expected an integer id, found '{token}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(raw: &str) -> LineDoc {
        LineDoc::from_text(raw)
    }

    #[test]
    fn comment_predicate_matches_all_four_markers() {
        for line in ["C header", "c lower", "* stars", "# hash"] {
            assert!(is_comment(line), "{line:?} should be a comment");
        }
        for line in ["  3 / NGB", "   1 2 3", "", "   / no file"] {
            assert!(!is_comment(line), "{line:?} should not be a comment");
        }
    }

    #[test]
    fn skip_comments_stops_on_first_data_line() {
        let d = doc("C one\nC two\n   5 / NGB\n");
        assert_eq!(skip_comments(&d, 0).expect("data line follows"), 2);
        // no-op on a data line
        assert_eq!(skip_comments(&d, 2).expect("still in bounds"), 2);
    }

    #[test]
    fn skip_comments_errors_past_end_of_document() {
        let d = doc("C only comments\nC to the end\n");
        let err = skip_comments(&d, 0).expect_err("should run off the end");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn next_value_skips_data_lines_and_comment_runs() {
        let d = doc(
            "C title\n   first\nC between\n   second extra\n   third\n",
        );
        let token = next_value(&d, 0, 0, 1).expect("second data line");
        assert_eq!(token.text, "second");
        assert_eq!(token.line, 3);
        let token = next_value(&d, token.line + 1, 0, 0).expect("third data line");
        assert_eq!(token.text, "third");
    }

    #[test]
    fn next_value_rejects_empty_data_line() {
        let d = doc("C title\n\n   1\n");
        let err = next_value(&d, 0, 0, 0).expect_err("blank line is malformed");
        assert_eq!(err.line, 1);
        assert!(err.message.contains("empty data line"));
    }

    #[test]
    fn next_value_reports_missing_column() {
        let d = doc("   10 20\n");
        let err = next_value(&d, 0, 5, 0).expect_err("only two columns");
        assert!(err.message.contains("column 5"));
    }

    #[test]
    fn read_count_parses_header_and_rejects_junk() {
        let d = doc("C boundary section\n     3                 / NGB\n");
        let header = read_count(&d, 0, 0).expect("count header");
        assert_eq!(header.value, 3);
        assert_eq!(header.line, 1);

        let bad = doc("   abc / NGB\n");
        let err = read_count(&bad, 0, 0).expect_err("not a count");
        assert!(err.message.contains("record count"));
    }

    #[test]
    fn read_table_returns_flat_rows_and_new_cursor() {
        let d = doc("C data\n  1 10.0 20.0\n  2 11.0 21.0\n  3 12.0 22.0\nC next\n");
        let (rows, cursor) = read_table(&d, 0, 3, 1).expect("three records");
        assert_eq!(rows.len(), 3);
        assert_eq!(cursor, 4);
        assert_eq!(rows[1].int(0).expect("id"), 2);
        assert_eq!(rows[1].start, 2);
    }

    #[test]
    fn read_table_flattens_layered_records() {
        // two records of three layers: id on the first line only
        let d = doc("  1 100. 5.\n    200. 6.\n    300. 7.\n  2 110. 8.\n    210. 9.\n    310. 1.\n");
        let (rows, cursor) = read_table(&d, 0, 2, 3).expect("layered table");
        assert_eq!(cursor, 6);
        assert_eq!(rows[0].tokens, vec!["1", "100.", "5.", "200.", "6.", "300.", "7."]);
        assert_eq!(rows[0].lines, 3);
        assert_eq!(rows[1].int(0).expect("id"), 2);
    }

    #[test]
    fn read_table_fails_when_the_run_is_short() {
        let d = doc("  1 10.0\n  2 11.0\n");
        let err = read_table(&d, 0, 3, 1).expect_err("only two lines remain");
        assert!(err.message.contains("file ends inside"));
    }

    #[test]
    fn read_table_with_zero_count_consumes_nothing() {
        let d = doc("C trailing\n");
        let (rows, cursor) = read_table(&d, 0, 0, 1).expect("empty section");
        assert!(rows.is_empty());
        assert_eq!(cursor, 0);
    }

    #[test]
    fn read_groups_collects_continuation_members() {
        let d = doc("  1 3 11 0.5\n  12\n  13\n  2 1 40\n");
        let (groups, cursor) = read_groups(&d, 0, 2).expect("two groups");
        assert_eq!(cursor, 4);
        assert_eq!(groups[0].id, 1);
        assert_eq!(groups[0].members, vec![11, 12, 13]);
        assert_eq!(groups[0].extras, vec!["0.5"]);
        assert_eq!(groups[0].lines, 3);
        assert_eq!(groups[1].members, vec![40]);
    }

    #[test]
    fn read_groups_rejects_short_header() {
        let d = doc("  1 3\n");
        let err = read_groups(&d, 0, 1).expect_err("header too short");
        assert!(err.message.contains("group header"));
    }

    #[test]
    fn set_count_preserves_alignment_and_tag() {
        let mut d = doc("       13                 / NTD\n");
        d.set_count(0, 2).expect("patch count");
        assert_eq!(d.line(0), Some("        2                 / NTD"));
        // wider than the original field still keeps the tail
        d.set_count(0, 12345).expect("patch count");
        assert_eq!(d.line(0), Some("        12345                 / NTD"));
    }

    #[test]
    fn splice_replaces_a_line_range() {
        let mut d = doc("a\nb\nc\nd\n");
        d.splice(1, 2, vec!["x".to_string()]);
        assert_eq!(d.len(), 3);
        assert_eq!(d.line(1), Some("x"));
        assert_eq!(d.line(2), Some("d"));
    }
}
