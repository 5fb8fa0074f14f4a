//! In-memory model of the knowledge-base document.
//!
//! A document is free-form Markdown with exactly one record section: a
//! heading ([`RECORD_HEADING`]) followed by a pipe table. Parsing splits the
//! text into three regions:
//!
//! ```text
//! header   prose before the table, the heading, and the table's own
//!          structural lines (column titles, separator, blank lines)
//! records  data rows, in document order
//! footer   everything from the first non-table line after the section
//! ```
//!
//! Serializing strips the old structural lines out of the header, renders a
//! fresh table from `records`, and reattaches the footer verbatim. Rows are
//! not escaped, so a cell containing `|` or a line break cannot round-trip;
//! [`Record::validate`](crate::models::Record::validate) guards the write path.

use tracing::{debug, warn};

use crate::models::Record;

/// Heading that opens the record section.
pub const RECORD_HEADING: &str = "## 仓库列表";
/// Heading the regenerated record section is placed in front of.
pub const USAGE_HEADING: &str = "## 使用说明";
/// Title of the first column, used to recognise the table head row.
pub const NAME_TITLE: &str = "仓库名";
pub const TABLE_HEAD: &str = "| 仓库名 | 一句话摘要 | 本地路径 |";
pub const TABLE_SEPARATOR: &str = "|--------|-----------|----------|";
/// Placeholder text older documents used for an empty table.
pub const EMPTY_PLACEHOLDER: &str = "暂无仓库记录";

const DELIMITER: char = '|';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Header,
    Table,
    Footer,
}

/// Classification of a line starting with the cell delimiter.
#[derive(Debug, PartialEq, Eq)]
enum Row {
    Separator,
    Title,
    Placeholder,
    Data(Record),
    Malformed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub header: Vec<String>,
    pub records: Vec<Record>,
    pub footer: Vec<String>,
    /// Input used `\r\n`; lines are stored without the `\r` and written back
    /// with it.
    pub crlf: bool,
}

impl Document {
    /// Parse raw document text.
    ///
    /// Never fails: text without a record section parses to no records with
    /// the whole text in `header`.
    pub fn parse(text: &str) -> Self {
        let mut doc = Document {
            crlf: text.contains("\r\n"),
            ..Document::default()
        };
        let mut region = Region::Header;

        for (lineno, line) in text.split('\n').enumerate() {
            let line = if doc.crlf {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            };
            match region {
                Region::Header => {
                    if is_record_heading(line) {
                        region = Region::Table;
                    }
                    doc.header.push(line.to_string());
                }
                Region::Table if is_table_row(line) => match classify_row(line) {
                    Row::Separator | Row::Title => doc.header.push(line.to_string()),
                    Row::Data(record) => doc.records.push(record),
                    Row::Placeholder => {}
                    Row::Malformed => {
                        warn!(line = lineno + 1, "skipping malformed table row: {}", line);
                    }
                },
                Region::Table if line.trim().is_empty() => doc.header.push(line.to_string()),
                Region::Table => {
                    region = Region::Footer;
                    doc.footer.push(line.to_string());
                }
                Region::Footer => doc.footer.push(line.to_string()),
            }
        }

        debug!(
            records = doc.records.len(),
            header_lines = doc.header.len(),
            footer_lines = doc.footer.len(),
            "parsed document"
        );
        doc
    }

    /// Render the document back to text with the record section regenerated
    /// from `records`.
    pub fn serialize(&self) -> String {
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let header = rebuild_header(&self.header, &self.records);
        let mut out = header.join(eol);
        out.push_str(eol);
        if !self.footer.is_empty() {
            out.push_str(eol);
            out.push_str(&self.footer.join(eol));
        }
        out
    }

    /// Index of the record whose name equals `name` exactly.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }
}

/// Replace the record section inside `header` with one rendered from
/// `records`.
///
/// Old headings, column-title rows, separators, placeholders and the blank
/// lines inside the old section are removed first, so applying this to its
/// own output is stable. The fresh section goes in front of the first
/// [`USAGE_HEADING`] left in the header, or at the end if there is none.
pub fn rebuild_header(header: &[String], records: &[Record]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(header.len());
    let mut in_section = false;

    for line in header {
        if is_record_heading(line) {
            in_section = true;
            continue;
        }
        if is_table_row(line) && is_structural_row(line) {
            continue;
        }
        if in_section {
            if line.trim().is_empty() {
                continue;
            }
            in_section = false;
        }
        kept.push(line.clone());
    }
    trim_trailing_blank(&mut kept);

    let section = render_record_section(records);
    let mut out = Vec::with_capacity(kept.len() + section.len() + 2);

    match kept.iter().position(|l| is_usage_heading(l)) {
        Some(anchor) => {
            let (before, after) = kept.split_at(anchor);
            out.extend_from_slice(before);
            trim_trailing_blank(&mut out);
            if !out.is_empty() {
                out.push(String::new());
            }
            out.extend(section);
            out.push(String::new());
            out.extend_from_slice(after);
        }
        None => {
            out.extend(kept);
            if !out.is_empty() {
                out.push(String::new());
            }
            out.extend(section);
        }
    }

    out
}

/// Heading, blank line, column titles, separator, then one row per record.
pub fn render_record_section(records: &[Record]) -> Vec<String> {
    let mut lines = Vec::with_capacity(records.len() + 4);
    lines.push(RECORD_HEADING.to_string());
    lines.push(String::new());
    lines.push(TABLE_HEAD.to_string());
    lines.push(TABLE_SEPARATOR.to_string());
    lines.extend(records.iter().map(render_row));
    lines
}

/// Whether `record` parses back to itself once rendered as a row.
///
/// Fails for rows the parser treats as structure or drops, and for cells
/// with surrounding whitespace, which parsing trims.
pub fn row_round_trips(record: &Record) -> bool {
    match classify_row(&render_row(record)) {
        Row::Data(parsed) => parsed == *record,
        _ => false,
    }
}

pub fn render_row(record: &Record) -> String {
    format!(
        "| {} | {} | {} |",
        record.name, record.summary, record.local_path
    )
}

fn is_record_heading(line: &str) -> bool {
    line.trim_end() == RECORD_HEADING
}

fn is_usage_heading(line: &str) -> bool {
    line.trim_end() == USAGE_HEADING
}

fn is_table_row(line: &str) -> bool {
    line.starts_with(DELIMITER)
}

fn is_structural_row(line: &str) -> bool {
    matches!(
        classify_row(line),
        Row::Separator | Row::Title | Row::Placeholder
    )
}

/// Cells between the leading and trailing delimiter, trimmed.
fn split_cells(line: &str) -> Vec<&str> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1].iter().map(|c| c.trim()).collect()
}

fn is_separator(cells: &[&str]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
        && cells.iter().any(|c| c.contains("---"))
}

fn classify_row(line: &str) -> Row {
    let cells = split_cells(line);

    if is_separator(&cells) {
        return Row::Separator;
    }
    match cells.first() {
        Some(&first) if first == NAME_TITLE => return Row::Title,
        Some(&first) if first.starts_with('_') || first.contains(EMPTY_PLACEHOLDER) => {
            return Row::Placeholder
        }
        _ => {}
    }
    if cells.len() < 2 || cells[0].is_empty() {
        return Row::Malformed;
    }

    Row::Data(Record::new(
        cells[0],
        cells[1],
        cells.get(2).copied().unwrap_or(""),
    ))
}

fn trim_trailing_blank(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# GitHub Knowledge Base

> 本地 GitHub 仓库知识库
> 位置: /kb

## 配置

- **知识库根目录**: `/kb`
- **创建时间**: 2026-01-01T00:00:00

## 仓库列表

| 仓库名 | 一句话摘要 | 本地路径 |
|--------|-----------|----------|
| alpha | First repo | /kb/alpha |
| beta | Second repo | /kb/beta |

## 使用说明

- notes
";

    fn names(doc: &Document) -> Vec<&str> {
        doc.records.iter().map(|r| r.name.as_str()).collect()
    }

    fn count(text: &str, needle: &str) -> usize {
        text.lines().filter(|l| l.trim_end() == needle).count()
    }

    #[test]
    fn test_parse_records_in_order() {
        let doc = Document::parse(SAMPLE);
        assert_eq!(names(&doc), vec!["alpha", "beta"]);
        assert_eq!(doc.records[0].summary, "First repo");
        assert_eq!(doc.records[1].local_path, "/kb/beta");
    }

    #[test]
    fn test_parse_regions() {
        let doc = Document::parse(SAMPLE);
        assert_eq!(doc.header[0], "# GitHub Knowledge Base");
        assert!(doc.header.iter().any(|l| l == RECORD_HEADING));
        assert!(doc.header.iter().any(|l| l == TABLE_HEAD));
        assert!(doc.header.iter().any(|l| l == TABLE_SEPARATOR));
        assert_eq!(doc.footer[0], USAGE_HEADING);
        assert_eq!(doc.footer.join("\n"), "## 使用说明\n\n- notes\n");
    }

    #[test]
    fn test_parse_without_record_section() {
        let text = "# Notes\n\nJust prose | with a pipe.\n";
        let doc = Document::parse(text);
        assert!(doc.records.is_empty());
        assert_eq!(doc.header.join("\n"), text);
        assert!(doc.footer.is_empty());
    }

    #[test]
    fn test_parse_empty_table_keeps_structure_in_header() {
        let text = "## 仓库列表\n\n| 仓库名 | 一句话摘要 | 本地路径 |\n|--------|-----------|----------|\n| _暂无仓库记录_ | | |\n\n## 使用说明\n";
        let doc = Document::parse(text);
        assert!(doc.records.is_empty());
        assert_eq!(
            doc.header,
            vec![RECORD_HEADING, "", TABLE_HEAD, TABLE_SEPARATOR, ""]
        );
        assert_eq!(doc.footer, vec![USAGE_HEADING, ""]);
    }

    #[test]
    fn test_parse_skips_short_and_placeholder_rows() {
        let text = "## 仓库列表\n| only-one-cell |\n|  | empty name | x |\n| 暂无仓库记录 | | |\n| ok | fine |\n";
        let doc = Document::parse(text);
        assert_eq!(doc.records, vec![Record::new("ok", "fine", "")]);
    }

    #[test]
    fn test_dashes_in_summary_are_data() {
        let text = "## 仓库列表\n| diff | a --- b | /x |\n";
        let doc = Document::parse(text);
        assert_eq!(doc.records, vec![Record::new("diff", "a --- b", "/x")]);
    }

    #[test]
    fn test_second_heading_after_section_is_footer() {
        let text = "## 仓库列表\n| a | one | |\nprose\n## 仓库列表\n| b | two | |\n";
        let doc = Document::parse(text);
        assert_eq!(names(&doc), vec!["a"]);
        assert_eq!(doc.footer[1], RECORD_HEADING);
        assert_eq!(doc.footer[2], "| b | two | |");
    }

    #[test]
    fn test_parse_tolerates_crlf() {
        let text = "## 仓库列表\r\n\r\n| 仓库名 | 一句话摘要 | 本地路径 |\r\n|---|---|---|\r\n| a | one | /a |\r\n";
        let doc = Document::parse(text);
        assert_eq!(doc.records, vec![Record::new("a", "one", "/a")]);
    }

    #[test]
    fn test_crlf_document_stays_crlf() {
        let text = SAMPLE.replace('\n', "\r\n");
        let mut doc = Document::parse(&text);
        assert!(doc.crlf);
        assert_eq!(doc.footer[0], USAGE_HEADING);
        doc.records.push(Record::new("gamma", "Third", "/kb/gamma"));

        let out = doc.serialize();
        assert!(!out.replace("\r\n", "").contains(['\r', '\n']));
        assert!(out.contains("| gamma | Third | /kb/gamma |\r\n\r\n## 使用说明\r\n"));
        assert_eq!(Document::parse(&out).serialize(), out);
    }

    #[test]
    fn test_placeholder_phrase_in_summary_is_data() {
        let text = "## 仓库列表\n| demo | 示例：暂无仓库记录 提示 | /d |\n";
        let doc = Document::parse(text);
        assert_eq!(
            doc.records,
            vec![Record::new("demo", "示例：暂无仓库记录 提示", "/d")]
        );
    }

    #[test]
    fn test_row_round_trips() {
        assert!(row_round_trips(&Record::new("a", "one", "")));
        assert!(!row_round_trips(&Record::new("_a", "one", "")));
        assert!(!row_round_trips(&Record::new(NAME_TITLE, "one", "")));
        assert!(!row_round_trips(&Record::new("a", "one ", "")));
    }

    #[test]
    fn test_serialize_roundtrip_records() {
        let doc = Document::parse(SAMPLE);
        let again = Document::parse(&doc.serialize());
        assert_eq!(again.records, doc.records);
    }

    #[test]
    fn test_serialize_is_stable() {
        let first = Document::parse(SAMPLE).serialize();
        let second = Document::parse(&first).serialize();
        assert_eq!(first, second);
        assert_eq!(count(&second, RECORD_HEADING), 1);
        assert_eq!(count(&second, TABLE_HEAD), 1);
        assert_eq!(count(&second, TABLE_SEPARATOR), 1);
    }

    #[test]
    fn test_serialize_layout() {
        let mut doc = Document::parse(SAMPLE);
        doc.records.push(Record::new("gamma", "Third", "/kb/gamma"));
        let text = doc.serialize();
        assert!(text.contains(
            "- **创建时间**: 2026-01-01T00:00:00\n\n## 仓库列表\n\n| 仓库名 | 一句话摘要 | 本地路径 |\n|--------|-----------|----------|\n| alpha | First repo | /kb/alpha |\n| beta | Second repo | /kb/beta |\n| gamma | Third | /kb/gamma |\n\n## 使用说明\n\n- notes\n"
        ));
    }

    #[test]
    fn test_serialize_preserves_foreign_prose() {
        let text = SAMPLE
            .replace("## 配置", "Some *hand-written* intro.\n\n## 配置")
            .replace("- notes", "- notes\n\nTrailing remark | not a row");
        let mut doc = Document::parse(&text);
        doc.records.push(Record::new("gamma", "Third", ""));
        let out = doc.serialize();
        assert!(out.contains("Some *hand-written* intro.\n\n## 配置"));
        assert!(out.ends_with("- notes\n\nTrailing remark | not a row\n"));
    }

    #[test]
    fn test_rebuild_header_is_idempotent() {
        let doc = Document::parse(SAMPLE);
        let once = rebuild_header(&doc.header, &doc.records);
        let twice = rebuild_header(&once, &doc.records);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rebuild_header_strips_repeated_artifacts() {
        let header: Vec<String> = [
            "# Title",
            "",
            RECORD_HEADING,
            "",
            TABLE_HEAD,
            TABLE_SEPARATOR,
            TABLE_HEAD,
            "|---|---|---|",
            "| _暂无仓库记录_ | | |",
            "",
            "",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rebuilt = rebuild_header(&header, &[Record::new("a", "one", "/a")]);
        assert_eq!(
            rebuilt,
            vec![
                "# Title",
                "",
                RECORD_HEADING,
                "",
                TABLE_HEAD,
                TABLE_SEPARATOR,
                "| a | one | /a |",
            ]
        );
    }

    #[test]
    fn test_rebuild_inserts_before_usage_anchor() {
        let text = "# Title\n\n## 使用说明\n- read me\n";
        let mut doc = Document::parse(text);
        assert!(doc.records.is_empty());
        doc.records.push(Record::new("a", "one", "/a"));
        let out = doc.serialize();
        assert_eq!(
            out,
            "# Title\n\n## 仓库列表\n\n| 仓库名 | 一句话摘要 | 本地路径 |\n|--------|-----------|----------|\n| a | one | /a |\n\n## 使用说明\n- read me\n"
        );
        assert_eq!(Document::parse(&out).serialize(), out);
    }

    #[test]
    fn test_rebuild_appends_without_anchor() {
        let mut doc = Document::parse("# Title\n");
        doc.records.push(Record::new("a", "one", ""));
        let out = doc.serialize();
        assert_eq!(
            out,
            "# Title\n\n## 仓库列表\n\n| 仓库名 | 一句话摘要 | 本地路径 |\n|--------|-----------|----------|\n| a | one |  |\n"
        );
        assert_eq!(Document::parse(&out).records, doc.records);
    }

    #[test]
    fn test_empty_local_path_roundtrips() {
        let row = render_row(&Record::new("a", "", ""));
        assert_eq!(row, "| a |  |  |");
        let doc = Document::parse(&format!("{}\n{}\n", RECORD_HEADING, row));
        assert_eq!(doc.records, vec![Record::new("a", "", "")]);
    }

    #[test]
    fn test_position_is_case_sensitive() {
        let doc = Document::parse(SAMPLE);
        assert_eq!(doc.position("beta"), Some(1));
        assert_eq!(doc.position("Beta"), None);
    }
}
