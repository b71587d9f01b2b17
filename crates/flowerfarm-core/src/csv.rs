//! # CSV Codec
//!
//! Text-to-rows parsing for crop/variety import and rows-to-text writing for
//! harvest export. No I/O happens here; callers bring the text.
//!
//! ## Import Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Species,Variety,Notes          ← header: "Species" required,          │
//! │  Zinnia,Queen Red Lime,...        "Variety" optional, any case         │
//! │  Zinnia,"Benary's, Giant",...   ← quotes keep commas literal           │
//! │  Dahlia,,...                    ← empty variety → None                 │
//! │  ,Orphan,...                    ← empty species → row dropped          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quote Handling
//! A `"` toggles quoted mode and is itself dropped. Doubled quotes are NOT
//! unescaped, so a field written as `"say ""hi"""` reads back as `say hi`.
//! The export side escapes RFC 4180 style; the two sides are deliberately
//! not symmetric for fields containing quotes.

use crate::error::{CoreError, CoreResult};
use crate::types::{HarvestExportRow, ParsedCropRow};
use crate::EXPORT_HEADER;

/// Line terminator used by the export writer.
pub const LINE_TERMINATOR: &str = "\r\n";

// =============================================================================
// Parsing
// =============================================================================

/// A parsed CSV document: one header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Position of the first header equal to `name`, ignoring case and
    /// surrounding whitespace.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Like [`column_index`](Self::column_index) but missing columns are an error.
    pub fn require_column(&self, name: &str) -> CoreResult<usize> {
        self.column_index(name)
            .ok_or_else(|| CoreError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Trimmed cell at (`row`, `col`), `None` when the row is shorter.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.trim())
    }
}

/// Splits one line on commas, honouring double-quoted sections.
///
/// ```rust
/// use flowerfarm_core::csv::parse_csv_line;
///
/// assert_eq!(parse_csv_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
/// assert_eq!(parse_csv_line(""), vec![""]);
/// ```
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parses a whole document.
///
/// The text is trimmed and split on `\n` / `\r\n`. Returns `None` when fewer
/// than two lines remain (a header alone carries no data).
pub fn parse_csv(text: &str) -> Option<CsvTable> {
    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    if lines.len() < 2 {
        return None;
    }

    Some(CsvTable {
        headers: parse_csv_line(lines[0]),
        rows: lines[1..].iter().map(|l| parse_csv_line(l)).collect(),
    })
}

/// Extracts species/variety pairs for the crop import.
///
/// ## Rules
/// - Fewer than two lines, or no `Species` column → empty result
/// - Rows whose trimmed species cell is empty are skipped
/// - Missing `Variety` column, short row, or blank cell → `variety: None`
///
/// ## Example
/// ```rust
/// use flowerfarm_core::csv::parse_crop_variety_csv;
///
/// let rows = parse_crop_variety_csv("variety,SPECIES\nRed,Rose\n,Tulip\nBlue,\n");
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].species, "Rose");
/// assert_eq!(rows[1].variety, None);
/// ```
pub fn parse_crop_variety_csv(text: &str) -> Vec<ParsedCropRow> {
    let Some(table) = parse_csv(text) else {
        return Vec::new();
    };
    let Ok(species_idx) = table.require_column("species") else {
        return Vec::new();
    };
    let variety_idx = table.column_index("variety");

    (0..table.rows.len())
        .filter_map(|row| {
            let species = table.cell(row, species_idx).unwrap_or("");
            if species.is_empty() {
                return None;
            }
            let variety = variety_idx
                .and_then(|col| table.cell(row, col))
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            Some(ParsedCropRow {
                species: species.to_string(),
                variety,
            })
        })
        .collect()
}

// =============================================================================
// Writing
// =============================================================================

/// Quotes a field when it contains a comma, a double quote or a line break.
///
/// ```rust
/// use flowerfarm_core::csv::escape_csv_field;
///
/// assert_eq!(escape_csv_field("Zinnia"), "Zinnia");
/// assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
/// assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape_csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders one export row (without terminator).
pub fn format_harvest_row(row: &HarvestExportRow) -> String {
    [
        escape_csv_field(&row.harvest_date.format("%Y-%m-%d").to_string()),
        escape_csv_field(&row.crop_name),
        escape_csv_field(row.variety_name.as_deref().unwrap_or("")),
        row.stems_cut.to_string(),
        row.stems_wasted.to_string(),
    ]
    .join(",")
}

/// Renders the full export document: header plus one line per row,
/// joined with `\r\n` (no trailing terminator).
pub fn write_harvest_csv(rows: &[HarvestExportRow]) -> String {
    std::iter::once(EXPORT_HEADER.to_string())
        .chain(rows.iter().map(format_harvest_row))
        .collect::<Vec<_>>()
        .join(LINE_TERMINATOR)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn export_row(d: &str, crop: &str, variety: Option<&str>, cut: i64, wasted: i64) -> HarvestExportRow {
        HarvestExportRow {
            harvest_date: date(d),
            crop_name: crop.to_string(),
            variety_name: variety.map(str::to_string),
            stems_cut: cut,
            stems_wasted: wasted,
        }
    }

    #[test]
    fn test_line_without_quotes() {
        assert_eq!(parse_csv_line("a,b,,c"), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_line_quotes_do_not_unescape() {
        assert_eq!(parse_csv_line(r#""say ""hi""",x"#), vec!["say hi", "x"]);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse_crop_variety_csv("Species,Variety").is_empty());
        assert!(parse_crop_variety_csv("").is_empty());
        assert!(parse_crop_variety_csv("  \r\n  ").is_empty());
    }

    #[test]
    fn test_missing_species_column_is_empty() {
        assert!(parse_crop_variety_csv("Crop,Variety\nRose,Red\n").is_empty());
    }

    #[test]
    fn test_header_match_is_case_insensitive_and_trimmed() {
        let rows = parse_crop_variety_csv(" SPECIES , variety \r\nRose,Red\r\n");
        assert_eq!(
            rows,
            vec![ParsedCropRow {
                species: "Rose".to_string(),
                variety: Some("Red".to_string()),
            }]
        );
    }

    #[test]
    fn test_header_must_match_exactly() {
        assert!(parse_crop_variety_csv("Species Name\nRose\n").is_empty());
    }

    #[test]
    fn test_species_less_rows_are_dropped() {
        let rows = parse_crop_variety_csv("Species,Variety\n  ,Red\nRose,Pink\n,\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].species, "Rose");
    }

    #[test]
    fn test_variety_absent_blank_or_short_row() {
        let rows = parse_crop_variety_csv("Species\nRose\n");
        assert_eq!(rows[0].variety, None);

        let rows = parse_crop_variety_csv("Species,Variety\nRose,   \nTulip\n");
        assert_eq!(rows[0].variety, None);
        assert_eq!(rows[1].variety, None);
    }

    #[test]
    fn test_quoted_commas_stay_in_field() {
        let rows = parse_crop_variety_csv("Species,Variety\n\"Sweet Pea, Old\",\"Cupani, Original\"\n");
        assert_eq!(rows[0].species, "Sweet Pea, Old");
        assert_eq!(rows[0].variety.as_deref(), Some("Cupani, Original"));
    }

    #[test]
    fn test_escape_line_breaks() {
        assert_eq!(escape_csv_field("a\nb"), "\"a\nb\"");
        assert_eq!(escape_csv_field("a\r\nb"), "\"a\r\nb\"");
        assert_eq!(escape_csv_field(""), "");
    }

    #[test]
    fn test_write_header_and_terminators() {
        let csv = write_harvest_csv(&[
            export_row("2026-06-01", "Zinnia", Some("Queen Red Lime"), 40, 2),
            export_row("2026-06-01", "Dahlia", None, 12, 0),
        ]);
        assert_eq!(
            csv,
            "harvest_date,species,variety,stems_cut,stems_wasted\r\n\
             2026-06-01,Zinnia,Queen Red Lime,40,2\r\n\
             2026-06-01,Dahlia,,12,0"
        );
    }

    #[test]
    fn test_write_empty_is_header_only() {
        assert_eq!(write_harvest_csv(&[]), EXPORT_HEADER);
    }

    #[test]
    fn test_write_quotes_commas() {
        let line = format_harvest_row(&export_row("2026-06-02", "Sweet Pea", Some("Cupani, Original"), 5, 0));
        assert_eq!(line, "2026-06-02,Sweet Pea,\"Cupani, Original\",5,0");
    }

    #[test]
    fn test_export_parses_back() {
        let rows = vec![
            export_row("2026-06-01", "Zinnia", Some("Queen Red Lime"), 40, 2),
            export_row("2026-06-02", "Cosmos", Some("Double Click"), 7, 1),
            export_row("2026-06-03", "Dahlia", None, 12, 0),
        ];
        let table = parse_csv(&write_harvest_csv(&rows)).unwrap();

        let date_col = table.require_column("harvest_date").unwrap();
        let species_col = table.require_column("species").unwrap();
        let variety_col = table.require_column("variety").unwrap();
        let cut_col = table.require_column("stems_cut").unwrap();
        let wasted_col = table.require_column("stems_wasted").unwrap();

        assert_eq!(table.rows.len(), rows.len());
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(table.cell(i, date_col), Some(row.harvest_date.to_string().as_str()));
            assert_eq!(table.cell(i, species_col), Some(row.crop_name.as_str()));
            assert_eq!(
                table.cell(i, variety_col).filter(|v| !v.is_empty()),
                row.variety_name.as_deref()
            );
            assert_eq!(table.cell(i, cut_col).unwrap().parse::<i64>().unwrap(), row.stems_cut);
            assert_eq!(table.cell(i, wasted_col).unwrap().parse::<i64>().unwrap(), row.stems_wasted);
        }

        let pairs = parse_crop_variety_csv(&write_harvest_csv(&rows));
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2].variety, None);
    }

    #[test]
    fn test_require_column_error() {
        let table = parse_csv("a,b\n1,2").unwrap();
        assert!(matches!(
            table.require_column("species"),
            Err(CoreError::MissingColumn { .. })
        ));
    }
}
