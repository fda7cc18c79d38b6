// ABOUTME: Builds a structured table block from buffered pipe-delimited lines
// ABOUTME: Detects separator rows, fixes column count, tokenizes cells

use crate::inline::tokenize;
use crate::model::Block;
use crate::refs::PageMap;

/// A separator row marks the first row as a header and contributes no
/// data of its own: pipes enclosing only dashes, colons, and whitespace,
/// with at least one dash present.
pub fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') || !trimmed.ends_with('|') {
        return false;
    }
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Split a buffered row on pipes, discarding the empty leading/trailing
/// cells produced by the enclosing pipes, and trim each cell.
fn split_row(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.trim().split('|').collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Convert a buffered run of table-like lines into a Table block.
///
/// Column count is fixed to the first data row; shorter rows are padded
/// with empty cells and extra cells are dropped. Returns `None` when no
/// data rows remain after removing separators.
pub fn build_table(rows: &[String], source: Option<&str>, map: &PageMap) -> Option<Block> {
    let mut has_header = false;
    let mut data_rows: Vec<Vec<String>> = Vec::new();

    for row in rows {
        if is_separator(row) {
            has_header = true;
        } else {
            data_rows.push(split_row(row));
        }
    }

    let width = data_rows.first()?.len();

    let cells: Vec<Vec<Vec<crate::model::Span>>> = data_rows
        .iter()
        .map(|row| {
            (0..width)
                .map(|i| {
                    let text = row.get(i).map_or("", String::as_str);
                    tokenize(text, source, map)
                })
                .collect()
        })
        .collect();

    Some(Block::Table {
        has_header,
        rows: cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_separator_detection() {
        assert!(is_separator("|---|---|"));
        assert!(is_separator("| :-- | --: |"));
        assert!(is_separator("  |---|  "));
        assert!(!is_separator("|a|b|"));
        assert!(!is_separator("| | |"));
        assert!(!is_separator("plain text"));
    }

    #[test]
    fn test_header_row_plus_separator_has_no_data() {
        // Only the header line remains as data, the separator vanishes,
        // so a single data row is produced.
        let rows = lines(&["|h1|h2|", "|---|---|"]);
        let block = build_table(&rows, None, &PageMap::new()).unwrap();
        match block {
            Block::Table { has_header, rows } => {
                assert!(has_header);
                assert_eq!(rows.len(), 1);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_full_table_with_header() {
        let rows = lines(&["|h1|h2|", "|---|---|", "|v1|v2|"]);
        let block = build_table(&rows, None, &PageMap::new()).unwrap();
        match block {
            Block::Table { has_header, rows } => {
                assert!(has_header);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[1][0], vec![Span::Plain("v1".into())]);
                assert_eq!(rows[1][1], vec![Span::Plain("v2".into())]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_no_separator_means_no_header() {
        let rows = lines(&["|a|b|", "|c|d|"]);
        match build_table(&rows, None, &PageMap::new()).unwrap() {
            Block::Table { has_header, rows } => {
                assert!(!has_header);
                assert_eq!(rows.len(), 2);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_only_separators_yield_nothing() {
        let rows = lines(&["|---|---|"]);
        assert!(build_table(&rows, None, &PageMap::new()).is_none());
    }

    #[test]
    fn test_short_rows_padded_long_rows_truncated() {
        let rows = lines(&["|a|b|c|", "|1|", "|1|2|3|4|"]);
        match build_table(&rows, None, &PageMap::new()).unwrap() {
            Block::Table { rows, .. } => {
                assert_eq!(rows[1].len(), 3);
                assert_eq!(rows[1][1], vec![Span::Plain("".into())]);
                assert_eq!(rows[2].len(), 3);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_cells_are_tokenized() {
        let rows = lines(&["| **bold** | plain |"]);
        match build_table(&rows, None, &PageMap::new()).unwrap() {
            Block::Table { rows, .. } => {
                assert_eq!(rows[0][0], vec![Span::Bold("bold".into())]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }
}
