// ABOUTME: Single-pass line scanner assembling markdown into typed blocks
// ABOUTME: Explicit state machine over Default / InCodeBlock / InTable

use crate::inline::tokenize;
use crate::model::{Block, MAX_TEXT_LEN};
use crate::refs::PageMap;
use crate::table::build_table;
use crate::util::split_chunks;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());

/// Scanner state. One transition per input line, no backtracking.
enum ScanState {
    Default,
    InCodeBlock { language: String, buf: Vec<String> },
    InTable { rows: Vec<String> },
}

/// Convert one document's raw text into an ordered block sequence.
///
/// `source` is the document's forward-slash relative path, threaded
/// through to link resolution; `map` holds the page ids of documents
/// already synced this run. Pure with respect to (text, map state):
/// converting the same text twice yields identical blocks.
pub fn markdown_to_blocks(content: &str, source: Option<&str>, map: &PageMap) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut state = ScanState::Default;

    for line in content.lines() {
        state = step(state, line, source, map, &mut blocks);
    }

    // Input end closes whatever is still open.
    match state {
        ScanState::Default => {}
        ScanState::InCodeBlock { language, buf } => emit_code(&language, &buf, &mut blocks),
        ScanState::InTable { rows } => close_table(&rows, source, map, &mut blocks),
    }

    blocks
}

fn step(
    state: ScanState,
    line: &str,
    source: Option<&str>,
    map: &PageMap,
    blocks: &mut Vec<Block>,
) -> ScanState {
    match state {
        ScanState::InCodeBlock { language, mut buf } => {
            if is_fence(line) {
                emit_code(&language, &buf, blocks);
                ScanState::Default
            } else {
                // Code content is opaque: buffered verbatim, no inline parsing.
                buf.push(line.to_string());
                ScanState::InCodeBlock { language, buf }
            }
        }
        ScanState::InTable { mut rows } => {
            if is_table_row(line) {
                rows.push(line.to_string());
                ScanState::InTable { rows }
            } else {
                // First non-table line closes the buffer, then is
                // processed normally (it may itself open a new state).
                close_table(&rows, source, map, blocks);
                step(ScanState::Default, line, source, map, blocks)
            }
        }
        ScanState::Default => {
            if is_fence(line) {
                let tag = line.trim()[3..].trim();
                let language = if tag.is_empty() { "plain text" } else { tag };
                ScanState::InCodeBlock {
                    language: language.to_string(),
                    buf: Vec::new(),
                }
            } else if is_table_row(line) {
                ScanState::InTable {
                    rows: vec![line.to_string()],
                }
            } else {
                classify_line(line, source, map, blocks);
                ScanState::Default
            }
        }
    }
}

fn is_fence(line: &str) -> bool {
    line.trim().starts_with("```")
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn emit_code(language: &str, buf: &[String], blocks: &mut Vec<Block>) {
    for chunk in split_chunks(&buf.join("\n"), MAX_TEXT_LEN) {
        blocks.push(Block::CodeBlock {
            language: language.to_string(),
            text: chunk,
        });
    }
}

fn close_table(rows: &[String], source: Option<&str>, map: &PageMap, blocks: &mut Vec<Block>) {
    // Fewer than two buffered lines dissolve silently.
    if rows.len() < 2 {
        return;
    }
    if let Some(table) = build_table(rows, source, map) {
        blocks.push(table);
    }
}

fn classify_line(line: &str, source: Option<&str>, map: &PageMap, blocks: &mut Vec<Block>) {
    if line.trim().is_empty() {
        return;
    }

    let block = if let Some(rest) = line.strip_prefix("### ") {
        Block::Heading {
            level: 3,
            spans: tokenize(rest, source, map),
        }
    } else if let Some(rest) = line.strip_prefix("## ") {
        Block::Heading {
            level: 2,
            spans: tokenize(rest, source, map),
        }
    } else if let Some(rest) = line.strip_prefix("# ") {
        Block::Heading {
            level: 1,
            spans: tokenize(rest, source, map),
        }
    } else if let Some(m) = NUMBERED_RE.find(line) {
        Block::NumberedItem(tokenize(&line[m.end()..], source, map))
    } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        Block::BulletItem(tokenize(rest, source, map))
    } else if let Some(rest) = line.strip_prefix("> ") {
        match leading_emoji(rest) {
            Some((icon, text)) => Block::Callout {
                icon: icon.to_string(),
                spans: tokenize(text, source, map),
            },
            None => Block::Quote(tokenize(rest, source, map)),
        }
    } else if line.trim() == "---" || line.trim() == "***" {
        Block::Divider
    } else {
        Block::Paragraph(tokenize(line, source, map))
    };

    blocks.push(block);
}

/// A quote whose text opens with a single emoji character followed by
/// whitespace and more content becomes a callout with that emoji icon.
fn leading_emoji(text: &str) -> Option<(char, &str)> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if !is_emoji(first) {
        return None;
    }
    let rest = chars.as_str();
    let content = rest.trim_start();
    if content.len() == rest.len() || content.is_empty() {
        return None;
    }
    Some((first, content))
}

fn is_emoji(c: char) -> bool {
    matches!(c as u32, 0x1F300..=0x1F9FF | 0x2600..=0x26FF | 0x2700..=0x27BF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    fn convert(text: &str) -> Vec<Block> {
        markdown_to_blocks(text, None, &PageMap::new())
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        assert!(convert("").is_empty());
        assert!(convert("\n\n\n").is_empty());
    }

    #[test]
    fn test_headings() {
        let blocks = convert("# One\n## Two\n### Three");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    spans: vec![Span::Plain("One".into())]
                },
                Block::Heading {
                    level: 2,
                    spans: vec![Span::Plain("Two".into())]
                },
                Block::Heading {
                    level: 3,
                    spans: vec![Span::Plain("Three".into())]
                },
            ]
        );
    }

    #[test]
    fn test_list_items() {
        let blocks = convert("- dash\n* star\n12. twelfth");
        assert_eq!(blocks[0], Block::BulletItem(vec![Span::Plain("dash".into())]));
        assert_eq!(blocks[1], Block::BulletItem(vec![Span::Plain("star".into())]));
        assert_eq!(
            blocks[2],
            Block::NumberedItem(vec![Span::Plain("twelfth".into())])
        );
    }

    #[test]
    fn test_quote_and_callout() {
        let blocks = convert("> plain quote\n> 💡 bright idea");
        assert_eq!(blocks[0], Block::Quote(vec![Span::Plain("plain quote".into())]));
        assert_eq!(
            blocks[1],
            Block::Callout {
                icon: "💡".into(),
                spans: vec![Span::Plain("bright idea".into())],
            }
        );
    }

    #[test]
    fn test_emoji_without_following_text_stays_quote() {
        let blocks = convert("> 💡");
        assert_eq!(blocks[0], Block::Quote(vec![Span::Plain("💡".into())]));
    }

    #[test]
    fn test_dividers() {
        let blocks = convert("---\n***");
        assert_eq!(blocks, vec![Block::Divider, Block::Divider]);
    }

    #[test]
    fn test_paragraph_with_inline_formatting() {
        let blocks = convert("just **bold** text");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                Span::Plain("just ".into()),
                Span::Bold("bold".into()),
                Span::Plain(" text".into()),
            ])]
        );
    }

    #[test]
    fn test_fenced_code_verbatim() {
        let blocks = convert("```js\nlet x = 1;\n**not bold**\n```\nafter");
        assert_eq!(
            blocks[0],
            Block::CodeBlock {
                language: "js".into(),
                text: "let x = 1;\n**not bold**".into(),
            }
        );
        assert_eq!(blocks[1], Block::Paragraph(vec![Span::Plain("after".into())]));
    }

    #[test]
    fn test_fence_without_language_defaults() {
        let blocks = convert("```\ncontent\n```");
        assert_eq!(
            blocks[0],
            Block::CodeBlock {
                language: "plain text".into(),
                text: "content".into(),
            }
        );
    }

    #[test]
    fn test_empty_fence_emits_nothing() {
        assert!(convert("```\n```").is_empty());
    }

    #[test]
    fn test_unclosed_fence_flushes_at_eof() {
        let blocks = convert("```rust\nlet a = 1;");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: "rust".into(),
                text: "let a = 1;".into(),
            }]
        );
    }

    #[test]
    fn test_long_code_splits_into_multiple_blocks() {
        let body = "y".repeat(4500);
        let blocks = convert(&format!("```txt\n{}\n```", body));
        assert_eq!(blocks.len(), 3);
        for block in &blocks {
            match block {
                Block::CodeBlock { language, text } => {
                    assert_eq!(language, "txt");
                    assert!(text.chars().count() <= 2000);
                }
                other => panic!("expected code block, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_single_table_line_dissolves() {
        // A buffered run of fewer than two lines produces no block and
        // its lines are not reprocessed; the terminating line is.
        let blocks = convert("|lonely|\ntext after");
        assert_eq!(blocks, vec![Block::Paragraph(vec![Span::Plain("text after".into())])]);
    }

    #[test]
    fn test_header_separator_only_table() {
        let blocks = convert("|h1|h2|\n|---|---|\nafter");
        // Separator removed leaves a single data row; still a table.
        match &blocks[0] {
            Block::Table { has_header, rows } => {
                assert!(*has_header);
                assert_eq!(rows.len(), 1);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_full_table_then_paragraph() {
        let blocks = convert("|h1|h2|\n|---|---|\n|v1|v2|\nclosing line");
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            Block::Table { has_header, rows } => {
                assert!(*has_header);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[1][0], vec![Span::Plain("v1".into())]);
            }
            other => panic!("expected table, got {other:?}"),
        }
        assert_eq!(
            blocks[1],
            Block::Paragraph(vec![Span::Plain("closing line".into())])
        );
    }

    #[test]
    fn test_table_closes_at_input_end() {
        let blocks = convert("|a|b|\n|c|d|");
        assert!(matches!(&blocks[0], Block::Table { rows, .. } if rows.len() == 2));
    }

    #[test]
    fn test_fence_line_closes_open_table() {
        let blocks = convert("|a|b|\n|c|d|\n```sh\nls\n```");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[0], Block::Table { .. }));
        assert!(matches!(&blocks[1], Block::CodeBlock { language, .. } if language == "sh"));
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let text = "# T\n\npara **bold**\n\n|a|b|\n|c|d|\n\n```\nx\n```";
        let map = PageMap::new();
        assert_eq!(
            markdown_to_blocks(text, Some("doc.md"), &map),
            markdown_to_blocks(text, Some("doc.md"), &map)
        );
    }

    #[test]
    fn test_links_resolve_through_map() {
        let mut map = PageMap::new();
        map.insert("guides/setup.md", "aaa-bbb");
        let blocks = markdown_to_blocks("see [setup](./setup.md)", Some("guides/intro.md"), &map);
        assert_eq!(
            blocks[0],
            Block::Paragraph(vec![
                Span::Plain("see ".into()),
                Span::Link {
                    text: "setup".into(),
                    url: "https://www.notion.so/aaabbb".into(),
                },
            ])
        );
    }
}
