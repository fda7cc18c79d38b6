// ABOUTME: Core data model for converted content and API responses
// ABOUTME: Spans and blocks serialize to Notion's JSON block schema

use serde::Deserialize;
use serde_json::{json, Value};

/// Per-span and per-code-chunk character ceiling imposed by Notion.
pub const MAX_TEXT_LEN: usize = 2000;

/// Maximum number of blocks Notion accepts in one create/append request.
pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// An inline-formatted run of text within a block.
///
/// Spans produced for one line are contiguous and non-overlapping;
/// concatenating their content reconstructs the line with markdown
/// markers stripped. Payloads never exceed [`MAX_TEXT_LEN`] characters;
/// the tokenizer pre-splits oversized runs into consecutive spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Bold(String),
    Italic(String),
    BoldItalic(String),
    Code(String),
    Link { text: String, url: String },
}

impl Span {
    pub fn content(&self) -> &str {
        match self {
            Span::Plain(s)
            | Span::Bold(s)
            | Span::Italic(s)
            | Span::BoldItalic(s)
            | Span::Code(s) => s,
            Span::Link { text, .. } => text,
        }
    }

    /// Serialize to a Notion rich-text item. Annotations are only
    /// present when at least one flag is set, matching what the API
    /// returns for plain text.
    pub fn to_json(&self) -> Value {
        let mut text = json!({ "content": self.content() });
        if let Span::Link { url, .. } = self {
            text["link"] = json!({ "url": url });
        }

        let mut item = json!({ "type": "text", "text": text });

        let annotations = match self {
            Span::Bold(_) => Some(json!({ "bold": true })),
            Span::Italic(_) => Some(json!({ "italic": true })),
            Span::BoldItalic(_) => Some(json!({ "bold": true, "italic": true })),
            Span::Code(_) => Some(json!({ "code": true })),
            Span::Plain(_) | Span::Link { .. } => None,
        };
        if let Some(a) = annotations {
            item["annotations"] = a;
        }

        item
    }
}

fn rich_text(spans: &[Span]) -> Value {
    Value::Array(spans.iter().map(Span::to_json).collect())
}

/// A structural content unit in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    BulletItem(Vec<Span>),
    NumberedItem(Vec<Span>),
    Quote(Vec<Span>),
    Callout { icon: String, spans: Vec<Span> },
    Divider,
    CodeBlock { language: String, text: String },
    Table { has_header: bool, rows: Vec<Vec<Vec<Span>>> },
}

impl Block {
    /// Serialize to Notion's block schema: one object per block, with
    /// `object`, `type`, and a type-named payload key.
    pub fn to_json(&self) -> Value {
        match self {
            Block::Heading { level, spans } => {
                let kind = match level {
                    1 => "heading_1",
                    2 => "heading_2",
                    _ => "heading_3",
                };
                let mut block = json!({ "object": "block", "type": kind });
                block[kind] = json!({ "rich_text": rich_text(spans) });
                block
            }
            Block::Paragraph(spans) => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": rich_text(spans) }
            }),
            Block::BulletItem(spans) => json!({
                "object": "block",
                "type": "bulleted_list_item",
                "bulleted_list_item": { "rich_text": rich_text(spans) }
            }),
            Block::NumberedItem(spans) => json!({
                "object": "block",
                "type": "numbered_list_item",
                "numbered_list_item": { "rich_text": rich_text(spans) }
            }),
            Block::Quote(spans) => json!({
                "object": "block",
                "type": "quote",
                "quote": { "rich_text": rich_text(spans) }
            }),
            Block::Callout { icon, spans } => json!({
                "object": "block",
                "type": "callout",
                "callout": {
                    "rich_text": rich_text(spans),
                    "icon": { "type": "emoji", "emoji": icon }
                }
            }),
            Block::Divider => json!({
                "object": "block",
                "type": "divider",
                "divider": {}
            }),
            Block::CodeBlock { language, text } => json!({
                "object": "block",
                "type": "code",
                "code": {
                    "rich_text": [{ "type": "text", "text": { "content": text } }],
                    "language": language
                }
            }),
            Block::Table { has_header, rows } => {
                let width = rows.first().map_or(0, Vec::len);
                let children: Vec<Value> = rows
                    .iter()
                    .map(|row| {
                        let cells: Vec<Value> = row.iter().map(|cell| rich_text(cell)).collect();
                        json!({
                            "object": "block",
                            "type": "table_row",
                            "table_row": { "cells": cells }
                        })
                    })
                    .collect();
                json!({
                    "object": "block",
                    "type": "table",
                    "table": {
                        "table_width": width,
                        "has_column_header": has_header,
                        "has_row_header": false,
                        "children": children
                    }
                })
            }
        }
    }
}

/// A child page found under a remote parent, flattened from the
/// block-children listing.
#[derive(Debug, Clone)]
pub struct ChildPage {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockList {
    pub results: Vec<BlockInfo>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BlockInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub child_page: Option<ChildPageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ChildPageInfo {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPage {
    pub id: String,
}
