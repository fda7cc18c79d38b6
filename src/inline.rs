// ABOUTME: Inline span tokenizer for a single line of markdown
// ABOUTME: Priority-ordered patterns with first-match-wins overlap resolution

use crate::model::{Span, MAX_TEXT_LEN};
use crate::refs::{page_url, PageMap};
use crate::util::split_chunks;
use once_cell::sync::Lazy;
use regex::Regex;

/// Relative link targets with one of these extensions are treated as
/// internal cross-references; everything else that is not an absolute
/// URL renders as plain text.
pub const DOC_EXTENSIONS: &[&str] = &[".md", ".txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Link,
    BoldItalic,
    Bold,
    Italic,
    Code,
}

/// The fixed priority table. Order matters twice: matches are collected
/// pattern by pattern, and the stable sort by start offset keeps an
/// earlier pattern ahead of a later one when both match at the same
/// offset (so `***x***` resolves as bold-italic, not bold).
static PATTERNS: Lazy<Vec<(PatternKind, Regex)>> = Lazy::new(|| {
    vec![
        (PatternKind::Link, Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap()),
        (PatternKind::BoldItalic, Regex::new(r"\*\*\*(.+?)\*\*\*").unwrap()),
        (PatternKind::BoldItalic, Regex::new(r"___(.+?)___").unwrap()),
        (PatternKind::Bold, Regex::new(r"\*\*(.+?)\*\*").unwrap()),
        (PatternKind::Bold, Regex::new(r"__(.+?)__").unwrap()),
        (PatternKind::Italic, Regex::new(r"\*(.+?)\*").unwrap()),
        (PatternKind::Italic, Regex::new(r"_(.+?)_").unwrap()),
        (PatternKind::Code, Regex::new(r"`([^`]+)`").unwrap()),
    ]
});

struct InlineMatch<'a> {
    start: usize,
    end: usize,
    kind: PatternKind,
    content: &'a str,
    target: Option<&'a str>,
}

/// Tokenize one line of text into an ordered, non-overlapping span
/// sequence. `source` is the referencing document's canonical relative
/// path, used to resolve relative links through `map`; without it every
/// relative link degrades to plain text.
///
/// A blank line yields exactly one empty plain span, never an empty
/// sequence. Oversized payloads are split at [`MAX_TEXT_LEN`].
pub fn tokenize(text: &str, source: Option<&str>, map: &PageMap) -> Vec<Span> {
    if text.trim().is_empty() {
        return vec![Span::Plain(String::new())];
    }

    let mut matches: Vec<InlineMatch> = Vec::new();
    for (kind, regex) in PATTERNS.iter() {
        // Candidates are collected at every possible starting offset,
        // not just non-overlapping ones: a rejected candidate's closing
        // marker may be another candidate's opener (`**b** and *i*`),
        // and the overlap filter below is what decides survival.
        let mut at = 0;
        while let Some(caps) = regex.captures_at(text, at) {
            let whole = caps.get(0).unwrap();
            let content = caps.get(1).map_or("", |m| m.as_str());
            matches.push(InlineMatch {
                start: whole.start(),
                end: whole.end(),
                kind: *kind,
                content,
                target: caps.get(2).map(|m| m.as_str()),
            });
            // Markers are ASCII, so one byte past the start is a valid
            // boundary.
            at = whole.start() + 1;
            if at >= text.len() {
                break;
            }
        }
    }

    // Stable sort: ties at the same offset keep pattern priority order.
    matches.sort_by_key(|m| m.start);

    // First-match-wins: drop any match starting inside a kept one.
    let mut kept: Vec<InlineMatch> = Vec::new();
    let mut last_end = 0;
    for m in matches {
        if m.start >= last_end {
            last_end = m.end;
            kept.push(m);
        }
    }

    let mut spans = Vec::new();
    let mut pos = 0;
    for m in &kept {
        if m.start > pos {
            push_chunks(&mut spans, &text[pos..m.start], Span::Plain);
        }
        match m.kind {
            PatternKind::Link => {
                push_link(&mut spans, m.content, m.target.unwrap_or(""), source, map)
            }
            PatternKind::BoldItalic => push_chunks(&mut spans, m.content, Span::BoldItalic),
            PatternKind::Bold => push_chunks(&mut spans, m.content, Span::Bold),
            PatternKind::Italic => push_chunks(&mut spans, m.content, Span::Italic),
            PatternKind::Code => push_chunks(&mut spans, m.content, Span::Code),
        }
        pos = m.end;
    }
    if pos < text.len() {
        push_chunks(&mut spans, &text[pos..], Span::Plain);
    }

    spans
}

fn push_chunks(spans: &mut Vec<Span>, text: &str, make: impl Fn(String) -> Span) {
    for chunk in split_chunks(text, MAX_TEXT_LEN) {
        spans.push(make(chunk));
    }
}

fn push_link(spans: &mut Vec<Span>, text: &str, target: &str, source: Option<&str>, map: &PageMap) {
    if target.starts_with("http://") || target.starts_with("https://") {
        push_link_chunks(spans, text, target.to_string());
        return;
    }

    if is_document_target(target) {
        // Relative cross-reference: resolvable only once the target has
        // been synced. Unresolved targets degrade to plain text.
        if let Some(id) = source.and_then(|src| map.resolve(src, target)) {
            let url = page_url(id);
            push_link_chunks(spans, text, url);
            return;
        }
    }

    push_chunks(spans, text, Span::Plain);
}

fn push_link_chunks(spans: &mut Vec<Span>, text: &str, url: String) {
    for chunk in split_chunks(text, MAX_TEXT_LEN) {
        spans.push(Span::Link {
            text: chunk,
            url: url.clone(),
        });
    }
}

fn is_document_target(target: &str) -> bool {
    DOC_EXTENSIONS.iter().any(|ext| target.ends_with(ext))
}
