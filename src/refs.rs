// ABOUTME: Cross-reference resolution between synced documents
// ABOUTME: Maps canonical relative paths to remote page identifiers

use std::collections::HashMap;

/// Run-scoped mapping from canonical relative document path to the
/// Notion page id assigned once that document was synced.
///
/// Passed explicitly through the conversion pipeline so separate sync
/// runs (and tests) never leak state into each other. Append-only for
/// the duration of a run: the traversal layer inserts after every page
/// creation, including for pre-existing pages that were skipped, so
/// later documents can still link to them.
///
/// Forward references stay unresolved for the whole run: a document
/// linking to a sibling that has not been synced yet renders that link
/// as plain text, and no repair pass is made. Re-running the sync
/// resolves it once the target page exists.
#[derive(Debug, Default)]
pub struct PageMap {
    pages: HashMap<String, String>,
}

impl PageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, page_id: impl Into<String>) {
        self.pages.insert(path.into(), page_id.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.pages.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Resolve a relative link target against the referencing document's
    /// own path. Returns the target page id if that document has already
    /// been synced, `None` otherwise.
    pub fn resolve(&self, referencing_path: &str, relative_target: &str) -> Option<&str> {
        let canonical = resolve_relative(referencing_path, relative_target);
        self.get(&canonical)
    }
}

/// Join a relative target against the directory of the referencing
/// path and normalize `.`/`..` segments into a canonical forward-slash
/// relative path.
pub fn resolve_relative(referencing_path: &str, relative_target: &str) -> String {
    let dir = match referencing_path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in dir.split('/').chain(relative_target.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                // Pop when possible; a leading ".." that escapes the
                // sync root stays in place and simply never matches.
                if matches!(segments.last(), Some(&s) if s != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Public URL for a Notion page id (id with dashes stripped).
pub fn page_url(page_id: &str) -> String {
    format!("https://www.notion.so/{}", page_id.replace('-', ""))
}
