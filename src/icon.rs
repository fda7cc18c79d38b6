// ABOUTME: Deterministic title-to-emoji classifier for page icons
// ABOUTME: Ordered keyword rules, first match wins, folder/document fallback

use once_cell::sync::Lazy;
use regex::Regex;

/// Titles that open like a numbered chapter ("01-intro", "3. setup")
/// take the book icon before any keyword rule runs.
static CHAPTER_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[-_.]").unwrap());

/// Keyword rules in priority order. The first rule whose keyword occurs
/// in the lowercased title wins; reordering changes behavior.
const RULES: &[(&[&str], &str)] = &[
    (&["getting started", "beginner", "basics", "quickstart"], "🎯"),
    (&["faq", "trouble", "issue", "error"], "❓"),
    (&["example", "demo", "practice"], "💡"),
    (&["tool", "app"], "🔧"),
    (&["guide", "tutorial", "how-to", "howto"], "📚"),
    (&["data", "analysis", "report", "stats"], "📊"),
    (&["config", "setting"], "⚙️"),
    (&["architecture", "system", "structure"], "🏗️"),
    (&["script", "code"], "💻"),
    (&["create", "write"], "✍️"),
    (&["note", "review"], "📝"),
    (&["manual", "instruction"], "📋"),
    (&["glossary", "term"], "📖"),
    (&["audience", "user"], "👥"),
    (&["account", "profile"], "👤"),
    (&["download", "resource"], "📦"),
    (&["slide", "presentation"], "🎨"),
    (&["manage", "manager"], "📂"),
    (&["skill"], "🎓"),
    (&["versus", "difference", "comparison"], "⚖️"),
    (&["global", "project"], "🌐"),
    (&["install", "deploy"], "📥"),
    (&["appendix", "reference"], "📚"),
    (&["backup", "archive"], "🗄️"),
    (&["advanced"], "🚀"),
    (&["test"], "🧪"),
    (&["readme"], "📘"),
];

/// Pick an emoji icon for a page title. Pure function: the rule table
/// is a fixed priority list, not a scored match. Titles without an
/// extension-like dot fall back to the folder icon, everything else to
/// the generic document icon.
pub fn select_icon(title: &str) -> &'static str {
    let lower = title.to_lowercase();

    if CHAPTER_PREFIX_RE.is_match(&lower) {
        return "📖";
    }

    for (keywords, icon) in RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return icon;
        }
    }

    if !title.contains('.') {
        "📁"
    } else {
        "📄"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_prefix_wins() {
        assert_eq!(select_icon("01-introduction.md"), "📖");
        assert_eq!(select_icon("3.setup-guide.md"), "📖");
    }

    #[test]
    fn test_keyword_rules() {
        assert_eq!(select_icon("Getting Started.md"), "🎯");
        assert_eq!(select_icon("FAQ.md"), "❓");
        assert_eq!(select_icon("install-notes.md"), "📝");
        assert_eq!(select_icon("README.md"), "📘");
    }

    #[test]
    fn test_rule_order_is_significant() {
        // "error" (rule 2) beats "guide" (rule 5)
        assert_eq!(select_icon("error guide.md"), "❓");
        // "tutorial" beats the later "advanced" rule
        assert_eq!(select_icon("advanced tutorial.md"), "📚");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(select_icon("miscellaneous"), "📁");
        assert_eq!(select_icon("misc.md"), "📄");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(select_icon("GLOSSARY.md"), "📖");
    }
}
