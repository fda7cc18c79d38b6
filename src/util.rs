// ABOUTME: Utility functions shared across the converter and API client
// ABOUTME: Provides character-based text chunking for Notion's payload limits

/// Split text into chunks of at most `max_chars` characters.
///
/// Notion caps every rich-text payload and code content at 2000
/// characters; oversized text must be pre-split into consecutive
/// pieces rather than rejected. Boundaries are counted in characters,
/// never bytes, so multi-byte content splits cleanly.
///
/// Empty input yields no chunks.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count >= max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chunks_short() {
        assert_eq!(split_chunks("hello", 2000), vec!["hello"]);
    }

    #[test]
    fn test_split_chunks_empty() {
        assert!(split_chunks("", 2000).is_empty());
    }

    #[test]
    fn test_split_chunks_exact_boundary() {
        let text = "a".repeat(2000);
        assert_eq!(split_chunks(&text, 2000), vec![text]);
    }

    #[test]
    fn test_split_chunks_4500_into_three() {
        let text = "x".repeat(4500);
        let chunks = split_chunks(&text, 2000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 2000);
        assert_eq!(chunks[2].chars().count(), 500);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_chunks_multibyte() {
        // 4-byte emoji must never be split mid-character
        let text = "🎉".repeat(5);
        let chunks = split_chunks(&text, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "🎉🎉");
        assert_eq!(chunks[2], "🎉");
    }
}
