//! Text sanitization for questions, context and answers

/// Characters that could be interpreted as markup by a browser
const MARKUP_CHARS: [char; 5] = ['<', '>', '&', '"', '`'];

/// Strip control characters (except newline and tab) and markup characters, then trim
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Cap a sentence at `max_chars` characters, ending on a word boundary with "..."
pub fn truncate_at_word(sentence: &str, max_chars: usize) -> String {
    let prefix = truncate_chars(sentence, max_chars);
    if prefix.len() == sentence.len() {
        return sentence.to_string();
    }

    if let Some(pos) = prefix.rfind(char::is_whitespace) {
        let head = prefix[..pos].trim_end();
        if !head.is_empty() {
            return format!("{}...", head);
        }
    }

    format!("{}...", prefix)
}
