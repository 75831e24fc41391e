//! Plain-text primitives shared by the analyzers.
//!
//! The splitting rules stay simple and fixed so that scores compare across
//! edits:
//!
//! - **Words**: runs of non-whitespace.
//! - **Sentences**: fragments between runs of `.`, `!` and `?` that contain
//!   something other than whitespace.
//! - **Paragraphs**: fragments between blank lines (a newline, optional
//!   whitespace, another newline) that contain something other than whitespace.

/// Whitespace-separated, non-empty tokens.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

pub fn count_words(text: &str) -> usize {
    words(text).count()
}

/// Fragments between runs of sentence terminators, blank fragments dropped.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Fragments between blank lines, blank fragments dropped.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' {
            // Look for `\n\s*\n`, consuming the whole whitespace run.
            let mut j = i + 1;
            let mut second_newline = None;
            while j < bytes.len() && (bytes[j] as char).is_ascii_whitespace() {
                if bytes[j] == b'\n' {
                    second_newline = Some(j);
                }
                j += 1;
            }
            if let Some(end) = second_newline {
                found.push(&text[start..i]);
                start = end + 1;
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    found.push(&text[start..]);
    found.retain(|p| !p.trim().is_empty());
    found
}

/// Approximate syllable count for a single word.
///
/// The word is lower-cased and stripped to ASCII letters. Each maximal run of
/// `aeiouy` counts once; a trailing silent `e` (but not `le`) on words longer
/// than three letters subtracts one, and so does an `es` ending or an `ed`
/// ending not preceded by `t` or `d`. Every word with letters counts at least
/// one syllable; a word with no letters counts zero.
pub fn syllables_in_word(word: &str) -> usize {
    let word: String = word
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    if word.is_empty() {
        return 0;
    }

    let mut groups = 0usize;
    let mut in_group = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }

    let mut count = groups as isize;
    if word.len() > 3 && word.ends_with('e') && !word.ends_with("le") {
        count -= 1;
    }
    if word.ends_with("es")
        || (word.ends_with("ed") && !word.ends_with("ted") && !word.ends_with("ded"))
    {
        count -= 1;
    }
    count.max(1) as usize
}

pub fn count_syllables(text: &str) -> usize {
    words(text).map(syllables_in_word).sum()
}

/// Truncate to at most `length` characters, counting `suffix` inside the limit.
pub fn truncate_text(text: &str, length: usize, suffix: &str) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let keep = length.saturating_sub(suffix.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

/// Plain-text excerpt of `length` characters, used as a fallback meta description.
pub fn excerpt(plain_text: &str, length: usize) -> String {
    let flattened = plain_text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_text(&flattened, length, "...")
}

/// Whole minutes needed to read `word_count` words, rounded up.
pub fn estimate_reading_time(word_count: usize, words_per_minute: usize) -> usize {
    if words_per_minute == 0 {
        return 0;
    }
    word_count.div_ceil(words_per_minute)
}

/// URL-friendly slug: `"Hello, World!  Again"` → `"hello-world-again"`.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept: String = lowered
        .trim()
        .chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace() || c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut pending_dash = false;
    for c in kept.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_dash = true;
        } else {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }
    slug
}

/// ASCII word character, matching the classic `\w` class.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Count non-overlapping, case-insensitive occurrences of `needle` in `haystack`.
pub fn count_occurrences_ignore_case(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    haystack.matches(needle.as_str()).count()
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
