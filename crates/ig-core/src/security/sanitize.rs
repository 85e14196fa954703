//! Pattern-based stripping for free-text fields.
//!
//! Each sanitizer targets one field class with its own allowlist and length
//! cap. They are total: any input produces a (possibly empty) string.
//!
//! # Limitations
//!
//! [`sanitize_description`] removes known-dangerous constructs with regular
//! expressions. It is not an HTML parser and can be evaded with malformed or
//! nested markup. Anything that renders descriptions as HTML must still run an
//! allowlist sanitizer on the server side.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a name-like field, in UTF-16 code units.
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum length of a long-form text field, in UTF-16 code units.
pub const MAX_DESCRIPTION_CHARS: usize = 10_000;

/// Maximum length of a search query, in UTF-16 code units.
pub const MAX_SEARCH_QUERY_CHARS: usize = 200;

/// Punctuation kept in names besides letters, digits, and whitespace.
const NAME_PUNCTUATION: &[char] = &['-', '\'', ',', '.', '!', '?', '(', ')'];

/// Characters dropped from search queries.
const SEARCH_FORBIDDEN: &[char] = &['\'', ';', '\\'];

/// Tags whose complete `<tag ...>...</tag>` pairs are removed from descriptions.
const DANGEROUS_TAGS: &[&str] = &["iframe", "object", "embed", "link", "style", "meta"];

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Anything tag-shaped.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// `<script ...>...</script>` blocks, shortest match, spanning lines.
static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());

/// Inline event handlers with a quoted value: `onclick="..."`, `onload='...'`.
/// Matches anywhere, including right after a word character or a quote.
static EVENT_HANDLER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\s*on\w+\s*=\s*(?:"[^"]*"|'[^']*')"#).unwrap());

/// One pattern per dangerous tag; the regex crate has no backreferences.
static DANGEROUS_TAG_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DANGEROUS_TAGS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap())
        .collect()
});

/// Two or more consecutive wildcards.
static WILDCARD_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{2,}").unwrap());

// ---------------------------------------------------------------------------
// Public sanitizers
// ---------------------------------------------------------------------------

/// Sanitize a short name field (campaign name, character name).
///
/// Strips tag-shaped substrings first, then every character that is not a
/// letter, digit, whitespace, or one of `- ' , . ! ? ( )`. The result is
/// trimmed and capped at [`MAX_NAME_CHARS`].
pub fn sanitize_name(input: &str) -> String {
    let without_tags = TAG_RE.replace_all(input, "");
    let filtered: String = without_tags
        .chars()
        .filter(|&c| c.is_alphanumeric() || c.is_whitespace() || NAME_PUNCTUATION.contains(&c))
        .collect();
    truncate_utf16(filtered.trim(), MAX_NAME_CHARS).to_string()
}

/// Sanitize a long-form text field (description, setting notes).
///
/// Removes `<script>` blocks, quoted inline event handlers, and complete
/// `iframe`/`object`/`embed`/`link`/`style`/`meta` element pairs, all
/// case-insensitively. The result is capped at [`MAX_DESCRIPTION_CHARS`] and
/// then trimmed. Other markup is left in place.
pub fn sanitize_description(input: &str) -> String {
    let mut text = SCRIPT_RE.replace_all(input, "").into_owned();
    text = EVENT_HANDLER_RE.replace_all(&text, "").into_owned();
    for re in DANGEROUS_TAG_RES.iter() {
        text = re.replace_all(&text, "").into_owned();
    }
    truncate_utf16(&text, MAX_DESCRIPTION_CHARS).trim().to_string()
}

/// Sanitize a free-text search query.
///
/// Drops `'`, `;` and `\`, collapses runs of `*` into a single `*`, trims,
/// and caps the result at [`MAX_SEARCH_QUERY_CHARS`].
pub fn sanitize_search_query(input: &str) -> String {
    let filtered: String = input
        .chars()
        .filter(|c| !SEARCH_FORBIDDEN.contains(c))
        .collect();
    let collapsed = WILDCARD_RUN_RE.replace_all(&filtered, "*");
    truncate_utf16(collapsed.trim(), MAX_SEARCH_QUERY_CHARS).to_string()
}

/// Length of `s` in UTF-16 code units, the unit browser form limits count in.
pub(crate) fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Cut `s` to at most `max` UTF-16 code units. A character that would only
/// partly fit (a surrogate pair straddling the limit) is dropped whole.
fn truncate_utf16(s: &str, max: usize) -> &str {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        units += ch.len_utf16();
        if units > max {
            return &s[..idx];
        }
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
