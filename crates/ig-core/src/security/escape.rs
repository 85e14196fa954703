//! Context-specific output encoding: HTML text content and URL components.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes that `encodeURIComponent` leaves alone: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
/// Everything else is percent-encoded.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escape text for insertion into HTML.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with entity references so the result,
/// used as text content or a quoted attribute value, cannot open a tag or an
/// attribute. Absent or empty input yields an empty string.
pub fn escape_html<'a>(input: impl Into<Option<&'a str>>) -> String {
    let input = match input.into() {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Percent-encode a value for use as a single URL component.
///
/// Matches `encodeURIComponent`: spaces become `%20`, `&` becomes `%26`,
/// non-ASCII text is encoded as UTF-8 bytes, and `!'()*` pass through.
pub fn encode_uri_component<'a>(input: impl Into<Option<&'a str>>) -> String {
    match input.into() {
        Some(s) if !s.is_empty() => utf8_percent_encode(s, URI_COMPONENT).to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_neutralizes_markup() {
        let escaped = escape_html("<script>alert('xss')</script>");
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&#39;xss&#39;)&lt;/script&gt;"
        );

        let escaped = escape_html(r#"<img src=x onerror="alert(1)">"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('"'));
    }

    #[test]
    fn test_escape_html_ampersand_first() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_escape_html_absent_input() {
        assert_eq!(escape_html(""), "");
        assert_eq!(escape_html(None), "");
        assert_eq!(escape_html(Some("")), "");
    }

    #[test]
    fn test_escape_html_plain_text_unchanged() {
        assert_eq!(escape_html("Hello, world"), "Hello, world");
        assert_eq!(escape_html("caf\u{e9}"), "caf\u{e9}");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(
            encode_uri_component("hello world & stuff"),
            "hello%20world%20%26%20stuff"
        );
        assert_eq!(encode_uri_component("a/b?c=d#e"), "a%2Fb%3Fc%3Dd%23e");
        assert_eq!(encode_uri_component("caf\u{e9}"), "caf%C3%A9");
    }

    #[test]
    fn test_encode_uri_component_keeps_unreserved_marks() {
        assert_eq!(encode_uri_component("!'()*-_.~"), "!'()*-_.~");
    }

    #[test]
    fn test_encode_uri_component_absent_input() {
        assert_eq!(encode_uri_component(""), "");
        assert_eq!(encode_uri_component(None), "");
    }
}
