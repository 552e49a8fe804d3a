use regex::Regex;
use std::sync::LazyLock;

// ECMAScript WhiteSpace and LineTerminator: what `\s` and `String.prototype.trim`
// match in a page. Differs from Unicode White_Space on U+0085 and U+FEFF.
const PAGE_WHITESPACE: &str = r"[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{}{{2,}}", PAGE_WHITESPACE)).expect("whitespace pattern is valid"));

fn is_page_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Trim `raw` and collapse runs of two or more whitespace characters into a
/// single space. A lone newline or tab between words is left alone.
///
/// Whitespace is what a browser's `trim()` and `\s` treat as whitespace.
pub fn normalize_text(raw: &str) -> String {
    WHITESPACE_RUN
        .replace_all(raw.trim_matches(is_page_whitespace), " ")
        .into_owned()
}
