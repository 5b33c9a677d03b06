//! Character classes and literal matchers
//!
//! Each matcher inspects the start of the remaining input and returns the
//! byte length of its match. A matcher never returns a zero length.

use crate::tokens::{TokenKind, PUNCTUATION};
use std::net::Ipv6Addr;

/// Characters allowed after the first character of a variable. An
/// apostrophe only opens a single-quoted string at the start of a token.
pub fn is_var_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !ch.is_control()
        && !matches!(
            ch,
            ';' | ',' | '{' | '}' | '[' | ']' | '&' | '|' | '(' | ')' | '"'
        )
}

/// Characters allowed as the first character of a variable
pub fn is_var_char_first(ch: char) -> bool {
    is_var_char(ch)
        && !ch.is_ascii_digit()
        && !matches!(ch, '/' | '.' | '-' | ':' | '<' | '>' | '#' | '\'')
}

/// Spaces, tabs and other non-terminating whitespace
pub fn is_inline_whitespace(ch: char) -> bool {
    ch.is_whitespace() && ch != '\n' && ch != '\r'
}

fn run_len(rest: &str, pred: impl Fn(char) -> bool) -> usize {
    rest.char_indices()
        .find(|&(_, ch)| !pred(ch))
        .map(|(i, _)| i)
        .unwrap_or(rest.len())
}

fn non_zero(len: usize) -> Option<usize> {
    (len > 0).then_some(len)
}

/// True when nothing word-like follows a match of `len` bytes
pub fn ends_at_boundary(rest: &str, len: usize) -> bool {
    rest[len..].chars().next().map_or(true, |ch| !is_var_char(ch))
}

// ============================================================================
// LAYOUT
// ============================================================================

/// `\r\n`, `\n` or a lone `\r`
pub fn newline_len(rest: &str) -> Option<usize> {
    if rest.starts_with("\r\n") {
        Some(2)
    } else if rest.starts_with('\n') || rest.starts_with('\r') {
        Some(1)
    } else {
        None
    }
}

pub fn whitespace_len(rest: &str) -> usize {
    run_len(rest, is_inline_whitespace)
}

/// `#` up to (not including) the line terminator
pub fn line_comment_len(rest: &str) -> usize {
    run_len(rest, |ch| ch != '\n' && ch != '\r')
}

/// `/* ... */`, or None when the comment never closes
pub fn block_comment_len(rest: &str) -> Option<usize> {
    rest.get(2..)?.find("*/").map(|i| i + 4)
}

/// One line's worth of a block comment, searching for the close from byte
/// `from`. Stops before a line terminator; the flag is true when `*/` was
/// consumed.
pub fn block_comment_piece(rest: &str, from: usize) -> (usize, bool) {
    let body = &rest[from..];
    let close = body.find("*/");
    let eol = body.find(|ch| ch == '\n' || ch == '\r');
    match (close, eol) {
        (Some(close), Some(eol)) if eol < close => (from + eol, false),
        (Some(close), _) => (from + close + 2, true),
        (None, Some(eol)) => (from + eol, false),
        (None, None) => (rest.len(), false),
    }
}

/// Rest of the line with trailing whitespace excluded
pub fn description_len(rest: &str) -> usize {
    let line = &rest[..line_comment_len(rest)];
    line.trim_end_matches(is_inline_whitespace).len()
}

/// Outcome of scanning a quoted string
pub enum Quoted {
    Closed(usize),
    Unterminated,
}

/// Double-quoted strings honour backslash escapes; single-quoted do not.
/// Neither may span lines.
pub fn quoted_len(rest: &str, quote: char) -> Quoted {
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' if quote == '"' => {
                if let Some((_, '\n' | '\r')) | None = chars.next() {
                    return Quoted::Unterminated;
                }
            }
            '\n' | '\r' => return Quoted::Unterminated,
            c if c == quote => return Quoted::Closed(i + c.len_utf8()),
            _ => {}
        }
    }
    Quoted::Unterminated
}

// ============================================================================
// DEFAULT-MODE RULES
// ============================================================================

/// Whole variable-character run equal to a keyword
pub fn match_keyword(rest: &str) -> Option<(TokenKind, usize)> {
    let len = run_len(rest, is_var_char);
    let len = non_zero(len)?;
    TokenKind::keyword(&rest[..len]).map(|kind| (kind, len))
}

pub fn match_variable(rest: &str) -> Option<(TokenKind, usize)> {
    let first = rest.chars().next()?;
    if !is_var_char_first(first) {
        return None;
    }
    Some((TokenKind::Variable, run_len(rest, is_var_char)))
}

pub fn decimal_len(rest: &str) -> usize {
    run_len(rest, |ch| ch.is_ascii_digit())
}

pub fn match_decimal(rest: &str) -> Option<(TokenKind, usize)> {
    non_zero(decimal_len(rest)).map(|len| (TokenKind::DecimalNumber, len))
}

pub fn match_float(rest: &str) -> Option<(TokenKind, usize)> {
    let whole = non_zero(decimal_len(rest))?;
    if !rest[whole..].starts_with('.') {
        return None;
    }
    let fraction = non_zero(decimal_len(&rest[whole + 1..]))?;
    Some((TokenKind::FloatNumber, whole + 1 + fraction))
}

pub fn match_hex(rest: &str) -> Option<(TokenKind, usize)> {
    if !(rest.starts_with("0x") || rest.starts_with("0X")) {
        return None;
    }
    let digits = non_zero(run_len(&rest[2..], |ch| ch.is_ascii_hexdigit()))?;
    Some((TokenKind::HexNumber, 2 + digits))
}

/// `digits:digits`; range is checked by the parser
pub fn match_community(rest: &str) -> Option<(TokenKind, usize)> {
    let high = non_zero(decimal_len(rest))?;
    if !rest[high..].starts_with(':') {
        return None;
    }
    let low = non_zero(decimal_len(&rest[high + 1..]))?;
    Some((TokenKind::StandardCommunity, high + 1 + low))
}

/// Optional `/len` suffix with `len <= max`
fn prefix_suffix_len(rest: &str, max: u32) -> Option<usize> {
    let digits_str = rest.strip_prefix('/')?;
    let digits = non_zero(decimal_len(digits_str))?;
    if digits > 3 {
        return None;
    }
    let value: u32 = digits_str[..digits].parse().ok()?;
    (value <= max).then_some(1 + digits)
}

/// Dotted quad with octets <= 255, optionally `/0-32`
pub fn match_ipv4(rest: &str) -> Option<(TokenKind, usize)> {
    let mut len = 0;
    for octet in 0..4 {
        if octet > 0 {
            if !rest[len..].starts_with('.') {
                return None;
            }
            len += 1;
        }
        let digits = non_zero(decimal_len(&rest[len..]))?;
        if digits > 3 {
            return None;
        }
        let value: u32 = rest[len..len + digits].parse().ok()?;
        if value > 255 {
            return None;
        }
        len += digits;
    }

    match prefix_suffix_len(&rest[len..], 32) {
        Some(suffix) => Some((TokenKind::IpPrefix, len + suffix)),
        None => Some((TokenKind::IpAddress, len)),
    }
}

/// Longest prefix of the hex/colon/dot run that is an IPv6 address,
/// optionally `/0-128`
pub fn match_ipv6(rest: &str) -> Option<(TokenKind, usize)> {
    let run = run_len(rest, |ch| ch.is_ascii_hexdigit() || ch == ':' || ch == '.');
    if !rest[..run].contains(':') {
        return None;
    }

    let len = (2..=run)
        .rev()
        .find(|&end| rest[..end].parse::<Ipv6Addr>().is_ok())?;

    match prefix_suffix_len(&rest[len..], 128) {
        Some(suffix) => Some((TokenKind::Ipv6Prefix, len + suffix)),
        None => Some((TokenKind::Ipv6Address, len)),
    }
}

/// Punctuation table is ordered longest first
pub fn match_punctuation(rest: &str) -> Option<(TokenKind, usize)> {
    PUNCTUATION
        .iter()
        .find(|(text, _)| rest.starts_with(text))
        .map(|&(text, kind)| (kind, text.len()))
}

// ============================================================================
// CAPTURE-MODE RULES
// ============================================================================

fn all_hex(group: &str) -> bool {
    !group.is_empty() && group.chars().all(|ch| ch.is_ascii_hexdigit())
}

/// `xx:xx:xx:xx:xx:xx`, `xx-xx-xx-xx-xx-xx` or `xxxx.xxxx.xxxx`
pub fn match_mac(rest: &str) -> Option<(TokenKind, usize)> {
    let run = run_len(rest, |ch| {
        ch.is_ascii_hexdigit() || ch == ':' || ch == '-' || ch == '.'
    });
    let text = &rest[..run];

    let valid = [(':', 6, 2), ('-', 6, 2), ('.', 3, 4)]
        .iter()
        .any(|&(sep, count, width)| {
            let groups: Vec<&str> = text.split(sep).collect();
            groups.len() == count && groups.iter().all(|g| g.len() == width && all_hex(g))
        });

    (valid && ends_at_boundary(rest, run)).then_some((TokenKind::MacAddress, run))
}

/// ISO NET: first and last groups of 2 hex digits, middle groups of 4,
/// at least 3 groups, one separator (`.` or `:`) throughout
pub fn match_iso(rest: &str) -> Option<(TokenKind, usize)> {
    let run = run_len(rest, |ch| ch.is_ascii_hexdigit() || ch == '.' || ch == ':');
    let text = &rest[..run];
    let sep = text.chars().find(|&ch| ch == '.' || ch == ':')?;

    let groups: Vec<&str> = text.split(sep).collect();
    let last = groups.len().checked_sub(1)?;
    let valid = groups.len() >= 3
        && groups.iter().enumerate().all(|(i, group)| {
            let width = if i == 0 || i == last { 2 } else { 4 };
            group.len() == width && all_hex(group)
        });

    (valid && ends_at_boundary(rest, run)).then_some((TokenKind::IsoAddress, run))
}

/// `auto`, a bare decimal, or a decimal with a `g`/`m` suffix
pub fn match_speed(rest: &str) -> Option<(TokenKind, usize)> {
    let run = run_len(rest, is_var_char);
    let text = &rest[..run];

    if text == "auto" {
        return Some((TokenKind::Auto, run));
    }

    let digits = non_zero(decimal_len(text))?;
    match &text[digits..] {
        "" => Some((TokenKind::DecimalNumber, run)),
        "g" | "G" | "m" | "M" => Some((TokenKind::SpeedValue, run)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_char_classes() {
        assert!(is_var_char('-'));
        assert!(is_var_char('#'));
        assert!(!is_var_char('|'));
        assert!(!is_var_char('"'));
        assert!(is_var_char('\''));
        assert!(!is_var_char_first('\''));
        assert!(is_var_char_first('e'));
        assert!(!is_var_char_first('1'));
        assert!(!is_var_char_first('-'));
        assert!(!is_var_char_first('#'));
    }

    #[test]
    fn test_keyword_requires_whole_run() {
        assert_eq!(match_keyword("set system"), Some((TokenKind::Set, 3)));
        assert_eq!(match_keyword("settings"), None);
        assert_eq!(match_keyword("3des\n"), Some((TokenKind::ThreeDes, 4)));
    }

    #[test]
    fn test_variable_keeps_inner_apostrophe() {
        assert_eq!(match_variable("o'brien\n"), Some((TokenKind::Variable, 7)));
        assert_eq!(match_variable("'quoted'"), None);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(match_decimal("65001 "), Some((TokenKind::DecimalNumber, 5)));
        assert_eq!(match_float("1.5"), Some((TokenKind::FloatNumber, 3)));
        assert_eq!(match_float("1."), None);
        assert_eq!(match_hex("0x1F"), Some((TokenKind::HexNumber, 4)));
        assert_eq!(match_hex("0x"), None);
    }

    #[test]
    fn test_ipv4() {
        assert_eq!(match_ipv4("10.0.0.1 "), Some((TokenKind::IpAddress, 8)));
        assert_eq!(match_ipv4("10.0.0.0/8"), Some((TokenKind::IpPrefix, 10)));
        assert_eq!(match_ipv4("10.0.0.0/33"), Some((TokenKind::IpAddress, 8)));
        assert_eq!(match_ipv4("256.0.0.1"), None);
        assert_eq!(match_ipv4("10.0.0"), None);
    }

    #[test]
    fn test_ipv6() {
        assert_eq!(match_ipv6("2001:db8::1 "), Some((TokenKind::Ipv6Address, 11)));
        assert_eq!(match_ipv6("2001:db8::/32"), Some((TokenKind::Ipv6Prefix, 13)));
        assert_eq!(match_ipv6("::/0"), Some((TokenKind::Ipv6Prefix, 4)));
        assert_eq!(match_ipv6("64512:100"), None);
        assert_eq!(match_ipv6("00:11:22:33:44:55"), None);
        assert_eq!(match_ipv6("abc"), None);
    }

    #[test]
    fn test_community() {
        assert_eq!(match_community("64512:100"), Some((TokenKind::StandardCommunity, 9)));
        assert_eq!(match_community("64512:"), None);
    }

    #[test]
    fn test_punctuation_prefers_double() {
        assert_eq!(match_punctuation("|| x"), Some((TokenKind::DoublePipe, 2)));
        assert_eq!(match_punctuation("| x"), Some((TokenKind::Pipe, 1)));
        assert_eq!(match_punctuation("&& x"), Some((TokenKind::DoubleAmpersand, 2)));
        assert_eq!(match_punctuation("& x"), None);
    }

    #[test]
    fn test_quoted() {
        assert!(matches!(quoted_len("\"a b\" c", '"'), Quoted::Closed(5)));
        assert!(matches!(quoted_len("\"a\\\"b\"", '"'), Quoted::Closed(6)));
        assert!(matches!(quoted_len("'x'", '\''), Quoted::Closed(3)));
        assert!(matches!(quoted_len("\"open\nx\"", '"'), Quoted::Unterminated));
        assert!(matches!(quoted_len("\"open", '"'), Quoted::Unterminated));
    }

    #[test]
    fn test_comments_and_description() {
        assert_eq!(line_comment_len("# note\r\nset"), 6);
        assert_eq!(block_comment_len("/* a */ set"), Some(7));
        assert_eq!(block_comment_len("/* open"), None);
        assert_eq!(block_comment_piece("/* a */ set", 2), (7, true));
        assert_eq!(block_comment_piece("/* a\nb */", 2), (4, false));
        assert_eq!(block_comment_piece("b */ set", 0), (4, true));
        assert_eq!(block_comment_piece("/*/ x\n", 2), (5, false));
        assert_eq!(description_len("uplink to core  \nset"), 14);
    }

    #[test]
    fn test_mac_formats() {
        assert_eq!(match_mac("00:11:22:aa:bb:cc\n"), Some((TokenKind::MacAddress, 17)));
        assert_eq!(match_mac("00-11-22-aa-bb-cc"), Some((TokenKind::MacAddress, 17)));
        assert_eq!(match_mac("0011.22aa.bbcc"), Some((TokenKind::MacAddress, 14)));
        assert_eq!(match_mac("00:11:22"), None);
        assert_eq!(match_mac("00:11:22:aa:bb:ccx"), None);
    }

    #[test]
    fn test_iso() {
        assert_eq!(
            match_iso("49.0001.1921.6800.1001.00"),
            Some((TokenKind::IsoAddress, 25))
        );
        assert_eq!(match_iso("49:0001:00"), Some((TokenKind::IsoAddress, 10)));
        assert_eq!(match_iso("49.0001"), None);
        assert_eq!(match_iso("49.001.00"), None);
    }

    #[test]
    fn test_speed() {
        assert_eq!(match_speed("auto"), Some((TokenKind::Auto, 4)));
        assert_eq!(match_speed("1000\n"), Some((TokenKind::DecimalNumber, 4)));
        assert_eq!(match_speed("10g"), Some((TokenKind::SpeedValue, 3)));
        assert_eq!(match_speed("100M"), Some((TokenKind::SpeedValue, 4)));
        assert_eq!(match_speed("fast"), None);
        assert_eq!(match_speed("10gbit"), None);
    }
}
