//! Context-sensitive tokenizer for flat VyOS configuration text
//!
//! Default mode takes the longest match over an ordered list of rules, with
//! ties going to the rule listed first. Capture modes, entered after trigger
//! keywords, lex exactly one value of a fixed shape and then drop back.

use super::error::{CaptureWarning, LexerError};
use super::literals::{self, Quoted};
use super::state::{LexMode, LexerState};
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::tokens::{Token, TokenClass, TokenKind};
use crate::utils::{Position, Span};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters gathered while tokenizing one document
#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub content_tokens: usize,
    pub trivia_tokens: usize,
    pub keyword_tokens: usize,
    pub literal_tokens: usize,
    pub punctuation_tokens: usize,
    pub lines: usize,
    pub comment_count: usize,
    pub captures: usize,
    pub capture_fallbacks: usize,
    pub max_token_length: usize,

    // Only filled when detailed metrics are enabled
    pub kind_counts: BTreeMap<TokenKind, usize>,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token<'_>, preferences: &LexicalPreferences) {
        self.total_tokens += 1;
        self.max_token_length = self.max_token_length.max(token.text.len());

        match token.class() {
            TokenClass::Keyword => self.keyword_tokens += 1,
            TokenClass::Literal => self.literal_tokens += 1,
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Terminator => self.lines += 1,
            TokenClass::Trivia => {}
        }

        if token.is_trivia() {
            self.trivia_tokens += 1;
        } else {
            self.content_tokens += 1;
        }
        if token.is(TokenKind::Comment) {
            self.comment_count += 1;
        }

        if preferences.collect_detailed_metrics {
            *self.kind_counts.entry(token.kind).or_insert(0) += 1;
        }
    }
}

/// Streaming tokenizer over a borrowed source buffer
pub struct Tokenizer<'src> {
    source: &'src str,
    offset: usize,
    position: Position,
    state: LexerState,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    token_count: usize,
    warnings: Vec<CaptureWarning>,
    failed: bool,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_preferences(source, LexicalPreferences::default())
    }

    pub fn with_preferences(source: &'src str, preferences: LexicalPreferences) -> Self {
        let state = LexerState {
            ip_capable: preferences.recognize_ipv4,
            ..LexerState::default()
        };
        Self::with_state(source, preferences, state)
    }

    /// Start from an explicit lexer state instead of the default one
    pub fn with_state(
        source: &'src str,
        preferences: LexicalPreferences,
        state: LexerState,
    ) -> Self {
        Self {
            source,
            offset: 0,
            position: Position::start(),
            state,
            metrics: LexicalMetrics::default(),
            preferences,
            token_count: 0,
            warnings: Vec::new(),
            failed: false,
        }
    }

    /// Next token, `Ok(None)` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'src>>, LexerError> {
        let source = self.source;
        let rest = &source[self.offset..];
        let Some(ch) = rest.chars().next() else {
            return Ok(None);
        };

        let (kind, len) = self.scan(rest, ch)?;
        self.emit(kind, len).map(Some)
    }

    pub fn state(&self) -> &LexerState {
        &self.state
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn warnings(&self) -> &[CaptureWarning] {
        &self.warnings
    }

    /// Consume the tokenizer, keeping metrics and warnings
    pub fn finish(self) -> (LexicalMetrics, Vec<CaptureWarning>) {
        (self.metrics, self.warnings)
    }

    // === SCANNING ===

    fn scan(&mut self, rest: &'src str, ch: char) -> Result<(TokenKind, usize), LexerError> {
        if let Some(len) = literals::newline_len(rest) {
            return Ok((TokenKind::Newline, len));
        }
        if self.state.in_block_comment {
            return Ok(self.block_comment(rest, 0));
        }
        if literals::is_inline_whitespace(ch) {
            return Ok((TokenKind::Whitespace, literals::whitespace_len(rest)));
        }

        match self.state.mode {
            LexMode::Default => self.scan_default(rest, ch),
            mode => match Self::scan_capture(mode, rest) {
                Some(matched) => {
                    self.state.exit_mode();
                    self.metrics.captures += 1;
                    Ok(matched)
                }
                None => {
                    self.record_capture_fallback(mode, rest);
                    self.state.exit_mode();
                    self.scan_default(rest, ch)
                }
            },
        }
    }

    fn scan_capture(mode: LexMode, rest: &str) -> Option<(TokenKind, usize)> {
        match mode {
            LexMode::DescriptionCapture => {
                let len = literals::description_len(rest);
                (len > 0).then_some((TokenKind::DescriptionText, len))
            }
            LexMode::IsoAddressCapture => literals::match_iso(rest),
            LexMode::MacAddressCapture => literals::match_mac(rest),
            LexMode::SpeedCapture => literals::match_speed(rest),
            LexMode::Default => None,
        }
    }

    fn scan_default(
        &mut self,
        rest: &'src str,
        ch: char,
    ) -> Result<(TokenKind, usize), LexerError> {
        if ch == '#' {
            return Ok((TokenKind::Comment, literals::line_comment_len(rest)));
        }
        if rest.starts_with("/*") {
            if literals::block_comment_len(rest).is_none() {
                return Err(LexerError::UnterminatedComment {
                    span: self.span_of("/*"),
                });
            }
            return Ok(self.block_comment(rest, 2));
        }
        if ch == '"' || ch == '\'' {
            let kind = if ch == '"' {
                TokenKind::DoubleQuotedString
            } else {
                TokenKind::SingleQuotedString
            };
            return match literals::quoted_len(rest, ch) {
                Quoted::Closed(len) => Ok((kind, len)),
                Quoted::Unterminated => Err(LexerError::UnterminatedString {
                    span: self.span_of(&rest[..ch.len_utf8()]),
                }),
            };
        }

        let state = self.state;
        let candidates = [
            literals::match_keyword(rest),
            if state.ipv6_capable {
                None
            } else {
                literals::match_community(rest)
            },
            if state.ipv6_capable {
                literals::match_ipv6(rest)
            } else {
                None
            },
            if state.ip_capable {
                literals::match_ipv4(rest)
            } else {
                None
            },
            literals::match_hex(rest),
            literals::match_float(rest),
            literals::match_decimal(rest),
            literals::match_punctuation(rest),
            literals::match_variable(rest),
        ];

        // Strictly longer wins, so earlier rules win ties
        candidates
            .into_iter()
            .flatten()
            .fold(None, |best: Option<(TokenKind, usize)>, candidate| match best {
                Some((_, best_len)) if best_len >= candidate.1 => best,
                _ => Some(candidate),
            })
            .ok_or_else(|| LexerError::UnrecognizedInput {
                text: ch.to_string(),
                span: self.span_of(&rest[..ch.len_utf8()]),
            })
    }

    /// Block comments are cut at line breaks so the terminator still ends
    /// the statement
    fn block_comment(&mut self, rest: &str, from: usize) -> (TokenKind, usize) {
        let (len, closed) = literals::block_comment_piece(rest, from);
        self.state.in_block_comment = !closed;
        (TokenKind::Comment, len)
    }

    fn record_capture_fallback(&mut self, mode: LexMode, rest: &str) {
        self.metrics.capture_fallbacks += 1;
        if !self.preferences.report_capture_warnings {
            return;
        }

        let len = match literals::line_comment_len(rest) {
            0 => rest.chars().next().map_or(0, char::len_utf8),
            line => line.min(rest.find(char::is_whitespace).unwrap_or(line)),
        };
        let found = &rest[..len];
        let warning = CaptureWarning {
            mode,
            found: found.to_string(),
            span: self.span_of(found),
        };

        crate::log_warning!(code = warning.code(), &warning.message(),
            "line" => warning.span.start.line,
            "column" => warning.span.start.column
        );
        self.warnings.push(warning);
    }

    // === EMISSION ===

    fn span_of(&self, text: &str) -> Span {
        Span::new(self.position, self.position.advance_text(text))
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Result<Token<'src>, LexerError> {
        let source = self.source;
        let text = &source[self.offset..self.offset + len];
        let span = self.span_of(text);

        let max = match kind {
            TokenKind::Whitespace | TokenKind::Newline => usize::MAX,
            TokenKind::Comment => MAX_COMMENT_LENGTH,
            TokenKind::DescriptionText => MAX_DESCRIPTION_LENGTH,
            _ => MAX_TOKEN_LENGTH,
        };
        if len > max {
            return Err(LexerError::TokenTooLong {
                kind,
                length: len,
                max,
                span,
            });
        }

        self.token_count += 1;
        if self.token_count > MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: self.token_count,
            });
        }

        match kind {
            TokenKind::Newline => self.state.reset_line(),
            TokenKind::Comment => self.state.comment_boundary(),
            kind if kind.is_keyword() => self.state.apply_keyword(kind),
            _ => {}
        }

        let token = Token::new(kind, text, span);
        self.metrics.record_token(&token, &self.preferences);
        self.offset += len;
        self.position = span.end;

        Ok(token)
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Result<Token<'src>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Tokenizer::new(source)
            .map(|token| token.unwrap())
            .filter(|token| !token.is_trivia())
            .map(|token| token.kind)
            .collect()
    }

    fn texts(source: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::new(source)
            .map(|token| token.unwrap())
            .filter(|token| !token.is_trivia())
            .map(|token| (token.kind, token.text.to_string()))
            .collect()
    }

    #[test]
    fn test_set_line() {
        assert_eq!(
            kinds("set protocols bgp 65000 neighbor 10.0.0.1 remote-as 65001\n"),
            vec![
                TokenKind::Set,
                TokenKind::Protocols,
                TokenKind::Bgp,
                TokenKind::DecimalNumber,
                TokenKind::Neighbor,
                TokenKind::IpAddress,
                TokenKind::RemoteAs,
                TokenKind::DecimalNumber,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_community_versus_ipv6() {
        let after_community = texts("set community 64512:100\n");
        assert_eq!(
            after_community[2],
            (TokenKind::StandardCommunity, "64512:100".to_string())
        );

        let neighbor = texts("set protocols bgp 65000 neighbor 2001:db8::1 remote-as 65001");
        assert_eq!(
            neighbor[5],
            (TokenKind::Ipv6Address, "2001:db8::1".to_string())
        );
    }

    #[test]
    fn test_ipv6_capable_restored_after_newline_and_comment() {
        let tokens = texts("set community 1:2\nset x 2001:db8::/32\n");
        assert!(tokens.contains(&(TokenKind::Ipv6Prefix, "2001:db8::/32".to_string())));

        let tokens = texts("community /* c */ 2001:db8::1");
        assert_eq!(tokens[1], (TokenKind::Ipv6Address, "2001:db8::1".to_string()));
    }

    #[test]
    fn test_ipv6_not_tried_after_extcommunity() {
        let tokens = texts("extcommunity-rt 65000:100");
        assert_eq!(
            tokens[1],
            (TokenKind::StandardCommunity, "65000:100".to_string())
        );
    }

    #[test]
    fn test_description_capture() {
        let tokens = texts("set interfaces ethernet eth0 description uplink to core  \n");
        assert_eq!(
            tokens[5],
            (TokenKind::DescriptionText, "uplink to core".to_string())
        );
        assert_eq!(tokens[6].0, TokenKind::Newline);

        let quoted = texts("description \"64512:100\"");
        assert_eq!(
            quoted[1],
            (TokenKind::DescriptionText, "\"64512:100\"".to_string())
        );
    }

    #[test]
    fn test_mac_iso_and_speed_capture() {
        assert_eq!(
            kinds("hw-id 00:11:22:aa:bb:cc"),
            vec![TokenKind::HwId, TokenKind::MacAddress]
        );
        assert_eq!(
            kinds("net 49.0001.1921.6800.1001.00"),
            vec![TokenKind::Net, TokenKind::IsoAddress]
        );
        assert_eq!(
            kinds("speed 10g"),
            vec![TokenKind::Speed, TokenKind::SpeedValue]
        );
        assert_eq!(kinds("speed auto"), vec![TokenKind::Speed, TokenKind::Auto]);
        assert_eq!(
            kinds("speed 1000"),
            vec![TokenKind::Speed, TokenKind::DecimalNumber]
        );
    }

    #[test]
    fn test_capture_fallback_warns() {
        let mut tokenizer = Tokenizer::new("speed fast\n");
        let collected: Vec<_> = tokenizer.by_ref().map(|t| t.unwrap().kind).collect();
        assert_eq!(
            collected,
            vec![
                TokenKind::Speed,
                TokenKind::Whitespace,
                TokenKind::Variable,
                TokenKind::Newline
            ]
        );
        assert_eq!(tokenizer.warnings().len(), 1);
        assert_eq!(tokenizer.warnings()[0].found, "fast");
        assert_eq!(tokenizer.state().mode, LexMode::Default);
    }

    #[test]
    fn test_mode_is_default_after_every_newline() {
        let mut tokenizer = Tokenizer::new("description\nspeed\r\nnet\rmac");
        while let Some(token) = tokenizer.next_token().unwrap() {
            if token.is_newline() {
                assert_eq!(tokenizer.state().mode, LexMode::Default);
                assert!(tokenizer.state().ipv6_capable);
            }
        }
    }

    #[test]
    fn test_policy_expression_punctuation() {
        assert_eq!(
            kinds("(A || B) && C"),
            vec![
                TokenKind::OpenParen,
                TokenKind::Variable,
                TokenKind::DoublePipe,
                TokenKind::Variable,
                TokenKind::CloseParen,
                TokenKind::DoubleAmpersand,
                TokenKind::Variable,
            ]
        );
    }

    #[test]
    fn test_ipv4_rules_can_be_disabled() {
        let preferences = LexicalPreferences {
            recognize_ipv4: false,
            ..LexicalPreferences::default()
        };
        let lexed: Vec<TokenKind> =
            Tokenizer::with_preferences("neighbor 10.0.0.1 prefix 10.0.0.0/8\n", preferences)
                .map(|token| token.unwrap().kind)
                .collect();

        assert!(!lexed.contains(&TokenKind::IpAddress));
        assert!(!lexed.contains(&TokenKind::IpPrefix));
        assert!(lexed.contains(&TokenKind::FloatNumber));

        let state = LexerState {
            ip_capable: false,
            ..LexerState::default()
        };
        let mut tokenizer =
            Tokenizer::with_state("10.0.0.1\n", LexicalPreferences::default(), state);
        let first = tokenizer.next_token().unwrap().unwrap();
        assert_ne!(first.kind, TokenKind::IpAddress);
        while tokenizer.next_token().unwrap().is_some() {}
        assert!(!tokenizer.state().ip_capable);

        assert_eq!(kinds("10.0.0.1"), vec![TokenKind::IpAddress]);
    }

    #[test]
    fn test_block_comment_keeps_line_break() {
        let all: Vec<_> = Tokenizer::new("r1 /* a\nb */ set")
            .map(|t| t.unwrap())
            .collect();
        let kinds: Vec<_> = all.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Variable,
                TokenKind::Whitespace,
                TokenKind::Comment,
                TokenKind::Newline,
                TokenKind::Comment,
                TokenKind::Whitespace,
                TokenKind::Set,
            ]
        );
        assert_eq!(all[2].text, "/* a");
        assert_eq!(all[4].text, "b */");
        assert_eq!(all[6].span.start.line, 2);

        let mut tokenizer = Tokenizer::new("/* a\n\n  still */ x");
        while let Some(token) = tokenizer.next_token().unwrap() {
            if token.text == "x" {
                assert!(!tokenizer.state().in_block_comment);
                assert_eq!(token.kind, TokenKind::Variable);
            }
        }
    }

    #[test]
    fn test_comments_are_trivia() {
        let all: Vec<_> = Tokenizer::new("# header\nset system # tail")
            .map(|t| t.unwrap().kind)
            .collect();
        assert_eq!(all[0], TokenKind::Comment);
        assert_eq!(*all.last().unwrap(), TokenKind::Comment);
        assert_eq!(kinds("# header\nset"), vec![TokenKind::Newline, TokenKind::Set]);
    }

    #[test]
    fn test_fatal_errors() {
        let mut tokenizer = Tokenizer::new("set & x");
        let error = tokenizer.find_map(|t| t.err()).unwrap();
        assert_matches!(error, LexerError::UnrecognizedInput { ref text, .. } if text == "&");
        assert_eq!(error.span().unwrap().start.column, 5);

        let error = Tokenizer::new("set \"open\n").find_map(|t| t.err()).unwrap();
        assert_matches!(error, LexerError::UnterminatedString { .. });

        let error = Tokenizer::new("/* never closed").find_map(|t| t.err()).unwrap();
        assert_matches!(error, LexerError::UnterminatedComment { .. });
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let results: Vec<_> = Tokenizer::new("a & b c").collect();
        assert!(results.last().unwrap().is_err());
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_token_too_long() {
        let long = "a".repeat(MAX_TOKEN_LENGTH + 1);
        let error = Tokenizer::new(&long).find_map(|t| t.err()).unwrap();
        assert_matches!(error, LexerError::TokenTooLong { kind: TokenKind::Variable, .. });
    }

    #[test]
    fn test_positions() {
        let tokens: Vec<_> = Tokenizer::new("set\r\n  system")
            .map(|t| t.unwrap())
            .collect();
        let system = tokens.last().unwrap();
        assert_eq!(system.span.start, Position::new(7, 2, 3));
        assert_eq!(system.span.end, Position::new(13, 2, 9));
    }

    #[test]
    fn test_metrics() {
        let mut tokenizer = Tokenizer::new("set system host-name r1 # x\n");
        while tokenizer.next_token().unwrap().is_some() {}
        let metrics = tokenizer.metrics();
        assert_eq!(metrics.keyword_tokens, 3);
        assert_eq!(metrics.literal_tokens, 1);
        assert_eq!(metrics.comment_count, 1);
        assert_eq!(metrics.lines, 1);
        assert_eq!(metrics.total_tokens, metrics.content_tokens + metrics.trivia_tokens);
    }
}
