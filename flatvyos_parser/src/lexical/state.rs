//! Tokenizer mode and context flags

use crate::tokens::TokenKind;
use serde::Serialize;
use std::fmt;

/// Active lexing mode; at most one capture mode is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LexMode {
    #[default]
    Default,
    DescriptionCapture,
    IsoAddressCapture,
    MacAddressCapture,
    SpeedCapture,
}

impl LexMode {
    /// Mode entered after lexing `kind`, if it is a trigger keyword
    pub fn triggered_by(kind: TokenKind) -> Option<LexMode> {
        match kind {
            TokenKind::Description => Some(LexMode::DescriptionCapture),
            TokenKind::Net => Some(LexMode::IsoAddressCapture),
            TokenKind::HwId | TokenKind::Mac => Some(LexMode::MacAddressCapture),
            TokenKind::Speed => Some(LexMode::SpeedCapture),
            _ => None,
        }
    }

    /// What the mode expected, for capture warnings
    pub fn expects(&self) -> &'static str {
        match self {
            LexMode::Default => "any token",
            LexMode::DescriptionCapture => "description text",
            LexMode::IsoAddressCapture => "ISO network entity title",
            LexMode::MacAddressCapture => "MAC address",
            LexMode::SpeedCapture => "'auto' or a speed such as 1000, 10g or 100m",
        }
    }
}

impl fmt::Display for LexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LexMode::Default => "default",
            LexMode::DescriptionCapture => "description",
            LexMode::IsoAddressCapture => "iso-address",
            LexMode::MacAddressCapture => "mac-address",
            LexMode::SpeedCapture => "speed",
        };
        write!(f, "{}", name)
    }
}

/// Context owned by one tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerState {
    pub mode: LexMode,
    /// Gates IPv6 rules; false turns `digits:digits` into a community
    pub ipv6_capable: bool,
    /// Gates IPv4 rules
    pub ip_capable: bool,
    /// Inside a block comment continued from an earlier line
    pub in_block_comment: bool,
}

impl Default for LexerState {
    fn default() -> Self {
        Self {
            mode: LexMode::Default,
            ipv6_capable: true,
            ip_capable: true,
            in_block_comment: false,
        }
    }
}

impl LexerState {
    /// Newline: back to default mode, IPv6 allowed again
    pub fn reset_line(&mut self) {
        self.mode = LexMode::Default;
        self.ipv6_capable = true;
    }

    /// Start or end of a comment
    pub fn comment_boundary(&mut self) {
        self.ipv6_capable = true;
    }

    /// Apply mode and flag changes of a keyword lexed in default mode
    pub fn apply_keyword(&mut self, kind: TokenKind) {
        if kind.disables_ipv6() {
            self.ipv6_capable = false;
        }
        if let Some(mode) = LexMode::triggered_by(kind) {
            self.mode = mode;
        }
    }

    pub fn exit_mode(&mut self) {
        self.mode = LexMode::Default;
    }

    pub fn in_capture(&self) -> bool {
        self.mode != LexMode::Default
    }
}
