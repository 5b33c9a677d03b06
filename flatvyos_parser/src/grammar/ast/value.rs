//! Typed scalar values carried by statement payloads

use crate::tokens::TokenKind;
use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// `asn:value` with both halves in 0..=65535
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StandardCommunity {
    pub asn: u16,
    pub value: u16,
}

impl StandardCommunity {
    pub fn new(asn: u16, value: u16) -> Self {
        Self { asn, value }
    }

    /// Parse `digits:digits`, rejecting halves above 65535
    pub fn parse(text: &str) -> Result<Self, String> {
        let (high, low) = text
            .split_once(':')
            .ok_or_else(|| format!("'{}' is not of the form ASN:VALUE", text))?;
        let half = |part: &str| {
            part.parse::<u16>()
                .map_err(|_| format!("community half '{}' exceeds 65535", part))
        };
        Ok(Self::new(half(high)?, half(low)?))
    }
}

impl fmt::Display for StandardCommunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asn, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExtendedCommunityKind {
    RouteTarget,
    SiteOfOrigin,
}

impl ExtendedCommunityKind {
    pub fn from_keyword(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::ExtcommunityRt => Some(Self::RouteTarget),
            TokenKind::ExtcommunitySoo => Some(Self::SiteOfOrigin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RouteTarget => "rt",
            Self::SiteOfOrigin => "soo",
        }
    }
}

/// Administrator half of an extended community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Administrator {
    As(u32),
    Ip(Ipv4Addr),
}

impl fmt::Display for Administrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Administrator::As(asn) => write!(f, "{}", asn),
            Administrator::Ip(ip) => write!(f, "{}", ip),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExtendedCommunity {
    pub kind: ExtendedCommunityKind,
    pub administrator: Administrator,
    pub assigned: u32,
}

impl ExtendedCommunity {
    /// Two-byte AS carries a four-byte assigned number; a four-byte AS or
    /// an IPv4 administrator carries two bytes
    pub fn new(
        kind: ExtendedCommunityKind,
        administrator: Administrator,
        assigned: u32,
    ) -> Result<Self, String> {
        let wide_administrator = match administrator {
            Administrator::As(asn) => asn > u32::from(u16::MAX),
            Administrator::Ip(_) => true,
        };
        if wide_administrator && assigned > u32::from(u16::MAX) {
            return Err(format!(
                "assigned number {} exceeds 65535 for administrator {}",
                assigned, administrator
            ));
        }
        Ok(Self {
            kind,
            administrator,
            assigned,
        })
    }
}

impl fmt::Display for ExtendedCommunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind.as_str(),
            self.administrator,
            self.assigned
        )
    }
}

/// Typed statement value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Decimal(u64),
    Float(f64),
    Ipv4(Ipv4Addr),
    Ipv4Prefix(Ipv4Addr, u8),
    Ipv6(Ipv6Addr),
    Ipv6Prefix(Ipv6Addr, u8),
    Mac(String),
    Iso(String),
    Community(StandardCommunity),
    ExtendedCommunity(ExtendedCommunity),
    /// Megabits per second
    Speed(u64),
    Text(String),
    Keyword(TokenKind),
    Flag,
    List(Vec<Value>),
}

impl Value {
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) | Value::Mac(text) | Value::Iso(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<u64> {
        match self {
            Value::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Decimal(_) => "decimal",
            Value::Float(_) => "float",
            Value::Ipv4(_) => "ipv4",
            Value::Ipv4Prefix(..) => "ipv4-prefix",
            Value::Ipv6(_) => "ipv6",
            Value::Ipv6Prefix(..) => "ipv6-prefix",
            Value::Mac(_) => "mac",
            Value::Iso(_) => "iso",
            Value::Community(_) => "community",
            Value::ExtendedCommunity(_) => "extended-community",
            Value::Speed(_) => "speed",
            Value::Text(_) => "text",
            Value::Keyword(_) => "keyword",
            Value::Flag => "flag",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Decimal(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Ipv4(ip) => write!(f, "{}", ip),
            Value::Ipv4Prefix(ip, len) => write!(f, "{}/{}", ip, len),
            Value::Ipv6(ip) => write!(f, "{}", ip),
            Value::Ipv6Prefix(ip, len) => write!(f, "{}/{}", ip, len),
            Value::Mac(text) | Value::Iso(text) => write!(f, "{}", text),
            Value::Community(community) => write!(f, "{}", community),
            Value::ExtendedCommunity(community) => write!(f, "{}", community),
            Value::Speed(mbps) => write!(f, "{}m", mbps),
            Value::Text(text) => write!(f, "\"{}\"", text),
            Value::Keyword(kind) => write!(f, "{}", kind.as_str()),
            Value::Flag => write!(f, "<flag>"),
            Value::List(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(" "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_community_range() {
        assert_eq!(
            StandardCommunity::parse("64512:100"),
            Ok(StandardCommunity::new(64512, 100))
        );
        assert!(StandardCommunity::parse("65536:1").is_err());
        assert!(StandardCommunity::parse("1:70000").is_err());
        assert!(StandardCommunity::parse("100").is_err());
    }

    #[test]
    fn test_extended_community_ranges() {
        let rt = ExtendedCommunityKind::RouteTarget;
        assert!(ExtendedCommunity::new(rt, Administrator::As(65000), 4_000_000).is_ok());
        assert!(ExtendedCommunity::new(rt, Administrator::As(4_200_000_000), 70_000).is_err());
        assert!(
            ExtendedCommunity::new(rt, Administrator::Ip(Ipv4Addr::new(10, 0, 0, 1)), 70_000)
                .is_err()
        );

        let soo = ExtendedCommunity::new(
            ExtendedCommunityKind::SiteOfOrigin,
            Administrator::Ip(Ipv4Addr::new(10, 0, 0, 1)),
            7,
        )
        .unwrap();
        assert_eq!(soo.to_string(), "soo:10.0.0.1:7");
    }

    #[test]
    fn test_value_display() {
        let list = Value::List(vec![
            Value::Community(StandardCommunity::new(64512, 100)),
            Value::Keyword(TokenKind::Additive),
        ]);
        assert_eq!(list.to_string(), "[64512:100 additive]");
        assert_eq!(Value::Speed(10_000).to_string(), "10000m");
        assert_eq!(Value::text("uplink").as_text(), Some("uplink"));
        assert_eq!(Value::Decimal(7).type_name(), "decimal");
    }
}
