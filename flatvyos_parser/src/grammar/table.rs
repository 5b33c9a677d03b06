//! Flat `(Scope, TokenKind) -> Production` dispatch table
//!
//! Every `set` tail is resolved one keyword at a time: the current scope and
//! the keyword select a production, which either finishes the statement or
//! names the scope to continue in. When a key appears twice the first entry
//! wins.

use crate::tokens::TokenKind;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Grammar context for the next keyword of a `set` path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Root,
    System,
    Interfaces,
    Interface,
    Protocols,
    Bgp,
    BgpNeighbor,
    BgpNeighborAddressFamily,
    BgpNeighborUnicast,
    BgpPolicyDirection,
    BgpSoftReconfiguration,
    BgpSendCommunity,
    BgpTimers,
    BgpParameters,
    BgpAddressFamily,
    BgpUnicast,
    BgpNetwork,
    BgpRedistribute,
    BgpRedistributeSource,
    Static,
    StaticRoute,
    StaticNextHop,
    Isis,
    IsisInterface,
    Policy,
    PrefixList,
    PrefixListRule,
    AccessList,
    AccessListRule,
    AccessListEndpoint,
    CommunityList,
    CommunityListRule,
    RouteMap,
    RouteMapRule,
    OnMatch,
    RouteMapMatch,
    MatchIp,
    MatchIpAddress,
    MatchCommunity,
    RouteMapSet,
    SetIpv6NextHop,
    Vpn,
    Ipsec,
    EspGroup,
    EspProposal,
    IkeGroup,
    IkeProposal,
    IpsecInterfaces,
    SiteToSite,
    SiteToSitePeer,
    PeerAuthentication,
    PeerVti,
    PeerTunnel,
    TunnelEndpoint,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Token classes a value slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// Names: interfaces, route-maps, peer groups
    Identifier,
    Decimal,
    /// Decimal that fits in 32 bits
    AsNumber,
    /// Decimal or float
    Number,
    Ipv4Address,
    Ipv4Prefix,
    Ipv6Address,
    Ipv6Prefix,
    AnyAddress,
    AnyPrefix,
    /// Address, interface name, `@id` or `any`
    PeerAddress,
    /// Prefix, `dhcp` or `dhcpv6`
    InterfaceAddress,
    Description,
    /// Any single word or quoted string
    Text,
    /// Every token up to the end of the line, joined
    Regex,
    MacAddress,
    IsoAddress,
    Speed,
    OneOf(&'static [TokenKind]),
}

impl ValueClass {
    pub fn accepts(&self, kind: TokenKind) -> bool {
        use TokenKind as K;
        match self {
            ValueClass::Identifier => {
                matches!(
                    kind,
                    K::Variable | K::DecimalNumber | K::FloatNumber | K::HexNumber
                ) || kind.is_quoted()
                    || kind.is_keyword()
            }
            ValueClass::Decimal | ValueClass::AsNumber => kind == K::DecimalNumber,
            ValueClass::Number => matches!(kind, K::DecimalNumber | K::FloatNumber),
            ValueClass::Ipv4Address => kind == K::IpAddress,
            ValueClass::Ipv4Prefix => kind == K::IpPrefix,
            ValueClass::Ipv6Address => kind == K::Ipv6Address,
            ValueClass::Ipv6Prefix => kind == K::Ipv6Prefix,
            ValueClass::AnyAddress => matches!(kind, K::IpAddress | K::Ipv6Address),
            ValueClass::AnyPrefix => matches!(kind, K::IpPrefix | K::Ipv6Prefix),
            ValueClass::PeerAddress => {
                matches!(kind, K::IpAddress | K::Ipv6Address | K::Variable | K::Any)
            }
            ValueClass::InterfaceAddress => {
                matches!(kind, K::IpPrefix | K::Ipv6Prefix | K::Dhcp | K::Dhcpv6)
            }
            ValueClass::Description => kind == K::DescriptionText || kind.is_quoted(),
            ValueClass::Text => kind.is_literal() || kind.is_keyword(),
            ValueClass::Regex => kind.is_content() && kind != K::Newline,
            ValueClass::MacAddress => kind == K::MacAddress,
            ValueClass::IsoAddress => kind == K::IsoAddress,
            ValueClass::Speed => matches!(kind, K::Auto | K::DecimalNumber | K::SpeedValue),
            ValueClass::OneOf(kinds) => kinds.contains(&kind),
        }
    }

    /// Phrase for "expected ..." messages
    pub fn describe(&self) -> String {
        match self {
            ValueClass::Identifier => "a name".to_string(),
            ValueClass::Decimal => "a decimal number".to_string(),
            ValueClass::AsNumber => "an AS number".to_string(),
            ValueClass::Number => "a number".to_string(),
            ValueClass::Ipv4Address => "an IPv4 address".to_string(),
            ValueClass::Ipv4Prefix => "an IPv4 prefix".to_string(),
            ValueClass::Ipv6Address => "an IPv6 address".to_string(),
            ValueClass::Ipv6Prefix => "an IPv6 prefix".to_string(),
            ValueClass::AnyAddress => "an IPv4 or IPv6 address".to_string(),
            ValueClass::AnyPrefix => "an IPv4 or IPv6 prefix".to_string(),
            ValueClass::PeerAddress => "a peer address or name".to_string(),
            ValueClass::InterfaceAddress => "an address prefix, 'dhcp' or 'dhcpv6'".to_string(),
            ValueClass::Description => "description text".to_string(),
            ValueClass::Text => "a value".to_string(),
            ValueClass::Regex => "a regular expression".to_string(),
            ValueClass::MacAddress => "a MAC address".to_string(),
            ValueClass::IsoAddress => "an ISO network entity title".to_string(),
            ValueClass::Speed => "'auto' or a link speed".to_string(),
            ValueClass::OneOf(kinds) => {
                let names: Vec<String> = kinds.iter().map(|k| k.describe()).collect();
                format!("one of {}", names.join(", "))
            }
        }
    }
}

/// Irregular productions with their own builders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// `match policy <expr>`
    PolicyExpression,
    /// `set community <values> [additive]` or `set community none`
    Community,
    /// `set extcommunity-rt|extcommunity-soo <ASN:nn|IP:nn>...`
    ExtendedCommunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Production {
    /// Keyword, then continue in the scope
    Branch(Scope),
    /// Keyword, a name, then continue in the scope
    Entity(ValueClass, Scope),
    /// Keyword, then exactly one value
    Terminal(ValueClass),
    /// Keyword alone
    Flag,
    /// Keyword, then the rest of the line without interpretation
    Ignored,
    Custom(Handler),
}

const ACTIONS: &[TokenKind] = &[TokenKind::Permit, TokenKind::Deny];
const DUPLEX: &[TokenKind] = &[TokenKind::Auto, TokenKind::Half, TokenKind::Full];
const ORIGINS: &[TokenKind] = &[TokenKind::Igp, TokenKind::Egp, TokenKind::Incomplete];
const ISIS_LEVELS: &[TokenKind] = &[TokenKind::Level1, TokenKind::Level2, TokenKind::Level12];
const METRIC_STYLES: &[TokenKind] = &[TokenKind::Narrow, TokenKind::Wide, TokenKind::Transition];
const PROTOCOLS: &[TokenKind] = &[
    TokenKind::Bgp,
    TokenKind::Connected,
    TokenKind::Isis,
    TokenKind::Kernel,
    TokenKind::Ospf,
    TokenKind::Ospfv3,
    TokenKind::Rip,
    TokenKind::Static,
];
const ENABLE_DISABLE: &[TokenKind] = &[TokenKind::Enable, TokenKind::Disable];
const ESP_MODES: &[TokenKind] = &[TokenKind::Tunnel, TokenKind::Transport];
const PFS_GROUPS: &[TokenKind] = &[
    TokenKind::Enable,
    TokenKind::Disable,
    TokenKind::DhGroup2,
    TokenKind::DhGroup5,
    TokenKind::DhGroup14,
    TokenKind::DhGroup15,
    TokenKind::DhGroup16,
    TokenKind::DhGroup17,
    TokenKind::DhGroup18,
    TokenKind::DhGroup19,
    TokenKind::DhGroup20,
    TokenKind::DhGroup21,
    TokenKind::DhGroup22,
    TokenKind::DhGroup23,
    TokenKind::DhGroup24,
    TokenKind::DhGroup25,
    TokenKind::DhGroup26,
];
const CIPHERS: &[TokenKind] = &[TokenKind::Aes128, TokenKind::Aes256, TokenKind::ThreeDes];
const HASHES: &[TokenKind] = &[
    TokenKind::Md5,
    TokenKind::Sha1,
    TokenKind::Sha256,
    TokenKind::Sha384,
    TokenKind::Sha512,
];
const KEY_EXCHANGES: &[TokenKind] = &[TokenKind::Ikev1, TokenKind::Ikev2];
const AUTH_MODES: &[TokenKind] = &[TokenKind::PreSharedSecret, TokenKind::Rsa, TokenKind::X509];
const CONNECTION_TYPES: &[TokenKind] = &[TokenKind::Initiate, TokenKind::Respond];

use Production::{Branch, Custom, Entity, Flag, Ignored, Terminal};
use Scope as S;
use TokenKind as K;
use ValueClass as V;

#[rustfmt::skip]
static GRAMMAR: &[(Scope, TokenKind, Production)] = &[
    // set <section>
    (S::Root, K::System, Branch(S::System)),
    (S::Root, K::Interfaces, Branch(S::Interfaces)),
    (S::Root, K::Protocols, Branch(S::Protocols)),
    (S::Root, K::Policy, Branch(S::Policy)),
    (S::Root, K::Vpn, Branch(S::Vpn)),
    (S::Root, K::Firewall, Ignored),
    (S::Root, K::Nat, Ignored),
    (S::Root, K::Service, Ignored),
    (S::Root, K::HighAvailability, Ignored),
    (S::Root, K::ZonePolicy, Ignored),
    (S::Root, K::TrafficPolicy, Ignored),
    (S::Root, K::Cluster, Ignored),

    // system
    (S::System, K::HostName, Terminal(V::Identifier)),
    (S::System, K::DomainName, Terminal(V::Identifier)),
    (S::System, K::NameServer, Terminal(V::AnyAddress)),
    (S::System, K::TimeZone, Terminal(V::Text)),
    (S::System, K::GatewayAddress, Terminal(V::Ipv4Address)),
    (S::System, K::DefaultAddressSelection, Flag),
    (S::System, K::DomainSearch, Ignored),
    (S::System, K::Login, Ignored),
    (S::System, K::Ntp, Ignored),
    (S::System, K::Syslog, Ignored),
    (S::System, K::ConfigManagement, Ignored),
    (S::System, K::Console, Ignored),
    (S::System, K::Package, Ignored),
    (S::System, K::TaskScheduler, Ignored),
    (S::System, K::Options, Ignored),
    (S::System, K::StaticHostMapping, Ignored),

    // interfaces <type> <name>
    (S::Interfaces, K::Bonding, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Bridge, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Dummy, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Ethernet, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Input, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::L2tpv3, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Loopback, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Openvpn, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::PseudoEthernet, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Tunnel, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Vti, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Vxlan, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Wireguard, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Wireless, Entity(V::Identifier, S::Interface)),
    (S::Interfaces, K::Wirelessmodem, Entity(V::Identifier, S::Interface)),

    (S::Interface, K::Address, Terminal(V::InterfaceAddress)),
    (S::Interface, K::Description, Terminal(V::Description)),
    (S::Interface, K::Disable, Flag),
    (S::Interface, K::Duplex, Terminal(V::OneOf(DUPLEX))),
    (S::Interface, K::Speed, Terminal(V::Speed)),
    (S::Interface, K::HwId, Terminal(V::MacAddress)),
    (S::Interface, K::Mac, Terminal(V::MacAddress)),
    (S::Interface, K::Mtu, Terminal(V::Decimal)),
    (S::Interface, K::Vif, Entity(V::Decimal, S::Interface)),
    (S::Interface, K::VifS, Entity(V::Decimal, S::Interface)),
    (S::Interface, K::VifC, Entity(V::Decimal, S::Interface)),
    (S::Interface, K::Firewall, Ignored),
    (S::Interface, K::Ip, Ignored),
    (S::Interface, K::Ipv6, Ignored),
    (S::Interface, K::Policy, Ignored),
    (S::Interface, K::SmpAffinity, Ignored),
    (S::Interface, K::RingBuffer, Ignored),
    (S::Interface, K::Offload, Ignored),
    (S::Interface, K::Encapsulation, Ignored),
    (S::Interface, K::LocalIp, Ignored),
    (S::Interface, K::RemoteIp, Ignored),
    (S::Interface, K::SourceAddress, Ignored),
    (S::Interface, K::Remote, Ignored),
    (S::Interface, K::Peer, Ignored),

    // protocols
    (S::Protocols, K::Bgp, Entity(V::AsNumber, S::Bgp)),
    (S::Protocols, K::Static, Branch(S::Static)),
    (S::Protocols, K::Isis, Branch(S::Isis)),
    (S::Protocols, K::Ospf, Ignored),
    (S::Protocols, K::Ospfv3, Ignored),
    (S::Protocols, K::Rip, Ignored),

    // protocols bgp <asn>
    (S::Bgp, K::Neighbor, Entity(V::PeerAddress, S::BgpNeighbor)),
    (S::Bgp, K::PeerGroup, Entity(V::Identifier, S::BgpNeighbor)),
    (S::Bgp, K::AddressFamily, Branch(S::BgpAddressFamily)),
    (S::Bgp, K::Parameters, Branch(S::BgpParameters)),
    (S::Bgp, K::Network, Entity(V::AnyPrefix, S::BgpNetwork)),
    (S::Bgp, K::Redistribute, Branch(S::BgpRedistribute)),
    (S::Bgp, K::Timers, Branch(S::BgpTimers)),
    (S::Bgp, K::MaximumPaths, Ignored),

    (S::BgpNeighbor, K::RemoteAs, Terminal(V::AsNumber)),
    (S::BgpNeighbor, K::Description, Terminal(V::Description)),
    (S::BgpNeighbor, K::NexthopSelf, Flag),
    (S::BgpNeighbor, K::RouteMap, Branch(S::BgpPolicyDirection)),
    (S::BgpNeighbor, K::PrefixList, Branch(S::BgpPolicyDirection)),
    (S::BgpNeighbor, K::UpdateSource, Terminal(V::PeerAddress)),
    (S::BgpNeighbor, K::EbgpMultihop, Terminal(V::Decimal)),
    (S::BgpNeighbor, K::Password, Terminal(V::Text)),
    (S::BgpNeighbor, K::Shutdown, Flag),
    (S::BgpNeighbor, K::Weight, Terminal(V::Decimal)),
    (S::BgpNeighbor, K::PeerGroup, Terminal(V::Identifier)),
    (S::BgpNeighbor, K::AddressFamily, Branch(S::BgpNeighborAddressFamily)),
    (S::BgpNeighbor, K::SoftReconfiguration, Branch(S::BgpSoftReconfiguration)),
    (S::BgpNeighbor, K::RouteReflectorClient, Flag),
    (S::BgpNeighbor, K::RemovePrivateAs, Flag),
    (S::BgpNeighbor, K::MaximumPrefix, Terminal(V::Decimal)),
    (S::BgpNeighbor, K::Timers, Branch(S::BgpTimers)),
    (S::BgpNeighbor, K::LocalAs, Ignored),
    (S::BgpNeighbor, K::Capability, Ignored),
    (S::BgpNeighbor, K::DefaultOriginate, Ignored),
    (S::BgpNeighbor, K::AllowasIn, Ignored),
    (S::BgpNeighbor, K::FilterList, Ignored),
    (S::BgpNeighbor, K::DistributeList, Ignored),

    (S::BgpNeighborAddressFamily, K::Ipv4Unicast, Branch(S::BgpNeighborUnicast)),
    (S::BgpNeighborAddressFamily, K::Ipv6Unicast, Branch(S::BgpNeighborUnicast)),

    (S::BgpNeighborUnicast, K::NexthopSelf, Flag),
    (S::BgpNeighborUnicast, K::RouteMap, Branch(S::BgpPolicyDirection)),
    (S::BgpNeighborUnicast, K::PrefixList, Branch(S::BgpPolicyDirection)),
    (S::BgpNeighborUnicast, K::RouteReflectorClient, Flag),
    (S::BgpNeighborUnicast, K::RemovePrivateAs, Flag),
    (S::BgpNeighborUnicast, K::MaximumPrefix, Terminal(V::Decimal)),
    (S::BgpNeighborUnicast, K::SoftReconfiguration, Branch(S::BgpSoftReconfiguration)),
    (S::BgpNeighborUnicast, K::SendCommunity, Branch(S::BgpSendCommunity)),
    (S::BgpNeighborUnicast, K::DefaultOriginate, Ignored),
    (S::BgpNeighborUnicast, K::AllowasIn, Ignored),
    (S::BgpNeighborUnicast, K::Capability, Ignored),
    (S::BgpNeighborUnicast, K::FilterList, Ignored),
    (S::BgpNeighborUnicast, K::DistributeList, Ignored),

    (S::BgpPolicyDirection, K::Export, Terminal(V::Identifier)),
    (S::BgpPolicyDirection, K::Import, Terminal(V::Identifier)),

    (S::BgpSoftReconfiguration, K::Inbound, Flag),

    (S::BgpSendCommunity, K::Extended, Flag),
    (S::BgpSendCommunity, K::Standard, Flag),

    (S::BgpTimers, K::Holdtime, Terminal(V::Decimal)),
    (S::BgpTimers, K::Keepalive, Terminal(V::Decimal)),

    (S::BgpParameters, K::RouterId, Terminal(V::Ipv4Address)),
    (S::BgpParameters, K::AlwaysCompareMed, Flag),
    (S::BgpParameters, K::LogNeighborChanges, Flag),
    (S::BgpParameters, K::Confederation, Ignored),
    (S::BgpParameters, K::ClusterId, Ignored),
    (S::BgpParameters, K::GracefulRestart, Ignored),
    (S::BgpParameters, K::Distance, Ignored),
    (S::BgpParameters, K::Bestpath, Ignored),

    (S::BgpAddressFamily, K::Ipv4Unicast, Branch(S::BgpUnicast)),
    (S::BgpAddressFamily, K::Ipv6Unicast, Branch(S::BgpUnicast)),

    (S::BgpUnicast, K::Network, Entity(V::AnyPrefix, S::BgpNetwork)),
    (S::BgpUnicast, K::Redistribute, Branch(S::BgpRedistribute)),
    (S::BgpUnicast, K::MaximumPaths, Ignored),

    (S::BgpNetwork, K::RouteMap, Terminal(V::Identifier)),

    (S::BgpRedistribute, K::Connected, Branch(S::BgpRedistributeSource)),
    (S::BgpRedistribute, K::Kernel, Branch(S::BgpRedistributeSource)),
    (S::BgpRedistribute, K::Ospf, Branch(S::BgpRedistributeSource)),
    (S::BgpRedistribute, K::Rip, Branch(S::BgpRedistributeSource)),
    (S::BgpRedistribute, K::Static, Branch(S::BgpRedistributeSource)),

    (S::BgpRedistributeSource, K::RouteMap, Terminal(V::Identifier)),
    (S::BgpRedistributeSource, K::Metric, Terminal(V::Decimal)),

    // protocols static
    (S::Static, K::Route, Entity(V::Ipv4Prefix, S::StaticRoute)),
    (S::Static, K::Route6, Entity(V::Ipv6Prefix, S::StaticRoute)),
    (S::Static, K::InterfaceRoute, Ignored),
    (S::Static, K::Table, Ignored),

    (S::StaticRoute, K::NextHop, Entity(V::AnyAddress, S::StaticNextHop)),
    (S::StaticRoute, K::Blackhole, Branch(S::StaticNextHop)),
    (S::StaticRoute, K::Description, Terminal(V::Description)),
    (S::StaticRoute, K::NextHopInterface, Ignored),

    (S::StaticNextHop, K::Distance, Terminal(V::Decimal)),
    (S::StaticNextHop, K::Disable, Flag),
    (S::StaticNextHop, K::Interface, Terminal(V::Identifier)),

    // protocols isis
    (S::Isis, K::Net, Terminal(V::IsoAddress)),
    (S::Isis, K::Level, Terminal(V::OneOf(ISIS_LEVELS))),
    (S::Isis, K::MetricStyle, Terminal(V::OneOf(METRIC_STYLES))),
    (S::Isis, K::Interface, Entity(V::Identifier, S::IsisInterface)),
    (S::Isis, K::Redistribute, Ignored),

    (S::IsisInterface, K::Passive, Flag),
    (S::IsisInterface, K::CircuitType, Terminal(V::OneOf(ISIS_LEVELS))),
    (S::IsisInterface, K::Metric, Terminal(V::Decimal)),

    // policy
    (S::Policy, K::PrefixList, Entity(V::Identifier, S::PrefixList)),
    (S::Policy, K::PrefixList6, Entity(V::Identifier, S::PrefixList)),
    (S::Policy, K::AccessList, Entity(V::Identifier, S::AccessList)),
    (S::Policy, K::RouteMap, Entity(V::Identifier, S::RouteMap)),
    (S::Policy, K::CommunityList, Entity(V::Identifier, S::CommunityList)),
    (S::Policy, K::AccessList6, Ignored),
    (S::Policy, K::AsPathList, Ignored),
    (S::Policy, K::LargeCommunityList, Ignored),

    (S::PrefixList, K::Description, Terminal(V::Description)),
    (S::PrefixList, K::Rule, Entity(V::Decimal, S::PrefixListRule)),

    (S::PrefixListRule, K::Action, Terminal(V::OneOf(ACTIONS))),
    (S::PrefixListRule, K::Description, Terminal(V::Description)),
    (S::PrefixListRule, K::Ge, Terminal(V::Decimal)),
    (S::PrefixListRule, K::Le, Terminal(V::Decimal)),
    (S::PrefixListRule, K::Prefix, Terminal(V::AnyPrefix)),

    (S::AccessList, K::Description, Terminal(V::Description)),
    (S::AccessList, K::Rule, Entity(V::Decimal, S::AccessListRule)),

    (S::AccessListRule, K::Action, Terminal(V::OneOf(ACTIONS))),
    (S::AccessListRule, K::Description, Terminal(V::Description)),
    (S::AccessListRule, K::Source, Branch(S::AccessListEndpoint)),
    (S::AccessListRule, K::Destination, Branch(S::AccessListEndpoint)),

    (S::AccessListEndpoint, K::Any, Flag),
    (S::AccessListEndpoint, K::Host, Terminal(V::Ipv4Address)),
    (S::AccessListEndpoint, K::InverseMask, Terminal(V::Ipv4Address)),
    (S::AccessListEndpoint, K::Network, Terminal(V::Ipv4Address)),

    (S::CommunityList, K::Description, Terminal(V::Description)),
    (S::CommunityList, K::Rule, Entity(V::Decimal, S::CommunityListRule)),

    (S::CommunityListRule, K::Action, Terminal(V::OneOf(ACTIONS))),
    (S::CommunityListRule, K::Description, Terminal(V::Description)),
    (S::CommunityListRule, K::Regex, Terminal(V::Regex)),

    (S::RouteMap, K::Description, Terminal(V::Description)),
    (S::RouteMap, K::Rule, Entity(V::Decimal, S::RouteMapRule)),

    (S::RouteMapRule, K::Action, Terminal(V::OneOf(ACTIONS))),
    (S::RouteMapRule, K::Description, Terminal(V::Description)),
    (S::RouteMapRule, K::Call, Terminal(V::Identifier)),
    (S::RouteMapRule, K::Continue, Terminal(V::Decimal)),
    (S::RouteMapRule, K::OnMatch, Branch(S::OnMatch)),
    (S::RouteMapRule, K::Match, Branch(S::RouteMapMatch)),
    (S::RouteMapRule, K::Set, Branch(S::RouteMapSet)),

    (S::OnMatch, K::Goto, Terminal(V::Decimal)),
    (S::OnMatch, K::Next, Flag),

    (S::RouteMapMatch, K::Ip, Branch(S::MatchIp)),
    (S::RouteMapMatch, K::Ipv6, Branch(S::MatchIp)),
    (S::RouteMapMatch, K::Community, Branch(S::MatchCommunity)),
    (S::RouteMapMatch, K::AsPath, Terminal(V::Identifier)),
    (S::RouteMapMatch, K::Interface, Terminal(V::Identifier)),
    (S::RouteMapMatch, K::Metric, Terminal(V::Decimal)),
    (S::RouteMapMatch, K::Origin, Terminal(V::OneOf(ORIGINS))),
    (S::RouteMapMatch, K::Peer, Terminal(V::AnyAddress)),
    (S::RouteMapMatch, K::Tag, Terminal(V::Decimal)),
    (S::RouteMapMatch, K::Protocol, Terminal(V::OneOf(PROTOCOLS))),
    (S::RouteMapMatch, K::Policy, Custom(Handler::PolicyExpression)),

    (S::MatchIp, K::Address, Branch(S::MatchIpAddress)),
    (S::MatchIp, K::NextHop, Branch(S::MatchIpAddress)),

    (S::MatchIpAddress, K::PrefixList, Terminal(V::Identifier)),
    (S::MatchIpAddress, K::AccessList, Terminal(V::Identifier)),

    (S::MatchCommunity, K::CommunityList, Terminal(V::Identifier)),
    (S::MatchCommunity, K::ExactMatch, Flag),

    (S::RouteMapSet, K::Community, Custom(Handler::Community)),
    (S::RouteMapSet, K::ExtcommunityRt, Custom(Handler::ExtendedCommunity)),
    (S::RouteMapSet, K::ExtcommunitySoo, Custom(Handler::ExtendedCommunity)),
    (S::RouteMapSet, K::LocalPreference, Terminal(V::Decimal)),
    (S::RouteMapSet, K::Metric, Terminal(V::Decimal)),
    (S::RouteMapSet, K::AsPathPrepend, Terminal(V::Text)),
    (S::RouteMapSet, K::Origin, Terminal(V::OneOf(ORIGINS))),
    (S::RouteMapSet, K::IpNextHop, Terminal(V::Ipv4Address)),
    (S::RouteMapSet, K::Ipv6NextHop, Branch(S::SetIpv6NextHop)),
    (S::RouteMapSet, K::Weight, Terminal(V::Decimal)),
    (S::RouteMapSet, K::Tag, Terminal(V::Decimal)),
    (S::RouteMapSet, K::Src, Terminal(V::AnyAddress)),
    (S::RouteMapSet, K::AtomicAggregate, Flag),
    (S::RouteMapSet, K::Aggregator, Ignored),
    (S::RouteMapSet, K::CommList, Ignored),

    (S::SetIpv6NextHop, K::Global, Terminal(V::Ipv6Address)),
    (S::SetIpv6NextHop, K::Local, Terminal(V::Ipv6Address)),

    // vpn
    (S::Vpn, K::Ipsec, Branch(S::Ipsec)),
    (S::Vpn, K::L2tp, Ignored),
    (S::Vpn, K::Pptp, Ignored),
    (S::Vpn, K::RsaKeys, Ignored),

    (S::Ipsec, K::EspGroup, Entity(V::Identifier, S::EspGroup)),
    (S::Ipsec, K::IkeGroup, Entity(V::Identifier, S::IkeGroup)),
    (S::Ipsec, K::IpsecInterfaces, Branch(S::IpsecInterfaces)),
    (S::Ipsec, K::SiteToSite, Branch(S::SiteToSite)),
    (S::Ipsec, K::NatTraversal, Ignored),
    (S::Ipsec, K::NatNetworks, Ignored),
    (S::Ipsec, K::Logging, Ignored),
    (S::Ipsec, K::AutoUpdate, Ignored),

    (S::EspGroup, K::Compression, Terminal(V::OneOf(ENABLE_DISABLE))),
    (S::EspGroup, K::Lifetime, Terminal(V::Number)),
    (S::EspGroup, K::Mode, Terminal(V::OneOf(ESP_MODES))),
    (S::EspGroup, K::Pfs, Terminal(V::OneOf(PFS_GROUPS))),
    (S::EspGroup, K::Proposal, Entity(V::Decimal, S::EspProposal)),

    (S::EspProposal, K::Encryption, Terminal(V::OneOf(CIPHERS))),
    (S::EspProposal, K::Hash, Terminal(V::OneOf(HASHES))),

    (S::IkeGroup, K::KeyExchange, Terminal(V::OneOf(KEY_EXCHANGES))),
    (S::IkeGroup, K::Lifetime, Terminal(V::Number)),
    (S::IkeGroup, K::Mode, Terminal(V::Identifier)),
    (S::IkeGroup, K::Proposal, Entity(V::Decimal, S::IkeProposal)),
    (S::IkeGroup, K::DeadPeerDetection, Ignored),
    (S::IkeGroup, K::Ikev2Reauth, Ignored),

    (S::IkeProposal, K::DhGroup, Terminal(V::Decimal)),
    (S::IkeProposal, K::Encryption, Terminal(V::OneOf(CIPHERS))),
    (S::IkeProposal, K::Hash, Terminal(V::OneOf(HASHES))),

    (S::IpsecInterfaces, K::Interface, Terminal(V::Identifier)),

    (S::SiteToSite, K::Peer, Entity(V::PeerAddress, S::SiteToSitePeer)),

    (S::SiteToSitePeer, K::Authentication, Branch(S::PeerAuthentication)),
    (S::SiteToSitePeer, K::ConnectionType, Terminal(V::OneOf(CONNECTION_TYPES))),
    (S::SiteToSitePeer, K::Description, Terminal(V::Description)),
    (S::SiteToSitePeer, K::IkeGroup, Terminal(V::Identifier)),
    (S::SiteToSitePeer, K::LocalAddress, Terminal(V::PeerAddress)),
    (S::SiteToSitePeer, K::Vti, Branch(S::PeerVti)),
    (S::SiteToSitePeer, K::Tunnel, Entity(V::Decimal, S::PeerTunnel)),

    (S::PeerAuthentication, K::Id, Terminal(V::Text)),
    (S::PeerAuthentication, K::Mode, Terminal(V::OneOf(AUTH_MODES))),
    (S::PeerAuthentication, K::PreSharedSecret, Terminal(V::Text)),
    (S::PeerAuthentication, K::RemoteId, Terminal(V::Text)),
    (S::PeerAuthentication, K::RsaKeys, Ignored),

    (S::PeerVti, K::Bind, Terminal(V::Identifier)),
    (S::PeerVti, K::EspGroup, Terminal(V::Identifier)),

    (S::PeerTunnel, K::Local, Branch(S::TunnelEndpoint)),
    (S::PeerTunnel, K::Remote, Branch(S::TunnelEndpoint)),
    (S::PeerTunnel, K::EspGroup, Terminal(V::Identifier)),

    (S::TunnelEndpoint, K::Prefix, Terminal(V::AnyPrefix)),
];

static PRODUCTION_LOOKUP: OnceLock<HashMap<(Scope, TokenKind), Production>> = OnceLock::new();

fn production_lookup() -> &'static HashMap<(Scope, TokenKind), Production> {
    PRODUCTION_LOOKUP.get_or_init(|| {
        let mut lookup = HashMap::with_capacity(GRAMMAR.len());
        for &(scope, keyword, production) in GRAMMAR {
            lookup.entry((scope, keyword)).or_insert(production);
        }
        lookup
    })
}

/// Production for `keyword` in `scope`, if the grammar models it
pub fn lookup(scope: Scope, keyword: TokenKind) -> Option<Production> {
    production_lookup().get(&(scope, keyword)).copied()
}

/// Every table entry in declaration order
pub fn rules() -> &'static [(Scope, TokenKind, Production)] {
    GRAMMAR
}

/// Keywords `scope` accepts, in declaration order
pub fn keywords_in(scope: Scope) -> Vec<TokenKind> {
    GRAMMAR
        .iter()
        .filter(|(s, _, _)| *s == scope)
        .map(|(_, keyword, _)| *keyword)
        .collect()
}

/// Structural checks: every rule is keyed by a keyword and every scope a
/// production continues in has at least one rule
pub fn validate_grammar_table() -> Result<(), String> {
    for (scope, keyword, production) in GRAMMAR {
        if !keyword.is_keyword() {
            return Err(format!(
                "Rule in {} is keyed by non-keyword {}",
                scope,
                keyword.describe()
            ));
        }
        let target = match production {
            Branch(next) | Entity(_, next) => Some(*next),
            _ => None,
        };
        if let Some(next) = target {
            if keywords_in(next).is_empty() {
                return Err(format!(
                    "Rule {} {} continues in {} which has no rules",
                    scope,
                    keyword.as_str(),
                    next
                ));
            }
        }
    }
    Ok(())
}
