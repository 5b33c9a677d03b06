//! Token kinds for the flat VyOS dialect
//!
//! One table drives the enum, its text form, its class, and the keyword lookup.
//! Keyword matching is exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Broad classification of token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    /// Reserved vendor keyword
    Keyword,
    /// Value-carrying token (numbers, addresses, names, strings)
    Literal,
    /// Single or double character punctuation
    Punctuation,
    /// Statement terminator (newline)
    Terminator,
    /// Whitespace and comments
    Trivia,
}

macro_rules! token_kinds {
    (
        keywords { $($kw:ident => $kw_text:literal,)+ }
        literals { $($lit:ident => $lit_name:literal,)+ }
        punctuation { $($punct:ident => $punct_text:literal,)+ }
        terminators { $($term:ident => $term_name:literal,)+ }
        trivia { $($triv:ident => $triv_name:literal,)+ }
    ) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum TokenKind {
            $($kw,)+
            $($lit,)+
            $($punct,)+
            $($term,)+
            $($triv,)+
        }

        /// Every reserved keyword with its kind
        pub static KEYWORDS: &[(&str, TokenKind)] = &[$(($kw_text, TokenKind::$kw)),+];

        /// Every punctuation token with its exact text
        pub static PUNCTUATION: &[(&str, TokenKind)] = &[$(($punct_text, TokenKind::$punct)),+];

        impl TokenKind {
            /// Keyword or punctuation text, or a descriptive name for other kinds
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$kw => $kw_text,)+
                    $(Self::$lit => $lit_name,)+
                    $(Self::$punct => $punct_text,)+
                    $(Self::$term => $term_name,)+
                    $(Self::$triv => $triv_name,)+
                }
            }

            pub fn class(&self) -> TokenClass {
                match self {
                    $(Self::$kw)|+ => TokenClass::Keyword,
                    $(Self::$lit)|+ => TokenClass::Literal,
                    $(Self::$punct)|+ => TokenClass::Punctuation,
                    $(Self::$term)|+ => TokenClass::Terminator,
                    $(Self::$triv)|+ => TokenClass::Trivia,
                }
            }
        }
    };
}

token_kinds! {
    keywords {
        // Top-level commands
        Set => "set",
        Delete => "delete",
        CommentCommand => "comment",
        Commit => "commit",
        Save => "save",
        Exit => "exit",
        Edit => "edit",
        Load => "load",
        Run => "run",
        Show => "show",

        // Sections
        System => "system",
        Interfaces => "interfaces",
        Protocols => "protocols",
        Policy => "policy",
        Vpn => "vpn",
        Firewall => "firewall",
        Nat => "nat",
        Service => "service",
        HighAvailability => "high-availability",
        ZonePolicy => "zone-policy",
        TrafficPolicy => "traffic-policy",
        Cluster => "cluster",

        // System
        HostName => "host-name",
        DomainName => "domain-name",
        DomainSearch => "domain-search",
        NameServer => "name-server",
        TimeZone => "time-zone",
        GatewayAddress => "gateway-address",
        DefaultAddressSelection => "default-address-selection",
        Login => "login",
        Ntp => "ntp",
        Syslog => "syslog",
        ConfigManagement => "config-management",
        Console => "console",
        Package => "package",
        TaskScheduler => "task-scheduler",
        Options => "options",
        StaticHostMapping => "static-host-mapping",

        // Interface types
        Bonding => "bonding",
        Bridge => "bridge",
        Dummy => "dummy",
        Ethernet => "ethernet",
        Input => "input",
        L2tpv3 => "l2tpv3",
        Loopback => "loopback",
        Openvpn => "openvpn",
        PseudoEthernet => "pseudo-ethernet",
        Tunnel => "tunnel",
        Vti => "vti",
        Vxlan => "vxlan",
        Wireguard => "wireguard",
        Wireless => "wireless",
        Wirelessmodem => "wirelessmodem",

        // Interface settings
        Address => "address",
        Description => "description",
        Disable => "disable",
        Duplex => "duplex",
        Speed => "speed",
        HwId => "hw-id",
        Mac => "mac",
        Mtu => "mtu",
        Vif => "vif",
        VifS => "vif-s",
        VifC => "vif-c",
        Dhcp => "dhcp",
        Dhcpv6 => "dhcpv6",
        Auto => "auto",
        Half => "half",
        Full => "full",
        Ip => "ip",
        Ipv6 => "ipv6",
        SmpAffinity => "smp-affinity",
        RingBuffer => "ring-buffer",
        Offload => "offload",
        Encapsulation => "encapsulation",
        LocalIp => "local-ip",
        RemoteIp => "remote-ip",
        SourceAddress => "source-address",
        Remote => "remote",

        // BGP
        Bgp => "bgp",
        Neighbor => "neighbor",
        PeerGroup => "peer-group",
        RemoteAs => "remote-as",
        NexthopSelf => "nexthop-self",
        RouteMap => "route-map",
        Export => "export",
        Import => "import",
        UpdateSource => "update-source",
        EbgpMultihop => "ebgp-multihop",
        Password => "password",
        Shutdown => "shutdown",
        Weight => "weight",
        AddressFamily => "address-family",
        Ipv4Unicast => "ipv4-unicast",
        Ipv6Unicast => "ipv6-unicast",
        Parameters => "parameters",
        RouterId => "router-id",
        AlwaysCompareMed => "always-compare-med",
        LogNeighborChanges => "log-neighbor-changes",
        Network => "network",
        Redistribute => "redistribute",
        Connected => "connected",
        Kernel => "kernel",
        Ospf => "ospf",
        Ospfv3 => "ospfv3",
        Rip => "rip",
        Static => "static",
        SoftReconfiguration => "soft-reconfiguration",
        Inbound => "inbound",
        Timers => "timers",
        Holdtime => "holdtime",
        Keepalive => "keepalive",
        LocalAs => "local-as",
        MaximumPrefix => "maximum-prefix",
        FilterList => "filter-list",
        DistributeList => "distribute-list",
        AllowasIn => "allowas-in",
        Capability => "capability",
        DefaultOriginate => "default-originate",
        RouteReflectorClient => "route-reflector-client",
        RemovePrivateAs => "remove-private-as",
        SendCommunity => "send-community",
        Extended => "extended",
        Standard => "standard",
        Confederation => "confederation",
        ClusterId => "cluster-id",
        GracefulRestart => "graceful-restart",
        Distance => "distance",
        Bestpath => "bestpath",
        MaximumPaths => "maximum-paths",

        // Static routing
        Route => "route",
        Route6 => "route6",
        NextHop => "next-hop",
        Blackhole => "blackhole",
        InterfaceRoute => "interface-route",
        NextHopInterface => "next-hop-interface",
        Table => "table",

        // IS-IS
        Isis => "isis",
        Net => "net",
        Level => "level",
        Level1 => "level-1",
        Level2 => "level-2",
        Level12 => "level-1-2",
        MetricStyle => "metric-style",
        Narrow => "narrow",
        Wide => "wide",
        Transition => "transition",
        Interface => "interface",
        Passive => "passive",
        CircuitType => "circuit-type",

        // Policy
        PrefixList => "prefix-list",
        PrefixList6 => "prefix-list6",
        AccessList => "access-list",
        AccessList6 => "access-list6",
        AsPathList => "as-path-list",
        CommunityList => "community-list",
        LargeCommunityList => "large-community-list",
        Rule => "rule",
        Action => "action",
        Permit => "permit",
        Deny => "deny",
        Ge => "ge",
        Le => "le",
        Prefix => "prefix",
        Regex => "regex",
        Call => "call",
        Continue => "continue",
        OnMatch => "on-match",
        Goto => "goto",
        Next => "next",
        Match => "match",
        AsPath => "as-path",
        Metric => "metric",
        Origin => "origin",
        Peer => "peer",
        Tag => "tag",
        Protocol => "protocol",
        Community => "community",
        ExactMatch => "exact-match",
        Igp => "igp",
        Egp => "egp",
        Incomplete => "incomplete",
        LocalPreference => "local-preference",
        AsPathPrepend => "as-path-prepend",
        IpNextHop => "ip-next-hop",
        Ipv6NextHop => "ipv6-next-hop",
        Global => "global",
        Local => "local",
        Src => "src",
        AtomicAggregate => "atomic-aggregate",
        Aggregator => "aggregator",
        CommList => "comm-list",
        ExtcommunityRt => "extcommunity-rt",
        ExtcommunitySoo => "extcommunity-soo",
        Additive => "additive",
        NoneKeyword => "none",
        NoExport => "no-export",
        NoAdvertise => "no-advertise",
        LocalAsCommunity => "local-AS",
        Internet => "internet",
        Source => "source",
        Destination => "destination",
        Any => "any",
        Host => "host",
        InverseMask => "inverse-mask",

        // VPN
        Ipsec => "ipsec",
        EspGroup => "esp-group",
        IkeGroup => "ike-group",
        IpsecInterfaces => "ipsec-interfaces",
        SiteToSite => "site-to-site",
        Compression => "compression",
        Lifetime => "lifetime",
        Mode => "mode",
        Pfs => "pfs",
        Proposal => "proposal",
        Encryption => "encryption",
        Hash => "hash",
        DhGroup => "dh-group",
        KeyExchange => "key-exchange",
        Ikev1 => "ikev1",
        Ikev2 => "ikev2",
        Ikev2Reauth => "ikev2-reauth",
        Authentication => "authentication",
        Id => "id",
        PreSharedSecret => "pre-shared-secret",
        RemoteId => "remote-id",
        Rsa => "rsa",
        RsaKeys => "rsa-keys",
        X509 => "x509",
        ConnectionType => "connection-type",
        Initiate => "initiate",
        Respond => "respond",
        LocalAddress => "local-address",
        Bind => "bind",
        Transport => "transport",
        NatTraversal => "nat-traversal",
        NatNetworks => "nat-networks",
        DeadPeerDetection => "dead-peer-detection",
        L2tp => "l2tp",
        Pptp => "pptp",
        Logging => "logging",
        AutoUpdate => "auto-update",
        Enable => "enable",
        Aes128 => "aes128",
        Aes256 => "aes256",
        ThreeDes => "3des",
        Md5 => "md5",
        Sha1 => "sha1",
        Sha256 => "sha256",
        Sha384 => "sha384",
        Sha512 => "sha512",
        DhGroup2 => "dh-group2",
        DhGroup5 => "dh-group5",
        DhGroup14 => "dh-group14",
        DhGroup15 => "dh-group15",
        DhGroup16 => "dh-group16",
        DhGroup17 => "dh-group17",
        DhGroup18 => "dh-group18",
        DhGroup19 => "dh-group19",
        DhGroup20 => "dh-group20",
        DhGroup21 => "dh-group21",
        DhGroup22 => "dh-group22",
        DhGroup23 => "dh-group23",
        DhGroup24 => "dh-group24",
        DhGroup25 => "dh-group25",
        DhGroup26 => "dh-group26",
    }
    literals {
        Variable => "variable",
        DecimalNumber => "decimal number",
        FloatNumber => "float number",
        HexNumber => "hex number",
        IpAddress => "IPv4 address",
        IpPrefix => "IPv4 prefix",
        Ipv6Address => "IPv6 address",
        Ipv6Prefix => "IPv6 prefix",
        MacAddress => "MAC address",
        IsoAddress => "ISO address",
        StandardCommunity => "standard community",
        DescriptionText => "description text",
        DoubleQuotedString => "double-quoted string",
        SingleQuotedString => "single-quoted string",
        SpeedValue => "speed value",
    }
    punctuation {
        DoublePipe => "||",
        DoubleAmpersand => "&&",
        OpenBrace => "{",
        CloseBrace => "}",
        OpenParen => "(",
        CloseParen => ")",
        OpenBracket => "[",
        CloseBracket => "]",
        Comma => ",",
        Colon => ":",
        Semicolon => ";",
        Pipe => "|",
        ForwardSlash => "/",
        Dash => "-",
        Period => ".",
    }
    terminators {
        Newline => "newline",
    }
    trivia {
        Whitespace => "whitespace",
        Comment => "comment text",
    }
}

static KEYWORD_LOOKUP: OnceLock<HashMap<&'static str, TokenKind>> = OnceLock::new();

impl TokenKind {
    /// Exact keyword lookup
    pub fn keyword(text: &str) -> Option<TokenKind> {
        KEYWORD_LOOKUP
            .get_or_init(|| KEYWORDS.iter().copied().collect())
            .get(text)
            .copied()
    }

    pub fn is_keyword(&self) -> bool {
        self.class() == TokenClass::Keyword
    }

    pub fn is_literal(&self) -> bool {
        self.class() == TokenClass::Literal
    }

    pub fn is_punctuation(&self) -> bool {
        self.class() == TokenClass::Punctuation
    }

    pub fn is_trivia(&self) -> bool {
        self.class() == TokenClass::Trivia
    }

    /// Content tokens are everything the parser sees
    pub fn is_content(&self) -> bool {
        !self.is_trivia()
    }

    /// Quoted string literals
    pub fn is_quoted(&self) -> bool {
        matches!(self, Self::DoubleQuotedString | Self::SingleQuotedString)
    }

    /// Keywords after which `digits:digits` is a community, not an IPv6 address
    pub fn disables_ipv6(&self) -> bool {
        matches!(
            self,
            Self::Community | Self::ExtcommunityRt | Self::ExtcommunitySoo
        )
    }

    /// Top-level commands that are absorbed without parsing
    pub fn is_ignored_command(&self) -> bool {
        matches!(
            self,
            Self::Delete
                | Self::CommentCommand
                | Self::Commit
                | Self::Save
                | Self::Exit
                | Self::Edit
                | Self::Load
                | Self::Run
                | Self::Show
        )
    }

    /// How the kind reads in an error message
    pub fn describe(&self) -> String {
        match self.class() {
            TokenClass::Keyword | TokenClass::Punctuation => format!("'{}'", self.as_str()),
            _ => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
