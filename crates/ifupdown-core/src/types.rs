//! Value types used by the interface record

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use base64::Engine;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use mac_address::MacAddress;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Address configuration method of an `iface` stanza
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressConfig {
    #[default]
    Unset,
    Loopback,
    Dhcp,
    Static,
    Manual,
}

impl AddressConfig {
    /// Keyword used in the `iface` line, empty when unset
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressConfig::Unset => "",
            AddressConfig::Loopback => "loopback",
            AddressConfig::Dhcp => "dhcp",
            AddressConfig::Static => "static",
            AddressConfig::Manual => "manual",
        }
    }

    pub fn is_unset(&self) -> bool {
        *self == AddressConfig::Unset
    }

    fn discriminant(&self) -> u8 {
        match self {
            AddressConfig::Unset => 0,
            AddressConfig::Loopback => 1,
            AddressConfig::Dhcp => 2,
            AddressConfig::Static => 3,
            AddressConfig::Manual => 4,
        }
    }
}

impl TryFrom<u8> for AddressConfig {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AddressConfig::Unset),
            1 => Ok(AddressConfig::Loopback),
            2 => Ok(AddressConfig::Dhcp),
            3 => Ok(AddressConfig::Static),
            4 => Ok(AddressConfig::Manual),
            other => Err(other),
        }
    }
}

impl FromStr for AddressConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loopback" => Ok(AddressConfig::Loopback),
            "dhcp" => Ok(AddressConfig::Dhcp),
            "static" => Ok(AddressConfig::Static),
            "manual" => Ok(AddressConfig::Manual),
            other => Err(format!("unknown address method: {}", other)),
        }
    }
}

impl fmt::Display for AddressConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AddressConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.discriminant())
    }
}

impl<'de> Deserialize<'de> for AddressConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        AddressConfig::try_from(raw)
            .map_err(|v| serde::de::Error::custom(format!("invalid address config: {}", v)))
    }
}

/// Address family of an `iface` stanza
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressVersion {
    #[default]
    Unset,
    V4,
    V6,
}

impl AddressVersion {
    /// Family keyword (`inet` / `inet6`), empty when unset
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressVersion::Unset => "",
            AddressVersion::V4 => "inet",
            AddressVersion::V6 => "inet6",
        }
    }

    pub fn is_unset(&self) -> bool {
        *self == AddressVersion::Unset
    }

    /// Whether `addr` belongs to this family; always false when unset
    pub fn matches(&self, addr: &IpAddr) -> bool {
        matches!(
            (self, addr),
            (AddressVersion::V4, IpAddr::V4(_)) | (AddressVersion::V6, IpAddr::V6(_))
        )
    }

    fn discriminant(&self) -> u8 {
        match self {
            AddressVersion::Unset => 0,
            AddressVersion::V4 => 1,
            AddressVersion::V6 => 2,
        }
    }
}

impl TryFrom<u8> for AddressVersion {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AddressVersion::Unset),
            1 => Ok(AddressVersion::V4),
            2 => Ok(AddressVersion::V6),
            other => Err(other),
        }
    }
}

impl fmt::Display for AddressVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AddressVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.discriminant())
    }
}

impl<'de> Deserialize<'de> for AddressVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        AddressVersion::try_from(raw)
            .map_err(|v| serde::de::Error::custom(format!("invalid address version: {}", v)))
    }
}

/// Network mask, held as the IP literal it renders to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Netmask(IpAddr);

impl Netmask {
    /// Mask with `prefix` leading ones out of `total_bits` (32 or 128)
    pub fn from_prefix(prefix: u8, total_bits: u8) -> Option<Self> {
        match total_bits {
            32 => Ipv4Net::new(Ipv4Addr::UNSPECIFIED, prefix)
                .ok()
                .map(|net| Netmask(IpAddr::V4(net.netmask()))),
            128 => Ipv6Net::new(Ipv6Addr::UNSPECIFIED, prefix)
                .ok()
                .map(|net| Netmask(IpAddr::V6(net.netmask()))),
            _ => None,
        }
    }

    /// Mask of a parsed CIDR prefix, sized to its address family
    pub fn from_net(net: &IpNet) -> Self {
        Netmask(net.netmask())
    }

    pub fn from_ipv4(mask: Ipv4Addr) -> Self {
        Netmask(IpAddr::V4(mask))
    }

    /// Mask from its raw 4 or 16 bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
            return Some(Netmask(IpAddr::from(octets)));
        }
        <[u8; 16]>::try_from(bytes)
            .ok()
            .map(|octets| Netmask(IpAddr::from(octets)))
    }

    pub fn addr(&self) -> IpAddr {
        self.0
    }

    pub fn is_ipv4(&self) -> bool {
        self.0.is_ipv4()
    }

    /// Prefix length, `None` for a non-contiguous mask
    pub fn prefix_len(&self) -> Option<u8> {
        ipnet::ip_mask_to_prefix(self.0).ok()
    }
}

impl fmt::Display for Netmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Netmask {
    type Err = std::net::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IpAddr>().map(Netmask)
    }
}

impl Serialize for Netmask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Netmask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Netmask>()
            .ok()
            .or_else(|| decode_base64(&raw).and_then(|bytes| Netmask::from_bytes(&bytes)))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid netmask: {}", raw)))
    }
}

/// Raw address bytes written as standard base64 by byte-slice encoders
fn decode_base64(raw: &str) -> Option<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(raw.as_bytes())
        .ok()
}

/// 48-bit hardware address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddr(pub MacAddress);

impl MacAddr {
    pub fn bytes(&self) -> [u8; 6] {
        self.0.bytes()
    }
}

struct MacAddrVisitor;

impl<'de> serde::de::Visitor<'de> for MacAddrVisitor {
    type Value = MacAddr;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a MAC address string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse::<MacAddr>()
            .ok()
            .or_else(|| {
                let bytes = decode_base64(v)?;
                let octets = <[u8; 6]>::try_from(bytes.as_slice()).ok()?;
                Some(MacAddr(MacAddress::new(octets)))
            })
            .ok_or_else(|| E::custom(format!("invalid MAC address: {}", v)))
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(MacAddrVisitor)
    }
}

impl Serialize for MacAddr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl FromStr for MacAddr {
    type Err = mac_address::MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<MacAddress>().map(MacAddr)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bytes();
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Hook stage a command is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    PreUp,
    PostUp,
    PreDown,
    PostDown,
}

impl HookPhase {
    /// Phases in the order they are written out
    pub const ALL: [HookPhase; 4] = [
        HookPhase::PreUp,
        HookPhase::PostUp,
        HookPhase::PreDown,
        HookPhase::PostDown,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            HookPhase::PreUp => "pre-up",
            HookPhase::PostUp => "post-up",
            HookPhase::PreDown => "pre-down",
            HookPhase::PostDown => "post-down",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        HookPhase::ALL
            .into_iter()
            .find(|phase| phase.keyword() == keyword)
    }
}

/// Commands run around interface state changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hooks {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pre_up: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_up: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pre_down: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_down: Vec<String>,
}

impl Hooks {
    pub fn is_empty(&self) -> bool {
        HookPhase::ALL.iter().all(|phase| self.get(*phase).is_empty())
    }

    pub fn get(&self, phase: HookPhase) -> &[String] {
        match phase {
            HookPhase::PreUp => &self.pre_up,
            HookPhase::PostUp => &self.post_up,
            HookPhase::PreDown => &self.pre_down,
            HookPhase::PostDown => &self.post_down,
        }
    }

    pub fn push(&mut self, phase: HookPhase, command: impl Into<String>) {
        let list = match phase {
            HookPhase::PreUp => &mut self.pre_up,
            HookPhase::PostUp => &mut self.post_up,
            HookPhase::PreDown => &mut self.pre_down,
            HookPhase::PostDown => &mut self.post_down,
        };
        list.push(command.into());
    }
}
