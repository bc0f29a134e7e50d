//! Interface record and its builder operations

use std::net::IpAddr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{AddressConfig, AddressVersion, HookPhase, Hooks, MacAddr, Netmask};

/// Field a recorded diagnostic belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Address,
    Netmask,
    Broadcast,
    Gateway,
    DnsServers,
    MacAddress,
}

/// Diagnostic recorded by a builder or parser, surfaced by validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Issue {
    pub(crate) field: Field,
    pub(crate) error: ValidationError,
}

/// One interface stanza of an ifupdown interfaces file
///
/// Records are plain values. Builder operations (`with_*`) and the `set_*`
/// mutators mark the record as allocated; a record that was never touched
/// through them, nor decoded from JSON, fails validation with
/// [`ValidationError::UnallocatedInterface`]. Malformed input handed to a
/// builder is not rejected on the spot: it is recorded against the field and
/// reported by [`validate`](NetworkInterface::validate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkInterface {
    /// Name of the interface
    pub name: String,
    /// Brought up on hotplug events
    #[serde(skip_serializing_if = "is_false")]
    pub hotplug: bool,
    /// Brought up automatically at boot
    #[serde(skip_serializing_if = "is_false")]
    pub auto: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<Netmask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
    #[serde(skip_serializing_if = "AddressConfig::is_unset")]
    pub config: AddressConfig,
    #[serde(skip_serializing_if = "AddressVersion::is_unset")]
    pub version: AddressVersion,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns_servers: Vec<IpAddr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns_search: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<MacAddr>,
    #[serde(skip_serializing_if = "Hooks::is_empty")]
    pub hooks: Hooks,

    #[serde(skip, default = "decoded")]
    allocated: bool,
    #[serde(skip)]
    pub(crate) issues: Vec<Issue>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

// Records coming out of a decoder count as initialised.
fn decoded() -> bool {
    true
}

impl NetworkInterface {
    /// Create a new, not yet allocated, interface brought up at boot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto: true,
            ..Default::default()
        }
    }

    /// Mark the record as initialised
    pub fn allocate(&mut self) {
        self.allocated = true;
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Diagnostics recorded by builders and parsers, in recording order
    pub fn issues(&self) -> impl Iterator<Item = &ValidationError> {
        self.issues.iter().map(|issue| &issue.error)
    }

    fn set_issue(&mut self, field: Field, error: ValidationError) {
        log::debug!("interface '{}': {}", self.name, error);
        self.clear_issue(field);
        self.issues.push(Issue { field, error });
    }

    fn clear_issue(&mut self, field: Field) {
        self.issues.retain(|issue| issue.field != field);
    }

    /// Set the address from a plain IP literal or a CIDR prefix
    ///
    /// A CIDR prefix also sets the netmask, sized to the address family.
    pub fn set_address(&mut self, address: &str) {
        self.allocate();
        if let Ok(net) = address.parse::<IpNet>() {
            self.address = Some(net.addr());
            self.netmask = Some(Netmask::from_net(&net));
            self.clear_issue(Field::Address);
            self.clear_issue(Field::Netmask);
            return;
        }
        match address.parse::<IpAddr>() {
            Ok(addr) => {
                self.address = Some(addr);
                self.clear_issue(Field::Address);
            }
            Err(_) => {
                self.address = None;
                self.set_issue(
                    Field::Address,
                    ValidationError::InvalidAddress(address.to_string()),
                );
            }
        }
    }

    /// Set the netmask to `prefix` leading ones out of `total_bits`
    ///
    /// Has no effect while no address is set.
    pub fn set_netmask(&mut self, prefix: u8, total_bits: u8) {
        self.allocate();
        if self.address.is_none() {
            return;
        }
        match Netmask::from_prefix(prefix, total_bits) {
            Some(mask) => {
                self.netmask = Some(mask);
                self.clear_issue(Field::Netmask);
            }
            None => self.set_issue(
                Field::Netmask,
                ValidationError::InvalidMask(format!("{}/{}", prefix, total_bits)),
            ),
        }
    }

    pub fn set_broadcast(&mut self, broadcast: &str) {
        self.allocate();
        match broadcast.parse::<IpAddr>() {
            Ok(addr) => {
                self.broadcast = Some(addr);
                self.clear_issue(Field::Broadcast);
            }
            Err(_) => {
                self.broadcast = None;
                self.set_issue(
                    Field::Broadcast,
                    ValidationError::InvalidBroadcast(broadcast.to_string()),
                );
            }
        }
    }

    pub fn set_gateway(&mut self, gateway: &str) {
        self.allocate();
        match gateway.parse::<IpAddr>() {
            Ok(addr) => {
                self.gateway = Some(addr);
                self.clear_issue(Field::Gateway);
            }
            Err(_) => {
                self.gateway = None;
                self.set_issue(
                    Field::Gateway,
                    ValidationError::InvalidGateway(gateway.to_string()),
                );
            }
        }
    }

    pub fn set_config(&mut self, config: AddressConfig) {
        self.allocate();
        self.config = config;
    }

    pub fn set_version(&mut self, version: AddressVersion) {
        self.allocate();
        self.version = version;
    }

    /// Append DNS servers, recording one diagnostic per unparsable entry
    pub fn add_dns_servers<I, S>(&mut self, servers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allocate();
        for server in servers {
            let server = server.as_ref();
            match server.parse::<IpAddr>() {
                Ok(addr) => self.dns_servers.push(addr),
                Err(_) => {
                    log::debug!("interface '{}': dropping dns server {}", self.name, server);
                    self.issues.push(Issue {
                        field: Field::DnsServers,
                        error: ValidationError::InvalidDnsServer(server.to_string()),
                    });
                }
            }
        }
    }

    pub fn set_dns_search(&mut self, domains: Vec<String>) {
        self.allocate();
        self.dns_search = domains;
    }

    pub fn set_mac_address(&mut self, mac: &str) {
        self.allocate();
        match mac.parse::<MacAddr>() {
            Ok(mac) => {
                self.mac_address = Some(mac);
                self.clear_issue(Field::MacAddress);
            }
            Err(_) => {
                self.mac_address = None;
                self.set_issue(
                    Field::MacAddress,
                    ValidationError::InvalidMacAddress(mac.to_string()),
                );
            }
        }
    }

    pub fn add_hook(&mut self, phase: HookPhase, command: impl Into<String>) {
        self.allocate();
        self.hooks.push(phase, command);
    }

    /// Set address, see [`set_address`](Self::set_address)
    pub fn with_address(mut self, address: &str) -> Self {
        self.set_address(address);
        self
    }

    /// Set netmask, see [`set_netmask`](Self::set_netmask)
    pub fn with_netmask(mut self, prefix: u8, total_bits: u8) -> Self {
        self.set_netmask(prefix, total_bits);
        self
    }

    pub fn with_broadcast(mut self, broadcast: &str) -> Self {
        self.set_broadcast(broadcast);
        self
    }

    pub fn with_gateway(mut self, gateway: &str) -> Self {
        self.set_gateway(gateway);
        self
    }

    pub fn with_loopback(self) -> Self {
        self.with_address_config(AddressConfig::Loopback)
    }

    pub fn with_dhcp(self) -> Self {
        self.with_address_config(AddressConfig::Dhcp)
    }

    pub fn with_static(self) -> Self {
        self.with_address_config(AddressConfig::Static)
    }

    pub fn with_manual(self) -> Self {
        self.with_address_config(AddressConfig::Manual)
    }

    pub fn with_address_config(mut self, config: AddressConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn with_address_version(mut self, version: AddressVersion) -> Self {
        self.set_version(version);
        self
    }

    pub fn with_dns<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_dns_servers(servers);
        self
    }

    pub fn with_dns_search<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_dns_search(domains.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mac_address(mut self, mac: &str) -> Self {
        self.set_mac_address(mac);
        self
    }

    pub fn with_hook(mut self, phase: HookPhase, command: impl Into<String>) -> Self {
        self.add_hook(phase, command);
        self
    }
}
