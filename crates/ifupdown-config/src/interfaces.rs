//! Parser for a single /etc/network/interfaces stanza

use std::net::{IpAddr, Ipv4Addr};

use ipnet::IpNet;

use ifupdown_core::{
    AddressConfig, AddressVersion, ConfigError, HookPhase, MacAddr, Netmask, NetworkInterface,
};

/// Parser for the text of exactly one interface
#[derive(Debug, Clone, Default)]
pub struct InterfaceParser;

impl InterfaceParser {
    /// Create new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse one stanza into a fresh record
    pub fn parse(&self, input: &[u8]) -> Result<NetworkInterface, ConfigError> {
        let mut iface = NetworkInterface::default();
        self.parse_into(&mut iface, input)?;
        Ok(iface)
    }

    /// Parse one stanza into an existing record
    ///
    /// Returns the number of bytes consumed, which is the whole input.
    /// Structural problems fail the parse; unparsable DNS servers are
    /// recorded on the record and surface from validation instead. The
    /// record is not validated here.
    pub fn parse_into(
        &self,
        iface: &mut NetworkInterface,
        input: &[u8],
    ) -> Result<usize, ConfigError> {
        let content = String::from_utf8_lossy(input);

        let count = count_iface_stanzas(&content);
        if count > 1 {
            return Err(ConfigError::MultipleInterfaces { count });
        }

        iface.allocate();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.apply_line(iface, line, index + 1)?;
        }

        Ok(input.len())
    }

    /// Apply one trimmed, non-comment line to the record
    fn apply_line(
        &self,
        iface: &mut NetworkInterface,
        line: &str,
        line_number: usize,
    ) -> Result<(), ConfigError> {
        let mut parts = line.splitn(2, char::is_whitespace);
        let keyword = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("").trim();

        match keyword {
            "auto" => iface.auto = true,
            "allow-hotplug" => iface.hotplug = true,
            "iface" => self.apply_iface(iface, line, line_number)?,
            "address" => {
                let value = first_field(value)
                    .ok_or_else(|| ConfigError::invalid_data(line_number, line))?;
                if value.contains('/') {
                    let net = value
                        .parse::<IpNet>()
                        .map_err(|_| ConfigError::invalid_data(line_number, line))?;
                    iface.address = Some(net.addr());
                    iface.netmask = Some(Netmask::from_net(&net));
                } else {
                    iface.address = Some(parse_ip(value, line, line_number)?);
                }
            }
            "netmask" => {
                if iface.netmask.is_some() {
                    return Ok(());
                }
                if iface.version != AddressVersion::V4 {
                    log::warn!(
                        "ignoring netmask for non-inet interface '{}' at line {}",
                        iface.name,
                        line_number
                    );
                    return Ok(());
                }
                let mask = first_field(value)
                    .and_then(parse_ipv4_netmask)
                    .ok_or_else(|| ConfigError::invalid_data(line_number, line))?;
                iface.netmask = Some(mask);
            }
            "broadcast" => {
                let value = first_field(value)
                    .ok_or_else(|| ConfigError::invalid_data(line_number, line))?;
                iface.broadcast = Some(parse_ip(value, line, line_number)?);
            }
            "gateway" => {
                let value = first_field(value)
                    .ok_or_else(|| ConfigError::invalid_data(line_number, line))?;
                iface.gateway = Some(parse_ip(value, line, line_number)?);
            }
            "dns-nameservers" => iface.add_dns_servers(value.split_whitespace()),
            "dns-search" => iface
                .dns_search
                .extend(value.split_whitespace().map(str::to_string)),
            "hwaddress" => {
                // `hwaddress [ether] <mac>`
                let mut fields = value.split_whitespace();
                let mac = match fields.next() {
                    Some("ether") => fields.next(),
                    other => other,
                };
                let mac = mac
                    .and_then(|mac| mac.parse::<MacAddr>().ok())
                    .ok_or_else(|| ConfigError::invalid_data(line_number, line))?;
                iface.mac_address = Some(mac);
            }
            other => match HookPhase::from_keyword(other) {
                Some(phase) => {
                    if !value.is_empty() {
                        iface.hooks.push(phase, value);
                    }
                }
                None => log::debug!(
                    "ignoring unsupported directive '{}' at line {}",
                    other,
                    line_number
                ),
            },
        }

        Ok(())
    }

    /// Apply an `iface <name> <family> <method>` line
    fn apply_iface(
        &self,
        iface: &mut NetworkInterface,
        line: &str,
        line_number: usize,
    ) -> Result<(), ConfigError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 || parts[0] != "iface" {
            return Err(ConfigError::invalid_data(
                line_number,
                format!("invalid iface line format: {}", line),
            ));
        }

        iface.name = parts[1].to_string();
        match parts[2] {
            "inet" => iface.version = AddressVersion::V4,
            "inet6" => iface.version = AddressVersion::V6,
            family => log::debug!(
                "unsupported address family '{}' for interface '{}'",
                family,
                iface.name
            ),
        }
        iface.config = parts[3]
            .parse::<AddressConfig>()
            .map_err(|message| ConfigError::invalid_data(line_number, message))?;

        Ok(())
    }
}

/// Number of `iface` directives in `content`
pub fn count_iface_stanzas(content: &str) -> usize {
    content
        .lines()
        .filter(|line| line.split_whitespace().next() == Some("iface"))
        .count()
}

/// Parse the text of one interface into a new record
pub fn parse_interface(content: &str) -> Result<NetworkInterface, ConfigError> {
    InterfaceParser::new().parse(content.as_bytes())
}

fn first_field(value: &str) -> Option<&str> {
    value.split_whitespace().next()
}

fn parse_ip(value: &str, line: &str, line_number: usize) -> Result<IpAddr, ConfigError> {
    value
        .parse::<IpAddr>()
        .map_err(|_| ConfigError::invalid_data(line_number, line))
}

/// Dotted quad (low four bytes of any IP literal) or a prefix length
fn parse_ipv4_netmask(value: &str) -> Option<Netmask> {
    if let Ok(prefix) = value.parse::<u8>() {
        return Netmask::from_prefix(prefix, 32);
    }
    match value.parse::<IpAddr>().ok()? {
        IpAddr::V4(mask) => Some(Netmask::from_ipv4(mask)),
        IpAddr::V6(mask) => {
            let o = mask.octets();
            Some(Netmask::from_ipv4(Ipv4Addr::new(o[12], o[13], o[14], o[15])))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifupdown_core::ValidationError;
    use std::net::Ipv6Addr;

    #[test]
    fn test_parse_simple_loopback() {
        let content = r#"
auto lo
iface lo inet loopback
"#;
        let iface = parse_interface(content).unwrap();

        assert_eq!(iface.name, "lo");
        assert!(iface.auto);
        assert!(!iface.hotplug);
        assert_eq!(iface.config, AddressConfig::Loopback);
        assert_eq!(iface.version, AddressVersion::V4);
        assert!(iface.validate().is_ok());
    }

    #[test]
    fn test_parse_static_interface() {
        let content = r#"
auto eth0
iface eth0 inet static
    address 192.168.1.10/24
    gateway 192.168.1.1
"#;
        let iface = parse_interface(content).unwrap();

        assert_eq!(iface.config, AddressConfig::Static);
        assert_eq!(
            iface.address,
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10)))
        );
        assert_eq!(iface.netmask.unwrap().to_string(), "255.255.255.0");
        assert_eq!(
            iface.gateway,
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)))
        );
        assert!(iface.validate().is_ok());
    }

    #[test]
    fn test_parse_static_interface_with_netmask() {
        let content = r#"
iface eth0 inet static
    address 192.168.1.10
    netmask 255.255.255.0
    gateway 192.168.1.1
"#;
        let iface = parse_interface(content).unwrap();
        assert_eq!(iface.netmask.unwrap().prefix_len(), Some(24));
        assert!(!iface.auto);
    }

    #[test]
    fn test_netmask_prefix_length() {
        let content = "iface eth0 inet static\n\taddress 10.1.0.1\n\tnetmask 16\n";
        let iface = parse_interface(content).unwrap();
        assert_eq!(iface.netmask.unwrap().to_string(), "255.255.0.0");
    }

    #[test]
    fn test_cidr_wins_over_netmask() {
        let content = "iface eth0 inet static\n\taddress 10.1.0.1/8\n\tnetmask 255.255.255.0\n";
        let iface = parse_interface(content).unwrap();
        assert_eq!(iface.netmask.unwrap().to_string(), "255.0.0.0");
    }

    #[test]
    fn test_netmask_ignored_for_ipv6() {
        let content = r#"
iface eth0 inet6 static
    address 2001:db8::1
    netmask ffff:ffff:ffff:ffff::
"#;
        let iface = parse_interface(content).unwrap();
        assert!(iface.netmask.is_none());
        assert_eq!(
            iface.address,
            Some(IpAddr::V6("2001:db8::1".parse::<Ipv6Addr>().unwrap()))
        );
    }

    #[test]
    fn test_parse_ipv6_cidr() {
        let content = r#"
iface eth0 inet6 static
    address 2001:db8::1/64
    gateway 2001:db8::ff
"#;
        let iface = parse_interface(content).unwrap();
        assert_eq!(iface.version, AddressVersion::V6);
        assert_eq!(iface.netmask.unwrap().prefix_len(), Some(64));
        assert!(!iface.netmask.unwrap().is_ipv4());
    }

    #[test]
    fn test_parse_dhcp_hotplug() {
        let content = r#"
allow-hotplug eth0
iface eth0 inet dhcp
"#;
        let iface = parse_interface(content).unwrap();
        assert!(iface.hotplug);
        assert!(!iface.auto);
        assert_eq!(iface.config, AddressConfig::Dhcp);
    }

    #[test]
    fn test_parse_with_comments() {
        let content = r#"
# Main network interface
auto eth0
iface eth0 inet static
    address 192.168.1.10/24
    # This is the gateway
    gateway 192.168.1.1
"#;
        let iface = parse_interface(content).unwrap();
        assert!(iface.gateway.is_some());
    }

    #[test]
    fn test_parse_dns_and_hooks() {
        let content = r#"
iface eth0 inet dhcp
    dns-nameservers 1.1.1.1 2606:4700:4700::1111
    dns-search example.com corp.example.com
    pre-up /sbin/ethtool -s eth0 wol g
    post-up ip route add 10.9.0.0/16 via 10.0.0.1
    pre-down
    post-down logger "eth0  down"
"#;
        let iface = parse_interface(content).unwrap();
        assert_eq!(iface.dns_servers.len(), 2);
        assert_eq!(iface.dns_search, vec!["example.com", "corp.example.com"]);
        assert_eq!(iface.hooks.pre_up, vec!["/sbin/ethtool -s eth0 wol g"]);
        assert_eq!(
            iface.hooks.post_up,
            vec!["ip route add 10.9.0.0/16 via 10.0.0.1"]
        );
        assert!(iface.hooks.pre_down.is_empty());
        assert_eq!(iface.hooks.post_down, vec![r#"logger "eth0  down""#]);
    }

    #[test]
    fn test_unparsable_dns_server_is_recorded() {
        let content = "iface eth0 inet dhcp\n\tdns-nameservers 8.8.8.8 resolver.local\n";
        let iface = parse_interface(content).unwrap();
        assert_eq!(iface.dns_servers, vec![IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))]);

        let err = iface.validate().unwrap_err();
        assert!(err.any(|e| *e == ValidationError::InvalidDnsServer("resolver.local".into())));
    }

    #[test]
    fn test_parse_hwaddress() {
        let content = "iface eth0 inet manual\n\thwaddress ether 02:00:00:AA:bb:01\n";
        let iface = parse_interface(content).unwrap();
        assert_eq!(
            iface.mac_address.unwrap().to_string(),
            "02:00:00:aa:bb:01"
        );

        let without_class = "iface eth0 inet manual\n\thwaddress 02:00:00:aa:bb:01\n";
        let iface = parse_interface(without_class).unwrap();
        assert_eq!(
            iface.mac_address.unwrap().to_string(),
            "02:00:00:aa:bb:01"
        );

        let bad_mac = "iface eth0 inet manual\n\thwaddress ether 02:00\n";
        assert!(matches!(
            parse_interface(bad_mac),
            Err(ConfigError::InvalidIfaceData { line: 2, .. })
        ));
        assert!(parse_interface("iface eth0 inet manual\n\thwaddress ether\n").is_err());
        assert!(parse_interface("iface eth0 inet manual\n\thwaddress infiniband 02:00\n").is_err());
    }

    #[test]
    fn test_parse_broadcast() {
        let content = "iface eth0 inet static\n\taddress 10.0.0.2/24\n\tbroadcast 10.0.0.255\n";
        let iface = parse_interface(content).unwrap();
        assert_eq!(
            iface.broadcast,
            Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 255)))
        );
    }

    #[test]
    fn test_error_handling_invalid_ip() {
        let content = r#"
iface eth0 inet static
    address invalid.ip.address
"#;
        assert!(matches!(
            parse_interface(content),
            Err(ConfigError::InvalidIfaceData { line: 3, .. })
        ));

        assert!(parse_interface("iface eth0 inet static\n\taddress\n").is_err());
        assert!(parse_interface("iface eth0 inet static\n\taddress 10.0.0.1/99\n").is_err());
        assert!(parse_interface("iface eth0 inet static\n\tgateway nope\n").is_err());
        assert!(parse_interface("iface eth0 inet static\n\tnetmask nope\n").is_err());
    }

    #[test]
    fn test_error_handling_iface_line() {
        assert!(matches!(
            parse_interface("iface eth0 inet bogus\n"),
            Err(ConfigError::InvalidIfaceData { line: 1, .. })
        ));
        assert!(parse_interface("iface eth0 inet\n").is_err());
    }

    #[test]
    fn test_unknown_family_leaves_version_unset() {
        let iface = parse_interface("iface can0 can static\n").unwrap();
        assert_eq!(iface.version, AddressVersion::Unset);
        assert_eq!(iface.config, AddressConfig::Static);
    }

    #[test]
    fn test_multiple_interfaces_rejected() {
        let content = r#"
iface eth0 inet dhcp
iface eth1 inet dhcp
"#;
        assert_eq!(
            parse_interface(content).unwrap_err(),
            ConfigError::MultipleInterfaces { count: 2 }
        );
    }

    #[test]
    fn test_iface_word_in_hook_is_not_a_stanza() {
        let content = "iface eth0 inet dhcp\n\tpost-up echo iface up\n";
        assert!(parse_interface(content).is_ok());
        assert_eq!(count_iface_stanzas(content), 1);
    }

    #[test]
    fn test_unknown_directives_are_ignored() {
        let content = "iface eth0 inet manual\n\tmtu 9000\n\tbridge-ports none\n";
        let iface = parse_interface(content).unwrap();
        assert_eq!(iface.config, AddressConfig::Manual);
    }

    #[test]
    fn test_parse_into_returns_consumed_bytes() {
        let content = b"auto eth0\niface eth0 inet dhcp\n";
        let mut iface = NetworkInterface::default();
        let n = InterfaceParser::new()
            .parse_into(&mut iface, content)
            .unwrap();
        assert_eq!(n, content.len());
        assert!(iface.is_allocated());
    }

    #[test]
    fn test_roundtrip_parsing() {
        let cases = [
            NetworkInterface::new("eth0")
                .with_static()
                .with_address_version(AddressVersion::V4)
                .with_address("10.0.0.5")
                .with_netmask(8, 32)
                .with_gateway("10.0.0.1"),
            NetworkInterface::new("eth0")
                .with_static()
                .with_address_version(AddressVersion::V6)
                .with_address("2001:db8::1")
                .with_netmask(64, 128)
                .with_gateway("2001:db8::2"),
            NetworkInterface::new("eth0")
                .with_dhcp()
                .with_address_version(AddressVersion::V6),
            NetworkInterface::new("lo")
                .with_loopback()
                .with_address_version(AddressVersion::V4),
            NetworkInterface::new("eth0")
                .with_address_version(AddressVersion::V4)
                .with_static()
                .with_address("1.1.1.1")
                .with_netmask(32, 32),
        ];

        for built in cases {
            let text = built.render().unwrap();
            let parsed = parse_interface(&text).unwrap();

            assert_eq!(parsed.address, built.address, "{}", text);
            assert_eq!(parsed.version, built.version);
            assert_eq!(parsed.config, built.config);
            assert_eq!(parsed.gateway, built.gateway);
            if built.version == AddressVersion::V4 {
                assert_eq!(parsed.netmask, built.netmask);
            }
            assert!(parsed.validate().is_ok());
        }
    }
}
