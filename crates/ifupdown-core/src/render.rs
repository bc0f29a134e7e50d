//! Canonical interfaces(5) text for a single record

use std::fmt::{self, Write as _};
use std::io;

use crate::error::ValidationError;
use crate::interface::NetworkInterface;
use crate::types::{AddressConfig, HookPhase};
use crate::Result;

impl NetworkInterface {
    /// Render the record as an interfaces stanza
    ///
    /// The record is validated first; an invalid record is not rendered.
    pub fn render(&self) -> std::result::Result<String, ValidationError> {
        self.validate()?;
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_stanza(&mut output);
        Ok(output)
    }

    /// Write the rendered stanza to `out`, returning the number of bytes written
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> Result<usize> {
        let text = self.render()?;
        out.write_all(text.as_bytes())?;
        Ok(text.len())
    }

    fn write_stanza(&self, output: &mut String) -> fmt::Result {
        if self.auto {
            writeln!(output, "auto {}", self.name)?;
        }
        if self.hotplug {
            writeln!(output, "allow-hotplug {}", self.name)?;
        }

        writeln!(
            output,
            "iface {} {} {}",
            self.name, self.version, self.config
        )?;

        let addressed = matches!(self.config, AddressConfig::Static | AddressConfig::Manual);
        if let (true, Some(address), Some(netmask)) = (addressed, self.address, self.netmask) {
            if !address.is_unspecified() {
                writeln!(output, "\taddress {}", address)?;
                writeln!(output, "\tnetmask {}", netmask)?;
                if let Some(broadcast) = self.broadcast {
                    writeln!(output, "\tbroadcast {}", broadcast)?;
                }
                if let Some(gateway) = self.gateway {
                    writeln!(output, "\tgateway {}", gateway)?;
                }
            }
        }

        if !self.dns_servers.is_empty() {
            let servers: Vec<String> = self.dns_servers.iter().map(ToString::to_string).collect();
            writeln!(output, "\tdns-nameservers {}", servers.join(" "))?;
        }

        if !self.dns_search.is_empty() {
            writeln!(output, "\tdns-search {}", self.dns_search.join(" "))?;
        }

        if let Some(mac) = &self.mac_address {
            writeln!(output, "\thwaddress ether {}", mac)?;
        }

        for phase in HookPhase::ALL {
            for command in self.hooks.get(phase) {
                writeln!(output, "\t{} {}", phase.keyword(), command)?;
            }
        }

        Ok(())
    }
}

/// Renders the stanza, or nothing at all when the record does not validate
impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AddressVersion;

    #[test]
    fn test_render_static_ipv4() {
        let iface = NetworkInterface::new("eth0")
            .with_static()
            .with_address_version(AddressVersion::V4)
            .with_address("10.0.0.5")
            .with_netmask(8, 32)
            .with_gateway("10.0.0.1");

        assert_eq!(
            iface.to_string(),
            "auto eth0\niface eth0 inet static\n\taddress 10.0.0.5\n\tnetmask 255.0.0.0\n\tgateway 10.0.0.1\n"
        );
    }

    #[test]
    fn test_render_static_ipv6() {
        let iface = NetworkInterface::new("eth0")
            .with_static()
            .with_address_version(AddressVersion::V6)
            .with_address("2001:db8::1")
            .with_netmask(64, 128)
            .with_gateway("2001:db8::2");

        assert_eq!(
            iface.to_string(),
            "auto eth0\niface eth0 inet6 static\n\taddress 2001:db8::1\n\tnetmask ffff:ffff:ffff:ffff::\n\tgateway 2001:db8::2\n"
        );
    }

    #[test]
    fn test_render_static_ipv6_variants() {
        let iface = NetworkInterface::new("eth0")
            .with_static()
            .with_address_version(AddressVersion::V6)
            .with_address("2001:db8::2")
            .with_netmask(48, 128)
            .with_gateway("2001:db8::1");
        assert!(iface.to_string().contains("\tnetmask ffff:ffff:ffff::\n"));

        let iface = NetworkInterface::new("eth0")
            .with_static()
            .with_address_version(AddressVersion::V6)
            .with_address("fc00:bbbb:bbbb:bb01::31:1927")
            .with_netmask(128, 128)
            .with_gateway("fc00:bbbb:bbbb:bb01::1");
        let text = iface.to_string();
        assert!(text.contains("\taddress fc00:bbbb:bbbb:bb01::31:1927\n"));
        assert!(text.contains("\tnetmask ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff\n"));
    }

    #[test]
    fn test_render_methods_without_address() {
        let cases = [
            (
                NetworkInterface::new("eth0")
                    .with_dhcp()
                    .with_address_version(AddressVersion::V4),
                "auto eth0\niface eth0 inet dhcp\n",
            ),
            (
                NetworkInterface::new("eth0")
                    .with_dhcp()
                    .with_address_version(AddressVersion::V6),
                "auto eth0\niface eth0 inet6 dhcp\n",
            ),
            (
                NetworkInterface::new("eth0")
                    .with_manual()
                    .with_address_version(AddressVersion::V4),
                "auto eth0\niface eth0 inet manual\n",
            ),
            (
                NetworkInterface::new("lo")
                    .with_loopback()
                    .with_address_version(AddressVersion::V4),
                "auto lo\niface lo inet loopback\n",
            ),
            (
                NetworkInterface::new("lo")
                    .with_address_config(AddressConfig::Loopback)
                    .with_address_version(AddressVersion::V6),
                "auto lo\niface lo inet6 loopback\n",
            ),
        ];

        for (iface, want) in cases {
            assert_eq!(iface.render().unwrap(), want, "rendering {}", iface.name);
        }
    }

    #[test]
    fn test_render_full_stanza_order() {
        let mut iface = NetworkInterface::new("eth1")
            .with_manual()
            .with_address_version(AddressVersion::V4)
            .with_address("192.168.10.2/24")
            .with_broadcast("192.168.10.255")
            .with_gateway("192.168.10.1")
            .with_dns(["192.168.10.1", "9.9.9.9"])
            .with_dns_search(["example.org", "lan"])
            .with_mac_address("52:54:00:AB:CD:EF")
            .with_hook(HookPhase::PostDown, "logger down")
            .with_hook(HookPhase::PreUp, "ip link set eth1 mtu 9000")
            .with_hook(HookPhase::PostUp, "logger up")
            .with_hook(HookPhase::PreDown, "logger going");
        iface.hotplug = true;

        let want = "auto eth1\n\
allow-hotplug eth1\n\
iface eth1 inet manual\n\
\taddress 192.168.10.2\n\
\tnetmask 255.255.255.0\n\
\tbroadcast 192.168.10.255\n\
\tgateway 192.168.10.1\n\
\tdns-nameservers 192.168.10.1 9.9.9.9\n\
\tdns-search example.org lan\n\
\thwaddress ether 52:54:00:ab:cd:ef\n\
\tpre-up ip link set eth1 mtu 9000\n\
\tpost-up logger up\n\
\tpre-down logger going\n\
\tpost-down logger down\n";
        assert_eq!(iface.render().unwrap(), want);
    }

    #[test]
    fn test_address_block_needs_mask() {
        let iface = NetworkInterface::new("eth0")
            .with_static()
            .with_address_version(AddressVersion::V6)
            .with_address("2001:db8::7")
            .with_gateway("2001:db8::1");
        assert_eq!(iface.render().unwrap(), "auto eth0\niface eth0 inet6 static\n");
    }

    #[test]
    fn test_invalid_record_renders_nothing() {
        let iface = NetworkInterface::new("eth0").with_address("yeeterson");
        assert_eq!(iface.to_string(), "");
        assert!(iface.render().is_err());

        assert_eq!(NetworkInterface::default().to_string(), "");
    }

    #[test]
    fn test_write_to() {
        let iface = NetworkInterface::new("eth0")
            .with_dhcp()
            .with_address_version(AddressVersion::V4);
        let mut buf = Vec::new();
        let n = iface.write_to(&mut buf).unwrap();
        assert_eq!(n, buf.len());
        assert_eq!(buf, b"auto eth0\niface eth0 inet dhcp\n");

        let invalid = NetworkInterface::default();
        assert!(invalid.write_to(&mut Vec::new()).is_err());
    }
}
