//! Record validation against its address configuration method

use crate::error::ValidationError;
use crate::interface::NetworkInterface;
use crate::types::{AddressConfig, AddressVersion};

impl NetworkInterface {
    /// Validate the record
    ///
    /// Recomputed on every call and never mutates the record, so repeated
    /// calls return the same result. On failure all problems are reported
    /// at once, wrapped in [`ValidationError::InterfaceHasErrors`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            return Ok(());
        }
        Err(ValidationError::InterfaceHasErrors {
            name: self.name.clone(),
            errors,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Every specific problem with the record, empty when valid
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        if !self.is_allocated() {
            return vec![ValidationError::UnallocatedInterface];
        }

        let mut errors: Vec<ValidationError> = self.issues().cloned().collect();

        match self.config {
            AddressConfig::Unset => errors.push(ValidationError::ConfigNotSet),
            AddressConfig::Dhcp => {
                if self.address.is_some() {
                    errors.push(ValidationError::AddressSetWhenDhcp);
                }
            }
            AddressConfig::Static => match self.address {
                None => errors.push(ValidationError::AddressNotSetStatic),
                Some(_) if self.netmask.is_none() && self.version == AddressVersion::V4 => {
                    errors.push(ValidationError::MaskNotSetStatic)
                }
                Some(addr) if addr.is_unspecified() => {
                    errors.push(ValidationError::InvalidAddress(addr.to_string()))
                }
                Some(_) => {}
            },
            AddressConfig::Loopback => {
                if let Some(addr) = self.address {
                    if !addr.to_canonical().is_loopback() {
                        errors.push(ValidationError::AdressNotLoopback(addr));
                    }
                }
            }
            AddressConfig::Manual => {}
        }

        match self.version {
            AddressVersion::V4 | AddressVersion::V6 => self.check_families(&mut errors),
            AddressVersion::Unset => errors.push(ValidationError::InvalidAddressVersion {
                name: self.name.clone(),
                version: self.version,
            }),
        }

        errors
    }

    /// Addresses must belong to the declared family, masks to their address
    fn check_families(&self, errors: &mut Vec<ValidationError>) {
        let version = self.version;

        if let Some(addr) = self.address {
            if !version.matches(&addr) {
                errors.push(ValidationError::InvalidAddress(format!(
                    "{} is not an {} address",
                    addr, version
                )));
            }
        }

        if let Some(mask) = self.netmask {
            match self.address {
                Some(addr) if addr.is_ipv4() != mask.is_ipv4() => {
                    errors.push(ValidationError::InvalidMask(format!(
                        "{} does not fit address {}",
                        mask, addr
                    )));
                }
                _ if mask.prefix_len().is_none() => {
                    errors.push(ValidationError::InvalidMask(format!(
                        "{} is not contiguous",
                        mask
                    )));
                }
                _ => {}
            }
        }

        if let Some(gateway) = self.gateway {
            if !version.matches(&gateway) {
                errors.push(ValidationError::InvalidGateway(gateway.to_string()));
            }
        }

        if let Some(broadcast) = self.broadcast {
            if !version.matches(&broadcast) {
                errors.push(ValidationError::InvalidBroadcast(broadcast.to_string()));
            }
        }
    }
}
