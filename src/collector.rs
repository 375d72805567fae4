//! OS-facing host identity collection
//!
//! [`HostInfoSource`] is the seam between the cache and the operating system:
//! production code uses [`SystemSource`], tests substitute instrumented
//! implementations.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::net::IpAddr;

use crate::error::CollectError;
use crate::info::InfoSnapshot;

/// Queries the local OS for the current hostname and interface addresses.
///
/// Address lookup is best-effort: if resolving the addresses of one interface
/// fails, the interface keeps whatever addresses were gathered so far and
/// enumeration of the remaining interfaces stops. The snapshot is still a
/// success in that case. Only a total failure (no hostname, or no interface
/// listing at all) is an error.
#[async_trait]
pub trait HostInfoSource: Send + Sync {
    async fn collect(&self) -> Result<InfoSnapshot, CollectError>;
}

/// Production source backed by the OS.
pub struct SystemSource;

#[async_trait]
impl HostInfoSource for SystemSource {
    async fn collect(&self) -> Result<InfoSnapshot, CollectError> {
        let hostname = hostname::get()
            .map_err(|e| CollectError::HostnameUnavailable(e.to_string()))?
            .to_string_lossy()
            .into_owned();
        if hostname.is_empty() {
            return Err(CollectError::HostnameUnavailable(
                "OS returned an empty hostname".to_string(),
            ));
        }

        Ok(InfoSnapshot::new(hostname, interface_addresses()?))
    }
}

/// Group every OS-reported address under its interface name, preserving the
/// order the OS returned the addresses in. Every interface the OS knows is
/// keyed, so one without bound addresses maps to an empty list rather than
/// being absent.
fn interface_addresses() -> Result<BTreeMap<String, Vec<String>>, CollectError> {
    let mut addresses: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let names = nix::net::if_::if_nameindex()
        .map_err(|e| CollectError::InterfaceEnumerationFailed(e.to_string()))?;
    for iface in &names {
        addresses.insert(iface.name().to_string_lossy().into_owned(), Vec::new());
    }

    let ifaces = if_addrs::get_if_addrs()
        .map_err(|e| CollectError::InterfaceEnumerationFailed(e.to_string()))?;
    for iface in ifaces {
        let cidr = format_cidr(iface.ip(), netmask_of(&iface));
        addresses.entry(iface.name).or_default().push(cidr);
    }
    Ok(addresses)
}

fn netmask_of(iface: &if_addrs::Interface) -> IpAddr {
    match &iface.addr {
        if_addrs::IfAddr::V4(v4) => IpAddr::V4(v4.netmask),
        if_addrs::IfAddr::V6(v6) => IpAddr::V6(v6.netmask),
    }
}

/// Render an address in `ip/prefix` notation, matching the textual form the
/// endpoint has always served.
fn format_cidr(ip: IpAddr, netmask: IpAddr) -> String {
    format!("{}/{}", ip, prefix_len(netmask))
}

fn prefix_len(netmask: IpAddr) -> u32 {
    match netmask {
        IpAddr::V4(mask) => u32::from(mask).count_ones(),
        IpAddr::V6(mask) => u128::from(mask).count_ones(),
    }
}
