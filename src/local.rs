//! Defaults for the client side identity carried in host-based requests.

use std::net::Ipv4Addr;

/// The address used as client hostname when no external address is found.
pub const LOCALHOST_IP: &str = "127.0.0.1";

/// Returns `configured` if it is set and non-empty, otherwise the name of
/// the current OS user.
pub fn resolve_client_username(configured: Option<&str>) -> String {
    match configured {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => whoami::username(),
    }
}

/// Returns `configured` if it is set and non-empty, otherwise the first
/// external IPv4 address of this host, falling back to [`LOCALHOST_IP`].
pub fn resolve_client_hostname(configured: Option<&str>) -> String {
    resolve_client_hostname_with(configured, first_external_ipv4)
}

pub(crate) fn resolve_client_hostname_with<F>(configured: Option<&str>, discover: F) -> String
where
    F: FnOnce() -> Option<Ipv4Addr>,
{
    match configured {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => discover()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| LOCALHOST_IP.to_owned()),
    }
}

/// Pick the first address usable by a remote peer.
pub(crate) fn pick_external_ipv4<I>(candidates: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    candidates.into_iter().find(|addr| {
        let usable = !addr.is_loopback()
            && !addr.is_unspecified()
            && !addr.is_link_local()
            && !addr.is_broadcast()
            && !addr.is_multicast();
        if !usable {
            tracing::trace!("skip interface address {}", addr);
        }
        usable
    })
}

/// Query the network interfaces for the first external IPv4 address.
#[cfg(unix)]
pub fn first_external_ipv4() -> Option<Ipv4Addr> {
    use nix::{ifaddrs::getifaddrs, net::if_::InterfaceFlags};
    use std::net::SocketAddrV4;

    let addrs = match getifaddrs() {
        Ok(addrs) => addrs,
        Err(err) => {
            tracing::debug!("failed to list network interfaces: {}", err);
            return None;
        }
    };

    pick_external_ipv4(addrs.filter_map(|ifaddr| {
        if !ifaddr.flags.contains(InterfaceFlags::IFF_UP)
            || ifaddr.flags.contains(InterfaceFlags::IFF_LOOPBACK)
        {
            tracing::trace!("skip interface {}", ifaddr.interface_name);
            return None;
        }
        let sin = *ifaddr.address?.as_sockaddr_in()?;
        Some(*SocketAddrV4::from(sin).ip())
    }))
}

#[cfg(not(unix))]
pub fn first_external_ipv4() -> Option<Ipv4Addr> {
    None
}
