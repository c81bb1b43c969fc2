//! Multicast group socket handling.
//!
//! Builds the datagram socket for one interface attempt: group address
//! resolution, wildcard bind, and group membership on a single interface.
//! Reads are unbounded here; the caller applies the read deadline.

use crate::iface::InterfaceDescriptor;
use common::{Error, Result};
use socket2::{Domain, InterfaceIndexOrAddress, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use tokio::net::UdpSocket;
use tracing::warn;

/// Resolve a multicast group string ("host:port") into a socket address.
pub fn resolve_group(group: &str) -> Result<SocketAddr> {
    let addr = group
        .to_socket_addrs()
        .map_err(|e| Error::resolve(format!("{group}: {e}")))?
        .next()
        .ok_or_else(|| Error::resolve(format!("{group}: no addresses found")))?;

    if !addr.ip().is_multicast() {
        return Err(Error::resolve(format!("{group}: not a multicast address")));
    }

    Ok(addr)
}

/// Datagram socket joined to a multicast group on one interface.
pub struct GroupSocket {
    socket: UdpSocket,
}

impl GroupSocket {
    /// Join `group` on the given interface.
    ///
    /// The socket is bound to the wildcard address of the group's family at
    /// the group port; membership is added per interface index. A receive
    /// buffer sizing failure is logged and ignored, reads proceed with the
    /// default sizing.
    pub fn join(
        group: SocketAddr,
        interface: &InterfaceDescriptor,
        recv_buffer_size: usize,
    ) -> Result<Self> {
        let domain = if group.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

        socket.set_nonblocking(true)?;

        // Allow several receivers (or a quick restart) on the same group port
        socket.set_reuse_address(true)?;

        let bind_addr: SocketAddr = if group.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, group.port()).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, group.port()).into()
        };
        socket.bind(&bind_addr.into())?;

        match group.ip() {
            IpAddr::V4(addr) => {
                socket.join_multicast_v4_n(&addr, &InterfaceIndexOrAddress::Index(interface.index))?
            }
            IpAddr::V6(addr) => socket.join_multicast_v6(&addr, interface.index)?,
        }

        if let Err(e) = socket.set_recv_buffer_size(recv_buffer_size) {
            warn!(
                interface = %interface.name,
                error = %e,
                "could not set receive buffer size"
            );
        }

        let socket = UdpSocket::from_std(socket.into())?;

        Ok(Self { socket })
    }

    /// Receive one datagram into `buf`, returning the payload length.
    pub async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let (len, _src) = self.socket.recv_from(buf).await?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iface;

    #[test]
    fn test_resolve_group() {
        let addr = resolve_group("239.255.42.99:9001").unwrap();
        assert_eq!(addr.port(), 9001);
        assert!(addr.ip().is_multicast());
        assert!(addr.is_ipv4());
    }

    #[test]
    fn test_resolve_group_v6() {
        let addr = resolve_group("[ff02::123]:9001").unwrap();
        assert!(addr.ip().is_multicast());
        assert!(addr.is_ipv6());
    }

    #[test]
    fn test_resolve_rejects_unicast() {
        assert!(resolve_group("127.0.0.1:9001").is_err());
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        assert!(resolve_group("not an address").is_err());
        assert!(resolve_group("239.255.42.99").is_err()); // missing port
    }

    #[tokio::test]
    async fn test_join_on_host_interface() {
        let interfaces = iface::enumerate().unwrap();
        if interfaces.is_empty() {
            return;
        }
        let group = resolve_group("239.255.42.98:47299").unwrap();

        // Group membership may be restricted in some environments, so just
        // check the join path doesn't panic
        let _ = GroupSocket::join(group, &interfaces[0], 2048);
    }
}
