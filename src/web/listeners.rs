use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Binds the HTTP listener. A host of `*` listens on every interface,
/// dual-stack when the platform allows it.
pub async fn create_listener(host: &str, port: u16) -> std::io::Result<(SocketAddr, TcpListener)> {
    let listener = if host == "*" {
        create_wildcard_listener(port)?
    } else {
        let addr = format!("{}:{}", host, port);
        info!("Attempting to bind HTTP server to {}...", addr);
        TcpListener::bind(&addr).await?
    };

    Ok((listener.local_addr()?, listener))
}

fn bind_socket(domain: Domain, addr: SocketAddr, dual_stack: bool) -> std::io::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if dual_stack {
        // Some systems refuse this; a v6-only listener is still usable
        if let Err(e) = socket.set_only_v6(false) {
            warn!(
                "Failed to set dual-stack mode for IPv6 socket: {}. Continuing anyway.",
                e
            );
        }
    }

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

fn create_wildcard_listener(port: u16) -> std::io::Result<TcpListener> {
    let v6_addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, port));
    info!(
        "Attempting to bind HTTP server to {}... (IPv6 + IPv4 dual-stack)",
        v6_addr
    );

    match bind_socket(Domain::IPV6, v6_addr, true) {
        Ok(listener) => Ok(listener),
        Err(e) => {
            warn!("Failed to bind IPv6 listener ({}). Attempting IPv4 only.", e);
            let v4_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
            info!("Attempting to bind HTTP server to {}... (IPv4)", v4_addr);
            bind_socket(Domain::IPV4, v4_addr, false)
        }
    }
}
