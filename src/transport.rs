//! Address-family plumbing for daemon endpoints
//!
//! Control and listener endpoints are multiaddrs of either the
//! `/unix/<path>` or `/ip4|ip6/<host>/tcp/<port>` family. This module parses
//! them, dials them, binds listeners on them, and erases the family behind a
//! single duplex type so the rest of the crate never branches on it.

use crate::error::{Error, Result};
use libp2p::multiaddr::Protocol;
use libp2p::Multiaddr;
use std::io;
use std::net::{IpAddr, SocketAddr};
#[cfg(unix)]
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};
use tracing::debug;

/// Parse a multiaddr string, with path semantics for `/unix/<path>`: the
/// rest of the string is the socket path, as in go-multiaddr. (The
/// multiaddr crate's `FromStr` splits unix paths on `/`, so they are
/// handled here by prefix.) Accepts both `/unix/tmp/x.sock` and the
/// doubled-slash spelling `/unix//tmp/x.sock`; either way the path is
/// absolute.
pub fn parse_multiaddr(s: &str) -> Result<Multiaddr> {
    if let Some(rest) = s.strip_prefix("/unix/") {
        let path = if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        };
        let mut addr = Multiaddr::empty();
        addr.push(Protocol::Unix(path.into()));
        return Ok(addr);
    }

    s.parse()
        .map_err(|e| Error::Connection(format!("invalid multiaddr {}: {}", s, e)))
}

/// A control or listener address resolved down to its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Tcp(SocketAddr),
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Endpoint {
    pub(crate) fn from_multiaddr(addr: &Multiaddr) -> Result<Self> {
        let mut iter = addr.iter();
        match iter.next() {
            Some(Protocol::Ip4(ip)) => match iter.next() {
                Some(Protocol::Tcp(port)) => {
                    Ok(Endpoint::Tcp(SocketAddr::new(IpAddr::V4(ip), port)))
                }
                _ => Err(Error::Connection(format!(
                    "expected /tcp after /ip4 in {}",
                    addr
                ))),
            },
            Some(Protocol::Ip6(ip)) => match iter.next() {
                Some(Protocol::Tcp(port)) => {
                    Ok(Endpoint::Tcp(SocketAddr::new(IpAddr::V6(ip), port)))
                }
                _ => Err(Error::Connection(format!(
                    "expected /tcp after /ip6 in {}",
                    addr
                ))),
            },
            #[cfg(unix)]
            Some(Protocol::Unix(path)) => Ok(Endpoint::Unix(PathBuf::from(path.into_owned()))),
            #[cfg(not(unix))]
            Some(Protocol::Unix(_)) => Err(Error::Connection(
                "unix multiaddrs are not supported on this platform".to_string(),
            )),
            _ => Err(Error::Connection(format!(
                "unsupported multiaddr: {}",
                addr
            ))),
        }
    }

    pub(crate) fn to_multiaddr(&self) -> Multiaddr {
        match self {
            Endpoint::Tcp(sa) => {
                let mut addr = Multiaddr::empty();
                match sa.ip() {
                    IpAddr::V4(ip) => addr.push(Protocol::Ip4(ip)),
                    IpAddr::V6(ip) => addr.push(Protocol::Ip6(ip)),
                }
                addr.push(Protocol::Tcp(sa.port()));
                addr
            }
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                let mut addr = Multiaddr::empty();
                addr.push(Protocol::Unix(
                    path.to_string_lossy().into_owned().into(),
                ));
                addr
            }
        }
    }

    pub(crate) fn same_family(&self, other: &Endpoint) -> bool {
        match (self, other) {
            (Endpoint::Tcp(_), Endpoint::Tcp(_)) => true,
            #[cfg(unix)]
            (Endpoint::Unix(_), Endpoint::Unix(_)) => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }
}

/// Dial an endpoint, whatever its family.
pub(crate) async fn dial(endpoint: &Endpoint) -> Result<DaemonStream> {
    match endpoint {
        Endpoint::Tcp(addr) => {
            let stream = TcpStream::connect(addr).await.map_err(|e| {
                Error::Connection(format!("failed to connect to {}: {}", addr, e))
            })?;
            Ok(DaemonStream::Tcp(stream))
        }
        #[cfg(unix)]
        Endpoint::Unix(path) => {
            let stream = UnixStream::connect(path).await.map_err(|e| {
                Error::Connection(format!(
                    "failed to connect to {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(DaemonStream::Unix(stream))
        }
    }
}

/// Duplex byte stream to or from the daemon, over either address family.
///
/// Returned by `Client::stream_open` and handed to stream handlers. Plain
/// `AsyncRead + AsyncWrite`; the owner closes it by dropping it.
#[derive(Debug)]
pub enum DaemonStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl AsyncRead for DaemonStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DaemonStream::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            #[cfg(unix)]
            DaemonStream::Unix(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for DaemonStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            DaemonStream::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            #[cfg(unix)]
            DaemonStream::Unix(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DaemonStream::Tcp(s) => Pin::new(s).poll_flush(cx),
            #[cfg(unix)]
            DaemonStream::Unix(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DaemonStream::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            #[cfg(unix)]
            DaemonStream::Unix(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

/// Listening socket for daemon-initiated connections.
#[derive(Debug)]
pub(crate) enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix {
        listener: UnixListener,
        path: PathBuf,
    },
}

impl Listener {
    /// Bind to the endpoint. A Unix socket file already present at the path
    /// is probed first: a live socket is refused, a stale one is unlinked
    /// and replaced.
    pub(crate) async fn bind(endpoint: &Endpoint) -> Result<Self> {
        match endpoint {
            Endpoint::Tcp(addr) => Ok(Listener::Tcp(TcpListener::bind(addr).await?)),
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                if path.exists() {
                    if UnixStream::connect(path).await.is_ok() {
                        return Err(Error::Connection(format!(
                            "socket {} is already in use",
                            path.display()
                        )));
                    }
                    debug!("removing stale unix socket at {}", path.display());
                    std::fs::remove_file(path)?;
                }
                let listener = UnixListener::bind(path)?;
                Ok(Listener::Unix {
                    listener,
                    path: path.clone(),
                })
            }
        }
    }

    pub(crate) async fn accept(&self) -> io::Result<DaemonStream> {
        match self {
            Listener::Tcp(listener) => {
                let (stream, _) = listener.accept().await?;
                Ok(DaemonStream::Tcp(stream))
            }
            #[cfg(unix)]
            Listener::Unix { listener, .. } => {
                let (stream, _) = listener.accept().await?;
                Ok(DaemonStream::Unix(stream))
            }
        }
    }

    /// Bound address with any OS-assigned port resolved.
    pub(crate) fn local_multiaddr(&self) -> Result<Multiaddr> {
        match self {
            Listener::Tcp(listener) => {
                let sa = listener.local_addr()?;
                Ok(Endpoint::Tcp(sa).to_multiaddr())
            }
            #[cfg(unix)]
            Listener::Unix { path, .. } => Ok(Endpoint::Unix(path.clone()).to_multiaddr()),
        }
    }

    /// Socket file this listener created, for unlinking on close.
    pub(crate) fn unix_socket_path(&self) -> Option<PathBuf> {
        match self {
            Listener::Tcp(_) => None,
            #[cfg(unix)]
            Listener::Unix { path, .. } => Some(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tcp_multiaddr() {
        let addr: Multiaddr = "/ip4/127.0.0.1/tcp/4001".parse().unwrap();
        let endpoint = Endpoint::from_multiaddr(&addr).unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Tcp("127.0.0.1:4001".parse().unwrap())
        );
        assert_eq!(endpoint.to_multiaddr(), addr);
    }

    #[cfg(unix)]
    #[test]
    fn parses_unix_multiaddr() {
        let addr = parse_multiaddr("/unix/tmp/p2pd.sock").unwrap();
        let endpoint = Endpoint::from_multiaddr(&addr).unwrap();
        assert_eq!(endpoint, Endpoint::Unix(PathBuf::from("/tmp/p2pd.sock")));
        assert_eq!(endpoint.to_multiaddr(), addr);
    }

    #[cfg(unix)]
    #[test]
    fn accepts_doubled_slash_unix_spelling() {
        let a = parse_multiaddr("/unix/tmp/p2pd.sock").unwrap();
        let b = parse_multiaddr("/unix//tmp/p2pd.sock").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_stream_multiaddr() {
        let addr: Multiaddr = "/ip4/127.0.0.1/udp/4001".parse().unwrap();
        assert!(Endpoint::from_multiaddr(&addr).is_err());
    }

    #[test]
    fn families_must_match() {
        let tcp = Endpoint::Tcp("127.0.0.1:0".parse().unwrap());
        assert!(tcp.same_family(&Endpoint::Tcp("127.0.0.1:9".parse().unwrap())));
        #[cfg(unix)]
        assert!(!tcp.same_family(&Endpoint::Unix(PathBuf::from("/tmp/x.sock"))));
    }

    #[tokio::test]
    async fn tcp_listener_reports_assigned_port() {
        let endpoint = Endpoint::Tcp("127.0.0.1:0".parse().unwrap());
        let listener = Listener::bind(&endpoint).await.unwrap();
        let addr = listener.local_multiaddr().unwrap();
        // the OS-assigned port must be visible, not the wildcard
        assert!(!addr.to_string().ends_with("/tcp/0"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stale_unix_socket_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listen.sock");

        // bind and drop, leaving a socket file nobody answers on
        let stale = UnixListener::bind(&path).unwrap();
        drop(stale);
        assert!(path.exists());

        let endpoint = Endpoint::Unix(path.clone());
        let listener = Listener::bind(&endpoint).await.unwrap();
        assert_eq!(listener.unix_socket_path(), Some(path));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn live_unix_socket_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listen.sock");

        let _live = UnixListener::bind(&path).unwrap();

        let endpoint = Endpoint::Unix(path.clone());
        let err = Listener::bind(&endpoint).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }
}
