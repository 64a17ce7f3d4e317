//! Client facade for the libp2p daemon
//!
//! A [`Client`] owns exactly one daemon control endpoint. Requests each open
//! a fresh control connection; inbound streams arrive on a listener the
//! client binds lazily (same address family as the control endpoint). All
//! state is per instance; nothing process-wide.

use crate::control::ControlChannel;
use crate::error::{Error, Result};
use crate::listener::{spawn_accept_loop, HandlerMap, ProtocolHandler};
use crate::proto::p2pd as pb;
use crate::transport::{DaemonStream, Endpoint, Listener};
use libp2p::{Multiaddr, PeerId};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info};
use uuid::Uuid;

/// A peer and its known addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    pub peer_id: PeerId,
    pub addrs: Vec<Multiaddr>,
}

impl PeerInfo {
    pub(crate) fn from_proto(info: pb::PeerInfo) -> Result<Self> {
        let peer_id = PeerId::from_bytes(&info.id)
            .map_err(|e| Error::Protocol(format!("invalid peer id: {}", e)))?;
        let mut addrs = Vec::with_capacity(info.addrs.len());
        for raw in info.addrs {
            let addr = Multiaddr::try_from(raw)
                .map_err(|e| Error::Protocol(format!("invalid multiaddr: {}", e)))?;
            addrs.push(addr);
        }
        Ok(Self { peer_id, addrs })
    }
}

/// Metadata frame prefixing every daemon-managed stream, outbound or
/// inbound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub peer: PeerId,
    pub addr: Multiaddr,
    pub proto: String,
}

impl StreamInfo {
    pub(crate) fn from_proto(info: pb::StreamInfo) -> Result<Self> {
        Ok(Self {
            peer: PeerId::from_bytes(&info.peer)
                .map_err(|e| Error::Protocol(format!("invalid peer id in stream info: {}", e)))?,
            addr: Multiaddr::try_from(info.addr)
                .map_err(|e| Error::Protocol(format!("invalid multiaddr in stream info: {}", e)))?,
            proto: info.proto,
        })
    }
}

/// Handle to an out-of-process libp2p daemon.
///
/// Cloning is cheap; clones share the listener, handler registry, and
/// closed state.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    control: ControlChannel,
    /// Listener multiaddr requested at construction, if any; otherwise one
    /// is synthesized to match the control endpoint's family.
    listen_addr: Option<Multiaddr>,
    listener: Mutex<Option<ListenerState>>,
    handlers: HandlerMap,
    /// Abort handles for subscription readers, so `close` can stop them.
    subscriptions: Mutex<Vec<AbortHandle>>,
    closed: AtomicBool,
}

struct ListenerState {
    local_addr: Multiaddr,
    task: JoinHandle<()>,
    /// Unix socket file created by this client; unlinked on close.
    socket_path: Option<PathBuf>,
}

impl Client {
    /// Create a client for the daemon at `control_addr`
    /// (`/unix/<path>` or `/ip4|ip6/<host>/tcp/<port>`).
    pub fn new(control_addr: &Multiaddr) -> Result<Self> {
        Self::build(control_addr, None)
    }

    /// Create a client with an explicit listener address for inbound
    /// streams. Must be the same address family as the control endpoint.
    pub fn with_listen_addr(control_addr: &Multiaddr, listen_addr: &Multiaddr) -> Result<Self> {
        Self::build(control_addr, Some(listen_addr.clone()))
    }

    fn build(control_addr: &Multiaddr, listen_addr: Option<Multiaddr>) -> Result<Self> {
        let endpoint = Endpoint::from_multiaddr(control_addr)?;

        if let Some(listen) = &listen_addr {
            let listen_endpoint = Endpoint::from_multiaddr(listen)?;
            if !endpoint.same_family(&listen_endpoint) {
                return Err(Error::InvalidArgument(format!(
                    "listener address {} does not match the control endpoint's family",
                    listen
                )));
            }
        }

        Ok(Self {
            inner: Arc::new(Inner {
                control: ControlChannel::new(endpoint),
                listen_addr,
                listener: Mutex::new(None),
                handlers: Arc::new(Mutex::new(HashMap::new())),
                subscriptions: Mutex::new(Vec::new()),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Bind the inbound-stream listener and start accepting. Idempotent;
    /// returns the bound multiaddr (with any OS-assigned port resolved).
    /// Called implicitly by the first [`stream_handler`](Self::stream_handler)
    /// registration.
    pub async fn listen(&self) -> Result<Multiaddr> {
        self.ensure_open()?;

        let mut guard = self.inner.listener.lock().await;
        if let Some(state) = guard.as_ref() {
            return Ok(state.local_addr.clone());
        }

        let endpoint = match &self.inner.listen_addr {
            Some(addr) => Endpoint::from_multiaddr(addr)?,
            None => self.default_listen_endpoint(),
        };

        let listener = Listener::bind(&endpoint).await?;
        let local_addr = listener.local_multiaddr()?;
        let socket_path = listener.unix_socket_path();
        info!("listening for inbound streams on {}", local_addr);

        let task = spawn_accept_loop(listener, self.inner.handlers.clone());
        *guard = Some(ListenerState {
            local_addr: local_addr.clone(),
            task,
            socket_path,
        });

        Ok(local_addr)
    }

    /// Default listener endpoint: control family, loopback with an
    /// OS-assigned port for TCP, a unique sibling socket path for Unix.
    fn default_listen_endpoint(&self) -> Endpoint {
        match self.inner.control.endpoint() {
            Endpoint::Tcp(_) => Endpoint::Tcp(SocketAddr::new(
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                0,
            )),
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                let dir = match path.parent() {
                    Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                    _ => std::env::temp_dir(),
                };
                Endpoint::Unix(dir.join(format!("p2pd-client-{}.sock", Uuid::new_v4())))
            }
        }
    }

    /// Ask the daemon for its own peer ID and listen addresses.
    pub async fn identify(&self) -> Result<(PeerId, Vec<Multiaddr>)> {
        self.ensure_open()?;

        let resp = self
            .inner
            .control
            .request(pb::Request {
                r#type: pb::request::Type::Identify as i32,
                ..Default::default()
            })
            .await?;

        let identify = resp.identify.ok_or_else(|| {
            Error::Protocol("IDENTIFY response missing identify payload".to_string())
        })?;

        let peer_id = PeerId::from_bytes(&identify.id)
            .map_err(|e| Error::Protocol(format!("invalid peer id: {}", e)))?;
        let mut addrs = Vec::with_capacity(identify.addrs.len());
        for raw in identify.addrs {
            let addr = Multiaddr::try_from(raw)
                .map_err(|e| Error::Protocol(format!("invalid multiaddr: {}", e)))?;
            addrs.push(addr);
        }

        debug!("daemon identifies as {}", peer_id);
        Ok((peer_id, addrs))
    }

    /// Ask the daemon to connect to `peer` at the given addresses.
    pub async fn connect(&self, peer: &PeerId, addrs: &[Multiaddr]) -> Result<()> {
        self.ensure_open()?;

        let req = pb::Request {
            r#type: pb::request::Type::Connect as i32,
            connect: Some(pb::ConnectRequest {
                peer: peer.to_bytes(),
                addrs: addrs.iter().map(|a| a.to_vec()).collect(),
                timeout: None,
            }),
            ..Default::default()
        };

        self.inner.control.request(req).await?;
        debug!("connected to {}", peer);
        Ok(())
    }

    /// List the daemon's currently connected peers.
    pub async fn list_peers(&self) -> Result<Vec<PeerInfo>> {
        self.ensure_open()?;

        let resp = self
            .inner
            .control
            .request(pb::Request {
                r#type: pb::request::Type::ListPeers as i32,
                ..Default::default()
            })
            .await?;

        resp.peers.into_iter().map(PeerInfo::from_proto).collect()
    }

    /// Ask the daemon to disconnect from `peer`.
    pub async fn disconnect(&self, peer: &PeerId) -> Result<()> {
        self.ensure_open()?;

        let req = pb::Request {
            r#type: pb::request::Type::Disconnect as i32,
            disconnect: Some(pb::DisconnectRequest {
                peer: peer.to_bytes(),
            }),
            ..Default::default()
        };

        self.inner.control.request(req).await?;
        Ok(())
    }

    /// Open an outbound stream to `peer`, negotiating one of `protos`.
    ///
    /// The returned duplex is live and owned by the caller; the initial
    /// `StreamInfo` frame has already been consumed.
    pub async fn stream_open(
        &self,
        peer: &PeerId,
        protos: &[String],
    ) -> Result<(StreamInfo, DaemonStream)> {
        self.ensure_open()?;

        if protos.is_empty() {
            return Err(Error::InvalidArgument(
                "stream_open requires at least one protocol".to_string(),
            ));
        }

        let req = pb::Request {
            r#type: pb::request::Type::StreamOpen as i32,
            stream_open: Some(pb::StreamOpenRequest {
                peer: peer.to_bytes(),
                proto: protos.to_vec(),
                timeout: None,
            }),
            ..Default::default()
        };

        let (resp, stream) = self.inner.control.request_stream(req).await?;
        let info = resp.stream_info.ok_or_else(|| {
            Error::Protocol("STREAM_OPEN response missing stream info".to_string())
        })?;
        let info = StreamInfo::from_proto(info)?;

        debug!("opened {} stream to {}", info.proto, info.peer);
        Ok((info, stream))
    }

    /// Register `handler` for inbound streams negotiating `proto`.
    ///
    /// Binds the listener if it is not yet bound, announces the
    /// registration to the daemon, and only then commits the handler
    /// locally. Re-registering a protocol replaces its handler.
    pub async fn stream_handler<H>(&self, proto: &str, handler: H) -> Result<()>
    where
        H: ProtocolHandler,
    {
        self.ensure_open()?;

        if proto.is_empty() {
            return Err(Error::InvalidArgument(
                "protocol must not be empty".to_string(),
            ));
        }

        let listen_addr = self.listen().await?;

        let req = pb::Request {
            r#type: pb::request::Type::StreamHandler as i32,
            stream_handler: Some(pb::StreamHandlerRequest {
                addr: listen_addr.to_vec(),
                proto: vec![proto.to_string()],
            }),
            ..Default::default()
        };

        self.inner.control.request(req).await?;

        // Committed only after the daemon acknowledged the registration.
        let mut handlers = self.inner.handlers.lock().await;
        handlers.insert(proto.to_string(), Arc::new(handler));
        debug!("registered stream handler for {}", proto);
        Ok(())
    }

    /// Shut the client down: stop the listener, cancel subscription
    /// readers, unlink the listener socket file. Idempotent; all further
    /// operations fail with [`Error::Closed`].
    pub async fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        if let Some(state) = self.inner.listener.lock().await.take() {
            state.task.abort();
            if let Some(path) = state.socket_path {
                if let Err(e) = std::fs::remove_file(&path) {
                    debug!("failed to unlink {}: {}", path.display(), e);
                }
            }
        }

        for handle in self.inner.subscriptions.lock().await.drain(..) {
            handle.abort();
        }

        self.inner.handlers.lock().await.clear();
        info!("client closed");
        Ok(())
    }

    pub(crate) fn control(&self) -> &ControlChannel {
        &self.inner.control
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(Error::Closed);
        }
        Ok(())
    }

    pub(crate) async fn track_subscription(&self, handle: AbortHandle) {
        self.inner.subscriptions.lock().await.push(handle);
    }
}
