#![allow(dead_code)]

//! In-process fake daemon speaking the control-protocol wire contract.
//!
//! Each accepted control connection has its first `Request` frame read off,
//! then both are handed to the test's responder. The responder plays the
//! daemon's side of the exchange: reply with a framed `Response`, keep
//! streaming on the same duplex, or dial back into the client's listener.

use futures::future::BoxFuture;
use libp2p::multiaddr::Protocol;
use p2pd_client::framing;
use p2pd_client::p2pd as pb;
use p2pd_client::{DaemonStream, Multiaddr, PeerId};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[cfg(unix)]
use std::path::Path;
#[cfg(unix)]
use tokio::net::UnixListener;

type Responder = Arc<dyn Fn(pb::Request, DaemonStream) -> BoxFuture<'static, ()> + Send + Sync>;

pub struct FakeDaemon {
    addr: Multiaddr,
    task: JoinHandle<()>,
}

impl FakeDaemon {
    /// Start a fake daemon on TCP loopback.
    pub async fn start<F, Fut>(responder: F) -> Self
    where
        F: Fn(pb::Request, DaemonStream) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let addr: Multiaddr = format!("/ip4/127.0.0.1/tcp/{}", port).parse().unwrap();

        let responder = box_responder(responder);
        let task = tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                serve_connection(DaemonStream::Tcp(stream), responder.clone());
            }
        });

        Self { addr, task }
    }

    /// Start a fake daemon on a Unix socket at `path`.
    #[cfg(unix)]
    pub async fn start_unix<F, Fut>(path: &Path, responder: F) -> Self
    where
        F: Fn(pb::Request, DaemonStream) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener = UnixListener::bind(path).unwrap();
        let addr =
            p2pd_client::parse_multiaddr(&format!("/unix/{}", path.display())).unwrap();

        let responder = box_responder(responder);
        let task = tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                serve_connection(DaemonStream::Unix(stream), responder.clone());
            }
        });

        Self { addr, task }
    }

    pub fn control_addr(&self) -> &Multiaddr {
        &self.addr
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn box_responder<F, Fut>(responder: F) -> Responder
where
    F: Fn(pb::Request, DaemonStream) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |req, stream| Box::pin(responder(req, stream)))
}

fn serve_connection(mut stream: DaemonStream, responder: Responder) {
    tokio::spawn(async move {
        let req: pb::Request = match framing::read_frame(&mut stream).await {
            Ok(req) => req,
            Err(_) => return,
        };
        responder(req, stream).await;
    });
}

/// Route client tracing to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic peer ID: a sha2-256 multihash over a constant digest.
pub fn test_peer_id(seed: u8) -> PeerId {
    let mut bytes = vec![0x12, 0x20];
    bytes.extend(std::iter::repeat(seed).take(32));
    PeerId::from_bytes(&bytes).unwrap()
}

pub fn ok_response() -> pb::Response {
    pb::Response {
        r#type: pb::response::Type::Ok as i32,
        ..Default::default()
    }
}

pub fn error_response(msg: &str) -> pb::Response {
    pb::Response {
        r#type: pb::response::Type::Error as i32,
        error: Some(pb::ErrorResponse {
            msg: msg.to_string(),
        }),
        ..Default::default()
    }
}

pub fn multiaddr_to_socketaddr(addr: &Multiaddr) -> SocketAddr {
    let mut ip = None;
    let mut port = None;
    for protocol in addr.iter() {
        match protocol {
            Protocol::Ip4(a) => ip = Some(IpAddr::V4(a)),
            Protocol::Ip6(a) => ip = Some(IpAddr::V6(a)),
            Protocol::Tcp(p) => port = Some(p),
            _ => {}
        }
    }
    SocketAddr::new(ip.expect("ip in multiaddr"), port.expect("port in multiaddr"))
}

/// Dial the client's listener the way the daemon would: connect, send one
/// framed `StreamInfo`, then the raw payload.
pub async fn dial_inbound(
    listen_addr: &Multiaddr,
    info: &pb::StreamInfo,
    payload: &[u8],
) -> TcpStream {
    let mut stream = TcpStream::connect(multiaddr_to_socketaddr(listen_addr))
        .await
        .unwrap();
    framing::write_frame(&mut stream, info).await.unwrap();
    stream.write_all(payload).await.unwrap();
    stream.flush().await.unwrap();
    stream
}
