//! Client for the go-libp2p-daemon control protocol
//!
//! This crate lets an application participate in a libp2p network without
//! embedding a full p2p stack: an out-of-process daemon speaks the network
//! protocols, and this client drives it over a local control channel
//! (Unix domain socket or TCP loopback).
//!
//! ## Architecture
//!
//! - Every control request opens a fresh connection to the daemon: one
//!   varint-framed protobuf `Request` out, one `Response` back.
//! - Inbound application streams travel the other way: the daemon dials a
//!   listener socket the client binds, prefixing each stream with one
//!   framed `StreamInfo` that routes it to the registered handler.
//! - Pub/sub deliveries and streaming DHT results arrive on the duplex of
//!   the request that started them, consumed by background reader tasks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use p2pd_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let control = p2pd_client::parse_multiaddr("/unix/tmp/p2pd.sock")?;
//!     let client = Client::new(&control)?;
//!
//!     let (peer_id, addrs) = client.identify().await?;
//!     println!("daemon is {} listening on {:?}", peer_id, addrs);
//!
//!     use p2pd_client::{DaemonStream, StreamInfo};
//!     client
//!         .stream_handler("/echo/1.0", |info: StreamInfo, stream: DaemonStream| async move {
//!             println!("inbound {} stream from {}", info.proto, info.peer);
//!             drop(stream);
//!         })
//!         .await?;
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod daemon;
pub mod dht;
pub mod error;
pub mod framing;
pub mod listener;
pub mod proto;
pub mod pubsub;

mod connmgr;
mod control;
mod transport;

pub use client::{Client, PeerInfo, StreamInfo};
pub use daemon::{Daemon, DaemonBuilder};
pub use dht::DhtResults;
pub use error::{Error, Result};
pub use listener::ProtocolHandler;
pub use pubsub::{PsMessage, Subscription};
pub use transport::{parse_multiaddr, DaemonStream};

// Re-export commonly used types
pub use libp2p::identity::PublicKey;
pub use libp2p::{Multiaddr, PeerId};
pub use proto::p2pd;
