//! Inbound stream listener and handler dispatch
//!
//! The daemon delivers inbound application streams by dialing back into a
//! socket the client listens on. Each connection opens with exactly one
//! framed `StreamInfo`; the listener routes the rest of the stream to the
//! handler registered for that protocol, or drops it if there is none.

use crate::client::StreamInfo;
use crate::error::Result;
use crate::framing;
use crate::proto::p2pd as pb;
use crate::transport::{DaemonStream, Listener};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// User-supplied handler for inbound streams.
///
/// The handler owns the stream for the duration of the call; closing it
/// (by dropping) is the handler's responsibility.
#[async_trait]
pub trait ProtocolHandler: Send + Sync + 'static {
    async fn handle(&self, info: StreamInfo, stream: DaemonStream);
}

/// Any async closure over `(StreamInfo, DaemonStream)` is a handler.
#[async_trait]
impl<F, Fut> ProtocolHandler for F
where
    F: Fn(StreamInfo, DaemonStream) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, info: StreamInfo, stream: DaemonStream) {
        self(info, stream).await;
    }
}

/// Protocol → handler map, written by registration and read by the accept
/// loop. Re-registration under the same protocol replaces the handler.
pub(crate) type HandlerMap = Arc<Mutex<HashMap<String, Arc<dyn ProtocolHandler>>>>;

/// Spawn the accept loop. The returned task owns the listening socket and
/// is aborted on `Client::close`.
pub(crate) fn spawn_accept_loop(listener: Listener, handlers: HandlerMap) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let stream = match listener.accept().await {
                Ok(stream) => stream,
                Err(e) => {
                    // Accept failures (fd exhaustion and friends) must not
                    // kill the loop; back off and keep accepting.
                    warn!("listener accept failed: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                }
            };

            // Each connection is dispatched on its own task so a slow
            // handler never stalls the accept loop.
            let handlers = handlers.clone();
            tokio::spawn(async move {
                if let Err(e) = dispatch(stream, handlers).await {
                    debug!("inbound stream dropped: {}", e);
                }
            });
        }
    })
}

async fn dispatch(mut stream: DaemonStream, handlers: HandlerMap) -> Result<()> {
    let info: pb::StreamInfo = framing::read_frame(&mut stream).await?;
    let info = StreamInfo::from_proto(info)?;

    let handler = {
        let map = handlers.lock().await;
        map.get(&info.proto).cloned()
    };

    match handler {
        Some(handler) => {
            debug!("dispatching inbound {} stream from {}", info.proto, info.peer);
            // A panicking handler must not take anything down with it.
            let call = tokio::spawn(async move { handler.handle(info, stream).await });
            if let Err(e) = call.await {
                warn!("stream handler failed: {}", e);
            }
        }
        None => {
            debug!(
                "no handler registered for protocol {}, closing stream",
                info.proto
            );
        }
    }

    Ok(())
}
