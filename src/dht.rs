//! DHT operations
//!
//! Single-shot queries are answered inside the `Response` envelope. The
//! streaming queries (`FIND_PEERS_CONNECTED_TO_PEER`, `FIND_PROVIDERS`,
//! `GET_CLOSEST_PEERS`, `SEARCH_VALUE`) keep the control connection open:
//! the envelope announces `BEGIN`, then framed `DHTResponse`s follow until
//! `END` or the daemon closes the socket.

use crate::client::{Client, PeerInfo};
use crate::error::{Error, Result};
use crate::framing;
use crate::proto::p2pd as pb;
use crate::transport::DaemonStream;
use futures::Stream;
use libp2p::identity::PublicKey;
use libp2p::PeerId;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

fn dht_request(r#type: pb::dht_request::Type) -> pb::DhtRequest {
    pb::DhtRequest {
        r#type: r#type as i32,
        peer: None,
        cid: None,
        key: None,
        value: None,
        count: None,
        timeout: None,
    }
}

fn wrap(dht: pb::DhtRequest) -> pb::Request {
    pb::Request {
        r#type: pb::request::Type::Dht as i32,
        dht: Some(dht),
        ..Default::default()
    }
}

/// A single-shot DHT answer must carry a VALUE payload.
fn single_value(resp: pb::Response) -> Result<pb::DhtResponse> {
    let dht = resp
        .dht
        .ok_or_else(|| Error::Protocol("DHT response missing payload".to_string()))?;
    match pb::dht_response::Type::try_from(dht.r#type) {
        Ok(pb::dht_response::Type::Value) => Ok(dht),
        _ => Err(Error::Protocol(format!(
            "unexpected DHT response type {}",
            dht.r#type
        ))),
    }
}

impl Client {
    /// Look up a peer's addresses in the DHT.
    pub async fn dht_find_peer(&self, peer: &PeerId) -> Result<PeerInfo> {
        self.ensure_open()?;
        debug!("DHT FIND_PEER {}", peer);

        let mut dht = dht_request(pb::dht_request::Type::FindPeer);
        dht.peer = Some(peer.to_bytes());

        let resp = self.control().request(wrap(dht)).await?;
        let dht = single_value(resp)?;
        let info = dht
            .peer
            .ok_or_else(|| Error::Protocol("FIND_PEER response missing peer".to_string()))?;
        PeerInfo::from_proto(info)
    }

    /// Retrieve a peer's public key from the DHT.
    pub async fn dht_get_public_key(&self, peer: &PeerId) -> Result<PublicKey> {
        self.ensure_open()?;
        debug!("DHT GET_PUBLIC_KEY {}", peer);

        let mut dht = dht_request(pb::dht_request::Type::GetPublicKey);
        dht.peer = Some(peer.to_bytes());

        let resp = self.control().request(wrap(dht)).await?;
        let dht = single_value(resp)?;
        let value = dht
            .value
            .ok_or_else(|| Error::Protocol("GET_PUBLIC_KEY response missing value".to_string()))?;
        PublicKey::try_decode_protobuf(&value)
            .map_err(|e| Error::Protocol(format!("invalid public key: {}", e)))
    }

    /// Fetch the best value stored under `key`.
    pub async fn dht_get_value(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.ensure_open()?;
        debug!("DHT GET_VALUE (key len={})", key.len());

        let mut dht = dht_request(pb::dht_request::Type::GetValue);
        dht.key = Some(key.to_vec());

        let resp = self.control().request(wrap(dht)).await?;
        let dht = single_value(resp)?;
        dht.value
            .ok_or_else(|| Error::Protocol("GET_VALUE response missing value".to_string()))
    }

    /// Store `value` under `key` in the DHT.
    pub async fn dht_put_value(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.ensure_open()?;
        debug!(
            "DHT PUT_VALUE (key len={}, value len={})",
            key.len(),
            value.len()
        );

        let mut dht = dht_request(pb::dht_request::Type::PutValue);
        dht.key = Some(key.to_vec());
        dht.value = Some(value.to_vec());

        self.control().request(wrap(dht)).await?;
        Ok(())
    }

    /// Announce that this node provides the content identified by `cid`.
    pub async fn dht_provide(&self, cid: &[u8]) -> Result<()> {
        self.ensure_open()?;
        debug!("DHT PROVIDE (cid len={})", cid.len());

        let mut dht = dht_request(pb::dht_request::Type::Provide);
        dht.cid = Some(cid.to_vec());

        self.control().request(wrap(dht)).await?;
        Ok(())
    }

    /// Stream the peers connected to `peer`.
    pub async fn dht_find_peers_connected_to_peer(
        &self,
        peer: &PeerId,
    ) -> Result<DhtResults<PeerInfo>> {
        let mut dht = dht_request(pb::dht_request::Type::FindPeersConnectedToPeer);
        dht.peer = Some(peer.to_bytes());

        self.dht_stream(dht, |resp| {
            let info = resp
                .peer
                .ok_or_else(|| Error::Protocol("DHT response missing peer".to_string()))?;
            PeerInfo::from_proto(info)
        })
        .await
    }

    /// Stream up to `count` providers of the content identified by `cid`.
    pub async fn dht_find_providers(&self, cid: &[u8], count: i32) -> Result<DhtResults<PeerInfo>> {
        let mut dht = dht_request(pb::dht_request::Type::FindProviders);
        dht.cid = Some(cid.to_vec());
        dht.count = Some(count);

        self.dht_stream(dht, |resp| {
            let info = resp
                .peer
                .ok_or_else(|| Error::Protocol("DHT response missing peer".to_string()))?;
            PeerInfo::from_proto(info)
        })
        .await
    }

    /// Stream the peer IDs closest to `key`.
    pub async fn dht_get_closest_peers(&self, key: &[u8]) -> Result<DhtResults<PeerId>> {
        let mut dht = dht_request(pb::dht_request::Type::GetClosestPeers);
        dht.key = Some(key.to_vec());

        self.dht_stream(dht, |resp| {
            let value = resp
                .value
                .ok_or_else(|| Error::Protocol("DHT response missing value".to_string()))?;
            PeerId::from_bytes(&value)
                .map_err(|e| Error::Protocol(format!("invalid peer id: {}", e)))
        })
        .await
    }

    /// Stream progressively better values stored under `key`.
    pub async fn dht_search_value(&self, key: &[u8]) -> Result<DhtResults<Vec<u8>>> {
        let mut dht = dht_request(pb::dht_request::Type::SearchValue);
        dht.key = Some(key.to_vec());

        self.dht_stream(dht, |resp| {
            resp.value
                .ok_or_else(|| Error::Protocol("DHT response missing value".to_string()))
        })
        .await
    }

    async fn dht_stream<T, F>(&self, dht: pb::DhtRequest, map: F) -> Result<DhtResults<T>>
    where
        T: Send + 'static,
        F: Fn(pb::DhtResponse) -> Result<T> + Send + 'static,
    {
        self.ensure_open()?;

        let (resp, stream) = self.control().request_stream(wrap(dht)).await?;
        let envelope = resp
            .dht
            .ok_or_else(|| Error::Protocol("DHT response missing payload".to_string()))?;
        if !matches!(
            pb::dht_response::Type::try_from(envelope.r#type),
            Ok(pb::dht_response::Type::Begin)
        ) {
            return Err(Error::Protocol(format!(
                "expected BEGIN, got DHT response type {}",
                envelope.r#type
            )));
        }

        Ok(DhtResults::spawn(stream, map))
    }
}

/// Streaming DHT query results.
///
/// Backed by a reader task that frame-reads `DHTResponse`s off the query
/// connection until the daemon sends `END` or closes the socket. Dropping
/// the results aborts the reader and closes the connection.
pub struct DhtResults<T> {
    rx: mpsc::Receiver<Result<T>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> DhtResults<T> {
    fn spawn<F>(mut stream: DaemonStream, map: F) -> Self
    where
        F: Fn(pb::DhtResponse) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);

        let task = tokio::spawn(async move {
            loop {
                let resp: pb::DhtResponse =
                    match framing::try_read_frame(&mut stream).await {
                        Ok(Some(resp)) => resp,
                        Ok(None) => break,
                        Err(e) => {
                            warn!("DHT result stream failed: {}", e);
                            let _ = tx.send(Err(e)).await;
                            break;
                        }
                    };

                match pb::dht_response::Type::try_from(resp.r#type) {
                    Ok(pb::dht_response::Type::End) => break,
                    Ok(pb::dht_response::Type::Value) => {
                        let item = map(resp);
                        let failed = item.is_err();
                        if tx.send(item).await.is_err() || failed {
                            break;
                        }
                    }
                    _ => {
                        let _ = tx
                            .send(Err(Error::Protocol(format!(
                                "unexpected DHT response type {}",
                                resp.r#type
                            ))))
                            .await;
                        break;
                    }
                }
            }
            trace!("DHT result reader exiting");
        });

        Self { rx, task }
    }

    /// Next result, or `None` once the query completed.
    pub async fn next(&mut self) -> Option<Result<T>> {
        self.rx.recv().await
    }
}

impl<T> Stream for DhtResults<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<T> Drop for DhtResults<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
