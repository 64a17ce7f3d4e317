//! Pub/sub operations
//!
//! A subscription keeps its control connection open: after the OK envelope
//! the daemon pushes framed `PSMessage`s on the same duplex until either
//! side closes it. A background reader owns that duplex and feeds a bounded
//! channel, preserving the daemon's send order.

use crate::client::Client;
use crate::error::{Error, Result};
use crate::framing;
use crate::proto::p2pd as pb;
use futures::Stream;
use libp2p::PeerId;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

fn wrap(pubsub: pb::PsRequest) -> pb::Request {
    pb::Request {
        r#type: pb::request::Type::Pubsub as i32,
        pubsub: Some(pubsub),
        ..Default::default()
    }
}

fn ps_request(r#type: pb::ps_request::Type) -> pb::PsRequest {
    pb::PsRequest {
        r#type: r#type as i32,
        topic: None,
        data: None,
    }
}

/// A message delivered on a pub/sub topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsMessage {
    pub from: PeerId,
    pub data: Vec<u8>,
    pub seqno: Vec<u8>,
    pub topics: Vec<String>,
    pub signature: Vec<u8>,
    pub key: Vec<u8>,
}

impl PsMessage {
    fn from_proto(msg: pb::PsMessage) -> Result<Self> {
        let from = msg
            .from_id
            .ok_or_else(|| Error::Protocol("PSMessage missing sender".to_string()))?;
        Ok(Self {
            from: PeerId::from_bytes(&from)
                .map_err(|e| Error::Protocol(format!("invalid peer id in PSMessage: {}", e)))?,
            data: msg.data.unwrap_or_default(),
            seqno: msg.seqno.unwrap_or_default(),
            topics: msg.topic_ids,
            signature: msg.signature.unwrap_or_default(),
            key: msg.key.unwrap_or_default(),
        })
    }
}

/// A live subscription to a pub/sub topic.
///
/// Messages arrive in the daemon's send order. The channel ends when the
/// subscription is cancelled, the daemon closes the socket, or the reader
/// hits an error (delivered as a final `Err` item).
pub struct Subscription {
    topic: String,
    rx: mpsc::Receiver<Result<PsMessage>>,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next message, or `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<Result<PsMessage>> {
        self.rx.recv().await
    }

    /// Cancel the subscription: the daemon-side socket closes and the
    /// message channel ends after any already-buffered messages.
    pub fn cancel(&mut self) {
        self.task.abort();
        self.rx.close();
    }
}

impl Stream for Subscription {
    type Item = Result<PsMessage>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Client {
    /// List the topics this daemon is subscribed to.
    pub async fn pubsub_get_topics(&self) -> Result<Vec<String>> {
        self.ensure_open()?;

        let resp = self
            .control()
            .request(wrap(ps_request(pb::ps_request::Type::GetTopics)))
            .await?;

        Ok(resp.pubsub.map(|p| p.topics).unwrap_or_default())
    }

    /// List the peers this daemon knows on `topic`.
    pub async fn pubsub_list_peers(&self, topic: &str) -> Result<Vec<PeerId>> {
        self.ensure_open()?;

        let mut ps = ps_request(pb::ps_request::Type::ListPeers);
        ps.topic = Some(topic.to_string());

        let resp = self.control().request(wrap(ps)).await?;

        resp.pubsub
            .map(|p| p.peer_ids)
            .unwrap_or_default()
            .into_iter()
            .map(|raw| {
                PeerId::from_bytes(&raw)
                    .map_err(|e| Error::Protocol(format!("invalid peer id: {}", e)))
            })
            .collect()
    }

    /// Publish `data` on `topic`.
    pub async fn pubsub_publish(&self, topic: &str, data: &[u8]) -> Result<()> {
        self.ensure_open()?;
        debug!("PUBSUB PUBLISH {} ({} bytes)", topic, data.len());

        let mut ps = ps_request(pb::ps_request::Type::Publish);
        ps.topic = Some(topic.to_string());
        ps.data = Some(data.to_vec());

        self.control().request(wrap(ps)).await?;
        Ok(())
    }

    /// Subscribe to `topic`. The returned [`Subscription`] yields messages
    /// until cancelled or the socket ends; there is no auto-reconnect.
    pub async fn pubsub_subscribe(&self, topic: &str) -> Result<Subscription> {
        self.ensure_open()?;

        let mut ps = ps_request(pb::ps_request::Type::Subscribe);
        ps.topic = Some(topic.to_string());

        let (_resp, mut stream) = self.control().request_stream(wrap(ps)).await?;
        debug!("subscribed to {}", topic);

        let (tx, rx) = mpsc::channel(64);
        let reader_topic = topic.to_string();

        let task = tokio::spawn(async move {
            loop {
                match framing::try_read_frame::<_, pb::PsMessage>(&mut stream).await {
                    Ok(Some(msg)) => {
                        trace!(
                            "pubsub delivery on {} (seqno {})",
                            reader_topic,
                            hex::encode(msg.seqno.as_deref().unwrap_or_default())
                        );
                        let item = PsMessage::from_proto(msg);
                        let failed = item.is_err();
                        if tx.send(item).await.is_err() || failed {
                            break;
                        }
                    }
                    // daemon closed the subscription
                    Ok(None) => break,
                    Err(e) => {
                        warn!("subscription reader for {} failed: {}", reader_topic, e);
                        let _ = tx.send(Err(e)).await;
                        break;
                    }
                }
            }
            trace!("subscription reader for {} exiting", reader_topic);
        });

        self.track_subscription(task.abort_handle()).await;

        Ok(Subscription {
            topic: topic.to_string(),
            rx,
            task,
        })
    }
}
