//! Control channel to the daemon
//!
//! Every request opens a fresh connection to the control endpoint: write one
//! framed `Request`, read one framed `Response`, drop the socket. There is
//! no multiplexing and no correlation state; the daemon is local, so
//! connection setup is cheap.

use crate::error::{Error, Result};
use crate::framing;
use crate::proto::p2pd as pb;
use crate::transport::{self, DaemonStream, Endpoint};
use tracing::{debug, trace};

pub(crate) struct ControlChannel {
    endpoint: Endpoint,
}

impl ControlChannel {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub(crate) fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Single-shot exchange; the connection is dropped with the response.
    pub(crate) async fn request(&self, req: pb::Request) -> Result<pb::Response> {
        let (resp, _stream) = self.request_stream(req).await?;
        Ok(resp)
    }

    /// Exchange whose connection outlives the response envelope. Used where
    /// the daemon keeps talking on the same duplex (DHT result streams,
    /// pub/sub deliveries) or where the duplex becomes the user's stream
    /// (`STREAM_OPEN`).
    pub(crate) async fn request_stream(
        &self,
        req: pb::Request,
    ) -> Result<(pb::Response, DaemonStream)> {
        let mut stream = transport::dial(&self.endpoint).await?;

        debug!("sending control request (type={})", req.r#type);
        framing::write_frame(&mut stream, &req).await?;

        let resp: pb::Response = framing::read_frame(&mut stream).await?;
        trace!("received control response (type={})", resp.r#type);

        match pb::response::Type::try_from(resp.r#type) {
            Ok(pb::response::Type::Ok) => Ok((resp, stream)),
            Ok(pb::response::Type::Error) => {
                let msg = resp
                    .error
                    .map(|e| e.msg)
                    .unwrap_or_else(|| "unspecified daemon error".to_string());
                Err(Error::Daemon(msg))
            }
            Err(_) => Err(Error::Protocol(format!(
                "unknown response type {}",
                resp.r#type
            ))),
        }
    }
}
