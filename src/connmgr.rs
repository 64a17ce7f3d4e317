//! Connection manager operations

use crate::client::Client;
use crate::error::Result;
use crate::proto::p2pd as pb;
use libp2p::PeerId;
use tracing::debug;

fn wrap(conn_manager: pb::ConnManagerRequest) -> pb::Request {
    pb::Request {
        r#type: pb::request::Type::Connmanager as i32,
        conn_manager: Some(conn_manager),
        ..Default::default()
    }
}

impl Client {
    /// Attach an int-weighted tag to `peer`, protecting its connections
    /// from trimming in proportion to the weight.
    pub async fn connmgr_tag_peer(&self, peer: &PeerId, tag: &str, weight: i64) -> Result<()> {
        self.ensure_open()?;
        debug!("CONNMANAGER TAG_PEER {} {}={}", peer, tag, weight);

        let req = wrap(pb::ConnManagerRequest {
            r#type: pb::conn_manager_request::Type::TagPeer as i32,
            peer: Some(peer.to_bytes()),
            tag: Some(tag.to_string()),
            weight: Some(weight),
        });

        self.control().request(req).await?;
        Ok(())
    }

    /// Remove a tag from `peer`.
    pub async fn connmgr_untag_peer(&self, peer: &PeerId, tag: &str) -> Result<()> {
        self.ensure_open()?;
        debug!("CONNMANAGER UNTAG_PEER {} {}", peer, tag);

        let req = wrap(pb::ConnManagerRequest {
            r#type: pb::conn_manager_request::Type::UntagPeer as i32,
            peer: Some(peer.to_bytes()),
            tag: Some(tag.to_string()),
            weight: None,
        });

        self.control().request(req).await?;
        Ok(())
    }

    /// Ask the daemon to prune low-weighted connections.
    pub async fn connmgr_trim(&self) -> Result<()> {
        self.ensure_open()?;
        debug!("CONNMANAGER TRIM");

        let req = wrap(pb::ConnManagerRequest {
            r#type: pb::conn_manager_request::Type::Trim as i32,
            peer: None,
            tag: None,
            weight: None,
        });

        self.control().request(req).await?;
        Ok(())
    }
}
