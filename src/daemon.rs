//! Daemon lifecycle management
//!
//! Spawns, monitors, and shuts down a `p2pd` daemon process. Mainly test
//! support: integration suites start a private daemon, point a [`Client`]
//! at its control multiaddr, and tear it down afterwards.

use crate::client::Client;
use crate::error::{Error, Result};
use crate::transport::{self, Endpoint};
use libp2p::Multiaddr;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Configuration builder for the p2p daemon
pub struct DaemonBuilder {
    binary_path: Option<PathBuf>,
    control_addr: Option<Multiaddr>,
    bootstrap_peers: Vec<String>,
    dht: bool,
    dht_client: bool,
    pubsub: bool,
    pubsub_router: Option<String>,
    conn_manager: bool,
    conn_low: Option<u32>,
    conn_high: Option<u32>,
    conn_grace: Option<u32>,
    host_addrs: Vec<String>,
}

impl Default for DaemonBuilder {
    fn default() -> Self {
        Self {
            binary_path: None,
            control_addr: None,
            bootstrap_peers: Vec::new(),
            dht: false,
            dht_client: false,
            pubsub: false,
            pubsub_router: None,
            conn_manager: false,
            conn_low: None,
            conn_high: None,
            conn_grace: None,
            host_addrs: Vec::new(),
        }
    }
}

impl DaemonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path to the `p2pd` binary. Defaults to `$P2PD_BIN`, falling back to
    /// `p2pd` on PATH.
    pub fn with_binary_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.binary_path = Some(path.into());
        self
    }

    /// Control multiaddr the daemon listens on
    /// (`/unix/<path>` or `/ip4/<host>/tcp/<port>`).
    pub fn with_control_addr(mut self, addr: Multiaddr) -> Self {
        self.control_addr = Some(addr);
        self
    }

    /// Enable the DHT in full (server) mode
    pub fn dht(mut self, enable: bool) -> Self {
        self.dht = enable;
        self
    }

    /// Enable the DHT in client mode
    pub fn dht_client(mut self, enable: bool) -> Self {
        self.dht_client = enable;
        self
    }

    /// Enable pub/sub
    pub fn pubsub(mut self, enable: bool) -> Self {
        self.pubsub = enable;
        self
    }

    /// Select the pub/sub router (e.g. "gossipsub", "floodsub")
    pub fn pubsub_router<S: Into<String>>(mut self, router: S) -> Self {
        self.pubsub_router = Some(router.into());
        self
    }

    /// Enable the connection manager
    pub fn conn_manager(mut self, enable: bool) -> Self {
        self.conn_manager = enable;
        self
    }

    /// Connection manager watermarks and grace period (seconds)
    pub fn conn_limits(mut self, low: u32, high: u32, grace: u32) -> Self {
        self.conn_low = Some(low);
        self.conn_high = Some(high);
        self.conn_grace = Some(grace);
        self
    }

    /// Set the host multiaddrs the daemon listens on for p2p traffic
    pub fn host_addrs<I, S>(mut self, addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.host_addrs.extend(addrs.into_iter().map(|s| s.into()));
        self
    }

    /// Add a bootstrap peer
    pub fn bootstrap_peer<S: Into<String>>(mut self, peer: S) -> Self {
        self.bootstrap_peers.push(peer.into());
        self
    }

    /// Spawn the daemon process
    pub async fn spawn(self) -> Result<Daemon> {
        let binary_path = self.binary_path.unwrap_or_else(|| {
            PathBuf::from(std::env::var("P2PD_BIN").unwrap_or_else(|_| "p2pd".to_string()))
        });

        let control_addr = match self.control_addr {
            Some(addr) => addr,
            None => default_control_addr()?,
        };
        let endpoint = Endpoint::from_multiaddr(&control_addr)?;

        info!("starting p2pd from {}", binary_path.display());
        info!("control address: {}", control_addr);

        // A previous run may have left the control socket behind
        #[cfg(unix)]
        if let Endpoint::Unix(path) = &endpoint {
            if path.exists() {
                debug!("removing stale control socket at {}", path.display());
                let _ = std::fs::remove_file(path);
            }
        }

        let mut cmd = Command::new(&binary_path);
        cmd.arg("-listen").arg(control_addr.to_string());

        if self.dht {
            cmd.arg("-dht");
        }
        if self.dht_client {
            cmd.arg("-dhtClient");
        }
        if self.pubsub {
            cmd.arg("-pubsub");
        }
        if let Some(router) = &self.pubsub_router {
            cmd.arg("-pubsubRouter").arg(router);
        }
        if self.conn_manager {
            cmd.arg("-connManager");
        }
        if let Some(low) = self.conn_low {
            cmd.arg("-connLo").arg(low.to_string());
        }
        if let Some(high) = self.conn_high {
            cmd.arg("-connHi").arg(high.to_string());
        }
        if let Some(grace) = self.conn_grace {
            cmd.arg("-connGrace").arg(grace.to_string());
        }
        if !self.host_addrs.is_empty() {
            cmd.arg("-hostAddrs").arg(self.host_addrs.join(","));
        }
        for peer in &self.bootstrap_peers {
            cmd.arg("-bootstrapPeers").arg(peer);
        }

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!("spawning daemon: {:?}", cmd);

        let child = cmd.spawn().map_err(|e| {
            Error::Process(format!(
                "failed to spawn daemon at {}: {}",
                binary_path.display(),
                e
            ))
        })?;

        info!("daemon process spawned (PID: {:?})", child.id());

        Ok(Daemon {
            process: Some(child),
            control_addr,
            endpoint,
        })
    }
}

/// Default control address: a unique Unix socket in the temp directory on
/// Unix, TCP loopback elsewhere.
fn default_control_addr() -> Result<Multiaddr> {
    #[cfg(unix)]
    {
        let path = std::env::temp_dir().join(format!("p2pd-{}.sock", uuid::Uuid::new_v4()));
        let endpoint = Endpoint::Unix(path);
        Ok(endpoint.to_multiaddr())
    }
    #[cfg(not(unix))]
    {
        Ok("/ip4/127.0.0.1/tcp/5005"
            .parse()
            .expect("static multiaddr parses"))
    }
}

/// Handle to a running p2p daemon process
pub struct Daemon {
    process: Option<Child>,
    control_addr: Multiaddr,
    endpoint: Endpoint,
}

impl Daemon {
    pub fn builder() -> DaemonBuilder {
        DaemonBuilder::new()
    }

    /// Control multiaddr clients should connect to
    pub fn control_addr(&self) -> &Multiaddr {
        &self.control_addr
    }

    /// Create a client for this daemon, waiting for its control endpoint
    /// to come up first.
    pub async fn client(&self) -> Result<Client> {
        let mut attempts = 0;
        let max_attempts = 50;

        loop {
            match transport::dial(&self.endpoint).await {
                Ok(_) => break,
                Err(e) if attempts < max_attempts => {
                    attempts += 1;
                    debug!("control endpoint not ready (attempt {}): {}", attempts, e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
                Err(e) => return Err(e),
            }
        }

        Client::new(&self.control_addr)
    }

    /// Check if the daemon process is still running
    pub fn is_running(&mut self) -> bool {
        if let Some(child) = &mut self.process {
            child.try_wait().ok().flatten().is_none()
        } else {
            false
        }
    }

    /// Wait for the daemon to exit
    pub async fn wait(&mut self) -> Result<()> {
        if let Some(mut child) = self.process.take() {
            let status = child.wait().await?;
            if !status.success() {
                warn!("daemon exited with status: {:?}", status.code());
                return Err(Error::Process(format!(
                    "daemon exited with code: {:?}",
                    status.code()
                )));
            }
        }
        Ok(())
    }

    /// Shut the daemon down gracefully
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(mut child) = self.process.take() {
            info!("shutting down daemon...");

            #[cfg(unix)]
            {
                if let Some(pid) = child.id() {
                    unsafe {
                        libc::kill(pid as i32, libc::SIGTERM);
                    }
                }
            }

            #[cfg(not(unix))]
            {
                child.kill().await?;
            }

            tokio::time::timeout(tokio::time::Duration::from_secs(5), child.wait())
                .await
                .map_err(|_| Error::Timeout)?
                .map_err(|e| Error::Process(format!("failed to wait for daemon exit: {}", e)))?;

            info!("daemon shutdown complete");
        }
        Ok(())
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if let Some(mut child) = self.process.take() {
            if child.try_wait().ok().flatten().is_none() {
                warn!("daemon process still running, killing...");
                let _ = child.start_kill();
            }
        }
    }
}
