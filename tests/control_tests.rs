//! Request/response behavior of the client facade against a fake daemon.

mod support;

use p2pd_client::framing;
use p2pd_client::p2pd as pb;
use p2pd_client::{Client, Error, Multiaddr};
use support::FakeDaemon;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn identify_returns_daemon_identity() {
    support::init_tracing();
    let pid = support::test_peer_id(1);
    let daemon_addr: Multiaddr = "/ip4/1.2.3.4/tcp/4001".parse().unwrap();

    let id_bytes = pid.to_bytes();
    let addr_bytes = daemon_addr.to_vec();
    let daemon = FakeDaemon::start(move |req, mut stream| {
        let id_bytes = id_bytes.clone();
        let addr_bytes = addr_bytes.clone();
        async move {
            let resp = if req.r#type == pb::request::Type::Identify as i32 {
                pb::Response {
                    identify: Some(pb::IdentifyResponse {
                        id: id_bytes,
                        addrs: vec![addr_bytes],
                    }),
                    ..support::ok_response()
                }
            } else {
                support::error_response("unexpected request")
            };
            framing::write_frame(&mut stream, &resp).await.unwrap();
        }
    })
    .await;

    let client = Client::new(daemon.control_addr()).unwrap();
    let (got_pid, got_addrs) = client.identify().await.unwrap();
    assert_eq!(got_pid, pid);
    assert_eq!(got_addrs, vec![daemon_addr]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn daemon_errors_surface_to_the_caller() {
    let daemon = FakeDaemon::start(|_req, mut stream| async move {
        framing::write_frame(&mut stream, &support::error_response("no addresses"))
            .await
            .unwrap();
    })
    .await;

    let client = Client::new(daemon.control_addr()).unwrap();
    let peer = support::test_peer_id(6);

    let err = client.connect(&peer, &[]).await.unwrap_err();
    assert!(matches!(err, Error::Daemon(msg) if msg == "no addresses"));

    // a failed request must not poison the client
    let err = client.connect(&peer, &[]).await.unwrap_err();
    assert!(matches!(err, Error::Daemon(_)));

    client.close().await.unwrap();
}

#[tokio::test]
async fn unknown_response_type_is_rejected() {
    let daemon = FakeDaemon::start(|_req, mut stream| async move {
        let resp = pb::Response {
            r#type: 7,
            ..Default::default()
        };
        framing::write_frame(&mut stream, &resp).await.unwrap();
    })
    .await;

    let client = Client::new(daemon.control_addr()).unwrap();
    let err = client.list_peers().await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[tokio::test]
async fn list_peers_maps_peer_infos() {
    let pid = support::test_peer_id(2);
    let addr: Multiaddr = "/ip4/10.0.0.1/tcp/4001".parse().unwrap();

    let id_bytes = pid.to_bytes();
    let addr_bytes = addr.to_vec();
    let daemon = FakeDaemon::start(move |req, mut stream| {
        let id_bytes = id_bytes.clone();
        let addr_bytes = addr_bytes.clone();
        async move {
            let resp = if req.r#type == pb::request::Type::ListPeers as i32 {
                pb::Response {
                    peers: vec![pb::PeerInfo {
                        id: id_bytes,
                        addrs: vec![addr_bytes],
                    }],
                    ..support::ok_response()
                }
            } else {
                support::error_response("unexpected request")
            };
            framing::write_frame(&mut stream, &resp).await.unwrap();
        }
    })
    .await;

    let client = Client::new(daemon.control_addr()).unwrap();
    let peers = client.list_peers().await.unwrap();
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].peer_id, pid);
    assert_eq!(peers[0].addrs, vec![addr]);
}

#[tokio::test]
async fn dht_get_value_returns_payload() {
    let daemon = FakeDaemon::start(|req, mut stream| async move {
        let is_get_value = req.r#type == pb::request::Type::Dht as i32
            && req
                .dht
                .as_ref()
                .map(|d| d.r#type == pb::dht_request::Type::GetValue as i32)
                .unwrap_or(false);
        let resp = if is_get_value {
            pb::Response {
                dht: Some(pb::DhtResponse {
                    r#type: pb::dht_response::Type::Value as i32,
                    peer: None,
                    value: Some(b"hello".to_vec()),
                }),
                ..support::ok_response()
            }
        } else {
            support::error_response("unexpected request")
        };
        framing::write_frame(&mut stream, &resp).await.unwrap();
    })
    .await;

    let client = Client::new(daemon.control_addr()).unwrap();
    let value = client.dht_get_value(b"key").await.unwrap();
    assert_eq!(value, b"hello");
}

#[tokio::test]
async fn stream_open_rejects_empty_protocol_list() {
    let control: Multiaddr = "/ip4/127.0.0.1/tcp/1".parse().unwrap();
    let client = Client::new(&control).unwrap();

    let err = client
        .stream_open(&support::test_peer_id(9), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn stream_open_hands_over_live_duplex() {
    let peer = support::test_peer_id(8);
    let remote: Multiaddr = "/ip4/10.0.0.2/tcp/4001".parse().unwrap();

    let peer_bytes = peer.to_bytes();
    let remote_bytes = remote.to_vec();
    let daemon = FakeDaemon::start(move |req, mut stream| {
        let peer_bytes = peer_bytes.clone();
        let remote_bytes = remote_bytes.clone();
        async move {
            if req.r#type != pb::request::Type::StreamOpen as i32 {
                framing::write_frame(&mut stream, &support::error_response("unexpected request"))
                    .await
                    .unwrap();
                return;
            }
            let resp = pb::Response {
                stream_info: Some(pb::StreamInfo {
                    peer: peer_bytes,
                    addr: remote_bytes,
                    proto: "/echo/1.0".to_string(),
                }),
                ..support::ok_response()
            };
            framing::write_frame(&mut stream, &resp).await.unwrap();

            // the duplex is now the application stream
            let mut buf = [0u8; 4];
            stream.read_exact(&mut buf).await.unwrap();
            assert_eq!(&buf, b"ping");
            stream.write_all(b"pong").await.unwrap();
        }
    })
    .await;

    let client = Client::new(daemon.control_addr()).unwrap();
    let (info, mut stream) = client
        .stream_open(&peer, &["/echo/1.0".to_string()])
        .await
        .unwrap();
    assert_eq!(info.peer, peer);
    assert_eq!(info.addr, remote);
    assert_eq!(info.proto, "/echo/1.0");

    stream.write_all(b"ping").await.unwrap();
    let mut buf = [0u8; 4];
    stream.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"pong");
}

#[tokio::test]
async fn connmgr_requests_carry_tag_and_weight() {
    let daemon = FakeDaemon::start(|req, mut stream| async move {
        let ok = req.r#type == pb::request::Type::Connmanager as i32
            && req
                .conn_manager
                .as_ref()
                .map(|c| {
                    c.r#type == pb::conn_manager_request::Type::TagPeer as i32
                        && c.tag.as_deref() == Some("keep")
                        && c.weight == Some(42)
                })
                .unwrap_or(false);
        let resp = if ok {
            support::ok_response()
        } else {
            support::error_response("unexpected request")
        };
        framing::write_frame(&mut stream, &resp).await.unwrap();
    })
    .await;

    let client = Client::new(daemon.control_addr()).unwrap();
    let peer = support::test_peer_id(10);
    client.connmgr_tag_peer(&peer, "keep", 42).await.unwrap();
}
