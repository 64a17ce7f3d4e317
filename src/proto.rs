//! Protobuf protocol definitions for daemon communication
//!
//! The wire schema lives in `proto/p2pd.proto` (go-libp2p-daemon v0.2.0).
//! The generated prost code is vendored under `src/proto/` so that building
//! this crate needs neither protoc nor a network connection; regenerate with
//! `prost-build` whenever the proto file changes.

pub mod p2pd;
