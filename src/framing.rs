//! Varint-length-delimited protobuf framing
//!
//! Every message on the control protocol is framed the same way: a base-128
//! varint carrying the payload length, followed by the protobuf payload.
//! The same framing prefixes daemon-forwarded streams (one `StreamInfo`
//! frame) and carries pub/sub deliveries and DHT result streams.

use crate::error::{Error, Result};
use bytes::BytesMut;
use prost::Message;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;
use unsigned_varint::encode as varint_encode;

/// Largest frame this client will read. The daemon does not pin a wire-level
/// maximum; this is a local sanity cap.
pub const MAX_FRAME_LEN: u64 = 64 * 1024 * 1024;

/// A u64 varint is at most 10 bytes.
const MAX_VARINT_LEN: usize = 10;

/// Write one framed message: varint length prefix, then the encoded payload.
pub async fn write_frame<S, M>(stream: &mut S, msg: &M) -> Result<()>
where
    S: AsyncWrite + Unpin,
    M: Message,
{
    let mut buf = BytesMut::with_capacity(msg.encoded_len());
    msg.encode(&mut buf)
        .map_err(|e| Error::Protocol(format!("failed to encode message: {}", e)))?;

    let mut len_buf = varint_encode::u64_buffer();
    let len_bytes = varint_encode::u64(buf.len() as u64, &mut len_buf);

    stream.write_all(len_bytes).await?;
    stream.write_all(&buf).await?;
    stream.flush().await?;

    trace!("wrote frame ({} bytes)", buf.len());
    Ok(())
}

/// Read one framed message. The stream closing anywhere before the payload
/// ends is an error; use [`try_read_frame`] where a clean end-of-stream is a
/// legal outcome.
pub async fn read_frame<S, M>(stream: &mut S) -> Result<M>
where
    S: AsyncRead + Unpin,
    M: Message + Default,
{
    match try_read_frame(stream).await? {
        Some(msg) => Ok(msg),
        None => Err(Error::Protocol(
            "stream closed before a frame arrived".to_string(),
        )),
    }
}

/// Read one framed message, or `None` if the stream closed cleanly at a
/// frame boundary. Streaming DHT queries and subscription readers end this
/// way when the daemon hangs up.
pub async fn try_read_frame<S, M>(stream: &mut S) -> Result<Option<M>>
where
    S: AsyncRead + Unpin,
    M: Message + Default,
{
    let len = match read_len_prefix(stream).await? {
        Some(len) => len,
        None => return Ok(None),
    };

    if len > MAX_FRAME_LEN {
        return Err(Error::Protocol(format!("frame too large: {} bytes", len)));
    }

    let mut payload = vec![0u8; len as usize];
    stream.read_exact(&mut payload).await?;

    trace!("read frame ({} bytes)", payload.len());

    let msg = M::decode(&payload[..])?;
    Ok(Some(msg))
}

/// Read the varint length prefix byte by byte. `None` means the stream
/// closed before the first byte; closing mid-prefix is an error, as are
/// non-minimal encodings and prefixes running past 10 bytes.
async fn read_len_prefix<S>(stream: &mut S) -> Result<Option<u64>>
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0u8; MAX_VARINT_LEN];

    for i in 0..MAX_VARINT_LEN {
        let mut byte = [0u8; 1];
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            if i == 0 {
                return Ok(None);
            }
            return Err(Error::Protocol(
                "stream closed inside a length prefix".to_string(),
            ));
        }

        buf[i] = byte[0];

        // MSB clear marks the last varint byte
        if byte[0] & 0x80 == 0 {
            let (len, _) = unsigned_varint::decode::u64(&buf[..=i])
                .map_err(|e| Error::Protocol(format!("invalid length prefix: {}", e)))?;
            return Ok(Some(len));
        }
    }

    Err(Error::Protocol(
        "length prefix exceeds 10 bytes".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::p2pd as pb;

    #[test]
    fn varint_roundtrip() {
        let len = 300u64;

        let mut len_buf = varint_encode::u64_buffer();
        let len_bytes = varint_encode::u64(len, &mut len_buf);

        let (decoded, rest) = unsigned_varint::decode::u64(len_bytes).unwrap();
        assert_eq!(decoded, len);
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn frame_roundtrip() {
        let (mut a, mut b) = tokio::io::duplex(1024);

        let msg = pb::StreamInfo {
            peer: vec![1, 2, 3],
            addr: vec![4, 5, 6],
            proto: "/echo/1.0".to_string(),
        };
        write_frame(&mut a, &msg).await.unwrap();

        let decoded: pb::StreamInfo = read_frame(&mut b).await.unwrap();
        assert_eq!(decoded, msg);
    }

    #[tokio::test]
    async fn zero_length_frame_decodes_empty_message() {
        let (mut a, mut b) = tokio::io::duplex(16);

        tokio::io::AsyncWriteExt::write_all(&mut a, &[0x00]).await.unwrap();
        drop(a);

        let decoded: pb::PsMessage = read_frame(&mut b).await.unwrap();
        assert_eq!(decoded, pb::PsMessage::default());
    }

    #[tokio::test]
    async fn reads_frames_split_across_arbitrary_chunks() {
        let msg = pb::StreamInfo {
            peer: vec![0xab; 40],
            addr: vec![0xcd; 40],
            proto: "/chunked/1.0".to_string(),
        };
        let mut encoded = Vec::new();
        let mut len_buf = varint_encode::u64_buffer();
        encoded.extend_from_slice(varint_encode::u64(
            prost::Message::encoded_len(&msg) as u64,
            &mut len_buf,
        ));
        prost::Message::encode(&msg, &mut encoded).unwrap();

        // deliver the frame one and two bytes at a time
        let mut builder = tokio_test::io::Builder::new();
        for chunk in encoded.chunks(2) {
            builder.read(chunk);
        }
        let mut mock = builder.build();

        let decoded: pb::StreamInfo = read_frame(&mut mock).await.unwrap();
        assert_eq!(decoded, msg);
    }

    #[tokio::test]
    async fn clean_eof_yields_none() {
        let (a, mut b) = tokio::io::duplex(16);
        drop(a);

        let decoded: Option<pb::PsMessage> = try_read_frame(&mut b).await.unwrap();
        assert!(decoded.is_none());
    }

    #[tokio::test]
    async fn eof_mid_frame_is_an_error() {
        let (mut a, mut b) = tokio::io::duplex(16);

        // length prefix of 5, then only two payload bytes
        tokio::io::AsyncWriteExt::write_all(&mut a, &[0x05, 0xaa, 0xbb])
            .await
            .unwrap();
        drop(a);

        let err = read_frame::<_, pb::PsMessage>(&mut b).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn rejects_frame_over_cap() {
        let (mut a, mut b) = tokio::io::duplex(32);

        let mut len_buf = varint_encode::u64_buffer();
        let len_bytes = varint_encode::u64(MAX_FRAME_LEN + 1, &mut len_buf);
        tokio::io::AsyncWriteExt::write_all(&mut a, len_bytes).await.unwrap();

        let err = read_frame::<_, pb::PsMessage>(&mut b).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn rejects_non_minimal_varint() {
        let (mut a, mut b) = tokio::io::duplex(16);

        // 0 encoded in two bytes
        tokio::io::AsyncWriteExt::write_all(&mut a, &[0x80, 0x00]).await.unwrap();

        let err = read_frame::<_, pb::PsMessage>(&mut b).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn rejects_overlong_varint() {
        let (mut a, mut b) = tokio::io::duplex(16);

        tokio::io::AsyncWriteExt::write_all(&mut a, &[0x80; 10]).await.unwrap();

        let err = read_frame::<_, pb::PsMessage>(&mut b).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }
}
