// src/core/protocol/codec.rs

//! Newline-delimited JSON framing for the session protocol, implemented as a
//! `tokio_util::codec` pair.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::core::errors::GameError;
use crate::core::protocol::envelope::Response;

/// Protocol-level limit on a single envelope, to bound memory per connection.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Decodes incoming lines into raw JSON values and encodes `Response`
/// envelopes. Decoding stops at the JSON layer on purpose: an envelope with
/// an unknown `category` must be reportable without tearing the connection
/// down, so the request parse happens above the codec.
#[derive(Debug, Default)]
pub struct EnvelopeCodec;

impl Decoder for EnvelopeCodec {
    type Item = serde_json::Value;
    type Error = GameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(newline) = src.iter().position(|&b| b == b'\n') else {
                if src.len() > MAX_LINE_LENGTH {
                    return Err(GameError::ProtocolViolation(
                        "envelope exceeds the maximum line length".into(),
                    ));
                }
                // Wait for more data.
                return Ok(None);
            };
            if newline > MAX_LINE_LENGTH {
                return Err(GameError::ProtocolViolation(
                    "envelope exceeds the maximum line length".into(),
                ));
            }
            let line = src.split_to(newline);
            src.advance(1);
            let trimmed = line.strip_suffix(b"\r").unwrap_or(&line);
            if trimmed.is_empty() {
                // Tolerate blank keep-alive lines.
                continue;
            }
            let value = serde_json::from_slice(trimmed)?;
            return Ok(Some(value));
        }
    }
}

impl Encoder<Response> for EnvelopeCodec {
    type Error = GameError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let encoded = serde_json::to_vec(&item)?;
        dst.reserve(encoded.len() + 1);
        dst.put_slice(&encoded);
        dst.put_u8(b'\n');
        Ok(())
    }
}
