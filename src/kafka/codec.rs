//! Envelope codec: the wire contract shared by the publisher and consumers.
//!
//! The body is the JSON-serialized `Envelope<T>`; the transport headers carry
//! the same identity fields so operators can inspect messages without parsing
//! the body. Encoding and decoding are side-effect-free; a decode failure is
//! terminal for the message (replay would fail identically), which is why the
//! dispatch layer routes it to the dead-letter sink instead of retrying.

use rdkafka::message::{Header, OwnedHeaders};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::Envelope;

pub const HEADER_EVENT_KIND: &str = "event-kind";
pub const HEADER_MESSAGE_ID: &str = "message-id";
pub const HEADER_EMPLOYEE_ID: &str = "employee-id";
pub const HEADER_SOURCE: &str = "source";
pub const HEADER_CONTENT_TYPE: &str = "content-type";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Serialize an envelope into a message body plus transport headers.
pub fn encode<T: Serialize>(
    envelope: &Envelope<T>,
) -> Result<(Vec<u8>, OwnedHeaders), serde_json::Error> {
    let body = serde_json::to_vec(envelope)?;

    let headers = OwnedHeaders::new()
        .insert(Header {
            key: HEADER_EVENT_KIND,
            value: Some(envelope.kind.as_str()),
        })
        .insert(Header {
            key: HEADER_MESSAGE_ID,
            value: Some(envelope.message_id.as_str()),
        })
        .insert(Header {
            key: HEADER_EMPLOYEE_ID,
            value: Some(envelope.employee_id.as_str()),
        })
        .insert(Header {
            key: HEADER_SOURCE,
            value: Some(envelope.source.as_str()),
        })
        .insert(Header {
            key: HEADER_CONTENT_TYPE,
            value: Some(CONTENT_TYPE_JSON),
        });

    Ok((body, headers))
}

/// Deserialize a message body into a typed envelope.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<Envelope<T>, serde_json::Error> {
    serde_json::from_slice(payload)
}
