//! Stream event wrapper.
//!
//! Pairs a decoded payload with its stream entry id so consumers can
//! acknowledge exactly what they processed.

use chrono::{DateTime, Utc};

/// An event read from a stream
#[derive(Debug, Clone)]
pub struct StreamEvent<J> {
    /// Redis stream entry ID (e.g., "1234567890123-0")
    pub stream_id: String,

    /// The decoded payload
    pub payload: J,

    /// When the event was appended (parsed from the stream ID)
    pub timestamp: DateTime<Utc>,
}

impl<J> StreamEvent<J> {
    pub fn new(stream_id: String, payload: J) -> Self {
        let timestamp = Self::parse_timestamp(&stream_id);
        Self {
            stream_id,
            payload,
            timestamp,
        }
    }

    /// Parse the timestamp from a Redis stream ID ("timestamp_ms-sequence")
    fn parse_timestamp(stream_id: &str) -> DateTime<Utc> {
        stream_id
            .split('-')
            .next()
            .and_then(|ts| ts.parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now)
    }

    /// Get how long ago the event was appended, in milliseconds
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.timestamp).num_milliseconds()
    }
}
