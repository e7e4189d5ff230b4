//! Desired address records
//!
//! A [`DesiredRecord`] is what the caller asked for: one hostname mapped to
//! one IP address. It is built by the request parser and never changes
//! afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// TTL value meaning "automatic" at the provider
pub const AUTO_TTL: u32 = 1;

/// DNS address record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Classify an IP string: a literal dot means IPv4, anything else IPv6
    pub fn for_content(content: &str) -> Self {
        if content.contains('.') {
            RecordType::A
        } else {
            RecordType::Aaaa
        }
    }

    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hostname → IP mapping requested by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRecord {
    /// Hostname, exactly as given in the request
    pub name: String,

    /// Record type, derived from `content`
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// IP address string, exactly as given in the request
    pub content: String,

    /// Time-to-live
    pub ttl: u32,
}

impl DesiredRecord {
    /// Build a desired record for `name` pointing at `content`
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            record_type: RecordType::for_content(&content),
            content,
            ttl: AUTO_TTL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_content() {
        assert_eq!(RecordType::for_content("203.0.113.5"), RecordType::A);
        assert_eq!(RecordType::for_content("2001:db8::1"), RecordType::Aaaa);
        // Only the dot matters; no parsing happens here
        assert_eq!(RecordType::for_content("::ffff:192.0.2.1"), RecordType::A);
        assert_eq!(RecordType::for_content("garbage"), RecordType::Aaaa);
    }

    #[test]
    fn test_desired_record_defaults() {
        let record = DesiredRecord::new("home.example.com", "198.51.100.9");
        assert_eq!(record.name, "home.example.com");
        assert_eq!(record.record_type, RecordType::A);
        assert_eq!(record.content, "198.51.100.9");
        assert_eq!(record.ttl, AUTO_TTL);
    }

    #[test]
    fn test_record_type_wire_names() {
        assert_eq!(RecordType::A.to_string(), "A");
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
        assert_eq!(
            serde_json::to_string(&RecordType::Aaaa).unwrap(),
            "\"AAAA\""
        );
    }
}
