//! Error types for conversion collaborators
//!
//! `BlockConverter::convert` itself is infallible: every failure below is
//! caught at its call site and degrades to dropping the offending node or
//! falling through to plain-paragraph handling. The variants here exist so
//! that collaborator implementations (media resolution, oEmbed lookup) can
//! report failures the host may choose to log.

use std::fmt;

/// Errors reported by conversion collaborators
#[derive(Debug)]
pub enum ConversionError {
    /// Image source could not be parsed into scheme/host/path
    InvalidSource(String),
    /// Media upload or resolution failed
    MediaResolution(String),
    /// oEmbed metadata lookup failed
    OEmbedLookup(String),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::InvalidSource(msg) => write!(f, "Invalid source URL: {}", msg),
            ConversionError::MediaResolution(msg) => write!(f, "Media resolution error: {}", msg),
            ConversionError::OEmbedLookup(msg) => write!(f, "oEmbed lookup error: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {}
