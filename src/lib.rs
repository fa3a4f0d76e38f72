//! Block Converter - HTML fragments to comment-delimited block markup
//!
//! This library converts legacy HTML content into a block-based content
//! model: each top-level element becomes one block of the shape
//! `<!-- block:<name> <json-attrs> -->content<!-- /block:<name> -->`.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: HTML5 fragment parsing using html5ever, plus DOM helpers
//! - `block`: the `Block` value type and its comment-delimited rendering
//! - `converter`: the document walk and built-in per-tag rule table
//! - `embed`: bare-URL provider classification into `embed` blocks
//! - `media`: image source sanitization and the media collaborator trait
//! - `rules`: process-wide caller-registered tag rules
//! - `normalize`: whitespace minification and empty-block elimination
//! - `error`: error types for collaborator interfaces
//!
//! # Quick Start
//!
//! ```rust
//! use block_converter::BlockConverter;
//!
//! let converter = BlockConverter::new();
//! let blocks = converter.convert("<h1>Title</h1><p>Body</p>");
//! assert!(blocks.contains("<!-- block:heading"));
//! assert!(blocks.contains("<!-- block:paragraph"));
//! ```

// Module declarations
pub mod block;
pub mod converter;
pub mod embed;
pub mod error;
pub mod media;
pub mod normalize;
pub mod parser;
pub mod rules;

// Re-export main types for convenience
pub use block::Block;
pub use converter::{BlockConverter, BlockHook, DocumentHook};
pub use embed::{NullOEmbedClient, OEmbedClient, ProviderMetadata};
pub use error::ConversionError;
pub use media::{MediaResolver, PassthroughMediaResolver};
pub use rules::register_tag_rule;
