//! Block value type and comment-delimited rendering
//!
//! A [`Block`] is one named, attributed unit of output markup. Rendering
//! wraps the literal content in a machine-readable comment pair:
//!
//! ```text
//! <!-- block:heading {"level":1} --><h1>Title</h1><!-- /block:heading -->
//! ```
//!
//! Attributes are serialized as compact JSON in insertion order and omitted
//! entirely when the map is empty. Content is emitted verbatim, never
//! re-escaped. Fields are public so the per-block override hook can replace
//! `content` or `attributes` after a rule constructs the block and before it
//! is rendered.

use serde_json::{Map, Value};
use std::fmt;

/// A named, attributed unit of output markup
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block name, never empty once constructed
    pub name: String,
    /// JSON attribute map, rendered in insertion order
    pub attributes: Map<String, Value>,
    /// Literal inner markup; `None` renders as empty content
    pub content: Option<String>,
}

impl Block {
    /// Create a block with no attributes
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Map::new(),
            content: Some(content.into()),
        }
    }

    /// Create a block with attributes
    pub fn with_attributes(
        name: impl Into<String>,
        attributes: Map<String, Value>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            content: Some(content.into()),
        }
    }

    /// Render the block to its comment-delimited textual form
    ///
    /// Pure: the block is not consumed or mutated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use block_converter::Block;
    ///
    /// let block = Block::new("paragraph", "<p>Hi</p>");
    /// assert_eq!(
    ///     block.render(),
    ///     "<!-- block:paragraph --><p>Hi</p><!-- /block:paragraph -->"
    /// );
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<!-- block:");
        out.push_str(&self.name);

        if !self.attributes.is_empty() {
            // serde_json cannot fail on a Map of already-valid Values
            if let Ok(json) = serde_json::to_string(&self.attributes) {
                out.push(' ');
                out.push_str(&json);
            }
        }

        out.push_str(" -->");
        if let Some(content) = &self.content {
            out.push_str(content);
        }
        out.push_str("<!-- /block:");
        out.push_str(&self.name);
        out.push_str(" -->");

        out
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_without_attributes() {
        let block = Block::new("paragraph", "<p>bar</p>");
        assert_eq!(
            block.render(),
            "<!-- block:paragraph --><p>bar</p><!-- /block:paragraph -->"
        );
    }

    #[test]
    fn test_render_with_attributes_in_insertion_order() {
        let mut attrs = Map::new();
        attrs.insert("url".to_string(), json!("https://example.com"));
        attrs.insert("type".to_string(), json!("rich"));
        attrs.insert("responsive".to_string(), json!(true));

        let block = Block::with_attributes("embed", attrs, "content");
        assert_eq!(
            block.render(),
            "<!-- block:embed {\"url\":\"https://example.com\",\"type\":\"rich\",\"responsive\":true} -->content<!-- /block:embed -->"
        );
    }

    #[test]
    fn test_render_heading_level_attribute() {
        let mut attrs = Map::new();
        attrs.insert("level".to_string(), json!(1));

        let block = Block::with_attributes("heading", attrs, "<h1>Heading 01</h1>");
        assert_eq!(
            block.render(),
            "<!-- block:heading {\"level\":1} --><h1>Heading 01</h1><!-- /block:heading -->"
        );
    }

    #[test]
    fn test_render_with_no_content() {
        let block = Block {
            name: "separator".to_string(),
            attributes: Map::new(),
            content: None,
        };
        assert_eq!(
            block.render(),
            "<!-- block:separator --><!-- /block:separator -->"
        );
    }

    #[test]
    fn test_display_matches_render() {
        let block = Block::new("quote", "<blockquote>Q</blockquote>");
        assert_eq!(block.to_string(), block.render());
    }

    #[test]
    fn test_hook_style_content_mutation() {
        let mut block = Block::new("paragraph", "<p>original</p>");
        block.content = Some("Override content".to_string());
        assert_eq!(
            block.render(),
            "<!-- block:paragraph -->Override content<!-- /block:paragraph -->"
        );
    }
}
