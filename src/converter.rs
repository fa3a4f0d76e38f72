//! Block converter - transforms an HTML fragment into block markup
//!
//! This module provides the core conversion logic: the walk over the
//! fragment's top-level children, per-tag rule dispatch, and the joining and
//! post-processing of the rendered blocks.
//!
//! # Conversion Strategy
//!
//! The converter iterates the direct children of the parsed fragment's
//! synthetic root in document order and classifies each by tag name:
//!
//! 1. **Rule resolution**: a caller-registered rule (see [`crate::rules`])
//!    takes priority; otherwise the built-in rule table applies.
//! 2. **Hook**: the produced block (or `None`) passes through the per-block
//!    override hook, which may replace or suppress it.
//! 3. **Rendering**: accepted blocks are rendered to their comment-delimited
//!    form, individually minified, and joined with a blank line.
//! 4. **Post-processing**: empty-shell blocks are eliminated, the
//!    whole-document override hook runs, and the result is trimmed.
//!
//! Text nodes between top-level siblings never become blocks. Comment nodes
//! dispatch to the `html` fallback rule under the `#comment` tag name.
//!
//! # Built-in Rule Table
//!
//! | tag(s) | block | notes |
//! |---|---|---|
//! | `h1`..`h6` | `heading` | `{"level":n}`; dropped when text is empty |
//! | `blockquote` | `quote` | dropped when text is empty |
//! | `p`, `a`, `abbr`, `b`, `code`, `em`, `i`, `strong`, `sub`, `sup`, `span`, `u` | `paragraph` | bare provider URLs become `embed` blocks first |
//! | `ul` / `ol` | `list` | `ol` carries `{"ordered":true}`; never dropped |
//! | `img` | `image` | synthesized figure markup; dropped on resolution failure |
//! | `hr` | `separator` | fixed `<hr/>` markup; never dropped |
//! | `br`, `cite`, `source` | — | always dropped |
//! | anything else | `html` | node's own markup; dropped when empty |
//!
//! # Failure Behavior
//!
//! `convert` is infallible. Collaborator failures (media resolution, oEmbed
//! lookup) degrade to dropping the node or falling through to plain
//! paragraph handling, and are logged via `tracing`. The worst case for any
//! input is an empty output string.
//!
//! # Examples
//!
//! ```rust
//! use block_converter::BlockConverter;
//!
//! let converter = BlockConverter::new();
//! let output = converter.convert("<p>Content to migrate</p><h1>Heading 01</h1>");
//!
//! assert_eq!(
//!     output,
//!     "<!-- block:paragraph --><p>Content to migrate</p><!-- /block:paragraph -->\n\n\
//!      <!-- block:heading {\"level\":1} --><h1>Heading 01</h1><!-- /block:heading -->"
//! );
//! ```

use markup5ever_rcdom::{Handle, NodeData};
use serde_json::{Map, json};

use crate::block::Block;
use crate::embed::{NullOEmbedClient, OEmbedClient, classify_embed};
use crate::media::{MediaResolver, PassthroughMediaResolver, strip_image_args};
use crate::normalize::{minify_block, remove_empty_blocks};
use crate::parser::{
    fragment_root, get_attribute, parse_fragment, serialize_node, tag_name, text_content,
};
use crate::rules;

/// Per-block override hook
///
/// Receives the block produced for a node (or `None` when the rule dropped
/// it) together with the source node, and returns the block to use. This is
/// the primary extension point.
pub type BlockHook = Box<dyn Fn(Option<Block>, &Handle) -> Option<Block> + Send + Sync>;

/// Whole-document override hook
///
/// Receives the joined, cleaned output and the original top-level node list,
/// and may replace the entire output. This is the secondary extension point.
pub type DocumentHook = Box<dyn Fn(String, &[Handle]) -> String + Send + Sync>;

/// Main block converter
///
/// Owns the collaborator interfaces (media resolution, oEmbed lookup) and
/// the two override hooks. Each `convert` call is independent: no block or
/// DOM node is retained across calls, so one converter can serve many
/// conversions.
///
/// # Usage
///
/// ```rust
/// use block_converter::BlockConverter;
///
/// // Default collaborators: passthrough media, no oEmbed providers
/// let converter = BlockConverter::new();
/// let blocks = converter.convert("<h2>Title</h2>");
/// assert!(blocks.starts_with("<!-- block:heading {\"level\":2} -->"));
/// ```
pub struct BlockConverter {
    media: Box<dyn MediaResolver + Send + Sync>,
    oembed: Box<dyn OEmbedClient + Send + Sync>,
    block_hook: Option<BlockHook>,
    document_hook: Option<DocumentHook>,
}

impl Default for BlockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockConverter {
    /// Create a converter with default collaborators
    ///
    /// The defaults keep image URLs as-is ([`PassthroughMediaResolver`]) and
    /// recognize no oEmbed providers ([`NullOEmbedClient`]); both hooks are
    /// identity.
    pub fn new() -> Self {
        Self {
            media: Box::new(PassthroughMediaResolver),
            oembed: Box::new(NullOEmbedClient),
            block_hook: None,
            document_hook: None,
        }
    }

    /// Replace the media resolution collaborator
    pub fn with_media_resolver(mut self, media: impl MediaResolver + Send + Sync + 'static) -> Self {
        self.media = Box::new(media);
        self
    }

    /// Replace the oEmbed lookup collaborator
    pub fn with_oembed_client(mut self, oembed: impl OEmbedClient + Send + Sync + 'static) -> Self {
        self.oembed = Box::new(oembed);
        self
    }

    /// Install the per-block override hook
    pub fn on_block<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<Block>, &Handle) -> Option<Block> + Send + Sync + 'static,
    {
        self.block_hook = Some(Box::new(hook));
        self
    }

    /// Install the whole-document override hook
    pub fn on_document<F>(mut self, hook: F) -> Self
    where
        F: Fn(String, &[Handle]) -> String + Send + Sync + 'static,
    {
        self.document_hook = Some(Box::new(hook));
        self
    }

    /// Convert an HTML fragment to block markup
    ///
    /// Never fails: malformed markup is recovered by the parser, collaborator
    /// failures drop the affected node, and the worst case is an empty
    /// string.
    pub fn convert(&self, html: &str) -> String {
        let dom = parse_fragment(html);
        let Some(root) = fragment_root(&dom) else {
            return String::new();
        };

        let children: Vec<Handle> = root.children.borrow().iter().cloned().collect();
        if children.is_empty() {
            return String::new();
        }

        let mut rendered: Vec<String> = Vec::new();
        for node in &children {
            // Loose text between top-level siblings never becomes a block
            if matches!(node.data, NodeData::Text { .. }) {
                continue;
            }

            let block = self.dispatch(node);
            let block = match &self.block_hook {
                Some(hook) => hook(block, node),
                None => block,
            };

            match block {
                Some(block) => rendered.push(minify_block(&block.render())),
                None => tracing::debug!("top-level node dropped"),
            }
        }

        let joined = rendered.join("\n\n");
        let cleaned = remove_empty_blocks(&joined);

        let output = match &self.document_hook {
            Some(hook) => hook(cleaned, &children),
            None => cleaned,
        };

        output.trim().to_string()
    }

    /// Resolve and invoke the rule for one top-level node
    ///
    /// Registered rules are checked before the built-in table and fully
    /// replace the built-in handling for their tag name.
    fn dispatch(&self, node: &Handle) -> Option<Block> {
        let tag = match node.data {
            NodeData::Element { .. } => tag_name(node)?,
            NodeData::Comment { .. } => "#comment".to_string(),
            _ => return None,
        };

        if let Some(rule) = rules::registered_rule(&tag) {
            return rule(node);
        }

        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.heading(node, &tag),
            "blockquote" => self.quote(node),
            "p" | "a" | "abbr" | "b" | "code" | "em" | "i" | "strong" | "sub" | "sup" | "span"
            | "u" => self.paragraph(node),
            "ul" => Some(self.list(node, false)),
            "ol" => Some(self.list(node, true)),
            "img" => self.image(node),
            "hr" => Some(self.separator()),
            "br" | "cite" | "source" => None,
            _ => self.html_fallback(node),
        }
    }

    /// `heading` block with the level taken from the tag name
    fn heading(&self, node: &Handle, tag: &str) -> Option<Block> {
        if text_content(node).trim().is_empty() {
            return None;
        }

        let level: u64 = tag.strip_prefix('h')?.parse().ok()?;
        let mut attributes = Map::new();
        attributes.insert("level".to_string(), json!(level));

        Some(Block::with_attributes(
            "heading",
            attributes,
            serialize_node(node),
        ))
    }

    /// `quote` block wrapping the node's own markup
    fn quote(&self, node: &Handle) -> Option<Block> {
        if text_content(node).trim().is_empty() {
            return None;
        }

        Some(Block::new("quote", serialize_node(node)))
    }

    /// `paragraph` block, with the bare-URL embed special case
    ///
    /// When the node's entire text is an absolute provider URL the embed
    /// classifier takes over; otherwise the node's own markup becomes a
    /// paragraph block. Empty `<p></p>` shells are produced here and removed
    /// later by the empty-block eliminator.
    fn paragraph(&self, node: &Handle) -> Option<Block> {
        if let Some(embed) = classify_embed(&text_content(node), self.oembed.as_ref()) {
            return Some(embed);
        }

        let html = serialize_node(node);
        if html.is_empty() {
            return None;
        }

        Some(Block::new("paragraph", html))
    }

    /// `list` block; ordered lists carry `{"ordered":true}`
    ///
    /// Lists are always produced, even when empty.
    fn list(&self, node: &Handle, ordered: bool) -> Block {
        let content = serialize_node(node);
        if ordered {
            let mut attributes = Map::new();
            attributes.insert("ordered".to_string(), json!(true));
            Block::with_attributes("list", attributes, content)
        } else {
            Block::new("list", content)
        }
    }

    /// `image` block with a synthesized figure and a resolved source URL
    ///
    /// The original `data-srcset` attribute is preferred over `src`. The
    /// source is stripped of query/fragment arguments and handed to the
    /// media collaborator; any failure drops the node.
    fn image(&self, node: &Handle) -> Option<Block> {
        let alt = get_attribute(node, "alt").unwrap_or_default();
        let src = get_attribute(node, "data-srcset")
            .filter(|s| !s.is_empty())
            .or_else(|| get_attribute(node, "src"))
            .filter(|s| !s.is_empty())?;

        let Some(stripped) = strip_image_args(&src) else {
            tracing::warn!(src = %src, "image source not an absolute URL, dropping node");
            return None;
        };

        let resolved = match self.media.resolve(&stripped, &alt) {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => {
                tracing::warn!(src = %stripped, "media resolver returned empty URL, dropping node");
                return None;
            }
            Err(error) => {
                tracing::warn!(%error, src = %stripped, "media resolution failed, dropping node");
                return None;
            }
        };

        let content = format!(
            "<figure class=\"wp-block-image\"><img src=\"{}\" alt=\"{}\"/></figure>",
            escape_attribute(&resolved),
            escape_attribute(&alt)
        );

        Some(Block::new("image", content))
    }

    /// `separator` block with fixed markup
    fn separator(&self) -> Block {
        Block::new(
            "separator",
            "<hr class=\"wp-block-separator has-alpha-channel-opacity\"/>",
        )
    }

    /// `html` fallback block for unrecognized tags and comments
    fn html_fallback(&self, node: &Handle) -> Option<Block> {
        let html = serialize_node(node);
        if html.is_empty() {
            return None;
        }

        Some(Block::new("html", html))
    }
}

/// Escape a value for use inside a double-quoted HTML attribute
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;

    #[test]
    fn test_convert_content_to_blocks() {
        let converter = BlockConverter::new();
        let output = converter.convert("<p>Content to migrate</p><h1>Heading 01</h1>");

        assert_eq!(
            output,
            "<!-- block:paragraph --><p>Content to migrate</p><!-- /block:paragraph -->\n\n<!-- block:heading {\"level\":1} --><h1>Heading 01</h1><!-- /block:heading -->"
        );
    }

    #[test]
    fn test_convert_heading_levels() {
        let converter = BlockConverter::new();

        for level in 1..=6 {
            let html = format!("<h{0}>Another content</h{0}>", level);
            let output = converter.convert(&html);
            assert_eq!(
                output,
                format!(
                    "<!-- block:heading {{\"level\":{0}}} --><h{0}>Another content</h{0}><!-- /block:heading -->",
                    level
                )
            );
        }
    }

    #[test]
    fn test_convert_empty_heading_dropped() {
        let converter = BlockConverter::new();
        assert_eq!(converter.convert("<h2>   </h2>"), "");
    }

    #[test]
    fn test_convert_ol_to_block() {
        let html = "<ol><li>Random content</li><li>Another random content</li></ol>";
        let converter = BlockConverter::new();

        assert_eq!(
            converter.convert(html),
            format!("<!-- block:list {{\"ordered\":true}} -->{}<!-- /block:list -->", html)
        );
    }

    #[test]
    fn test_convert_ul_to_block() {
        let html = "<ul><li>Random content</li><li>Another random content</li></ul>";
        let converter = BlockConverter::new();

        assert_eq!(
            converter.convert(html),
            format!("<!-- block:list -->{}<!-- /block:list -->", html)
        );
    }

    #[test]
    fn test_convert_empty_list_still_produced() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("<ul></ul>"),
            "<!-- block:list --><ul></ul><!-- /block:list -->"
        );
    }

    #[test]
    fn test_convert_blockquote_to_block() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("<blockquote>Quoted</blockquote>"),
            "<!-- block:quote --><blockquote>Quoted</blockquote><!-- /block:quote -->"
        );
    }

    #[test]
    fn test_convert_empty_blockquote_dropped() {
        let converter = BlockConverter::new();
        assert_eq!(converter.convert("<blockquote> </blockquote>"), "");
    }

    #[test]
    fn test_convert_paragraph_to_block() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("<p>bar</p>"),
            "<!-- block:paragraph --><p>bar</p><!-- /block:paragraph -->"
        );
    }

    #[test]
    fn test_convert_with_empty_paragraphs() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("<p>bar</p><p></p>"),
            "<!-- block:paragraph --><p>bar</p><!-- /block:paragraph -->"
        );
    }

    #[test]
    fn test_convert_empty_paragraph_between_blocks_leaves_single_blank_line() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("<p>a</p><p></p><p>b</p>"),
            "<!-- block:paragraph --><p>a</p><!-- /block:paragraph -->\n\n<!-- block:paragraph --><p>b</p><!-- /block:paragraph -->"
        );
    }

    #[test]
    fn test_convert_empty_paragraph_alone_yields_empty_string() {
        let converter = BlockConverter::new();
        assert_eq!(converter.convert("<p></p>"), "");
    }

    #[test]
    fn test_convert_hr_to_separator() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("<hr>"),
            "<!-- block:separator --><hr class=\"wp-block-separator has-alpha-channel-opacity\"/><!-- /block:separator -->"
        );
    }

    #[test]
    fn test_convert_dropped_tags() {
        let converter = BlockConverter::new();
        assert_eq!(converter.convert("<br><cite>who</cite><source>"), "");
    }

    #[test]
    fn test_convert_unknown_tag_to_html_block() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("<div><p>inner</p></div>"),
            "<!-- block:html --><div><p>inner</p></div><!-- /block:html -->"
        );
    }

    #[test]
    fn test_convert_comment_to_html_block() {
        let converter = BlockConverter::new();
        let output = converter.convert("<p>x</p><!-- legacy note -->");
        assert!(output.contains("<!-- block:html -->"));
        assert!(output.contains("legacy note"));
    }

    #[test]
    fn test_convert_skips_top_level_text() {
        let converter = BlockConverter::new();
        assert_eq!(
            converter.convert("loose text <p>bar</p> more text"),
            "<!-- block:paragraph --><p>bar</p><!-- /block:paragraph -->"
        );
    }

    #[test]
    fn test_convert_empty_input() {
        let converter = BlockConverter::new();
        assert_eq!(converter.convert(""), "");
    }

    #[test]
    fn test_convert_image_with_passthrough_resolver() {
        let converter = BlockConverter::new();
        let output = converter
            .convert("<img src=\"https://example.com/photo.jpg?resize=500\" alt=\"A photo\">");

        assert_eq!(
            output,
            "<!-- block:image --><figure class=\"wp-block-image\"><img src=\"https://example.com/photo.jpg\" alt=\"A photo\"/></figure><!-- /block:image -->"
        );
    }

    #[test]
    fn test_convert_image_prefers_data_srcset() {
        let converter = BlockConverter::new();
        let output = converter.convert(
            "<img data-srcset=\"https://example.com/hi-res.jpg?w=2000\" src=\"https://example.com/low.jpg\" alt=\"\">",
        );

        assert!(output.contains("src=\"https://example.com/hi-res.jpg\""));
    }

    #[test]
    fn test_convert_image_with_relative_src_dropped() {
        let converter = BlockConverter::new();
        assert_eq!(converter.convert("<img src=\"/local/photo.jpg\" alt=\"x\">"), "");
    }

    #[test]
    fn test_convert_image_with_failing_resolver_dropped() {
        struct FailingResolver;

        impl MediaResolver for FailingResolver {
            fn resolve(&self, _src: &str, _alt: &str) -> Result<String, ConversionError> {
                Err(ConversionError::MediaResolution("upstream down".to_string()))
            }
        }

        let converter = BlockConverter::new().with_media_resolver(FailingResolver);
        assert_eq!(
            converter.convert("<img src=\"https://example.com/a.jpg\" alt=\"x\">"),
            ""
        );
    }

    #[test]
    fn test_block_hook_overrides_single_block() {
        let converter = BlockConverter::new().on_block(|block, _node| {
            block.map(|mut block| {
                if block.name == "paragraph" {
                    block.content = Some("Override content".to_string());
                }
                block
            })
        });

        let output = converter.convert("<p>Content to migrate</p><h1>Heading 01</h1>");
        assert_eq!(
            output,
            "<!-- block:paragraph -->Override content<!-- /block:paragraph -->\n\n<!-- block:heading {\"level\":1} --><h1>Heading 01</h1><!-- /block:heading -->"
        );
    }

    #[test]
    fn test_block_hook_can_drop_blocks() {
        let converter = BlockConverter::new().on_block(|_block, _node| None);
        assert_eq!(converter.convert("<p>bar</p><h1>title</h1>"), "");
    }

    #[test]
    fn test_document_hook_overrides_entire_output() {
        let converter = BlockConverter::new().on_document(|_output, _nodes| "Override".to_string());
        assert_eq!(converter.convert("<p>Content to migrate</p>"), "Override");
    }

    #[test]
    fn test_document_hook_sees_all_top_level_nodes() {
        let converter =
            BlockConverter::new().on_document(|output, nodes| format!("{}|{}", output, nodes.len()));

        let output = converter.convert("<p>a</p><h1>b</h1>");
        assert!(output.ends_with("|2"));
    }

    #[test]
    fn test_registered_rule_replaces_builtin() {
        rules::register_tag_rule("x-test-builtin-override", |node| {
            Some(Block::new("html", format!("custom:{}", text_content(node))))
        });

        let converter = BlockConverter::new();
        let output = converter.convert("<x-test-builtin-override>inner</x-test-builtin-override>");

        assert_eq!(
            output,
            "<!-- block:html -->custom:inner<!-- /block:html -->"
        );
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute("a\"b&c<d>"),
            "a&quot;b&amp;c&lt;d&gt;"
        );
    }
}
