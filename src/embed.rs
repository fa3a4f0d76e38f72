//! Provider embed classification for bare URLs
//!
//! When a paragraph-class node contains nothing but an absolute URL, the
//! converter tries to promote it to an `embed` block instead of a plain
//! paragraph. Classification runs in order:
//!
//! 1. `x.com` / `www.x.com` hosts are rewritten to `twitter.com` in a local
//!    working copy of the URL text; all later checks see the rewritten URL.
//! 2. Instagram hosts produce a fixed `embed` block without any metadata
//!    lookup (the provider forbids unauthenticated metadata).
//! 3. Facebook hosts likewise, with the `embed-handler` provider slug and
//!    `previewable:false`.
//! 4. Every other URL goes through the [`OEmbedClient`] collaborator; a miss
//!    falls back to plain-paragraph handling, a hit produces a generic embed
//!    block with provider slug, type, and an optional aspect-ratio class.
//!
//! The aspect-ratio class is applied only on exact rounded equality:
//! `round(width/height, 2) == 1.78` maps to the 16:9 class and `1.33` to the
//! 4:3 class. Any other ratio gets no class.

use serde_json::{Map, json};
use url::Url;

use crate::block::Block;

/// Provider metadata returned by an oEmbed lookup
#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    /// Human-readable provider name, e.g. "YouTube"
    pub provider_name: String,
    /// Embed type reported by the provider, e.g. "video" or "rich"
    pub embed_type: String,
    /// Embed width in pixels, when reported
    pub width: Option<f64>,
    /// Embed height in pixels, when reported
    pub height: Option<f64>,
}

/// oEmbed metadata lookup collaborator
///
/// Implementations perform the external lookup synchronously and return
/// `None` both for unknown providers and for failed lookups; the converter
/// treats either as "handle the URL as plain text".
pub trait OEmbedClient {
    /// Fetch provider metadata for a URL
    fn fetch(&self, url: &str) -> Option<ProviderMetadata>;
}

/// Default oEmbed client that knows no providers
///
/// With this client every non-Instagram, non-Facebook bare URL stays a plain
/// paragraph.
#[derive(Debug, Default)]
pub struct NullOEmbedClient;

impl OEmbedClient for NullOEmbedClient {
    fn fetch(&self, _url: &str) -> Option<ProviderMetadata> {
        None
    }
}

/// Classify a paragraph-class node's text as a provider embed
///
/// Returns `Some(Block)` when the trimmed text is an absolute URL (scheme and
/// host present, no interior whitespace) that maps to a known provider.
/// Returns `None` when the text is not a bare URL or no provider recognizes
/// it; the caller then falls through to the ordinary paragraph rule.
pub fn classify_embed(text: &str, oembed: &dyn OEmbedClient) -> Option<Block> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return None;
    }

    let parsed = Url::parse(trimmed).ok()?;
    let host = parsed.host_str()?.to_string();

    // Work on a local copy of the URL; the caller's DOM is untouched. The
    // host is rewritten on the parsed URL so userinfo or path segments that
    // happen to contain "x.com" are left alone.
    let (url_text, host) = if host == "x.com" || host == "www.x.com" {
        let mut rewritten = parsed.clone();
        rewritten.set_host(Some("twitter.com")).ok()?;
        (rewritten.to_string(), "twitter.com".to_string())
    } else {
        (trimmed.to_string(), host)
    };

    if host.contains("instagram.com") {
        return Some(provider_block(&url_text, "rich", "instagram", false));
    }

    if host.contains("facebook.com") {
        return Some(provider_block(&url_text, "rich", "embed-handler", true));
    }

    let Some(metadata) = oembed.fetch(&url_text) else {
        tracing::debug!(url = %url_text, "no oEmbed metadata, treating URL as plain text");
        return None;
    };

    let slug = slugify(&metadata.provider_name);
    let class_name = match (metadata.width, metadata.height) {
        (Some(width), Some(height)) => aspect_ratio_class(width, height),
        _ => None,
    };

    let mut attributes = Map::new();
    attributes.insert("url".to_string(), json!(url_text));
    attributes.insert("type".to_string(), json!(metadata.embed_type));
    attributes.insert("providerNameSlug".to_string(), json!(slug));
    attributes.insert("responsive".to_string(), json!(true));
    if let Some(class_name) = class_name {
        attributes.insert("className".to_string(), json!(class_name));
    }

    let content = embed_figure(&metadata.embed_type, &slug, class_name, &url_text);
    Some(Block::with_attributes("embed", attributes, content))
}

/// Build the fixed-shape block for providers handled without metadata lookup
fn provider_block(url: &str, embed_type: &str, slug: &str, mark_unpreviewable: bool) -> Block {
    let mut attributes = Map::new();
    attributes.insert("url".to_string(), json!(url));
    attributes.insert("type".to_string(), json!(embed_type));
    attributes.insert("providerNameSlug".to_string(), json!(slug));
    attributes.insert("responsive".to_string(), json!(true));
    if mark_unpreviewable {
        attributes.insert("previewable".to_string(), json!(false));
    }

    let content = embed_figure(embed_type, slug, None, url);
    Block::with_attributes("embed", attributes, content)
}

/// Build the embed figure/wrapper markup
///
/// The provider slug appears twice in the figure class list, once as an
/// `is-provider-*` class and once as a `wp-block-embed-*` class. The wrapper
/// body keeps the URL on its own line; embed-aware minification preserves
/// these newlines.
fn embed_figure(embed_type: &str, slug: &str, class_name: Option<&'static str>, url: &str) -> String {
    let mut classes = format!(
        "wp-block-embed is-type-{} is-provider-{} wp-block-embed-{}",
        embed_type, slug, slug
    );
    if let Some(class_name) = class_name {
        classes.push(' ');
        classes.push_str(class_name);
    }

    format!(
        "<figure class=\"{}\"><div class=\"wp-block-embed__wrapper\">\n{}\n</div></figure>",
        classes, url
    )
}

/// Slugify a provider name for use in class names and attributes
///
/// Lowercases and replaces every non-alphanumeric run with a single hyphen:
/// "YouTube" becomes "youtube", "Embed Handler" becomes "embed-handler".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Compute the aspect-ratio class for embed dimensions
///
/// Only two ratios are recognized, by exact equality of the ratio rounded to
/// two decimals: 1.78 (16:9) and 1.33 (4:3). Everything else, including
/// near-misses, gets no class.
pub fn aspect_ratio_class(width: f64, height: f64) -> Option<&'static str> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let ratio_hundredths = (width / height * 100.0).round() as i64;
    match ratio_hundredths {
        178 => Some("wp-embed-aspect-16-9 wp-has-aspect-ratio"),
        133 => Some("wp-embed-aspect-4-3 wp-has-aspect-ratio"),
        _ => None,
    }
}
