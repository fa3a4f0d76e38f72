//! Image source resolution
//!
//! Image sources are sanitized before they reach the media collaborator: all
//! query and fragment arguments are stripped, keeping only scheme, host,
//! optional port, and path. Sources that cannot be reduced to that shape are
//! rejected, which the converter turns into a dropped node.
//!
//! The [`MediaResolver`] trait is the boundary to the host's media storage:
//! given a sanitized URL and alt text it returns a stable, dereferenceable
//! URL for the (possibly newly imported) asset. Failures are reported as
//! [`ConversionError`] values and never escape `convert`.

use url::Url;

use crate::error::ConversionError;

/// Media upload/resolution collaborator
///
/// Implementations must be idempotent for the same `src`: repeated calls
/// return the same resolved URL.
pub trait MediaResolver {
    /// Resolve a sanitized source URL to a stable media URL
    fn resolve(&self, src: &str, alt: &str) -> Result<String, ConversionError>;
}

/// Default resolver that returns the sanitized source URL unchanged
///
/// Useful for conversions that keep remote image URLs as-is instead of
/// importing the assets.
#[derive(Debug, Default)]
pub struct PassthroughMediaResolver;

impl MediaResolver for PassthroughMediaResolver {
    fn resolve(&self, src: &str, _alt: &str) -> Result<String, ConversionError> {
        Ok(src.to_string())
    }
}

/// Strip all query/fragment arguments from an image source URL
///
/// Reconstructs `scheme://host[:port]path` from the parsed source. Returns
/// `None` when the source is not an absolute URL with scheme, host, and path,
/// which callers treat as a signal to drop the image node.
///
/// # Examples
///
/// ```rust
/// use block_converter::media::strip_image_args;
///
/// assert_eq!(
///     strip_image_args("https://example.com/a.jpg?w=500&h=300#frag"),
///     Some("https://example.com/a.jpg".to_string())
/// );
/// assert_eq!(strip_image_args("not a url"), None);
/// ```
pub fn strip_image_args(src: &str) -> Option<String> {
    let parsed = Url::parse(src).ok()?;
    let host = parsed.host_str()?;
    let scheme = parsed.scheme();
    let path = parsed.path();
    if scheme.is_empty() || path.is_empty() {
        return None;
    }

    let stripped = match parsed.port() {
        Some(port) => format!("{}://{}:{}{}", scheme, host, port, path),
        None => format!("{}://{}{}", scheme, host, path),
    };

    Some(stripped)
}
