//! Markup normalization - whitespace minification and empty-block elimination
//!
//! Two passes run over rendered block markup:
//!
//! 1. **Minification** (per block, before joining): collapses whitespace runs
//!    of two or more characters to nothing. Embed blocks keep their newlines
//!    because the embed wrapper markup is line-structured; every other block
//!    collapses newlines along with spaces and tabs.
//! 2. **Empty-block elimination** (after joining): removes a fixed set of
//!    known empty-shell literals, then strips any `paragraph` block whose
//!    interior is an empty `<p></p>` surrounded only by whitespace. The pass
//!    runs to a fixpoint, so applying it twice yields the same result as
//!    applying it once.

use regex::Regex;
use std::sync::OnceLock;

/// Marker substring identifying a rendered embed block
pub const EMBED_MARKER: &str = "<!-- block:embed";

/// Empty-shell literals removed verbatim from joined output
///
/// Translated from the known degenerate shells produced by legacy content:
/// empty `html`/`paragraph` divs with zero, one, or two interior spaces,
/// `<br>`-only paragraphs, and a degenerate level-3 heading shell.
const EMPTY_SHELLS: &[&str] = &[
    "<!-- block:html -->\n<div></div>\n<!-- /block:html -->",
    "<!-- block:paragraph -->\n<div> </div>\n<!-- /block:paragraph -->",
    "<!-- block:html -->\n<div> </div>\n<!-- /block:html -->",
    "<!-- block:paragraph -->\n<div>  </div>\n<!-- /block:paragraph -->",
    "<!-- block:paragraph --><p><br></p><!-- /block:paragraph -->",
    "<!-- block:paragraph --><p><br><br><br></p><!-- /block:paragraph -->",
    "<!-- block:paragraph -->\n<p><br></p>\n<!-- /block:paragraph -->",
    "<!-- block:heading {\"level\":3} -->\n<h3>\n</h3>\n<!-- /block:heading -->",
];

/// Collapse whitespace runs in a single rendered block
///
/// Embed blocks collapse only horizontal runs (spaces and tabs), preserving
/// the line breaks inside the embed wrapper markup. All other blocks collapse
/// runs of any whitespace, newlines included.
///
/// # Examples
///
/// ```rust
/// use block_converter::normalize::minify_block;
///
/// let block = "<!-- block:paragraph --><p>a\n\n  b</p><!-- /block:paragraph -->";
/// assert_eq!(
///     minify_block(block),
///     "<!-- block:paragraph --><p>ab</p><!-- /block:paragraph -->"
/// );
/// ```
pub fn minify_block(block: &str) -> String {
    static ANY_WS: OnceLock<Option<Regex>> = OnceLock::new();
    static HORIZONTAL_WS: OnceLock<Option<Regex>> = OnceLock::new();

    let regex = if block.contains(EMBED_MARKER) {
        HORIZONTAL_WS.get_or_init(|| Regex::new(r"[ \t]{2,}").ok())
    } else {
        ANY_WS.get_or_init(|| Regex::new(r"\s{2,}").ok())
    };

    match regex {
        Some(regex) => regex.replace_all(block, "").into_owned(),
        None => block.to_string(),
    }
}

/// Remove known empty-shell blocks from joined output
///
/// Applies the literal shell list and the empty-paragraph pattern repeatedly
/// until the string stops changing, which makes the whole pass idempotent by
/// construction; every non-final iteration strictly shrinks the string, so
/// the loop terminates. Each removal also consumes one preceding blank-line
/// separator when present, so eliminating a block between two surviving
/// blocks leaves a single blank line between them, never a longer run.
pub fn remove_empty_blocks(html: &str) -> String {
    let mut current = html.to_string();

    loop {
        let mut next = current.clone();
        for shell in EMPTY_SHELLS {
            let with_separator = format!("\n\n{}", shell);
            next = next.replace(&with_separator, "");
            next = next.replace(shell, "");
        }
        next = remove_empty_paragraph_blocks(&next);

        if next == current {
            break;
        }
        current = next;
    }

    current
}

/// Remove `paragraph` blocks whose interior is an empty `<p></p>`
///
/// Whitespace and newline runs of any length around and inside the `<p></p>`
/// are tolerated. A blank-line separator immediately before the block is
/// consumed with it.
pub fn remove_empty_paragraph_blocks(html: &str) -> String {
    static EMPTY_P: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = EMPTY_P.get_or_init(|| {
        Regex::new(r"(?:\n\n)?<!-- block:paragraph -->\s*<p>\s*</p>\s*<!-- /block:paragraph -->")
            .ok()
    });

    match regex {
        Some(regex) => regex.replace_all(html, "").into_owned(),
        None => html.to_string(),
    }
}
