//! Caller-registered tag rules
//!
//! The converter resolves each top-level node to a tag rule: registered
//! rules are checked first, then the built-in table. Registration is
//! process-wide and append/lookup only; the last registration for a tag name
//! wins, and conversions only ever take read locks, so registering a rule is
//! safe while other conversions run concurrently.
//!
//! # Examples
//!
//! ```rust
//! use block_converter::{Block, rules::register_tag_rule};
//! use block_converter::parser::serialize_node;
//!
//! register_tag_rule("aside", |node| {
//!     Some(Block::new("html", serialize_node(node)))
//! });
//! ```

use markup5ever_rcdom::Handle;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::block::Block;

/// A tag rule maps one parsed node to zero or one block
///
/// Returning `None` drops the node: it contributes nothing to the output.
pub type TagRule = Arc<dyn Fn(&Handle) -> Option<Block> + Send + Sync>;

static REGISTRY: OnceLock<RwLock<HashMap<String, TagRule>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, TagRule>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register or replace the rule for a tag name
///
/// A registered rule fully replaces the built-in rule for that tag; the last
/// registration for a given tag name wins.
pub fn register_tag_rule<F>(tag: &str, rule: F)
where
    F: Fn(&Handle) -> Option<Block> + Send + Sync + 'static,
{
    if let Ok(mut rules) = registry().write() {
        rules.insert(tag.to_string(), Arc::new(rule));
    }
}

/// Look up the registered rule for a tag name, if any
pub fn registered_rule(tag: &str) -> Option<TagRule> {
    registry().read().ok()?.get(tag).cloned()
}
