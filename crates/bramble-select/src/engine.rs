//! Query entry point bound to an optional selector cache.

use std::sync::Arc;

use bramble_dom::{MarkupTree, NodeId};

use crate::ast::Selector;
use crate::cache::SelectorCache;
use crate::error::ParseError;
use crate::matcher::{query_all_selectors, query_selectors};
use crate::parser::parse_selector;

/// Runs queries, optionally reusing parsed selectors from a
/// caller-owned [`SelectorCache`].
///
/// The engine holds no state of its own; copies can be handed to as many
/// threads as needed.
///
/// ```
/// use bramble_dom::{ElementData, MarkupTree, NodeId};
/// use bramble_select::{QueryEngine, SelectorCache};
///
/// let mut tree = MarkupTree::new();
/// let div = tree.append_element(NodeId::ROOT, ElementData::new("div").with_attr("class", "wrapper"));
///
/// let cache = SelectorCache::new();
/// let engine = QueryEngine::with_cache(&cache);
/// assert_eq!(engine.query(&tree, NodeId::ROOT, "div.wrapper").unwrap(), Some(div));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine<'c> {
    cache: Option<&'c SelectorCache>,
}

impl<'c> QueryEngine<'c> {
    /// An engine that parses every selector afresh.
    #[must_use]
    pub const fn new() -> Self {
        Self { cache: None }
    }

    /// An engine that looks selectors up in `cache` before parsing.
    #[must_use]
    pub const fn with_cache(cache: &'c SelectorCache) -> Self {
        Self { cache: Some(cache) }
    }

    /// Parse `selector`, through the cache when there is one.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] if `selector` does not parse.
    pub fn parse(&self, selector: &str) -> Result<Arc<[Selector]>, ParseError> {
        match self.cache {
            Some(cache) => cache.get_or_parse(selector),
            None => parse_selector(selector).map(Arc::from),
        }
    }

    /// First node under `root` (inclusive) matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] if `selector` does not parse.
    pub fn query(
        &self,
        tree: &MarkupTree,
        root: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, ParseError> {
        let selectors = self.parse(selector)?;
        Ok(query_selectors(tree, root, &selectors))
    }

    /// Every node under `root` (inclusive) matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] if `selector` does not parse.
    pub fn query_all(
        &self,
        tree: &MarkupTree,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let selectors = self.parse(selector)?;
        Ok(query_all_selectors(tree, root, &selectors))
    }
}
