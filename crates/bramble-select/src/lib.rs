//! Selector parsing and tree queries for Bramble.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector Parser** - turns a selector string such as
//!   `div.shower.ball a.embeded, h1#header, div[alt*='blocker']` into one
//!   [`Selector`] per comma-separated alternative, descendant compounds
//!   nested in `children`
//! - **Query Engine** - finds the first ([`query`]) or every ([`query_all`])
//!   node of a [`MarkupTree`](bramble_dom::MarkupTree) matching a selector,
//!   in document order
//! - **Selector Cache** - optional, caller-owned memoization of parsed
//!   selectors, used through [`QueryEngine`]
//!
//! # Not Implemented
//!
//! - Child (`>`) and sibling (`+`, `~`) combinators
//! - Evaluation of pseudo-classes and pseudo-elements; they are recorded
//!   verbatim in [`Selector::pseudo`] for the caller and otherwise ignored
//!
//! ```
//! use bramble_dom::{ElementData, MarkupTree, NodeId};
//! use bramble_select::query_all;
//!
//! let mut tree = MarkupTree::new();
//! let nav = tree.append_element(NodeId::ROOT, ElementData::new("nav"));
//! let link = tree.append_element(nav, ElementData::new("a").with_attr("rel", "next"));
//!
//! assert_eq!(query_all(&tree, NodeId::ROOT, "nav a[rel=next]").unwrap(), vec![link]);
//! ```

/// Selector syntax tree.
pub mod ast;
/// Caller-owned parsed-selector cache.
pub mod cache;
/// Query engine bound to an optional cache.
pub mod engine;
/// Parse errors.
pub mod error;
/// Selector matching and tree queries.
pub mod matcher;
/// Selector string parser.
pub mod parser;

pub use ast::{AttrOperator, Selector};
pub use cache::SelectorCache;
pub use engine::QueryEngine;
pub use error::{ParseError, ParseErrorKind};
pub use matcher::{compound_matches, matches, query, query_all, query_all_selectors, query_selectors};
pub use parser::parse_selector;
