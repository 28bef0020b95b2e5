//! Selector matching and tree queries.
//!
//! A node matches a chain `S1 S2 ... Sk` when it satisfies `Sk` and, walking
//! up through its ancestors, nodes satisfying `Sk-1`, ..., `S1` are found in
//! that order. Ancestors in between may be skipped, and the walk continues
//! past the query root all the way to the document node, as with
//! `Element.querySelector`.
//!
//! Queries visit the query root and then its descendants in document order
//! (pre-order). A node is reported once even when it matches several
//! selectors of the list.

use bramble_dom::{ElementData, MarkupTree, NodeId};

use crate::ast::Selector;
use crate::error::ParseError;
use crate::parser::parse_selector;

/// Return the first node under `root` (inclusive) matching `selector`.
///
/// # Errors
///
/// Returns the [`ParseError`] if `selector` does not parse.
pub fn query(tree: &MarkupTree, root: NodeId, selector: &str) -> Result<Option<NodeId>, ParseError> {
    let selectors = parse_selector(selector)?;
    let found = query_selectors(tree, root, &selectors);
    tracing::debug!(selector, found = found.is_some(), "query");
    Ok(found)
}

/// Return every node under `root` (inclusive) matching `selector`, in
/// document order, without duplicates.
///
/// # Errors
///
/// Returns the [`ParseError`] if `selector` does not parse.
pub fn query_all(tree: &MarkupTree, root: NodeId, selector: &str) -> Result<Vec<NodeId>, ParseError> {
    let selectors = parse_selector(selector)?;
    let found = query_all_selectors(tree, root, &selectors);
    tracing::debug!(selector, matches = found.len(), "query_all");
    Ok(found)
}

/// [`query`] with an already parsed selector list.
#[must_use]
pub fn query_selectors(tree: &MarkupTree, root: NodeId, selectors: &[Selector]) -> Option<NodeId> {
    let chains = flatten(selectors);
    subtree(tree, root).find(|&node| chains.iter().any(|chain| matches_chain(tree, node, chain)))
}

/// [`query_all`] with an already parsed selector list.
#[must_use]
pub fn query_all_selectors(tree: &MarkupTree, root: NodeId, selectors: &[Selector]) -> Vec<NodeId> {
    let chains = flatten(selectors);
    subtree(tree, root)
        .filter(|&node| chains.iter().any(|chain| matches_chain(tree, node, chain)))
        .collect()
}

/// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
///
/// Whether `node` is a terminal match for any chain of `selector`.
#[must_use]
pub fn matches(tree: &MarkupTree, node: NodeId, selector: &Selector) -> bool {
    selector
        .chains()
        .iter()
        .any(|chain| matches_chain(tree, node, chain))
}

/// Check if a single compound matches an element, ignoring its
/// continuations and its pseudo tokens.
#[must_use]
pub fn compound_matches(selector: &Selector, element: &ElementData) -> bool {
    // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    // Tag names compare case-sensitively; empty and `*` match any element.
    let tag_ok = selector.tag.is_empty() || selector.tag == "*" || selector.tag == element.tag_name;

    // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    let id_ok = selector.id.is_empty() || element.id() == Some(selector.id.as_str());

    // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    let classes_ok = selector
        .classes
        .iter()
        .all(|class| element.has_class(class));

    // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    let attr_ok = !selector.has_attribute()
        || element
            .attr(&selector.attr_name)
            .is_some_and(|value| selector.attr_op.matches(value, &selector.attr_value));

    tag_ok && id_ok && classes_ok && attr_ok
}

fn flatten(selectors: &[Selector]) -> Vec<Vec<&Selector>> {
    selectors.iter().flat_map(Selector::chains).collect()
}

/// The query root followed by its descendants in document order.
fn subtree(tree: &MarkupTree, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::once(root)
        .filter(|&id| tree.get(id).is_some())
        .chain(tree.descendants(root))
}

fn element_matches(tree: &MarkupTree, node: NodeId, compound: &Selector) -> bool {
    tree.as_element(node)
        .is_some_and(|element| compound_matches(compound, element))
}

/// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
///
/// The subject (last compound) must match `node`; each compound before it
/// must then match some ancestor above the previous match. Taking the
/// nearest matching ancestor each time is enough, since any match further
/// up only leaves fewer ancestors for the remaining compounds.
fn matches_chain(tree: &MarkupTree, node: NodeId, chain: &[&Selector]) -> bool {
    let Some((subject, rest)) = chain.split_last() else {
        return false;
    };
    if !element_matches(tree, node, subject) {
        return false;
    }

    let mut current = node;
    for compound in rest.iter().rev() {
        match tree
            .ancestors(current)
            .find(|&ancestor| element_matches(tree, ancestor, compound))
        {
            Some(ancestor) => current = ancestor,
            None => return false,
        }
    }
    true
}
