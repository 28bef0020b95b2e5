//! Integration tests for querying markup trees with selectors.

use bramble_dom::{ElementData, MarkupTree, NodeId, NodeType};
use bramble_select::{ParseErrorKind, Selector, matches, parse_selector, query, query_all};

/// The nodes of the house fixture, by role.
struct House {
    tree: MarkupTree,
    house: NodeId,
    wrapper: NodeId,
    header: NodeId,
    menu: NodeId,
    content: NodeId,
    links: NodeId,
    delay: NodeId,
}

/// ```text
/// section.tree-house#house
///   div.wrapper[aria=wrapper-div]
///     section.section#header
///     section.section#menu
///     section.section#content
///     div.links
///       a[rel=delay]
/// ```
fn house() -> House {
    let mut tree = MarkupTree::new();
    let house = tree.append_element(
        NodeId::ROOT,
        ElementData::new("section")
            .with_attr("class", "tree-house")
            .with_attr("id", "house"),
    );
    let wrapper = tree.append_element(
        house,
        ElementData::new("div")
            .with_attr("class", "wrapper")
            .with_attr("aria", "wrapper-div"),
    );
    let section = |id: &str| {
        ElementData::new("section")
            .with_attr("class", "section")
            .with_attr("id", id)
    };
    let header = tree.append_element(wrapper, section("header"));
    let menu = tree.append_element(wrapper, section("menu"));
    let content = tree.append_element(wrapper, section("content"));
    let links = tree.append_element(wrapper, ElementData::new("div").with_attr("class", "links"));
    let delay = tree.append_element(links, ElementData::new("a").with_attr("rel", "delay"));

    House {
        tree,
        house,
        wrapper,
        header,
        menu,
        content,
        links,
        delay,
    }
}

/// One element `<tag attr="value">` under the document.
fn single(tag: &str, attr: &str, value: &str) -> (MarkupTree, NodeId) {
    let mut tree = MarkupTree::new();
    let id = tree.append_element(NodeId::ROOT, ElementData::new(tag).with_attr(attr, value));
    (tree, id)
}

fn hits(tree: &MarkupTree, selector: &str) -> Vec<NodeId> {
    query_all(tree, NodeId::ROOT, selector).unwrap()
}

// ========== house fixture ==========

#[test]
fn test_query_by_tag_and_class() {
    let h = house();
    assert_eq!(query(&h.tree, h.house, "div.wrapper").unwrap(), Some(h.wrapper));
}

#[test]
fn test_query_by_tag_and_id() {
    let h = house();
    assert_eq!(query(&h.tree, h.house, "section#menu").unwrap(), Some(h.menu));
}

#[test]
fn test_query_by_attribute() {
    let h = house();
    assert_eq!(
        query(&h.tree, h.house, "div[aria*=wrapper-div]").unwrap(),
        Some(h.wrapper)
    );
    assert_eq!(
        query(&h.tree, h.house, "div[aria=wrapper-div]").unwrap(),
        Some(h.wrapper)
    );
    assert_eq!(query_all(&h.tree, h.house, "div[aria*=wrapper-div]").unwrap().len(), 1);
}

#[test]
fn test_query_all_in_document_order() {
    let h = house();
    assert_eq!(
        query_all(&h.tree, h.house, "section.section").unwrap(),
        vec![h.header, h.menu, h.content]
    );
}

#[test]
fn test_query_root_is_eligible() {
    let h = house();
    assert_eq!(query(&h.tree, h.house, "section").unwrap(), Some(h.house));
    assert_eq!(query(&h.tree, h.house, "#house").unwrap(), Some(h.house));
}

#[test]
fn test_query_returns_first_in_document_order() {
    let h = house();
    assert_eq!(query(&h.tree, h.house, "section.section").unwrap(), Some(h.header));
    assert_eq!(query(&h.tree, h.house, "div").unwrap(), Some(h.wrapper));
}

#[test]
fn test_descendant_chain_skips_intermediate_ancestors() {
    let h = house();
    assert_eq!(hits(&h.tree, "section a"), vec![h.delay]);
    assert_eq!(hits(&h.tree, ".tree-house .links a[rel=delay]"), vec![h.delay]);
    assert_eq!(hits(&h.tree, "#house div"), vec![h.wrapper, h.links]);
}

#[test]
fn test_descendant_chain_order_matters() {
    let h = house();
    assert!(hits(&h.tree, "a .links").is_empty());
    assert!(hits(&h.tree, "section.section a").is_empty());
    assert!(hits(&h.tree, ".links .wrapper").is_empty());
}

#[test]
fn test_descendant_needs_a_strict_ancestor() {
    // The wrapper is a div, but "div div" needs a div above it.
    let h = house();
    assert_eq!(hits(&h.tree, "div div"), vec![h.links]);
}

#[test]
fn test_ancestors_above_query_root_count() {
    let h = house();
    assert_eq!(
        query_all(&h.tree, h.wrapper, "section.tree-house section").unwrap(),
        vec![h.header, h.menu, h.content]
    );
}

#[test]
fn test_query_only_searches_under_root() {
    let h = house();
    assert_eq!(query_all(&h.tree, h.links, "section").unwrap(), Vec::<NodeId>::new());
    assert_eq!(query_all(&h.tree, h.links, "a").unwrap(), vec![h.delay]);
}

#[test]
fn test_selector_list_is_deduplicated_in_document_order() {
    let h = house();
    assert_eq!(
        hits(&h.tree, "a, #menu, section.section, .wrapper"),
        vec![h.wrapper, h.header, h.menu, h.content, h.delay]
    );
}

#[test]
fn test_classes_must_all_be_present() {
    let mut tree = MarkupTree::new();
    let both = tree.append_element(
        NodeId::ROOT,
        ElementData::new("div").with_attr("class", "ball extra shower"),
    );
    let _one = tree.append_element(NodeId::ROOT, ElementData::new("div").with_attr("class", "ball"));
    assert_eq!(hits(&tree, "div.shower.ball"), vec![both]);
    assert_eq!(hits(&tree, ".ball.shower"), vec![both]);
}

#[test]
fn test_tag_match_is_case_sensitive() {
    let (tree, _) = single("DIV", "x", "y");
    assert!(hits(&tree, "div").is_empty());
    assert_eq!(hits(&tree, "DIV").len(), 1);
}

#[test]
fn test_universal_matches_every_element() {
    let h = house();
    assert_eq!(hits(&h.tree, "*").len(), 7);
    assert_eq!(hits(&h.tree, ".links *"), vec![h.delay]);
}

#[test]
fn test_pseudo_tokens_do_not_filter() {
    let h = house();
    assert_eq!(hits(&h.tree, "a:hover"), vec![h.delay]);
    assert_eq!(hits(&h.tree, "div.links::before"), vec![h.links]);
    assert_eq!(
        hits(&h.tree, "section:nth-child(2n+1).section"),
        vec![h.header, h.menu, h.content]
    );
    assert_eq!(hits(&h.tree, "::after").len(), 7);
}

#[test]
fn test_text_and_comments_never_match() {
    let mut tree = MarkupTree::new();
    let p = tree.append_element(NodeId::ROOT, ElementData::new("p"));
    let text = tree.alloc(NodeType::Text("p".to_string()));
    tree.append_child(p, text);
    let comment = tree.alloc(NodeType::Comment("p".to_string()));
    tree.append_child(p, comment);
    assert_eq!(hits(&tree, "*"), vec![p]);
}

#[test]
fn test_no_match_is_not_an_error() {
    let h = house();
    assert_eq!(query(&h.tree, NodeId::ROOT, "table").unwrap(), None);
    assert!(query_all(&h.tree, NodeId::ROOT, "a[href^=x]").unwrap().is_empty());
}

#[test]
fn test_parse_errors_propagate() {
    let h = house();
    let err = query(&h.tree, NodeId::ROOT, "   ").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::EmptyInput);
    let err = query_all(&h.tree, NodeId::ROOT, "div[aria=").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingAttributeValue);
}

#[test]
fn test_matches_single_node() {
    let h = house();
    let selectors = parse_selector("div.wrapper section#menu").unwrap();
    assert!(matches(&h.tree, h.menu, &selectors[0]));
    assert!(!matches(&h.tree, h.header, &selectors[0]));
    assert!(!matches(&h.tree, h.wrapper, &selectors[0]));
}

#[test]
fn test_hand_built_alternative_continuations() {
    // .wrapper with two continuations: .links a, and #header
    let h = house();
    let compound = |f: fn(&mut Selector)| {
        let mut s = Selector::default();
        f(&mut s);
        s
    };
    let mut links = compound(|s| s.classes.push("links".to_string()));
    links.children.push(compound(|s| s.tag = "a".to_string()));
    let mut wrapper = compound(|s| s.classes.push("wrapper".to_string()));
    wrapper.children.push(links);
    wrapper.children.push(compound(|s| s.id = "header".to_string()));

    assert_eq!(
        bramble_select::query_all_selectors(&h.tree, NodeId::ROOT, &[wrapper]),
        vec![h.header, h.delay]
    );
}

// ========== attribute operators ==========

#[test]
fn test_dash_match() {
    let (tree, node) = single("p", "attr", "foo-bar");
    assert_eq!(hits(&tree, "[attr|=foo]"), vec![node]);
    assert!(hits(&tree, "[attr|=bar]").is_empty());
    assert!(hits(&tree, "[attr|=fo]").is_empty());

    let (tree, node) = single("p", "attr", "foo");
    assert_eq!(hits(&tree, "[attr|=foo]"), vec![node]);
}

#[test]
fn test_includes_whole_word() {
    let (tree, node) = single("p", "attr", "a b c");
    assert_eq!(hits(&tree, "[attr~=b]"), vec![node]);
    assert!(hits(&tree, "[attr~=bc]").is_empty());
    assert!(hits(&tree, "[attr~='a b']").is_empty());
}

#[test]
fn test_prefix_and_suffix() {
    let (tree, node) = single("p", "attr", "prefixed-value");
    assert_eq!(hits(&tree, "[attr^=prefixed]"), vec![node]);
    assert_eq!(hits(&tree, "[attr$=value]"), vec![node]);
    assert!(hits(&tree, "[attr^=value]").is_empty());
    assert!(hits(&tree, "[attr$=prefixed]").is_empty());
}

#[test]
fn test_substring_and_equality() {
    let (tree, node) = single("p", "attr", "prefixed-value");
    assert_eq!(hits(&tree, "[attr*=ed-va]"), vec![node]);
    assert_eq!(hits(&tree, "[attr='prefixed-value']"), vec![node]);
    assert!(hits(&tree, "[attr=prefixed]").is_empty());
}

#[test]
fn test_presence_only() {
    let (tree, node) = single("input", "disabled", "");
    assert_eq!(hits(&tree, "input[disabled]"), vec![node]);
    assert!(hits(&tree, "input[checked]").is_empty());
    assert_eq!(hits(&tree, "input[disabled='']"), vec![node]);
}

#[test]
fn test_empty_values_never_match_partial_operators() {
    let (tree, _) = single("p", "attr", "value");
    for selector in ["[attr^='']", "[attr$='']", "[attr*='']", "[attr~='']"] {
        assert!(hits(&tree, selector).is_empty(), "{selector}");
    }
}

#[test]
fn test_id_selector_reads_id_attribute() {
    let (tree, node) = single("h1", "id", "header");
    assert_eq!(hits(&tree, "#header"), vec![node]);
    assert_eq!(hits(&tree, "[id=header]"), vec![node]);
    assert!(hits(&tree, "#head").is_empty());
}
