use std::fmt;

use crate::{MarkupTree, NodeId, NodeType};

/// Write an indented outline of the subtree rooted at `id`.
///
/// Elements print as `<tag k="v">` with attributes sorted by name, text as a
/// quoted string with visible whitespace, comments as `<!-- ... -->`.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_tree(tree: &MarkupTree, id: NodeId, out: &mut impl fmt::Write) -> fmt::Result {
    write_node(tree, id, 0, out)
}

fn write_node(
    tree: &MarkupTree,
    id: NodeId,
    indent: usize,
    out: &mut impl fmt::Write,
) -> fmt::Result {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return Ok(());
    };
    match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}Document")?,
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                writeln!(out, "{prefix}<{}>", data.tag_name)?;
            } else {
                let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
                attrs.sort();
                let attrs: Vec<String> = attrs
                    .into_iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "))?;
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")?;
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->")?,
    }
    for &child_id in tree.children(id) {
        write_node(tree, child_id, indent + 1, out)?;
    }
    Ok(())
}
