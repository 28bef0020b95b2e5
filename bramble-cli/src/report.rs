//! Terminal output for the CLI.

use std::fmt::Write as _;

use anyhow::Result;
use bramble_dom::{MarkupTree, NodeId, write_tree};
use bramble_select::{ParseError, Selector};
use owo_colors::OwoColorize;

/// Prints results, colored or plain.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    /// One line per chain in canonical form, then its compounds, one per
    /// nesting level.
    pub fn print_selectors(&self, selectors: &[Selector]) {
        for (index, selector) in selectors.iter().enumerate() {
            let heading = format!("[{index}] {selector}");
            if self.color {
                println!("{}", heading.bold());
            } else {
                println!("{heading}");
            }
            let mut level = Some(selector);
            let mut depth = 1;
            while let Some(compound) = level {
                println!("{}{}", "  ".repeat(depth), describe(compound));
                level = compound.children.first();
                depth += 1;
            }
        }
    }

    pub fn print_matches(&self, tree: &MarkupTree, found: &[NodeId]) -> Result<()> {
        if found.is_empty() {
            if self.color {
                println!("{}", "no matches".yellow());
            } else {
                println!("no matches");
            }
            return Ok(());
        }
        for &id in found {
            let heading = format!("match #{}", id.0);
            if self.color {
                println!("{}", heading.green());
            } else {
                println!("{heading}");
            }
            let mut outline = String::new();
            write_tree(tree, id, &mut outline)?;
            print!("{outline}");
        }
        Ok(())
    }

    pub fn print_tree(&self, tree: &MarkupTree) -> Result<()> {
        let mut outline = String::new();
        write_tree(tree, tree.root(), &mut outline)?;
        if self.color {
            print!("{}", outline.dimmed());
        } else {
            print!("{outline}");
        }
        Ok(())
    }

    /// The error, then the selector with a caret under the offending byte.
    pub fn print_parse_error(&self, input: &str, err: &ParseError) {
        let column = input
            .char_indices()
            .take_while(|&(offset, _)| offset < err.offset)
            .count();
        let caret = format!("{}^", " ".repeat(column));
        if self.color {
            eprintln!("{} {err}", "error:".red().bold());
            eprintln!("  {input}");
            eprintln!("  {}", caret.red());
        } else {
            eprintln!("error: {err}");
            eprintln!("  {input}");
            eprintln!("  {caret}");
        }
    }
}

/// Field-by-field summary of one compound.
fn describe(selector: &Selector) -> String {
    let mut out = String::new();
    let tag = if selector.tag.is_empty() { "*" } else { selector.tag.as_str() };
    let _ = write!(out, "tag={tag}");
    if !selector.id.is_empty() {
        let _ = write!(out, " id={}", selector.id);
    }
    if !selector.classes.is_empty() {
        let _ = write!(out, " classes=[{}]", selector.classes.join(", "));
    }
    if selector.has_attribute() {
        let _ = write!(
            out,
            " attr={}{}{:?}",
            selector.attr_name, selector.attr_op, selector.attr_value
        );
    }
    if !selector.pseudo.is_empty() {
        let _ = write!(out, " pseudo={}", selector.pseudo);
    }
    if !selector.qualifier.is_empty() {
        let _ = write!(out, " qualifier={}", selector.qualifier);
    }
    out
}
