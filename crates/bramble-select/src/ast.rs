//! Selector syntax tree.
//!
//! A parsed selector string is a list of [`Selector`]s, one per
//! comma-separated alternative. Each `Selector` is one compound unit
//! (`div#main.wide[lang|=en]:hover`) and nests the compound that follows it
//! across a descendant combinator in `children`, so `div a span` is
//!
//! ```text
//! div { children: [a { children: [span] }] }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// How an attribute value is compared against the value written in the
/// selector. The textual form of each variant is the operator as written.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AttrOperator {
    /// `[attr]` - the attribute is present, whatever its value.
    #[default]
    #[strum(serialize = "")]
    #[serde(rename = "")]
    Exists,
    /// `[attr=value]` - exact string equality.
    #[strum(serialize = "=")]
    #[serde(rename = "=")]
    Equals,
    /// `[attr*=value]` - the value contains the substring.
    #[strum(serialize = "*=")]
    #[serde(rename = "*=")]
    Contains,
    /// `[attr^=value]` - the value starts with the prefix.
    #[strum(serialize = "^=")]
    #[serde(rename = "^=")]
    Prefix,
    /// `[attr$=value]` - the value ends with the suffix.
    #[strum(serialize = "$=")]
    #[serde(rename = "$=")]
    Suffix,
    /// `[attr~=value]` - one of the whitespace-separated words is exactly `value`.
    #[strum(serialize = "~=")]
    #[serde(rename = "~=")]
    Includes,
    /// `[attr|=value]` - exactly `value`, or `value` immediately followed by `-`.
    #[strum(serialize = "|=")]
    #[serde(rename = "|=")]
    DashMatch,
}

impl AttrOperator {
    /// Compare an element's attribute value (`actual`) with the value
    /// written in the selector (`expected`).
    ///
    /// Substring, prefix, suffix and word matches never succeed with an
    /// empty `expected`, mirroring CSS.
    #[must_use]
    pub fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals => actual == expected,
            Self::Contains => !expected.is_empty() && actual.contains(expected),
            Self::Prefix => !expected.is_empty() && actual.starts_with(expected),
            Self::Suffix => !expected.is_empty() && actual.ends_with(expected),
            Self::Includes => actual.split_ascii_whitespace().any(|word| word == expected),
            Self::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// One compound selector plus its descendant continuations.
///
/// String fields use the empty string for "not present".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    /// Tag name; empty or `*` matches any element.
    pub tag: String,
    /// Required id, compared with the element's `id` attribute.
    pub id: String,
    /// Classes the element must all carry, in source order.
    pub classes: Vec<String>,
    /// Pseudo-class/pseudo-element tokens verbatim, arguments included
    /// (`:nth-child(2n+1)`, `::before`). Recorded, never evaluated.
    pub pseudo: String,
    /// Attribute name of the `[name op value]` matcher.
    pub attr_name: String,
    /// Attribute comparison.
    pub attr_op: AttrOperator,
    /// Attribute value with any quotes stripped.
    pub attr_value: String,
    /// Parenthesised arguments trailing a non-pseudo token, verbatim,
    /// e.g. the `(before: all)` of `.ball(before: all)`.
    pub qualifier: String,
    /// Compounds that must match a descendant of the element matched here.
    pub children: Vec<Selector>,
}

impl Selector {
    /// Whether the compound carries nothing to match on.
    ///
    /// Such a compound is never produced by the parser.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag.is_empty()
            && self.id.is_empty()
            && self.classes.is_empty()
            && self.attr_name.is_empty()
            && self.pseudo.is_empty()
    }

    /// Whether the compound has an attribute matcher.
    #[must_use]
    pub fn has_attribute(&self) -> bool {
        !self.attr_name.is_empty()
    }

    /// Flatten the descendant nesting into root-to-leaf paths.
    ///
    /// A selector built by the parser yields exactly one path. Several
    /// `children` entries are read as alternative continuations, each
    /// producing its own path.
    #[must_use]
    pub fn chains(&self) -> Vec<Vec<&Self>> {
        if self.children.is_empty() {
            return vec![vec![self]];
        }
        self.children
            .iter()
            .flat_map(Self::chains)
            .map(|tail| {
                let mut chain = Vec::with_capacity(tail.len() + 1);
                chain.push(self);
                chain.extend(tail);
                chain
            })
            .collect()
    }

    /// Depth of the descendant nesting, counting this compound.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    fn has_structural_token(&self) -> bool {
        !(self.tag.is_empty()
            && self.id.is_empty()
            && self.classes.is_empty()
            && self.attr_name.is_empty())
    }
}

/// Writes the canonical form, `tag#id.class[name op "value"]qualifier:pseudo`,
/// followed by a space and each continuation. Parsing the output of a
/// parser-produced selector gives back an equal selector.
impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        if !self.id.is_empty() {
            write!(f, "#{}", self.id)?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        if self.has_attribute() {
            if self.attr_op == AttrOperator::Exists {
                write!(f, "[{}]", self.attr_name)?;
            } else {
                let quote = if self.attr_value.contains('"') { '\'' } else { '"' };
                write!(
                    f,
                    "[{}{}{quote}{}{quote}]",
                    self.attr_name, self.attr_op, self.attr_value
                )?;
            }
        }
        // A qualifier written straight after a bare pseudo name would read
        // back as that pseudo's argument, so it goes before the pseudo
        // whenever there is a token to hang it on.
        if self.has_structural_token() {
            f.write_str(&self.qualifier)?;
            f.write_str(&self.pseudo)?;
        } else {
            f.write_str(&self.pseudo)?;
            f.write_str(&self.qualifier)?;
        }
        for child in &self.children {
            write!(f, " {child}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> Selector {
        Selector {
            tag: name.to_string(),
            ..Selector::default()
        }
    }

    #[test]
    fn test_operator_text_forms() {
        assert_eq!(AttrOperator::DashMatch.to_string(), "|=");
        assert_eq!(AttrOperator::Exists.as_ref(), "");
        assert_eq!("^=".parse::<AttrOperator>(), Ok(AttrOperator::Prefix));
        assert!("!=".parse::<AttrOperator>().is_err());
    }

    #[test]
    fn test_chains_with_alternative_children() {
        let mut root = tag("div");
        let mut a = tag("a");
        a.children.push(tag("span"));
        root.children.push(a);
        root.children.push(tag("p"));

        let chains = root.chains();
        let names: Vec<Vec<&str>> = chains
            .iter()
            .map(|chain| chain.iter().map(|s| s.tag.as_str()).collect())
            .collect();
        assert_eq!(names, vec![vec!["div", "a", "span"], vec!["div", "p"]]);
        assert_eq!(root.depth(), 3);
    }

    #[test]
    fn test_empty_compound() {
        assert!(Selector::default().is_empty());
        let qualified_only = Selector {
            qualifier: "(x)".to_string(),
            ..Selector::default()
        };
        assert!(qualified_only.is_empty());
        assert!(!tag("*").is_empty());
    }

    #[test]
    fn test_display_orders_qualifier_before_pseudo() {
        let selector = Selector {
            tag: "div".to_string(),
            classes: vec!["ball".to_string()],
            pseudo: ":hover".to_string(),
            qualifier: "(before: all)".to_string(),
            ..Selector::default()
        };
        assert_eq!(selector.to_string(), "div.ball(before: all):hover");
    }
}
