//! Selector parsing.
//!
//! Grammar, read left to right in a single pass:
//!
//! ```text
//! list     := chain ( "," chain )*
//! chain    := compound ( whitespace+ compound )*
//! compound := ( tag | "*" )? ( "#" name | "." name | "[" attr "]" | pseudo | "(" ... ")" )*
//! attr     := name ( op ( quoted | bare ) )?
//! op       := "=" | "*=" | "^=" | "$=" | "~=" | "|="
//! pseudo   := ( ":" | "::" ) name ( "(" ... ")" )?
//! ```
//!
//! Commas and whitespace inside `[...]` and `(...)` never split selectors.
//! Parenthesised text is kept verbatim, nested parentheses included. A quote
//! right after `(` or `,` opens a string when its closing quote exists;
//! anywhere else it is plain text.

use crate::ast::{AttrOperator, Selector};
use crate::error::{ParseError, ParseErrorKind};

/// Parse a selector list into one [`Selector`] per comma-separated
/// alternative, each nesting its descendant compounds in `children`.
///
/// Supports:
/// - Type selectors: `div`, `h1`, and the universal selector `*`
/// - ID selectors: `#header`
/// - Class selectors, repeatable: `.shower.ball`
/// - One attribute matcher per compound: `[rel]`, `[rel=delay]`, `[alt*='blocker']`
/// - Pseudo tokens, kept verbatim: `:hover`, `::before`, `:nth-child(2n+1)`
/// - Trailing parenthesised qualifiers, kept verbatim: `.ball(before: all)`
/// - Descendant combinators (whitespace) and selector lists (`,`)
///
/// # Errors
///
/// Returns a [`ParseError`] locating the first problem. Nothing is
/// returned for the part of the input that did parse.
pub fn parse_selector(input: &str) -> Result<Vec<Selector>, ParseError> {
    if input.trim_ascii().is_empty() {
        return Err(ParseError::new(0, ParseErrorKind::EmptyInput));
    }

    let mut parser = Parser { input, pos: 0 };
    let mut selectors = Vec::new();
    loop {
        selectors.push(parser.parse_chain()?);
        match parser.peek() {
            None => break,
            Some(',') => parser.bump(),
            // parse_chain only stops at a comma or the end of input
            Some(c) => return Err(parser.error(ParseErrorKind::UnexpectedCharacter(c))),
        }
    }

    tracing::trace!(input, chains = selectors.len(), "parsed selector");
    Ok(selectors)
}

/// Check if a character can start a tag name.
const fn is_tag_start_char(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Check if a character can continue a name (tag, id, class, attribute, pseudo).
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

/// Cursor over the selector text. `pos` is always on a char boundary.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    const fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.pos, kind)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    /// Consume characters while `pred` holds and return them.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let (input, start) = (self.input, self.pos);
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &input[start..self.pos]
    }

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    ///
    /// Parse whitespace-separated compounds up to a comma or the end of input
    /// and nest each one under the compound before it.
    fn parse_chain(&mut self) -> Result<Selector, ParseError> {
        self.skip_whitespace();

        let mut compounds = Vec::new();
        loop {
            let start = self.pos;
            let compound = self.parse_compound()?;
            if compound.is_empty() {
                return Err(ParseError::new(start, ParseErrorKind::EmptyCompound));
            }
            compounds.push(compound);

            self.skip_whitespace();
            if matches!(self.peek(), None | Some(',')) {
                break;
            }
        }

        // "a b c" nests right: a { children: [b { children: [c] }] }
        let mut chain = compounds.pop().ok_or_else(|| self.error(ParseErrorKind::EmptyCompound))?;
        while let Some(mut parent) = compounds.pop() {
            parent.children.push(chain);
            chain = parent;
        }
        Ok(chain)
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// Parse one compound, stopping before whitespace, a comma, or the end of
    /// input. May return an empty selector; the caller rejects it.
    fn parse_compound(&mut self) -> Result<Selector, ParseError> {
        let mut selector = Selector::default();
        let start = self.pos;

        match self.peek() {
            Some(c) if is_tag_start_char(c) => {
                selector.tag = self.take_while(is_name_char).to_string();
            }
            Some('*') => {
                self.bump();
                selector.tag.push('*');
            }
            _ => {}
        }

        loop {
            let Some(c) = self.peek() else {
                break;
            };
            match c {
                '#' => {
                    let name = self.parse_prefixed_name('#')?;
                    if !selector.id.is_empty() {
                        return Err(ParseError::new(
                            self.pos - name.len() - 1,
                            ParseErrorKind::DuplicateId,
                        ));
                    }
                    selector.id = name.to_string();
                }
                '.' => {
                    let name = self.parse_prefixed_name('.')?;
                    selector.classes.push(name.to_string());
                }
                '[' => {
                    let open = self.pos;
                    if selector.has_attribute() {
                        return Err(ParseError::new(open, ParseErrorKind::DuplicateAttribute));
                    }
                    self.parse_attribute(&mut selector)?;
                }
                ':' => {
                    let pseudo = self.parse_pseudo()?;
                    selector.pseudo.push_str(pseudo);
                }
                // A parenthesised argument hanging off whatever token came last
                '(' => {
                    if self.pos == start {
                        return Err(self.error(ParseErrorKind::UnexpectedCharacter('(')));
                    }
                    let qualifier = self.parse_parenthesized()?;
                    selector.qualifier.push_str(qualifier);
                }
                ',' => break,
                c if c.is_ascii_whitespace() => break,
                ')' => return Err(self.error(ParseErrorKind::UnbalancedParen)),
                ']' => return Err(self.error(ParseErrorKind::UnbalancedBracket)),
                c => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
            }
        }

        Ok(selector)
    }

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Consume `prefix` and the name that must follow it.
    fn parse_prefixed_name(&mut self, prefix: char) -> Result<&'a str, ParseError> {
        let at = self.pos;
        self.bump();
        let name = self.take_while(is_name_char);
        if name.is_empty() {
            return Err(ParseError::new(at, ParseErrorKind::MissingIdentifier(prefix)));
        }
        Ok(name)
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Parse `[name]` or `[name op value]` into the selector's attribute fields.
    fn parse_attribute(&mut self, selector: &mut Selector) -> Result<(), ParseError> {
        let open = self.pos;
        self.bump(); // consume '['
        self.skip_whitespace();

        let name = self.take_while(is_name_char);
        if name.is_empty() {
            return Err(match self.peek() {
                None => ParseError::new(open, ParseErrorKind::UnbalancedBracket),
                Some(_) => self.error(ParseErrorKind::MissingAttributeName),
            });
        }
        self.skip_whitespace();

        let op_start = self.pos;
        let op = match self.peek() {
            Some(']') => AttrOperator::Exists,
            Some('=') => {
                self.bump();
                AttrOperator::Equals
            }
            Some('*' | '^' | '$' | '~' | '|') => {
                self.bump();
                if self.peek() != Some('=') {
                    return Err(ParseError::new(
                        op_start,
                        ParseErrorKind::InvalidAttributeOperator,
                    ));
                }
                self.bump();
                self.input[op_start..self.pos]
                    .parse::<AttrOperator>()
                    .map_err(|_| {
                        ParseError::new(op_start, ParseErrorKind::InvalidAttributeOperator)
                    })?
            }
            None => return Err(ParseError::new(open, ParseErrorKind::UnbalancedBracket)),
            Some(_) => return Err(self.error(ParseErrorKind::InvalidAttributeOperator)),
        };

        let value = if op == AttrOperator::Exists {
            ""
        } else {
            self.skip_whitespace();
            match self.peek() {
                Some(quote @ ('"' | '\'')) => self.parse_quoted(quote)?,
                Some(']') | None => return Err(self.error(ParseErrorKind::MissingAttributeValue)),
                Some(_) => self.take_while(|c| {
                    c != ']' && c != '"' && c != '\'' && !c.is_ascii_whitespace()
                }),
            }
        };

        self.skip_whitespace();
        match self.peek() {
            Some(']') => self.bump(),
            None => return Err(ParseError::new(open, ParseErrorKind::UnbalancedBracket)),
            Some(c) => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
        }

        selector.attr_name = name.to_string();
        selector.attr_op = op;
        selector.attr_value = value.to_string();
        Ok(())
    }

    /// Consume a string delimited by `quote` and return its contents.
    fn parse_quoted(&mut self, quote: char) -> Result<&'a str, ParseError> {
        let open = self.pos;
        self.bump();
        let contents = self.take_while(|c| c != quote);
        if self.peek().is_none() {
            return Err(ParseError::new(open, ParseErrorKind::UnterminatedString));
        }
        self.bump(); // closing quote
        Ok(contents)
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Consume `:name` or `::name`, plus a parenthesised argument if one
    /// follows, and return the text verbatim.
    fn parse_pseudo(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        self.bump();
        if self.peek() == Some(':') {
            self.bump();
        }
        if self.take_while(is_name_char).is_empty() {
            return Err(ParseError::new(start, ParseErrorKind::MissingIdentifier(':')));
        }
        tracing::debug!(
            pseudo = &self.input[start..self.pos],
            "pseudo token recorded, not evaluated"
        );

        if self.peek() == Some('(') {
            let _ = self.parse_parenthesized()?;
        }
        let input = self.input;
        Ok(&input[start..self.pos])
    }

    /// Consume a balanced `(...)` group and return it verbatim, parentheses
    /// included.
    ///
    /// A quote directly after `(` or `,` whose closing quote appears later
    /// is skipped whole, so `(")")` stays one group. Other quotes, as in
    /// `(it's)`, are ordinary text.
    fn parse_parenthesized(&mut self) -> Result<&'a str, ParseError> {
        let (input, open) = (self.input, self.pos);
        let mut depth = 0u32;
        let mut prev = None;
        while let Some(c) = self.peek() {
            match c {
                '(' => {
                    depth += 1;
                    self.bump();
                }
                ')' => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        return Ok(&input[open..self.pos]);
                    }
                }
                '"' | '\'' if matches!(prev, Some('(' | ',')) => {
                    match input[self.pos + 1..].find(c) {
                        Some(len) => self.pos += len + 2,
                        None => self.bump(),
                    }
                }
                _ => self.bump(),
            }
            prev = Some(c);
        }
        Err(ParseError::new(open, ParseErrorKind::UnbalancedParen))
    }
}
