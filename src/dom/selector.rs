//! Minimal CSS selectors: `tag`, `[attr]`, `[attr='value']` and combinations
//! like `button[data-testid='send-button']`. Enough for site adapter tables.

use thiserror::Error;

use super::node::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    #[error("selector is empty")]
    Empty,
    #[error("unexpected character '{found}' at {position} in selector '{selector}'")]
    Unexpected {
        selector: String,
        found: char,
        position: usize,
    },
    #[error("unterminated attribute matcher in selector '{0}'")]
    Unterminated(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatcher {
    name: String,
    value: Option<String>,
}

/// A compound selector (one element, no combinators)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    attributes: Vec<AttributeMatcher>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorParseError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorParseError::Empty);
        }
        let unexpected = |found: char, position: usize| SelectorParseError::Unexpected {
            selector: source.to_string(),
            found,
            position,
        };

        let mut chars = source.char_indices().peekable();
        let mut tag = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            tag.push(c.to_ascii_lowercase());
            chars.next();
        }

        let mut attributes = Vec::new();
        while let Some((position, c)) = chars.next() {
            if c != '[' {
                return Err(unexpected(c, position));
            }

            let mut name = String::new();
            let mut value = None;
            let mut closed = false;
            while let Some((position, c)) = chars.next() {
                match c {
                    ']' => {
                        closed = true;
                        break;
                    }
                    '=' => {
                        value = Some(Self::parse_value(&mut chars, source)?);
                    }
                    c if is_ident_char(c) && value.is_none() => name.push(c.to_ascii_lowercase()),
                    c => return Err(unexpected(c, position)),
                }
            }
            if !closed || name.is_empty() {
                return Err(SelectorParseError::Unterminated(source.to_string()));
            }
            attributes.push(AttributeMatcher { name, value });
        }

        Ok(Selector {
            tag: (!tag.is_empty()).then_some(tag),
            attributes,
        })
    }

    /// Parse a quoted or bare attribute value after `=`
    fn parse_value(
        chars: &mut std::iter::Peekable<std::str::CharIndices>,
        source: &str,
    ) -> Result<String, SelectorParseError> {
        let quote = match chars.peek() {
            Some(&(_, q @ ('\'' | '"'))) => {
                chars.next();
                Some(q)
            }
            _ => None,
        };

        let mut value = String::new();
        match quote {
            Some(q) => loop {
                match chars.next() {
                    Some((_, c)) if c == q => break,
                    Some((_, c)) => value.push(c),
                    None => return Err(SelectorParseError::Unterminated(source.to_string())),
                }
            },
            None => {
                while let Some(&(_, c)) = chars.peek() {
                    if c == ']' {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
            }
        }
        Ok(value)
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(element) = doc.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if element.tag != *tag {
                return false;
            }
        }
        self.attributes.iter().all(|matcher| {
            match (element.attribute(&matcher.name), &matcher.value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

impl Document {
    /// First element in document order (body included) matching `selector`
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        let body = self.body();
        std::iter::once(body)
            .chain(self.descendants(body))
            .find(|node| selector.matches(self, *node))
    }
}
