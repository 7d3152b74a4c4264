//! Entity string parser
//!
//! Converts a single free-form string into `(prefix, suffix, properties)`.
//! The grammar is recursive — parenthesized `key=value` lists may themselves
//! contain commas, colons and equals signs inside nested parentheses — so the
//! split is done with a single-pass cursor scan rather than one regex.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use indexmap::IndexMap;

use crate::error::ParseError;

/// Unvalidated output of [`parse_entity`]
///
/// Consumed immediately by identifier construction; the fields carry whatever
/// the input contained, trimmed but not checked against any grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntity {
    /// Text before the first unparenthesized `:`, or empty
    pub prefix: String,
    /// Local identifier; the whole input when no `:` is present
    pub suffix: String,
    /// `key=value` pairs from the parenthesized block, in input order
    pub properties: IndexMap<String, String>,
}

impl fmt::Display for ParsedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() {
            write!(f, "{}:", self.prefix)?;
        }
        write!(f, "{}", self.suffix)?;
        if !self.properties.is_empty() {
            write!(f, "(")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Parse an entity string into its unvalidated components
///
/// Grammar: `[prefix ":"] suffix ["(" key "=" value ("," key "=" value)* ")"]`.
/// A bare string with no colon is entirely `suffix`; empty input yields the
/// empty triple. An unterminated property block is tolerated: scanning stops
/// at end of input and keeps the pairs collected so far, as is anything after
/// the closing parenthesis.
///
/// # Errors
///
/// Returns [`ParseError::MissingEquals`] when a property clause terminated by
/// `,` or `)` has no `=` separator, and [`ParseError::EmptyKey`] when a
/// clause starts with `=`.
pub fn parse_entity(input: &str) -> Result<ParsedEntity, ParseError> {
    Scanner::new(input).parse()
}

/// Cursor over the input string
struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    fn parse(mut self) -> Result<ParsedEntity, ParseError> {
        let mut parsed = ParsedEntity::default();

        self.skip_whitespace();
        let head = self.scan_until(&[':', '(']);
        match self.peek() {
            Some(':') => {
                self.advance();
                parsed.prefix = head.trim().to_string();
                parsed.suffix = self.scan_until(&['(']).trim().to_string();
            }
            _ => {
                parsed.suffix = head.trim().to_string();
            }
        }

        if self.peek() == Some('(') {
            self.advance();
            self.parse_properties(&mut parsed.properties)?;
        }

        Ok(parsed)
    }

    fn parse_properties(
        &mut self,
        properties: &mut IndexMap<String, String>,
    ) -> Result<(), ParseError> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(')') => {
                    self.advance();
                    return Ok(());
                }
                None => {
                    tracing::debug!("unterminated property block, keeping pairs scanned so far");
                    return Ok(());
                }
                _ => {}
            }

            let clause_start = self.position;
            let key = self.scan_until(&['=', ',', ')']);
            let key = key.trim();
            match self.peek() {
                Some('=') => {
                    if key.is_empty() {
                        return Err(ParseError::EmptyKey {
                            position: clause_start,
                        });
                    }
                    self.advance();
                    let value = self.scan_value();
                    properties.insert(key.to_string(), value.trim().to_string());
                    match self.peek() {
                        Some(',') => {
                            self.advance();
                        }
                        Some(')') => {
                            self.advance();
                            return Ok(());
                        }
                        _ => {
                            tracing::debug!(
                                "unterminated property block, keeping pairs scanned so far"
                            );
                            return Ok(());
                        }
                    }
                }
                Some(',') | Some(')') => {
                    return Err(ParseError::MissingEquals {
                        property: key.to_string(),
                        position: clause_start,
                    });
                }
                None => {
                    // A trailing clause cut off before its `=` falls under the
                    // unterminated-block tolerance and is dropped.
                    if !key.is_empty() {
                        tracing::debug!(property = key, "dropping incomplete trailing property");
                    }
                    return Ok(());
                }
                _ => unreachable!("scan_until stops only at its terminators or end of input"),
            }
        }
    }

    /// Scan a property value, balancing nested parentheses so `,` and `)`
    /// inside a nested block do not terminate the value.
    fn scan_value(&mut self) -> String {
        let mut value = String::new();
        let mut depth: usize = 0;
        while let Some(ch) = self.peek() {
            match ch {
                '(' => depth += 1,
                ')' if depth == 0 => break,
                ')' => depth -= 1,
                ',' if depth == 0 => break,
                _ => {}
            }
            value.push(ch);
            self.advance();
        }
        value
    }

    fn scan_until(&mut self, terminators: &[char]) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if terminators.contains(&ch) {
                break;
            }
            out.push(ch);
            self.advance();
        }
        out
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}
