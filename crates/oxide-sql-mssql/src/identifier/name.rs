//! Multi-part SQL Server names.
//!
//! SQL Server addresses objects with up to four dotted parts,
//! `server.database.schema.object`, where any part may be bracket-quoted.
//! A column reference reuses the same shape with the column in the object
//! position (`[database].[owner].[table].[column]`).

use core::fmt;

/// Separator between name parts.
const SEPARATOR: char = '.';

/// One dotted part of a name, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierPart {
    raw: String,
}

impl IdentifierPart {
    /// Creates a part from its raw text.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the part as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns true if the part is one bracketed identifier.
    ///
    /// The bracket opening the part must close at its very end; every `]`
    /// before that has to be escaped as `]]`. `[a];x]` is not quoted.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        let Some(body) = self.raw.strip_prefix('[') else {
            return false;
        };
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            if c == ']' {
                if chars.peek() == Some(&']') {
                    chars.next();
                } else {
                    return chars.peek().is_none();
                }
            }
        }
        false
    }

    /// Returns the bare name, with brackets removed and `]]` unescaped.
    #[must_use]
    pub fn unquoted(&self) -> String {
        if self.is_quoted() {
            self.raw[1..self.raw.len() - 1].replace("]]", "]")
        } else {
            self.raw.clone()
        }
    }

    /// Returns the bracket-quoted form.
    ///
    /// Quoting is idempotent: a part that is already bracketed comes back
    /// unchanged instead of gaining a second pair of brackets.
    #[must_use]
    pub fn quoted(&self) -> String {
        if self.is_quoted() {
            self.raw.clone()
        } else {
            format!("[{}]", self.raw.replace(']', "]]"))
        }
    }
}

/// A parsed, possibly multi-part, identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    raw: String,
    parts: Vec<IdentifierPart>,
}

impl Identifier {
    /// Splits a raw name into its dotted parts.
    ///
    /// Dots inside a bracketed part do not split it, and `]]` inside
    /// brackets is an escaped closing bracket. No validation is performed:
    /// malformed input still produces parts, each of which quotes to a
    /// bracketed form.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut in_brackets = false;
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '[' if !in_brackets && current.is_empty() => {
                    in_brackets = true;
                    current.push(c);
                }
                ']' if in_brackets => {
                    current.push(c);
                    if chars.peek() == Some(&']') {
                        current.push(']');
                        chars.next();
                    } else {
                        in_brackets = false;
                    }
                }
                SEPARATOR if !in_brackets => {
                    parts.push(IdentifierPart::new(core::mem::take(&mut current)));
                }
                _ => current.push(c),
            }
        }
        parts.push(IdentifierPart::new(current));

        Self {
            raw: String::from(raw),
            parts,
        }
    }

    /// Returns the name as it was requested.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns all parts, leftmost first.
    #[must_use]
    pub fn parts(&self) -> &[IdentifierPart] {
        &self.parts
    }

    /// The rightmost part: the object (table, view, column) itself.
    #[must_use]
    pub fn object(&self) -> Option<&IdentifierPart> {
        self.from_right(0)
    }

    /// The schema (owner) qualifier.
    #[must_use]
    pub fn schema(&self) -> Option<&IdentifierPart> {
        self.from_right(1)
    }

    /// The database qualifier.
    #[must_use]
    pub fn database(&self) -> Option<&IdentifierPart> {
        self.from_right(2)
    }

    /// The linked-server qualifier.
    #[must_use]
    pub fn server(&self) -> Option<&IdentifierPart> {
        self.from_right(3)
    }

    fn from_right(&self, offset: usize) -> Option<&IdentifierPart> {
        self.parts
            .len()
            .checked_sub(offset + 1)
            .and_then(|idx| self.parts.get(idx))
    }

    /// Returns the fully quoted name, e.g. `[dbo].[Users]`.
    #[must_use]
    pub fn quoted(&self) -> String {
        self.parts
            .iter()
            .map(IdentifierPart::quoted)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted())
    }
}

/// Parses a raw name into its parts.
#[must_use]
pub fn extract_identifiers(raw: &str) -> Identifier {
    Identifier::parse(raw)
}
