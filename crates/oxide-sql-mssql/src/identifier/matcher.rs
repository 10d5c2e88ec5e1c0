//! Validation of raw column lists.
//!
//! The compiler layer uses these matchers to decide whether a raw fragment
//! handed to `select` or `order` is a plain list of column references (and
//! can be quoted and rewritten safely) or arbitrary SQL. The accepted
//! language, case-insensitive:
//!
//! ```text
//! list      := item ( \s* "," \s* item )*
//! item      := expr [ \s+ AS \s+ part ]                          (plain)
//! item      := expr [ \s+ COLLATE \s+ word ]
//!                   [ \s+ (ASC | DESC) ]
//!                   [ \s+ NULLS \s+ (FIRST | LAST) ]             (with order)
//! expr      := word "(" [ expr ] ")" | qualified
//! qualified := part ( "." part ){0,3}
//! part      := word | "[" word "]"
//! ```

/// Maximum number of dots in a qualified name (`server.db.schema.object`).
const MAX_QUALIFIERS: usize = 3;

/// Which column-list grammar to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnNameMatcher {
    /// Column references with an optional `AS alias`.
    Plain,
    /// Column references with optional `COLLATE`, direction and `NULLS` placement.
    WithOrder,
}

impl ColumnNameMatcher {
    /// Returns true if the whole input is accepted.
    #[must_use]
    pub fn matches(self, input: &str) -> bool {
        let mut scanner = Scanner::new(input);
        scanner.list(self) && scanner.at_end()
    }
}

/// Returns true if `input` is a comma-separated list of column references,
/// each optionally aliased.
#[must_use]
pub fn is_column_name(input: &str) -> bool {
    ColumnNameMatcher::Plain.matches(input)
}

/// Returns true if `input` is a comma-separated list of column references,
/// each optionally followed by an ordering clause.
#[must_use]
pub fn is_column_name_with_order(input: &str) -> bool {
    ColumnNameMatcher::WithOrder.matches(input)
}

/// `\w` in the ASCII sense: `[A-Za-z0-9_]`.
const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// `\s+`
    fn whitespace(&mut self) -> bool {
        let start = self.pos;
        self.skip_whitespace();
        self.pos > start
    }

    fn keyword(&mut self, kw: &str) -> bool {
        let matched = self
            .input
            .get(self.pos..self.pos + kw.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(kw));
        if matched {
            self.pos += kw.len();
        }
        matched
    }

    /// `\w+`
    fn word(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.advance();
        }
        self.pos > start
    }

    /// `\w+ | \[\w+\]`
    fn part(&mut self) -> bool {
        if self.eat('[') {
            self.word() && self.eat(']')
        } else {
            self.word()
        }
    }

    fn qualified(&mut self) -> bool {
        let mut dots = 0;
        loop {
            if !self.part() {
                return false;
            }
            if dots < MAX_QUALIFIERS && self.eat('.') {
                dots += 1;
            } else {
                return true;
            }
        }
    }

    fn expr(&mut self) -> bool {
        let start = self.pos;
        // A bare word directly followed by `(` can only be a function call.
        if self.word() && self.eat('(') {
            if self.eat(')') {
                return true;
            }
            return self.expr() && self.eat(')');
        }
        self.pos = start;
        self.qualified()
    }

    /// Runs `rule`, rewinding if it does not match.
    fn optional(&mut self, rule: impl FnOnce(&mut Self) -> bool) {
        let start = self.pos;
        if !rule(self) {
            self.pos = start;
        }
    }

    fn item(&mut self, matcher: ColumnNameMatcher) -> bool {
        if !self.expr() {
            return false;
        }
        match matcher {
            ColumnNameMatcher::Plain => {
                self.optional(|s| {
                    s.whitespace() && s.keyword("AS") && s.whitespace() && s.part()
                });
            }
            ColumnNameMatcher::WithOrder => {
                self.optional(|s| {
                    s.whitespace() && s.keyword("COLLATE") && s.whitespace() && s.word()
                });
                self.optional(|s| s.whitespace() && (s.keyword("ASC") || s.keyword("DESC")));
                self.optional(|s| {
                    s.whitespace()
                        && s.keyword("NULLS")
                        && s.whitespace()
                        && (s.keyword("FIRST") || s.keyword("LAST"))
                });
            }
        }
        true
    }

    fn list(&mut self, matcher: ColumnNameMatcher) -> bool {
        if !self.item(matcher) {
            return false;
        }
        while !self.at_end() {
            self.skip_whitespace();
            if !self.eat(',') {
                return false;
            }
            self.skip_whitespace();
            if !self.item(matcher) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        assert!(is_column_name("name"));
        assert!(is_column_name("[name]"));
        assert!(is_column_name("users.name"));
        assert!(is_column_name("[db].[dbo].[users].[name]"));
        assert!(is_column_name("db.dbo.[users].name"));
    }

    #[test]
    fn test_too_many_parts() {
        assert!(!is_column_name("a.b.c.d.e"));
    }

    #[test]
    fn test_alias() {
        assert!(is_column_name("name AS n"));
        assert!(is_column_name("users.name as [n]"));
        assert!(!is_column_name("name AS"));
        assert!(!is_column_name("name n"));
    }

    #[test]
    fn test_function_calls() {
        assert!(is_column_name("count()"));
        assert!(is_column_name("COUNT(id)"));
        assert!(is_column_name("max(users.[id]) AS top_id"));
        assert!(is_column_name("lower(upper(name))"));
        assert!(!is_column_name("count(*)"));
        assert!(!is_column_name("coalesce(a, b)"));
        assert!(!is_column_name("dbo.fn(a)"));
    }

    #[test]
    fn test_lists() {
        assert!(is_column_name("id, name"));
        assert!(is_column_name("id,name ,  [users].email AS mail"));
        assert!(!is_column_name("id,"));
        assert!(!is_column_name(", id"));
    }

    #[test]
    fn test_rejects_arbitrary_sql() {
        assert!(!is_column_name(""));
        assert!(!is_column_name(" id"));
        assert!(!is_column_name("id "));
        assert!(!is_column_name("id; DROP TABLE users"));
        assert!(!is_column_name("1 + 1"));
        assert!(!is_column_name("[na me]"));
    }

    #[test]
    fn test_word_characters_are_ascii() {
        assert!(is_column_name("Name_2"));
        assert!(!is_column_name("名前"));
        assert!(!is_column_name("café"));
        assert!(!is_column_name_with_order("[naïve] DESC"));
    }

    #[test]
    fn test_ordering_clauses() {
        assert!(is_column_name_with_order("name"));
        assert!(is_column_name_with_order("name ASC"));
        assert!(is_column_name_with_order("name desc"));
        assert!(is_column_name_with_order("name COLLATE Latin1_General_CI_AS DESC"));
        assert!(is_column_name_with_order("name NULLS FIRST"));
        assert!(is_column_name_with_order(
            "users.name COLLATE SQL_Latin1 ASC NULLS LAST, lower(email) DESC"
        ));
    }

    #[test]
    fn test_ordering_rejects_misplaced_clauses() {
        assert!(!is_column_name_with_order("name ASC DESC"));
        assert!(!is_column_name_with_order("name NULLS FIRST ASC"));
        assert!(!is_column_name_with_order("name ASCENDING"));
        assert!(!is_column_name_with_order("name AS n"));
        assert!(!is_column_name("name DESC"));
    }
}
