use std::fmt;

use tracing::trace;

use crate::error::LexError;

/// A zero-based position in the source text, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Returns the location following `ch`. A newline starts a new line.
    fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                line: self.line + 1,
                column: 0,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The lexical class of a [Token].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    String,
    Number,
}

/// Reserved words of the dialect. Matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    As,
    Table,
    Create,
    Insert,
    Into,
    Values,
    Int,
    Text,
    /// Lexed so it cannot be used as a bare identifier; no statement accepts it yet.
    Where,
}

impl Keyword {
    pub const ALL: [Keyword; 11] = [
        Keyword::Select,
        Keyword::From,
        Keyword::As,
        Keyword::Table,
        Keyword::Create,
        Keyword::Insert,
        Keyword::Into,
        Keyword::Values,
        Keyword::Int,
        Keyword::Text,
        Keyword::Where,
    ];

    /// The canonical (lowercase) spelling, which is also the token value.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Select => "select",
            Keyword::From => "from",
            Keyword::As => "as",
            Keyword::Table => "table",
            Keyword::Create => "create",
            Keyword::Insert => "insert",
            Keyword::Into => "into",
            Keyword::Values => "values",
            Keyword::Int => "int",
            Keyword::Text => "text",
            Keyword::Where => "where",
        }
    }
}

/// Punctuation recognized by the symbol scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Semicolon,
    Asterisk,
    Comma,
    LeftParen,
    RightParen,
}

impl Symbol {
    pub const ALL: [Symbol; 5] = [
        Symbol::Semicolon,
        Symbol::Asterisk,
        Symbol::Comma,
        Symbol::LeftParen,
        Symbol::RightParen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Semicolon => ";",
            Symbol::Asterisk => "*",
            Symbol::Comma => ",",
            Symbol::LeftParen => "(",
            Symbol::RightParen => ")",
        }
    }
}

/// The smallest meaningful unit of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Keywords are stored lowercase; string and quoted identifier values
    /// are stored without their delimiters and with escapes folded.
    pub value: String,
    /// Where the first character of the token sits in the source.
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword && self.value == keyword.as_str()
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol && self.value == symbol.as_str()
    }
}

/// A position in the source: character offset plus its [Location].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    pointer: usize,
    location: Location,
}

/// What a sub-scanner returns on a match: the token it produced (whitespace
/// produces none) and the cursor just past the consumed input. A scanner that
/// does not match returns `None` and consumes nothing.
type Scanned = Option<(Option<Token>, Cursor)>;

type Scanner = fn(&Tokenizer, Cursor) -> Scanned;

/// Sub-scanners in the order they are tried at each position.
const SCANNERS: [Scanner; 5] = [
    Tokenizer::scan_keyword,
    Tokenizer::scan_symbol,
    Tokenizer::scan_string,
    Tokenizer::scan_number,
    Tokenizer::scan_identifier,
];

/// A lexical scanner that converts a raw script into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy lookahead.
    input: Vec<char>,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
        }
    }

    /// Processes the entire input and returns its tokens in source order.
    ///
    /// # Errors
    /// Returns a [LexError] at the first position where no sub-scanner matches.
    ///
    /// # Example
    /// ```
    /// # use tinysql::tokenizer::{Keyword, Tokenizer};
    /// let tokens = Tokenizer::new("SELECT id FROM users;").tokenize().unwrap();
    /// assert_eq!(tokens.len(), 5);
    /// assert!(tokens[0].is_keyword(Keyword::Select));
    /// ```
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let mut cursor = Cursor {
            pointer: 0,
            location: Location::default(),
        };
        let mut tokens: Vec<Token> = Vec::new();

        'scan: while !self.is_at_end(cursor) {
            for scanner in SCANNERS {
                if let Some((token, next)) = scanner(self, cursor) {
                    cursor = next;
                    if let Some(token) = token {
                        trace!(kind = ?token.kind, value = %token.value, at = %token.location, "token");
                        tokens.push(token);
                    }
                    continue 'scan;
                }
            }

            return Err(LexError {
                location: cursor.location,
                after: tokens.last().map(|token| token.value.clone()),
            });
        }

        Ok(tokens)
    }

    // --- Navigation Helpers ---

    fn char_at(&self, pointer: usize) -> Option<char> {
        self.input.get(pointer).copied()
    }

    fn is_at_end(&self, cursor: Cursor) -> bool {
        cursor.pointer >= self.input.len()
    }

    /// Moves the cursor forward over one character.
    fn step(&self, cursor: Cursor) -> Cursor {
        match self.char_at(cursor.pointer) {
            Some(ch) => Cursor {
                pointer: cursor.pointer + 1,
                location: cursor.location.advance(ch),
            },
            None => cursor,
        }
    }

    fn step_n(&self, mut cursor: Cursor, n: usize) -> Cursor {
        for _ in 0..n {
            cursor = self.step(cursor);
        }
        cursor
    }

    fn is_identifier_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$'
    }

    /// Finds the longest candidate spelled by the input at `cursor`.
    ///
    /// A running prefix is extended one character at a time. A candidate
    /// drops out once it stops sharing the prefix or once it has matched
    /// completely; the scan ends when no candidate is left. Comparison is
    /// case-insensitive. Returns the candidate and its length in characters.
    fn longest_match<T: Copy>(
        &self,
        cursor: Cursor,
        candidates: &[(T, &'static str)],
    ) -> Option<(T, usize)> {
        let mut prefix = String::new();
        let mut live = vec![true; candidates.len()];
        let mut best: Option<(T, usize)> = None;
        let mut pointer = cursor.pointer;

        while let Some(ch) = self.char_at(pointer) {
            prefix.extend(ch.to_lowercase());
            pointer += 1;

            for (i, (item, spelling)) in candidates.iter().enumerate() {
                if !live[i] {
                    continue;
                }
                if prefix == *spelling {
                    live[i] = false;
                    let len = spelling.chars().count();
                    if best.is_none_or(|(_, best_len)| len > best_len) {
                        best = Some((*item, len));
                    }
                } else if !spelling.starts_with(prefix.as_str()) {
                    live[i] = false;
                }
            }

            if live.iter().all(|alive| !alive) {
                break;
            }
        }

        best
    }

    // --- Sub-scanners ---

    /// Matches a keyword that is not immediately followed by an identifier
    /// character, so `ask` and `integer` are left for the identifier scanner.
    fn scan_keyword(&self, cursor: Cursor) -> Scanned {
        let candidates = Keyword::ALL.map(|keyword| (keyword, keyword.as_str()));
        let (keyword, len) = self.longest_match(cursor, &candidates)?;

        if self
            .char_at(cursor.pointer + len)
            .is_some_and(Self::is_identifier_char)
        {
            return None;
        }

        let token = Token::new(TokenKind::Keyword, keyword.as_str(), cursor.location);
        Some((Some(token), self.step_n(cursor, len)))
    }

    /// Matches a symbol, or consumes one whitespace character without
    /// producing a token.
    fn scan_symbol(&self, cursor: Cursor) -> Scanned {
        if let Some(' ' | '\t' | '\n' | '\r') = self.char_at(cursor.pointer) {
            return Some((None, self.step(cursor)));
        }

        let candidates = Symbol::ALL.map(|symbol| (symbol, symbol.as_str()));
        let (symbol, len) = self.longest_match(cursor, &candidates)?;

        let token = Token::new(TokenKind::Symbol, symbol.as_str(), cursor.location);
        Some((Some(token), self.step_n(cursor, len)))
    }

    fn scan_string(&self, cursor: Cursor) -> Scanned {
        self.scan_delimited(cursor, '\'', TokenKind::String)
    }

    /// Reads text between two `delimiter`s. A doubled delimiter inside the
    /// text stands for one literal delimiter. Unterminated text does not match.
    fn scan_delimited(&self, cursor: Cursor, delimiter: char, kind: TokenKind) -> Scanned {
        if self.char_at(cursor.pointer) != Some(delimiter) {
            return None;
        }

        let mut value = String::new();
        let mut next = self.step(cursor);

        while let Some(ch) = self.char_at(next.pointer) {
            if ch == delimiter {
                if self.char_at(next.pointer + 1) == Some(delimiter) {
                    value.push(delimiter);
                    next = self.step_n(next, 2);
                    continue;
                }
                let token = Token::new(kind, value, cursor.location);
                return Some((Some(token), self.step(next)));
            }
            value.push(ch);
            next = self.step(next);
        }

        None
    }

    /// Reads digits with at most one decimal point and at most one exponent
    /// marker `e`, optionally signed. A second point or marker rejects the
    /// whole literal rather than cutting it short.
    fn scan_number(&self, cursor: Cursor) -> Scanned {
        let mut next = cursor;
        let mut has_digit = false;
        let mut has_period = false;
        let mut has_exponent = false;

        while let Some(ch) = self.char_at(next.pointer) {
            match ch {
                '0'..='9' => {
                    has_digit = true;
                    next = self.step(next);
                }
                '.' => {
                    if has_period || has_exponent {
                        return None;
                    }
                    has_period = true;
                    next = self.step(next);
                }
                'e' if has_digit => {
                    if has_exponent {
                        return None;
                    }
                    has_exponent = true;
                    next = self.step(next);

                    if let Some('+' | '-') = self.char_at(next.pointer) {
                        next = self.step(next);
                    }
                    if !self.char_at(next.pointer).is_some_and(|c| c.is_ascii_digit()) {
                        return None;
                    }
                }
                _ => break,
            }
        }

        if !has_digit {
            return None;
        }

        let value: String = self.input[cursor.pointer..next.pointer].iter().collect();
        Some((Some(Token::new(TokenKind::Number, value, cursor.location)), next))
    }

    /// Reads a double-quoted identifier, or a bare one starting with a letter
    /// followed by letters, digits, `_` or `$`.
    fn scan_identifier(&self, cursor: Cursor) -> Scanned {
        if let Some(scanned) = self.scan_delimited(cursor, '"', TokenKind::Identifier) {
            return Some(scanned);
        }

        if !self.char_at(cursor.pointer).is_some_and(char::is_alphabetic) {
            return None;
        }

        let mut next = self.step(cursor);
        while self
            .char_at(next.pointer)
            .is_some_and(Self::is_identifier_char)
        {
            next = self.step(next);
        }

        let value: String = self.input[cursor.pointer..next.pointer].iter().collect();
        Some((
            Some(Token::new(TokenKind::Identifier, value, cursor.location)),
            next,
        ))
    }
}

/// Tokenizes `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(source).tokenize()
}
