//! Single-pass lexer for the Rotor scripting language.
//!
//! See [`Scanner`] for the main entry point.  The scanner is
//! context-sensitive in exactly one place: a `/` opens a regular-expression
//! literal or acts as the division operator depending on the previously
//! emitted token (see [`slash_starts_regex`]).

use crate::error::{RotorError, RotorResult};

// ─────────────────────────────────────────────────────────────────────────────
// Position / Range
// ─────────────────────────────────────────────────────────────────────────────

/// A line/column location in source code.
///
/// Both fields are 1-based.  The line advances on every literal newline in
/// the source; the column resets to 1 at the start of each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Position {
    /// Creates a position from a line/column pair.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An ordered `begin`/`end` pair of positions, carried by every token and
/// every syntax-tree node for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    /// Where the construct starts.
    pub begin: Position,
    /// Where the construct ends (the start of whatever follows it).
    pub end: Position,
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic category of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ── Punctuators ───────────────────────────────────────────────────────
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `.`
    Dot,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,

    /// Any operator from the fixed operator table (`+`, `<<=`, `&&`, …).
    Operator,

    // ── Literals ──────────────────────────────────────────────────────────
    /// An identifier that is not a reserved word.
    Identifier,
    /// Numeric literal (decimal, hex, binary, or octal).
    Number,
    /// String literal; the lexeme keeps its enclosing quotes and has its
    /// escape sequences already decoded.
    String,
    /// Regular-expression literal `/pattern/flags`, stored raw.
    Regular,

    /// A reserved word (see [`is_keyword`]).
    Keyword,

    /// End of input.
    Eof,
}

// ─────────────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────────────

/// A single lexical token produced by the [`Scanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category.
    pub kind: TokenKind,
    /// The token text.  Strings keep their quotes (escapes decoded); regular
    /// expressions keep their delimiters and flags; the end-of-file token is
    /// empty.
    pub lexeme: String,
    /// Source location of this token.
    pub range: Range,
}

impl std::fmt::Display for Token {
    /// Renders the token for diagnostics, truncating long lexemes.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut text = self.lexeme.clone();
        if text.chars().count() > 10 {
            text = text.chars().take(7).collect();
            text.push_str("...");
        }
        write!(f, "Token [{}] at {}", text, self.range.begin)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Character-classification helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` for characters that may *start* an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Returns `true` for characters that may *continue* an identifier.
fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// Returns `true` if `c` is a valid digit in the given base (2, 8, 10, 16).
fn is_digit_in_base(c: char, base: u32) -> bool {
    c.to_digit(base).is_some()
}

/// Returns `true` if `s` is one of the reserved words of the language.
pub fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "abstract"
            | "arguments"
            | "boolean"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "eval"
            | "export"
            | "extends"
            | "false"
            | "final"
            | "finally"
            | "float"
            | "for"
            | "function"
            | "goto"
            | "if"
            | "implements"
            | "import"
            | "in"
            | "instanceof"
            | "int"
            | "interface"
            | "let"
            | "long"
            | "native"
            | "new"
            | "null"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "short"
            | "static"
            | "super"
            | "switch"
            | "synchronized"
            | "this"
            | "throw"
            | "throws"
            | "transient"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "volatile"
            | "while"
            | "with"
            | "yield"
    )
}

/// Maps a punctuator or operator lexeme to its [`TokenKind`], or `None` if
/// the text is not in the fixed symbol table.  Multi-character operators are
/// matched longest-first by [`Scanner`] probing successively longer slices.
fn symbol_kind(s: &str) -> Option<TokenKind> {
    let kind = match s {
        "," => TokenKind::Comma,
        ";" => TokenKind::Semicolon,
        ":" => TokenKind::Colon,
        "?" => TokenKind::Question,
        "." => TokenKind::Dot,
        "(" => TokenKind::LeftParen,
        ")" => TokenKind::RightParen,
        "[" => TokenKind::LeftBracket,
        "]" => TokenKind::RightBracket,
        "{" => TokenKind::LeftBrace,
        "}" => TokenKind::RightBrace,

        // Arithmetic
        "+" | "-" | "*" | "/" | "%" | "++" | "--" => TokenKind::Operator,
        // Bitwise
        "&" | "|" | "~" | "^" | "<<" | ">>" => TokenKind::Operator,
        // Assignment
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "~=" | "^=" | "<<=" | ">>=" => {
            TokenKind::Operator
        }
        // Relational
        ">" | ">=" | "<" | "<=" | "==" | "!=" | "===" | "!==" => TokenKind::Operator,
        // Logical
        "&&" | "||" | "!" => TokenKind::Operator,

        _ => return None,
    };
    Some(kind)
}

/// Returns `true` when a `/` should open a regular-expression literal rather
/// than act as a division operator, given the most recent emitted token.
///
/// `/` is *division* only after tokens that can end a value expression: an
/// identifier, a number, a string, a regex, a keyword, or the lexeme `)`.
/// Every other context (including the start of input) is a regex.
fn slash_starts_regex(prev: Option<&(TokenKind, bool)>) -> bool {
    match prev {
        None => true,
        Some(&(kind, is_rparen)) => {
            !is_rparen
                && !matches!(
                    kind,
                    TokenKind::Identifier
                        | TokenKind::Number
                        | TokenKind::String
                        | TokenKind::Regular
                        | TokenKind::Keyword
                )
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// Single-pass lexer over a UTF-8 source string.
///
/// Call [`Scanner::next_token`] repeatedly until a token with
/// [`TokenKind::Eof`] is returned, or use [`Scanner::tokenize_all`] to
/// collect the whole stream at once.  Beyond its cursor the scanner keeps
/// only the last emitted token, which drives the regex/division split.
///
/// # Example
///
/// ```
/// use rotor_core::parser::scanner::{Scanner, TokenKind};
///
/// let mut sc = Scanner::new("var x = 42;");
/// loop {
///     let tok = sc.next_token().unwrap();
///     if tok.kind == TokenKind::Eof { break; }
///     println!("{tok}");
/// }
/// ```
pub struct Scanner<'src> {
    /// The complete source string.
    source: &'src str,
    /// Current byte position within `source`.
    pos: usize,
    /// Current 1-based line number.
    line: u32,
    /// Current 1-based column number.
    column: u32,
    /// Kind of the most recent emitted token, plus whether its lexeme was
    /// `)`.  Drives [`slash_starts_regex`].
    prev: Option<(TokenKind, bool)>,
}

impl<'src> Scanner<'src> {
    /// Creates a new scanner for the given source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            prev: None,
        }
    }

    /// Returns `true` when all input has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Tokenizes the entire source, returning the token list terminated by a
    /// single [`TokenKind::Eof`] token.  Empty input yields just the
    /// end-of-file token.
    pub fn tokenize_all(source: &str) -> RotorResult<Vec<Token>> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = scanner.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    // ── Low-level character helpers ─────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.source[self.pos..].chars();
        it.next();
        it.next()
    }

    /// Advances past the current character, updating line/column tracking.
    fn advance(&mut self) -> char {
        let ch = self.source[self.pos..]
            .chars()
            .next()
            .expect("advance called past end of input");
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn token(&self, kind: TokenKind, lexeme: String, begin: Position) -> Token {
        Token {
            kind,
            lexeme,
            range: Range {
                begin,
                end: self.position(),
            },
        }
    }

    // ── Main public API ─────────────────────────────────────────────────────

    /// Scans and returns the next [`Token`].
    ///
    /// Comments and whitespace are consumed silently; so is any character
    /// that starts no token at all.  Returns a token with [`TokenKind::Eof`]
    /// once the input is exhausted, and keeps returning it thereafter.
    pub fn next_token(&mut self) -> RotorResult<Token> {
        let tok = self.scan_token()?;
        if tok.kind != TokenKind::Eof {
            self.prev = Some((tok.kind, tok.lexeme == ")"));
        }
        Ok(tok)
    }

    fn scan_token(&mut self) -> RotorResult<Token> {
        loop {
            let Some(c) = self.peek() else {
                let here = self.position();
                return Ok(self.token(TokenKind::Eof, String::new(), here));
            };
            let begin = self.position();

            if is_identifier_start(c) {
                return Ok(self.scan_identifier(begin));
            }
            if c == '"' || c == '\'' {
                return self.scan_string(begin);
            }
            if c == '/' {
                match self.peek2() {
                    Some('/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') => {
                        self.skip_block_comment(begin)?;
                        continue;
                    }
                    _ => {
                        if slash_starts_regex(self.prev.as_ref()) {
                            return self.scan_regex(begin);
                        }
                        return Ok(self.scan_symbol(begin));
                    }
                }
            }
            if c.is_ascii_digit() {
                return Ok(self.scan_number(begin));
            }
            if c == '\n' {
                self.advance();
                continue;
            }
            if symbol_kind(&self.source[self.pos..self.pos + c.len_utf8()]).is_some() {
                return Ok(self.scan_symbol(begin));
            }

            // Whitespace and anything else outside the vocabulary.
            self.advance();
        }
    }

    // ── Identifier / keyword ────────────────────────────────────────────────

    fn scan_identifier(&mut self, begin: Position) -> Token {
        let start = self.pos;
        self.advance();
        while matches!(self.peek(), Some(c) if is_identifier_part(c)) {
            self.advance();
        }
        let lexeme = self.source[start..self.pos].to_string();
        let kind = if is_keyword(&lexeme) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.token(kind, lexeme, begin)
    }

    // ── String literal ──────────────────────────────────────────────────────

    /// Scans a `'…'` or `"…"` literal.  The stored lexeme keeps the quotes;
    /// the recognized escapes are decoded and an unrecognized escape drops
    /// its backslash.  Strings may span lines.
    fn scan_string(&mut self, begin: Position) -> RotorResult<Token> {
        let quote = self.advance();
        let mut text = String::new();
        text.push(quote);
        loop {
            match self.peek() {
                None => {
                    return Err(RotorError::Syntax(format!(
                        "Unterminated string literal at {begin}"
                    )));
                }
                Some(c) if c == quote => {
                    self.advance();
                    text.push(quote);
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let Some(escaped) = self.peek() else {
                        return Err(RotorError::Syntax(format!(
                            "Unterminated string literal at {begin}"
                        )));
                    };
                    self.advance();
                    text.push(match escaped {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'b' => '\u{8}',
                        'f' => '\u{c}',
                        other => other, // includes \' \" \\ and anything else
                    });
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        Ok(self.token(TokenKind::String, text, begin))
    }

    // ── Regular-expression literal ──────────────────────────────────────────

    /// Scans a `/pattern/flags` literal.  The body is kept raw (escapes
    /// included); the trailing flag letters are part of the lexeme.
    fn scan_regex(&mut self, begin: Position) -> RotorResult<Token> {
        let start = self.pos;
        self.advance(); // opening /
        loop {
            match self.peek() {
                None => {
                    return Err(RotorError::Syntax(format!(
                        "Unterminated regular expression at {begin}"
                    )));
                }
                Some('/') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_none() {
                        return Err(RotorError::Syntax(format!(
                            "Unterminated regular expression at {begin}"
                        )));
                    }
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.advance();
        }
        let lexeme = self.source[start..self.pos].to_string();
        Ok(self.token(TokenKind::Regular, lexeme, begin))
    }

    // ── Comments ────────────────────────────────────────────────────────────

    fn skip_line_comment(&mut self) {
        // `//` up to (not including) the newline.
        while matches!(self.peek(), Some(c) if c != '\n') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self, begin: Position) -> RotorResult<()> {
        self.advance(); // /
        self.advance(); // *
        loop {
            match self.peek() {
                None => {
                    return Err(RotorError::Syntax(format!(
                        "Unterminated block comment at {begin}"
                    )));
                }
                Some('*') if self.peek2() == Some('/') => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    // ── Numeric literal ─────────────────────────────────────────────────────

    /// Scans a numeric literal.  A leading `0` selects the base: `0x`/`0X`
    /// hex, `0b`/`0B` binary, `0o`/`0O` or another octal digit base 8.  The
    /// digit run may be followed by a fraction in the same base and a
    /// decimal exponent with an optional sign.
    fn scan_number(&mut self, begin: Position) -> Token {
        let start = self.pos;
        let first = self.advance();

        let mut base = 10;
        if first == '0' {
            match self.peek() {
                Some('x') | Some('X') => {
                    self.advance();
                    base = 16;
                }
                Some('b') | Some('B') => {
                    self.advance();
                    base = 2;
                }
                Some('o') | Some('O') => {
                    self.advance();
                    base = 8;
                }
                Some(c) if ('0'..='7').contains(&c) => {
                    base = 8;
                }
                _ => {}
            }
        }

        while matches!(self.peek(), Some(c) if is_digit_in_base(c, base)) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if is_digit_in_base(c, base)) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme = self.source[start..self.pos].to_string();
        self.token(TokenKind::Number, lexeme, begin)
    }

    // ── Punctuators and operators ───────────────────────────────────────────

    /// Longest-match scan against the fixed symbol table.  The caller has
    /// verified that the current character starts a symbol.
    fn scan_symbol(&mut self, begin: Position) -> Token {
        let start = self.pos;
        self.advance();
        while let Some(c) = self.peek() {
            let candidate = &self.source[start..self.pos + c.len_utf8()];
            if symbol_kind(candidate).is_none() {
                break;
            }
            self.advance();
        }
        let lexeme = self.source[start..self.pos].to_string();
        let kind = symbol_kind(&lexeme).expect("caller checked the symbol table");
        self.token(kind, lexeme, begin)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenCursor
// ─────────────────────────────────────────────────────────────────────────────

/// A cursor over a fully tokenized source: peek the current token, advance
/// past it, and detect the end of the stream.  Once the end-of-file token is
/// reached the cursor keeps yielding it.
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    /// Wraps a token list produced by [`Scanner::tokenize_all`].
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last(),
            Some(t) if t.kind == TokenKind::Eof
        ));
        Self { tokens, pos: 0 }
    }

    /// The current token.
    pub fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token list is never empty"))
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Returns `true` once the cursor rests on the end-of-file token.
    pub fn is_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Tokenizes `src` and returns the token kinds, without the EOF token.
    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut toks = Scanner::tokenize_all(src).unwrap();
        assert_eq!(toks.pop().unwrap().kind, TokenKind::Eof);
        toks.into_iter().map(|t| t.kind).collect()
    }

    /// Tokenizes `src` and returns the lexemes, without the EOF token.
    fn lexemes(src: &str) -> Vec<String> {
        let mut toks = Scanner::tokenize_all(src).unwrap();
        toks.pop();
        toks.into_iter().map(|t| t.lexeme).collect()
    }

    // ── Keywords and identifiers ───────────────────────────────────────────

    #[test]
    fn test_every_keyword_lexes_to_one_keyword_token() {
        let keywords = "abstract arguments boolean break byte case catch char \
                        class const continue debugger default delete do double \
                        else enum eval export extends false final finally float \
                        for function goto if implements import in instanceof int \
                        interface let long native new null package private \
                        protected public return short static super switch \
                        synchronized this throw throws transient true try typeof \
                        var void volatile while with yield";
        for kw in keywords.split_whitespace() {
            let toks = Scanner::tokenize_all(kw).unwrap();
            assert_eq!(toks.len(), 2, "{kw}");
            assert_eq!(toks[0].kind, TokenKind::Keyword, "{kw}");
            assert_eq!(toks[0].lexeme, kw);
        }
    }

    #[test]
    fn test_identifiers_with_dollar_and_underscore() {
        assert_eq!(
            kinds("$a _b c1 undefined"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier
            ]
        );
    }

    // ── Strings ────────────────────────────────────────────────────────────

    #[test]
    fn test_string_keeps_quotes_and_decodes_escapes() {
        assert_eq!(lexemes(r#""a\nb""#), vec!["\"a\nb\""]);
        assert_eq!(lexemes(r"'it\'s'"), vec!["'it's'"]);
        // Unrecognized escapes drop the backslash.
        assert_eq!(lexemes(r#""\q""#), vec!["\"q\""]);
    }

    #[test]
    fn test_string_spans_lines_and_advances_line_counter() {
        let toks = Scanner::tokenize_all("\"a\nb\" x").unwrap();
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[1].lexeme, "x");
        assert_eq!(toks[1].range.begin, Position::new(2, 4));
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert!(Scanner::tokenize_all("\"abc").is_err());
    }

    // ── Numbers ────────────────────────────────────────────────────────────

    #[test]
    fn test_number_bases_and_forms() {
        let src = "0 7 0x1F 0b101 0o17 017 1.5 2e3 1e-2 0.25";
        let toks = lexemes(src);
        assert_eq!(
            toks,
            vec!["0", "7", "0x1F", "0b101", "0o17", "017", "1.5", "2e3", "1e-2", "0.25"]
        );
        assert!(kinds(src).iter().all(|k| *k == TokenKind::Number));
    }

    #[test]
    fn test_octal_stops_at_invalid_digit() {
        // `019` is not one octal literal: the run ends at `9`.
        assert_eq!(lexemes("019"), vec!["01", "9"]);
    }

    // ── Regex vs. division ─────────────────────────────────────────────────

    #[test]
    fn test_regex_after_operator_keeps_flags() {
        let toks = Scanner::tokenize_all("var re = /abc/gi;").unwrap();
        assert_eq!(toks[3].kind, TokenKind::Regular);
        assert_eq!(toks[3].lexeme, "/abc/gi");
    }

    #[test]
    fn test_slash_after_rparen_is_division() {
        let toks = Scanner::tokenize_all("(a) / 2").unwrap();
        let slash = &toks[3];
        assert_eq!(slash.kind, TokenKind::Operator);
        assert_eq!(slash.lexeme, "/");
    }

    #[test]
    fn test_slash_after_identifier_and_number_is_division() {
        assert_eq!(
            kinds("a / b / 2"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_regex_at_start_of_input() {
        let toks = Scanner::tokenize_all("/ab\\/c/").unwrap();
        assert_eq!(toks[0].kind, TokenKind::Regular);
        assert_eq!(toks[0].lexeme, "/ab\\/c/");
    }

    // ── Comments ───────────────────────────────────────────────────────────

    #[test]
    fn test_comments_are_discarded() {
        let src = "a // trailing\n/* block\nspanning */ b";
        assert_eq!(lexemes(src), vec!["a", "b"]);
        let toks = Scanner::tokenize_all(src).unwrap();
        assert_eq!(toks[1].range.begin.line, 3);
    }

    #[test]
    fn test_unterminated_block_comment_is_an_error() {
        assert!(Scanner::tokenize_all("/* never closed").is_err());
    }

    // ── Operators ──────────────────────────────────────────────────────────

    #[test]
    fn test_longest_match_operators() {
        assert_eq!(
            lexemes("a <<= b >>= c === d !== e && f || !g"),
            vec!["a", "<<=", "b", ">>=", "c", "===", "d", "!==", "e", "&&", "f", "||", "!", "g"]
        );
    }

    #[test]
    fn test_increment_does_not_split() {
        assert_eq!(lexemes("i++ + ++j"), vec!["i", "++", "+", "++", "j"]);
    }

    // ── Cursor / EOF ───────────────────────────────────────────────────────

    #[test]
    fn test_empty_input_yields_single_eof() {
        let toks = Scanner::tokenize_all("").unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Eof);
        assert_eq!(toks[0].range.begin, Position::new(1, 1));
    }

    #[test]
    fn test_cursor_sticks_at_eof() {
        let mut cur = TokenCursor::new(Scanner::tokenize_all("x").unwrap());
        assert_eq!(cur.advance().kind, TokenKind::Identifier);
        assert!(cur.is_end());
        assert_eq!(cur.advance().kind, TokenKind::Eof);
        assert_eq!(cur.advance().kind, TokenKind::Eof);
    }

    #[test]
    fn test_token_ranges_are_ordered() {
        for tok in Scanner::tokenize_all("var x = 1 + 2;\nx = x * 3;").unwrap() {
            assert!(tok.range.begin <= tok.range.end, "{tok}");
        }
    }
}
