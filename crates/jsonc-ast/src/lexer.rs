//! Tokenizer for the JSON-family superset.
//!
//! The lexer accepts the full permissive grammar — single quotes, hex
//! numbers, templates, regular expressions, bigints — and produces raw
//! tokens plus a separate comment stream, each with spans and locations.
//! Which of those features are legal under the active dialect is the
//! parser's decision, not the lexer's.

use crate::error::{ParseError, ParseErrorKind};
use crate::types::{Comment, CommentKind, Position, SourceLocation, Span, Token, TokenKind};

/// ECMAScript *LineTerminator* code points.
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// ECMAScript *WhiteSpace* or *LineTerminator*.
fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\x0B'
            | '\x0C'
            | ' '
            | '\u{00A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\n'
            | '\r'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Characters that may start an identifier.
fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

/// Characters that may continue an identifier.
fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

/// Returns `true` when a `/` opens a regular-expression literal rather
/// than acting as a division operator, judged from the most recent
/// significant token: `/` divides only after a token that produced a
/// value or closed a bracketed construct.
fn slash_starts_regexp(last: Option<&Token>) -> bool {
    match last {
        None => true,
        Some(t) => match t.kind {
            TokenKind::Numeric
            | TokenKind::String
            | TokenKind::Template
            | TokenKind::RegularExpression
            | TokenKind::Boolean
            | TokenKind::Null
            | TokenKind::Identifier => false,
            TokenKind::Punctuator => !matches!(t.value.as_str(), ")" | "]" | "}"),
        },
    }
}

/// Everything the lexer produces for one input.
#[derive(Debug)]
pub(crate) struct LexOutput {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    /// Position just past the final character.
    pub end: Position,
}

pub(crate) struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.source[self.pos..].chars();
        it.next();
        it.next()
    }

    fn peek3(&self) -> Option<char> {
        let mut it = self.source[self.pos..].chars();
        it.next();
        it.next();
        it.next()
    }

    /// Advance past the current character, updating line/column tracking.
    /// CRLF counts as a single line terminator; both bytes are consumed.
    fn advance(&mut self) -> char {
        let ch = self.source[self.pos..]
            .chars()
            .next()
            .expect("advance called past end of input");
        self.pos += ch.len_utf8();
        match ch {
            '\r' => {
                if self.source[self.pos..].starts_with('\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.column = 0;
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
            }
            _ => {
                self.column += 1;
            }
        }
        ch
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, kind: ParseErrorKind, pos: Position, index: usize) -> ParseError {
        ParseError::new(kind, pos, index)
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        self.error(kind, self.position(), self.pos)
    }

    fn unexpected_end(&self) -> ParseError {
        self.error_here(ParseErrorKind::UnexpectedEnd)
    }

    fn raw(&self, start: usize) -> String {
        self.source[start..self.pos].to_string()
    }

    fn token(&self, kind: TokenKind, start: usize, start_pos: Position) -> Token {
        Token {
            kind,
            value: self.raw(start),
            span: Span::new(start, self.pos),
            loc: SourceLocation {
                start: start_pos,
                end: self.position(),
            },
        }
    }

    /// Tokenize the whole input.
    pub(crate) fn tokenize(mut self) -> Result<LexOutput, ParseError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut comments: Vec<Comment> = Vec::new();

        loop {
            while matches!(self.peek(), Some(c) if is_whitespace(c)) {
                self.advance();
            }
            let start = self.pos;
            let start_pos = self.position();
            let Some(c) = self.peek() else { break };

            match c {
                '/' if self.peek2() == Some('/') => {
                    comments.push(self.scan_line_comment(start, start_pos));
                }
                '/' if self.peek2() == Some('*') => {
                    comments.push(self.scan_block_comment(start, start_pos)?);
                }
                '/' if slash_starts_regexp(tokens.last()) => {
                    tokens.push(self.scan_regexp(start, start_pos)?);
                }
                '"' | '\'' => {
                    tokens.push(self.scan_string(c, start, start_pos)?);
                }
                '`' => {
                    tokens.push(self.scan_template(start, start_pos)?);
                }
                '0'..='9' => {
                    tokens.push(self.scan_numeric(start, start_pos)?);
                }
                '.' if matches!(self.peek2(), Some(d) if d.is_ascii_digit()) => {
                    tokens.push(self.scan_numeric(start, start_pos)?);
                }
                '.' if self.peek2() == Some('.') && self.peek3() == Some('.') => {
                    self.advance();
                    self.advance();
                    self.advance();
                    tokens.push(self.token(TokenKind::Punctuator, start, start_pos));
                }
                '*' if self.peek2() == Some('*') => {
                    self.advance();
                    self.advance();
                    tokens.push(self.token(TokenKind::Punctuator, start, start_pos));
                }
                '{' | '}' | '[' | ']' | ':' | ',' | '+' | '-' | '*' | '/' | '%' | '(' | ')'
                | '.' => {
                    self.advance();
                    tokens.push(self.token(TokenKind::Punctuator, start, start_pos));
                }
                c if is_id_start(c) || c == '\\' => {
                    tokens.push(self.scan_identifier(start, start_pos)?);
                }
                other => {
                    return Err(self.error(
                        ParseErrorKind::UnexpectedToken(other.to_string()),
                        start_pos,
                        start,
                    ));
                }
            }
        }

        Ok(LexOutput {
            tokens,
            comments,
            end: self.position(),
        })
    }

    fn scan_line_comment(&mut self, start: usize, start_pos: Position) -> Comment {
        self.advance();
        self.advance();
        let text_start = self.pos;
        while matches!(self.peek(), Some(c) if !is_line_terminator(c)) {
            self.advance();
        }
        Comment {
            kind: CommentKind::Line,
            value: self.source[text_start..self.pos].to_string(),
            span: Span::new(start, self.pos),
            loc: SourceLocation {
                start: start_pos,
                end: self.position(),
            },
        }
    }

    fn scan_block_comment(
        &mut self,
        start: usize,
        start_pos: Position,
    ) -> Result<Comment, ParseError> {
        self.advance();
        self.advance();
        let text_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.unexpected_end()),
                Some('*') if self.peek2() == Some('/') => {
                    let text_end = self.pos;
                    self.advance();
                    self.advance();
                    return Ok(Comment {
                        kind: CommentKind::Block,
                        value: self.source[text_start..text_end].to_string(),
                        span: Span::new(start, self.pos),
                        loc: SourceLocation {
                            start: start_pos,
                            end: self.position(),
                        },
                    });
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn scan_string(
        &mut self,
        quote: char,
        start: usize,
        start_pos: Position,
    ) -> Result<Token, ParseError> {
        self.advance();
        loop {
            match self.peek() {
                None => return Err(self.unexpected_end()),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_none() {
                        return Err(self.unexpected_end());
                    }
                    // Escaped char or line continuation; CRLF folds in advance().
                    self.advance();
                }
                // U+2028/U+2029 are legal unescaped; \n and \r are not.
                Some('\n') | Some('\r') => {
                    return Err(self.error_here(ParseErrorKind::UnexpectedToken(
                        "\\n".to_string(),
                    )));
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        Ok(self.token(TokenKind::String, start, start_pos))
    }

    fn scan_template(&mut self, start: usize, start_pos: Position) -> Result<Token, ParseError> {
        self.advance();
        loop {
            match self.peek() {
                None => return Err(self.unexpected_end()),
                Some('`') => {
                    self.advance();
                    break;
                }
                Some('$') if self.peek2() == Some('{') => {
                    // Substitutions are outside the JSON-family universe.
                    return Err(self.error_here(ParseErrorKind::UnexpectedToken(
                        "${".to_string(),
                    )));
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_none() {
                        return Err(self.unexpected_end());
                    }
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        Ok(self.token(TokenKind::Template, start, start_pos))
    }

    fn scan_regexp(&mut self, start: usize, start_pos: Position) -> Result<Token, ParseError> {
        self.advance();
        let mut in_class = false;
        loop {
            match self.peek() {
                None => return Err(self.unexpected_end()),
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error_here(ParseErrorKind::UnexpectedToken(
                        "\\n".to_string(),
                    )));
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        None => return Err(self.unexpected_end()),
                        Some(c) if is_line_terminator(c) => {
                            return Err(self.error_here(ParseErrorKind::UnexpectedToken(
                                "\\n".to_string(),
                            )));
                        }
                        Some(_) => {
                            self.advance();
                        }
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.advance();
        }
        Ok(self.token(TokenKind::RegularExpression, start, start_pos))
    }

    fn scan_decimal_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    fn scan_exponent(&mut self) {
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut it = self.source[self.pos..].chars();
            it.next();
            let after_sign = match it.next() {
                Some('+') | Some('-') => it.next(),
                other => other,
            };
            // Only a real exponent: `1e` alone stays two tokens.
            if matches!(after_sign, Some(d) if d.is_ascii_digit()) {
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                self.scan_decimal_digits();
            }
        }
    }

    fn scan_numeric(&mut self, start: usize, start_pos: Position) -> Result<Token, ParseError> {
        let first = self.advance();

        if first == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            let digits = self.scan_radix_digits(|c| c.is_ascii_hexdigit());
            if digits == 0 {
                return Err(self.numeric_error(start, start_pos));
            }
        } else if first == '0' && matches!(self.peek(), Some('o') | Some('O')) {
            self.advance();
            let digits = self.scan_radix_digits(|c| matches!(c, '0'..='7'));
            if digits == 0 {
                return Err(self.numeric_error(start, start_pos));
            }
        } else if first == '0' && matches!(self.peek(), Some('b') | Some('B')) {
            self.advance();
            let digits = self.scan_radix_digits(|c| matches!(c, '0' | '1'));
            if digits == 0 {
                return Err(self.numeric_error(start, start_pos));
            }
        } else if first == '.' {
            self.scan_decimal_digits();
            self.scan_exponent();
        } else {
            // Decimal, including legacy leading-zero forms.
            self.scan_decimal_digits();
            if self.peek() == Some('.') {
                self.advance();
                self.scan_decimal_digits();
            }
            self.scan_exponent();
        }

        if self.peek() == Some('n') {
            self.advance();
        }
        Ok(self.token(TokenKind::Numeric, start, start_pos))
    }

    fn scan_radix_digits(&mut self, is_digit: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if is_digit(c) || c == '_') {
            if self.advance() != '_' {
                count += 1;
            }
        }
        count
    }

    fn numeric_error(&self, start: usize, start_pos: Position) -> ParseError {
        self.error(
            ParseErrorKind::UnexpectedToken(self.raw(start)),
            start_pos,
            start,
        )
    }

    fn scan_identifier(&mut self, start: usize, start_pos: Position) -> Result<Token, ParseError> {
        loop {
            match self.peek() {
                Some('\\') => {
                    if self.peek2() != Some('u') {
                        return Err(self.error_here(ParseErrorKind::UnexpectedToken(
                            "\\".to_string(),
                        )));
                    }
                    self.advance();
                    self.advance();
                    if self.peek() == Some('{') {
                        self.advance();
                        while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                            self.advance();
                        }
                        if self.peek() != Some('}') {
                            return Err(self.error_here(ParseErrorKind::UnexpectedToken(
                                "\\u".to_string(),
                            )));
                        }
                        self.advance();
                    } else {
                        for _ in 0..4 {
                            match self.peek() {
                                Some(c) if c.is_ascii_hexdigit() => {
                                    self.advance();
                                }
                                _ => {
                                    return Err(self.error_here(
                                        ParseErrorKind::UnexpectedToken("\\u".to_string()),
                                    ));
                                }
                            }
                        }
                    }
                }
                Some(c) if is_id_continue(c) => {
                    self.advance();
                }
                _ => break,
            }
        }
        let raw = self.raw(start);
        let kind = match raw.as_str() {
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier,
        };
        Ok(self.token(kind, start, start_pos))
    }
}

// ── Cooked-value helpers ─────────────────────────────────────────────────

/// Decode the cooked value of a string token, given its raw text
/// including the surrounding quotes.
pub(crate) fn cook_string(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    cook_escapes(inner)
}

/// Decode the cooked value of a template token's content (the raw text
/// between the backticks). `\r` and `\r\n` normalize to `\n`.
pub(crate) fn cook_template(inner: &str) -> String {
    cook_escapes(inner)
}

/// Decode an identifier's name, resolving `\u` escapes.
pub(crate) fn cook_identifier(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // Structure was validated by the lexer: always `\u…`.
            chars.next();
            if let Some(code) = read_unicode_escape(&mut chars) {
                if let Some(decoded) = char::from_u32(code) {
                    out.push(decoded);
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Returns `true` when the raw text of a string contains a backslash line
/// continuation.
pub(crate) fn has_line_continuation(raw: &str) -> bool {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if is_line_terminator(next) => return true,
                _ => {}
            }
        }
    }
    false
}

/// Read hex digits for `\uXXXX` or `\u{…}`, cursor placed after the `u`.
fn read_unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<u32> {
    if chars.peek() == Some(&'{') {
        chars.next();
        let mut code: u32 = 0;
        let mut any = false;
        while let Some(&c) = chars.peek() {
            if let Some(d) = c.to_digit(16) {
                code = code.saturating_mul(16).saturating_add(d);
                any = true;
                chars.next();
            } else {
                break;
            }
        }
        if chars.peek() == Some(&'}') {
            chars.next();
        }
        any.then_some(code)
    } else {
        let mut code: u32 = 0;
        for _ in 0..4 {
            let c = chars.next()?;
            code = code * 16 + c.to_digit(16)?;
        }
        Some(code)
    }
}

/// Decode escape sequences per ECMAScript string semantics. Unknown
/// single-character escapes cook to the character itself; lone
/// surrogates become U+FFFD; surrogate pairs combine.
fn cook_escapes(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if c == '\r' {
                // Raw CR / CRLF in template content normalizes to LF.
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            } else {
                out.push(c);
            }
            continue;
        }
        let Some(esc) = chars.next() else { break };
        match esc {
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{B}'),
            '0' => out.push('\0'),
            'x' => {
                let mut code: u32 = 0;
                let mut ok = true;
                for _ in 0..2 {
                    match chars.next().and_then(|c| c.to_digit(16)) {
                        Some(d) => code = code * 16 + d,
                        None => {
                            ok = false;
                            break;
                        }
                    }
                }
                if ok {
                    if let Some(decoded) = char::from_u32(code) {
                        out.push(decoded);
                    }
                }
            }
            'u' => {
                if let Some(code) = read_unicode_escape(&mut chars) {
                    push_code_unit(&mut out, code, &mut chars);
                }
            }
            c if is_line_terminator(c) => {
                // Line continuation: contributes nothing. CRLF is two chars.
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Append a decoded `\u` code unit, combining a trailing low-surrogate
/// escape into a single scalar value where possible.
fn push_code_unit(
    out: &mut String,
    code: u32,
    chars: &mut std::iter::Peekable<std::str::Chars>,
) {
    if (0xD800..=0xDBFF).contains(&code) {
        // Try to pair with a following `\uDC00`–`\uDFFF` escape.
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
            if let Some(low) = read_unicode_escape(&mut lookahead) {
                if (0xDC00..=0xDFFF).contains(&low) {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    if let Some(decoded) = char::from_u32(combined) {
                        out.push(decoded);
                        *chars = lookahead;
                        return;
                    }
                }
            }
        }
        out.push('\u{FFFD}');
    } else if (0xDC00..=0xDFFF).contains(&code) {
        out.push('\u{FFFD}');
    } else if let Some(decoded) = char::from_u32(code) {
        out.push(decoded);
    }
}
