// VHDL lexer -- tokenizer for VHDL-2008 source text.

mod cursor;

use cursor::Cursor;
use vhdl_common::error::{LexError, LexErrorKind};
use vhdl_common::span::Span;
use vhdl_common::token::{keyword_from_str, Token, TokenKind};

/// The VHDL lexer. Converts source text into a stream of tokens.
///
/// Implements `Iterator<Item = Token>`; the stream always ends with exactly one
/// `Eof` token. Malformed input produces `Error` tokens and is reported by
/// [`Lexer::tokenize_with_errors`], lexing then resumes after the bad input.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Kind of the last non-comment token, used to tell a tick from a
    /// character literal.
    prev_kind: Option<TokenKind>,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            prev_kind: None,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, including the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Tokenize the entire source and return the recorded errors alongside.
    pub fn tokenize_with_errors(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Single-character delimiters ───────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            '&' => self.single_char_token(TokenKind::Ampersand, start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '.' => self.single_char_token(TokenKind::Dot, start),
            '@' => self.single_char_token(TokenKind::At, start),
            '^' => self.single_char_token(TokenKind::Caret, start),
            '|' | '!' => self.single_char_token(TokenKind::Bar, start),

            // ── Compound delimiters and comments ─────────────────────────
            '-' => self.lex_minus(start),
            '/' => self.lex_slash(start),
            '*' => self.lex_star(start),
            ':' => self.lex_colon(start),
            '=' => self.lex_eq(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),
            '?' => self.lex_question(start),

            // ── Literals ─────────────────────────────────────────────────
            '\'' => self.lex_tick(start),
            '"' => self.lex_string(start, TokenKind::StringLiteral),
            '0'..='9' => self.lex_number(start),

            // ── Identifiers and reserved words ───────────────────────────
            '\\' => self.lex_extended_ident(start),
            c if is_ident_start(c) => self.lex_ident(start),

            _ => {
                self.cursor.advance();
                self.error(LexErrorKind::UnexpectedCharacter(c), start)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| {
            matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{0B}' | '\u{0C}' | '\u{A0}')
        });
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        self.token(kind, start)
    }

    fn token(&self, kind: TokenKind, start: u32) -> Token {
        Token::new(kind, start, self.cursor.pos())
    }

    /// Record an error covering `start..pos` and return an `Error` token for it.
    fn error(&mut self, kind: LexErrorKind, start: u32) -> Token {
        let end = self.cursor.pos();
        self.errors.push(LexError::new(kind, Span::new(start, end)));
        Token::new(TokenKind::Error, start, end)
    }

    // ── Delimiters ───────────────────────────────────────────────────────

    /// `-` -> `Minus`, `--` -> line comment
    fn lex_minus(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('-') {
            self.cursor.eat_while(|c| c != '\n' && c != '\r');
            return self.token(TokenKind::Comment, start);
        }
        self.token(TokenKind::Minus, start)
    }

    /// `/` -> `Slash`, `/=` -> `NotEq`, `/*` -> block comment
    fn lex_slash(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            return self.token(TokenKind::NotEq, start);
        }
        if self.cursor.eat('*') {
            return self.lex_block_comment(start);
        }
        self.token(TokenKind::Slash, start)
    }

    /// Rest of a `/* ... */` comment. Block comments do not nest.
    fn lex_block_comment(&mut self, start: u32) -> Token {
        loop {
            match self.cursor.advance() {
                None => return self.error(LexErrorKind::UnterminatedBlockComment, start),
                Some('*') if self.cursor.eat('/') => {
                    return self.token(TokenKind::Comment, start);
                }
                Some(_) => {}
            }
        }
    }

    /// `*` -> `Star`, `**` -> `DoubleStar`
    fn lex_star(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('*') {
            self.token(TokenKind::DoubleStar, start)
        } else {
            self.token(TokenKind::Star, start)
        }
    }

    /// `:` -> `Colon`, `:=` -> `VarAssign`
    fn lex_colon(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            self.token(TokenKind::VarAssign, start)
        } else {
            self.token(TokenKind::Colon, start)
        }
    }

    /// `=` -> `Eq`, `=>` -> `Arrow`
    fn lex_eq(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('>') {
            self.token(TokenKind::Arrow, start)
        } else {
            self.token(TokenKind::Eq, start)
        }
    }

    /// `<` -> `Lt`, `<=` -> `LtEq`, `<>` -> `Diamond`, `<<` -> `DoubleLt`
    fn lex_lt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = match self.cursor.peek() {
            Some('=') => TokenKind::LtEq,
            Some('>') => TokenKind::Diamond,
            Some('<') => TokenKind::DoubleLt,
            _ => return self.token(TokenKind::Lt, start),
        };
        self.cursor.advance();
        self.token(kind, start)
    }

    /// `>` -> `Gt`, `>=` -> `GtEq`, `>>` -> `DoubleGt`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = match self.cursor.peek() {
            Some('=') => TokenKind::GtEq,
            Some('>') => TokenKind::DoubleGt,
            _ => return self.token(TokenKind::Gt, start),
        };
        self.cursor.advance();
        self.token(kind, start)
    }

    /// The VHDL-2008 condition and matching operators.
    fn lex_question(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = match self.cursor.peek() {
            Some('?') => {
                self.cursor.advance();
                TokenKind::Condition
            }
            Some('=') => {
                self.cursor.advance();
                TokenKind::MatchEq
            }
            Some('/') if self.cursor.peek_next() == Some('=') => {
                self.cursor.advance();
                self.cursor.advance();
                TokenKind::MatchNotEq
            }
            Some('<') => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    TokenKind::MatchLtEq
                } else {
                    TokenKind::MatchLt
                }
            }
            Some('>') => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    TokenKind::MatchGtEq
                } else {
                    TokenKind::MatchGt
                }
            }
            _ => TokenKind::Question,
        };
        self.token(kind, start)
    }

    // ── Literals ─────────────────────────────────────────────────────────

    /// `'` is a tick when it follows a name (`clk'event`, `t'(x)`), otherwise
    /// `'c'` is a character literal.
    fn lex_tick(&mut self, start: u32) -> Token {
        let after_name = matches!(
            self.prev_kind,
            Some(
                TokenKind::Ident
                    | TokenKind::ExtendedIdent
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::All
            )
        );
        let is_char_literal = !after_name
            && self.cursor.peek_nth(2) == Some('\'')
            && self.cursor.peek_next().is_some_and(|c| c != '\n');

        if is_char_literal {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.advance();
            return self.token(TokenKind::CharLiteral, start);
        }
        self.single_char_token(TokenKind::Tick, start)
    }

    /// A `"`-delimited literal; `""` inside stands for one quote character.
    ///
    /// `start` may lie before the opening quote (bit-string prefixes).
    fn lex_string(&mut self, start: u32, kind: TokenKind) -> Token {
        self.cursor.advance(); // opening '"'
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return self.error(LexErrorKind::UnterminatedString, start);
                }
                Some('"') => {
                    self.cursor.advance();
                    if !self.cursor.eat('"') {
                        return self.token(kind, start);
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Decimal or based abstract literal, or a sized bit-string literal such
    /// as `12UX"F"`.
    fn lex_number(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');

        if self.cursor.peek() == Some('#') {
            return self.lex_based(start);
        }

        if let Some(prefix_len) = self.bit_string_prefix() {
            for _ in 0..prefix_len {
                self.cursor.advance();
            }
            return self.lex_string(start, TokenKind::BitStringLiteral);
        }

        let mut kind = TokenKind::IntLiteral;
        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            kind = TokenKind::RealLiteral;
        }
        self.lex_exponent();
        self.token(kind, start)
    }

    /// `base#digits[.digits]#[exponent]`, the base already consumed.
    fn lex_based(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '#'
        self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
        let mut kind = TokenKind::IntLiteral;
        if self.cursor.eat('.') {
            self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            kind = TokenKind::RealLiteral;
        }
        if !self.cursor.eat('#') {
            let text = self.cursor.slice(start, self.cursor.pos()).to_string();
            return self.error(LexErrorKind::InvalidBasedLiteral(text), start);
        }
        self.lex_exponent();
        self.token(kind, start)
    }

    /// Optional `E[+|-]digits`. An `e` not followed by digits is left alone.
    fn lex_exponent(&mut self) {
        if !matches!(self.cursor.peek(), Some('e' | 'E')) {
            return;
        }
        let digit_at = match self.cursor.peek_next() {
            Some('+' | '-') => 2,
            _ => 1,
        };
        if !self.cursor.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
            return;
        }
        for _ in 0..digit_at {
            self.cursor.advance();
        }
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
    }

    /// Length of a base specifier (`X`, `UB`, ...) directly followed by `"`.
    fn bit_string_prefix(&self) -> Option<usize> {
        let first = self.cursor.peek()?.to_ascii_lowercase();
        let second = self.cursor.peek_next();
        match first {
            'b' | 'o' | 'x' | 'd' if second == Some('"') => Some(1),
            'u' | 's'
                if matches!(second.map(|c| c.to_ascii_lowercase()), Some('b' | 'o' | 'x'))
                    && self.cursor.peek_nth(2) == Some('"') =>
            {
                Some(2)
            }
            _ => None,
        }
    }

    // ── Identifiers and reserved words ───────────────────────────────────

    /// `\...\`; a doubled backslash stands for one backslash.
    fn lex_extended_ident(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '\'
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return self.error(LexErrorKind::UnterminatedExtendedIdentifier, start);
                }
                Some('\\') => {
                    self.cursor.advance();
                    if !self.cursor.eat('\\') {
                        return self.token(TokenKind::ExtendedIdent, start);
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// A basic identifier, a reserved word, or an unsized bit-string literal.
    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());

        if self.cursor.peek() == Some('"') && is_base_specifier(text) {
            return self.lex_string(start, TokenKind::BitStringLiteral);
        }

        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        self.token(kind, start)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }

        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => self.emitted_eof = true,
            TokenKind::Comment => {}
            kind => self.prev_kind = Some(kind),
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_base_specifier(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "b" | "o" | "x" | "d" | "ub" | "uo" | "ux" | "sb" | "so" | "sx"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_signal_declaration() {
        assert_eq!(
            kinds("signal x : bit;"),
            vec![
                TokenKind::Signal,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_spans_accurate() {
        let tokens = Lexer::tokenize("x <= '1';");
        assert_eq!(tokens[0].span, Span::new(0, 1));
        assert_eq!(tokens[1].span, Span::new(2, 4));
        assert_eq!(tokens[2].span, Span::new(5, 8));
        assert_eq!(tokens[2].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[3].span, Span::new(8, 9));
        assert_eq!(tokens[4].span, Span::new(9, 9));
    }

    #[test]
    fn eof_emitted_once() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn tick_after_name_is_attribute() {
        assert_eq!(
            kinds("clk'event"),
            vec![TokenKind::Ident, TokenKind::Tick, TokenKind::Ident, TokenKind::Eof]
        );
        // `a'('b')`: tick then a character literal inside the aggregate.
        assert_eq!(
            kinds("a'('b')"),
            vec![
                TokenKind::Ident,
                TokenKind::Tick,
                TokenKind::LParen,
                TokenKind::CharLiteral,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comment_does_not_affect_tick_detection() {
        assert_eq!(
            kinds("x -- note\n'1'"),
            vec![
                TokenKind::Ident,
                TokenKind::Comment,
                TokenKind::Tick,
                TokenKind::IntLiteral,
                TokenKind::Tick,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unexpected_character_recorded() {
        let (tokens, errors) = Lexer::tokenize_with_errors("a $ b");
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnexpectedCharacter('$'));
        assert_eq!(errors[0].span, Span::new(2, 3));
        // Lexing resumes after the bad character.
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let (tokens, errors) = Lexer::tokenize_with_errors("\"abc\nx");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
    }
}
