/// Character iterator over VHDL source with byte-offset tracking.
///
/// All positions are byte offsets into the original UTF-8 text, so they can
/// be stored directly in a [`vhdl_common::span::Span`].
pub struct Cursor<'src> {
    source: &'src str,
    pos: u32,
    chars: std::str::Chars<'src>,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            chars: source.chars(),
        }
    }

    /// The current character, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// The character after the current one.
    pub fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    /// The `n`-th character ahead, `peek_nth(0)` being the current one.
    ///
    /// Literal disambiguation needs up to three characters of lookahead
    /// (`'a'` vs. a tick, `UX"` bit-string prefixes).
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n)
    }

    /// Consume the current character and return it.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn pos(&self) -> u32 {
        self.pos
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Extract a slice of the source text by byte offsets.
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        &self.source[start as usize..end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_advance() {
        let cursor = Cursor::new("x\"F\"");
        assert_eq!(cursor.peek(), Some('x'));
        assert_eq!(cursor.peek_next(), Some('"'));
        assert_eq!(cursor.peek_nth(2), Some('F'));
        assert_eq!(cursor.peek_nth(9), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn advance_tracks_multibyte_utf8() {
        // U+00E9 is two bytes in UTF-8 and a valid VHDL-2008 letter.
        let mut cursor = Cursor::new("\u{00E9}a");
        assert_eq!(cursor.advance(), Some('\u{00E9}'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn eat_consumes_only_on_match() {
        let mut cursor = Cursor::new(":=");
        assert!(!cursor.eat('='));
        assert!(cursor.eat(':'));
        assert!(cursor.eat('='));
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn eat_while_and_slice() {
        let mut cursor = Cursor::new("data_in <= x;");
        cursor.eat_while(|c| c.is_alphanumeric() || c == '_');
        assert_eq!(cursor.pos(), 7);
        assert_eq!(cursor.slice(0, 7), "data_in");
    }
}
