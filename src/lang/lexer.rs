//! Lexer for BluLang source text.
//!
//! A single forward pass over Unicode code points that produces a flat,
//! ordered sequence of tokens. Characters matching none of the rules
//! below are silently dropped rather than raising an error.

/// The kind of a lexical token. Carries no payload; the token's text is
/// stored alongside it in [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BinaryOperator,
    Number,
    String,
    Identifier,
    DeclareVar,
    DeclareFunc,
    If,
    Else,
    While,
    Break,
    Return,
    Comma,
    Dot,
    Not,
    OpenRound,
    CloseRound,
    OpenCurly,
    CloseCurly,
    OpenSquare,
    CloseSquare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Bilingual keyword table. Case-sensitive; shared between English and
/// Vietnamese spellings mapped to the same token kind.
fn keyword(word: &str) -> Option<TokenKind> {
    match word {
        "let" | "cho" => Some(TokenKind::DeclareVar),
        "fn" | "hàm" => Some(TokenKind::DeclareFunc),
        "if" | "nếu" => Some(TokenKind::If),
        "else" | "hay" => Some(TokenKind::Else),
        "while" | "khi" => Some(TokenKind::While),
        "break" => Some(TokenKind::Break),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

pub struct Lexer<'a> {
    stream: std::str::CharIndices<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            stream: input.char_indices(),
        }
    }

    fn peek_char(&self) -> Option<(usize, char)> {
        self.stream.clone().next()
    }

    fn peek_char_skip(&self, skip: usize) -> Option<(usize, char)> {
        self.stream.clone().nth(skip)
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        self.stream.next()
    }

    fn skip_to_next_line(&mut self) {
        while let Some((_, ch)) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.next_char();
        }
    }

    /// Identify and consume the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let (_, ch) = self.peek_char()?;

            if ch.is_whitespace() {
                self.next_char();
                continue;
            }

            if ch == ';' {
                self.skip_to_next_line();
                continue;
            }

            // Two-character operators take precedence over their
            // one-character prefixes.
            if let Some((_, second)) = self.peek_char_skip(1) {
                if is_two_char_operator(ch, second) {
                    self.next_char();
                    self.next_char();
                    let mut text = String::new();
                    text.push(ch);
                    text.push(second);
                    return Some(Token::new(TokenKind::BinaryOperator, text));
                }
            }

            return Some(match ch {
                '(' => self.single(TokenKind::OpenRound),
                ')' => self.single(TokenKind::CloseRound),
                '{' => self.single(TokenKind::OpenCurly),
                '}' => self.single(TokenKind::CloseCurly),
                '[' => self.single(TokenKind::OpenSquare),
                ']' => self.single(TokenKind::CloseSquare),
                ',' => self.single(TokenKind::Comma),
                '.' => self.single(TokenKind::Dot),
                '!' => self.single(TokenKind::Not),
                '"' => self.lex_string(),
                _ if ch.is_ascii_digit() => self.lex_number(),
                _ if is_one_char_operator(ch) => self.single(TokenKind::BinaryOperator),
                _ if ch.is_alphabetic() => self.lex_ident(),
                _ => {
                    // Unrecognized character: drop it and keep scanning.
                    self.next_char();
                    continue;
                }
            });
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let (_, ch) = self.next_char().expect("caller already peeked this char");
        Token::new(kind, ch.to_string())
    }

    fn lex_string(&mut self) -> Token {
        self.next_char(); // opening quote
        let mut text = String::new();
        loop {
            match self.next_char() {
                None => break,
                Some((_, '"')) => break,
                Some((_, '\\')) => {
                    if let Some((_, escaped)) = self.next_char() {
                        text.push(escaped);
                    }
                }
                Some((_, ch)) => text.push(ch),
            }
        }
        Token::new(TokenKind::String, text)
    }

    fn lex_number(&mut self) -> Token {
        let mut text = String::new();
        while let Some((_, ch)) = self.peek_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.next_char();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number, text)
    }

    fn lex_ident(&mut self) -> Token {
        let mut word = String::new();
        while let Some((_, ch)) = self.peek_char() {
            if ch.is_alphabetic() || ch.is_ascii_digit() {
                word.push(ch);
                self.next_char();
            } else {
                break;
            }
        }
        match keyword(&word) {
            Some(kind) => Token::new(kind, word),
            None => Token::new(TokenKind::Identifier, word),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

fn is_one_char_operator(ch: char) -> bool {
    matches!(ch, '+' | '-' | '*' | '/' | '=' | '>' | '<')
}

fn is_two_char_operator(first: char, second: char) -> bool {
    matches!(
        (first, second),
        ('=', '=') | ('!', '=') | ('>', '=') | ('<', '=') | ('&', '&') | ('|', '|')
    )
}

/// Tokenize an entire source string into a flat ordered sequence.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn skips_whitespace_and_comments() {
        let tokens = tokenize("  1 ; a comment\n  2");
        assert_eq!(
            tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["1", "2"]
        );
    }

    #[test]
    fn two_char_operators_win_over_prefixes() {
        let tokens = tokenize("a == b != c <= d >= e && f || g");
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::BinaryOperator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["==", "!=", "<=", ">=", "&&", "||"]);
    }

    #[test]
    fn string_escapes_drop_the_backslash() {
        let tokens = tokenize(r#""a\"b\\c""#);
        assert_eq!(tokens[0].text, "a\"b\\c");
    }

    #[test]
    fn bilingual_keywords_map_to_same_kind() {
        assert_eq!(kinds("let"), kinds("cho"));
        assert_eq!(kinds("fn"), kinds("hàm"));
        assert_eq!(kinds("if"), kinds("nếu"));
        assert_eq!(kinds("else"), kinds("hay"));
        assert_eq!(kinds("while"), kinds("khi"));
    }

    #[test]
    fn identifiers_allow_unicode_letters() {
        let tokens = tokenize("đúng sai nhập");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn unrecognized_characters_are_dropped() {
        let tokens = tokenize("1 @ 2");
        assert_eq!(
            tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["1", "2"]
        );
    }
}
