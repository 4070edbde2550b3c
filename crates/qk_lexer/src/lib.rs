// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Low-level lexer for the Python subset used to write Qiskit scripts.
//!
//! The layout follows `rustc_lexer`: the main entity of this crate is the
//! [`TokenKind`] enum, and a [`Token`] only records its kind and length.
//! Indentation is *not* handled here. `INDENT` and `DEDENT` are synthesized
//! from `Whitespace` and `Newline` tokens later, in `qk_syntax`.

mod cursor;


pub use crate::cursor::Cursor;

use self::LiteralKind::*;
use self::TokenKind::*;

/// Parsed token.
/// It doesn't contain information about data that has been parsed,
/// only the type of the token and its size.
#[derive(Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub len: u32,
}

impl Token {
    fn new(kind: TokenKind, len: u32) -> Token {
        Token { kind, len }
    }
}

/// Enum representing common lexeme types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Multi-char tokens:
    /// "# comment"
    LineComment,

    /// Any whitespace character sequence, excluding line breaks.
    /// A backslash line continuation is lexed as whitespace as well.
    Whitespace,

    /// "\n" or "\r\n"
    Newline,

    /// "ident" or "def"
    ///
    /// At this step, keywords are also considered identifiers.
    Ident,

    /// Examples: `12`, `1.0e-40`, `"text"`, `r'raw'`, `3j`.
    ///
    /// See [LiteralKind] for more details.
    Literal {
        kind: LiteralKind,
    },

    // One-char tokens:
    /// ";"
    Semi,
    /// ","
    Comma,
    /// "."
    Dot,
    /// "("
    OpenParen,
    /// ")"
    CloseParen,
    /// "{"
    OpenBrace,
    /// "}"
    CloseBrace,
    /// "["
    OpenBracket,
    /// "]"
    CloseBracket,
    /// "@"
    At,
    /// "~"
    Tilde,
    /// ":"
    Colon,
    /// "="
    Eq,
    /// "!"
    Bang,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "-"
    Minus,
    /// "&"
    And,
    /// "|"
    Or,
    /// "+"
    Plus,
    /// "*"
    Star,
    /// "/"
    Slash,
    /// "^"
    Caret,
    /// "%"
    Percent,

    // Two- and three-char operators:
    /// "->"
    Arrow,
    /// "**"
    DoubleStar,
    /// "//"
    DoubleSlash,
    /// "=="
    EqEq,
    /// "!="
    NotEq,
    /// "<="
    LtEq,
    /// ">="
    GtEq,
    /// "<<"
    ShiftLeft,
    /// ">>"
    ShiftRight,
    /// "+=", "-=", "*=", "/=", "//=", "%=", "**=", "&=", "|=", "^=", "@=", "<<=", ">>="
    AugAssign,

    /// Unknown token, not expected by the lexer, e.g. "№"
    Unknown,

    /// End of input.
    Eof,
}

/// Enum representing the literal types supported by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LiteralKind {
    /// "12", "0o100", "0b1", "1_000"
    Int { base: Base, empty_int: bool },
    /// "12.34", "1e3", ".5", "1."
    Float { empty_exponent: bool },
    /// "3j", "1.5J"
    Imaginary,
    /// "'abc'", "\"abc\"", "'''abc'''", "r'abc'"
    Str { terminated: bool, triple: bool },
}

/// Base of numeric literal encoding according to its prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Base {
    /// Literal starts with "0b".
    Binary = 2,
    /// Literal starts with "0o".
    Octal = 8,
    /// Literal doesn't contain a prefix.
    Decimal = 10,
    /// Literal starts with "0x".
    Hexadecimal = 16,
}

/// Creates an iterator that produces tokens from the input string.
pub fn tokenize(input: &str) -> impl Iterator<Item = Token> + '_ {
    let mut cursor = Cursor::new(input);
    std::iter::from_fn(move || {
        let token = cursor.advance_token();
        if token.kind != TokenKind::Eof {
            Some(token)
        } else {
            None
        }
    })
}

/// True if `c` is whitespace that does not end a logical line.
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'   // \t
        | '\u{000B}' // vertical tab
        | '\u{000C}' // form feed
        | '\u{0020}' // space
    )
}

/// True if `c` is valid as a first character of an identifier.
pub fn is_id_start(c: char) -> bool {
    // This is XID_Start OR '_' (which formally is not a XID_Start).
    c == '_' || unicode_xid::UnicodeXID::is_xid_start(c)
}

/// True if `c` is valid as a non-first character of an identifier.
pub fn is_id_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c)
}

/// The passed string is lexically an identifier.
pub fn is_ident(string: &str) -> bool {
    let mut chars = string.chars();
    if let Some(start) = chars.next() {
        is_id_start(start) && chars.all(is_id_continue)
    } else {
        false
    }
}

fn is_string_prefix_char(c: char) -> bool {
    matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F')
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

impl Cursor<'_> {
    /// Parses a token from the input string.
    pub fn advance_token(&mut self) -> Token {
        let first_char = match self.bump() {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, 0),
        };
        let token_kind = match first_char {
            '#' => self.line_comment(),

            '\n' => Newline,
            '\r' if self.first() == '\n' => {
                self.bump();
                Newline
            }

            // Explicit line joining.
            '\\' if self.first() == '\n' => {
                self.bump();
                Whitespace
            }
            '\\' if self.first() == '\r' && self.second() == '\n' => {
                self.bump();
                self.bump();
                Whitespace
            }

            c if is_whitespace(c) => self.whitespace(),

            // Identifier, or a string with a prefix such as `r"..."`.
            c if is_id_start(c) => self.ident_or_prefixed_string(c),

            // Numeric literal.
            c @ '0'..='9' => Literal {
                kind: self.number(c),
            },
            '.' if self.first().is_ascii_digit() => {
                self.eat_decimal_digits();
                let kind = match self.first() {
                    'e' | 'E' => self.exponent(),
                    _ => Float {
                        empty_exponent: false,
                    },
                };
                Literal {
                    kind: self.imaginary_suffix(kind),
                }
            }

            c if is_quote(c) => Literal {
                kind: self.string(c),
            },

            // Operators that may be two or three characters long.
            '-' => match self.first() {
                '>' => self.bump_as(Arrow),
                '=' => self.bump_as(AugAssign),
                _ => Minus,
            },
            '*' => match self.first() {
                '*' => {
                    self.bump();
                    self.aug_assign_or(DoubleStar)
                }
                _ => self.aug_assign_or(Star),
            },
            '/' => match self.first() {
                '/' => {
                    self.bump();
                    self.aug_assign_or(DoubleSlash)
                }
                _ => self.aug_assign_or(Slash),
            },
            '=' => match self.first() {
                '=' => self.bump_as(EqEq),
                _ => Eq,
            },
            '!' => match self.first() {
                '=' => self.bump_as(NotEq),
                _ => Bang,
            },
            '<' => match self.first() {
                '=' => self.bump_as(LtEq),
                '<' => {
                    self.bump();
                    self.aug_assign_or(ShiftLeft)
                }
                _ => Lt,
            },
            '>' => match self.first() {
                '=' => self.bump_as(GtEq),
                '>' => {
                    self.bump();
                    self.aug_assign_or(ShiftRight)
                }
                _ => Gt,
            },
            '+' => self.aug_assign_or(Plus),
            '%' => self.aug_assign_or(Percent),
            '&' => self.aug_assign_or(And),
            '|' => self.aug_assign_or(Or),
            '^' => self.aug_assign_or(Caret),
            '@' => self.aug_assign_or(At),

            // One-symbol tokens.
            ';' => Semi,
            ',' => Comma,
            '.' => Dot,
            '(' => OpenParen,
            ')' => CloseParen,
            '{' => OpenBrace,
            '}' => CloseBrace,
            '[' => OpenBracket,
            ']' => CloseBracket,
            '~' => Tilde,
            ':' => Colon,

            _ => Unknown,
        };
        let res = Token::new(token_kind, self.pos_within_token());
        self.reset_pos_within_token();
        res
    }

    fn bump_as(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn aug_assign_or(&mut self, kind: TokenKind) -> TokenKind {
        if self.first() == '=' {
            self.bump();
            AugAssign
        } else {
            kind
        }
    }

    fn line_comment(&mut self) -> TokenKind {
        debug_assert!(self.prev() == '#');
        self.eat_while(|c| c != '\n' && c != '\r');
        LineComment
    }

    fn whitespace(&mut self) -> TokenKind {
        debug_assert!(is_whitespace(self.prev()));
        self.eat_while(is_whitespace);
        Whitespace
    }

    fn ident_or_prefixed_string(&mut self, first_char: char) -> TokenKind {
        if is_string_prefix_char(first_char) {
            if is_quote(self.first()) {
                let quote = self.first();
                self.bump();
                return Literal {
                    kind: self.string(quote),
                };
            }
            if is_string_prefix_char(self.first()) && is_quote(self.second()) {
                self.bump();
                let quote = self.first();
                self.bump();
                return Literal {
                    kind: self.string(quote),
                };
            }
        }
        self.eat_while(is_id_continue);
        Ident
    }

    /// Lex a string whose opening `quote` has already been consumed.
    fn string(&mut self, quote: char) -> LiteralKind {
        let triple = self.first() == quote && self.second() == quote;
        if triple {
            self.bump();
            self.bump();
            return Str {
                terminated: self.triple_quoted_string(quote),
                triple,
            };
        }
        let mut terminated = false;
        while !self.is_eof() {
            match self.first() {
                c if c == quote => {
                    self.bump();
                    terminated = true;
                    break;
                }
                '\\' => {
                    self.bump();
                    self.bump();
                }
                // A single-quoted string can not span lines.
                '\n' | '\r' => break,
                _ => {
                    self.bump();
                }
            }
        }
        Str { terminated, triple }
    }

    fn triple_quoted_string(&mut self, quote: char) -> bool {
        let mut run = 0;
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    run = 0;
                    self.bump();
                }
                c if c == quote => {
                    run += 1;
                    if run == 3 {
                        return true;
                    }
                }
                _ => run = 0,
            }
        }
        false
    }

    fn number(&mut self, first_digit: char) -> LiteralKind {
        debug_assert!('0' <= self.prev() && self.prev() <= '9');
        if first_digit == '0' {
            let base = match self.first() {
                'b' | 'B' => Some(Base::Binary),
                'o' | 'O' => Some(Base::Octal),
                'x' | 'X' => Some(Base::Hexadecimal),
                _ => None,
            };
            if let Some(base) = base {
                self.bump();
                let has_digits = match base {
                    Base::Hexadecimal => self.eat_hexadecimal_digits(),
                    _ => self.eat_decimal_digits(),
                };
                return Int {
                    base,
                    empty_int: !has_digits,
                };
            }
        }
        self.eat_decimal_digits();
        let kind = match self.first() {
            // `1.real` is an attribute access, `1..` is not a number.
            '.' if self.second() != '.' && !is_id_start(self.second()) => {
                self.bump();
                self.eat_decimal_digits();
                match self.first() {
                    'e' | 'E' => self.exponent(),
                    _ => Float {
                        empty_exponent: false,
                    },
                }
            }
            'e' | 'E' => self.exponent(),
            _ => Int {
                base: Base::Decimal,
                empty_int: false,
            },
        };
        self.imaginary_suffix(kind)
    }

    fn imaginary_suffix(&mut self, kind: LiteralKind) -> LiteralKind {
        if matches!(self.first(), 'j' | 'J') {
            self.bump();
            Imaginary
        } else {
            kind
        }
    }

    fn exponent(&mut self) -> LiteralKind {
        debug_assert!(matches!(self.first(), 'e' | 'E'));
        self.bump();
        if matches!(self.first(), '+' | '-') {
            self.bump();
        }
        Float {
            empty_exponent: !self.eat_decimal_digits(),
        }
    }

    fn eat_decimal_digits(&mut self) -> bool {
        let mut has_digits = false;
        loop {
            match self.first() {
                '_' => {
                    self.bump();
                }
                '0'..='9' => {
                    has_digits = true;
                    self.bump();
                }
                _ => break,
            }
        }
        has_digits
    }

    fn eat_hexadecimal_digits(&mut self) -> bool {
        let mut has_digits = false;
        loop {
            match self.first() {
                '_' => {
                    self.bump();
                }
                '0'..='9' | 'a'..='f' | 'A'..='F' => {
                    has_digits = true;
                    self.bump();
                }
                _ => break,
            }
        }
        has_digits
    }
}
