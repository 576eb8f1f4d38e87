//! Lexer for the markup language.
//!
//! At each position the lexer tries the following rules in order and
//! produces a token for the first one that applies:
//!
//! 1. A run of spaces and tabs is a [`TokenValue::Blank`].
//! 2. One line break (`\n` or `\r\n`) is a [`TokenValue::LineBreak`];
//!     two or more consecutive line breaks are a [`TokenValue::ParagraphBreak`].
//! 3. A backslash followed by a space, tab, `{`, `}` or backslash is a [`TokenValue::Escaped`].
//! 4. A backslash followed by ASCII letters is a [`TokenValue::Command`],
//!     including its brace-delimited argument if one immediately follows.
//! 5. A run of characters that are none of the above special characters is a [`TokenValue::Text`].
//! 6. Anything else is a single [`TokenValue::Invalid`] character.

use super::Str;
use crate::Error;

/// A token in the markup language.
#[derive(Clone, Debug)]
pub struct Token<'a> {
    pub value: TokenValue<'a>,
    pub source: Str<'a>,
}

/// Value of a token in the markup language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenValue<'a> {
    Blank,
    LineBreak,
    ParagraphBreak,
    /// The character following the backslash.
    Escaped(char),
    Command {
        /// Name of the command, without the backslash.
        name: Str<'a>,
        /// Text between the braces, if the command had an argument.
        argument: Option<Str<'a>>,
    },
    Text(&'a str),
    Invalid(char),
}

/// Markup language lexer.
pub struct Lexer<'a> {
    /// The full document being lexed.
    s: &'a str,
    /// Inclusive lower bound on the part of the document being lexed by this lexer.
    l: usize,
    /// Exclusive upper bound on the part of the document being lexed by this lexer.
    u: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            s: source,
            l: 0,
            u: source.len(),
        }
    }

    /// Create a lexer for a piece of a document, typically a command argument.
    ///
    /// Spans of the tokens returned by this lexer are relative to the full document.
    pub fn nested(within: Str<'a>) -> Self {
        Self {
            s: within.value,
            l: within.start,
            u: within.end,
        }
    }

    fn peek(&self) -> Option<char> {
        self.s[self.l..self.u].chars().next()
    }

    fn advance_while<F: Fn(char) -> bool>(&mut self, f: F) {
        while let Some(c) = self.peek() {
            if !f(c) {
                break;
            }
            self.l += c.len_utf8();
        }
    }

    fn eat_line_break(&mut self) -> bool {
        let rest = &self.s[self.l..self.u];
        if rest.starts_with('\n') {
            self.l += 1;
        } else if rest.starts_with("\r\n") {
            self.l += 2;
        } else {
            return false;
        }
        true
    }

    /// Lex the part of a token after a backslash.
    fn backslash(&mut self, start: usize) -> Result<TokenValue<'a>, Error<'a>> {
        self.l += '\\'.len_utf8();
        match self.peek() {
            Some(c @ (' ' | '\t' | '{' | '}' | '\\')) => {
                self.l += c.len_utf8();
                Ok(TokenValue::Escaped(c))
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let name_start = self.l;
                self.advance_while(|c| c.is_ascii_alphabetic());
                let name = Str::new(self.s, name_start, self.l);
                let argument = if self.peek() == Some('{') {
                    self.l += '{'.len_utf8();
                    Some(self.argument(start)?)
                } else {
                    None
                };
                Ok(TokenValue::Command { name, argument })
            }
            _ => Ok(TokenValue::Invalid('\\')),
        }
    }

    /// Lex a command argument up to and including its closing brace.
    ///
    /// The opening brace has already been consumed.
    fn argument(&mut self, command_start: usize) -> Result<Str<'a>, Error<'a>> {
        let argument_start = self.l;
        let mut depth = 0_usize;
        let mut iter = self.s[self.l..self.u].char_indices();
        while let Some((i, c)) = iter.next() {
            match c {
                '\\' => {
                    iter.next();
                }
                '{' => {
                    depth += 1;
                }
                '}' if depth == 0 => {
                    let argument_end = argument_start + i;
                    self.l = argument_end + '}'.len_utf8();
                    return Ok(Str::new(self.s, argument_start, argument_end));
                }
                '}' => {
                    depth -= 1;
                }
                _ => {}
            }
        }
        self.l = self.u;
        Err(Error::UnterminatedArgument {
            command: Str::new(self.s, command_start, argument_start),
        })
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

fn is_special(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\\' | '{' | '}')
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Error<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.l;
        let c = self.peek()?;
        use TokenValue::*;
        let value = if is_blank(c) {
            self.advance_while(is_blank);
            Blank
        } else if self.eat_line_break() {
            let mut n = 1_usize;
            while self.eat_line_break() {
                n += 1;
            }
            if n > 1 {
                ParagraphBreak
            } else {
                LineBreak
            }
        } else if c == '\\' {
            match self.backslash(start) {
                Ok(value) => value,
                Err(err) => return Some(Err(err)),
            }
        } else if !is_special(c) {
            self.advance_while(|c| !is_special(c));
            Text(&self.s[start..self.l])
        } else {
            self.l += c.len_utf8();
            Invalid(c)
        };
        Some(Ok(Token {
            value,
            source: Str::new(self.s, start, self.l),
        }))
    }
}
