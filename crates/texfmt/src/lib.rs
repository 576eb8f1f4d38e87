//! # texfmt
//!
//! This crate turns plain text annotated with a small backslash command
//! language into filled, justified and paginated lines of text.
//!
//! ```
//! let (result, warnings) = texfmt::format("Hello world.");
//! assert_eq![result.unwrap(), vec!["   Hello world.".to_string()]];
//! assert![warnings.is_empty()];
//! ```
//!
//! ## The markup language
//!
//! Input is free text.
//! Runs of spaces and tabs separate words.
//! A single line break is just another word separator while filling;
//!     two or more consecutive line breaks end the current paragraph.
//!
//! The characters `\`, `{` and `}` are special.
//! To get them literally, escape them with a backslash: `\\`, `\{` and `\}`.
//! A backslash followed by a space (`\ `) is a space that does not separate words.
//!
//! A backslash followed by one or more ASCII letters is a command.
//! If the command name is immediately followed by `{`, everything up to the
//!     matching `}` is the command's argument.
//! Braces inside the argument nest, and a backslash inside the argument
//!     protects the character after it.
//!
//! | Command | Argument | Effect
//! |---------|----------|-------
//! | `\textwidth{n}` | `n > 0` | width of lines, including indentation
//! | `\textheight{n}` | `n > 0` | number of lines per page; ignored inside endnotes
//! | `\indent{n}` | `n >= 0` | blanks inserted before every line
//! | `\parindent{n}` | `n >= 0` | extra blanks before the first line of a paragraph
//! | `\parskip{n}` | `n >= 0` | blank lines inserted before a paragraph
//! | `\fill`, `\nofill` | none | turn line filling on or off
//! | `\justify`, `\nojustify` | none | turn justification on or off; only has an effect while filling
//! | `\endnote{text}` | text | insert a reference `[n]` and format `text` as endnote `n`
//!
//! Endnotes are formatted with their own set of parameters (see [`Presets`]) and are
//!     appended after the main text once the whole document has been read.
//! Commands inside an endnote change the endnote parameters, not the main ones.
//!
//! Unknown commands produce a [`Warning`] and are otherwise ignored.
//! Every other problem is a fatal [`Error`].
//!
//! ## Output
//!
//! The output is a sequence of lines without terminators.
//! When a text height is set, the first line of every page after the first
//!     starts with a form feed character ([`page::PAGE_BREAK`]).

pub mod assembler;
pub mod controller;
mod error;
pub mod lexer;
pub mod page;
mod params;
pub mod parser;

pub use controller::Controller;
pub use error::{Error, ErrorLabel, Warning};
pub use page::{LineSink, Printer};
pub use params::{InvalidParam, InvalidPreset, InvalidValue, Params, Presets, Requirement};
pub use parser::Parser;

/// Piece of source code, used in tokens and diagnostics.
///
/// The span is always relative to the top-level document, even for
///     text that is re-parsed as the body of an endnote.
#[derive(Debug, Clone, Copy)]
pub struct Str<'a> {
    value: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Str<'a> {
    fn new(value: &'a str, start: usize, end: usize) -> Str<'a> {
        Str { value, start, end }
    }
    /// Byte range of this string in the document.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
    pub fn str(&self) -> &'a str {
        &self.value[self.span()]
    }
}

impl<'a> From<&'a str> for Str<'a> {
    fn from(value: &'a str) -> Self {
        Str {
            value,
            start: 0,
            end: value.len(),
        }
    }
}

impl<'a> std::fmt::Display for Str<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.str())
    }
}

impl<'a> PartialEq for Str<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.str() == other.str()
    }
}

impl<'a> Eq for Str<'a> {}

/// Format a document with the default presets.
///
/// Warnings are returned even if formatting fails.
pub fn format(source: &str) -> (Result<Vec<String>, Error<'_>>, Vec<Warning<'_>>) {
    format_with_presets(source, &Presets::default())
}

/// Format a document, starting from the provided presets.
///
/// Presets that violate the constraints of the markup commands are
///     rejected with [`Error::InvalidPreset`] before the document is read.
pub fn format_with_presets<'a>(
    source: &'a str,
    presets: &Presets,
) -> (Result<Vec<String>, Error<'a>>, Vec<Warning<'a>>) {
    if let Err(err) = presets.validate() {
        return (Err(Error::InvalidPreset(err)), vec![]);
    }
    let mut controller = Controller::with_presets(Vec::new(), presets);
    let mut parser = Parser::new(source);
    let result = parser.process(&mut controller);
    (
        result.map(|()| controller.into_sink()),
        parser.into_warnings(),
    )
}

/// Format a document and write the lines, each followed by `\n`, to `out`.
///
/// Nothing is written unless the whole document is formatted successfully.
/// On success the writer is flushed and handed back.
pub fn write_formatted<'a, W: std::io::Write>(
    source: &'a str,
    presets: &Presets,
    out: W,
) -> (Result<W, Error<'a>>, Vec<Warning<'a>>) {
    if let Err(err) = presets.validate() {
        return (Err(Error::InvalidPreset(err)), vec![]);
    }
    let mut controller = Controller::with_presets(Printer::new(out), presets);
    let mut parser = Parser::new(source);
    let result = parser
        .process(&mut controller)
        .and_then(|()| controller.into_sink().finish().map_err(Error::Io));
    (result, parser.into_warnings())
}
