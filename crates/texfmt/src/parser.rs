//! Interpretation of tokens as formatting events.

use super::Str;
use crate::controller::{Controller, Mode};
use crate::error::{Error, Warning};
use crate::lexer::{Lexer, Token, TokenValue};
use crate::page::LineSink;
use crate::params::InvalidValue;
use log::{trace, warn};

/// A command of the markup language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Indent,
    ParIndent,
    ParSkip,
    TextWidth,
    TextHeight,
    Fill,
    NoFill,
    Justify,
    NoJustify,
    Endnote,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::Indent,
        Command::ParIndent,
        Command::ParSkip,
        Command::TextWidth,
        Command::TextHeight,
        Command::Fill,
        Command::NoFill,
        Command::Justify,
        Command::NoJustify,
        Command::Endnote,
    ];

    /// Name of the command, without the backslash.
    pub fn name(self) -> &'static str {
        use Command::*;
        match self {
            Indent => "indent",
            ParIndent => "parindent",
            ParSkip => "parskip",
            TextWidth => "textwidth",
            TextHeight => "textheight",
            Fill => "fill",
            NoFill => "nofill",
            Justify => "justify",
            NoJustify => "nojustify",
            Endnote => "endnote",
        }
    }

    pub fn from_name(name: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|command| command.name() == name)
    }
}

type IntegerSetter<S> = fn(&mut Controller<S>, i32) -> Result<(), InvalidValue>;

/// Drives a [`Controller`] from the tokens of a document.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Text put in front of the first piece of text, used for endnote labels.
    prepend: String,
    warnings: Vec<Warning<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            prepend: String::new(),
            warnings: vec![],
        }
    }

    /// Parser for the body of an endnote.
    pub(crate) fn nested(body: Str<'a>, prepend: String) -> Self {
        Parser {
            lexer: Lexer::nested(body),
            prepend,
            warnings: vec![],
        }
    }

    /// Run all of the tokens through the controller, then close it.
    ///
    /// Processing stops at the first error.
    /// Warnings are collected and available afterwards, even on error.
    pub fn process<S: LineSink>(&mut self, controller: &mut Controller<S>) -> Result<(), Error<'a>> {
        while let Some(token) = self.lexer.next() {
            self.handle(token?, controller)?;
        }
        if !self.prepend.is_empty() {
            // An endnote without text still gets its label.
            let label = std::mem::take(&mut self.prepend);
            controller.add_text(label.trim_end());
        }
        controller.close().map_err(Error::Io)
    }

    pub fn into_warnings(self) -> Vec<Warning<'a>> {
        self.warnings
    }

    fn handle<S: LineSink>(
        &mut self,
        token: Token<'a>,
        controller: &mut Controller<S>,
    ) -> Result<(), Error<'a>> {
        match token.value {
            TokenValue::Blank => controller.end_word(),
            TokenValue::LineBreak => {
                controller.end_word();
                controller.add_newline();
            }
            TokenValue::ParagraphBreak => {
                controller.end_word();
                controller.end_paragraph();
            }
            TokenValue::Escaped(c) => {
                let mut buffer = [0_u8; 4];
                self.add_text(c.encode_utf8(&mut buffer), controller);
            }
            TokenValue::Text(text) => self.add_text(text, controller),
            TokenValue::Command { name, argument } => {
                let command = Str::new(token.source.value, token.source.start, name.end);
                self.command(command, name, argument, controller)?;
            }
            TokenValue::Invalid(_) => {
                return Err(Error::InvalidCharacter { char: token.source });
            }
        }
        Ok(())
    }

    fn add_text<S: LineSink>(&mut self, text: &str, controller: &mut Controller<S>) {
        if !self.prepend.is_empty() {
            controller.add_text(&std::mem::take(&mut self.prepend));
        }
        controller.add_text(text);
    }

    /// Execute a command.
    ///
    /// `command` is the command name including its backslash.
    fn command<S: LineSink>(
        &mut self,
        command: Str<'a>,
        name: Str<'a>,
        argument: Option<Str<'a>>,
        controller: &mut Controller<S>,
    ) -> Result<(), Error<'a>> {
        let Some(known) = Command::from_name(name.str()) else {
            warn!(r"skipping unknown command `\{name}` at {:?}", name.span());
            self.warnings.push(Warning::UnknownCommand { name });
            return Ok(());
        };
        trace!("executing `{command}` with argument {argument:?}");
        use Command::*;
        match known {
            Indent => set_integer(command, argument, controller, Controller::set_indentation),
            ParIndent => set_integer(command, argument, controller, Controller::set_par_indentation),
            ParSkip => set_integer(command, argument, controller, Controller::set_par_skip),
            TextWidth => set_integer(command, argument, controller, Controller::set_text_width),
            TextHeight => set_integer(command, argument, controller, Controller::set_text_height),
            Fill => {
                controller.set_fill(true);
                Ok(())
            }
            NoFill => {
                controller.set_fill(false);
                Ok(())
            }
            Justify => {
                controller.set_justify(true);
                Ok(())
            }
            NoJustify => {
                controller.set_justify(false);
                Ok(())
            }
            Endnote => {
                let Some(body) = argument else {
                    return Err(Error::MissingArgument { command });
                };
                if controller.mode() == Mode::Endnote {
                    return Err(Error::NestedEndnote { command });
                }
                let label = controller.begin_endnote();
                let mut parser = Parser::nested(body, label);
                let result = parser.process(controller);
                self.warnings.extend(parser.into_warnings());
                result
            }
        }
    }
}

fn set_integer<'a, S: LineSink>(
    command: Str<'a>,
    argument: Option<Str<'a>>,
    controller: &mut Controller<S>,
    setter: IntegerSetter<S>,
) -> Result<(), Error<'a>> {
    let Some(argument) = argument else {
        return Err(Error::MissingArgument { command });
    };
    let Ok(value) = argument.str().parse::<i32>() else {
        return Err(Error::InvalidInteger { command, argument });
    };
    setter(controller, value).map_err(|InvalidValue { value, requirement }| Error::InvalidValue {
        command,
        argument,
        value,
        requirement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (Result<Vec<String>, Error<'_>>, Vec<Warning<'_>>) {
        let mut controller = Controller::new(vec![]);
        let mut parser = Parser::new(source);
        let result = parser.process(&mut controller);
        (result.map(|()| controller.into_sink()), parser.into_warnings())
    }

    #[test]
    fn command_names_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_name(command.name()), Some(command));
        }
        assert_eq!(Command::from_name("Fill"), None);
    }

    #[test]
    fn argument_to_plain_command_is_ignored() {
        let (result, warnings) = run(r"\nojustify{whatever}\textwidth{12}aaa bbb ccc");
        assert_eq!(result.unwrap(), vec!["   aaa bbb", "ccc"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_command_argument_is_skipped() {
        let (result, warnings) = run(r"a \bold{b} c");
        assert_eq!(result.unwrap(), vec!["   a c"]);
        assert_eq!(warnings, vec![Warning::UnknownCommand { name: "bold".into() }]);
    }

    #[test]
    fn warnings_are_kept_on_error() {
        let (result, warnings) = run(r"\foo \textwidth{x}");
        assert!(matches!(result, Err(Error::InvalidInteger { .. })));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn integer_with_plus_sign() {
        let (result, _) = run(r"\parindent{+0}x");
        assert_eq!(result.unwrap(), vec!["x"]);
    }

    #[test]
    fn command_span_includes_backslash() {
        let source = r"ab \parskip{q}";
        let (result, _) = run(source);
        let Err(Error::InvalidInteger { command, argument }) = result else {
            panic!("expected an invalid integer error");
        };
        assert_eq!(command.span(), 3..11);
        assert_eq!(argument.str(), "q");
    }

    #[test]
    fn nested_endnote_span() {
        let source = r"x\endnote{a\endnote{b}}";
        let (result, _) = run(source);
        let Err(err @ Error::NestedEndnote { .. }) = result else {
            panic!("expected a nested endnote error");
        };
        assert_eq!(&source[err.main_span()], r"\endnote");
        assert_eq!(err.main_span().start, 11);
    }

    #[test]
    fn empty_endnote_keeps_label() {
        let (result, _) = run(r"A\endnote{}");
        assert_eq!(result.unwrap(), vec!["   A[1]", "[1]"]);
    }

    #[test]
    fn endnote_text_keeps_text_after_it_in_word() {
        let (result, _) = run(r"word\endnote{n}, next");
        assert_eq!(result.unwrap(), vec!["   word[1], next", "[1] n"]);
    }
}
