use super::Str;
use crate::params::{InvalidPreset, Requirement};
use crate::parser::Command;

/// Fatal error encountered while formatting a document.
#[derive(Debug)]
pub enum Error<'a> {
    /// A character that cannot appear at this point of the input.
    ///
    /// This is an unescaped `{` or `}`, a carriage return that is not
    /// part of a line break, or a backslash that starts neither an
    /// escape nor a command.
    InvalidCharacter { char: Str<'a> },

    /// The argument of a command has no matching closing brace.
    UnterminatedArgument {
        /// The command name together with the opening brace.
        command: Str<'a>,
    },

    /// A command that requires an argument was given none.
    MissingArgument { command: Str<'a> },

    /// An endnote appears inside the body of another endnote.
    NestedEndnote { command: Str<'a> },

    /// The argument of a numeric command is not an integer.
    InvalidInteger {
        command: Str<'a>,
        argument: Str<'a>,
    },

    /// The argument of a numeric command is out of range.
    InvalidValue {
        command: Str<'a>,
        argument: Str<'a>,
        value: i32,
        requirement: Requirement,
    },

    /// The starting parameters violate a constraint of the markup commands.
    InvalidPreset(InvalidPreset),

    /// The formatted output could not be written.
    Io(std::io::Error),
}

impl<'a> Error<'a> {
    pub fn message(&self) -> String {
        use Error::*;
        match self {
            InvalidCharacter { char } => match char.str() {
                "\\" => "A backslash must start an escape or a command".into(),
                "\r" => "Carriage return outside of a line break".into(),
                c => format!["Unexpected character `{c}`"],
            },
            UnterminatedArgument { .. } => "Command argument is missing its closing brace".into(),
            MissingArgument { command } => {
                format!["The `{command}` command requires an argument"]
            }
            NestedEndnote { .. } => "Endnotes cannot contain other endnotes".into(),
            InvalidInteger { command, argument } => format![
                "The argument `{argument}` of the `{command}` command is not an integer"
            ],
            InvalidValue {
                command,
                requirement,
                ..
            } => format![
                "The `{command}` command requires {}",
                requirement.describe()
            ],
            InvalidPreset(err) => format!["Invalid presets: {err}"],
            Io(err) => format!["Failed to write output: {err}"],
        }
    }

    /// Byte range of the document this error points at.
    ///
    /// Preset and output errors are not tied to the document and return an empty range.
    pub fn main_span(&self) -> std::ops::Range<usize> {
        use Error::*;
        match self {
            InvalidCharacter { char } => char.span(),
            UnterminatedArgument { command } => command.span(),
            MissingArgument { command } | NestedEndnote { command } => command.span(),
            InvalidInteger { argument, .. } | InvalidValue { argument, .. } => argument.span(),
            InvalidPreset(_) | Io(_) => 0..0,
        }
    }

    pub fn labels(&self) -> Vec<ErrorLabel> {
        use Error::*;
        match self {
            InvalidCharacter { .. } => vec![ErrorLabel {
                span: self.main_span(),
                text: "this character is not allowed here".into(),
            }],
            UnterminatedArgument { command } => vec![ErrorLabel {
                span: command.span(),
                text: "the argument starts here and runs to the end of the input".into(),
            }],
            MissingArgument { command } => vec![ErrorLabel {
                span: command.span(),
                text: format!["expected `{{` immediately after `{command}`"],
            }],
            NestedEndnote { command } => vec![ErrorLabel {
                span: command.span(),
                text: "this endnote is inside another endnote".into(),
            }],
            InvalidInteger { command, argument } => vec![
                ErrorLabel {
                    span: argument.span(),
                    text: "the argument appears here".into(),
                },
                ErrorLabel {
                    span: command.span(),
                    text: format!["`{command}` requires an integer argument"],
                },
            ],
            InvalidValue {
                command,
                argument,
                value,
                requirement,
            } => vec![
                ErrorLabel {
                    span: argument.span(),
                    text: format!["the provided value is {value}"],
                },
                ErrorLabel {
                    span: command.span(),
                    text: format!["`{command}` requires {}", requirement.describe()],
                },
            ],
            InvalidPreset(_) | Io(_) => vec![],
        }
    }

    pub fn notes(&self) -> Vec<String> {
        use Error::*;
        match self {
            InvalidCharacter { .. } => {
                vec![r"to get a literal `\`, `{` or `}` escape it with a backslash".to_string()]
            }
            UnterminatedArgument { .. } => {
                vec![r"braces inside an argument must be balanced or escaped (`\{`, `\}`)".into()]
            }
            NestedEndnote { .. } => {
                vec!["an endnote body may only contain text and formatting commands".into()]
            }
            InvalidPreset(_) => {
                vec!["presets apply before the first line of the document is read".into()]
            }
            MissingArgument { .. }
            | InvalidInteger { .. }
            | InvalidValue { .. }
            | Io(_) => vec![],
        }
    }
}

impl<'a> std::fmt::Display for Error<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl<'a> std::error::Error for Error<'a> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Non-fatal problem encountered while formatting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning<'a> {
    /// A command with this name does not exist. The command was skipped.
    UnknownCommand { name: Str<'a> },
}

impl<'a> Warning<'a> {
    pub fn message(&self) -> String {
        match self {
            Warning::UnknownCommand { name } => format![r"Unknown command `\{name}`"],
        }
    }

    pub fn main_span(&self) -> std::ops::Range<usize> {
        match self {
            Warning::UnknownCommand { name } => name.span(),
        }
    }

    pub fn notes(&self) -> Vec<String> {
        match self {
            Warning::UnknownCommand { .. } => {
                let names: Vec<String> = Command::ALL
                    .iter()
                    .map(|command| format![r"`\{}`", command.name()])
                    .collect();
                vec![format!["the known commands are {}", names.join(", ")]]
            }
        }
    }
}

impl<'a> std::fmt::Display for Warning<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Label on an error message.
///
/// A label identifies a particular piece of source code and some
/// information about it.
pub struct ErrorLabel {
    pub span: std::ops::Range<usize>,
    pub text: String,
}

#[cfg(feature = "ariadne")]
fn ariadne_config() -> ariadne::Config {
    ariadne::Config::default().with_index_type(ariadne::IndexType::Byte)
}

impl<'a> Error<'a> {
    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'f>(
        &self,
        file_name: &'f str,
    ) -> ariadne::Report<'static, (&'f str, std::ops::Range<usize>)> {
        let mut report =
            ariadne::Report::build(ariadne::ReportKind::Error, (file_name, self.main_span()))
                .with_config(ariadne_config())
                .with_message(self.message());
        let mut color = ariadne::Color::BrightRed;
        for label in self.labels() {
            report = report.with_label(
                ariadne::Label::new((file_name, label.span))
                    .with_message(label.text)
                    .with_color(color),
            );
            color = ariadne::Color::BrightYellow;
        }
        for note in self.notes() {
            report = report.with_note(note);
        }
        report.finish()
    }
}

impl<'a> Warning<'a> {
    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'f>(
        &self,
        file_name: &'f str,
    ) -> ariadne::Report<'static, (&'f str, std::ops::Range<usize>)> {
        let mut report =
            ariadne::Report::build(ariadne::ReportKind::Warning, (file_name, self.main_span()))
                .with_config(ariadne_config())
                .with_message(self.message())
                .with_label(
                    ariadne::Label::new((file_name, self.main_span()))
                        .with_message("this command was skipped")
                        .with_color(ariadne::Color::BrightYellow),
                );
        for note in self.notes() {
            report = report.with_note(note);
        }
        report.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn get_err(source: &str) -> Error<'_> {
        crate::format(source).0.unwrap_err()
    }

    macro_rules! error_tests {
        ( $(
            ($name: ident, $source: expr, Error:: $want_variant: ident,),
        )+ ) => {
            $(
            #[test]
            fn $name() {
                let source = $source;
                let err = get_err(source);
                println!["got: {err:?}"];
                assert!(matches!(err, Error::$want_variant {..}));
            }
            )+
        };
    }

    error_tests!(
        (unescaped_open_brace, "a { b", Error::InvalidCharacter,),
        (unescaped_close_brace, "a } b", Error::InvalidCharacter,),
        (backslash_before_digit, r"\9", Error::InvalidCharacter,),
        (trailing_backslash, "abc\\", Error::InvalidCharacter,),
        (lone_carriage_return, "a\rb", Error::InvalidCharacter,),
        (unterminated_argument, r"\endnote{oops", Error::UnterminatedArgument,),
        (
            unterminated_nested_argument,
            r"\endnote{a {b} {c}",
            Error::UnterminatedArgument,
        ),
        (missing_integer_argument, r"\textwidth 40", Error::MissingArgument,),
        (missing_endnote_argument, r"x\endnote y", Error::MissingArgument,),
        (nested_endnote, r"x\endnote{a\endnote{b}}", Error::NestedEndnote,),
        (not_an_integer, r"\textwidth{abc}", Error::InvalidInteger,),
        (integer_with_spaces, r"\textwidth{ 40}", Error::InvalidInteger,),
        (integer_overflow, r"\textwidth{99999999999}", Error::InvalidInteger,),
        (zero_width, r"\textwidth{0}", Error::InvalidValue,),
        (zero_height, r"\textheight{0}", Error::InvalidValue,),
        (negative_indent, r"\indent{-1}", Error::InvalidValue,),
        (negative_par_indent, r"\parindent{-2}", Error::InvalidValue,),
        (negative_par_skip, r"\parskip{-1}", Error::InvalidValue,),
        (stray_brace_after_endnote, r"a\endnote{b } c}", Error::InvalidCharacter,),
        (error_inside_endnote, r"a\endnote{b \9}", Error::InvalidCharacter,),
    );

    #[test]
    fn invalid_value_spans() {
        let source = r"Hello \textwidth{-5} world";
        let err = get_err(source);
        assert_eq!(err.main_span(), 17..19);
        let labels = err.labels();
        assert_eq!(&source[labels[1].span.clone()], r"\textwidth");
        assert_eq!(err.message(), r"The `\textwidth` command requires a positive integer");
    }

    #[test]
    fn unterminated_argument_span() {
        let source = "ab \\endnote{never closed";
        let err = get_err(source);
        assert_eq!(&source[err.main_span()], "\\endnote{");
    }
}
