use clap::Parser;
use colored::Colorize;
use std::io::{Read, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = Cli::parse().run() {
        if !err.is_empty() {
            eprintln!("{} {err}", "error:".red().bold());
        }
        std::process::exit(1);
    }
}

/// Fill, justify and paginate text annotated with backslash commands.
///
/// The input is free text. Blank lines separate paragraphs.
/// Formatting is controlled with commands like `\textwidth{60}`,
///     `\nofill` and `\endnote{text}`.
/// Command line flags override the starting parameters of the main text;
///     commands in the document take precedence over them.
#[derive(Debug, Parser)]
#[command(
    name = "texfmt",
    author = "The texfmt authors",
    version = "0.1",
    about,
    long_about,
    max_term_width(100)
)]
struct Cli {
    /// Path to the document to format, or `-` for standard input.
    ///
    /// Standard input is read if no path is given.
    input: Option<PathBuf>,

    /// Path to write the formatted text to. Defaults to standard output.
    ///
    /// Nothing is written if the document has errors.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with the starting parameters of the main text and of endnotes.
    ///
    /// The file has two optional tables, `main` and `endnote`, with the fields
    ///     `text_width`, `indentation`, `par_indentation`, `par_skip`,
    ///     `text_height`, `fill` and `justify`.
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Width of lines, including indentation.
    #[arg(long)]
    text_width: Option<NonZeroUsize>,

    /// Number of lines per page.
    #[arg(long)]
    text_height: Option<NonZeroUsize>,

    /// Blanks inserted before every line.
    #[arg(long)]
    indent: Option<usize>,

    /// Extra blanks before the first line of a paragraph.
    #[arg(long)]
    par_indent: Option<usize>,

    /// Blank lines inserted between paragraphs.
    #[arg(long)]
    par_skip: Option<usize>,

    /// Keep the input lines instead of filling lines up to the text width.
    #[arg(long)]
    no_fill: bool,

    /// Do not stretch filled lines to the text width.
    #[arg(long)]
    no_justify: bool,
}

impl Cli {
    fn run(self) -> Result<(), String> {
        let presets = self.presets()?;
        let (file_name, source) = self.read_input()?;

        let (result, warnings) = texfmt::write_formatted(&source, &presets, Vec::<u8>::new());
        let cache: (&str, _) = (&file_name, ariadne::Source::from(source.clone()));
        for warning in &warnings {
            if let Err(err) = warning.ariadne_report(&file_name).eprint(cache.clone()) {
                log::error!("failed to print warning: {err}");
            }
        }
        let formatted = match result {
            Ok(formatted) => formatted,
            Err(err @ (texfmt::Error::Io(_) | texfmt::Error::InvalidPreset(_))) => {
                return Err(err.to_string())
            }
            Err(err) => {
                if let Err(print_err) = err.ariadne_report(&file_name).eprint(cache.clone()) {
                    return Err(format!["{err} (failed to print report: {print_err})"]);
                }
                return Err(String::new());
            }
        };
        log::info!(
            "formatted {file_name} with {} warning(s)",
            warnings.len()
        );
        self.write_output(&formatted)
    }

    /// Starting parameters from the presets file, with flag overrides applied.
    fn presets(&self) -> Result<texfmt::Presets, String> {
        let mut presets = match &self.presets {
            None => texfmt::Presets::default(),
            Some(path) => {
                let data = std::fs::read_to_string(path)
                    .map_err(|err| format!["failed to open presets file {path:?}: {err}"])?;
                serde_json::from_str(&data)
                    .map_err(|err| format!["failed to parse presets file {path:?}: {err}"])?
            }
        };
        let main = &mut presets.main;
        if let Some(text_width) = self.text_width {
            main.text_width = text_width.get();
        }
        if let Some(text_height) = self.text_height {
            main.text_height = Some(text_height.get());
        }
        if let Some(indent) = self.indent {
            main.indentation = indent;
        }
        if let Some(par_indent) = self.par_indent {
            main.par_indentation = isize::try_from(par_indent)
                .map_err(|_| format!["paragraph indentation {par_indent} is too large"])?;
        }
        if let Some(par_skip) = self.par_skip {
            main.par_skip = par_skip;
        }
        if self.no_fill {
            main.fill = false;
        }
        if self.no_justify {
            main.justify = false;
        }
        if let Err(err) = presets.validate() {
            return Err(match &self.presets {
                Some(path) => format!["invalid presets file {path:?}: {err}"],
                None => format!["invalid parameters: {err}"],
            });
        }
        log::debug!("starting parameters: {presets:?}");
        Ok(presets)
    }

    /// Returns the name used for the input in diagnostics, and its content.
    fn read_input(&self) -> Result<(String, String), String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let source = std::fs::read_to_string(path)
                    .map_err(|err| format!["failed to open file {path:?}: {err}"])?;
                Ok((path.to_string_lossy().into_owned(), source))
            }
            _ => {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .map_err(|err| format!["failed to read standard input: {err}"])?;
                Ok(("<stdin>".to_string(), source))
            }
        }
    }

    fn write_output(&self, formatted: &[u8]) -> Result<(), String> {
        match &self.output {
            Some(path) => std::fs::write(path, formatted)
                .map_err(|err| format!["failed to write file {path:?}: {err}"]),
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(formatted)
                    .and_then(|()| stdout.flush())
                    .map_err(|err| format!["failed to write to standard output: {err}"])
            }
        }
    }
}
