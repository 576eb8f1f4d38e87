//! Pages and final disposition of formatted lines.

use log::debug;
use std::io::Write;

/// Character at the start of the first line of every page after the first.
pub const PAGE_BREAK: char = '\u{c}';

/// Destination of finished lines.
///
/// Lines handed to a sink already carry their page break marker, if any.
/// An empty line is a blank line.
pub trait LineSink {
    fn write(&mut self, line: &str) -> std::io::Result<()>;
}

/// Collects lines in memory.
impl LineSink for Vec<String> {
    fn write(&mut self, line: &str) -> std::io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes each line immediately, followed by `\n`.
pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Printer { out }
    }

    /// Flush the underlying writer and return it.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> LineSink for Printer<W> {
    fn write(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.out, "{line}")
    }
}

/// Groups lines into pages of bounded height.
///
/// Pages are not separate objects: the first line of each page after the
/// first is prefixed with [`PAGE_BREAK`].
#[derive(Debug, Default)]
pub struct Paginator {
    lines: Vec<String>,
    lines_on_page: usize,
    text_height: Option<usize>,
}

impl Paginator {
    pub fn new(text_height: Option<usize>) -> Self {
        Paginator {
            lines: vec![],
            lines_on_page: 0,
            text_height,
        }
    }

    pub fn set_text_height(&mut self, text_height: usize) {
        self.text_height = Some(text_height);
    }

    /// Add a line to the current page, starting a new page with it if the
    /// current page is full.
    ///
    /// `None` or an empty line is a skipped line.
    /// It is dropped if the current page is exactly full, so that the
    /// skip never lands at the top of the next page.
    pub fn add_line(&mut self, line: Option<String>) {
        match line {
            Some(line) if !line.is_empty() => {
                if self
                    .text_height
                    .map_or(true, |height| self.lines_on_page < height)
                {
                    self.lines.push(line);
                    self.lines_on_page += 1;
                } else {
                    debug!("page break before output line {}", self.lines.len() + 1);
                    let mut marked = String::with_capacity(line.len() + 1);
                    marked.push(PAGE_BREAK);
                    marked.push_str(&line);
                    self.lines.push(marked);
                    self.lines_on_page = 1;
                }
            }
            _ => {
                if self.text_height != Some(self.lines_on_page) {
                    self.lines.push(String::new());
                    self.lines_on_page += 1;
                }
            }
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Remove and return all lines added so far.
    ///
    /// The position on the current page is kept.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}
