//! Filling and justification of words into lines.
//!
//! The line assembler receives text and control events (end of word, end
//! of input line, end of paragraph) and builds lines out of them.
//! In fill mode a line is finished as soon as the next word does not fit
//! in the text width; the finished line is then justified by spreading
//! extra blanks over its gaps. Without fill mode, lines end only where
//! the input lines end.
//!
//! Finished lines go to the assembler's [`Paginator`].

use crate::page::Paginator;
use crate::params::Params;

/// Each gap of a justified line gets at most this many blanks on average.
const MAX_BLANKS_PER_GAP: usize = 3;

/// Accumulates words into filled and justified lines.
#[derive(Debug)]
pub struct LineAssembler {
    params: Params,
    pages: Paginator,
    /// The word currently being built.
    word: String,
    /// Finished words of the line being built.
    words: Vec<String>,
    /// True iff the next line is the first of a paragraph.
    new_paragraph: bool,
    /// True iff no line has been output yet.
    first_line: bool,
}

impl LineAssembler {
    pub fn new(params: Params) -> Self {
        LineAssembler {
            pages: Paginator::new(params.text_height),
            params,
            word: String::new(),
            words: vec![],
            new_paragraph: true,
            first_line: true,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn pages(&self) -> &Paginator {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut Paginator {
        &mut self.pages
    }

    /// Add text to the end of the word being built.
    pub fn add_text(&mut self, text: &str) {
        self.word.push_str(text);
    }

    /// Finish the word being built, if any, and add it to the line.
    pub fn finish_word(&mut self) {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word);
            self.add_word(word);
        }
    }

    /// Add a finished word to the line being built.
    ///
    /// In fill mode this outputs the current line first if the word does not fit.
    /// A word that is too long for a line by itself is output alone, unsplit.
    pub fn add_word(&mut self, word: String) {
        if !self.params.fill {
            self.words.push(word);
            return;
        }
        let indent = self.indent();
        let length = indent + self.words.iter().map(|w| width(w)).sum::<usize>();
        let word_width = width(&word);
        if self.words.is_empty() {
            let oversized = length + word_width > self.params.text_width;
            self.words.push(word);
            if oversized {
                self.emit_line(indent, 0);
            }
            return;
        }
        let gaps = self.words.len() - 1;
        if length + word_width + 1 + gaps > self.params.text_width {
            let spaces = if self.params.justify {
                self.params
                    .text_width
                    .saturating_sub(length)
                    .min(MAX_BLANKS_PER_GAP * gaps)
                    .max(gaps)
            } else {
                gaps
            };
            self.emit_line(indent, spaces);
        }
        self.words.push(word);
    }

    /// Process the end of an input line.
    ///
    /// Outside of fill mode this outputs the current line, if any.
    /// In fill mode input lines do not matter and this does nothing.
    pub fn new_line(&mut self) {
        if !self.params.fill && !self.words.is_empty() {
            self.emit_unjustified();
        }
    }

    /// Finish the current word and paragraph.
    ///
    /// The last line of a paragraph is never justified.
    pub fn end_paragraph(&mut self) {
        self.finish_word();
        if !self.words.is_empty() {
            self.emit_unjustified();
        }
        self.new_paragraph = true;
    }

    pub fn set_text_width(&mut self, text_width: usize) {
        self.params.text_width = text_width;
    }

    pub fn set_text_height(&mut self, text_height: usize) {
        self.params.text_height = Some(text_height);
        self.pages.set_text_height(text_height);
    }

    pub fn set_indentation(&mut self, indentation: usize) {
        self.params.indentation = indentation;
    }

    pub fn set_par_indentation(&mut self, par_indentation: usize) {
        self.params.par_indentation = par_indentation.try_into().unwrap_or(isize::MAX);
    }

    pub fn set_par_skip(&mut self, par_skip: usize) {
        self.params.par_skip = par_skip;
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.params.fill = fill;
    }

    pub fn set_justify(&mut self, justify: bool) {
        self.params.justify = justify;
    }

    /// Indentation of the line being built.
    fn indent(&self) -> usize {
        let extra = if self.new_paragraph {
            self.params.par_indentation
        } else {
            0
        };
        self.params.indentation.saturating_add_signed(extra)
    }

    fn emit_unjustified(&mut self) {
        let gaps = self.words.len().saturating_sub(1);
        self.emit_line(self.indent(), gaps);
    }

    /// Output the words of the current line with `indent` leading blanks and
    /// `spaces` blanks distributed over the gaps between words.
    ///
    /// There must be at least one word.
    fn emit_line(&mut self, indent: usize, spaces: usize) {
        if self.new_paragraph && !self.first_line {
            for _ in 0..self.params.par_skip {
                self.pages.add_line(None);
            }
        }
        self.first_line = false;
        self.new_paragraph = false;

        let n = self.words.len();
        let mut line = " ".repeat(indent);
        let mut blanks_so_far = 0;
        for (k, word) in self.words.drain(..).enumerate() {
            if k > 0 {
                let blanks = num_blanks(k, spaces, n);
                line.extend(std::iter::repeat(' ').take(blanks - blanks_so_far));
                blanks_so_far = blanks;
            }
            line.push_str(&word);
        }
        self.pages.add_line(Some(line));
    }
}

/// Number of characters in a word.
fn width(word: &str) -> usize {
    word.chars().count()
}

/// Returns the number of blanks between word 0 and word `k` of a line of
/// `n` words when `spaces` blanks are spread over the line.
///
/// This is `floor(0.5 + k * spaces / (n - 1))`, so gap sizes differ by at
/// most one and the larger gaps are spread along the line by rounding.
pub fn num_blanks(k: usize, spaces: usize, n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    (2 * k * spaces + (n - 1)) / (2 * (n - 1))
}
