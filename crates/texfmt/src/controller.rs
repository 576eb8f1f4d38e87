//! Routing of formatting events to the main text or the endnotes.
//!
//! A [`Controller`] owns two line assemblers, one for the main text and
//! one for the endnotes, each starting from its own [`Params`].
//! All events go to the assembler selected by the current [`Mode`].
//! When the document is closed the endnote lines are appended to the main
//! text and everything is written to the controller's [`LineSink`].

use crate::assembler::LineAssembler;
use crate::page::LineSink;
use crate::params::{InvalidValue, Params, Presets, Requirement};
use log::debug;

/// Which part of the document events currently go to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Endnote,
}

/// Dispatcher between the main text and the endnotes.
pub struct Controller<S> {
    main: LineAssembler,
    endnotes: LineAssembler,
    mode: Mode,
    /// Number of the next endnote.
    next_endnote: usize,
    finished: bool,
    sink: S,
}

impl<S: LineSink> Controller<S> {
    /// Create a controller with the default presets.
    pub fn new(sink: S) -> Self {
        Self::with_presets(sink, &Presets::default())
    }

    /// Create a controller starting from the provided presets.
    ///
    /// The presets are expected to be valid (see [`Presets::validate`]).
    /// The text height of the endnote preset is not used: endnotes are
    /// paginated together with the main text.
    pub fn with_presets(sink: S, presets: &Presets) -> Self {
        let mut endnote = presets.endnote.clone();
        endnote.text_height = None;
        Controller {
            main: LineAssembler::new(presets.main.clone()),
            endnotes: LineAssembler::new(endnote),
            mode: Mode::Normal,
            next_endnote: 1,
            finished: false,
            sink,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current parameters of the part of the document in the current mode.
    pub fn params(&self) -> &Params {
        match self.mode {
            Mode::Normal => self.main.params(),
            Mode::Endnote => self.endnotes.params(),
        }
    }

    fn active(&mut self) -> &mut LineAssembler {
        match self.mode {
            Mode::Normal => &mut self.main,
            Mode::Endnote => &mut self.endnotes,
        }
    }

    /// Append text to the current word.
    pub fn add_text(&mut self, text: &str) {
        self.active().add_text(text);
    }

    pub fn end_word(&mut self) {
        self.active().finish_word();
    }

    pub fn add_newline(&mut self) {
        self.active().new_line();
    }

    pub fn end_paragraph(&mut self) {
        self.active().end_paragraph();
    }

    pub fn set_text_width(&mut self, value: i32) -> Result<(), InvalidValue> {
        let width = Requirement::Positive.check(value)?;
        self.active().set_text_width(width);
        Ok(())
    }

    /// Set the number of lines per page.
    ///
    /// Endnotes are paginated together with the main text, so inside an
    /// endnote this command is ignored and its value is not checked.
    pub fn set_text_height(&mut self, value: i32) -> Result<(), InvalidValue> {
        if self.mode == Mode::Endnote {
            debug!("ignoring text height {value} inside an endnote");
            return Ok(());
        }
        let height = Requirement::Positive.check(value)?;
        self.main.set_text_height(height);
        Ok(())
    }

    pub fn set_indentation(&mut self, value: i32) -> Result<(), InvalidValue> {
        let indentation = Requirement::NonNegative.check(value)?;
        self.active().set_indentation(indentation);
        Ok(())
    }

    pub fn set_par_indentation(&mut self, value: i32) -> Result<(), InvalidValue> {
        let par_indentation = Requirement::NonNegative.check(value)?;
        self.active().set_par_indentation(par_indentation);
        Ok(())
    }

    pub fn set_par_skip(&mut self, value: i32) -> Result<(), InvalidValue> {
        let par_skip = Requirement::NonNegative.check(value)?;
        self.active().set_par_skip(par_skip);
        Ok(())
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.active().set_fill(fill);
    }

    pub fn set_justify(&mut self, justify: bool) {
        self.active().set_justify(justify);
    }

    /// Insert the reference to the next endnote into the main text and
    /// switch to endnote mode.
    ///
    /// Returns the label that starts the endnote body, e.g. `[1] `.
    /// The endnote ends with the next call to [`Controller::close`].
    pub fn begin_endnote(&mut self) -> String {
        let n = self.next_endnote;
        self.next_endnote += 1;
        self.main.add_text(&format!["[{n}]"]);
        self.mode = Mode::Endnote;
        debug!("starting endnote {n}");
        format!["[{n}] "]
    }

    /// Close the current part of the document.
    ///
    /// In endnote mode this ends the endnote and returns to the main text.
    /// Otherwise it ends the document: the endnotes are appended to the
    /// main text and all lines are written to the sink.
    /// Closing a finished document does nothing.
    pub fn close(&mut self) -> std::io::Result<()> {
        match self.mode {
            Mode::Endnote => {
                self.endnotes.end_paragraph();
                self.mode = Mode::Normal;
                debug!("finished endnote {}", self.next_endnote - 1);
                Ok(())
            }
            Mode::Normal => {
                if self.finished {
                    return Ok(());
                }
                self.finished = true;
                self.main.end_paragraph();
                for line in self.endnotes.pages_mut().take_lines() {
                    self.main.pages_mut().add_line(Some(line));
                }
                let lines = self.main.pages_mut().take_lines();
                debug!("writing {} lines", lines.len());
                for line in lines {
                    self.sink.write(&line)?;
                }
                Ok(())
            }
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller<Vec<String>> {
        Controller::new(vec![])
    }

    fn close(mut controller: Controller<Vec<String>>) -> Vec<String> {
        controller.close().unwrap();
        controller.into_sink()
    }

    fn words(controller: &mut Controller<Vec<String>>, text: &str) {
        for word in text.split_whitespace() {
            controller.add_text(word);
            controller.end_word();
        }
    }

    #[test]
    fn main_text_only() {
        let mut controller = controller();
        words(&mut controller, "Hello world");
        controller.end_paragraph();
        words(&mut controller, "Bye");
        assert_eq!(close(controller), vec!["   Hello world", "", "   Bye"]);
    }

    #[test]
    fn endnote_is_appended() {
        let mut controller = controller();
        controller.add_text("Text");
        let label = controller.begin_endnote();
        assert_eq!(label, "[1] ");
        assert_eq!(controller.mode(), Mode::Endnote);
        controller.add_text(&label);
        words(&mut controller, "The note");
        controller.close().unwrap();
        assert_eq!(controller.mode(), Mode::Normal);
        controller.end_word();
        assert_eq!(close(controller), vec!["   Text[1]", "[1] The note"]);
    }

    #[test]
    fn endnotes_are_numbered_per_controller() {
        for _ in 0..2 {
            let mut controller = controller();
            assert_eq!(controller.begin_endnote(), "[1] ");
            controller.close().unwrap();
            assert_eq!(controller.begin_endnote(), "[2] ");
            controller.close().unwrap();
        }
    }

    #[test]
    fn setters_change_active_params_only() {
        let mut controller = controller();
        controller.set_text_width(30).unwrap();
        controller.begin_endnote();
        assert_eq!(controller.params().text_width, 60);
        controller.set_text_width(20).unwrap();
        controller.set_fill(false);
        assert_eq!(controller.params().text_width, 20);
        controller.close().unwrap();
        assert_eq!(controller.params().text_width, 30);
        assert!(controller.params().fill);
    }

    #[test]
    fn invalid_values() {
        let mut controller = controller();
        assert_eq!(
            controller.set_text_width(0),
            Err(InvalidValue {
                value: 0,
                requirement: Requirement::Positive
            })
        );
        assert!(controller.set_text_height(-3).is_err());
        assert!(controller.set_indentation(-1).is_err());
        assert!(controller.set_par_indentation(-1).is_err());
        assert!(controller.set_par_skip(-1).is_err());
        assert_eq!(controller.set_par_skip(0), Ok(()));
    }

    #[test]
    fn text_height_ignored_in_endnote() {
        let mut controller = controller();
        controller.begin_endnote();
        assert_eq!(controller.set_text_height(-3), Ok(()));
        assert_eq!(controller.params().text_height, None);
        controller.close().unwrap();
        assert_eq!(controller.params().text_height, None);
    }

    #[test]
    fn endnotes_are_paginated_with_main_text() {
        let mut controller = controller();
        controller.set_text_height(1).unwrap();
        controller.add_text("A");
        let label = controller.begin_endnote();
        controller.add_text(&label);
        controller.add_text("x");
        controller.close().unwrap();
        assert_eq!(close(controller), vec!["   A[1]", "\u{c}[1] x"]);
    }

    #[test]
    fn close_twice() {
        let mut controller = controller();
        words(&mut controller, "once");
        controller.close().unwrap();
        controller.close().unwrap();
        assert_eq!(controller.into_sink(), vec!["   once"]);
    }
}
