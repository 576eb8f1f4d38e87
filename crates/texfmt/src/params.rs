//! Formatting parameters and their presets.

/// Formatting parameters of one pipeline.
///
/// All widths are measured in characters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Params {
    /// Width of a line, including indentation.
    pub text_width: usize,
    /// Blanks inserted before every line.
    pub indentation: usize,
    /// Blanks added to `indentation` on the first line of a paragraph.
    ///
    /// Presets may make this negative to get a hanging indent.
    /// The effective indentation of a line is never below zero.
    pub par_indentation: isize,
    /// Blank lines inserted before every paragraph but the first.
    pub par_skip: usize,
    /// Lines per page, or `None` for no page breaks.
    pub text_height: Option<usize>,
    pub fill: bool,
    /// Only has an effect when `fill` is also on.
    pub justify: bool,
}

impl Params {
    /// Starting parameters for the main text.
    pub fn main() -> Params {
        Params {
            text_width: 72,
            indentation: 0,
            par_indentation: 3,
            par_skip: 1,
            text_height: None,
            fill: true,
            justify: true,
        }
    }

    /// Starting parameters for endnotes.
    ///
    /// The hanging indent puts the `[n] ` label of each endnote at column 0
    ///     and lines up the rest of the note 4 columns in.
    pub fn endnote() -> Params {
        Params {
            text_width: 60,
            indentation: 4,
            par_indentation: -4,
            par_skip: 0,
            text_height: None,
            fill: true,
            justify: true,
        }
    }
}

impl Params {
    /// Check the constraints that the markup commands enforce on the same
    /// parameters: the text width and, if set, the text height must be positive.
    ///
    /// The paragraph indentation may be negative here, for hanging indents.
    pub fn validate(&self) -> Result<(), InvalidParam> {
        let positive = [
            ("text_width", Some(self.text_width)),
            ("text_height", self.text_height),
        ];
        for (field, value) in positive {
            let Some(value) = value else {
                continue;
            };
            if !Requirement::Positive.allows(i64::try_from(value).unwrap_or(i64::MAX)) {
                return Err(InvalidParam {
                    field,
                    value,
                    requirement: Requirement::Positive,
                });
            }
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::main()
    }
}

/// The two sets of starting parameters used by a [`Controller`](crate::Controller).
///
/// When deserialized, a missing table falls back to its default.
/// Tables that are present must be complete, except for `text_height`
///     which defaults to unbounded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Presets {
    pub main: Params,
    pub endnote: Params,
}

impl Presets {
    /// Validate both sets of parameters.
    pub fn validate(&self) -> Result<(), InvalidPreset> {
        for (preset, params) in [("main", &self.main), ("endnote", &self.endnote)] {
            params
                .validate()
                .map_err(|param| InvalidPreset { preset, param })?;
        }
        Ok(())
    }
}

impl Default for Presets {
    fn default() -> Self {
        Presets {
            main: Params::main(),
            endnote: Params::endnote(),
        }
    }
}

/// Constraint on the value of a numeric command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    Positive,
    NonNegative,
}

impl Requirement {
    pub fn allows(self, value: i64) -> bool {
        match self {
            Requirement::Positive => value > 0,
            Requirement::NonNegative => value >= 0,
        }
    }

    /// Returns the value as a `usize` if it satisfies this requirement.
    pub fn check(self, value: i32) -> Result<usize, InvalidValue> {
        match usize::try_from(value) {
            Ok(u) if self.allows(value.into()) => Ok(u),
            _ => Err(InvalidValue {
                value,
                requirement: self,
            }),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Requirement::Positive => "a positive integer",
            Requirement::NonNegative => "a non-negative integer",
        }
    }
}

/// A setter received a value outside of its allowed range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidValue {
    pub value: i32,
    pub requirement: Requirement,
}

/// A parameter of a preset is out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidParam {
    pub field: &'static str,
    pub value: usize,
    pub requirement: Requirement,
}

/// A preset, `main` or `endnote`, has an out-of-range parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidPreset {
    pub preset: &'static str,
    pub param: InvalidParam,
}

impl std::fmt::Display for InvalidPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` in the `{}` preset must be {}, but it is {}",
            self.param.field,
            self.preset,
            self.param.requirement.describe(),
            self.param.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements() {
        assert_eq!(Requirement::Positive.check(3), Ok(3));
        assert_eq!(Requirement::NonNegative.check(0), Ok(0));
        assert_eq!(
            Requirement::Positive.check(0),
            Err(InvalidValue {
                value: 0,
                requirement: Requirement::Positive
            })
        );
        assert!(Requirement::NonNegative.check(-1).is_err());
    }

    #[test]
    fn default_presets_are_valid() {
        assert_eq!(Presets::default().validate(), Ok(()));
    }

    #[test]
    fn hanging_indent_is_valid() {
        let mut params = Params::main();
        params.par_indentation = -10;
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn zero_text_height() {
        let mut presets = Presets::default();
        presets.main.text_height = Some(0);
        let err = presets.validate().unwrap_err();
        assert_eq!(
            err,
            InvalidPreset {
                preset: "main",
                param: InvalidParam {
                    field: "text_height",
                    value: 0,
                    requirement: Requirement::Positive,
                },
            }
        );
        assert_eq!(
            err.to_string(),
            "`text_height` in the `main` preset must be a positive integer, but it is 0"
        );
    }

    #[test]
    fn zero_text_width() {
        let mut presets = Presets::default();
        presets.endnote.text_width = 0;
        let err = presets.validate().unwrap_err();
        assert_eq!(err.preset, "endnote");
        assert_eq!(err.param.field, "text_width");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_presets_file() {
        let json = r#"{
            "main": {
                "text_width": 40,
                "indentation": 2,
                "par_indentation": 0,
                "par_skip": 0,
                "fill": true,
                "justify": false
            }
        }"#;
        let got: Presets = serde_json::from_str(json).unwrap();
        let mut want = Presets::default();
        want.main = Params {
            text_width: 40,
            indentation: 2,
            par_indentation: 0,
            par_skip: 0,
            text_height: None,
            fill: true,
            justify: false,
        };
        assert_eq!(got, want);
    }
}
