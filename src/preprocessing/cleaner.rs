use thiserror::Error;

/// Shown instead of a model answer when the user submits nothing.
pub const EMPTY_INPUT_GUIDANCE: &str = "Please enter some text to get a response.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Input is empty")]
    EmptyInput,
}

/// Text that passed [`Cleaner::validate`]. Only the cleaner builds one, so
/// holding it means the blank-input check already ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidInput<'a>(&'a str);

impl<'a> ValidInput<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

pub struct Cleaner;

impl Cleaner {
    /// Accepts any input with at least one non-whitespace character.
    ///
    /// The text is returned untouched: the prompt must carry exactly what the
    /// user typed, so no trimming or normalisation happens here.
    pub fn validate(input: &str) -> Result<ValidInput<'_>, InputError> {
        if input.trim().is_empty() {
            return Err(InputError::EmptyInput);
        }
        Ok(ValidInput(input))
    }
}
