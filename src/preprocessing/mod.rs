//! Input side of a turn: validation and prompt templating.

pub mod cleaner;
pub mod formatter;

pub use cleaner::{Cleaner, InputError, ValidInput, EMPTY_INPUT_GUIDANCE};
pub use formatter::{PromptFormatter, PromptTemplate, TemplateError, DEFAULT_TEMPLATE};
