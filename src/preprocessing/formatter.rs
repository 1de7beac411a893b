use thiserror::Error;

/// Instruction template the adapter was fine-tuned on.
pub const DEFAULT_TEMPLATE: &str = "Below is an instruction that describes a task. Write a response that appropriately completes the request. ### Instruction: %s ### Response: ";

const PLACEHOLDER: &str = "%s";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template has no `%s` placeholder")]
    MissingPlaceholder,
    #[error("Template has {0} `%s` placeholders, expected exactly one")]
    TooManyPlaceholders(usize),
}

/// A template split around its single `%s` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    prefix: String,
    suffix: String,
}

impl PromptTemplate {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        match template.matches(PLACEHOLDER).count() {
            0 => Err(TemplateError::MissingPlaceholder),
            1 => {
                let (prefix, suffix) = template
                    .split_once(PLACEHOLDER)
                    .ok_or(TemplateError::MissingPlaceholder)?;
                Ok(Self {
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                })
            }
            n => Err(TemplateError::TooManyPlaceholders(n)),
        }
    }

    /// Text placed before the user input.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Text placed after the user input; ends with the response marker.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            prefix: "Below is an instruction that describes a task. Write a response that appropriately completes the request. ### Instruction: ".to_string(),
            suffix: " ### Response: ".to_string(),
        }
    }
}

/// Wraps raw user text in the instruction template.
#[derive(Debug, Clone, Default)]
pub struct PromptFormatter {
    template: PromptTemplate,
}

impl PromptFormatter {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Pure and total: any string, empty included, yields a prompt.
    pub fn format(&self, raw_input: &str) -> String {
        let mut prompt = String::with_capacity(
            self.template.prefix.len() + raw_input.len() + self.template.suffix.len(),
        );
        prompt.push_str(&self.template.prefix);
        prompt.push_str(raw_input);
        prompt.push_str(&self.template.suffix);
        prompt
    }
}
