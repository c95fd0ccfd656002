/*!
 * Prompt construction for chunk translation.
 */

use crate::app_config::PromptStyle;
use crate::language_utils;

/// Instruction prepended to each chunk in `PromptStyle::Instruct` mode.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with a `{target_language}` placeholder
    template: String,
}

impl PromptTemplate {
    /// Default instruction for SubRip chunks.
    pub const SUBTITLE_TRANSLATOR: &'static str = "Translate the following SubRip subtitle text into {target_language}. \
Keep every cue number and timestamp line unchanged and translate only the caption lines. \
Reply with the translated subtitle text only.";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default subtitle translator template.
    pub fn subtitle_translator() -> Self {
        Self::new(Self::SUBTITLE_TRANSLATOR)
    }

    /// Render the instruction for a target language code.
    pub fn render(&self, target_language: &str) -> String {
        self.template
            .replace("{target_language}", &language_utils::describe_language(target_language))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::subtitle_translator()
    }
}

/// Build the prompt sent for one chunk.
///
/// `Raw` sends the chunk untouched, so the target language never reaches the
/// service.
pub fn build_prompt(style: PromptStyle, template: &PromptTemplate, chunk: &str, target_language: &str) -> String {
    match style {
        PromptStyle::Raw => chunk.to_string(),
        PromptStyle::Instruct => format!("{}\n\n{}", template.render(target_language), chunk),
    }
}
