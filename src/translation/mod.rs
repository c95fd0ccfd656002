/*!
 * Translation of subtitle chunks through a completion provider.
 *
 * - `core`: the `TranslationService` and token accounting
 * - `prompts`: prompt templates and prompt construction
 */

// Re-export main types for easier usage
pub use self::core::{TokenUsageStats, TranslationService};
pub use self::prompts::{PromptTemplate, build_prompt};

// Submodules
pub mod core;
pub mod prompts;
