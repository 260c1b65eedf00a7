pub mod collections;
pub mod format;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod request;

pub use format::{format_recipe, RenderedRecipe};
pub use llm::{
    ConfigError, FakeClient, GeminiClient, GeminiConfig, GeneratedText, GenerationClient,
    GenerationError, GenerationResult,
};
pub use pipeline::{PipelineError, RecipePipeline};
pub use prompts::PromptDocument;
pub use request::{RecipeQuery, RecipeRequest, ValidationError};
