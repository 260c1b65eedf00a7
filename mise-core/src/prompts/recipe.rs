//! Recipe generation prompt.
//!
//! The line order and wording here are part of the observable behavior of the
//! service: any change alters what the model generates.

use std::fmt;

use crate::request::RecipeRequest;

/// Prompt name used in logs.
pub const RECIPE_PROMPT_NAME: &str = "generate_recipe";

const OPENING_DIRECTIVE: &str = "Generate a recipe that incorporates the following details:";

/// Labels of the bracketed clauses, in the order they appear in the prompt.
pub const FIELD_ORDER: [&str; 5] = [
    "Ingredients",
    "Meal Type",
    "Cuisine Preference",
    "Cooking Time",
    "Complexity",
];

const CLOSING_DIRECTIVES: [&str; 3] = [
    "Please provide a detailed recipe, including steps for preparation and cooking.",
    "Only use the ingredients provided, and let the recipe highlight their fresh and vibrant flavors.",
    "Also give the recipe a suitable name in its local language based on cuisine preference.",
];

/// Ordered instruction lines for one recipe generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument {
    lines: Vec<String>,
}

impl PromptDocument {
    /// Render validated constraints into the fixed prompt structure:
    /// one opening directive, one bracketed clause per field, three closing directives.
    pub fn build(request: &RecipeRequest) -> Self {
        let values = [
            request.ingredients.as_str(),
            request.meal_type.as_str(),
            request.cuisine.as_str(),
            request.cooking_time.as_str(),
            request.complexity.as_str(),
        ];

        let mut lines = Vec::with_capacity(1 + FIELD_ORDER.len() + CLOSING_DIRECTIVES.len());
        lines.push(OPENING_DIRECTIVE.to_string());
        lines.extend(
            FIELD_ORDER
                .iter()
                .zip(values)
                .map(|(label, value)| format!("[{}: {}]", label, value)),
        );
        lines.extend(CLOSING_DIRECTIVES.iter().map(|d| d.to_string()));

        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The bracketed constraint clauses.
    pub fn clauses(&self) -> &[String] {
        &self.lines[1..1 + FIELD_ORDER.len()]
    }

    pub fn closing_directives(&self) -> &[String] {
        &self.lines[1 + FIELD_ORDER.len()..]
    }

    /// All lines joined with newlines.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for PromptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
