//! Recipe constraints as received from callers, and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ingredients are required")]
    MissingIngredients,
}

/// Raw recipe constraints exactly as they arrive at the boundary.
///
/// Every field is optional; absent values are treated as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecipeQuery {
    /// Comma-separated list of available ingredients (required)
    pub ingredients: Option<String>,
    /// e.g. "dinner"
    pub meal_type: Option<String>,
    /// e.g. "Italian"
    pub cuisine: Option<String>,
    /// e.g. "30 minutes"
    pub cooking_time: Option<String>,
    /// e.g. "easy"
    pub complexity: Option<String>,
}

/// Validated recipe constraints.
///
/// Only `ingredients` is checked for presence. The other fields are free-form
/// and passed through untouched, so an empty cuisine just yields an empty
/// clause in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub ingredients: String,
    pub meal_type: String,
    pub cuisine: String,
    pub cooking_time: String,
    pub complexity: String,
}

impl RecipeRequest {
    /// Validate raw constraints. Fails only when `ingredients` is absent or blank.
    pub fn validate(query: RecipeQuery) -> Result<Self, ValidationError> {
        let ingredients = query.ingredients.unwrap_or_default();
        let ingredients = ingredients.trim();
        if ingredients.is_empty() {
            return Err(ValidationError::MissingIngredients);
        }

        Ok(Self {
            ingredients: ingredients.to_string(),
            meal_type: query.meal_type.unwrap_or_default(),
            cuisine: query.cuisine.unwrap_or_default(),
            cooking_time: query.cooking_time.unwrap_or_default(),
            complexity: query.complexity.unwrap_or_default(),
        })
    }
}

impl TryFrom<RecipeQuery> for RecipeRequest {
    type Error = ValidationError;

    fn try_from(query: RecipeQuery) -> Result<Self, Self::Error> {
        Self::validate(query)
    }
}
