use serde::Serialize;

use super::{CollectionError, CollectionItem};
use crate::format::RenderedRecipe;
use crate::request::RecipeRequest;

fn required(value: &str, field: &str) -> Result<String, CollectionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CollectionError::Invalid(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// A saved generated recipe. `content` is the rendered markup, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub title: String,
    pub content: String,
    pub cuisine: String,
    pub cooking_time: String,
    pub complexity: String,
}

impl Bookmark {
    /// Bookmark a freshly generated recipe.
    pub fn from_generated(request: &RecipeRequest, rendered: &RenderedRecipe) -> Self {
        Self {
            title: rendered
                .title
                .clone()
                .unwrap_or_else(|| "Untitled recipe".to_string()),
            content: rendered.html.clone(),
            cuisine: request.cuisine.clone(),
            cooking_time: request.cooking_time.clone(),
            complexity: request.complexity.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookmarkPatch {
    pub title: Option<String>,
}

impl CollectionItem for Bookmark {
    type Patch = BookmarkPatch;
    const COLLECTION: &'static str = "bookmarks";

    fn prepare(mut self) -> Result<Self, CollectionError> {
        self.title = required(&self.title, "title")?;
        Ok(self)
    }

    fn apply(&mut self, patch: BookmarkPatch) -> Result<(), CollectionError> {
        if let Some(title) = patch.title {
            self.title = required(&title, "title")?;
        }
        Ok(())
    }
}

/// A cooking goal with percentage progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    pub title: String,
    /// 0..=100
    pub progress: u8,
    pub completed: bool,
}

impl Goal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            progress: 0,
            completed: false,
        }
    }

    fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.completed = self.progress >= 100;
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub progress: Option<u8>,
}

impl CollectionItem for Goal {
    type Patch = GoalPatch;
    const COLLECTION: &'static str = "goals";

    fn prepare(mut self) -> Result<Self, CollectionError> {
        self.title = required(&self.title, "title")?;
        let progress = self.progress;
        self.set_progress(progress);
        Ok(self)
    }

    fn apply(&mut self, patch: GoalPatch) -> Result<(), CollectionError> {
        if let Some(title) = patch.title {
            self.title = required(&title, "title")?;
        }
        if let Some(progress) = patch.progress {
            self.set_progress(progress);
        }
        Ok(())
    }
}

/// One shopping-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub completed: bool,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
        }
    }

    /// Patch that flips `completed`.
    pub fn toggled(&self) -> ShoppingItemPatch {
        ShoppingItemPatch {
            name: None,
            completed: Some(!self.completed),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShoppingItemPatch {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

impl CollectionItem for ShoppingItem {
    type Patch = ShoppingItemPatch;
    const COLLECTION: &'static str = "shoppingList";

    fn prepare(mut self) -> Result<Self, CollectionError> {
        self.name = required(&self.name, "name")?;
        Ok(self)
    }

    fn apply(&mut self, patch: ShoppingItemPatch) -> Result<(), CollectionError> {
        if let Some(name) = patch.name {
            self.name = required(&name, "name")?;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_recipe;

    #[test]
    fn test_goal_progress_completes_at_100() {
        let mut goal = Goal::new("Cook 10 new dishes").prepare().unwrap();
        goal.apply(GoalPatch {
            progress: Some(40),
            ..Default::default()
        })
        .unwrap();
        assert!(!goal.completed);

        goal.apply(GoalPatch {
            progress: Some(100),
            ..Default::default()
        })
        .unwrap();
        assert!(goal.completed);
    }

    #[test]
    fn test_goal_progress_clamped() {
        let mut goal = Goal::new("x").prepare().unwrap();
        goal.apply(GoalPatch {
            progress: Some(250),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(goal.progress, 100);
        assert!(goal.completed);
    }

    #[test]
    fn test_blank_names_rejected() {
        assert!(ShoppingItem::new("  ").prepare().is_err());
        assert!(Goal::new("").prepare().is_err());

        let mut item = ShoppingItem::new(" milk ").prepare().unwrap();
        assert_eq!(item.name, "milk");
        let err = item
            .apply(ShoppingItemPatch {
                name: Some(" ".to_string()),
                completed: None,
            })
            .unwrap_err();
        assert!(matches!(err, CollectionError::Invalid(_)));
        assert_eq!(item.name, "milk");
    }

    #[test]
    fn test_shopping_item_toggle() {
        let mut item = ShoppingItem::new("eggs");
        item.apply(item.toggled()).unwrap();
        assert!(item.completed);
        item.apply(item.toggled()).unwrap();
        assert!(!item.completed);
    }

    #[test]
    fn test_bookmark_from_generated() {
        let request = RecipeRequest {
            ingredients: "tomato".to_string(),
            meal_type: "dinner".to_string(),
            cuisine: "Italian".to_string(),
            cooking_time: "30 minutes".to_string(),
            complexity: "easy".to_string(),
        };
        let rendered = format_recipe("# Pasta al Pomodoro\n1. Boil water");
        let bookmark = Bookmark::from_generated(&request, &rendered);

        assert_eq!(bookmark.title, "Pasta al Pomodoro");
        assert_eq!(bookmark.content, rendered.html);
        assert_eq!(bookmark.cuisine, "Italian");
        assert_eq!(bookmark.cooking_time, "30 minutes");

        let untitled = Bookmark::from_generated(&request, &format_recipe("just text"));
        assert_eq!(untitled.title, "Untitled recipe");
    }
}
