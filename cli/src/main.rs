use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mise_core::{PromptDocument, RecipeQuery, RecipeRequest};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "mise")]
#[command(about = "Mise CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the server
    Ping {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Generate a recipe and print the rendered markup
    Generate {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[command(flatten)]
        constraints: Constraints,
    },
    /// Print the prompt that would be sent for these constraints (no network)
    Prompt {
        #[command(flatten)]
        constraints: Constraints,
    },
}

#[derive(Args, Debug, Clone)]
struct Constraints {
    /// Comma-separated list of available ingredients
    #[arg(long)]
    ingredients: String,
    #[arg(long)]
    meal_type: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    #[arg(long)]
    cooking_time: Option<String>,
    #[arg(long)]
    complexity: Option<String>,
}

impl From<Constraints> for RecipeQuery {
    fn from(c: Constraints) -> Self {
        RecipeQuery {
            ingredients: Some(c.ingredients),
            meal_type: c.meal_type,
            cuisine: c.cuisine,
            cooking_time: c.cooking_time,
            complexity: c.complexity,
        }
    }
}

#[derive(Deserialize)]
struct PingResponse {
    message: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ping { server } => {
            ping(&server).await?;
        }
        Commands::Generate {
            server,
            constraints,
        } => {
            generate(&server, constraints.into()).await?;
        }
        Commands::Prompt { constraints } => {
            println!("{}", prompt(constraints.into())?);
        }
    }

    Ok(())
}

async fn ping(server: &str) -> Result<()> {
    let url = format!("{}/test", server.trim_end_matches('/'));
    let response: PingResponse = reqwest::get(&url)
        .await
        .with_context(|| format!("Failed to reach {}", url))?
        .error_for_status()?
        .json()
        .await?;

    println!("{}", response.message);

    Ok(())
}

async fn generate(server: &str, query: RecipeQuery) -> Result<()> {
    let url = format!("{}/recipestream", server.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .get(&url)
        .query(&query)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        bail!("Server returned {}: {}", status, message);
    }

    println!("{}", body);

    Ok(())
}

fn prompt(query: RecipeQuery) -> Result<PromptDocument> {
    let request = RecipeRequest::validate(query)?;
    Ok(PromptDocument::build(&request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints(ingredients: &str) -> Constraints {
        Constraints {
            ingredients: ingredients.to_string(),
            meal_type: Some("dinner".to_string()),
            cuisine: None,
            cooking_time: None,
            complexity: None,
        }
    }

    #[test]
    fn test_prompt_renders_clauses() {
        let doc = prompt(constraints("leeks, potatoes").into()).unwrap();
        assert_eq!(doc.clauses()[0], "[Ingredients: leeks, potatoes]");
        assert_eq!(doc.clauses()[1], "[Meal Type: dinner]");
        assert_eq!(doc.clauses()[2], "[Cuisine Preference: ]");
    }

    #[test]
    fn test_prompt_rejects_blank_ingredients() {
        let err = prompt(constraints("   ").into()).unwrap_err();
        assert_eq!(err.to_string(), "Ingredients are required");
    }

    #[test]
    fn test_cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "mise",
            "generate",
            "--ingredients",
            "rice",
            "--cooking-time",
            "20 minutes",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                server,
                constraints,
            } => {
                assert_eq!(server, "http://localhost:3000");
                assert_eq!(constraints.ingredients, "rice");
                assert_eq!(constraints.cooking_time.as_deref(), Some("20 minutes"));
            }
            _ => panic!("expected generate"),
        }
    }
}
