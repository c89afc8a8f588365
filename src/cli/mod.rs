// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mealplan")]
#[command(about = "Meal planner - recipes, pantry and ingredient recognition", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate,

    /// Create a user
    UserAdd {
        /// Display name
        name: String,
    },

    /// Check a name against the ingredient vocabulary
    Lookup {
        /// Full name or prefix
        name: String,

        /// List up to N registered names starting with NAME
        #[arg(long)]
        complete: Option<usize>,
    },

    /// Print the ingredients recognized in an ingredient list
    Extract {
        /// Ingredient list text
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// File holding the ingredient list
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Save a recipe and record its ingredients
    RecipeAdd {
        /// Owner of the recipe
        #[arg(long)]
        user: i64,

        /// Recipe name
        #[arg(long)]
        name: String,

        /// File holding the ingredient list
        #[arg(long)]
        file: PathBuf,
    },

    /// Replace a recipe's ingredient list and re-record its ingredients
    RecipeEdit {
        #[arg(long)]
        recipe: i64,

        /// File holding the ingredient list
        #[arg(long)]
        file: PathBuf,
    },

    /// Show a recipe with its recognized ingredients
    RecipeShow {
        /// Recipe ID
        recipe: i64,
    },

    /// List a user's recipes
    RecipeList {
        #[arg(long)]
        user: i64,
    },

    /// Delete a recipe
    RecipeDelete {
        /// Recipe ID
        recipe: i64,
    },

    /// Add an item to a user's pantry
    PantryAdd {
        #[arg(long)]
        user: i64,

        /// Ingredient name
        name: String,
    },

    /// List a user's pantry
    PantryList {
        #[arg(long)]
        user: i64,
    },

    /// Remove an item from a user's pantry
    PantryRemove {
        #[arg(long)]
        user: i64,

        /// Ingredient name
        name: String,
    },

    /// List a recipe's ingredients that are not in the pantry
    Missing {
        #[arg(long)]
        recipe: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recipe_add() {
        let cli = Cli::try_parse_from([
            "mealplan",
            "recipe-add",
            "--user",
            "1",
            "--name",
            "Soup",
            "--file",
            "soup.html",
        ])
        .unwrap();

        match cli.command {
            Commands::RecipeAdd { user, name, file } => {
                assert_eq!(user, 1);
                assert_eq!(name, "Soup");
                assert_eq!(file, PathBuf::from("soup.html"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_recipe_list() {
        let cli = Cli::try_parse_from(["mealplan", "recipe-list", "--user", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::RecipeList { user: 3 }));

        let cli = Cli::try_parse_from(["mealplan", "recipe-show", "12"]).unwrap();
        assert!(matches!(cli.command, Commands::RecipeShow { recipe: 12 }));
    }

    #[test]
    fn test_extract_text_and_file_conflict() {
        let result = Cli::try_parse_from([
            "mealplan", "extract", "--text", "Salt", "--file", "list.html",
        ]);
        assert!(result.is_err());
    }
}
