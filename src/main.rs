use clap::Parser;
use mealplan::{
    cli::{commands, Cli, Commands},
    config::Settings,
    db::{self, DbPool},
    utils::validation::validate_name,
    RecipeBook, Result,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mealplan=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    if let Err(e) = run(cli.command, &settings).await {
        error!("Command failed: {}", e.log_safe());
        return Err(e);
    }

    Ok(())
}

async fn run(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Migrate => {
            connect(settings).await?;
            println!("\u{2713} Database migrations completed successfully");
        }
        Commands::UserAdd { name } => {
            let pool = connect(settings).await?;
            let user = db::users::create_user(&pool, &name).await?;
            println!("\u{2713} Created user {} ({})", user.id, user.name);
        }
        Commands::Lookup { name, complete } => {
            let vocabulary = commands::load_vocabulary(&settings.vocabulary)?;
            commands::print_json(&commands::lookup(&vocabulary, &name, complete))?;
        }
        Commands::Extract { text, file } => {
            let extractor = commands::build_extractor(&settings.vocabulary)?;
            commands::print_json(&commands::extract(&extractor, text, file)?)?;
        }
        Commands::RecipeAdd { user, name, file } => {
            let book = recipe_book(settings).await?;
            let text = commands::read_ingredient_file(&file)?;
            let recorded = book.save_recipe(user, &name, &text).await?;

            println!(
                "\u{2713} Saved recipe {} with {} ingredients",
                recorded.recipe.id,
                recorded.ingredients.len()
            );
            commands::print_json(&recorded.ingredient_names())?;
        }
        Commands::RecipeEdit { recipe, file } => {
            let book = recipe_book(settings).await?;
            let text = commands::read_ingredient_file(&file)?;
            let recorded = book.edit_recipe(recipe, &text).await?;

            println!(
                "\u{2713} Updated recipe {} with {} ingredients",
                recorded.recipe.id,
                recorded.ingredients.len()
            );
            commands::print_json(&recorded.ingredient_names())?;
        }
        Commands::RecipeShow { recipe } => {
            let pool = connect(settings).await?;
            commands::print_json(&commands::recipe_show(&pool, recipe).await?)?;
        }
        Commands::RecipeList { user } => {
            let pool = connect(settings).await?;
            commands::print_json(&commands::recipe_list(&pool, user).await?)?;
        }
        Commands::RecipeDelete { recipe } => {
            let book = recipe_book(settings).await?;
            book.delete_recipe(recipe).await?;
            println!("\u{2713} Deleted recipe {recipe}");
        }
        Commands::PantryAdd { user, name } => {
            validate_name("Pantry item", &name)?;
            let pool = connect(settings).await?;
            db::users::get_user(&pool, user).await?;

            let item = db::pantry::add_pantry_item(&pool, user, &name).await?;
            println!("\u{2713} Pantry item {} ({})", item.id, item.name);
        }
        Commands::PantryList { user } => {
            let pool = connect(settings).await?;
            db::users::get_user(&pool, user).await?;
            commands::print_json(&db::pantry::list_pantry(&pool, user).await?)?;
        }
        Commands::PantryRemove { user, name } => {
            let pool = connect(settings).await?;
            if commands::pantry_remove(&pool, user, &name).await? {
                println!("\u{2713} Removed {name} from the pantry");
            } else {
                println!("{name} is not in the pantry");
            }
        }
        Commands::Missing { recipe } => {
            let pool = connect(settings).await?;
            commands::print_json(&commands::missing(&pool, recipe).await?)?;
        }
    }

    Ok(())
}

async fn connect(settings: &Settings) -> Result<DbPool> {
    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    db::run_migrations(&pool).await?;
    Ok(pool)
}

async fn recipe_book(settings: &Settings) -> Result<RecipeBook> {
    let extractor = commands::build_extractor(&settings.vocabulary)?;
    let pool = connect(settings).await?;

    Ok(RecipeBook::new(pool, extractor))
}
