//! Catalog commands

use crate::config::Config;
use crate::db::Store;
use crate::models::movie::NewMovie;
use crate::services::{CatalogError, CatalogService, SeaOrmCatalogService};

pub async fn cmd_list_movies(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let movies = SeaOrmCatalogService::new(store).list_movies().await?;

    if movies.is_empty() {
        println!("The catalog is empty.");
        println!();
        println!("Add one with: moviegallery add-movie --title ...");
        return Ok(());
    }

    println!("Movies ({} total)", movies.len());
    println!("{:-<70}", "");

    for movie in movies {
        println!("[{}] {} ({})", movie.id, movie.title, movie.genre);
        println!("  👍 {} | 👎 {}", movie.likes, movie.dislikes);
    }

    Ok(())
}

pub async fn cmd_add_movie(config: &Config, movie: NewMovie) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    match SeaOrmCatalogService::new(store).add_movie(movie).await {
        Ok(movie) => {
            println!("✓ Added: {} (ID: {})", movie.title, movie.id);
            Ok(())
        }
        Err(CatalogError::Validation(msg)) => {
            println!("{msg}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
