use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use cardlink::config::{Config, DatabaseBackend};
use cardlink::storage::{PostgresStorage, SqliteStorage, Storage};

#[derive(Parser)]
#[command(name = "cardlink-admin")]
#[command(about = "Cardlink admin management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List profiles
    Profiles {
        /// Maximum number of rows
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
    /// Approve a testimonial
    Approve {
        /// Testimonial id
        testimonial_id: i64,
    },
    /// Hide a previously approved testimonial
    Hide {
        /// Testimonial id
        testimonial_id: i64,
    },
    /// Delete a profile and everything scoped to it
    Delete {
        /// Profile slug
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => Arc::new(SqliteStorage::new(&config.database.url).await?),
        DatabaseBackend::Postgres => Arc::new(PostgresStorage::new(&config.database.url).await?),
    };

    // Ensure database is initialized
    storage.init().await?;

    match cli.command {
        Commands::Profiles { limit } => {
            let profiles = storage.list_profiles(limit, 0).await?;
            if profiles.is_empty() {
                println!("No profiles found");
            } else {
                for p in profiles {
                    println!(
                        "{:<40} {:<30} views={:<8} public={}",
                        p.slug, p.display_name, p.views, p.is_public
                    );
                }
            }
        }
        Commands::Approve { testimonial_id } => {
            if storage.set_testimonial_approval(testimonial_id, true).await? {
                println!("Testimonial {testimonial_id} approved");
            } else {
                println!("Testimonial {testimonial_id} not found");
            }
        }
        Commands::Hide { testimonial_id } => {
            if storage
                .set_testimonial_approval(testimonial_id, false)
                .await?
            {
                println!("Testimonial {testimonial_id} hidden");
            } else {
                println!("Testimonial {testimonial_id} not found");
            }
        }
        Commands::Delete { slug } => {
            if storage.delete_profile(&slug).await? {
                println!("Profile '{slug}' deleted");
            } else {
                println!("Profile '{slug}' not found");
            }
        }
    }

    Ok(())
}
