use std::sync::Arc;

use anyhow::Context;
use booklist_app::modules::catalog::{
    models::{BookJson, BookView, SearchJson, SearchView},
    pagination::{parse_offset, PAGE_SIZE},
};
use booklist_db::{BookStore, MemoryBookStore, MySqlBookStore, PageWindow};
use booklist_kernel::settings::Settings;
use booklist_reviews::{NytReviewClient, ReviewGateway};
use clap::{Parser, Subcommand};

/// Query the book catalog without starting the web server.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use the built-in demo catalog instead of MySQL
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the database answers
    Ping,
    /// List titles starting with a prefix
    Search {
        prefix: String,
        /// Rows to skip; anything unparsable counts as 0
        #[arg(long)]
        offset: Option<String>,
    },
    /// Show one book
    Show {
        id: String,
        /// Print the JSON representation
        #[arg(long)]
        json: bool,
    },
    /// Fetch reviews of a title from the review API
    Reviews { title: String },
    /// Print the effective settings with secrets redacted
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load booklist settings")?;
    booklist_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Commands::Ping => {
            let pool = booklist_db::connect(&settings.database).await?;
            println!("database at {} is reachable", settings.database.endpoint());
            pool.close().await;
        }
        Commands::Search { prefix, offset } => {
            let store = open_store(&settings, cli.demo);
            let offset = parse_offset(offset.as_deref());
            let page = store
                .search(
                    &prefix,
                    PageWindow {
                        limit: PAGE_SIZE,
                        offset,
                    },
                )
                .await?;
            let view = SearchView::new(prefix, offset, page);
            println!("{}", serde_json::to_string_pretty(&SearchJson::from(&view))?);
            store.close().await;
        }
        Commands::Show { id, json } => {
            let store = open_store(&settings, cli.demo);
            let view = BookView::from(store.find(&id).await?);
            if json {
                println!("{}", serde_json::to_string_pretty(&BookJson::from(&view))?);
            } else {
                let book = &view.book;
                println!("{} ({})", book.title, book.id);
                println!("Authors: {}", book.authors);
                println!("Genres:  {}", book.genres);
                println!("Pages:   {}", book.pages);
                println!("Rating:  {} ({} ratings)", view.rating_display(), book.rating_count);
            }
            store.close().await;
        }
        Commands::Reviews { title } => {
            let client = NytReviewClient::new(&settings.reviews)?;
            let list = client.fetch_reviews(&title).await?;
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        Commands::Settings => {
            println!("{:#?}", settings);
        }
    }

    Ok(())
}

fn open_store(settings: &Settings, demo: bool) -> Arc<dyn BookStore> {
    if demo {
        tracing::info!("using the demo catalog");
        Arc::new(MemoryBookStore::demo())
    } else {
        Arc::new(MySqlBookStore::new(booklist_db::build_pool(&settings.database)))
    }
}
