//! Fetch one OMDb record and print the decoded detail plus how a card would
//! settle on it.
//! Usage:
//!   cargo run --bin omdb_props -- <imdb_id>
//! Requires OMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cineflex::card::{settle, CardState};
use cineflex::config::Config;
use cineflex::omdb::{imdb_url, OmdbApi, OmdbClient};
use dotenvy::dotenv;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let identifier = env::args()
        .nth(1)
        .context("usage: omdb_props <imdb_id>")?;

    let config = Config::from_env()?;
    let client = OmdbClient::from_config(&config)?;
    let outcome = client.fetch_detail(&identifier).await;

    if let Ok(detail) = &outcome {
        println!("{}", serde_json::to_string_pretty(detail)?);
    }
    match settle(outcome) {
        CardState::Ready(detail) => {
            println!("Card: ready -> {} ({})", detail.title, detail.year);
            match detail.rating_badge() {
                Some(rating) => println!("Badge: {rating}"),
                None => println!("Badge: hidden"),
            }
            for rating in &detail.ratings {
                println!("  {}: {}", rating.source, rating.value);
            }
            println!("Link: {}", imdb_url(&identifier));
        }
        CardState::Failed(reason) => println!("Card: failed -> {reason}"),
        CardState::Loading => println!("Card: still loading"),
    }
    Ok(())
}
