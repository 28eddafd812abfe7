use crate::card::{CardFailure, CardState, DetailCard};
use crate::config::Config;
use crate::dataset::{self, Dataset};
use crate::omdb::{OmdbApi, OmdbClient};
use crate::render;
use crate::search::SearchController;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub omdb: Arc<dyn OmdbApi>,
    pub dataset: &'static Dataset,
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    q: Option<String>,
    pick: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct Suggestion {
    key: String,
    title: String,
}

pub async fn run_server(config: Config) -> Result<()> {
    let dataset = match &config.dataset_path {
        Some(path) => {
            info!("Loading dataset from {}", path.display());
            dataset::install(Dataset::from_path(path)?)?
        }
        None => dataset::global()?,
    };
    info!("Dataset ready with {} entries", dataset.len());

    let omdb: Arc<dyn OmdbApi> = Arc::new(OmdbClient::from_config(&config)?);
    info!("Using OMDb endpoint {}", config.omdb_base_url);

    let app = build_router(AppState { omdb, dataset });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Listening on {}", config.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/suggest", get(suggest))
        .route("/cards/:id", get(detail_card))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let mut search = SearchController::new(state.dataset);
    if let Some(key) = query.pick.as_deref() {
        if !search.select_suggestion(key) {
            debug!("Ignoring unknown suggestion key '{}'", key);
        }
    } else if let Some(text) = query.q {
        search.on_input(text);
        search.submit();
    }
    Html(render::page(&search, state.dataset))
}

async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Json<Vec<Suggestion>> {
    let mut search = SearchController::new(state.dataset);
    search.on_input(query.q.unwrap_or_default());
    let items = search
        .suggestions()
        .iter()
        .filter_map(|key| {
            state.dataset.get(key).map(|entry| Suggestion {
                key: key.clone(),
                title: entry.movie.title.clone(),
            })
        })
        .collect();
    Json(items)
}

async fn detail_card(State(state): State<AppState>, Path(id): Path<String>) -> Html<String> {
    let card = DetailCard::mount(Arc::clone(&state.omdb), id.as_str());
    let settled = match card.settled().await {
        Ok(s) => s,
        Err(e) => {
            warn!("Detail card for {} never settled: {}", id, e);
            CardState::Failed(CardFailure::Transport(e.to_string()))
        }
    };
    Html(render::card(&id, &settled))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
