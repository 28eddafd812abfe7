use anyhow::{anyhow, Result};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::omdb::{MovieDetail, OmdbApi};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardFailure {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("OMDb rejected the lookup: {0}")]
    Rejected(String),
    #[error("OMDb returned a record without a title or poster")]
    Unusable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState {
    Loading,
    Ready(Box<MovieDetail>),
    Failed(CardFailure),
}

impl CardState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CardState::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSnapshot {
    pub generation: u64,
    pub identifier: String,
    pub state: CardState,
}

pub fn settle(outcome: Result<MovieDetail>) -> CardState {
    match outcome {
        Err(e) => CardState::Failed(CardFailure::Transport(format!("{e:#}"))),
        Ok(detail) if detail.is_rejected() => CardState::Failed(CardFailure::Rejected(
            detail
                .error
                .unwrap_or_else(|| "no reason given".to_string()),
        )),
        Ok(detail) if !detail.is_displayable() => CardState::Failed(CardFailure::Unusable),
        Ok(detail) => CardState::Ready(Box::new(detail)),
    }
}

// The generation check runs under the channel lock, so a newer
// set_identifier always wins over a late completion.
fn apply(tx: &watch::Sender<CardSnapshot>, generation: u64, state: CardState) -> bool {
    tx.send_if_modified(|snap| {
        if snap.generation != generation {
            return false;
        }
        snap.state = state;
        true
    })
}

pub struct DetailCard {
    api: Arc<dyn OmdbApi>,
    generation: u64,
    identifier: Option<String>,
    tx: Arc<watch::Sender<CardSnapshot>>,
    task: Option<JoinHandle<()>>,
}

impl DetailCard {
    pub fn new(api: Arc<dyn OmdbApi>) -> Self {
        let (tx, _rx) = watch::channel(CardSnapshot {
            generation: 0,
            identifier: String::new(),
            state: CardState::Loading,
        });
        Self {
            api,
            generation: 0,
            identifier: None,
            tx: Arc::new(tx),
            task: None,
        }
    }

    pub fn mount(api: Arc<dyn OmdbApi>, identifier: impl Into<String>) -> Self {
        let mut card = Self::new(api);
        card.set_identifier(identifier);
        card
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn state(&self) -> CardState {
        self.tx.borrow().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CardSnapshot> {
        self.tx.subscribe()
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if self.identifier.as_deref() == Some(identifier.as_str()) {
            return;
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        self.identifier = Some(identifier.clone());
        self.tx.send_replace(CardSnapshot {
            generation,
            identifier: identifier.clone(),
            state: CardState::Loading,
        });

        let api = Arc::clone(&self.api);
        let tx = Arc::clone(&self.tx);
        self.task = Some(tokio::spawn(async move {
            let state = settle(api.fetch_detail(&identifier).await);
            if let CardState::Failed(reason) = &state {
                warn!(identifier = %identifier, "Detail card failed: {}", reason);
            }
            if !apply(&tx, generation, state) {
                debug!(identifier = %identifier, generation, "Discarding superseded detail");
            }
        }));
    }

    pub async fn settled(&self) -> Result<CardState> {
        if self.identifier.is_none() {
            return Err(anyhow!("Detail card has no identifier"));
        }
        let generation = self.generation;
        let mut rx = self.tx.subscribe();
        let snap = rx
            .wait_for(|s| s.generation == generation && !s.state.is_loading())
            .await
            .map_err(|_| anyhow!("Detail card closed before settling"))?;
        Ok(snap.state.clone())
    }
}

impl Drop for DetailCard {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
