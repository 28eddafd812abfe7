use crate::dataset::{Dataset, MovieSummary};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Empty,
    Results(Vec<MovieSummary>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Other,
}

#[derive(Debug, Clone)]
pub struct SearchController<'a> {
    dataset: &'a Dataset,
    input: String,
    suggestions: Vec<String>,
    phase: SearchPhase,
}

impl<'a> SearchController<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            input: String::new(),
            suggestions: Vec::new(),
            phase: SearchPhase::Idle,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn is_committed(&self) -> bool {
        !matches!(self.phase, SearchPhase::Idle)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading)
    }

    pub fn results(&self) -> &[MovieSummary] {
        match &self.phase {
            SearchPhase::Results(movies) => movies,
            _ => &[],
        }
    }

    pub fn on_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.suggestions = self.dataset.suggest(&self.input);
    }

    pub fn on_key(&mut self, key: KeyPress) {
        if key == KeyPress::Enter {
            self.commit(None);
        }
    }

    pub fn submit(&mut self) {
        self.commit(None);
    }

    pub fn select_suggestion(&mut self, key: &str) -> bool {
        let dataset = self.dataset;
        let Some(entry) = dataset.get(key) else {
            return false;
        };
        let title = entry.movie.title.clone();
        self.input = title.clone();
        self.commit(Some(&title))
    }

    pub fn commit(&mut self, title_override: Option<&str>) -> bool {
        let term = title_override
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.input)
            .to_lowercase()
            .trim()
            .to_string();
        if term.is_empty() {
            return false;
        }

        self.phase = SearchPhase::Loading;
        debug!(term = %term, "Search committed");

        let dataset = self.dataset;
        self.phase = match dataset.find_by_title(&term) {
            Some(entry) => {
                self.input = entry.movie.title.clone();
                SearchPhase::Results(entry.recommendations.clone())
            }
            None => SearchPhase::Empty,
        };
        self.suggestions.clear();
        true
    }
}
