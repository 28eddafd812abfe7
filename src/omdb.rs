use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;

pub const OMDB_BASE: &str = "https://www.omdbapi.com/";
const IMDB_TITLE_BASE: &str = "https://www.imdb.com/title";
const NOT_AVAILABLE: &str = "N/A";

#[async_trait]
pub trait OmdbApi: Send + Sync {
    async fn fetch_detail(&self, identifier: &str) -> Result<MovieDetail>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetail {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Rated")]
    pub rated: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Writer")]
    pub writer: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Awards")]
    pub awards: String,
    #[serde(rename = "Poster")]
    pub poster: String,
    #[serde(rename = "Ratings")]
    pub ratings: Vec<Rating>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "BoxOffice")]
    pub box_office: String,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MovieDetail {
    pub fn is_rejected(&self) -> bool {
        self.response.eq_ignore_ascii_case("False")
    }

    // A card needs at least a title and a real poster image.
    pub fn is_displayable(&self) -> bool {
        !self.title.trim().is_empty() && present(&self.poster).is_some()
    }

    pub fn rating_badge(&self) -> Option<&str> {
        present(&self.imdb_rating)
    }
}

fn present(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == NOT_AVAILABLE {
        None
    } else {
        Some(value)
    }
}

pub fn imdb_url(identifier: &str) -> String {
    format!("{IMDB_TITLE_BASE}/{}", urlencoding::encode(identifier))
}

impl OmdbClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let user_agent = format!("cineflex/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build OMDb HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.omdb_api_key.clone(),
            config.omdb_base_url.clone(),
            config.omdb_timeout,
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, query: &[(&str, &str)]) -> Result<T> {
        let res = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("request failed")?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("OMDb returned {} -> {}", status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl OmdbApi for OmdbClient {
    async fn fetch_detail(&self, identifier: &str) -> Result<MovieDetail> {
        self.get_json(&[("i", identifier), ("apikey", self.api_key.as_str())])
            .await
            .with_context(|| format!("OMDb lookup for {identifier}"))
    }
}
