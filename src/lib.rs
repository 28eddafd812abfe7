pub mod app;
pub mod card;
pub mod config;
pub mod dataset;
pub mod omdb;
pub mod render;
pub mod search;
