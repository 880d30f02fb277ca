pub mod app;
pub mod config;
pub mod encora;
pub mod error;
pub mod guid;
pub mod matching;
pub mod metadata;
pub mod models;
pub mod nfo;
pub mod provider;
pub mod recordings;
pub mod stagemedia;
