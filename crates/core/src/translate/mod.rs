mod canned;
mod google;
pub mod rpc;

use crate::config::ConfigError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use canned::{CannedCall, CannedTranslator};
pub use google::GoogleTranslator;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    pub lang: String,
    /// `None` when the backend does not report one.
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslatedPart {
    pub text: String,
    pub candidates: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationResult {
    pub src: String,
    pub dest: String,
    pub origin: String,
    pub text: String,
    pub pronunciation: Option<String>,
    pub origin_pronunciation: Option<String>,
    pub parts: Vec<TranslatedPart>,
}

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("invalid source language: {0}")]
    InvalidSourceLang(String),

    #[error("invalid destination language: {0}")]
    InvalidDestLang(String),

    #[error("invalid service url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http error {0}: {1}")]
    HttpStatus(u16, String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("invalid client config: {0}")]
    Config(#[from] ConfigError),
}

pub trait Translator: Send + Sync {
    fn detect(&self, text: String) -> BoxFuture<'_, Result<DetectionResult, TranslateError>>;

    fn translate(
        &self,
        text: String,
        dest: String,
        src: String,
    ) -> BoxFuture<'_, Result<TranslationResult, TranslateError>>;
}
