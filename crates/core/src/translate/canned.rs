use crate::lang::AUTO;
use crate::translate::{
    DetectionResult, TranslateError, TranslatedPart, TranslationResult, Translator,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CannedCall {
    Detect {
        text: String,
    },
    Translate {
        text: String,
        dest: String,
        src: String,
    },
}

/// In-memory backend that answers every request with preconfigured values
/// and records what it was asked.
#[derive(Clone)]
pub struct CannedTranslator {
    detected_lang: String,
    confidence: Option<f64>,
    source_lang: String,
    translated: Option<String>,
    pronunciation: Option<String>,
    failure: Option<(u16, String)>,
    calls: Arc<Mutex<Vec<CannedCall>>>,
}

impl CannedTranslator {
    pub fn new() -> Self {
        Self {
            detected_lang: "en".to_owned(),
            confidence: Some(1.0),
            source_lang: "en".to_owned(),
            translated: None,
            pronunciation: None,
            failure: None,
            calls: Arc::default(),
        }
    }

    pub fn with_detection(mut self, lang: &str, confidence: Option<f64>) -> Self {
        self.detected_lang = lang.to_owned();
        self.confidence = confidence;
        self
    }

    /// `source_lang` is reported whenever the caller asks for `auto`.
    /// Without a translation the input text is echoed back.
    pub fn with_translation(
        mut self,
        source_lang: &str,
        translated: &str,
        pronunciation: Option<&str>,
    ) -> Self {
        self.source_lang = source_lang.to_owned();
        self.translated = Some(translated.to_owned());
        self.pronunciation = pronunciation.map(str::to_owned);
        self
    }

    /// Every request fails as if the service answered with `status`.
    pub fn with_failure(mut self, status: u16, body: &str) -> Self {
        self.failure = Some((status, body.to_owned()));
        self
    }

    pub fn calls(&self) -> Vec<CannedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: CannedCall) -> Result<(), TranslateError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match &self.failure {
            Some((status, body)) => Err(TranslateError::HttpStatus(*status, body.clone())),
            None => Ok(()),
        }
    }
}

impl Default for CannedTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for CannedTranslator {
    fn detect(&self, text: String) -> BoxFuture<'_, Result<DetectionResult, TranslateError>> {
        async move {
            self.record(CannedCall::Detect { text })?;
            Ok(DetectionResult {
                lang: self.detected_lang.clone(),
                confidence: self.confidence,
            })
        }
        .boxed()
    }

    fn translate(
        &self,
        text: String,
        dest: String,
        src: String,
    ) -> BoxFuture<'_, Result<TranslationResult, TranslateError>> {
        async move {
            self.record(CannedCall::Translate {
                text: text.clone(),
                dest: dest.clone(),
                src: src.clone(),
            })?;

            let translated = self.translated.clone().unwrap_or_else(|| text.clone());
            let src = if src == AUTO {
                self.source_lang.clone()
            } else {
                src
            };

            Ok(TranslationResult {
                src,
                dest,
                origin: text,
                parts: vec![TranslatedPart {
                    text: translated.clone(),
                    candidates: Vec::new(),
                }],
                text: translated,
                pronunciation: self.pronunciation.clone(),
                origin_pronunciation: None,
            })
        }
        .boxed()
    }
}
