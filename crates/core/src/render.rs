//! Plain-text output for the two modes.

use crate::translate::{DetectionResult, TranslationResult};

/// `[<lang>, <confidence>] <text>`; an unknown confidence prints as `n/a`.
/// Whole-number confidences keep their fractional part (`1.0`).
pub fn detection(result: &DetectionResult, text: &str) -> String {
    match result.confidence {
        Some(confidence) => format!("[{}, {:?}] {}", result.lang, confidence, text),
        None => format!("[{}, n/a] {}", result.lang, text),
    }
}

pub fn translation(result: &TranslationResult) -> String {
    format!(
        "[{}] {}\n    ->\n[{}] {}\n[pron.] {}",
        result.src,
        result.origin,
        result.dest,
        result.text,
        result.pronunciation.as_deref().unwrap_or_default()
    )
}
