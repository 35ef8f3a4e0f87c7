//! Request encoding and response decoding for the translate web RPC
//! (`batchexecute`).
//!
//! Responses are a stream of length-prefixed JSON chunks. The chunk that
//! carries our RPC id holds the real payload as a JSON *string* at
//! `[0][2]`, which is decoded a second time.

use crate::lang::AUTO;
use crate::translate::{TranslateError, TranslatedPart, TranslationResult};
use serde_json::{json, Value};

pub const RPC_ID: &str = "MkEWBc";
pub const BUILD_LABEL: &str = "boq_translate-webserver_20201207.13_p0";
pub const TRANSLATE_RPC_PATH: &str = "/_/TranslateWebserverUi/data/batchexecute";

/// Only this many leading characters of a line are searched for the RPC id.
const MARKER_WINDOW: usize = 30;

/// Builds the `f.req` form value.
pub fn build_request(text: &str, dest: &str, src: &str) -> Result<String, serde_json::Error> {
    let inner = serde_json::to_string(&json!([[text, src, dest, true], [null]]))?;
    serde_json::to_string(&json!([[[RPC_ID, inner, null, "generic"]]]))
}

pub fn query_params() -> [(&'static str, &'static str); 6] {
    [
        ("rpcids", RPC_ID),
        ("bl", BUILD_LABEL),
        ("soc-app", "1"),
        ("soc-platform", "1"),
        ("soc-device", "1"),
        ("rt", "c"),
    ]
}

/// Collects the lines of the chunk carrying [`RPC_ID`], stopping once its
/// brackets balance. Brackets inside string literals are not counted.
///
/// Returns `None` if no line mentions the RPC id.
pub fn extract_payload(body: &str) -> Option<String> {
    let marker = format!("\"{RPC_ID}\"");
    let mut found = false;
    let (mut opened, mut closed) = (0usize, 0usize);
    let mut payload = String::new();

    for line in body.split('\n') {
        if !found {
            let head: String = line.chars().take(MARKER_WINDOW).collect();
            found = head.contains(&marker);
        }
        if !found {
            continue;
        }

        let mut in_string = false;
        let mut prev = None;
        for ch in line.chars() {
            if ch == '"' && prev != Some('\\') {
                in_string = !in_string;
            }
            if !in_string {
                match ch {
                    '[' => opened += 1,
                    ']' => closed += 1,
                    _ => {}
                }
            }
            prev = Some(ch);
        }

        payload.push_str(line);
        if opened == closed {
            break;
        }
    }

    found.then_some(payload)
}

/// Decodes the extracted chunk into a [`TranslationResult`].
///
/// `src` is the (normalized) requested source language; when it is `auto`
/// the detected language reported by the backend replaces it.
pub fn parse_translation(
    payload: &str,
    origin: &str,
    dest: &str,
    src: &str,
) -> Result<TranslationResult, TranslateError> {
    let envelope: Value = serde_json::from_str(payload)?;
    let inner = envelope
        .get(0)
        .and_then(|v| v.get(2))
        .and_then(Value::as_str)
        .ok_or_else(|| TranslateError::InvalidResponse("rpc envelope has no payload".into()))?;
    let parsed: Value = serde_json::from_str(inner)?;

    let translation = parsed
        .get(1)
        .and_then(|v| v.get(0))
        .and_then(|v| v.get(0))
        .ok_or_else(|| TranslateError::InvalidResponse("missing translation block".into()))?;

    let parts: Vec<TranslatedPart> = translation
        .get(5)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::InvalidResponse("missing translated parts".into()))?
        .iter()
        .map(parse_part)
        .collect();

    let joiner = if translation.get(3).is_some_and(is_truthy) {
        " "
    } else {
        ""
    };
    let text = parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(joiner);

    let src = if src == AUTO {
        parsed
            .get(2)
            .and_then(Value::as_str)
            .or_else(|| parsed.get(0).and_then(|v| v.get(2)).and_then(Value::as_str))
            .unwrap_or(AUTO)
            .to_owned()
    } else {
        src.to_owned()
    };

    Ok(TranslationResult {
        src,
        dest: dest.to_owned(),
        origin: origin.to_owned(),
        text,
        pronunciation: string_at(translation, 1),
        origin_pronunciation: parsed.get(0).and_then(|v| string_at(v, 0)),
        parts,
    })
}

fn parse_part(part: &Value) -> TranslatedPart {
    TranslatedPart {
        text: string_at(part, 0).unwrap_or_default(),
        candidates: part
            .get(1)
            .and_then(Value::as_array)
            .map(|c| c.iter().filter_map(Value::as_str).map(str::to_owned).collect())
            .unwrap_or_default(),
    }
}

fn string_at(value: &Value, index: usize) -> Option<String> {
    value.get(index).and_then(Value::as_str).map(str::to_owned)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::RPC_ID;
    use serde_json::{json, Value};

    /// A `batchexecute` body wrapping `parsed` the way the service frames it.
    pub(crate) fn response_body(parsed: &Value) -> String {
        let chunk = json!([
            ["wrb.fr", RPC_ID, parsed.to_string(), null, null, null, "generic"],
            ["di", 38],
            ["af.httprm", 37, "-4371403245862497034", 12]
        ])
        .to_string();
        format!(
            ")]}}'\n\n{}\n{}\n57\n[[\"e\",4,null,null,{}]]\n",
            chunk.len(),
            chunk,
            chunk.len() + 57
        )
    }

    /// `hola` translated from auto-detected Spanish to English.
    pub(crate) fn hola_parsed() -> Value {
        json!([
            ["hola", null, "es", [[[0, [[[null, 4]], [true]]]], 4], [["hola", null, null, 4]]],
            [
                [[null, "hola", null, true, null, [["hello", ["hello", "hi"]]]]],
                "en",
                1,
                "es",
                ["hola", "es", "en", true]
            ],
            "es",
            ["hola", "es", "en", true]
        ])
    }
}
