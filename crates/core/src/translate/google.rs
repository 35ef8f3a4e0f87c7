use crate::config::{ConfigError, ServiceConfig, DEFAULT_DEST_LANG, DEFAULT_REFERER};
use crate::lang;
use crate::translate::rpc;
use crate::translate::{DetectionResult, TranslateError, TranslationResult, Translator};
use futures::future::BoxFuture;
use futures::FutureExt;
use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;
use url::Url;

/// Client for the Google Translate web RPC.
#[derive(Clone)]
pub struct GoogleTranslator {
    client: Client,
    service_urls: Vec<String>,
}

impl GoogleTranslator {
    pub fn new(config: ServiceConfig) -> Result<Self, TranslateError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            service_urls: config.effective_service_urls(),
        })
    }

    fn pick_service_url(&self) -> Option<&str> {
        match self.service_urls.as_slice() {
            [only] => Some(only.as_str()),
            hosts => hosts.choose(&mut rand::rng()).map(String::as_str),
        }
    }

    async fn send_rpc(&self, text: &str, dest: &str, src: &str) -> Result<String, TranslateError> {
        let service_url = self
            .pick_service_url()
            .ok_or(TranslateError::Config(ConfigError::NoServiceUrls))?;
        let url = endpoint(service_url)?;
        let f_req = rpc::build_request(text, dest, src)?;

        tracing::debug!(%url, src, dest, "sending translate rpc");

        let response = self
            .client
            .post(url)
            .query(&rpc::query_params())
            .form(&[("f.req", f_req)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = status.as_u16(), "translate rpc rejected");
            return Err(TranslateError::HttpStatus(status.as_u16(), error_text));
        }

        Ok(response.text().await?)
    }

    async fn translate_text(
        &self,
        text: String,
        dest: String,
        src: String,
    ) -> Result<TranslationResult, TranslateError> {
        let src = lang::normalize_source(&src).ok_or(TranslateError::InvalidSourceLang(src))?;
        let dest = lang::normalize(&dest).ok_or(TranslateError::InvalidDestLang(dest))?;

        let body = self.send_rpc(&text, &dest, &src).await?;
        let payload = rpc::extract_payload(&body).ok_or_else(|| {
            tracing::error!(len = body.len(), "rpc payload not found in response");
            TranslateError::InvalidResponse(format!("no {} chunk in response", rpc::RPC_ID))
        })?;

        let result = rpc::parse_translation(&payload, &text, &dest, &src)?;
        tracing::debug!(
            src = %result.src,
            dest = %result.dest,
            parts = result.parts.len(),
            "translated"
        );
        Ok(result)
    }
}

/// `service_url` is a bare host (served over https) or a base url with a scheme.
fn endpoint(service_url: &str) -> Result<Url, TranslateError> {
    let base = if service_url.contains("://") {
        service_url.trim_end_matches('/').to_owned()
    } else {
        format!("https://{service_url}")
    };
    Ok(Url::parse(&format!("{base}{}", rpc::TRANSLATE_RPC_PATH))?)
}

impl Translator for GoogleTranslator {
    fn detect(&self, text: String) -> BoxFuture<'_, Result<DetectionResult, TranslateError>> {
        async move {
            let translated = self
                .translate_text(text, DEFAULT_DEST_LANG.to_owned(), lang::AUTO.to_owned())
                .await?;
            Ok(DetectionResult {
                lang: translated.src,
                confidence: None,
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
        self.translate_text(text, dest, src).boxed()
    }
}
