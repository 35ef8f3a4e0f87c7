#![deny(warnings)]

use anyhow::Context;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use gtrans_core::config::{
    ServiceConfig, DEFAULT_DEST_LANG, DEFAULT_SRC_LANG, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use gtrans_core::render;
use gtrans_core::translate::{GoogleTranslator, Translator};
use std::io::Write;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gtrans")]
#[command(about = "Translate text, or detect its language, with Google Translate")]
struct Args {
    /// Text to translate or to detect the language of
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    text: String,

    /// Destination language (translate mode only)
    #[arg(short, long, default_value = DEFAULT_DEST_LANG)]
    dest: String,

    /// Source language, or `auto` (translate mode only)
    #[arg(short, long, default_value = DEFAULT_SRC_LANG)]
    src: String,

    /// Detect the language instead of translating
    #[arg(short = 'c', long)]
    detect: bool,

    /// Service host (or base url such as `http://localhost:8080`); repeat to
    /// pick randomly among several
    #[arg(long = "service-url")]
    service_urls: Vec<String>,

    /// Use the fallback service host
    #[arg(long)]
    fallback: bool,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let translator = GoogleTranslator::new(service_config(&args))
        .context("failed to set up translation client")?;

    tracing::debug!(
        detect = args.detect,
        dest = %args.dest,
        src = %args.src,
        "request prepared"
    );

    let stdout = std::io::stdout();
    run(&args, &translator, &mut stdout.lock()).await
}

async fn run<T: Translator>(
    args: &Args,
    translator: &T,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let rendered = if args.detect {
        let result = translator
            .detect(args.text.clone())
            .await
            .context("language detection failed")?;
        render::detection(&result, &args.text)
    } else {
        let result = translator
            .translate(args.text.clone(), args.dest.clone(), args.src.clone())
            .await
            .context("translation failed")?;
        render::translation(&result)
    };

    writeln!(out, "{rendered}")?;
    Ok(())
}

fn service_config(args: &Args) -> ServiceConfig {
    let config = ServiceConfig::default()
        .with_user_agent(args.user_agent.as_str())
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_fallback(args.fallback);

    if args.service_urls.is_empty() {
        config
    } else {
        config.with_service_urls(args.service_urls.iter().cloned())
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    // stdout carries only the result
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use gtrans_core::config::{DEFAULT_FALLBACK_SERVICE_URL, DEFAULT_SERVICE_URL};
    use gtrans_core::translate::{CannedCall, CannedTranslator};

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gtrans").chain(argv.iter().copied()))
            .expect("valid args")
    }

    async fn output(argv: &[&str], translator: &CannedTranslator) -> anyhow::Result<String> {
        let args = parse(argv);
        let mut out = Vec::new();
        run(&args, translator, &mut out).await?;
        Ok(String::from_utf8(out).expect("utf-8"))
    }

    #[test]
    fn defaults_are_en_and_auto() {
        let args = parse(&["hola"]);
        assert_eq!(args.text, "hola");
        assert_eq!(args.dest, "en");
        assert_eq!(args.src, "auto");
        assert!(!args.detect);
    }

    #[test]
    fn short_flags() {
        let args = parse(&["-d", "ja", "-s", "fr", "-c", "bonjour"]);
        assert_eq!(args.dest, "ja");
        assert_eq!(args.src, "fr");
        assert!(args.detect);
        assert_eq!(args.text, "bonjour");
    }

    #[test]
    fn long_flags() {
        let args = parse(&["--dest", "de", "--src", "es", "--detect", "hola"]);
        assert_eq!(args.dest, "de");
        assert_eq!(args.src, "es");
        assert!(args.detect);
    }

    #[test]
    fn missing_text_is_a_usage_error() {
        let err = Args::try_parse_from(["gtrans", "-d", "fr"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(Args::try_parse_from(["gtrans", ""]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Args::try_parse_from(["gtrans", "--verbose", "hola"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn service_config_defaults() {
        let config = service_config(&parse(&["hola"]));
        assert_eq!(config.effective_service_urls(), vec![DEFAULT_SERVICE_URL]);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn service_config_overrides() {
        let config = service_config(&parse(&[
            "--service-url",
            "translate.google.de",
            "--service-url",
            "translate.google.fr",
            "--timeout-secs",
            "5",
            "--user-agent",
            "gtrans-test",
            "hola",
        ]));
        assert_eq!(
            config.effective_service_urls(),
            vec!["translate.google.de", "translate.google.fr"]
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "gtrans-test");

        let config = service_config(&parse(&["--fallback", "hola"]));
        assert_eq!(
            config.effective_service_urls(),
            vec![DEFAULT_FALLBACK_SERVICE_URL]
        );
    }

    #[tokio::test]
    async fn detect_mode_output() {
        let canned = CannedTranslator::new().with_detection("fr", Some(0.98));
        let out = output(&["bonjour", "--detect"], &canned).await.expect("runs");
        assert_eq!(out, "[fr, 0.98] bonjour\n");
    }

    #[tokio::test]
    async fn translate_mode_output() {
        let canned = CannedTranslator::new().with_translation("es", "hello", Some("hola"));
        let out = output(&["hola"], &canned).await.expect("runs");
        assert_eq!(out, "[es] hola\n    ->\n[en] hello\n[pron.] hola\n");
    }

    #[tokio::test]
    async fn omitted_options_match_explicit_defaults() {
        let implicit = CannedTranslator::new().with_translation("es", "hello", None);
        let explicit = CannedTranslator::new().with_translation("es", "hello", None);

        let a = output(&["hola"], &implicit).await.expect("runs");
        let b = output(&["--dest", "en", "--src", "auto", "hola"], &explicit)
            .await
            .expect("runs");

        assert_eq!(a, b);
        assert_eq!(implicit.calls(), explicit.calls());
        assert_eq!(
            implicit.calls(),
            vec![CannedCall::Translate {
                text: "hola".into(),
                dest: "en".into(),
                src: "auto".into(),
            }]
        );
    }

    #[tokio::test]
    async fn detect_ignores_dest_and_src() {
        let canned = CannedTranslator::new().with_detection("it", Some(0.5));
        let out = output(&["-c", "-d", "ja", "-s", "de", "ciao"], &canned)
            .await
            .expect("runs");
        assert_eq!(out, "[it, 0.5] ciao\n");
        assert_eq!(
            canned.calls(),
            vec![CannedCall::Detect {
                text: "ciao".into()
            }]
        );
    }

    #[tokio::test]
    async fn backend_error_propagates_without_output() {
        let canned = CannedTranslator::new().with_failure(429, "Too Many Requests");
        let args = parse(&["hola"]);
        let mut out = Vec::new();
        let err = run(&args, &canned, &mut out).await.unwrap_err();
        assert!(out.is_empty());
        assert!(format!("{err:#}").contains("429"));
    }
}
