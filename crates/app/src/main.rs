use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{QuestionProvider, QuizFlowService, TriviaApi, TriviaApiConfig};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiBase { raw: String },
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiBase { raw } => write!(f, "invalid --api-base value: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout-secs value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    quiz_flow: Arc<QuizFlowService>,
    provider: Arc<dyn QuestionProvider>,
}

impl UiApp for DesktopApp {
    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }

    fn provider(&self) -> Arc<dyn QuestionProvider> {
        Arc::clone(&self.provider)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-base <url>] [--timeout-secs <secs>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-base {}", TriviaApiConfig::DEFAULT_BASE_URL);
    eprintln!("  --timeout-secs 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_API_URL, TRIVIA_API_TIMEOUT_SECS");
}

fn parse_args(args: &mut impl Iterator<Item = String>) -> Result<TriviaApiConfig, ArgsError> {
    // Flags override the environment, which overrides the built-in defaults.
    let mut config = TriviaApiConfig::from_env();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api-base" => {
                let value = require_value(args, "--api-base")?;
                let trimmed = value.trim();
                if trimmed.is_empty() || !trimmed.starts_with("http") {
                    return Err(ArgsError::InvalidApiBase { raw: value });
                }
                config.base_url = trimmed.trim_end_matches('/').to_string();
            }
            "--timeout-secs" => {
                let value = require_value(args, "--timeout-secs")?;
                let secs: u64 = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidTimeout { raw: value.clone() })?;
                if secs == 0 {
                    return Err(ArgsError::InvalidTimeout { raw: value });
                }
                config.timeout = Duration::from_secs(secs);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(config)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = parse_args(&mut args).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let provider: Arc<dyn QuestionProvider> = Arc::new(TriviaApi::new(&config)?);
    let quiz_flow = Arc::new(QuizFlowService::new(Arc::clone(&provider)));

    let app = DesktopApp {
        quiz_flow,
        provider,
    };
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    // Explicitly disable always-on-top; some dev setups default to it.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Udacitrivia")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
