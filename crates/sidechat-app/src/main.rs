mod cli;
mod presenter;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use sidechat_ai::history::{new_history_bus, HistoryBus, HistoryWatcher};
use sidechat_ai::{
    FileBackend, GeminiClient, GeminiConfig, HistoryStore, Orchestrator, SearchClient,
    SearchConfig, TurnOutcome,
};
use sidechat_common::{ConfigError, Language, SidechatError};
use sidechat_config::SidechatConfig;
use tokio::sync::broadcast;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::presenter::TerminalPresenter;

/// Load `.env` from the working directory, then from the config directory.
/// Values found first win.
fn load_dotenv() {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("sidechat").join(".env"));
    }
    for path in &candidates {
        sidechat_config::load_dotenv(path);
    }
}

fn load_config(args: &Args) -> (SidechatConfig, Option<ConfigError>) {
    let loaded = match &args.config {
        Some(path) => sidechat_config::load_config_from(path),
        None => sidechat_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => {
            let mut config = SidechatConfig::default();
            sidechat_config::apply_env_overrides(&mut config);
            (config, Some(e))
        }
    }
}

fn init_logging(args: &Args, config: &SidechatConfig) {
    let directive: Directive = args
        .log_level
        .as_deref()
        .and_then(|d| d.parse().ok())
        .or_else(|| config.logging.level.directive().parse().ok())
        .unwrap_or_else(|| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

/// The session's history store, plus a watcher for the same record when
/// it is persisted to disk.
fn build_history(
    args: &Args,
    config: &SidechatConfig,
    bus: &HistoryBus,
) -> (HistoryStore, Option<HistoryWatcher>) {
    let key = args
        .session
        .clone()
        .unwrap_or_else(|| config.chat.session_key.clone());
    let store = HistoryStore::new(key.clone()).with_bus(bus.clone());
    if args.no_persist || !config.chat.persist_history {
        tracing::info!("history persistence disabled");
        return (store, None);
    }
    let Some(dir) = config.chat.resolved_history_dir() else {
        tracing::warn!("no data directory available, history stays in memory");
        return (store, None);
    };
    tracing::info!("history directory: {}", dir.display());
    let backend = Arc::new(FileBackend::new(dir));
    let mut store = store.with_backend(backend.clone());
    // one-shot prompts continue the stored conversation without replaying it
    if args.prompt.is_some() {
        if let Err(e) = store.load() {
            tracing::warn!("failed to load history: {e}");
        }
    }
    (store, Some(HistoryWatcher::new(backend, key)))
}

fn build_orchestrator(
    args: &Args,
    config: &SidechatConfig,
    history: HistoryStore,
) -> Result<Orchestrator, SidechatError> {
    if config.gemini.api_key.is_empty() {
        return Err(SidechatError::MissingCredential(
            sidechat_config::env::GEMINI_API_KEY_VAR,
        ));
    }
    if config.search.api_key.is_empty() || config.search.engine_id.is_empty() {
        tracing::warn!("web search credentials missing, searches will report errors to the model");
    }

    let language = match &args.lang {
        Some(code) => code.parse::<Language>()?,
        None => config.chat.language,
    };

    let client = GeminiClient::new(
        GeminiConfig::new(&config.gemini.api_key)
            .with_model(&config.gemini.model)
            .with_base_url(&config.gemini.base_url),
    );
    tracing::info!(model = client.model(), language = %language, "model client ready");

    let search = SearchClient::new(
        SearchConfig::new(&config.search.api_key, &config.search.engine_id)
            .with_base_url(&config.search.base_url)
            .with_max_results(config.search.max_results as usize),
    );

    Ok(Orchestrator::new(
        Arc::new(client),
        Arc::new(search),
        history,
    )
    .with_language(language)
    .with_presenter(Arc::new(TerminalPresenter)))
}

/// Apply changes other sessions made to this session's record. Own
/// events come back on the same bus and are ignored by the store.
fn spawn_history_mirror(orchestrator: Arc<Orchestrator>, bus: &HistoryBus) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if orchestrator.sync_history(&event) {
                        tracing::info!(
                            origin = %event.origin.short(),
                            turns = event.turns().len(),
                            "history updated by another session"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "history mirror lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    let args = cli::parse();
    let (config, config_error) = load_config(&args);
    init_logging(&args, &config);

    tracing::info!("Sidechat v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    tracing::debug!("config: {}", sidechat_config::config_to_json(&config));

    let bus = new_history_bus();
    let (history, watcher) = build_history(&args, &config, &bus);
    let orchestrator = match build_orchestrator(&args, &config, history) {
        Ok(orchestrator) => Arc::new(orchestrator),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Some(prompt) = &args.prompt {
        return match orchestrator.submit_prompt(prompt, None).await {
            TurnOutcome::Completed(_) => ExitCode::SUCCESS,
            TurnOutcome::Ignored => {
                eprintln!("error: empty prompt");
                ExitCode::from(2)
            }
            TurnOutcome::Rejected | TurnOutcome::Failed(_) => ExitCode::FAILURE,
        };
    }

    match orchestrator.restore_history() {
        Ok(count) => tracing::info!(turns = count, "history restored"),
        Err(e) => tracing::warn!("failed to restore history: {e}"),
    }

    spawn_history_mirror(orchestrator.clone(), &bus);
    if let Some(watcher) = watcher {
        tokio::spawn(async move {
            if let Err(e) = watcher.watch(bus).await {
                tracing::warn!("history watcher stopped: {e}");
            }
        });
    }

    if let Err(e) = repl::run(orchestrator).await {
        tracing::error!("session error: {e}");
        return ExitCode::FAILURE;
    }
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
