mod script;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use card_codec::{DecodeError, decode, object_focus_of};
use clap::{Parser, Subcommand};
use core_types::{EditorMode, ModeState, ObjectId};
use location::{LocationDescriptor, LocationError, parse_question_path, resolve_mode};
use nav_core::{CommitRequest, ConfigError, DocumentStore, HistorySink, NavConfig};
use navigator::{MemoryDocumentStore, Navigator};
use runtime_history::MemoryHistory;
use script::{Script, Step};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

type Session = Navigator<MemoryHistory, MemoryDocumentStore>;

#[derive(Debug, Parser)]
#[command(name = "qbnav", version, about = "Query-builder navigation sessions, offline")]
struct Cli {
    /// Navigation config (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a scripted session and print the history it produces.
    Replay { script: PathBuf },
    /// Show the card, mode and focus a question URL resolves to.
    Inspect { url: String },
}

#[derive(Debug, Error)]
enum ReplayError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid script {}: {source}", path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("cannot print document: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("qbnav: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ReplayError> {
    let config = match &cli.config {
        Some(path) => NavConfig::from_toml_str(&read(path)?)?,
        None => NavConfig::default(),
    };

    match cli.command {
        Command::Replay { script } => {
            let parsed = Script::from_toml_str(&read(&script)?).map_err(|source| ReplayError::Script {
                path: script.clone(),
                source,
            })?;
            replay(parsed, config)
        }
        Command::Inspect { url } => inspect(&url, &config),
    }
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn replay(script: Script, config: NavConfig) -> Result<(), ReplayError> {
    let store = script
        .saved
        .into_iter()
        .fold(MemoryDocumentStore::new(), MemoryDocumentStore::with_saved);
    let start = LocationDescriptor::parse(&script.start)?;

    let mut nav = Navigator::new(MemoryHistory::new(start), store, config);
    nav.start();
    print_step(0, "start", &nav);

    for (i, step) in script.steps.into_iter().enumerate() {
        let label = apply(&mut nav, step)?;
        print_step(i + 1, label, &nav);
    }

    println!();
    println!("history:");
    let history = nav.history();
    for (i, entry) in history.entries().iter().enumerate() {
        let marker = if i == history.index() { '*' } else { ' ' };
        println!("  {marker} {entry}");
    }

    let store = nav.store();
    println!("document: {}", serde_json::to_string(store.current())?);
    println!("mode:     {}", describe_mode(store.mode()));
    if let Some(focus) = store.focus() {
        println!("focus:    {focus}");
    }
    Ok(())
}

fn commit_request(nav: &Session) -> CommitRequest {
    CommitRequest::new().focus(nav.store().focus().cloned())
}

fn apply(nav: &mut Session, step: Step) -> Result<&'static str, ReplayError> {
    let label = match step {
        Step::Load { url } => {
            nav.history_mut().redirect(LocationDescriptor::parse(&url)?);
            nav.pump();
            "load"
        }
        Step::Link { url } => {
            nav.history_mut().follow_link(LocationDescriptor::parse(&url)?);
            nav.pump();
            "link"
        }
        Step::Edit {
            dataset_query,
            name,
            parameters,
        } => {
            let mut document = nav.store().current().clone();
            document.dataset_query = dataset_query;
            if let Some(name) = name {
                document.name = Some(name);
            }
            if let Some(parameters) = parameters {
                document.parameters = parameters;
            }
            nav.store_mut().edit(document);
            let request = commit_request(nav);
            nav.commit(request);
            "edit"
        }
        Step::Save => {
            let saved = nav.store_mut().save();
            log::info!(target: "qbnav.replay", "saved card {:?}", saved.id);
            let request = commit_request(nav);
            nav.commit(request);
            "save"
        }
        Step::Commit { replace, dirty } => {
            let mut request = commit_request(nav);
            request.replace = replace;
            request.dirty = dirty;
            nav.commit(request);
            "commit"
        }
        Step::Mode { mode, tab } => {
            let state = ModeState::new(mode, tab.unwrap_or_default());
            nav.store_mut().set_mode(state);
            let mut request = commit_request(nav).mode(mode);
            request.tab = tab;
            nav.commit(request);
            "mode"
        }
        Step::Focus { object_id } => {
            nav.store_mut().set_focus(object_id.map(ObjectId::new));
            let request = commit_request(nav);
            nav.commit(request);
            "focus"
        }
        Step::Back => {
            if !nav.history_mut().back() {
                log::warn!(target: "qbnav.replay", "back: already at the oldest entry");
            }
            nav.pump();
            "back"
        }
        Step::Forward => {
            if !nav.history_mut().forward() {
                log::warn!(target: "qbnav.replay", "forward: already at the newest entry");
            }
            nav.pump();
            "forward"
        }
    };
    Ok(label)
}

fn print_step(index: usize, label: &str, nav: &Session) {
    let history = nav.history();
    println!(
        "{index:>3} {label:<8} [{}/{}] {}",
        history.index() + 1,
        history.entries().len(),
        history.current_location()
    );
}

fn describe_mode(mode: ModeState) -> String {
    match mode.mode {
        EditorMode::DatasetEdit => format!("{:?} ({:?})", mode.mode, mode.tab),
        other => format!("{other:?}"),
    }
}

fn inspect(url: &str, config: &NavConfig) -> Result<(), ReplayError> {
    let location = LocationDescriptor::parse(url)?;
    let parsed = parse_question_path(&config.base_path, &location.path);

    println!("path:     {}", location.path);
    match parsed.as_ref().and_then(|p| p.card_id) {
        Some(id) => println!("card:     {id}"),
        None if parsed.is_some() => println!("card:     (new)"),
        None => println!("card:     (outside {})", config.base_path),
    }
    println!("mode:     {}", describe_mode(resolve_mode(&location)));
    if let Some(focus) = object_focus_of(&location, &config.base_path) {
        println!("focus:    {focus}");
    }
    if location.has_hash() {
        let document = decode(&location.hash)?;
        println!("document: {}", serde_json::to_string_pretty(&document)?);
    }
    Ok(())
}
