use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uitree_core::{ComponentCategory, ComponentRegistry, TreeValidator};
use uitree_store::FileStateStore;
use uitree_tools::{ui_changed_notification, McpServer, ServiceConfig, UiToolService};

fn cli() -> Command {
    Command::new("uitree")
        .version(uitree_tools::VERSION)
        .about("Agent-driven UI tree editing over MCP")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding per-user state"),
        )
        .subcommand(Command::new("serve").about("Serve JSON-RPC over stdio, one request per line"))
        .subcommand(Command::new("init").about("Create default state for the seed users"))
        .subcommand(
            Command::new("validate")
                .about("Validate a UI tree JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding the tree"),
                ),
        )
        .subcommand(
            Command::new("components")
                .about("List registered components")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_parser(["layout", "input", "display", "todo"])
                        .help("Only list one category"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<ServiceConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    let mut config = config.apply_env()?;
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

fn build_service(config: ServiceConfig) -> UiToolService {
    let store = FileStateStore::new(&config.data_dir).with_max_history(config.max_history);
    UiToolService::with_default_registry(Arc::new(store), config)
}

async fn write_line(stdout: &Mutex<Stdout>, value: &serde_json::Value) -> Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    let mut out = stdout.lock().await;
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}

async fn serve(service: UiToolService) -> Result<()> {
    service.seed().await?;

    let stdout = Arc::new(Mutex::new(tokio::io::stdout()));
    let mut events = service.subscribe();
    let forward = {
        let stdout = Arc::clone(&stdout);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let Err(e) = write_line(&stdout, &ui_changed_notification(&event)).await {
                            warn!(error = %e, "failed to forward ui/changed");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "ui/changed notifications dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    };

    let server = McpServer::new(service);
    info!(data_dir = %server.service().config().data_dir.display(), "serving on stdio");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(response) = server.handle_line(&line).await {
            write_line(&stdout, &response).await?;
        }
    }

    info!("stdin closed, shutting down");
    forward.abort();
    Ok(())
}

async fn init(service: UiToolService) -> Result<()> {
    for state in service.seed().await? {
        println!("{} (version {})", state.user_id, state.version);
    }
    Ok(())
}

fn validate(file: &Path) -> Result<bool> {
    let text =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let tree: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;

    let registry = ComponentRegistry::with_defaults();
    let report = TreeValidator::new(&registry).validate(&tree);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.valid)
}

fn components(category: Option<&String>) -> Result<()> {
    let registry = ComponentRegistry::with_defaults();
    let listed = match category {
        Some(name) => registry.by_category(name.parse::<ComponentCategory>()?),
        None => registry.all(),
    };
    println!("{}", serde_json::to_string_pretty(&json!({ "components": listed }))?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("serve", _)) => serve(build_service(config)).await,
        Some(("init", _)) => init(build_service(config)).await,
        Some(("validate", args)) => {
            let file = args
                .get_one::<PathBuf>("file")
                .context("missing FILE argument")?;
            if !validate(file)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(("components", args)) => components(args.get_one::<String>("category")),
        _ => unreachable!("subcommand_required"),
    }
}
