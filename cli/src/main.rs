//! CLI entrypoint for toolbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use toolbridge_application::{
    InvokeToolUseCase, MutationObserver, NavigationScheduler, ScanPageUseCase, ToolRegistrar,
    ToolSchemaPort, ToolStorePort,
};
use toolbridge_domain::config::ConfigIssue;
use toolbridge_domain::tool::entities::{ToolCall, ToolDefinition};
use toolbridge_infrastructure::{
    ConfigLoader, DocumentWatcher, FileConfig, HttpPageHost, InMemoryToolStore,
    JsonSchemaToolConverter, ScraperDocumentParser,
};
use toolbridge_presentation::{Cli, Command, ConsoleFormatter, OutputFormat, parse_arguments};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Every layer wired for one page.
struct Bridge {
    host: Arc<HttpPageHost>,
    parser: Arc<ScraperDocumentParser>,
    store: Arc<InMemoryToolStore>,
    schema: Arc<JsonSchemaToolConverter>,
    registrar: Arc<ToolRegistrar>,
    scan: ScanPageUseCase,
    invoke: InvokeToolUseCase,
}

impl Bridge {
    fn connect(url: Url, config: &FileConfig) -> Result<Self> {
        let settings = config.to_bridge_settings();

        // === Dependency Injection ===
        let host = Arc::new(HttpPageHost::new(url, &config.http)?);
        let parser = Arc::new(ScraperDocumentParser::new());
        let store = Arc::new(InMemoryToolStore::new());
        let schema = Arc::new(JsonSchemaToolConverter);

        let registrar = Arc::new(
            ToolRegistrar::builder()
                .store(store.clone())
                .schema(schema.clone())
                .frames(host.clone())
                .fetch(host.clone())
                .navigator(host.clone())
                .parser(parser.clone())
                .settings(settings.clone())
                .build()?,
        );
        let scheduler = Arc::new(NavigationScheduler::new(host.clone(), settings.settle_delay));

        Ok(Self {
            scan: ScanPageUseCase::new(host.clone(), parser.clone(), registrar.clone()),
            invoke: InvokeToolUseCase::new(store.clone(), scheduler),
            host,
            parser,
            store,
            schema,
            registrar,
        })
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        self.store.list().into_iter().map(|t| t.definition).collect()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keeps the file writer flushing until exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    let issues = config.validate();
    if !issues.is_empty() {
        eprint!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Configuration has errors; fix them or run with --no-config");
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run with --help for usage.");
    };

    info!("Starting toolbridge on {}", command.url());
    let bridge = Bridge::connect(command.url().clone(), &config)?;
    bridge
        .scan
        .execute()
        .await
        .with_context(|| format!("Failed to scan {}", command.url()))?;

    match command {
        Command::List { url } => {
            let tools = bridge.definitions();
            match cli.output {
                OutputFormat::Text => {
                    print!("{}", ConsoleFormatter::format_tools(url.as_str(), &tools))
                }
                OutputFormat::Json => {
                    let schemas = Value::from(bridge.schema.all_tools_schema(&tools));
                    println!("{}", ConsoleFormatter::format_json(&schemas));
                }
            }
        }

        Command::Schema { tool, .. } => {
            let schema = match tool {
                Some(name) => {
                    let Some(found) = bridge.store.get(&name) else {
                        bail!("Tool '{}' not found", name);
                    };
                    bridge.schema.tool_to_schema(&found.definition)
                }
                None => Value::from(bridge.schema.all_tools_schema(&bridge.definitions())),
            };
            println!("{}", ConsoleFormatter::format_json(&schema));
        }

        Command::Invoke { tool, args, json, .. } => {
            let schema = bridge
                .store
                .get(&tool)
                .map(|t| t.definition.input_schema)
                .unwrap_or_default();
            let arguments = parse_arguments(&schema, &args, json.as_deref())?;
            let call = ToolCall::new(tool.clone()).with_arguments(Value::Object(arguments));

            let invocation = bridge.invoke.execute(call).await;
            match cli.output {
                OutputFormat::Text => {
                    print!("{}", ConsoleFormatter::format_result(&tool, invocation.result()))
                }
                OutputFormat::Json => println!(
                    "{}",
                    ConsoleFormatter::format_json(&serde_json::to_value(invocation.result())?)
                ),
            }
            let failed = invocation.is_error();

            // Printed first; only then may the page redirect or reload
            drop(invocation);
            bridge.invoke.settle().await;

            if failed {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Watch { url } => {
            watch(&bridge, &url, &config).await?;
            print!("{}", ConsoleFormatter::format_tools(url.as_str(), &bridge.definitions()));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Register tools inserted into the page until Ctrl-C.
async fn watch(bridge: &Bridge, url: &Url, config: &FileConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();

    let observer = MutationObserver::new(bridge.parser.clone(), bridge.registrar.clone());
    let observing = tokio::spawn({
        let cancel = cancel.clone();
        async move { observer.run(rx, cancel).await }
    });

    let watcher = DocumentWatcher::new(bridge.host.clone(), config.watch.interval());
    info!(
        "Watching {} every {}s (Ctrl-C to stop)",
        url,
        config.watch.interval().as_secs()
    );

    tokio::select! {
        result = watcher.run(bridge.host.subscribe(), tx, cancel.clone()) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    cancel.cancel();
    let registered = observing.await?;
    info!("Registered {} inserted tools", registered);
    Ok(())
}

/// Initialize logging based on verbosity level.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let Some(path) = log_file else {
        subscriber.with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    subscriber.with_writer(writer).with_ansi(false).init();
    Ok(Some(guard))
}
