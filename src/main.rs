use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

use order_insights::execution::{ExecutionEngine, ExecutionOptions, OutputFormat, TracingExecutionObserver};
use order_insights::ingestion::{
    load_orders, CompositeObserver, FileObserver, IngestionObserver, LoadOptions, TracingObserver,
};
use order_insights::queries::QueryRegistry;
use order_insights::IngestionError;

/// Answer aggregate questions about a sales-order CSV file
#[derive(Parser, Debug)]
#[command(name = "order-insights", version)]
struct Cli {
    /// Order file (CSV, first line is a header)
    file: Option<PathBuf>,

    /// Commands to run, in order (see --list). Options must come before the file.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    commands: Vec<String>,

    /// Enable verbose logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Run commands on N worker threads (default: one after another)
    #[arg(short = 'j', long, value_name = "N")]
    jobs: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Append load events to this file as JSON lines
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// List the available commands and exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    debug!("order-insights started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let registry = QueryRegistry::standard();

    if cli.list {
        for query in registry.iter() {
            println!("{:<6} {:<26} {}", query.name(), query.aliases().join(", "), query.description());
        }
        return ExitCode::SUCCESS;
    }

    let Some(file) = cli.file.as_deref() else {
        println!("Usage: order-insights <filename> <command1> <command2> ...");
        return ExitCode::FAILURE;
    };

    let orders = match load_orders(file, &load_options(&cli)) {
        Ok(orders) => orders,
        Err(e) => {
            println!("{}", load_failure_message(file, &e));
            return ExitCode::FAILURE;
        }
    };

    let engine = match ExecutionEngine::new(ExecutionOptions { num_threads: cli.jobs }) {
        Ok(engine) => engine.with_observer(Arc::new(TracingExecutionObserver)),
        Err(e) => {
            error!("Fatal error: {}", e);
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for outcome in engine.run_commands(&registry, &orders, &cli.commands) {
        match outcome.render(cli.format) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                error!(command = %outcome.command, "failed to render outcome: {}", e);
                println!("{}", outcome.message);
            }
        }
    }

    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .init();
}

fn load_options(cli: &Cli) -> LoadOptions {
    let mut observers: Vec<Arc<dyn IngestionObserver>> = vec![Arc::new(TracingObserver)];
    if let Some(path) = cli.log_file.as_ref() {
        observers.push(Arc::new(FileObserver::new(path)));
    }
    LoadOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    }
}

fn load_failure_message(file: &Path, e: &IngestionError) -> String {
    match e {
        IngestionError::Io(_) => format!("Error opening file {}.", file.display()),
        IngestionError::Csv(err) => format!("Error reading file {}: {err}.", file.display()),
        IngestionError::EmptyInput { .. } => "Empty file.".to_string(),
        IngestionError::NoOrders { .. } => "No orders were placed.".to_string(),
    }
}
