//! Opero - business automation backend
//!
//! Serves the REST API, or talks to the rule-based assistant from the terminal.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use opero::agent::{TaskRequest, UserId};
use opero::{Config, Opero};

#[cfg(feature = "server")]
use opero::server::run_server;

/// Opero - contacts, a rule-based assistant and task templates
#[derive(Parser)]
#[command(
    name = "opero",
    author,
    version,
    about = "Business automation backend with a rule-based assistant",
    long_about = r#"
Opero keeps an in-memory contact list and answers chat messages with a
keyword-driven assistant that can also draft emails, plan meetings and
produce reports.

Examples:
  opero                          Start the interactive chat console
  opero server                   Start the HTTP API on 127.0.0.1:8000
  opero server --port 9000       Start the API on a custom port
  opero task email_draft -p recipient=Bob -p purpose=renewal
  opero info
"#
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// User ID to chat as
    #[arg(short, long, global = true, default_value = "1")]
    user: UserId,

    /// Start with an empty contact list instead of the demo data
    #[arg(long, global = true)]
    no_seed: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat console (default)
    #[command(alias = "console", alias = "repl")]
    Chat,

    /// Start the HTTP API server
    #[command(alias = "serve")]
    Server(ServerArgs),

    /// Run a single task and print the result as JSON
    #[command(alias = "run")]
    Task(TaskArgs),

    /// Display version and build information
    Info,
}

#[derive(Args)]
struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, env = "OPERO_PORT", default_value_t = opero::DEFAULT_PORT)]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, env = "OPERO_HOST", default_value = opero::DEFAULT_HOST)]
    host: String,
}

#[derive(Args)]
struct TaskArgs {
    /// Task type, e.g. email_draft or report_generation
    task_type: String,

    /// Task parameter as key=value, repeatable
    #[arg(short, long = "param")]
    params: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only when RUST_LOG is set)
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let cli = Cli::parse();

    if let Some(Commands::Info) = &cli.command {
        println!("Opero - business automation backend");
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Features:");
        #[cfg(feature = "server")]
        println!("  - HTTP server (axum)");
        #[cfg(not(feature = "server"))]
        println!("  - HTTP server: disabled");
        println!();
        println!("Assistant capabilities: {}", opero::agent::CAPABILITIES.join(", "));
        println!("Task types: {}", opero::agent::TaskKind::ALL.map(|k| k.as_str()).join(", "));
        return Ok(());
    }

    let mut config = Config {
        seed_demo_data: !cli.no_seed,
        ..Default::default()
    };

    match cli.command {
        None | Some(Commands::Chat) => {
            let opero = Opero::new(config);
            opero::cli::console::run(opero, cli.user).await?;
        }

        Some(Commands::Server(args)) => {
            config.host = args.host;
            config.port = args.port;
            #[cfg(feature = "server")]
            {
                println!("Starting Opero server on {}:{}", config.host, config.port);
                run_server(Opero::new(config)).await?;
            }
            #[cfg(not(feature = "server"))]
            {
                let _ = config;
                eprintln!("Error: Server feature not enabled.");
                eprintln!("Rebuild with: cargo build --features server");
                std::process::exit(1);
            }
        }

        Some(Commands::Task(args)) => {
            let params = match opero::cli::parse_params(&args.params) {
                Ok(params) => params,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            };
            let opero = Opero::new(config);
            let response = opero.agent().execute_task(&TaskRequest::new(args.task_type, params));
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.status == opero::agent::TaskStatus::Error {
                std::process::exit(1);
            }
        }

        Some(Commands::Info) => {
            // Handled early
            unreachable!()
        }
    }

    Ok(())
}
