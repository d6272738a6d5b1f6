use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use job_api_suite::{
    client::JobsClient,
    config::Config,
    logging,
    stub,
    suite::{FixtureMode, Suite},
};

/// Exit status for configuration and startup problems
const EXIT_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "job-api-suite", version, about = "Conformance checks for a /api/jobs REST service")]
struct Cli {
    /// Directory for rolling log files [env: LOG_DIR]
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the cases against a server (default)
    Run(RunArgs),
    /// List case names in run order
    List,
    /// Serve the in-memory stub API with the baseline jobs seeded
    Stub(StubArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Base URL of the service [env: JOBS_API_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds [env: REQUEST_TIMEOUT_SECS]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Run only this case; repeat to select several
    #[arg(long = "only", value_name = "CASE")]
    only: Vec<String>,

    /// Do not seed or clean up jobs; assume the server already holds them
    #[arg(long)]
    no_fixtures: bool,
}

#[derive(Args, Debug)]
struct StubArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::List => {
            for case in Suite::new().cases() {
                println!("{:<22} {}", case.name, case.description);
            }
            ExitCode::SUCCESS
        }
        Command::Run(args) => {
            let config = match load_config(args.base_url.as_deref(), args.timeout_secs, cli.log_dir) {
                Ok(config) => config,
                Err(code) => return code,
            };
            run(config, args).await
        }
        Command::Stub(args) => {
            if load_config(None, None, cli.log_dir).is_err() {
                return ExitCode::from(EXIT_CONFIG);
            }
            match stub::serve(&args.host, args.port).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Stub server failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Load configuration and start logging
fn load_config(base_url: Option<&str>, timeout_secs: Option<u64>, log_dir: Option<PathBuf>) -> Result<Config, ExitCode> {
    let config = Config::from_env()
        .and_then(|config| config.with_overrides(base_url, timeout_secs, log_dir))
        .map_err(|e| {
            eprintln!("Failed to load configuration: {}", e);
            ExitCode::from(EXIT_CONFIG)
        })?;

    logging::init(&config.log_dir).map_err(|e| {
        eprintln!("Failed to initialize logging in {}: {}", config.log_dir.display(), e);
        ExitCode::from(EXIT_CONFIG)
    })?;

    Ok(config)
}

async fn run(config: Config, args: RunArgs) -> ExitCode {
    let suite = match Suite::new().filtered(&args.only) {
        Ok(suite) => suite,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let client = match JobsClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    info!("Configuration loaded successfully:");
    info!("  - Base URL: {}", config.base_url);
    info!("  - Request timeout: {:?}", config.request_timeout);
    info!("  - Log directory: {}", config.log_dir.display());

    let mode = if args.no_fixtures {
        FixtureMode::Ambient
    } else {
        FixtureMode::Managed
    };
    let report = suite.run(&client, mode).await;

    for outcome in report.failures() {
        if let Err(failure) = &outcome.result {
            error!("{} ({}): {}", outcome.name, outcome.description, failure);
        }
    }

    if report.is_success() {
        info!("All {} cases passed", report.passed());
        ExitCode::SUCCESS
    } else {
        error!("{} of {} cases failed", report.failed(), report.outcomes.len());
        ExitCode::FAILURE
    }
}
