//! `stratus`: command-line access to the Stratus APM traces, OS management
//! and monitoring APIs.
//!
//! Results are printed to stdout as JSON. Exit status is 0 on success, 1 on
//! failure and 2 when a wait gives up at its deadline.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use url::Url;

mod commands;

use commands::Outcome;

/// Stratus cloud command-line client
#[derive(Parser, Debug)]
#[command(name = "stratus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Region whose endpoints are called
    #[arg(long, global = true, env = "STRATUS_REGION", default_value = "us-ashburn-1")]
    region: String,

    /// Base URL overriding the regional endpoint (the API version is appended)
    #[arg(long, global = true, env = "STRATUS_ENDPOINT")]
    endpoint: Option<Url>,

    /// Bearer token sent with every request
    #[arg(long, global = true, env = "STRATUS_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Give up waiting after this many seconds
    #[arg(long, global = true, default_value_t = 1200)]
    max_wait_seconds: u64,

    /// Upper bound on the delay between two status polls
    #[arg(
        long,
        global = true,
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_interval_seconds: u64,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Alarm definitions
    #[command(subcommand)]
    Monitoring(MonitoringCommand),

    /// Managed instance groups and work requests
    #[command(subcommand)]
    OsManagement(OsManagementCommand),

    /// Trace lookups
    #[command(subcommand)]
    ApmTraces(ApmTracesCommand),
}

#[derive(Subcommand, Debug)]
enum MonitoringCommand {
    /// Print an alarm
    GetAlarm {
        #[arg(long)]
        alarm_id: String,
    },
    /// Delete an alarm, optionally waiting until it is gone
    DeleteAlarm {
        #[arg(long)]
        alarm_id: String,
        /// Lifecycle state to wait for; repeat for several
        #[arg(long = "wait-for-state")]
        wait_for_states: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum OsManagementCommand {
    /// Print a work request
    GetWorkRequest {
        #[arg(long)]
        work_request_id: String,
    },
    /// Poll a work request until it reaches one of the given statuses
    WaitWorkRequest {
        #[arg(long)]
        work_request_id: String,
        /// Status to wait for; repeat for several
        #[arg(long = "wait-for-state", required = true)]
        wait_for_states: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ApmTracesCommand {
    /// Print a trace and its spans
    GetTrace {
        #[arg(long)]
        apm_domain_id: String,
        #[arg(long)]
        trace_key: String,
    },
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.debug);

    match commands::run(&cli.global, cli.command).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::TimedOut) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
