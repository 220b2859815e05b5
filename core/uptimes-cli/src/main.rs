//! uptimes: record and rank the uptimes of a long-running process.
//!
//! Designed to be called from a host's own hooks (shell precmd, editor
//! timers, exit hooks) or to run alongside a process with `watch`.
//!
//! ## Subcommands
//!
//! - `save`: one save cycle for a session
//! - `show`: save, then print the recent and longest uptimes
//! - `current`: print the uptime of a session without saving
//! - `watch`: save periodically until Ctrl-C or the watched process exits

mod context;
mod logging;
mod session;
mod shutdown;
mod watch;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use context::{Context, Overrides};
use session::SessionArgs;
use uptimes_core::DisplayOrder;

#[derive(Parser)]
#[command(name = "uptimes")]
#[command(about = "Track and rank process uptimes")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    overrides: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file (default: ~/.uptimes/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file, overriding the config file and UPTIMES_DATABASE
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Number of sessions kept in each list
    #[arg(long = "keep", global = true, value_name = "N")]
    keep_count: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record that the session is alive now
    Save {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Save, then print the most recent and the longest uptimes
    Show {
        #[command(flatten)]
        session: SessionArgs,

        /// Print the longest uptimes before the most recent ones
        #[arg(long)]
        duration_first: bool,

        /// Put the uptime column before the boot/end columns
        #[arg(long)]
        uptime_first: bool,
    },

    /// Print how long the session has been up, without saving
    Current {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Save every interval until interrupted or the watched process exits
    Watch {
        /// Process to watch (default: this process)
        #[arg(long)]
        pid: Option<u32>,

        /// Seconds between saves (default: auto_save.interval_secs)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _logging_guard = logging::init(logging::default_log_dir());

    let overrides = Overrides {
        config: cli.overrides.config,
        database: cli.overrides.database,
        keep_count: cli.overrides.keep_count,
    };

    let (name, result) = match cli.command {
        Commands::Save { session } => ("save", run_save(&overrides, &session)),
        Commands::Show {
            session,
            duration_first,
            uptime_first,
        } => (
            "show",
            run_show(&overrides, &session, duration_first, uptime_first),
        ),
        Commands::Current { session } => ("current", run_current(&overrides, &session)),
        Commands::Watch { pid, interval } => (
            "watch",
            Context::load(&overrides).and_then(|ctx| watch::run(&ctx, pid, interval)),
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, command = name, "uptimes failed");
            ExitCode::FAILURE
        }
    }
}

fn run_save(overrides: &Overrides, args: &SessionArgs) -> Result<(), String> {
    let ctx = Context::load(overrides)?;
    let tracker = ctx.tracker(session::resolve(args)?);
    tracker.save_now()?;
    Ok(())
}

fn run_show(
    overrides: &Overrides,
    args: &SessionArgs,
    duration_first: bool,
    uptime_first: bool,
) -> Result<(), String> {
    let mut ctx = Context::load(overrides)?;
    if duration_first {
        ctx.config.display.order = DisplayOrder::DurationFirst;
    }
    if uptime_first {
        ctx.config.display.booted_first = false;
    }
    let tracker = ctx.tracker(session::resolve(args)?);
    print!("{}", tracker.display()?);
    Ok(())
}

fn run_current(overrides: &Overrides, args: &SessionArgs) -> Result<(), String> {
    let ctx = Context::load(overrides)?;
    let tracker = ctx.tracker(session::resolve(args)?);
    println!("{}", tracker.current_uptime());
    Ok(())
}
