// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod export;
pub mod fs;
pub mod logging;
pub mod session;
pub mod types;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cli::{CliArgs, Command, RunArgs};
use crate::config::{ConfigFile, load_config};
use crate::display::{DisplaySink, Notice, TerminalSink};
use crate::engine::Relay;
use crate::exec::{Invocation, ProcessLauncher, ToolLauncher, resolve_interpreter};
use crate::fs::{FileSystem, RealFileSystem};
use crate::session::Session;
use crate::types::OsFamily;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the session built from CLI flags and config defaults
/// - the relay with the real process launcher and the terminal display
/// - the optional export of the collected output
///
/// Errors the relay already reported to the user become a failure exit code
/// rather than an `Err`, so they are not printed twice.
pub async fn run(args: CliArgs) -> Result<ExitCode> {
    let fs = RealFileSystem;
    let cfg = load_config(&fs, args.config.as_deref())?;
    let mut stdout = io::stdout();

    match args.command {
        Command::Routines { os } => {
            print_routines(os.as_deref(), &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(run_args) => {
            let mut sink = TerminalSink::stdio();
            Ok(run_routine(&cfg, &run_args, ProcessLauncher, &fs, &mut sink, &mut stdout).await)
        }
    }
}

/// The `run` subcommand.
///
/// - `--dry-run` prints the command to `out` and launches nothing.
/// - Otherwise the routine is executed, then exported if `--export` is set.
///
/// Exit status is success only if the run finished and any export succeeded.
pub async fn run_routine<L, S>(
    cfg: &ConfigFile,
    args: &RunArgs,
    launcher: L,
    fs: &dyn FileSystem,
    sink: &mut S,
    out: &mut dyn Write,
) -> ExitCode
where
    L: ToolLauncher,
    S: DisplaySink + ?Sized,
{
    let session = build_session(cfg, args);
    let interpreter = resolve_interpreter(
        args.interpreter.as_deref(),
        cfg.launcher.interpreter.as_deref(),
    );

    if args.dry_run {
        return print_dry_run(&session, &interpreter, sink, out);
    }

    let mut relay = Relay::new(launcher, interpreter);
    let mut ok = relay.execute(&session, sink).await.is_ok();

    if let Some(path) = &args.export {
        ok &= relay.export(path, fs, sink).is_ok();
    }

    debug!(state = ?relay.state(), progress = relay.progress(), "run complete");
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Merge CLI flags over `[session]` config defaults.
///
/// An unrecognised OS family only means no routines are offered; it does not
/// block execution, since the routine string is what reaches the tool.
pub fn build_session(cfg: &ConfigFile, args: &RunArgs) -> Session {
    let defaults = &cfg.session;
    let mut session = Session::new();

    if let Some(image) = args.image.as_ref().or(defaults.image.as_ref()) {
        session.set_image(image.clone());
    }
    if let Some(tool) = args.tool.as_ref().or(defaults.tool.as_ref()) {
        session.set_tool(tool.clone());
    }

    let os = match args.os.as_deref() {
        Some(name) => match name.parse::<OsFamily>() {
            Ok(family) => Some(family),
            Err(e) => {
                warn!(os = %name, error = %e, "unrecognised OS family; no routines offered");
                None
            }
        },
        None => defaults.os,
    };
    session.set_os(os);

    if let Some(routine) = args.routine.as_ref().or(defaults.routine.as_ref()) {
        session.set_routine(routine.clone());
        if os.is_some() && !session.offered_routines().contains(&routine.as_str()) {
            warn!(
                routine = %routine,
                os = ?os,
                "routine is not offered for the selected OS family; running it anyway"
            );
        }
    }

    session
}

fn print_dry_run<S>(
    session: &Session,
    interpreter: &Path,
    sink: &mut S,
    out: &mut dyn Write,
) -> ExitCode
where
    S: DisplaySink + ?Sized,
{
    match session.run_request() {
        Ok(request) => {
            let invocation = Invocation::new(interpreter, &request);
            let os = session.os().map(|o| o.as_str()).unwrap_or("-");
            let res = writeln!(out, "volrelay dry-run")
                .and_then(|_| writeln!(out, "  os: {os}"))
                .and_then(|_| writeln!(out, "  command: {}", invocation.display_command()));
            match res {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    warn!(error = %e, "failed to print dry-run");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            sink.notify(&Notice::error(e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Print the catalog of one family, or of all families.
///
/// An unrecognised family prints nothing to `out`.
pub fn print_routines(os: Option<&str>, out: &mut dyn Write) -> io::Result<()> {
    match os {
        Some(name) => {
            let routines = catalog::routines_for_name(name);
            if routines.is_empty() {
                warn!(os = %name, "no routines offered for OS family");
            }
            for routine in routines {
                writeln!(out, "{routine}")?;
            }
        }
        None => {
            for family in OsFamily::ALL {
                writeln!(out, "{family}:")?;
                for routine in catalog::routines_for(family) {
                    writeln!(out, "  {routine}")?;
                }
            }
        }
    }
    Ok(())
}
