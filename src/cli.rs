// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `volrelay`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "volrelay",
    version,
    about = "Run a memory-forensics routine and relay its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Volrelay.toml` in the current working directory, if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `VOLRELAY_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Execute one routine against a memory image.
    Run(RunArgs),

    /// List the routines offered per OS family.
    Routines {
        /// Only list this family (windows, linux, mac).
        #[arg(long, value_name = "FAMILY")]
        os: Option<String>,
    },
}

/// Session selections for `run`; unset values fall back to `[session]` in
/// the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Memory image file (.img, .mem, .raw, ...).
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Analysis tool script, e.g. Volatility3's `vol.py`.
    #[arg(long, value_name = "PATH")]
    pub tool: Option<PathBuf>,

    /// OS family of the image (windows, linux, mac).
    #[arg(long, value_name = "FAMILY")]
    pub os: Option<String>,

    /// Routine to run, e.g. `windows.pslist`.
    #[arg(long, value_name = "NAME")]
    pub routine: Option<String>,

    /// Program used to run the tool (default: config, `VOLRELAY_PYTHON`,
    /// then `python3`).
    #[arg(long, value_name = "PROG")]
    pub interpreter: Option<PathBuf>,

    /// Write the collected output to this file once the run ends.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Print the command that would be run, without running it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_parse() {
        let args = CliArgs::try_parse_from([
            "volrelay",
            "run",
            "--image",
            "host.mem",
            "--tool",
            "vol.py",
            "--os",
            "Windows",
            "--routine",
            "windows.pslist",
            "--export",
            "out.txt",
        ])
        .unwrap();

        let Command::Run(run) = args.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(run.image, Some(PathBuf::from("host.mem")));
        assert_eq!(run.os.as_deref(), Some("Windows"));
        assert_eq!(run.export, Some(PathBuf::from("out.txt")));
        assert!(!run.dry_run);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args =
            CliArgs::try_parse_from(["volrelay", "routines", "--log-level", "debug", "--os", "mac"])
                .unwrap();
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(matches!(args.command, Command::Routines { os: Some(ref o) } if o == "mac"));
    }
}
