use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the sketch crates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
enum Commands {
    /// Run everything CI runs: fmt, clippy, tests, doc, smoke
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Headless loop run through sketch-cli: a stalled host with a step cap
    Smoke,
}

/// One cargo invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Task {
    name: &'static str,
    args: &'static [&'static str],
}

const FMT: Task = Task {
    name: "cargo fmt --check",
    args: &["fmt", "--all", "--", "--check"],
};
const CLIPPY: Task = Task {
    name: "cargo clippy",
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};
const TEST: Task = Task {
    name: "cargo test",
    args: &["test", "--workspace"],
};
const DOC: Task = Task {
    name: "cargo doc",
    args: &["doc", "--workspace", "--no-deps"],
};
const BUILD: Task = Task {
    name: "cargo build",
    args: &["build", "--workspace"],
};
const SMOKE: Task = Task {
    name: "sketch-cli simulate",
    args: &[
        "run",
        "-p",
        "sketch-cli",
        "--",
        "simulate",
        "--frames",
        "120",
        "--stall-at",
        "30",
        "--stall-secs",
        "2",
        "--max-fixed-steps",
        "8",
    ],
};

fn tasks(command: Commands) -> &'static [Task] {
    match command {
        Commands::Check => &[FMT, CLIPPY, TEST, DOC, SMOKE],
        Commands::Fmt => &[FMT],
        Commands::Clippy => &[CLIPPY],
        Commands::Test => &[TEST],
        Commands::Doc => &[DOC],
        Commands::Build => &[BUILD],
        Commands::Smoke => &[SMOKE],
    }
}

fn run(task: &Task) -> Result<()> {
    println!("==> Running {}", task.name);
    let status = Command::new("cargo").args(task.args).status()?;
    if !status.success() {
        bail!("{} failed", task.name);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for task in tasks(cli.command) {
        run(task)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_runs_every_gate_in_order() {
        let names: Vec<_> = tasks(Commands::Check).iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "cargo fmt --check",
                "cargo clippy",
                "cargo test",
                "cargo doc",
                "sketch-cli simulate"
            ]
        );
    }

    #[test]
    fn single_commands_run_one_task() {
        for command in [
            Commands::Fmt,
            Commands::Clippy,
            Commands::Test,
            Commands::Doc,
            Commands::Build,
            Commands::Smoke,
        ] {
            assert_eq!(tasks(command).len(), 1, "{command:?}");
        }
    }

    #[test]
    fn smoke_uses_cli_simulate_flags() {
        let args = SMOKE.args;
        assert_eq!(&args[..3], ["run", "-p", "sketch-cli"]);
        assert!(args.contains(&"--max-fixed-steps"));
        assert!(args.contains(&"--stall-at"));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["xtask", "smoke"]).unwrap();
        assert_eq!(cli.command, Commands::Smoke);
        assert!(Cli::try_parse_from(["xtask", "deploy"]).is_err());
    }
}
