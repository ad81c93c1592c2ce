//! Workspace automation tasks.
//!
//! Run with: `cargo xtask <command>`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::process::Command;

/// Attributes every library crate root must carry.
const REQUIRED_LIB_ATTRIBUTES: &[&str] = &["#![forbid(unsafe_code)]", "#![deny(missing_docs)]"];

#[derive(Parser)]
#[command(name = "xtask", about = "dbx workspace automation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks locally
    Ci,
    /// Validate workspace conventions
    Lint,
    /// Generate coverage report for the SDK
    Coverage {
        /// Fail when line coverage drops below this percentage
        #[arg(long)]
        fail_under: Option<u8>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => run_ci(),
        Commands::Lint => run_lint(),
        Commands::Coverage { fail_under } => run_coverage(fail_under),
    }
}

fn run_ci() -> Result<()> {
    println!("Running CI checks...\n");

    run_lint()?;
    run_cmd("cargo", &["fmt", "--all", "--check"])?;
    run_cmd(
        "cargo",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )?;
    run_cmd("cargo", &["test", "--workspace"])?;
    run_cmd("cargo", &["doc", "--workspace", "--no-deps"])?;

    println!("\nAll CI checks passed!");
    Ok(())
}

fn run_lint() -> Result<()> {
    println!("Validating workspace conventions...\n");

    for entry in std::fs::read_dir("crates").context("Failed to read crates/")? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with("dbx-") {
            anyhow::bail!("Crate '{name}' does not follow dbx-* naming");
        }
        check_lib_attributes(&entry.path())?;
    }

    println!("All conventions validated!");
    Ok(())
}

fn check_lib_attributes(crate_dir: &Path) -> Result<()> {
    let lib = crate_dir.join("src").join("lib.rs");
    if !lib.exists() {
        return Ok(());
    }
    let source = std::fs::read_to_string(&lib)
        .with_context(|| format!("Failed to read {}", lib.display()))?;
    for attribute in REQUIRED_LIB_ATTRIBUTES {
        if !source.contains(attribute) {
            anyhow::bail!("{} is missing `{attribute}`", lib.display());
        }
    }
    Ok(())
}

fn run_coverage(fail_under: Option<u8>) -> Result<()> {
    let threshold = fail_under.map(|percent| percent.to_string());
    let mut args = vec!["llvm-cov", "--package", "dbx-sdk", "--html"];
    if let Some(threshold) = &threshold {
        args.extend(["--fail-under-lines", threshold.as_str()]);
    }
    run_cmd("cargo", &args)?;
    println!("\nCoverage report: target/llvm-cov/html/index.html");
    Ok(())
}

fn run_cmd(cmd: &str, args: &[&str]) -> Result<()> {
    println!("$ {} {}", cmd, args.join(" "));
    let status = Command::new(cmd)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run: {} {}", cmd, args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("Command failed: {} {}", cmd, args.join(" "));
    }
    Ok(())
}
