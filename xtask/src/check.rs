use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Bare-metal target of the Cortex-A7 cores.
const TARGET: &str = "armv7a-none-eabi";

/// One cargo build step that must succeed.
struct BuildCheck {
    label: &'static str,
    args: &'static [&'static str],
}

const BUILD_CHECKS: &[BuildCheck] = &[
    BuildCheck {
        label: "platform crate (no_std, ARMv7-A)",
        args: &["check", "-p", "platform", "--target", TARGET, "--features", "hardware"],
    },
    BuildCheck {
        label: "board crate (no_std, defmt)",
        args: &[
            "check", "-p", "board", "--target", TARGET, "--features", "hardware,defmt",
        ],
    },
    BuildCheck {
        label: "board crate without env backends",
        args: &["check", "-p", "board", "--target", TARGET, "--no-default-features"],
    },
    BuildCheck {
        label: "board crate (host, tracing)",
        args: &["check", "-p", "board", "--features", "std,tracing"],
    },
    BuildCheck {
        label: "API docs (platform, board)",
        args: &["doc", "--no-deps", "-p", "platform", "-p", "board"],
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking bring-up builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for check in BUILD_CHECKS {
        println!("{}", format!("  Checking {}...", check.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(check.args)
            .output()
            .with_context(|| format!("Failed to check {}", check.label))?;

        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {} failed", check.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} check failed", check.label);
        }

        println!(
            "{}",
            format!(
                "  ✓ {} passed in {:.2}s",
                check.label,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();
    }

    // Clippy lints
    println!("{}", "  Running clippy lints...".cyan());
    let clippy_start = Instant::now();

    let clippy_output = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .output()
        .context("Failed to run clippy")?;

    if !clippy_output.status.success() {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&clippy_output.stderr));
        // Don't fail on clippy warnings, just show them
    } else {
        println!(
            "{}",
            format!(
                "  ✓ Clippy passed in {:.2}s",
                clippy_start.elapsed().as_secs_f64()
            )
            .green()
        );
    }
    println!();

    // Format check
    println!("{}", "  Checking code formatting...".cyan());

    let fmt_output = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .output()
        .context("Failed to run cargo fmt")?;

    if !fmt_output.status.success() {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    } else {
        println!("{}", "  ✓ Formatting check passed".green());
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
