//! Formatting functions for console output during a run.
//!
//! Pure functions returning strings, printing is left to the caller.

use chrono::Duration;
use colored::Colorize;
use std::fmt::Write;

use super::Termination;

/// Banner information for display at loop start.
#[derive(Debug, Clone)]
pub(crate) struct BannerInfo {
    pub model: String,
    pub sandbox: String,
    pub max_steps: u32,
    pub task: String,
}

/// Formats a duration for display (e.g., "2m 30s").
pub(crate) fn format_duration(duration: &Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Formats the startup banner for display.
pub(crate) fn format_banner(info: &BannerInfo) -> String {
    let mut out = String::new();

    writeln!(&mut out, "\n{}", "━".repeat(50).dimmed()).unwrap();
    writeln!(&mut out, "{}", "   🤖 Coding Agent Starting".yellow().bold()).unwrap();
    writeln!(&mut out, "{}", "━".repeat(50).dimmed()).unwrap();
    writeln!(&mut out, "  Model:      {}", info.model.cyan().bold()).unwrap();
    writeln!(&mut out, "  Sandbox:    {}", info.sandbox.cyan()).unwrap();
    writeln!(
        &mut out,
        "  Max steps:  {}",
        info.max_steps.to_string().cyan()
    )
    .unwrap();
    writeln!(&mut out, "  Task:       {}", info.task.cyan()).unwrap();
    writeln!(&mut out, "{}", "━".repeat(50).dimmed()).unwrap();

    out
}

/// Formats the command chosen for a step.
pub(crate) fn format_step_command(step: u32, command: &str) -> String {
    format!(
        "\n{} Command: {}",
        format!("[Agent Step {step}]").cyan().bold(),
        command.bold()
    )
}

/// Formats a command's captured output.
pub(crate) fn format_step_output(output: &str) -> String {
    let body = if output.trim().is_empty() {
        "(no output)".dimmed().to_string()
    } else {
        output.trim_end().to_string()
    };
    format!("{}\n{body}", "[Terminal Output]:".dimmed())
}

/// Formats the closing line of a run.
pub(crate) fn format_summary(termination: Termination, steps: u32, elapsed: &Duration) -> String {
    let elapsed = format_duration(elapsed);
    match termination {
        Termination::Exit => format!(
            "\n{} {} command(s) in {}",
            "✅ Task complete:".green().bold(),
            steps,
            elapsed
        ),
        Termination::StepLimit => format!(
            "\n{} {} command(s) in {}",
            "⚠️  Step limit reached:".yellow().bold(),
            steps,
            elapsed
        ),
    }
}
