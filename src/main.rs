//! `cmd-agent`: asks a language model for one shell command at a time and
//! runs it inside a sandbox directory until the model answers `exit`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod agent;
mod config;
mod history;
mod inspect;
mod llm;
mod prompt;
mod sanitize;
mod shell;

use agent::format::{format_banner, BannerInfo};
use agent::AgentLoop;
use config::Config;
use llm::{GroqClient, LlmGateway};
use shell::SandboxShell;

#[derive(Parser)]
#[command(name = "cmd-agent")]
#[command(
    author,
    version,
    about = "Minimal autonomous coding agent - one shell command per step"
)]
struct Cli {
    /// Task for the agent (prompted for interactively when omitted)
    #[arg(short, long)]
    task: Option<String>,

    /// Completion model identifier (overrides MODEL_ID)
    #[arg(long)]
    model: Option<String>,

    /// Directory the generated commands run in
    #[arg(long)]
    sandbox: Option<PathBuf>,

    /// Maximum number of commands to execute
    #[arg(long)]
    max_steps: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// CLI flags take precedence over file and environment values.
    fn apply(&self, config: &mut Config) {
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            config.llm.model = model.to_string();
        }
        if let Some(ref sandbox) = self.sandbox {
            config.agent.sandbox_dir.clone_from(sandbox);
        }
        if let Some(max_steps) = self.max_steps {
            config.agent.max_steps = max_steps;
        }
    }
}

/// Prompts once on stdin for the task description.
fn read_task() -> Result<String> {
    print!("Enter the coding task for the agent: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read task from stdin")?;

    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file may provide GROQ_API_KEY and MODEL_ID
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("cmd_agent=debug")
    } else {
        EnvFilter::new("cmd_agent=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    let mut config = Config::load(&cwd).context("Failed to load cmd-agent.toml")?;
    config.apply_env(|key| std::env::var(key).ok());
    cli.apply(&mut config);

    let sandbox_dir = &config.agent.sandbox_dir;
    std::fs::create_dir_all(sandbox_dir).with_context(|| {
        format!(
            "Failed to create sandbox directory: {}",
            sandbox_dir.display()
        )
    })?;

    let llm = GroqClient::new(config.llm.clone())?;

    let task = match cli.task {
        Some(task) => task.trim().to_string(),
        None => read_task()?,
    };
    if task.is_empty() {
        bail!("No task given. Pass --task or type one at the prompt.");
    }

    let banner = BannerInfo {
        model: llm.name().to_string(),
        sandbox: sandbox_dir.display().to_string(),
        max_steps: config.agent.max_steps,
        task: task.clone(),
    };
    print!("{}", format_banner(&banner));

    let shell = SandboxShell::new(sandbox_dir);
    let outcome = AgentLoop::new(&llm, &shell, config.agent.clone())
        .run(&task)
        .await?;

    debug!("Full history:\n{}", outcome.history.entries().join("\n"));
    info!(
        termination = ?outcome.termination,
        steps_executed = outcome.steps_executed,
        last_output_bytes = outcome.last_output.len(),
        "Run finished"
    );

    Ok(())
}
