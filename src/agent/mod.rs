//! The agent loop.
//!
//! Each step lists the sandbox, asks the model for one command, cleans it
//! and runs it. The loop stops when the model answers `exit` or after
//! `max_steps` executed commands. Submodules:
//! - `format`: console output for banner, steps and summary

pub(crate) mod format;

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::{AgentSettings, API_KEY_ENV};
use crate::history::History;
use crate::inspect::TreeInspector;
use crate::llm::{LlmError, LlmGateway};
use crate::prompt::{build_prompt, PromptContext, EXIT_TOKEN, NONE_SENTINEL};
use crate::sanitize::clean_command;
use crate::shell::ShellExecutor;

use format::{format_step_command, format_step_output, format_summary};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Termination {
    /// The model returned the exit token.
    Exit,
    /// `max_steps` commands ran without an exit token.
    StepLimit,
}

impl Termination {
    fn reason(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::StepLimit => "step_limit",
        }
    }
}

/// Final state of a run, for the caller and for tests.
#[derive(Debug)]
pub(crate) struct RunOutcome {
    pub termination: Termination,
    /// Commands actually executed (the exit step is not counted).
    pub steps_executed: u32,
    pub history: History,
    pub last_output: String,
}

/// True when the whole cleaned command is the exit token, ignoring case.
pub(crate) fn is_exit_command(command: &str) -> bool {
    command.eq_ignore_ascii_case(EXIT_TOKEN)
}

/// Drives the inspect → prompt → complete → sanitize → execute cycle.
pub(crate) struct AgentLoop<'a> {
    llm: &'a dyn LlmGateway,
    shell: &'a dyn ShellExecutor,
    inspector: TreeInspector,
    settings: AgentSettings,
}

impl<'a> AgentLoop<'a> {
    pub fn new(
        llm: &'a dyn LlmGateway,
        shell: &'a dyn ShellExecutor,
        settings: AgentSettings,
    ) -> Self {
        Self {
            llm,
            shell,
            inspector: TreeInspector::default(),
            settings,
        }
    }

    /// Replaces the default `tree` / `ls -R` listing strategy.
    #[cfg(test)]
    #[must_use]
    pub fn with_inspector(mut self, inspector: TreeInspector) -> Self {
        self.inspector = inspector;
        self
    }

    fn sandbox_dir(&self) -> &Path {
        &self.settings.sandbox_dir
    }

    /// Runs the loop for `task` until exit or the step limit.
    ///
    /// Shell failures are folded into the output text. Listing and model
    /// failures abort the run.
    pub async fn run(&self, task: &str) -> Result<RunOutcome> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let sandbox_name = self.sandbox_dir().display().to_string();

        info!(
            event = "loop_start",
            %run_id,
            model = self.llm.name(),
            sandbox = %sandbox_name,
            max_steps = self.settings.max_steps,
        );

        let mut history = History::new(self.settings.history_window);
        let mut last_output = NONE_SENTINEL.to_string();
        let mut steps_executed: u32 = 0;

        let termination = loop {
            if steps_executed >= self.settings.max_steps {
                break Termination::StepLimit;
            }
            let step = steps_executed + 1;
            info!(event = "step_start", %run_id, step);

            let folder_tree = self
                .inspector
                .folder_tree(self.sandbox_dir())
                .await
                .with_context(|| format!("Failed to list sandbox directory: {sandbox_name}"))?;

            let rendered_history = history.render();
            let prompt = build_prompt(&PromptContext {
                task,
                sandbox_name: &sandbox_name,
                folder_tree: &folder_tree,
                history: &rendered_history,
                last_output: &last_output,
            });
            debug!("Prompt for step {}:\n{}", step, prompt);

            let raw = match self.llm.generate(&prompt).await {
                Ok(raw) => raw,
                Err(e) => {
                    if e.downcast_ref::<LlmError>().is_some_and(LlmError::is_auth) {
                        error!("Authentication failed, check {}", API_KEY_ENV);
                    }
                    error!(event = "error", %run_id, step, error = %e);
                    return Err(e).context("Failed to get next command from the model");
                }
            };

            let command = clean_command(&raw);
            info!(event = "command_chosen", %run_id, step, command = %command);
            history.push_command(step, &command);
            println!("{}", format_step_command(step, &command));

            if is_exit_command(&command) {
                break Termination::Exit;
            }

            last_output = self.shell.execute(&command).await;
            println!("{}", format_step_output(&last_output));
            history.push_output(&last_output);
            steps_executed += 1;

            info!(
                event = "command_executed",
                %run_id,
                step,
                output_bytes = last_output.len(),
            );
        };

        let elapsed = Utc::now().signed_duration_since(started_at);
        println!("{}", format_summary(termination, steps_executed, &elapsed));

        info!(
            event = "loop_end",
            %run_id,
            reason = termination.reason(),
            steps_executed,
            history_entries = history.len(),
        );

        Ok(RunOutcome {
            termination,
            steps_executed,
            history,
            last_output,
        })
    }
}
