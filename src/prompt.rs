//! Prompt construction for the next-command request.

use std::fmt::Write;

/// System turn sent ahead of every prompt.
pub(crate) const SYSTEM_ROLE: &str = "You are a coding agent.";

/// Token the model returns when the task is done.
pub(crate) const EXIT_TOKEN: &str = "exit";

/// Placeholder for sections that have no content yet.
pub(crate) const NONE_SENTINEL: &str = "None";

/// Inputs rendered into a single prompt.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PromptContext<'a> {
    pub task: &'a str,
    pub sandbox_name: &'a str,
    pub folder_tree: &'a str,
    /// Already-windowed history, newline joined.
    pub history: &'a str,
    pub last_output: &'a str,
}

/// Renders the prompt asking for exactly one next command.
pub(crate) fn build_prompt(ctx: &PromptContext<'_>) -> String {
    let history = if ctx.history.is_empty() {
        NONE_SENTINEL
    } else {
        ctx.history
    };

    let mut out = String::new();

    writeln!(
        &mut out,
        "You are an autonomous coding agent that can only run non-interactive terminal \
         commands inside the '{}' directory.",
        ctx.sandbox_name
    )
    .unwrap();

    out.push_str("\n### RULES:\n");
    out.push_str(
        "1. **NO interactive commands** like `nano`, `vi`, `less`, `top`, `python` REPL, etc.\n",
    );
    out.push_str("2. **Use echo, printf or cat with redirection** to create or update files.\n");
    out.push_str("   Example:\n");
    out.push_str("     echo \"print('Hello')\" > main.py\n");
    out.push_str(
        "3. **Never execute, run, test or debug the code you write.** Only create or edit files.\n",
    );
    out.push_str("4. Always create minimal, functional code in as few commands as possible.\n");
    out.push_str("5. **Do not explain your commands**, only output the command itself.\n");
    writeln!(&mut out, "6. If the task is done, return `{EXIT_TOKEN}` to stop.").unwrap();

    out.push_str("\n### CONTEXT:\n");
    writeln!(&mut out, "Task: {}", ctx.task).unwrap();
    writeln!(&mut out, "\nCurrent folder structure:\n{}", ctx.folder_tree.trim_end()).unwrap();
    writeln!(&mut out, "\nRecent history:\n{history}").unwrap();
    writeln!(&mut out, "\nLast command output:\n{}", ctx.last_output.trim_end()).unwrap();

    out.push_str("\n### QUESTION:\n");
    out.push_str("What single non-interactive command should be executed next?\n");

    out
}
