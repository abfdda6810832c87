//! Recovers a literal shell command from raw model output.
//!
//! Models frequently wrap the command in a markdown fence with a language
//! tag. Only the first fenced segment is kept.

const FENCE: &str = "```";

/// Language tags stripped from fenced output.
const LANGUAGE_TAGS: [&str; 2] = ["bash", "python"];

/// Strips markdown fences and language tags from a model completion.
pub(crate) fn clean_command(raw: &str) -> String {
    let mut cmd = raw.trim().to_string();

    if cmd.starts_with(FENCE) {
        // Text before the opening fence is empty, the first segment is the body
        cmd = cmd.split(FENCE).nth(1).unwrap_or_default().to_string();
        for tag in LANGUAGE_TAGS {
            cmd = cmd.replace(tag, "");
        }
    }

    cmd.replace(FENCE, "").trim().to_string()
}
