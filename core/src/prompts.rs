// Prompt templates for each writer task

/// System instruction used for replies when the front-end sends none
pub const DEFAULT_REPLY_INSTRUCTION: &str =
    "You are a helpful assistant that generates replies to comments.";

/// The description already reads as an instruction, so it goes upstream as-is
pub fn outline_prompt(content_description: &str) -> String {
    content_description.to_string()
}

pub fn optimize_prompt(content: &str, platform: &str, character_limit: u32) -> String {
    format!(
        "Optimize the following content for the '{platform}' platform. Aim for a character limit of {character_limit}.\n\nOriginal Content:\n\"{content}\""
    )
}

pub fn rewrite_prompt(content: &str, style: &str) -> String {
    format!("Rewrite the following content in a {style} style:\n\nContent:\n{content}")
}

pub fn reply_prompt(comment: &str, tone: &str) -> String {
    format!("Generate a {tone} reply to the following comment:\n\nComment:\n{comment}")
}
