//! Task model: the four writer operations and the request each one produces

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PlatformLimits;
use crate::prompts;

/// Content-generation operation requested by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Outline,
    Optimize,
    Rewrite,
    Reply,
}

/// Upstream request body layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Role-tagged `messages` list posted to `/chat/completions`
    ChatCompletions,
    /// Nested `input` content list with the web search tool, posted to `/responses`
    Responses,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Outline => "outline",
            Task::Optimize => "optimize",
            Task::Rewrite => "rewrite",
            Task::Reply => "reply",
        }
    }

    /// Outline is the only task that runs with web search enabled
    pub fn payload_shape(&self) -> PayloadShape {
        match self {
            Task::Outline => PayloadShape::Responses,
            Task::Optimize | Task::Rewrite | Task::Reply => PayloadShape::ChatCompletions,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound call, ready for dispatch. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub task: Task,
    /// Sent verbatim as the upstream system role content
    pub system_instruction: String,
    pub user_prompt: String,
}

impl GenerationRequest {
    pub fn new(
        task: Task,
        system_instruction: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            task,
            system_instruction: system_instruction.into(),
            user_prompt: user_prompt.into(),
        }
    }

    pub fn outline(content_description: &str, system_instruction: &str) -> Self {
        Self::new(
            Task::Outline,
            system_instruction,
            prompts::outline_prompt(content_description),
        )
    }

    pub fn optimize(
        content: &str,
        platform: &str,
        limits: &PlatformLimits,
        system_instruction: &str,
    ) -> Self {
        let limit = limits.limit_for(platform);
        Self::new(
            Task::Optimize,
            system_instruction,
            prompts::optimize_prompt(content, platform, limit),
        )
    }

    pub fn rewrite(content: &str, style: &str, system_instruction: &str) -> Self {
        Self::new(
            Task::Rewrite,
            system_instruction,
            prompts::rewrite_prompt(content, style),
        )
    }

    /// Falls back to the stock reply instruction when none (or a blank one) is given
    pub fn reply(comment: &str, tone: &str, system_instruction: Option<&str>) -> Self {
        let instruction = system_instruction
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(prompts::DEFAULT_REPLY_INSTRUCTION);
        Self::new(
            Task::Reply,
            instruction,
            prompts::reply_prompt(comment, tone),
        )
    }
}
