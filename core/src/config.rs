//! Upstream configuration: endpoint, credential, model table and platform limits.
//!
//! Values come from the environment first and may be overlaid by a TOML file
//! (path via `QUILL_CONFIG`, default `./quill.toml`). The result is built once
//! at startup and shared read-only for the life of the process.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::task::Task;

/// Value shipped in sample `.env` files; treated the same as no key
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENAI_API_KEY_HERE";

const DEFAULT_PLATFORM_KEY: &str = "default";
const DEFAULT_PLATFORM_LIMIT: u32 = 5000;

#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String, // e.g., https://api.openai.com/v1
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
    pub max_tokens: u32,
    pub models: ModelTable,
    pub platform_limits: PlatformLimits,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("OPENAI_API_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            request_timeout_ms: std::env::var("UPSTREAM_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60_000),
            max_tokens: 2048,
            models: ModelTable::default(),
            platform_limits: PlatformLimits::default(),
        }
    }
}

// The credential never reaches logs
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_tokens", &self.max_tokens)
            .field("models", &self.models)
            .field("platform_limits", &self.platform_limits)
            .finish()
    }
}

impl UpstreamConfig {
    /// Load configuration from a TOML file (path via QUILL_CONFIG or ./quill.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("QUILL_CONFIG").unwrap_or_else(|_| "quill.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target: "config", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match Self::overlay_toml(&s, default.clone()) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(target: "config", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target: "config", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }

    /// Apply a TOML document on top of `base`
    pub fn overlay_toml(
        source: &str,
        base: UpstreamConfig,
    ) -> std::result::Result<UpstreamConfig, toml::de::Error> {
        let parsed: UpstreamToml = toml::from_str(source)?;
        Ok(parsed.overlay(base))
    }

    /// True when a real credential is present (not blank, not the sample placeholder)
    pub fn has_usable_api_key(&self) -> bool {
        self.usable_api_key().is_some()
    }

    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Upstream model per task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTable {
    /// Must support the web search tool
    pub outline: String,
    pub optimize: String,
    pub rewrite: String,
    pub reply: String,
}

impl Default for ModelTable {
    fn default() -> Self {
        let var = |name: &str, fallback: &str| {
            std::env::var(name)
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        Self {
            outline: var("QUILL_MODEL_OUTLINE", "gpt-4o"),
            optimize: var("QUILL_MODEL_OPTIMIZE", "gpt-4.5-preview"),
            rewrite: var("QUILL_MODEL_REWRITE", "gpt-4.5-preview"),
            reply: var("QUILL_MODEL_REPLY", "gpt-4.5-preview"),
        }
    }
}

impl ModelTable {
    pub fn model_for(&self, task: Task) -> &str {
        match task {
            Task::Outline => &self.outline,
            Task::Optimize => &self.optimize,
            Task::Rewrite => &self.rewrite,
            Task::Reply => &self.reply,
        }
    }
}

/// Character-limit hints per publishing platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLimits {
    limits: HashMap<String, u32>,
}

impl Default for PlatformLimits {
    fn default() -> Self {
        let limits = [
            ("twitter", 280),
            ("linkedin", 3000),
            ("instagram", 2200),
            ("blog", 10000),
            (DEFAULT_PLATFORM_KEY, DEFAULT_PLATFORM_LIMIT),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self { limits }
    }
}

impl PlatformLimits {
    /// Exact-key lookup; unknown platforms get the `default` entry
    pub fn limit_for(&self, platform: &str) -> u32 {
        self.limits
            .get(platform)
            .or_else(|| self.limits.get(DEFAULT_PLATFORM_KEY))
            .copied()
            .unwrap_or(DEFAULT_PLATFORM_LIMIT)
    }

    pub fn set(&mut self, platform: impl Into<String>, limit: u32) {
        self.limits.insert(platform.into(), limit);
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpstreamToml {
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    max_tokens: Option<u32>,
    models: Option<ModelsToml>,
    #[serde(default)]
    platform_limits: HashMap<String, u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelsToml {
    outline: Option<String>,
    optimize: Option<String>,
    rewrite: Option<String>,
    reply: Option<String>,
}

impl UpstreamToml {
    fn overlay(self, mut base: UpstreamConfig) -> UpstreamConfig {
        if let Some(url) = self.base_url.filter(|s| !s.is_empty()) {
            base.base_url = url;
        }
        if let Some(t) = self.request_timeout_ms {
            base.request_timeout_ms = t;
        }
        if let Some(m) = self.max_tokens {
            base.max_tokens = m;
        }
        if let Some(models) = self.models {
            models.apply(&mut base.models);
        }
        for (platform, limit) in self.platform_limits {
            base.platform_limits.set(platform, limit);
        }
        base
    }
}

impl ModelsToml {
    fn apply(self, table: &mut ModelTable) {
        if let Some(v) = self.outline {
            table.outline = v;
        }
        if let Some(v) = self.optimize {
            table.optimize = v;
        }
        if let Some(v) = self.rewrite {
            table.rewrite = v;
        }
        if let Some(v) = self.reply {
            table.reply = v;
        }
    }
}
