//! Upsert configuration.
//!
//! [`UpsertSettings`] is the raw, user-facing form, read from a TOML file
//! and/or command-line flags. [`UpsertConfig::from_settings`] validates it in
//! one pass and reports every problem in a single [`ConfigurationError`].
//!
//! ```toml
//! table = "public.users"
//! match_strategy = "key_columns"
//! key_columns = ["email"]
//! batch_semantics = "atomic"
//! ```

use crate::error::ConfigurationError;
use crate::strategy::MatchStrategy;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use table_sink::BatchSemantics;

/// Key columns as a list or as a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyColumns {
    List(Vec<String>),
    Joined(String),
}

impl KeyColumns {
    /// Column names, with a joined string split on `,` and trimmed.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            KeyColumns::List(columns) => columns.iter().map(|c| c.trim().to_string()).collect(),
            KeyColumns::Joined(joined) => {
                if joined.trim().is_empty() {
                    return Vec::new();
                }
                joined.split(',').map(|c| c.trim().to_string()).collect()
            }
        }
    }
}

/// Raw upsert settings before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpsertSettings {
    /// Target table, optionally schema-qualified
    pub table: Option<String>,

    /// `pk` (default), `key_columns` or `insert_only`
    pub match_strategy: Option<String>,

    /// Identity columns for `key_columns`
    pub key_columns: Option<KeyColumns>,

    /// `row` (default) or `atomic`
    pub batch_semantics: Option<String>,

    /// Classify rows without writing
    pub dry_run: bool,
}

impl UpsertSettings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {path:?}"))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse settings file {path:?}"))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay `overrides` on these settings. Values present in `overrides`
    /// win; `dry_run` is enabled if either side enables it.
    pub fn merge(self, overrides: UpsertSettings) -> Self {
        Self {
            table: overrides.table.or(self.table),
            match_strategy: overrides.match_strategy.or(self.match_strategy),
            key_columns: overrides.key_columns.or(self.key_columns),
            batch_semantics: overrides.batch_semantics.or(self.batch_semantics),
            dry_run: overrides.dry_run || self.dry_run,
        }
    }
}

/// Validated upsert configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertConfig {
    table: String,
    strategy: MatchStrategy,
    semantics: BatchSemantics,
    dry_run: bool,
}

impl UpsertConfig {
    /// A configuration with row-independent semantics and writes enabled.
    pub fn new(
        table: impl Into<String>,
        strategy: MatchStrategy,
    ) -> Result<Self, ConfigurationError> {
        let table = table.into();
        let mut problems = Vec::new();
        if table.trim().is_empty() {
            problems.push("Target table is blank".to_string());
        }
        if let Err(err) = strategy.validate() {
            problems.extend(err.problems().iter().cloned());
        }
        if let Some(err) = ConfigurationError::from_problems(problems) {
            return Err(err);
        }

        Ok(Self {
            table,
            strategy,
            semantics: BatchSemantics::default(),
            dry_run: false,
        })
    }

    /// Validate raw settings, collecting every problem.
    pub fn from_settings(settings: &UpsertSettings) -> Result<Self, ConfigurationError> {
        let mut problems = Vec::new();

        let table = settings.table.as_deref().unwrap_or("").trim().to_string();
        if table.is_empty() {
            problems.push("Target table is not set".to_string());
        }

        let key_columns = settings
            .key_columns
            .as_ref()
            .map(KeyColumns::to_vec)
            .unwrap_or_default();
        let strategy = match MatchStrategy::parse(
            settings.match_strategy.as_deref().unwrap_or("pk"),
            &key_columns,
        ) {
            Ok(strategy) => Some(strategy),
            Err(err) => {
                problems.extend(err.problems().iter().cloned());
                None
            }
        };

        let semantics = match settings.batch_semantics.as_deref() {
            None => Some(BatchSemantics::default()),
            Some(name) => match name.parse::<BatchSemantics>() {
                Ok(semantics) => Some(semantics),
                Err(message) => {
                    problems.push(message);
                    None
                }
            },
        };

        match (strategy, semantics, ConfigurationError::from_problems(problems)) {
            (Some(strategy), Some(semantics), None) => Ok(Self {
                table,
                strategy,
                semantics,
                dry_run: settings.dry_run,
            }),
            (_, _, Some(err)) => Err(err),
            _ => Err(ConfigurationError::new("Invalid configuration")),
        }
    }

    pub fn with_semantics(mut self, semantics: BatchSemantics) -> Self {
        self.semantics = semantics;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn strategy(&self) -> &MatchStrategy {
        &self.strategy
    }

    pub fn semantics(&self) -> BatchSemantics {
        self.semantics
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
