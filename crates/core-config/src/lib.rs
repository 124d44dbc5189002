//! Configuration loading and parsing.
//!
//! Parses `blockedit.toml` (or an override path provided by the host):
//!
//! * `[commands] accept = [..]` restricts which commands the dispatcher runs
//!   (absent = all).
//! * `[keymap]` maps chord strings to command names on top of the default
//!   bindings; `"none"` removes a default.
//! * `[block_style]` names the block data key and class prefix used to derive
//!   a block's style class.
//!
//! Unknown fields are ignored. A missing file yields defaults; an unparsable
//! file yields defaults plus a `config` warning. Invalid command names or
//! chords are reported as errors when the dispatcher or keymap is built.

use anyhow::{Context, Result};
use core_actions::{CommandKind, Dispatcher};
use core_keymap::Keymap;
use core_model::{Block, style};
use core_state::DocumentEngine;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

const FILE_NAME: &str = "blockedit.toml";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CommandsConfig {
    /// Accepted command names; `None` accepts every command.
    #[serde(default)]
    pub accept: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlockStyleConfig {
    #[serde(default = "BlockStyleConfig::default_data_key")]
    pub data_key: String,
    #[serde(default = "BlockStyleConfig::default_class_prefix")]
    pub class_prefix: String,
}

impl Default for BlockStyleConfig {
    fn default() -> Self {
        Self {
            data_key: Self::default_data_key(),
            class_prefix: Self::default_class_prefix(),
        }
    }
}

impl BlockStyleConfig {
    fn default_data_key() -> String {
        style::TEXT_ALIGN_KEY.to_string()
    }
    fn default_class_prefix() -> String {
        style::ALIGN_CLASS_PREFIX.to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub commands: CommandsConfig,
    /// Chord string -> command name.
    #[serde(default)]
    pub keymap: BTreeMap<String, String>,
    #[serde(default)]
    pub block_style: BlockStyleConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub source: Option<PathBuf>,
}

/// Best-effort config path: `blockedit.toml` in the working directory, else
/// the platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("blockedit").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                keymap_overrides = file.keymap.len(),
                accept_filter = file.commands.accept.is_some(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Parsed `[commands] accept` list. `None` when absent.
    pub fn accepted_commands(&self) -> Result<Option<Vec<CommandKind>>> {
        let Some(names) = &self.file.commands.accept else {
            return Ok(None);
        };
        let kinds = names
            .iter()
            .map(|name| {
                name.parse::<CommandKind>()
                    .with_context(|| format!("in [commands] accept of {}", self.source_name()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(kinds))
    }

    /// Dispatcher over `engine` honouring the accept list.
    pub fn dispatcher<E: DocumentEngine>(&self, engine: E) -> Result<Dispatcher<E>> {
        let dispatcher = Dispatcher::new(engine);
        Ok(match self.accepted_commands()? {
            Some(kinds) => dispatcher.with_accepted(kinds),
            None => dispatcher,
        })
    }

    /// Default bindings with the `[keymap]` overrides applied.
    pub fn keymap(&self) -> Result<Keymap> {
        let overrides = self
            .file
            .keymap
            .iter()
            .map(|(chord, command)| (chord.as_str(), command.as_str()));
        Keymap::defaults()
            .with_overrides(overrides)
            .with_context(|| format!("in [keymap] of {}", self.source_name()))
    }

    /// Style class for `block` under the configured data key and prefix.
    pub fn block_class(&self, block: &Block) -> Option<String> {
        let style = &self.file.block_style;
        style::block_style_class(block, &style.data_key, &style.class_prefix)
    }

    fn source_name(&self) -> String {
        self.source
            .as_ref()
            .map_or_else(|| "defaults".to_string(), |p| p.display().to_string())
    }
}
