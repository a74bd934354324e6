//! # Configuration
//!
//! Source list and output directory, resolved with the precedence
//! command line > `restc.yaml` > built-in default.
//!
//! ```yaml
//! sources:            # list, or one comma-separated string
//!   - schemas/vtn.ini
//! output_dir: generated
//! ```
//!
//! Relative paths in the config file are resolved against the file's own
//! directory; relative paths on the command line against the working
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;

use restc_schema::split_list;

/// Sources compiled when neither the command line nor a config file names any.
pub const DEFAULT_SOURCE_LIST: &str = "schemas/vtn.ini";

/// Config file picked up from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "restc.yaml";

/// `restc.yaml` contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Schema sources.
    #[serde(default)]
    pub sources: Option<SourceList>,
    /// Directory generated headers are written to.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// A source list written either as a YAML list or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SourceList {
    /// `sources: [a.ini, b.ini]`
    List(Vec<String>),
    /// `sources: a.ini,b.ini`
    Comma(String),
}

impl SourceList {
    /// Non-empty entries in order.
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Comma(list) => split_list(list).into_iter().map(str::to_string).collect(),
        }
    }
}

/// Source selection flags shared by `generate` and `check`.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Comma-separated schema sources (overrides the config file).
    #[arg(long, value_name = "LIST")]
    pub sources: Option<String>,

    /// Directory for generated headers (default: next to each source).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Schema sources in compile order.
    pub sources: Vec<PathBuf>,
    /// Output directory override.
    pub out_dir: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from flags and an optional config file.
    ///
    /// An explicit `config` path must exist; otherwise `restc.yaml` in the
    /// working directory is used when present.
    pub fn resolve(config: Option<&Path>, args: &SourceArgs) -> Result<Self> {
        let loaded = load_config(config)?;
        let (file, base) = match &loaded {
            Some((file, base)) => (Some(file), base.as_path()),
            None => (None, Path::new("")),
        };

        let sources: Vec<PathBuf> = if let Some(list) = &args.sources {
            split_list(list).into_iter().map(PathBuf::from).collect()
        } else if let Some(list) = file.and_then(|f| f.sources.as_ref()) {
            list.entries().into_iter().map(|s| base.join(s)).collect()
        } else {
            split_list(DEFAULT_SOURCE_LIST)
                .into_iter()
                .map(PathBuf::from)
                .collect()
        };
        if sources.is_empty() {
            bail!("no schema sources configured");
        }

        let out_dir = match (&args.out_dir, file.and_then(|f| f.output_dir.as_ref())) {
            (Some(dir), _) => Some(dir.clone()),
            (None, Some(dir)) => Some(base.join(dir)),
            (None, None) => None,
        };

        tracing::debug!(sources = sources.len(), out_dir = ?out_dir, "resolved settings");
        Ok(Self { sources, out_dir })
    }

    /// Create the output directory if one is configured.
    pub fn ensure_out_dir(&self) -> Result<()> {
        if let Some(dir) = &self.out_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Read a config file. Returns the parsed file and the directory relative
/// paths inside it are resolved against.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<(ConfigFile, PathBuf)>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(CONFIG_FILE);
            if !path.is_file() {
                tracing::debug!("no {CONFIG_FILE} in working directory");
                return Ok(None);
            }
            path
        }
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config file: {}", path.display()))?;
    let file: ConfigFile = serde_yaml::from_str(&text)
        .with_context(|| format!("invalid YAML in {}", path.display()))?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(Some((file, base)))
}
