use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::ANCIENT_GREEK;
use crate::error::{MaccabyteError, Result};
use crate::types::FeatureMode;

/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "maccabyte.toml";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// External analysis bridge process.
    #[default]
    Command,
    /// In-process deterministic engine; surface forms echo back as lemmas.
    Stub,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    pub program: String,
    pub args: Vec<String>,
    pub language: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            kind: EngineKind::Command,
            program: "maccabyte-cltk-bridge".to_string(),
            args: Vec::new(),
            language: ANCIENT_GREEK.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Characters per engine call; unset sends each text whole.
    pub chunk_size: Option<usize>,
    pub clean_text: bool,
    pub strip_punctuation: bool,
    pub alphabetic_lemmas_only: bool,
    pub results_file: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            chunk_size: None,
            clean_text: true,
            strip_punctuation: true,
            alphabetic_lemmas_only: true,
            results_file: PathBuf::from("analysis_results.txt"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompareConfig {
    pub mode: FeatureMode,
    pub top_n: usize,
    /// How many unique values per side the text report lists.
    pub unique_display_limit: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        CompareConfig {
            mode: FeatureMode::Lemma,
            top_n: 10,
            unique_display_limit: 10,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub analysis: AnalysisConfig,
    pub compare: CompareConfig,
}

impl Config {
    pub fn chunk_size(&self) -> Option<NonZeroUsize> {
        self.analysis.chunk_size.and_then(NonZeroUsize::new)
    }

    pub fn validate(&self, origin: &str) -> Result<()> {
        let invalid = |reason: &str| {
            Err(MaccabyteError::Config {
                path: origin.to_string(),
                reason: reason.to_string(),
            })
        };
        if self.engine.language.trim().is_empty() {
            return invalid("engine.language must not be empty");
        }
        if self.engine.kind == EngineKind::Command && self.engine.program.trim().is_empty() {
            return invalid("engine.program is required for the command engine");
        }
        if self.analysis.chunk_size == Some(0) {
            return invalid("analysis.chunk_size must be positive");
        }
        if self.compare.top_n == 0 {
            return invalid("compare.top_n must be positive");
        }
        Ok(())
    }
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config> {
    let origin = file_path.display().to_string();
    let contents = fs::read_to_string(file_path).map_err(|e| MaccabyteError::Config {
        path: origin.clone(),
        reason: format!("failed to read: {e}"),
    })?;
    let config: Config = toml::from_str(&contents).map_err(|e| MaccabyteError::Config {
        path: origin.clone(),
        reason: e.to_string(),
    })?;
    config.validate(&origin)?;
    debug!(path = %origin, "loaded configuration");
    Ok(config)
}

/// An explicit path must load; otherwise `maccabyte.toml` is used when present,
/// and built-in defaults when not.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config_from_file(path),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                load_config_from_file(fallback)
            } else {
                debug!("no configuration file found; using defaults");
                Ok(Config::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = write_config("");
        assert_eq!(load_config_from_file(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn reads_every_section() {
        let file = write_config(
            r#"
[engine]
kind = "command"
program = "python3"
args = ["bridges/cltk_bridge.py"]
language = "grc"

[analysis]
chunk_size = 500
strip_punctuation = false
results_file = "out/results.txt"

[compare]
mode = "pos"
top_n = 25
"#,
        );
        let config = load_config_from_file(file.path()).unwrap();

        assert_eq!(config.engine.program, "python3");
        assert_eq!(config.engine.args, vec!["bridges/cltk_bridge.py"]);
        assert_eq!(config.chunk_size(), NonZeroUsize::new(500));
        assert!(!config.analysis.strip_punctuation);
        assert!(config.analysis.clean_text);
        assert_eq!(config.analysis.results_file, PathBuf::from("out/results.txt"));
        assert_eq!(config.compare.mode, FeatureMode::Pos);
        assert_eq!(config.compare.top_n, 25);
        assert_eq!(config.compare.unique_display_limit, 10);
    }

    #[test]
    fn rejects_zero_top_n() {
        let file = write_config("[compare]\ntop_n = 0\n");
        let err = load_config_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("top_n"));
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let file = write_config("[analysis]\nchunk_size = 0\n");
        assert!(load_config_from_file(file.path()).is_err());
    }

    #[test]
    fn rejects_unknown_mode() {
        let file = write_config("[compare]\nmode = \"morph\"\n");
        assert!(matches!(
            load_config_from_file(file.path()),
            Err(MaccabyteError::Config { .. })
        ));
    }

    #[test]
    fn stub_engine_needs_no_program() {
        let file = write_config("[engine]\nkind = \"stub\"\nprogram = \"\"\n");
        let config = load_config_from_file(file.path()).unwrap();
        assert_eq!(config.engine.kind, EngineKind::Stub);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = resolve_config(Some(Path::new("/nonexistent/maccabyte.toml"))).unwrap_err();
        assert!(matches!(err, MaccabyteError::Config { .. }));
    }
}
