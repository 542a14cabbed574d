//! Configuration loading and parsing

use anyhow::{Context, Result};
use ere_instruct::{BuilderConfig, CorpusFormat, SamplingPolicy, TaskKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub task: TaskConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default = "default_format")]
    pub format: CorpusFormat,
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_splits")]
    pub splits: Vec<String>,
    /// Corpus file extension, e.g. `jsonl` for `train.jsonl`
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            dir: default_input_dir(),
            splits: default_splits(),
            extension: default_extension(),
        }
    }
}

impl InputConfig {
    /// Corpus file of a split
    pub fn split_path(&self, split: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", split, self.extension))
    }
}

fn default_format() -> CorpusFormat {
    CorpusFormat::Clustered
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_splits() -> Vec<String> {
    vec!["train".to_string(), "valid".to_string(), "test".to_string()]
}

fn default_extension() -> String {
    "jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Split that gets negative sampling and shuffling
    #[serde(default = "default_train_split")]
    pub train_split: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            train_split: default_train_split(),
        }
    }
}

impl OutputConfig {
    pub fn examples_path(&self, split: &str) -> PathBuf {
        self.dir.join(format!("{}.json", split))
    }

    pub fn ledger_path(&self, split: &str) -> PathBuf {
        self.dir.join(format!("{}_doc_split_num.json", split))
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/converted")
}

fn default_train_split() -> String {
    "train".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskConfig {
    #[serde(default = "default_task")]
    pub kind: TaskKind,
    /// Overrides the task's negative-to-positive ratio for the train split
    pub negative_ratio: Option<f64>,
    /// Overrides the task's cap on train examples
    pub max_examples: Option<usize>,
    /// Keep every train negative regardless of the task default
    #[serde(default)]
    pub keep_all_negatives: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            kind: default_task(),
            negative_ratio: None,
            max_examples: None,
            keep_all_negatives: false,
        }
    }
}

impl TaskConfig {
    /// Task default sampling with configured overrides applied
    pub fn sampling(&self) -> SamplingPolicy {
        let mut policy = self.kind.default_sampling();
        if self.keep_all_negatives {
            policy.negative_ratio = None;
        } else if let Some(ratio) = self.negative_ratio {
            policy.negative_ratio = Some(ratio);
        }
        if let Some(max) = self.max_examples {
            policy.max_examples = Some(max);
        }
        policy
    }
}

fn default_task() -> TaskKind {
    TaskKind::Causal
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .builder
        .validate()
        .with_context(|| format!("Invalid builder section in {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            format = "flat"
            dir = "data/processed/MATRES"
            splits = ["train", "test"]
            extension = "json"

            [output]
            dir = "data/converted/MATRES"

            [builder]
            window_capacity = 20
            seed = 7

            [task]
            kind = "temporal"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.format, CorpusFormat::Flat);
        assert_eq!(config.input.split_path("test"), PathBuf::from("data/processed/MATRES/test.json"));
        assert_eq!(config.builder.window_capacity, 20);
        assert_eq!(config.builder.max_path_hops, None);
        assert_eq!(config.task.kind, TaskKind::Temporal);
        assert_eq!(config.task.sampling().max_examples, Some(100_000));
        assert_eq!(
            config.output.ledger_path("test"),
            PathBuf::from("data/converted/MATRES/test_doc_split_num.json")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.splits, vec!["train", "valid", "test"]);
        assert_eq!(config.builder.seed, 42);
        assert_eq!(config.task.kind, TaskKind::Causal);
        assert_eq!(config.task.sampling().negative_ratio, Some(1.5));
    }

    #[test]
    fn test_sampling_overrides() {
        let task = TaskConfig {
            kind: TaskKind::Coreference,
            negative_ratio: Some(3.0),
            max_examples: Some(10),
            keep_all_negatives: false,
        };
        let policy = task.sampling();
        assert_eq!(policy.negative_ratio, Some(3.0));
        assert_eq!(policy.max_examples, Some(10));

        let keep_all = TaskConfig {
            keep_all_negatives: true,
            ..task
        };
        assert_eq!(keep_all.sampling().negative_ratio, None);
    }

    #[test]
    fn test_load_config_rejects_invalid_builder() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[builder]\nwindow_capacity = 0").unwrap();
        assert!(load_config(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[task]\nkind = \"subevent\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.task.kind, TaskKind::Subevent);
    }
}
