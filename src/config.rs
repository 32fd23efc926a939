// src/config.rs
//! Runtime configuration (TOML) with env overrides.
//!
//! Resolution:
//! 1) `$CMV_CONFIG_PATH` (must exist)
//! 2) `config/analysis.toml` if present
//! 3) built-in defaults
//!
//! Then `CMV_DATA_DIR`, `CMV_OUTPUT_DIR`, `CMV_TERMS_DIR` and `CMV_MATCH_MODE` override
//! the corresponding values.

use crate::analyze::Analyzer;
use crate::classify::Classifier;
use crate::delta::DeltaRules;
use crate::links::{HrefLinkExtractor, TextLinkExtractor};
use crate::normalize::{MatchMode, Normalizer};
use crate::terms::{compile_topics, EVIDENCE_CATEGORY, TOPICS_CATEGORY};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/analysis.toml";

pub const ENV_CONFIG_PATH: &str = "CMV_CONFIG_PATH";
pub const ENV_DATA_DIR: &str = "CMV_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "CMV_OUTPUT_DIR";
pub const ENV_TERMS_DIR: &str = "CMV_TERMS_DIR";
pub const ENV_MATCH_MODE: &str = "CMV_MATCH_MODE";

pub const DEFAULT_TOPICS: [&str; 7] = [
    "gender",
    "hot_topics",
    "lgbt",
    "moral",
    "politics",
    "race",
    "religion",
];
pub const DEFAULT_EVIDENCE: [&str; 6] = ["data", "economics", "evidence", "numbers", "stats", "values"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub paths: PathsCfg,
    pub classification: ClassificationCfg,
    pub delta: DeltaRules,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsCfg {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Holds `topics/` and `evidence-language/`.
    pub terms_dir: PathBuf,
}

impl Default for PathsCfg {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("data/coded"),
            terms_dir: PathBuf::from("terms"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    None,
    #[default]
    Href,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassificationCfg {
    pub match_mode: MatchMode,
    pub topics: Vec<String>,
    pub evidence: Vec<String>,
    pub links: LinkMode,
}

impl Default for ClassificationCfg {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            topics: DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect(),
            evidence: DEFAULT_EVIDENCE.iter().map(|s| s.to_string()).collect(),
            links: LinkMode::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AnalysisConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analysis config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing analysis config {}", path.display()))
    }

    /// Env var, then `config/analysis.toml`, then defaults; env overrides applied last.
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::from_path(&pb)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_path(Path::new(DEFAULT_CONFIG_PATH))?
        } else {
            Self::default()
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var(ENV_DATA_DIR) {
            self.paths.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var(ENV_OUTPUT_DIR) {
            self.paths.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var(ENV_TERMS_DIR) {
            self.paths.terms_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var(ENV_MATCH_MODE) {
            self.classification.match_mode = v
                .parse()
                .map_err(|e: String| anyhow!("{ENV_MATCH_MODE}: {e}"))?;
        }
        Ok(())
    }

    /// Load term lists and assemble the pipeline.
    pub fn build_analyzer(&self) -> Result<Analyzer> {
        let normalizer = Normalizer::default();
        let root = &self.paths.terms_dir;
        let topics = compile_topics(root, TOPICS_CATEGORY, &self.classification.topics, &normalizer)
            .with_context(|| format!("loading topic lists under {}", root.display()))?;
        let evidence = compile_topics(
            root,
            EVIDENCE_CATEGORY,
            &self.classification.evidence,
            &normalizer,
        )
        .with_context(|| format!("loading evidence lists under {}", root.display()))?;

        info!(
            topics = topics.len(),
            evidence = evidence.len(),
            mode = ?self.classification.match_mode,
            "term lists loaded"
        );

        let classifier = Classifier::new(normalizer, self.classification.match_mode);
        let analyzer =
            Analyzer::new(classifier, topics, evidence).with_delta_rules(self.delta.clone());
        Ok(match self.classification.links {
            LinkMode::None => analyzer,
            LinkMode::Href => analyzer.with_link_extractor(HrefLinkExtractor),
            LinkMode::Text => analyzer.with_link_extractor(TextLinkExtractor),
        })
    }
}
