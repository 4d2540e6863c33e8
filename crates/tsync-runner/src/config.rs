use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tsync_core::{SyncError, SyncOptions};

use crate::util::resolve_path;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub project: ProjectConfig,
    pub tool: ToolConfig,
    pub download: DownloadConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    pub id: String,
    /// Where the translation tool runs, relative to the repo root.
    #[serde(default = "default_working_directory")]
    pub working_directory: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    pub program: String,
    /// The tool's own config file, looked up in the working directory.
    #[serde(default = "default_tool_config_file")]
    pub config_file: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DownloadConfig {
    pub output_directory: String,
    #[serde(default)]
    pub export_only_approved: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InstallConfig {
    #[serde(default)]
    pub target_directory: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { path: ".tsync/cache/download.json".to_string() }
    }
}

fn default_working_directory() -> String {
    ".".to_string()
}

fn default_tool_config_file() -> String {
    "crowdin.yml".to_string()
}

/// Command-line values that win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub export_only_approved: Option<bool>,
    pub output_directory: Option<PathBuf>,
}

impl Config {
    pub fn default_for_repo(project_id: &str) -> Self {
        Self {
            project: ProjectConfig {
                id: project_id.to_string(),
                working_directory: default_working_directory(),
            },
            tool: ToolConfig {
                program: "crowdin".to_string(),
                config_file: default_tool_config_file(),
            },
            download: DownloadConfig {
                output_directory: "build/generated/resources/crowdin".to_string(),
                export_only_approved: false,
            },
            install: InstallConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".tsync").join("tsync.toml")
    }

    pub fn working_directory(&self, repo_root: &Path) -> PathBuf {
        resolve_path(repo_root, &self.project.working_directory)
    }

    pub fn output_directory(&self, repo_root: &Path) -> PathBuf {
        resolve_path(repo_root, &self.download.output_directory)
    }

    pub fn install_target(&self, repo_root: &Path) -> Option<PathBuf> {
        self.install.target_directory.as_deref().map(|t| resolve_path(repo_root, t))
    }

    pub fn cache_path(&self, repo_root: &Path) -> PathBuf {
        resolve_path(repo_root, &self.cache.path)
    }

    pub fn program(&self) -> Result<&str, SyncError> {
        let program = self.tool.program.trim();
        if program.is_empty() {
            return Err(SyncError::config("tool.program is empty"));
        }
        Ok(program)
    }

    /// Resolve and validate the per-invocation options.
    pub fn resolve_options(&self, repo_root: &Path, overrides: &Overrides) -> Result<SyncOptions, SyncError> {
        self.program()?;
        if self.download.output_directory.trim().is_empty() && overrides.output_directory.is_none() {
            return Err(SyncError::config("download.output_directory is empty"));
        }
        let output = match &overrides.output_directory {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => repo_root.join(dir),
            None => self.output_directory(repo_root),
        };
        let approved = overrides.export_only_approved.unwrap_or(self.download.export_only_approved);
        let options = SyncOptions::new(self.working_directory(repo_root), output, approved);
        options.validate()?;
        Ok(options)
    }

    /// Upload never touches the output directory, so only the working directory is checked.
    pub fn resolve_upload_options(&self, repo_root: &Path) -> Result<SyncOptions, SyncError> {
        self.program()?;
        let options = SyncOptions::new(
            self.working_directory(repo_root),
            self.output_directory(repo_root),
            self.download.export_only_approved,
        );
        options.validate_working_directory()?;
        Ok(options)
    }
}
