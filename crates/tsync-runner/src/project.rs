use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tsync_cache::{FsSnapshotStore, SnapshotStore};
use tsync_core::{SyncOptions, TaskReport};
use tsync_exec::{CommandRunner, ProcessRunner};

use crate::{doctor::doctor, install::install, Config, InstallReport, Overrides, StatusReport, Synchronizer};

/// A repo with a `.tsync/tsync.toml`, wired to real processes and the file cache.
pub struct Project {
    pub repo_root: PathBuf,
    pub cfg: Config,
    runner: Arc<dyn CommandRunner>,
    store: Arc<dyn SnapshotStore>,
}

impl Project {
    pub fn open(repo_root: PathBuf) -> Result<Self> {
        Self::open_with_runner(repo_root, Arc::new(ProcessRunner::new()))
    }

    pub fn open_with_runner(repo_root: PathBuf, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let cfg_path = Config::config_path(&repo_root);
        let cfg = if cfg_path.exists() {
            Config::load_from(&cfg_path)?
        } else {
            Config::default_for_repo(&project_id(&repo_root))
        };
        let store: Arc<dyn SnapshotStore> = Arc::new(FsSnapshotStore::new(cfg.cache_path(&repo_root)));
        Ok(Self { repo_root, cfg, runner, store })
    }

    pub fn init_repo(repo_root: &Path) -> Result<PathBuf> {
        let cfg_path = Config::config_path(repo_root);
        if !cfg_path.exists() {
            Config::default_for_repo(&project_id(repo_root)).save_to(&cfg_path)?;
        }
        Ok(cfg_path)
    }

    pub fn options(&self, overrides: &Overrides) -> Result<SyncOptions> {
        Ok(self.cfg.resolve_options(&self.repo_root, overrides)?)
    }

    pub fn synchronizer(&self) -> Result<Synchronizer> {
        let program = self.cfg.program()?;
        Ok(Synchronizer::new(self.runner.clone(), self.store.clone(), program))
    }

    pub fn doctor(&self) -> Result<String> {
        let program = self.cfg.program()?;
        let wd = self.cfg.working_directory(&self.repo_root);
        Ok(doctor(self.runner.as_ref(), program, &wd, &self.cfg.tool.config_file)?)
    }

    pub fn status(&self, overrides: &Overrides) -> Result<StatusReport> {
        self.synchronizer()?.status(&self.options(overrides)?)
    }

    pub fn download(&self, overrides: &Overrides, force: bool) -> Result<TaskReport> {
        self.synchronizer()?.download(&self.options(overrides)?, force)
    }

    pub fn upload(&self) -> Result<TaskReport> {
        let options = self.cfg.resolve_upload_options(&self.repo_root)?;
        self.synchronizer()?.upload(&options)
    }

    /// Copy the download output into `into`, or the configured install target.
    pub fn install(&self, into: Option<PathBuf>, overrides: &Overrides) -> Result<InstallReport> {
        let target = match into {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => self.repo_root.join(dir),
            None => self
                .cfg
                .install_target(&self.repo_root)
                .ok_or_else(|| anyhow!("no install target: pass --into or set install.target_directory"))?,
        };
        let options = self.options(overrides)?;
        install(&[&options.output_directory], &target)
    }
}

fn project_id(repo_root: &Path) -> String {
    repo_root.file_name().and_then(|s| s.to_str()).unwrap_or("repo").to_string()
}
