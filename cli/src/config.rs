use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve where the database lives.
    ///
    /// An explicit path (from `--db` or `LARDER_DB`) wins; otherwise the
    /// per-user data directory is used. The containing directory is created.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        if let Some(db_path) = db_override {
            let data_dir = db_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            ensure_dir(&data_dir)?;
            return Ok(Config { db_path, data_dir });
        }

        let proj_dirs =
            ProjectDirs::from("", "", "larder").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        ensure_dir(&data_dir)?;

        let db_path = data_dir.join("larder.db");

        Ok(Config { db_path, data_dir })
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))
}
