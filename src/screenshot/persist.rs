//! Handing finished PNGs to storage

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::SaveLocation;

/// Stores an encoded screenshot under a suggested file name
#[allow(async_fn_in_trait)]
pub trait PersistCapability {
    /// Returns where the image ended up
    async fn save(&self, png: &[u8], suggested_name: &str) -> anyhow::Result<PathBuf>;
}

/// `<prefix>-<unix-time-ms>.png`
pub fn screenshot_filename(prefix: &str) -> String {
    format!("{prefix}-{}.png", chrono::Utc::now().timestamp_millis())
}

/// Saves into a directory through a temporary file that is renamed into place
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn for_location(location: SaveLocation) -> anyhow::Result<Self> {
        let dir = location
            .directory()
            .with_context(|| format!("No directory available for {location:?}"))?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PersistCapability for DirectorySink {
    async fn save(&self, png: &[u8], suggested_name: &str) -> anyhow::Result<PathBuf> {
        let dir = self.dir.clone();
        let path = dir.join(suggested_name);
        let png = png.to_vec();

        tokio::task::spawn_blocking(move || -> anyhow::Result<PathBuf> {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let mut file = tempfile::Builder::new()
                .prefix(".screenshot-")
                .suffix(".png")
                .tempfile_in(&dir)
                .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
            file.write_all(&png)
                .with_context(|| format!("Failed to write {}", file.path().display()))?;
            file.persist(&path)
                .with_context(|| format!("Failed to move screenshot to {}", path.display()))?;
            Ok(path)
        })
        .await?
    }
}

/// Write directly into `dir`, no temporary file
pub fn save_direct(dir: &Path, png: &[u8], name: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, png)
        .with_context(|| format!("Failed to write screenshot: {}", path.display()))?;
    Ok(path)
}

/// Try `primary`, then fall back to writing straight into `fallback_dir`
pub async fn save_with_fallback<P: PersistCapability>(
    primary: &P,
    fallback_dir: &Path,
    png: &[u8],
    name: &str,
) -> anyhow::Result<PathBuf> {
    match primary.save(png, name).await {
        Ok(path) => {
            log::info!("Screenshot saved to {}", path.display());
            Ok(path)
        }
        Err(err) => {
            log::warn!("Primary save failed, writing directly: {err:?}");
            let path = save_direct(fallback_dir, png, name)?;
            log::info!("Screenshot saved to {}", path.display());
            Ok(path)
        }
    }
}
