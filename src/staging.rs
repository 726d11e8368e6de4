//! Per-request staging directories for in-progress downloads.
//!
//! Every download request gets a freshly created, uniquely named
//! directory under the system temp root. The directory is owned by a
//! [`StagingDir`] guard and removed when the guard drops, on every exit
//! path including unwinding. Success responses move the guard into the
//! response body so teardown happens after the last chunk is streamed.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Basename the extractor writes its output under. The final artifact
/// is the first directory entry carrying this prefix.
pub const ARTIFACT_BASENAME: &str = "video";

/// Output path template for the extractor, rooted at `dir`. The
/// `%(ext)s` placeholder is expanded by the extractor itself.
pub fn output_template(dir: &Path) -> PathBuf {
    dir.join(format!("{ARTIFACT_BASENAME}.%(ext)s"))
}

/// Scoped staging directory, deleted with all contents on drop.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
}

impl StagingDir {
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("vidbox-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Locates the completed artifact among the directory's immediate
    /// entries. An entry named exactly `video.<preferred_ext>` wins;
    /// otherwise the lexicographically first entry with the `video`
    /// prefix is taken, so selection stays deterministic when the
    /// post-processor leaves auxiliary files behind.
    pub fn locate_artifact(&self, preferred_ext: &str) -> io::Result<Option<PathBuf>> {
        let preferred = format!("{ARTIFACT_BASENAME}.{preferred_ext}");
        let mut fallback: Option<String> = None;

        for entry in std::fs::read_dir(self.dir.path())? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if name == preferred {
                return Ok(Some(entry.path()));
            }
            if name.starts_with(ARTIFACT_BASENAME)
                && fallback.as_deref().is_none_or(|current| name < current)
            {
                fallback = Some(name.to_owned());
            }
        }

        Ok(fallback.map(|name| self.dir.path().join(name)))
    }
}
