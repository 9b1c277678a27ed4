use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Digest;

/// Writes posts into `<root>/content/journal/`.
pub struct JournalWriter {
    dir: PathBuf,
}

impl JournalWriter {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join("content").join("journal"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes through a temporary sibling so a failed write never leaves a
    /// truncated post behind. Existing files of the same name are replaced.
    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let staged = self.stage(file_name, content)?;
        self.commit(vec![staged]).map(|mut paths| paths.remove(0))
    }

    /// Stages every variant before renaming any of them, so a failed write
    /// leaves no variant of the day's digest in place.
    pub fn write_digest(&self, digest: &Digest) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let mut staged = Vec::with_capacity(digest.variants.len());
        for variant in &digest.variants {
            match self.stage(&digest.file_name(variant), &variant.post.render()) {
                Ok(entry) => staged.push(entry),
                Err(e) => {
                    discard(&staged);
                    return Err(e);
                }
            }
        }

        self.commit(staged)
    }

    fn stage(&self, file_name: &str, content: &str) -> Result<Staged> {
        let staged = Staged {
            tmp: self.dir.join(format!(".{}.tmp", file_name)),
            path: self.dir.join(file_name),
        };

        if let Err(e) = fs::write(&staged.tmp, content) {
            let _ = fs::remove_file(&staged.tmp);
            return Err(e.into());
        }
        Ok(staged)
    }

    fn commit(&self, staged: Vec<Staged>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(staged.len());
        for (idx, entry) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(&entry.tmp, &entry.path) {
                discard(&staged[idx..]);
                return Err(e.into());
            }
            tracing::info!("Wrote {}", entry.path.display());
            written.push(entry.path.clone());
        }
        Ok(written)
    }
}

struct Staged {
    tmp: PathBuf,
    path: PathBuf,
}

fn discard(staged: &[Staged]) {
    for entry in staged {
        let _ = fs::remove_file(&entry.tmp);
    }
}
