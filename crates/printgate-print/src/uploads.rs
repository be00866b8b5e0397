// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The upload directory: generated names, path containment, and listing.
//
// Uploaded and downloaded documents share one flat directory. Every stored
// file gets a random name so concurrent writers never collide, and lookups by
// caller-supplied name are confined to the directory.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;

use printgate_core::error::{PrintgateError, Result};
use printgate_core::StoredFile;

/// Extension used when none can be derived.
pub const FALLBACK_EXTENSION: &str = ".dat";

const MAX_EXTENSION_LEN: usize = 16;

/// Normalize a raw extension (with or without a dot) to `.ext`.
///
/// Accepts 1-16 ASCII alphanumerics, lowercased; anything else becomes `.dat`.
pub fn normalize_extension(raw: Option<&str>) -> String {
    let Some(ext) = raw.map(|e| e.trim_start_matches('.')) else {
        return FALLBACK_EXTENSION.to_owned();
    };
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        format!(".{}", ext.to_ascii_lowercase())
    } else {
        FALLBACK_EXTENSION.to_owned()
    }
}

/// Handle on the upload directory.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the directory (and parents) if missing.
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        debug!(dir = %self.root.display(), "upload directory ready");
        Ok(())
    }

    /// `<32 hex chars><ext>` with `ext` normalized.
    pub fn generated_name(ext: Option<&str>) -> String {
        format!("{}{}", Uuid::new_v4().simple(), normalize_extension(ext))
    }

    /// Resolve a caller-supplied name to an existing file inside the directory.
    ///
    /// The name must be relative and made of plain components only. The file
    /// must exist, and its canonical path must stay under the canonical
    /// directory so symlinks cannot point outside it.
    pub fn contain(&self, file_name: &str) -> Result<PathBuf> {
        let relative = Path::new(file_name);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain || relative.components().next().is_none() {
            return Err(PrintgateError::Validation(format!(
                "invalid fileName: {file_name}"
            )));
        }

        let candidate = self.root.join(relative);
        let absolute = std::path::absolute(&candidate)?;
        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_file() => {}
            _ => {
                return Err(PrintgateError::NotFound(
                    absolute.to_string_lossy().into_owned(),
                ));
            }
        }

        let canonical_root = self.root.canonicalize()?;
        let canonical_file = candidate.canonicalize()?;
        if !canonical_file.starts_with(&canonical_root) {
            return Err(PrintgateError::Validation(format!(
                "fileName escapes the upload directory: {file_name}"
            )));
        }
        Ok(absolute)
    }

    /// Store an uploaded file under a generated name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let name = Self::generated_name(ext.as_deref());
        tokio::fs::write(self.root.join(&name), bytes).await?;
        info!(original = original_name, stored = %name, size = bytes.len(), "file uploaded");
        Ok(StoredFile {
            name: original_name.to_owned(),
            path: name,
        })
    }

    /// Every regular file below the directory, sorted by relative path.
    pub fn list(&self) -> Result<Vec<StoredFile>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(StoredFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_dir() -> (tempfile::TempDir, UploadDir) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = UploadDir::new(tmp.path().join("uploads"));
        std::fs::create_dir_all(dir.path()).expect("mkdir");
        (tmp, dir)
    }

    #[test]
    fn extension_normalization() {
        assert_eq!(normalize_extension(Some(".PNG")), ".png");
        assert_eq!(normalize_extension(Some("pdf")), ".pdf");
        assert_eq!(normalize_extension(Some("")), ".dat");
        assert_eq!(normalize_extension(Some("tar.gz")), ".dat");
        assert_eq!(normalize_extension(Some("abcdefghijklmnopq")), ".dat");
        assert_eq!(normalize_extension(None), ".dat");
    }

    #[test]
    fn generated_names_are_unique_hex() {
        let a = UploadDir::generated_name(Some("png"));
        let b = UploadDir::generated_name(Some("png"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 32 + ".png".len());
        assert!(a[..32].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(a.ends_with(".png"));
    }

    #[test]
    fn contain_resolves_existing_file() {
        let (_tmp, dir) = upload_dir();
        std::fs::write(dir.path().join("report.pdf"), b"%PDF").expect("write");
        let path = dir.contain("report.pdf").expect("contained");
        assert!(path.is_absolute());
        assert!(path.ends_with("report.pdf"));
    }

    #[test]
    fn contain_reports_missing_file() {
        let (_tmp, dir) = upload_dir();
        assert!(matches!(
            dir.contain("missing.txt"),
            Err(PrintgateError::NotFound(_))
        ));
        std::fs::create_dir(dir.path().join("sub")).expect("mkdir");
        assert!(matches!(dir.contain("sub"), Err(PrintgateError::NotFound(_))));
    }

    #[test]
    fn contain_rejects_traversal() {
        let (tmp, dir) = upload_dir();
        std::fs::write(tmp.path().join("secret.txt"), b"x").expect("write");
        for name in ["../secret.txt", "/etc/passwd", "./report.pdf", "a/../b"] {
            assert!(
                matches!(dir.contain(name), Err(PrintgateError::Validation(_))),
                "{name} should be rejected"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn contain_rejects_symlink_escape() {
        let (tmp, dir) = upload_dir();
        let outside = tmp.path().join("outside.pdf");
        std::fs::write(&outside, b"%PDF").expect("write");
        std::os::unix::fs::symlink(&outside, dir.path().join("link.pdf")).expect("symlink");
        assert!(matches!(
            dir.contain("link.pdf"),
            Err(PrintgateError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn save_then_list() {
        let (_tmp, dir) = upload_dir();
        let stored = dir.save("Holiday Photo.JPG", b"jpeg").await.expect("save");
        assert_eq!(stored.name, "Holiday Photo.JPG");
        assert!(stored.path.ends_with(".jpg"));

        let nameless = dir.save("README", b"text").await.expect("save");
        assert!(nameless.path.ends_with(".dat"));

        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");
        std::fs::write(dir.path().join("nested").join("a.txt"), b"a").expect("write");

        let listed = dir.list().expect("list");
        assert_eq!(listed.len(), 3);
        assert!(listed.windows(2).all(|w| w[0].path <= w[1].path));
        assert!(listed.iter().any(|f| f.path == "nested/a.txt" && f.name == "a.txt"));
        assert!(listed.iter().any(|f| f.path == stored.path && f.name == stored.path));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_never_collide() {
        let (_tmp, dir) = upload_dir();
        let handles: Vec<_> = (0..200)
            .map(|i| {
                let dir = dir.clone();
                tokio::spawn(async move { dir.save("scan.pdf", format!("page {i}").as_bytes()).await })
            })
            .collect();

        let mut names = std::collections::HashSet::new();
        for handle in handles {
            let stored = handle.await.expect("join").expect("save");
            assert!(names.insert(stored.path));
        }
        assert_eq!(names.len(), 200);
        assert_eq!(dir.list().expect("list").len(), 200);
    }

    #[tokio::test]
    async fn ensure_creates_nested_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = UploadDir::new(tmp.path().join("a").join("b"));
        dir.ensure().await.expect("ensure");
        assert!(dir.path().is_dir());
        assert!(dir.list().expect("list").is_empty());
    }
}
