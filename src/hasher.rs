//! Artifact selection, download and checksumming.

use anyhow::Result;
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::download::Downloader;
use crate::error::PoetError;
use crate::index::{FileKind, PackageIndex, ReleaseFile};

/// A downloaded artifact and the SHA-256 of its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub url: String,
    /// Lowercase hex
    pub sha256: String,
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Pick the artifact to package: the sdist, else a pure-Python wheel.
pub fn select_artifact(files: &[ReleaseFile]) -> Option<&ReleaseFile> {
    files
        .iter()
        .find(|f| f.kind == FileKind::Sdist)
        .or_else(|| files.iter().find(|f| f.is_pure_wheel()))
}

/// Locates, downloads and hashes release artifacts.
pub struct ArtifactHasher<'a> {
    index: &'a dyn PackageIndex,
    downloader: &'a dyn Downloader,
}

impl<'a> ArtifactHasher<'a> {
    pub fn new(index: &'a dyn PackageIndex, downloader: &'a dyn Downloader) -> Self {
        Self { index, downloader }
    }

    /// Fetch the artifact for `name` at `version` and hash it.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_and_hash(&self, name: &str, version: &str) -> Result<Checksum> {
        let files = self.index.release_files(name, version).await?;
        let artifact = select_artifact(&files).ok_or_else(|| PoetError::NoMatchingRelease {
            name: name.to_string(),
            version: version.to_string(),
        })?;

        if artifact.kind != FileKind::Sdist {
            info!("{} {} has no sdist, using {}", name, version, artifact.filename);
        }
        debug!("Fetching {} for {} {}", artifact.filename, name, version);

        let bytes = self.downloader.fetch(&artifact.url).await?;
        let sha256 = sha256_hex(&bytes);

        if let Some(expected) = &artifact.sha256 {
            if !expected.eq_ignore_ascii_case(&sha256) {
                return Err(PoetError::ChecksumMismatch {
                    name: name.to_string(),
                    expected: expected.clone(),
                    actual: sha256,
                }
                .into());
            }
        }

        Ok(Checksum {
            url: artifact.url.clone(),
            sha256,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MockDownloader;
    use crate::index::MockPackageIndex;
    use mockall::predicate::eq;

    // sha256("hello world")
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn file(filename: &str, kind: FileKind, sha256: Option<&str>) -> ReleaseFile {
        ReleaseFile {
            filename: filename.into(),
            url: format!("https://files.example/{}", filename),
            kind,
            sha256: sha256.map(String::from),
        }
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(sha256_hex(b"hello world"), HELLO_SHA256);
        assert_eq!(sha256_hex(b"hello world"), sha256_hex(b"hello world"));
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_select_artifact_prefers_sdist() {
        let files = vec![
            file("six-1.16.0-py2.py3-none-any.whl", FileKind::BdistWheel, None),
            file("six-1.16.0.tar.gz", FileKind::Sdist, None),
        ];
        assert_eq!(select_artifact(&files).unwrap().filename, "six-1.16.0.tar.gz");
    }

    #[test]
    fn test_select_artifact_pure_wheel_fallback() {
        let files = vec![
            file("x-1.0-cp312-cp312-win_amd64.whl", FileKind::BdistWheel, None),
            file("x-1.0-py3-none-any.whl", FileKind::BdistWheel, None),
        ];
        assert_eq!(
            select_artifact(&files).unwrap().filename,
            "x-1.0-py3-none-any.whl"
        );
    }

    #[test]
    fn test_select_artifact_none() {
        let files = vec![file("x-1.0-cp312-cp312-win_amd64.whl", FileKind::BdistWheel, None)];
        assert!(select_artifact(&files).is_none());
        assert!(select_artifact(&[]).is_none());
    }

    #[tokio::test]
    async fn test_fetch_and_hash() {
        let mut index = MockPackageIndex::new();
        index
            .expect_release_files()
            .with(eq("six"), eq("1.16.0"))
            .returning(|_, _| {
                Ok(vec![file(
                    "six-1.16.0.tar.gz",
                    FileKind::Sdist,
                    Some(HELLO_SHA256),
                )])
            });
        let mut downloader = MockDownloader::new();
        downloader
            .expect_fetch()
            .with(eq("https://files.example/six-1.16.0.tar.gz"))
            .times(1)
            .returning(|_| Ok(b"hello world".to_vec()));

        let checksum = ArtifactHasher::new(&index, &downloader)
            .fetch_and_hash("six", "1.16.0")
            .await
            .unwrap();

        assert_eq!(checksum.url, "https://files.example/six-1.16.0.tar.gz");
        assert_eq!(checksum.sha256, HELLO_SHA256);
    }

    #[tokio::test]
    async fn test_fetch_and_hash_no_usable_file() {
        let mut index = MockPackageIndex::new();
        index.expect_release_files().returning(|_, _| Ok(vec![]));
        // Strict: nothing may be downloaded
        let downloader = MockDownloader::new();

        let err = ArtifactHasher::new(&index, &downloader)
            .fetch_and_hash("six", "1.16.0")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PoetError>(),
            Some(PoetError::NoMatchingRelease { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_and_hash_digest_mismatch() {
        let mut index = MockPackageIndex::new();
        index.expect_release_files().returning(|_, _| {
            Ok(vec![file("six-1.16.0.tar.gz", FileKind::Sdist, Some("00ff"))])
        });
        let mut downloader = MockDownloader::new();
        downloader
            .expect_fetch()
            .returning(|_| Ok(b"hello wor".to_vec()));

        let err = ArtifactHasher::new(&index, &downloader)
            .fetch_and_hash("six", "1.16.0")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PoetError>(),
            Some(PoetError::ChecksumMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_and_hash_download_failure() {
        let mut index = MockPackageIndex::new();
        index
            .expect_release_files()
            .returning(|_, _| Ok(vec![file("six-1.16.0.tar.gz", FileKind::Sdist, None)]));
        let mut downloader = MockDownloader::new();
        downloader.expect_fetch().returning(|url| {
            Err(PoetError::TransportFailure {
                url: url.to_string(),
                reason: "connection reset".into(),
            }
            .into())
        });

        let err = ArtifactHasher::new(&index, &downloader)
            .fetch_and_hash("six", "1.16.0")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PoetError>(),
            Some(PoetError::TransportFailure { .. })
        ));
    }
}
