//! Upload sources and blob keys

use std::path::PathBuf;
use uuid::Uuid;

/// Default blob key prefix for recipe photos
pub const DEFAULT_IMAGE_PREFIX: &str = "recipe_images";

/// Image picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image already held in memory
    Bytes(Vec<u8>),
    /// Image on the local filesystem, read at upload time
    File(PathBuf),
}

impl ImageSource {
    /// Read the full image contents
    ///
    /// # Errors
    /// Returns the I/O error if a file source cannot be read.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.clone()),
            Self::File(path) => tokio::fs::read(path).await,
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// Blob storage key, `<prefix>/<uuid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobKey(String);

impl BlobKey {
    /// Generate a fresh unique key under `prefix`
    #[inline]
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}/{}", prefix.trim_end_matches('/'), Uuid::new_v4()))
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn generated_keys_are_prefixed_and_unique() {
        let a = BlobKey::generate(DEFAULT_IMAGE_PREFIX);
        let b = BlobKey::generate("recipe_images/");

        assert!(a.as_str().starts_with("recipe_images/"));
        assert!(b.as_str().starts_with("recipe_images/"));
        assert!(!b.as_str().contains("//"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn reads_bytes_and_files() {
        let bytes = ImageSource::from(vec![1u8, 2, 3]);
        assert_eq!(bytes.read().await.unwrap(), vec![1, 2, 3]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"jpeg").unwrap();
        let source = ImageSource::from(file.path().to_path_buf());
        assert_eq!(source.read().await.unwrap(), b"jpeg".to_vec());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = ImageSource::File(PathBuf::from("/definitely/not/here.jpg"));
        assert!(source.read().await.is_err());
    }
}
