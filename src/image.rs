// Picking an image from disk - the CLI's stand-in for a file input widget

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::workflow::{ImageSource, SelectedImage};

/// A file chosen on disk, read eagerly so read errors surface at pick time
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
    image: SelectedImage,
}

impl FileImageSource {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        if bytes.is_empty() {
            bail!("Image {} is empty", path.display());
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let image = SelectedImage::sniffed(file_name, bytes);
        if !image.is_image() {
            // The backend decides what it can decode; just flag it
            warn!(
                path = %path.display(),
                media_type = %image.media_type(),
                "Selected file does not look like an image"
            );
        }

        Ok(Self { path, image })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }
}

impl ImageSource for FileImageSource {
    fn selected_file(&self) -> Option<SelectedImage> {
        Some(self.image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::FALLBACK_MEDIA_TYPE;
    use std::io::Write;

    const PNG_HEADER: [u8; 16] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[tokio::test]
    async fn test_open_sniffs_png() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&PNG_HEADER).unwrap();

        let source = FileImageSource::open(file.path()).await.unwrap();
        let image = source.selected_file().unwrap();

        assert_eq!(image.media_type(), "image/png");
        assert!(image.is_image());
        assert_eq!(image.len(), PNG_HEADER.len());
        assert!(image.file_name().ends_with(".png"));
    }

    #[tokio::test]
    async fn test_unknown_content_falls_back_to_octet_stream() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an image").unwrap();

        let source = FileImageSource::open(file.path()).await.unwrap();

        assert_eq!(source.image().media_type(), FALLBACK_MEDIA_TYPE);
        assert!(!source.image().is_image());
    }

    #[tokio::test]
    async fn test_missing_and_empty_files_are_errors() {
        assert!(FileImageSource::open("/nonexistent/face.png").await.is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(FileImageSource::open(file.path()).await.is_err());
    }
}
