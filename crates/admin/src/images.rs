//! Image attachment for the product form.

use std::path::Path;

use queens_beauty_core::{CatalogGateway, GatewayError, ImageUpload};

/// Read an image file from disk into an upload.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or has no file name.
pub fn load_image(path: &Path) -> std::io::Result<ImageUpload> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "image path has no file name")
        })?
        .to_string();
    let bytes = std::fs::read(path)?;
    Ok(ImageUpload {
        content_type: content_type_for(&file_name).to_string(),
        file_name,
        bytes,
    })
}

/// MIME type from a file extension.
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// The image URL to store: an attached file is uploaded and wins over a
/// typed URL.
///
/// # Errors
///
/// Returns the gateway error if the upload fails.
pub async fn resolve_image<G: CatalogGateway>(
    gateway: &G,
    typed: Option<String>,
    file: Option<&ImageUpload>,
) -> Result<Option<String>, GatewayError> {
    match file {
        Some(upload) => {
            let url = gateway.upload_image(upload).await?;
            tracing::info!(file = %upload.file_name, %url, "Image uploaded");
            Ok(Some(url))
        }
        None => Ok(typed),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use queens_beauty_core::MemoryGateway;

    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("serum.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.b.webp"), "image/webp");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }

    #[test]
    fn test_load_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rose.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let upload = load_image(&path).unwrap();
        assert_eq!(upload.file_name, "rose.png");
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.bytes.len(), 4);
    }

    #[tokio::test]
    async fn test_file_wins_over_typed_url() {
        let gateway = MemoryGateway::default();
        let upload = ImageUpload {
            file_name: "rose.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1],
        };
        let url = resolve_image(&gateway, Some("https://cdn/typed.jpg".to_string()), Some(&upload))
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("memory://product-images/public/1_rose.png"));

        let url = resolve_image(&gateway, Some("https://cdn/typed.jpg".to_string()), None)
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://cdn/typed.jpg"));
    }
}
