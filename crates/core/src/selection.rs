use base64::Engine as _;
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// The currently selected image: raw bytes plus an inline preview URI.
/// Replaced wholesale on each selection, never partially mutated.
#[derive(Debug, Clone)]
pub struct ImageSelection {
    pub file_name: String,
    pub mime: String,
    pub data: Bytes,
    pub preview_data_uri: String,
}

impl ImageSelection {
    /// Returns `None` when the bytes do not sniff as an image.
    pub fn from_bytes(file_name: &str, data: Vec<u8>) -> Option<Self> {
        let kind = match infer::get(&data) {
            Some(kind) if kind.mime_type().starts_with("image/") => kind,
            _ => {
                debug!(file_name, "ignoring non-image selection");
                return None;
            }
        };
        let mime = kind.mime_type().to_string();
        let b64 = base64::engine::general_purpose::STANDARD.encode(&data);
        let preview_data_uri = format!("data:{};base64,{}", mime, b64);
        Some(Self {
            file_name: file_name.to_string(),
            mime,
            data: Bytes::from(data),
            preview_data_uri,
        })
    }

    /// Returns `None` when the file is absent, unreadable, or not an image.
    pub fn from_file(path: &Path) -> Option<Self> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                debug!(path = %path.display(), %err, "ignoring unreadable selection");
                return None;
            }
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(&file_name, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest payload infer recognizes as image/png.
    fn png_bytes() -> Vec<u8> {
        vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]
    }

    #[test]
    fn image_bytes_produce_a_data_uri_preview() {
        let sel = ImageSelection::from_bytes("cat.png", png_bytes()).unwrap();
        assert_eq!(sel.mime, "image/png");
        assert!(sel.preview_data_uri.starts_with("data:image/png;base64,"));
        assert_eq!(sel.file_name, "cat.png");
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        assert!(ImageSelection::from_bytes("notes.txt", b"hello world".to_vec()).is_none());
    }

    #[test]
    fn missing_file_is_rejected() {
        assert!(ImageSelection::from_file(Path::new("/nonexistent/cat.png")).is_none());
    }

    #[test]
    fn readable_image_file_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, png_bytes()).unwrap();
        let sel = ImageSelection::from_file(&path).unwrap();
        assert_eq!(sel.file_name, "photo.png");
        assert_eq!(&sel.data[..4], &[0x89, b'P', b'N', b'G']);
    }
}
