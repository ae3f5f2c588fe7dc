//! One image type for both upload paths: face endpoints take a base64 data
//! URI in JSON, crop analysis takes a multipart file part.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;

use crate::error::ImageError;

/// Formats the backend's decoders accept.
const ACCEPTED_FORMATS: [ImageFormat; 6] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Gif,
    ImageFormat::Tiff,
];

/// Raw image bytes plus the format sniffed from their header.
#[derive(Clone, PartialEq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    format: ImageFormat,
    file_name: String,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImagePayload {
    pub fn from_bytes(bytes: Vec<u8>, file_name: Option<&str>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let format = image::guess_format(&bytes)
            .map_err(|e| ImageError::UnsupportedFormat(e.to_string()))?;
        if !ACCEPTED_FORMATS.contains(&format) {
            return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
        }

        let file_name = match file_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("image.{}", primary_extension(format)),
        };

        Ok(Self {
            bytes,
            format,
            file_name,
        })
    }

    /// Reads an image from disk, standing in for a camera or gallery pick.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path).map_err(|e| ImageError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path.file_name().and_then(|n| n.to_str());
        Self::from_bytes(bytes, file_name)
    }

    /// Parses `data:<mime>;base64,<payload>`. The declared mime type is
    /// ignored in favour of the sniffed one.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let (header, payload) = uri
            .split_once(',')
            .ok_or_else(|| ImageError::InvalidDataUri("missing ',' separator".to_string()))?;
        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return Err(ImageError::InvalidDataUri(format!(
                "expected 'data:<mime>;base64' header, got '{}'",
                header
            )));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::InvalidDataUri(e.to_string()))?;
        Self::from_bytes(bytes, None)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }

    pub fn to_multipart_part(&self) -> Result<reqwest::multipart::Part, ImageError> {
        reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.mime_type())
            .map_err(|e| ImageError::UnsupportedFormat(e.to_string()))
    }
}

fn primary_extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    fn fake_jpeg() -> Vec<u8> {
        let mut bytes = JPEG_HEADER.to_vec();
        bytes.extend_from_slice(b"rest of the jpeg");
        bytes
    }

    #[test]
    fn detects_jpeg_and_names_it() {
        let img = ImagePayload::from_bytes(fake_jpeg(), None).unwrap();
        assert_eq!(img.format(), ImageFormat::Jpeg);
        assert_eq!(img.mime_type(), "image/jpeg");
        assert!(img.file_name().starts_with("image."));
    }

    #[test]
    fn keeps_given_file_name() {
        let img = ImagePayload::from_bytes(PNG_HEADER.to_vec(), Some("leaf.png")).unwrap();
        assert_eq!(img.file_name(), "leaf.png");
        assert_eq!(img.mime_type(), "image/png");
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(
            ImagePayload::from_bytes(Vec::new(), None),
            Err(ImageError::Empty)
        ));
    }

    #[test]
    fn unknown_bytes_are_rejected() {
        assert!(matches!(
            ImagePayload::from_bytes(b"just some text".to_vec(), None),
            Err(ImageError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn data_uri_carries_sniffed_mime() {
        let img = ImagePayload::from_bytes(fake_jpeg(), None).unwrap();
        let uri = img.to_data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));

        let back = ImagePayload::from_data_uri(&uri).unwrap();
        assert_eq!(back.bytes(), img.bytes());
    }

    #[test]
    fn malformed_data_uri() {
        assert!(matches!(
            ImagePayload::from_data_uri("image/jpeg;base64"),
            Err(ImageError::InvalidDataUri(_))
        ));
        assert!(matches!(
            ImagePayload::from_data_uri("data:image/jpeg,plain"),
            Err(ImageError::InvalidDataUri(_))
        ));
    }

    #[test]
    fn reads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&fake_jpeg()).unwrap();

        let img = ImagePayload::from_path(file.path()).unwrap();
        assert_eq!(img.len(), fake_jpeg().len());
    }

    #[test]
    fn multipart_part_builds() {
        let img = ImagePayload::from_bytes(fake_jpeg(), Some("beans.jpg")).unwrap();
        assert!(img.to_multipart_part().is_ok());
    }
}
