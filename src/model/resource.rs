//! Embedded media resources.

use serde::{Deserialize, Serialize};

/// Image encodings that Word renders natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl MediaFormat {
    /// File extension used for the part name.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaFormat::Png => "png",
            MediaFormat::Jpeg => "jpeg",
            MediaFormat::Gif => "gif",
            MediaFormat::Bmp => "bmp",
        }
    }

    /// MIME type registered in `[Content_Types].xml`.
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaFormat::Png => "image/png",
            MediaFormat::Jpeg => "image/jpeg",
            MediaFormat::Gif => "image/gif",
            MediaFormat::Bmp => "image/bmp",
        }
    }

    /// Determine format from a part or file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(MediaFormat::Png),
            "jpg" | "jpeg" => Some(MediaFormat::Jpeg),
            "gif" => Some(MediaFormat::Gif),
            "bmp" => Some(MediaFormat::Bmp),
            _ => None,
        }
    }
}

/// A binary resource stored under `word/media/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub format: MediaFormat,

    /// Binary data
    #[serde(skip)]
    pub data: Vec<u8>,

    /// Size in bytes
    pub size: usize,

    /// Width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Resource {
    /// Create an image resource.
    pub fn image(format: MediaFormat, data: Vec<u8>) -> Self {
        let size = data.len();
        Self {
            format,
            data,
            size,
            width: None,
            height: None,
        }
    }

    /// Record the pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Part name inside the package for the given resource ID.
    pub fn part_name(&self, id: &str) -> String {
        format!("word/media/{}.{}", id, self.format.extension())
    }

    /// Target as referenced from `word/_rels/document.xml.rels`.
    pub fn relationship_target(&self, id: &str) -> String {
        format!("media/{}.{}", id, self.format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(MediaFormat::from_extension("PNG"), Some(MediaFormat::Png));
        assert_eq!(MediaFormat::from_extension("jpg"), Some(MediaFormat::Jpeg));
        assert_eq!(MediaFormat::from_extension("webp"), None);
    }

    #[test]
    fn test_resource_paths() {
        let resource = Resource::image(MediaFormat::Jpeg, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(resource.size, 3);
        assert_eq!(resource.part_name("image1"), "word/media/image1.jpeg");
        assert_eq!(resource.relationship_target("image1"), "media/image1.jpeg");
    }

    #[test]
    fn test_data_not_serialized() {
        let resource = Resource::image(MediaFormat::Png, vec![1, 2, 3]).with_dimensions(4, 5);
        let json = serde_json::to_string(&resource).unwrap();
        assert!(json.contains("\"format\":\"png\""));
        assert!(json.contains("\"width\":4"));
        assert!(!json.contains("data"));
    }
}
