//! Media types accepted for CV uploads and the download filename derived from them.

use mime::Mime;

/// Upload types the intake accepts for a CV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvMediaType {
    Pdf,
    Jpeg,
    Jpg,
}

impl CvMediaType {
    /// Matches the essence of a `Content-Type` value; parameters are ignored.
    pub fn parse(content_type: &str) -> Option<Self> {
        let parsed: Mime = content_type.trim().parse().ok()?;
        let essence = parsed.essence_str().to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" => Some(Self::Jpeg),
            "image/jpg" => Some(Self::Jpg),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Jpg => "image/jpg",
        }
    }
}

/// Extension taken from the subtype of a stored media type.
pub fn extension_for(media_type: &str) -> &str {
    match media_type.rfind('/') {
        Some(index) => &media_type[index + 1..],
        None => media_type,
    }
}

pub fn attachment_filename(media_type: &str) -> String {
    format!("cv.{}", extension_for(media_type))
}
