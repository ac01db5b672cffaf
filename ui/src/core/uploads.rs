//! Outfit intake: validated uploads and the bounded session gallery.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Hard cap on outfits held in a session.
pub const MAX_OUTFITS: usize = 5;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please upload an image file")]
    NotAnImage,
    #[error("You can upload at most {MAX_OUTFITS} outfits")]
    GalleryFull,
}

/// One uploaded outfit photo. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    /// Data URL rendered directly into `img` tags.
    pub preview_uri: String,
    pub added_at: String,
}

impl UploadedImage {
    fn new(name: String, mime: String, bytes: Vec<u8>) -> Self {
        let preview_uri = format!("data:{mime};base64,{}", BASE64.encode(&bytes));
        let added_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Self {
            id: format!("img_{}", Uuid::new_v4().simple()),
            name,
            mime,
            bytes,
            preview_uri,
            added_at,
        }
    }
}

/// Media type declared by the file name, if it is an accepted image format.
pub fn image_mime_for(name: &str) -> Option<&'static str> {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// The bounded list of uploaded outfits plus the explicit preview selection.
///
/// Selection is by id rather than by comparing preview payloads, so two
/// uploads with identical bytes stay distinct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gallery {
    images: Vec<UploadedImage>,
    selected_id: Option<String>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[UploadedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.images.len() >= MAX_OUTFITS
    }

    pub fn get(&self, image_id: &str) -> Option<&UploadedImage> {
        self.images.iter().find(|image| image.id == image_id)
    }

    pub fn selected(&self) -> Option<&UploadedImage> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn select(&mut self, image_id: &str) {
        if self.get(image_id).is_some() {
            self.selected_id = Some(image_id.to_string());
        }
    }

    /// Validates and appends one upload. The first image added to an empty
    /// gallery becomes the preview selection.
    pub fn add(&mut self, name: &str, bytes: Vec<u8>) -> Result<&UploadedImage, IntakeError> {
        let mime = image_mime_for(name).ok_or(IntakeError::NotAnImage)?;
        if self.is_full() {
            return Err(IntakeError::GalleryFull);
        }

        let image = UploadedImage::new(name.to_string(), mime.to_string(), bytes);
        if self.selected_id.is_none() {
            self.selected_id = Some(image.id.clone());
        }
        self.images.push(image);
        self.images.last().ok_or(IntakeError::GalleryFull)
    }

    /// Removes an image; the selection falls back to the first remaining
    /// image so the preview never points at a discarded upload.
    pub fn remove(&mut self, image_id: &str) -> Option<UploadedImage> {
        let position = self.images.iter().position(|image| image.id == image_id)?;
        let removed = self.images.remove(position);

        if self.selected_id.as_deref() == Some(image_id) {
            self.selected_id = self.images.first().map(|image| image.id.clone());
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery_with(count: usize) -> Gallery {
        let mut gallery = Gallery::new();
        for index in 0..count {
            gallery
                .add(&format!("outfit-{index}.jpg"), vec![index as u8])
                .expect("under cap");
        }
        gallery
    }

    #[test]
    fn rejects_non_image_files() {
        let mut gallery = Gallery::new();
        assert_eq!(
            gallery.add("notes.txt", vec![1, 2, 3]),
            Err(IntakeError::NotAnImage)
        );
        assert_eq!(gallery.add("archive", vec![1]), Err(IntakeError::NotAnImage));
        assert!(gallery.is_empty());
    }

    #[test]
    fn never_exceeds_the_cap() {
        let mut gallery = gallery_with(MAX_OUTFITS);
        assert!(gallery.is_full());
        assert_eq!(
            gallery.add("one-more.png", vec![9]),
            Err(IntakeError::GalleryFull)
        );
        assert_eq!(gallery.len(), MAX_OUTFITS);
    }

    #[test]
    fn batch_order_is_preserved() {
        let gallery = gallery_with(3);
        let names: Vec<&str> = gallery.images().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["outfit-0.jpg", "outfit-1.jpg", "outfit-2.jpg"]);
    }

    #[test]
    fn add_returns_the_stored_image() {
        let mut gallery = Gallery::new();
        let id = gallery.add("look.jpg", vec![1]).unwrap().id.clone();
        assert_eq!(
            gallery.get(&id).map(|image| image.name.as_str()),
            Some("look.jpg")
        );
    }

    #[test]
    fn ids_are_unique_even_for_identical_bytes() {
        let mut gallery = Gallery::new();
        let a = gallery.add("same.jpg", vec![7, 7]).unwrap().id.clone();
        let b = gallery.add("same.jpg", vec![7, 7]).unwrap().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn first_upload_is_selected() {
        let gallery = gallery_with(2);
        let first = gallery.images()[0].id.clone();
        assert_eq!(gallery.selected_id(), Some(first.as_str()));
    }

    #[test]
    fn removing_the_selection_falls_back_to_first_remaining() {
        let mut gallery = gallery_with(3);
        let first = gallery.images()[0].id.clone();
        let second = gallery.images()[1].id.clone();

        gallery.remove(&first);
        assert_eq!(gallery.selected_id(), Some(second.as_str()));
        assert_eq!(gallery.len(), 2);

        gallery.remove(&second);
        let third = gallery.images()[0].id.clone();
        assert_eq!(gallery.selected_id(), Some(third.as_str()));
    }

    #[test]
    fn preview_uri_is_a_data_url() {
        let mut gallery = Gallery::new();
        let image = gallery.add("look.webp", vec![0xAB, 0xCD]).unwrap();
        assert!(image.preview_uri.starts_with("data:image/webp;base64,"));
    }

    #[test]
    fn mime_detection_covers_accepted_formats() {
        assert_eq!(image_mime_for("a.JPG"), Some("image/jpeg"));
        assert_eq!(image_mime_for("b.jpeg"), Some("image/jpeg"));
        assert_eq!(image_mime_for("c.png"), Some("image/png"));
        assert_eq!(image_mime_for("d.webp"), Some("image/webp"));
        assert_eq!(image_mime_for("e.svg"), None);
    }
}
