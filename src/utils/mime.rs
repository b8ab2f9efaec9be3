//! MIME utilities for uploaded images

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

#[must_use]
pub fn canonicalize_mime(mime: &str) -> String {
    let main = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match main.as_str() {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    }
}

/// Picks the MIME type to declare when uploading the image.
///
/// A declared `image/*` content type wins; otherwise the type is guessed from
/// the filename, falling back to PNG.
#[must_use]
pub fn resolve_image_mime(content_type: Option<&str>, filename: &str) -> String {
    if let Some(declared) = content_type.map(canonicalize_mime) {
        if declared.starts_with("image/") {
            return declared;
        }
    }

    mime_guess::from_path(filename)
        .first()
        .map(|m| m.essence_str().to_string())
        .filter(|m| m.starts_with("image/"))
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_strips_params_and_aliases_jpg() {
        assert_eq!(canonicalize_mime("Image/JPG; charset=binary"), "image/jpeg");
        assert_eq!(canonicalize_mime(" image/png "), "image/png");
    }

    #[test]
    fn test_declared_image_type_wins() {
        assert_eq!(resolve_image_mime(Some("image/webp"), "scan.png"), "image/webp");
    }

    #[test]
    fn test_non_image_content_type_falls_back_to_extension() {
        assert_eq!(
            resolve_image_mime(Some("application/octet-stream"), "scan.jpg"),
            "image/jpeg"
        );
    }

    #[test]
    fn test_unknown_extension_defaults_to_png() {
        assert_eq!(resolve_image_mime(None, "scan.bin"), DEFAULT_IMAGE_MIME);
        assert_eq!(resolve_image_mime(None, "scan"), DEFAULT_IMAGE_MIME);
    }
}
