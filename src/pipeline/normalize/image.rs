use base64::Engine as _;
use serde_json::Value;

use crate::models::ImageRef;
use crate::pipeline::classifier::ClassifierResponse;

/// Where the analyzed image came from on the client side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Bytes uploaded by the browser; already displayable before the
    /// classifier answers.
    Upload(ImageRef),
    /// An image the classifier fetched itself from this URL.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImages {
    pub image: ImageRef,
    pub overlay: Option<ImageRef>,
}

/// Pick the displayed image and the optional overlay.
///
/// A local upload always wins over the classifier's `image_base64` echo.
/// Without one, the echo is used, then the source URL itself.
pub fn resolve_images(source: &ImageSource, response: &ClassifierResponse) -> ResolvedImages {
    let image = match source {
        ImageSource::Upload(local) => local.clone(),
        ImageSource::Url(url) => encoded_jpeg(response, "image_base64")
            .unwrap_or_else(|| ImageRef::remote(url)),
    };
    let overlay = encoded_jpeg(response, "gradcam_base64");

    ResolvedImages { image, overlay }
}

/// A non-empty, decodable base64 JPEG field.
fn encoded_jpeg(response: &ClassifierResponse, field: &str) -> Option<ImageRef> {
    let encoded = response.get(field).and_then(Value::as_str)?.trim();
    if encoded.is_empty() {
        return None;
    }
    if let Err(e) = base64::engine::general_purpose::STANDARD.decode(encoded) {
        tracing::warn!(field, error = %e, "Ignoring undecodable image payload");
        return None;
    }
    Some(ImageRef::from_base64_jpeg(encoded))
}
