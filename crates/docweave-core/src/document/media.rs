//! Embedding images as media parts

use super::word::{MediaPart, Picture, Run, WordParts};
use crate::error::{DocweaveError, Result};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Content type for a file name, if it names an image format
pub fn image_content_type(file_name: &str) -> Option<&'static str> {
    // Query strings do not belong to the file name
    let name = file_name.split(['?', '#']).next().unwrap_or(file_name);
    ImageFormat::from_path(name).ok().map(|f| f.to_mime_type())
}

/// Add `bytes` as a media part and return a run showing it
///
/// The picture keeps the image's aspect ratio; `max_width` caps the width.
pub fn embed_image(
    parts: &mut WordParts,
    file_name: &str,
    bytes: Vec<u8>,
    max_width: Option<u32>,
) -> Result<Run> {
    let format = image::guess_format(&bytes).map_err(|e| DocweaveError::CustomTransformFailed(
        format!("{} is not a supported image: {}", file_name, e),
    ))?;
    let dimensions = ImageReader::with_format(Cursor::new(&bytes), format)
        .into_dimensions()
        .map_err(|e| {
            DocweaveError::CustomTransformFailed(format!("Cannot read {}: {}", file_name, e))
        })?;
    let (width, height) = scale(dimensions, max_width);

    let id = format!("media{}", parts.media.len() + 1);
    parts.media.push(MediaPart {
        id: id.clone(),
        file_name: file_name.to_string(),
        content_type: format.to_mime_type().to_string(),
        data: bytes,
    });

    Ok(Run {
        text: String::new(),
        style: None,
        picture: Some(Picture {
            media_id: id,
            width,
            height,
            description: Some(file_name.to_string()),
        }),
    })
}

fn scale((width, height): (u32, u32), max_width: Option<u32>) -> (u32, u32) {
    match max_width {
        Some(max) if max > 0 && width > max => {
            let scaled = (u64::from(height) * u64::from(max) / u64::from(width)).max(1);
            (max, scaled as u32)
        }
        _ => (width, height),
    }
}
