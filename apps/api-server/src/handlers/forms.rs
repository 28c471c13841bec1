//! Multipart form reading for post create/update requests.
//!
//! Fields: `title`, `content`, `author`, `category`, `featuredImage` (text)
//! and `image` (file). File uploads are validated here, at the boundary, so
//! oversized or non-image payloads never reach the write pipeline.

use actix_multipart::{Field, Multipart};
use actix_web::web::Bytes;
use futures_util::{Stream, StreamExt as _};

use quill_core::ports::Upload;

use crate::middleware::error::AppError;

/// Upload size cap: 5 MiB.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Decoded multipart body of a post create/update request.
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub featured_image: Option<String>,
    pub upload: Option<Upload>,
}

/// Read and validate a post form from a multipart payload.
pub async fn read_post_form(mut payload: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?;

        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or("").to_string();
        let filename = disposition.get_filename().map(str::to_owned);

        match name.as_str() {
            "image" => {
                let filename = filename.ok_or_else(|| {
                    AppError::BadRequest("Image field must carry a file".to_string())
                })?;
                check_extension(&filename)?;
                let bytes = read_file(&mut field).await?;
                form.upload = Some(Upload { filename, bytes });
            }
            "title" => form.title = Some(read_text(&mut field).await?),
            "content" => form.content = Some(read_text(&mut field).await?),
            "author" => form.author = Some(read_text(&mut field).await?),
            "category" => form.category = Some(read_text(&mut field).await?),
            "featuredImage" => form.featured_image = Some(read_text(&mut field).await?),
            other => {
                tracing::debug!(field = %other, "ignoring unknown form field");
                drain(&mut field).await?;
            }
        }
    }

    Ok(form)
}

fn check_extension(filename: &str) -> Result<(), AppError> {
    let extension = filename
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if filename.contains('.') && ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Invalid file type. Only JPG, JPEG, PNG, and WEBP are allowed.".to_string(),
        ))
    }
}

async fn read_file<S, E>(field: &mut S) -> Result<Vec<u8>, AppError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk =
            chunk.map_err(|e| AppError::BadRequest(format!("Upload interrupted: {e}")))?;
        if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(
                "Image exceeds the 5MB upload limit".to_string(),
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text<S, E>(field: &mut S) -> Result<String, AppError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let bytes = read_file(field).await?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest("Form fields must be valid UTF-8".to_string()))
}

async fn drain(field: &mut Field) -> Result<(), AppError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use futures_util::stream;

    use super::*;

    #[test]
    fn extension_check_accepts_images_case_insensitively() {
        assert!(check_extension("photo.PNG").is_ok());
        assert!(check_extension("photo.jpeg").is_ok());
    }

    #[test]
    fn extension_check_rejects_non_images() {
        assert!(check_extension("script.sh").is_err());
        assert!(check_extension("noextension").is_err());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        // Six 1 MiB chunks cross the 5 MiB cap mid-stream.
        let chunk = Bytes::from(vec![0u8; 1024 * 1024]);
        let chunks: Vec<Result<Bytes, Infallible>> =
            std::iter::repeat(chunk).take(6).map(Ok).collect();
        let mut payload = stream::iter(chunks);

        let err = read_file(&mut payload).await.unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert!(msg.contains("5MB")),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_at_the_cap_is_accepted() {
        let chunks: Vec<Result<Bytes, Infallible>> =
            vec![Ok(Bytes::from(vec![0u8; MAX_IMAGE_BYTES]))];
        let mut payload = stream::iter(chunks);

        let bytes = read_file(&mut payload).await.unwrap();
        assert_eq!(bytes.len(), MAX_IMAGE_BYTES);
    }

    #[tokio::test]
    async fn non_utf8_text_field_is_rejected() {
        let chunks: Vec<Result<Bytes, Infallible>> =
            vec![Ok(Bytes::from_static(&[0xff, 0xfe, 0xfd]))];
        let mut payload = stream::iter(chunks);

        assert!(matches!(
            read_text(&mut payload).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
