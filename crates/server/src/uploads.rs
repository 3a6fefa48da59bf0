use axum::extract::multipart::Multipart;
use uuid::Uuid;

use crate::errors::JsonApiError;

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Persist the first file field of a multipart request under
/// `<uploads_dir>/<subdir>/` and return the public `/uploads/...` path.
pub async fn save_image(
    multipart: &mut Multipart,
    uploads_dir: &str,
    subdir: &str,
    max_bytes: usize,
) -> Result<String, JsonApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(JsonApiError::bad_request(format!(
                "unsupported image type '.{ext}'"
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| JsonApiError::bad_request(format!("failed to read upload: {e}")))?;
        if data.is_empty() {
            return Err(JsonApiError::bad_request("uploaded file is empty"));
        }
        if data.len() > max_bytes {
            return Err(JsonApiError::bad_request(format!(
                "file exceeds the {max_bytes} byte limit"
            )));
        }

        let stored_name = format!("{}.{ext}", Uuid::new_v4().simple());
        let disk_path = format!("{uploads_dir}/{subdir}/{stored_name}");
        tokio::fs::write(&disk_path, &data)
            .await
            .map_err(|e| JsonApiError::internal(format!("cannot write {disk_path}: {e}")))?;

        return Ok(format!("/uploads/{subdir}/{stored_name}"));
    }

    Err(JsonApiError::bad_request("No file uploaded"))
}
