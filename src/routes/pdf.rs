//! PDF signing route
//!
//! Accepts a multipart upload with the PDF and the signature options and
//! answers with the signed PDF as an attachment.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use crate::error::{AppError, Result};
use crate::placement::SignaturePosition;
use crate::processor::SignRequest;
use crate::state::AppState;

const PDF_MIME: &str = "application/pdf";

/// Room for the non-file form fields on top of the PDF itself
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(max_file_size: usize) -> Router<AppState> {
    Router::new()
        .route("/api/process-pdf-with-position", post(process_pdf_with_position))
        .layer(DefaultBodyLimit::max(max_file_size.saturating_add(FORM_OVERHEAD_BYTES)))
}

struct UploadedPdf {
    filename: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct SignForm {
    pdf: Option<UploadedPdf>,
    signature_image_url: Option<String>,
    position_x: Option<String>,
    position_y: Option<String>,
    page: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

/// POST /api/process-pdf-with-position
async fn process_pdf_with_position(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let max_mb = state.config().max_file_size_mb();
    let max_bytes = state.config().server.max_file_size;
    let too_large = || AppError::PayloadTooLarge(format!("File too large. Maximum size is {}MB.", max_mb));
    let read_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large()
        } else {
            AppError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
        }
    };

    let mut form = SignForm::default();
    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "pdf" => {
                if field.content_type() != Some(PDF_MIME) {
                    return Err(AppError::BadRequest("Only PDF files are allowed".to_string()));
                }
                let filename = field.file_name().unwrap_or("document.pdf").to_string();
                let data = field.bytes().await.map_err(read_error)?;
                if data.len() > max_bytes {
                    return Err(too_large());
                }
                form.pdf = Some(UploadedPdf {
                    filename,
                    data: data.to_vec(),
                });
            }
            "signatureImageUrl" | "positionX" | "positionY" | "page" | "firstName" | "lastName" => {
                let value = field.text().await.map_err(read_error)?;
                let slot = match name.as_str() {
                    "signatureImageUrl" => &mut form.signature_image_url,
                    "positionX" => &mut form.position_x,
                    "positionY" => &mut form.position_y,
                    "page" => &mut form.page,
                    "firstName" => &mut form.first_name,
                    _ => &mut form.last_name,
                };
                *slot = non_blank(value);
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let pdf = form
        .pdf
        .ok_or_else(|| AppError::BadRequest("No PDF file provided".to_string()))?;
    let signature_image_url = form
        .signature_image_url
        .ok_or_else(|| AppError::BadRequest("Signature image URL is required".to_string()))?;
    if !signature_image_url.starts_with("http://") && !signature_image_url.starts_with("https://") {
        return Err(AppError::BadRequest(
            "Signature image URL must be an http(s) URL".to_string(),
        ));
    }

    let position = SignaturePosition {
        x: parse_coordinate("positionX", form.position_x.as_deref())?,
        y: parse_coordinate("positionY", form.position_y.as_deref())?,
        page: form
            .page
            .as_deref()
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid page: {}", raw)))
            })
            .transpose()?,
    };

    tracing::info!(
        filename = %pdf.filename,
        x = ?position.x,
        y = ?position.y,
        page = ?position.page,
        "Processing PDF with positioned signature"
    );

    let processed = state
        .processor()
        .process(
            pdf.data,
            pdf.filename,
            SignRequest {
                signature_image_url,
                position,
                first_name: form.first_name,
                last_name: form.last_name,
            },
        )
        .await?;

    let metadata = serde_json::to_string(&processed.metadata).unwrap_or_default();
    tracing::info!(
        filename = %processed.filename,
        bytes = processed.pdf.len(),
        metadata = %metadata,
        "Returning signed PDF"
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_filename(&processed.filename)
    );
    Ok((
        [
            (header::CONTENT_TYPE, PDF_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        processed.pdf,
    )
        .into_response())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_coordinate(field: &str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(AppError::BadRequest(format!("Invalid {}: {}", field, raw))),
    }
}

/// Printable ASCII only, without quotes or backslashes
fn header_safe_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}
