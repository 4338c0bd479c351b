//! Résumé file → plain text. Thin adapter: the engine only ever sees the
//! extracted text; the original bytes are kept as an opaque blob for the
//! interviewer's résumé preview.

use bytes::Bytes;

use crate::errors::AppError;

/// Extracts plain text from an uploaded résumé. PDF via `pdf-extract`;
/// `text/plain` passed through. Anything else is rejected up front.
pub fn resume_text(content_type: &str, data: &Bytes) -> Result<String, AppError> {
    let text = match content_type {
        "application/pdf" => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| AppError::Extraction(format!("could not read PDF: {e}")))?,
        "text/plain" => String::from_utf8(data.to_vec())
            .map_err(|_| AppError::Extraction("text file is not valid UTF-8".to_string()))?,
        other => {
            return Err(AppError::Validation(format!(
                "Unsupported file type '{other}'. Please upload a PDF or plain-text resume."
            )))
        }
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Extraction(
            "no text could be extracted from the resume".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        let data = Bytes::from_static(b"Ada Lovelace\nada@example.com\nRust, Axum");
        let text = resume_text("text/plain", &data).unwrap();
        assert!(text.contains("Ada Lovelace"));
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let data = Bytes::from_static(b"whatever");
        let err = resume_text("image/png", &data).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_text_is_extraction_failure() {
        let data = Bytes::from_static(b"   \n  ");
        let err = resume_text("text/plain", &data).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
