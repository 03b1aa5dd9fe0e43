//! Text Extractor: turns an uploaded PDF into plain text.
//!
//! Parsing is CPU-bound and `pdf-extract` is known to panic on some malformed
//! inputs, so the work runs on the blocking pool and a panic is reported as a
//! parse error instead of taking the worker down.

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[cfg_attr(feature = "pdf", allow(dead_code))]
    #[error("PDF parser not available")]
    Unavailable,

    #[cfg_attr(not(feature = "pdf"), allow(dead_code))]
    #[error("{0}")]
    Parse(String),
}

/// Extracts the text of every page and joins the non-empty ones with `\n`.
/// Returns an empty string when no page carries text.
pub async fn extract_text(bytes: Bytes) -> Result<String, ExtractionError> {
    #[cfg(feature = "pdf")]
    {
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| ExtractionError::Parse(e.to_string()))
        })
        .await
        .map_err(|e| ExtractionError::Parse(join_error_message(e)))??;

        Ok(join_pages(pages))
    }

    #[cfg(not(feature = "pdf"))]
    {
        let _ = bytes;
        Err(ExtractionError::Unavailable)
    }
}

#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(feature = "pdf")]
fn join_error_message(err: tokio::task::JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "PDF parser panicked".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Single-page PDF showing `text` in Helvetica, with a correct xref table.
    #[cfg(feature = "pdf")]
    pub(crate) fn minimal_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_offset = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.extend_from_slice(xref.as_bytes());
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }

    #[test]
    fn test_join_pages_skips_textless_pages() {
        let pages = vec![
            "Jane Doe\nEngineer".to_string(),
            String::new(),
            "  \n ".to_string(),
            "Skills: Rust".to_string(),
        ];
        assert_eq!(join_pages(pages), "Jane Doe\nEngineer\nSkills: Rust");
    }

    #[test]
    fn test_join_pages_all_empty_is_empty_string() {
        assert_eq!(join_pages(vec![String::new(), " ".to_string()]), "");
        assert_eq!(join_pages(vec![]), "");
    }

    #[cfg(feature = "pdf")]
    #[tokio::test]
    async fn test_garbage_bytes_are_a_parse_error() {
        let result = extract_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }

    #[cfg(feature = "pdf")]
    #[tokio::test]
    async fn test_extracts_page_text() {
        let pdf = minimal_pdf("Senior Rust Engineer");
        let text = extract_text(Bytes::from(pdf)).await.unwrap();
        assert!(text.contains("Senior Rust Engineer"), "extracted {text:?}");
    }

    #[cfg(not(feature = "pdf"))]
    #[tokio::test]
    async fn test_without_pdf_feature_is_unavailable() {
        let result = extract_text(Bytes::from_static(b"%PDF-1.4")).await;
        assert!(matches!(result, Err(ExtractionError::Unavailable)));
    }
}
