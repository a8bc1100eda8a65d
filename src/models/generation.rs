/// MIME type used when the caller does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Uploaded image bytes as received from the caller.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl Upload {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// The declared content type, or `image/png` when absent or blank.
    pub fn mime_type(&self) -> &str {
        match self.content_type.as_deref() {
            Some(declared) if !declared.trim().is_empty() => declared,
            _ => DEFAULT_MIME_TYPE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: &'static str,
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl GenerationRequest {
    pub fn new(prompt: &'static str, upload: Upload) -> Self {
        let mime_type = upload.mime_type().to_string();
        Self {
            prompt,
            data: upload.bytes,
            mime_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Text(String),
    /// The service answered but produced no usable text.
    Empty,
}

impl GenerationOutcome {
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            Some(text) if !text.is_empty() => GenerationOutcome::Text(text),
            _ => GenerationOutcome::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_defaults_to_png() {
        assert_eq!(Upload::new(vec![1u8], None).mime_type(), "image/png");
        assert_eq!(
            Upload::new(vec![1u8], Some(String::new())).mime_type(),
            "image/png"
        );
    }

    #[test]
    fn test_declared_mime_is_kept() {
        let upload = Upload::new(vec![1u8], Some("image/jpeg".to_string()));
        let request = GenerationRequest::new("prompt", upload);
        assert_eq!(request.mime_type, "image/jpeg");
        assert_eq!(request.data, vec![1u8]);
    }

    #[test]
    fn test_outcome_from_text() {
        assert_eq!(GenerationOutcome::from_text(None), GenerationOutcome::Empty);
        assert_eq!(
            GenerationOutcome::from_text(Some(String::new())),
            GenerationOutcome::Empty
        );
        assert_eq!(
            GenerationOutcome::from_text(Some(" [] ".to_string())),
            GenerationOutcome::Text(" [] ".to_string())
        );
    }
}
