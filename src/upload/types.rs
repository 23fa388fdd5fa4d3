use crate::error::UploadError;
use crate::utils::mime::{detect_mime_type, is_image};
use bytes::Bytes;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The image held in memory until it is submitted or cleared. Clones share
/// the buffer with the preview decoder and the upload body.
#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug)]
pub struct StagedFile {
    pub name: String,
    pub content_type: String,
    #[derivative(Debug = "ignore")]
    pub bytes: Bytes,
}

impl StagedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, deriving its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, detect_mime_type(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        is_image(&self.content_type)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Body of a successful `POST /process`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub original_text: String,
    pub translated_text: String,
    pub parsed_fields: ParsedFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Type of Information")]
    pub info_type: String,
    #[serde(
        rename = "Additional Information",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_info: Option<String>,
}

/// Body of `POST /contact`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "type")]
    pub info_type: String,
}

impl From<&ParsedFields> for ContactRequest {
    fn from(fields: &ParsedFields) -> Self {
        Self {
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            address: fields.address.clone(),
            info_type: fields.info_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactCard {
    pub result: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Shape of the JSON the server sends alongside error statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "original_text": "Hola",
        "translated_text": "Hello",
        "parsed_fields": {
            "Name": "Ana",
            "Phone": "555-1234",
            "Address": "Main St",
            "Type of Information": "ID Card",
            "Additional Information": "Date found: 2024-01-02"
        }
    }"#;

    #[test]
    fn decodes_full_response() {
        let result: ProcessingResult = serde_json::from_str(FULL).unwrap();
        assert_eq!(result.original_text, "Hola");
        assert_eq!(result.parsed_fields.info_type, "ID Card");
        assert_eq!(
            result.parsed_fields.additional_info.as_deref(),
            Some("Date found: 2024-01-02")
        );
    }

    #[test]
    fn additional_information_is_optional() {
        let body = r#"{"original_text":"","translated_text":"No text detected",
            "parsed_fields":{"Name":"Unknown","Phone":"Not found","Address":"Not found",
            "Type of Information":"Card","Additional Information":null}}"#;
        let result: ProcessingResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.parsed_fields.additional_info, None);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let body = r#"{"original_text":"a","translated_text":"b",
            "parsed_fields":{"Phone":"1","Address":"2","Type of Information":"3"}}"#;
        let err = serde_json::from_str::<ProcessingResult>(body).unwrap_err();
        assert!(err.to_string().contains("Name"), "{err}");
    }

    #[test]
    fn contact_request_uses_server_keys() {
        let result: ProcessingResult = serde_json::from_str(FULL).unwrap();
        let request = ContactRequest::from(&result.parsed_fields);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "ID Card");
        assert_eq!(json["name"], "Ana");
    }

    #[test]
    fn staged_file_debug_omits_bytes() {
        let file = StagedFile::new("photo.png", "image/png", vec![0u8; 4096]);
        let debug = format!("{file:?}");
        assert!(debug.contains("photo.png"));
        assert!(!debug.contains("bytes"));
        assert!(file.is_image());
        assert_eq!(file.size(), 4096);
    }

    #[test]
    fn clones_share_the_image_buffer() {
        let file = StagedFile::new("photo.png", "image/png", vec![7u8; 64]);
        let copy = file.clone();
        assert_eq!(copy.bytes.as_ptr(), file.bytes.as_ptr());

        let body = copy.bytes.clone();
        drop(copy);
        assert_eq!(body.as_ptr(), file.bytes.as_ptr());
    }

    #[test]
    fn from_path_detects_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let file = StagedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.content_type, "text/plain");
        assert!(!file.is_image());

        let missing = StagedFile::from_path(&dir.path().join("gone.png")).unwrap_err();
        assert!(matches!(missing, UploadError::Read { .. }));
    }
}
