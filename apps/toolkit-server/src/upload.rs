//! Multipart form collection
//!
//! Every tool reads its whole form up front: file parts go into a list keyed
//! by field name (repeated names are kept in upload order), text parts into
//! a map.

use crate::error::ServerError;
use axum::extract::Multipart;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn into_pair(self) -> (String, Vec<u8>) {
        (self.name, self.bytes)
    }
}

#[derive(Debug, Default)]
pub struct Form {
    files: Vec<(String, UploadedFile)>,
    fields: HashMap<String, String>,
}

impl Form {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ServerError> {
        let mut form = Form::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or("").to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.push((
                        field_name,
                        UploadedFile {
                            name: file_name,
                            bytes: bytes.to_vec(),
                        },
                    ));
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(field_name, text);
                }
            }
        }

        debug!(
            files = form.files.len(),
            fields = form.fields.len(),
            "multipart form read"
        );
        Ok(form)
    }

    /// All files sent under `field`, in upload order
    pub fn take_files(&mut self, field: &str) -> Vec<UploadedFile> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(name, _)| name == field);
        self.files = kept;
        taken.into_iter().map(|(_, file)| file).collect()
    }

    /// Like [`Form::take_files`] but at least one file is required
    pub fn require_files(&mut self, field: &str) -> Result<Vec<UploadedFile>, ServerError> {
        let files = self.take_files(field);
        if files.is_empty() {
            return Err(ServerError::Validation(format!(
                "Upload at least one file in '{}'",
                field
            )));
        }
        Ok(files)
    }

    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        let position = self.files.iter().position(|(name, _)| name == field)?;
        Some(self.files.remove(position).1)
    }

    pub fn require_file(&mut self, field: &str) -> Result<UploadedFile, ServerError> {
        self.take_file(field)
            .ok_or_else(|| ServerError::Validation(format!("Missing file '{}'", field)))
    }

    /// Trimmed text value; empty counts as absent
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require_text(&self, field: &str) -> Result<&str, ServerError> {
        self.text(field)
            .ok_or_else(|| ServerError::Validation(format!("Missing field '{}'", field)))
    }

    /// Parse a text value, falling back to `default` when absent
    pub fn parse_or<T: FromStr>(&self, field: &str, default: T) -> Result<T, ServerError> {
        match self.text(field) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                ServerError::Validation(format!("Invalid value '{}' for '{}'", raw, field))
            }),
        }
    }

    /// Every text field, trimmed
    pub fn fields(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Form {
        let file = |name: &str| UploadedFile {
            name: name.into(),
            bytes: vec![1],
        };
        Form {
            files: vec![
                ("files".into(), file("a.pdf")),
                ("mapping".into(), file("map.csv")),
                ("files".into(), file("b.pdf")),
            ],
            fields: HashMap::from([
                ("quality".into(), " 80 ".into()),
                ("prefix".into(), "   ".into()),
            ]),
        }
    }

    #[test]
    fn test_files_keep_upload_order() {
        let mut form = form();
        let names: Vec<String> = form.take_files("files").into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(form.require_file("mapping").unwrap().name, "map.csv");
        assert!(form.require_files("files").is_err());
    }

    #[test]
    fn test_text_parsing() {
        let form = form();
        assert_eq!(form.parse_or("quality", 75u8).unwrap(), 80);
        assert_eq!(form.parse_or("max_side", 1200u32).unwrap(), 1200);
        assert!(form.text("prefix").is_none());
        assert!(form.require_text("prefix").is_err());
        assert!(form.parse_or::<u8>("quality", 0).is_ok());
    }

    #[test]
    fn test_bad_number_is_validation_error() {
        let mut form = form();
        form.fields.insert("start".into(), "one".into());
        assert!(matches!(
            form.parse_or("start", 1u32),
            Err(ServerError::Validation(_))
        ));
    }
}
