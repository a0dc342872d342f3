//! Multipart form reading for the product, category and bulk upload forms.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::backend::UploadFile;
use crate::error::AppError;

/// A fully buffered multipart submission.
///
/// File inputs left empty by the browser (no name, no bytes) are dropped.
#[derive(Debug, Default)]
pub(crate) struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadFile)>,
}

impl MultipartForm {
    pub(crate) async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(invalid)? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(ToString::to_string) {
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(invalid)?;
                if file_name.is_empty() || bytes.is_empty() {
                    continue;
                }
                form.files.push((
                    name,
                    UploadFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                ));
            } else {
                let value = field.text().await.map_err(invalid)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed text field, `None` when missing or blank.
    pub(crate) fn text(&self, name: &str) -> Option<String> {
        super::non_empty(self.fields.get(name).cloned())
    }

    /// Checkbox field.
    pub(crate) fn flag(&self, name: &str) -> bool {
        super::checked(self.fields.get(name).map(String::as_str))
    }

    /// Take every file submitted under `name`.
    pub(crate) fn take_files(&mut self, name: &str) -> Vec<UploadFile> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name);
        self.files = rest;
        taken.into_iter().map(|(_, file)| file).collect()
    }

    /// Take the first file submitted under `name`.
    pub(crate) fn take_file(&mut self, name: &str) -> Option<UploadFile> {
        self.take_files(name).into_iter().next()
    }
}

fn invalid(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid form data: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_take_files_by_field() {
        let mut form = MultipartForm {
            fields: HashMap::from([
                ("name".to_string(), "  Lamp ".to_string()),
                ("is_active".to_string(), "on".to_string()),
            ]),
            files: vec![
                ("images".to_string(), file("a.png")),
                ("file".to_string(), file("sheet.xlsx")),
                ("images".to_string(), file("b.png")),
            ],
        };

        assert_eq!(form.text("name").as_deref(), Some("Lamp"));
        assert!(form.flag("is_active"));
        assert!(!form.flag("is_featured"));

        let images = form.take_files("images");
        assert_eq!(images.len(), 2);
        assert_eq!(
            form.take_file("file").map(|f| f.file_name).as_deref(),
            Some("sheet.xlsx")
        );
        assert!(form.take_files("images").is_empty());
    }
}
