use std::time::Duration;

use crate::ENV;

/// A file handed to the uploader (drag-and-drop or file picker)
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    /// MIME type reported by the picker, guessed from the extension when absent
    pub mime_type: Option<String>,
    pub size: u64,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, size: u64) -> Self {
        Self { filename: filename.into(), mime_type: None, size }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn resolved_mime_type(&self) -> String {
        match &self.mime_type {
            Some(mime) => mime.clone(),
            None => mime_guess::from_path(&self.filename).first_or_octet_stream().essence_str().to_string(),
        }
    }
}

/// File upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub allowed_mime_types: Vec<String>,
    pub base_url: String,
    pub thumbnail_base_url: String,
    /// Simulated transfer time before processing starts
    pub upload_delay: Duration,
    /// Simulated processing time
    pub processing_delay: Duration,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            max_file_size: ENV.max_upload_bytes,
            upload_delay: Duration::from_millis(ENV.upload_delay_ms),
            processing_delay: Duration::from_millis(ENV.processing_delay_ms),
            ..Default::default()
        }
    }

    /// Size limit as shown to the user, e.g. `100MB`
    pub fn max_size_label(&self) -> String {
        const MB: u64 = 1024 * 1024;
        if self.max_file_size >= MB && self.max_file_size % MB == 0 {
            format!("{}MB", self.max_file_size / MB)
        } else {
            format!("{} bytes", self.max_file_size)
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024 * 1024, // 100MB
            allowed_mime_types: vec!["video/mp4".to_string()],
            base_url: "/videos".to_string(),
            thumbnail_base_url: "/thumbnails".to_string(),
            upload_delay: Duration::from_millis(1000),
            processing_delay: Duration::from_millis(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_guessed_from_extension() {
        assert_eq!(UploadFile::new("clip.mp4", 1).resolved_mime_type(), "video/mp4");
        assert_eq!(UploadFile::new("clip.webm", 1).resolved_mime_type(), "video/webm");
        assert_eq!(UploadFile::new("clip", 1).resolved_mime_type(), "application/octet-stream");
    }

    #[test]
    fn test_explicit_mime_type_wins() {
        let file = UploadFile::new("clip.mp4", 1).with_mime_type("image/gif");
        assert_eq!(file.resolved_mime_type(), "image/gif");
    }

    #[test]
    fn test_max_size_label() {
        assert_eq!(UploadConfig::default().max_size_label(), "100MB");
        let odd = UploadConfig { max_file_size: 1500, ..Default::default() };
        assert_eq!(odd.max_size_label(), "1500 bytes");
    }
}
