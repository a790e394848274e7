use crate::{
    api::error,
    modules::upload::{model::UploadFile, schema::ProbedMedia},
};

/// Reads duration, aspect ratio and a thumbnail from an uploaded video
#[async_trait::async_trait]
pub trait MediaProbe {
    async fn probe(&self, file: &UploadFile) -> Result<ProbedMedia, error::SystemError>;
}

/// Stand-in probe: nothing is decoded, metadata is derived from the file
/// name and size so repeated runs give the same result.
#[derive(Debug, Clone)]
pub struct SimulatedProbe {
    thumbnail_base_url: String,
    /// Assumed bitrate used to estimate the duration
    bytes_per_second: u64,
}

impl SimulatedProbe {
    pub fn new(thumbnail_base_url: impl Into<String>) -> Self {
        Self { thumbnail_base_url: thumbnail_base_url.into(), bytes_per_second: 256 * 1024 }
    }
}

impl Default for SimulatedProbe {
    fn default() -> Self {
        Self::new("/thumbnails")
    }
}

#[async_trait::async_trait]
impl MediaProbe for SimulatedProbe {
    async fn probe(&self, file: &UploadFile) -> Result<ProbedMedia, error::SystemError> {
        if file.size == 0 {
            return Err(error::SystemError::bad_request(format!(
                "{} contains no video data",
                file.filename
            )));
        }

        let duration_secs = (file.size / self.bytes_per_second).max(1);
        let lower = file.filename.to_lowercase();
        let aspect_ratio = if lower.contains("vertical") || lower.contains("portrait") {
            9.0 / 16.0
        } else if lower.contains("square") {
            1.0
        } else {
            16.0 / 9.0
        };
        let stem: String = lower
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();

        Ok(ProbedMedia {
            duration_secs,
            aspect_ratio,
            thumbnail: format!("{}/{}.jpg", self.thumbnail_base_url, stem),
        })
    }
}
