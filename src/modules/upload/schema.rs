use serde::Serialize;

/// Where one upload is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStage {
    Uploading,
    Processing,
    Completed,
    Error,
}

/// Progress update published while an accepted file moves through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    pub upload_id: String,
    pub filename: String,
    pub stage: UploadStage,
    pub percent: u8,
    pub error: Option<String>,
    /// Id of the stored meme once processing completed
    pub meme_id: Option<String>,
}

/// Metadata read from the video itself
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedMedia {
    pub duration_secs: u64,
    pub aspect_ratio: f64,
    pub thumbnail: String,
}
