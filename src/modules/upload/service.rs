use futures_util::future::join_all;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::meme::{
    MemeCategory, MemeEntity, MemeFormat, MemeRepository, MemeService, MemeStatus, NewMeme,
};
use crate::modules::notify::{ListenerRegistry, Subscription};
use crate::modules::upload::{
    model::{UploadConfig, UploadFile},
    probe::MediaProbe,
    schema::{UploadProgress, UploadStage},
};
use crate::utils::{format_duration, format_file_size, title_from_filename};

/// Percent reached by the simulated transfer before processing starts
const UPLOAD_TICKS: [u8; 4] = [10, 20, 30, 40];

pub struct UploadService<R, P>
where
    R: MemeRepository + Send + Sync,
    P: MediaProbe + Send + Sync,
{
    memes: MemeService<R>,
    probe: Arc<P>,
    config: UploadConfig,
    progress: Arc<ListenerRegistry<UploadProgress>>,
}

impl<R, P> Clone for UploadService<R, P>
where
    R: MemeRepository + Send + Sync,
    P: MediaProbe + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            memes: self.memes.clone(),
            probe: self.probe.clone(),
            config: self.config.clone(),
            progress: self.progress.clone(),
        }
    }
}

impl<R, P> UploadService<R, P>
where
    R: MemeRepository + Send + Sync,
    P: MediaProbe + Send + Sync,
{
    pub fn new(memes: MemeService<R>, probe: Arc<P>, config: UploadConfig) -> Self {
        Self { memes, probe, config, progress: Arc::new(ListenerRegistry::new()) }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Follow progress of every accepted upload
    pub fn on_progress<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UploadProgress) + Send + Sync + 'static,
    {
        self.progress.subscribe(listener)
    }

    /// Validate file type and size
    pub fn validate_file(&self, file: &UploadFile) -> Result<(), error::SystemError> {
        let mime_type = file.resolved_mime_type();
        if !self.config.allowed_mime_types.iter().any(|allowed| *allowed == mime_type) {
            return Err(error::SystemError::UnsupportedFormat {
                filename: file.filename.clone(),
                mime_type,
            });
        }

        if file.size > self.config.max_file_size {
            return Err(error::SystemError::FileTooLarge {
                filename: file.filename.clone(),
                size: file.size,
                max_label: self.config.max_size_label(),
            });
        }

        Ok(())
    }

    /// Validate, process and store one file. Rejected files never reach the store.
    pub async fn upload(&self, file: UploadFile) -> Result<MemeEntity, error::SystemError> {
        if let Err(rejection) = self.validate_file(&file) {
            log::warn!("Upload rejected: {}", rejection);
            return Err(rejection);
        }

        let upload_id = format!("upload-{}", Uuid::now_v7());
        match self.process(&upload_id, &file).await {
            Ok(meme) => {
                self.emit(&upload_id, &file, UploadStage::Completed, 100, None, Some(&meme.id));
                log::info!("Successfully processed: {}", file.filename);
                Ok(meme)
            }
            Err(e) => {
                self.emit(&upload_id, &file, UploadStage::Error, 0, Some(e.to_string()), None);
                log::error!("Failed to process {}: {}", file.filename, e);
                Err(e)
            }
        }
    }

    /// Upload a batch. Every file gets its own result, in input order; memes
    /// enter the store in the order their processing finishes.
    pub async fn upload_many(
        &self,
        files: Vec<UploadFile>,
    ) -> Vec<Result<MemeEntity, error::SystemError>> {
        join_all(files.into_iter().map(|file| self.upload(file))).await
    }

    async fn process(
        &self,
        upload_id: &str,
        file: &UploadFile,
    ) -> Result<MemeEntity, error::SystemError> {
        // Simulated transfer
        let tick = self.config.upload_delay / (UPLOAD_TICKS.len() as u32 + 1);
        self.emit(upload_id, file, UploadStage::Uploading, 0, None, None);
        for percent in UPLOAD_TICKS {
            tokio::time::sleep(tick).await;
            self.emit(upload_id, file, UploadStage::Uploading, percent, None, None);
        }
        tokio::time::sleep(tick).await;

        // Simulated processing
        self.emit(upload_id, file, UploadStage::Processing, 50, None, None);
        tokio::time::sleep(self.config.processing_delay).await;
        let media = self.probe.probe(file).await?;

        let new_meme = NewMeme {
            title: title_from_filename(&file.filename),
            original_filename: file.filename.clone(),
            upload_date: chrono::Utc::now(),
            file_size: format_file_size(file.size),
            duration: format_duration(media.duration_secs),
            tags: Vec::new(),
            view_count: 0,
            trending_score: random_trending_score(),
            status: MemeStatus::Processed,
            thumbnail: media.thumbnail,
            video_url: format!("{}/{}", self.config.base_url, upload_id),
            format: MemeFormat::Mp4,
            category: MemeCategory::Recent,
            aspect_ratio: media.aspect_ratio,
        };

        self.memes.add_new(new_meme)
    }

    fn emit(
        &self,
        upload_id: &str,
        file: &UploadFile,
        stage: UploadStage,
        percent: u8,
        error: Option<String>,
        meme_id: Option<&str>,
    ) {
        self.progress.notify(&UploadProgress {
            upload_id: upload_id.to_string(),
            filename: file.filename.clone(),
            stage,
            percent,
            error,
            meme_id: meme_id.map(str::to_string),
        });
    }
}

fn random_trending_score() -> i64 {
    rand::thread_rng().gen_range(0..100)
}
