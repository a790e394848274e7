use validator::Validate;

use crate::modules::meme::schema::{MemeCategory, MemeEntity, MemeFormat, MemeStatus};

/// Candidate meme produced by the uploader, before the store assigns an id
#[derive(Debug, Clone, Validate)]
pub struct NewMeme {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters long"))]
    pub title: String,
    #[validate(length(min = 1, message = "Original filename cannot be empty"))]
    pub original_filename: String,
    pub upload_date: chrono::DateTime<chrono::Utc>,
    pub file_size: String,
    pub duration: String,
    pub tags: Vec<String>,
    pub view_count: u64,
    pub trending_score: i64,
    pub status: MemeStatus,
    pub thumbnail: String,
    pub video_url: String,
    pub format: MemeFormat,
    pub category: MemeCategory,
    #[validate(range(exclusive_min = 0.0, message = "Aspect ratio must be positive"))]
    pub aspect_ratio: f64,
}

impl NewMeme {
    pub fn into_entity(self, id: String) -> MemeEntity {
        MemeEntity {
            id,
            title: self.title,
            original_filename: self.original_filename,
            upload_date: self.upload_date,
            file_size: self.file_size,
            duration: self.duration,
            tags: self.tags,
            view_count: self.view_count,
            download_count: 0,
            trending_score: self.trending_score,
            status: self.status,
            thumbnail: self.thumbnail,
            video_url: self.video_url,
            format: self.format,
            category: self.category,
            aspect_ratio: self.aspect_ratio,
        }
    }
}

/// Editable fields of a meme. Counters are not part of the patch: they only
/// move through the increment operations.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct MemePatch {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters long"))]
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub trending_score: Option<i64>,
    pub status: Option<MemeStatus>,
    pub category: Option<MemeCategory>,
    #[validate(length(min = 1, message = "Thumbnail cannot be empty"))]
    pub thumbnail: Option<String>,
    #[validate(length(min = 1, message = "Video url cannot be empty"))]
    pub video_url: Option<String>,
}

impl MemePatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn trending_score(mut self, score: i64) -> Self {
        self.trending_score = Some(score);
        self
    }

    pub fn status(mut self, status: MemeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: MemeCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the patch submitted by the admin edit dialog. Tags arrive as one
    /// comma separated string and an unparsable score counts as 0.
    pub fn from_edit_form(
        title: &str,
        tags_csv: &str,
        category: MemeCategory,
        trending_score: &str,
    ) -> Self {
        let tags = tags_csv
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect();

        MemePatch::default()
            .title(title.trim())
            .tags(tags)
            .category(category)
            .trending_score(trending_score.trim().parse().unwrap_or(0))
    }

    pub(crate) fn apply_to(&self, meme: &mut MemeEntity) {
        if let Some(title) = &self.title {
            meme.title = title.clone();
        }
        if let Some(tags) = &self.tags {
            meme.tags = tags.clone();
        }
        if let Some(score) = self.trending_score {
            meme.trending_score = score;
        }
        if let Some(status) = self.status {
            meme.status = status;
        }
        if let Some(category) = self.category {
            meme.category = category;
        }
        if let Some(thumbnail) = &self.thumbnail {
            meme.thumbnail = thumbnail.clone();
        }
        if let Some(video_url) = &self.video_url {
            meme.video_url = video_url.clone();
        }
    }
}

/// Which counter an interaction bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Downloads,
}
