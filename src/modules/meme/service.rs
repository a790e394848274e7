use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::error;
use crate::constants::{CATEGORY_LIMIT, TRENDING_LIMIT};
use crate::modules::meme::{
    model::{Counter, MemePatch, NewMeme},
    query::{top_by, GridFilter, MemeQuery, SortKey},
    repository::MemeRepository,
    schema::{MemeCategory, MemeEntity, MemeFormat, MemeStatus},
};
use crate::modules::notify::Subscription;

/// Store surface shared by every view: mutations go through the repository,
/// reads are derived from repository snapshots.
pub struct MemeService<R>
where
    R: MemeRepository + Send + Sync,
{
    repo: Arc<R>,
}

impl<R> Clone for MemeService<R>
where
    R: MemeRepository + Send + Sync,
{
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone() }
    }
}

impl<R> MemeService<R>
where
    R: MemeRepository + Send + Sync,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        info!("MemeService initialized with dependencies");
        MemeService { repo }
    }

    /// Insert a fully formed meme, newest first
    pub fn add(&self, meme: MemeEntity) -> Result<(), error::SystemError> {
        let id = meme.id.clone();
        self.repo.insert(meme)?;
        debug!("Meme {} added", id);
        Ok(())
    }

    /// Assign an id to an uploaded candidate and insert it. New uploads always
    /// start in the recent bucket with no downloads.
    pub fn add_new(&self, new_meme: NewMeme) -> Result<MemeEntity, error::SystemError> {
        new_meme.validate()?;

        let mut meme = new_meme.into_entity(format!("meme-{}", Uuid::now_v7()));
        meme.category = MemeCategory::Recent;

        self.repo.insert(meme.clone())?;
        info!("Meme {} created from {}", meme.id, meme.original_filename);
        Ok(meme)
    }

    /// Apply an edit. An unknown id is not an error.
    pub fn update(&self, id: &str, patch: MemePatch) -> Result<(), error::SystemError> {
        patch.validate()?;

        if !self.repo.update(id, &patch) {
            debug!("Update ignored, meme {} not found", id);
        }
        Ok(())
    }

    pub fn delete(&self, id: &str) -> usize {
        self.delete_many(&[id.to_string()])
    }

    pub fn delete_many(&self, ids: &[String]) -> usize {
        let removed = self.repo.delete_many(ids);
        info!("Deleted {} of {} requested meme(s)", removed, ids.len());
        removed
    }

    pub fn increment_view_count(&self, id: &str) -> Option<u64> {
        self.repo.increment(id, Counter::Views)
    }

    pub fn increment_download_count(&self, id: &str) -> Option<u64> {
        self.repo.increment(id, Counter::Downloads)
    }

    pub fn get(&self, id: &str) -> Option<MemeEntity> {
        self.repo.find_by_id(id)
    }

    pub fn get_all(&self) -> Vec<MemeEntity> {
        self.repo.find_all()
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    pub fn get_processed(&self) -> Vec<MemeEntity> {
        self.repo.find_all().into_iter().filter(MemeEntity::is_processed).collect()
    }

    /// Most downloaded processed memes for the landing page strip
    pub fn get_trending(&self) -> Vec<MemeEntity> {
        top_by(self.get_processed(), SortKey::DownloadCount, TRENDING_LIMIT)
    }

    pub fn get_by_category(&self, category: MemeCategory) -> Vec<MemeEntity> {
        let key = match category {
            MemeCategory::Trending => SortKey::TrendingScore,
            MemeCategory::Recent => SortKey::UploadDate,
            MemeCategory::MostDownloaded => SortKey::DownloadCount,
        };
        top_by(self.get_processed(), key, CATEGORY_LIMIT)
    }

    /// What the public grid wall shows for the selected filter chip
    pub fn grid(&self, filter: GridFilter) -> Vec<MemeEntity> {
        match filter {
            GridFilter::All => self.get_processed(),
            GridFilter::Category(category) => self.get_by_category(category),
        }
    }

    /// Admin database listing over every status
    pub fn query(&self, query: &MemeQuery) -> Vec<MemeEntity> {
        query.apply(&self.repo.find_all())
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[MemeEntity]) + Send + Sync + 'static,
    {
        self.repo.subscribe(Box::new(listener))
    }

    /// Fill an empty store with the demo memes shown on first visit
    pub fn seed_sample_data(&self) -> Result<usize, error::SystemError> {
        if self.repo.count() > 0 {
            return Ok(0);
        }

        let samples = sample_memes(chrono::Utc::now());
        let total = samples.len();
        for meme in samples {
            self.repo.insert(meme)?;
        }
        info!("Seeded {} sample memes", total);
        Ok(total)
    }
}

fn sample_memes(now: chrono::DateTime<chrono::Utc>) -> Vec<MemeEntity> {
    let processed = |id: &str, title: &str, filename: &str, days_ago: i64| MemeEntity {
        id: id.to_string(),
        title: title.to_string(),
        original_filename: filename.to_string(),
        upload_date: now - chrono::Duration::days(days_ago),
        file_size: String::new(),
        duration: String::new(),
        tags: Vec::new(),
        view_count: 0,
        download_count: 0,
        trending_score: 0,
        status: MemeStatus::Processed,
        thumbnail: String::new(),
        video_url: String::new(),
        format: MemeFormat::Mp4,
        category: MemeCategory::Recent,
        aspect_ratio: 1.0,
    };
    let tags = |tags: [&str; 3]| tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    // inserted in this order, each one prepended
    vec![
        MemeEntity {
            file_size: "3.2MB".to_string(),
            duration: "0:15".to_string(),
            tags: tags(["cat", "vibing", "music"]),
            view_count: 2300,
            download_count: 450,
            trending_score: 95,
            thumbnail: "https://images.pexels.com/photos/1404819/pexels-photo-1404819.jpeg?auto=compress&cs=tinysrgb&w=400&h=600".to_string(),
            video_url: "https://example.com/cat-vibing.mp4".to_string(),
            category: MemeCategory::Trending,
            aspect_ratio: 0.75,
            ..processed("sample-1", "Cat Vibing to Beat", "cat_vibing_beat.mp4", 1)
        },
        MemeEntity {
            file_size: "5.8MB".to_string(),
            duration: "0:23".to_string(),
            tags: tags(["fail", "compilation", "funny"]),
            view_count: 1800,
            download_count: 320,
            trending_score: 88,
            thumbnail: "https://images.pexels.com/photos/1170986/pexels-photo-1170986.jpeg?auto=compress&cs=tinysrgb&w=400&h=400".to_string(),
            video_url: "https://example.com/epic-fail.mp4".to_string(),
            category: MemeCategory::MostDownloaded,
            aspect_ratio: 1.0,
            ..processed("sample-2", "Epic Fail Compilation", "epic_fail_compilation.mp4", 2)
        },
        MemeEntity {
            file_size: "4.1MB".to_string(),
            duration: "0:18".to_string(),
            tags: tags(["dog", "dancing", "cute"]),
            view_count: 3100,
            download_count: 580,
            trending_score: 92,
            thumbnail: "https://images.pexels.com/photos/1805164/pexels-photo-1805164.jpeg?auto=compress&cs=tinysrgb&w=400&h=300".to_string(),
            video_url: "https://example.com/dancing-dog.mp4".to_string(),
            category: MemeCategory::Trending,
            aspect_ratio: 1.33,
            ..processed("sample-3", "Dancing Dog Meme", "dancing_dog_meme.mp4", 3)
        },
    ]
}
