use std::cmp::Ordering;

use crate::modules::meme::schema::{MemeCategory, MemeEntity, MemeStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(MemeStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    UploadDate,
    ViewCount,
    #[default]
    DownloadCount,
    TrendingScore,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "processing" => Ok(StatusFilter::Only(MemeStatus::Processing)),
            "processed" => Ok(StatusFilter::Only(MemeStatus::Processed)),
            "error" => Ok(StatusFilter::Only(MemeStatus::Error)),
            other => Err(format!("Unknown status '{other}'")),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "upload-date" => Ok(SortKey::UploadDate),
            "views" => Ok(SortKey::ViewCount),
            "downloads" => Ok(SortKey::DownloadCount),
            "score" | "trending" => Ok(SortKey::TrendingScore),
            "title" => Ok(SortKey::Title),
            other => Err(format!("Unknown sort key '{other}'")),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order '{other}'")),
        }
    }
}

/// Filter chips on the public grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridFilter {
    #[default]
    All,
    Category(MemeCategory),
}

impl std::str::FromStr for GridFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(GridFilter::All);
        }
        s.parse::<MemeCategory>().map(GridFilter::Category)
    }
}

/// Search, status filter and ordering used by the admin database view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemeQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

impl MemeQuery {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_by = key;
        self.order = order;
        self
    }

    pub fn matches(&self, meme: &MemeEntity) -> bool {
        let matches_status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => meme.status == status,
        };
        matches_status && matches_search(meme, &self.search.to_lowercase())
    }

    /// Derive the visible list from a snapshot without touching the snapshot
    pub fn apply(&self, memes: &[MemeEntity]) -> Vec<MemeEntity> {
        let mut visible: Vec<MemeEntity> =
            memes.iter().filter(|meme| self.matches(meme)).cloned().collect();

        let key = self.sort_by;
        match self.order {
            SortOrder::Asc => visible.sort_by(|a, b| compare_by(key, a, b)),
            SortOrder::Desc => visible.sort_by(|a, b| compare_by(key, b, a)),
        }
        visible
    }
}

fn matches_search(meme: &MemeEntity, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    meme.title.to_lowercase().contains(needle)
        || meme.original_filename.to_lowercase().contains(needle)
        || meme.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

pub(crate) fn compare_by(key: SortKey, a: &MemeEntity, b: &MemeEntity) -> Ordering {
    match key {
        SortKey::UploadDate => a.upload_date.cmp(&b.upload_date),
        SortKey::ViewCount => a.view_count.cmp(&b.view_count),
        SortKey::DownloadCount => a.download_count.cmp(&b.download_count),
        SortKey::TrendingScore => a.trending_score.cmp(&b.trending_score),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

/// Keep the `limit` largest entries by `key`. Ties keep their relative order.
pub(crate) fn top_by(mut memes: Vec<MemeEntity>, key: SortKey, limit: usize) -> Vec<MemeEntity> {
    memes.sort_by(|a, b| compare_by(key, b, a));
    memes.truncate(limit);
    memes
}
