use serde::{Deserialize, Serialize};

use crate::constants::HOT_SCORE_THRESHOLD;

/// Pipeline stage of a meme video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemeStatus {
    Processing,
    Processed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemeFormat {
    Mp4,
    Webm,
    Gif,
}

impl MemeFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            MemeFormat::Mp4 => "mp4",
            MemeFormat::Webm => "webm",
            MemeFormat::Gif => "gif",
        }
    }
}

/// Curation bucket, independent of `MemeStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemeCategory {
    Trending,
    Recent,
    MostDownloaded,
}

impl MemeCategory {
    pub fn badge(&self) -> &'static str {
        match self {
            MemeCategory::Trending => "Trending",
            MemeCategory::Recent => "New",
            MemeCategory::MostDownloaded => "Popular",
        }
    }
}

impl std::str::FromStr for MemeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(MemeCategory::Trending),
            "recent" => Ok(MemeCategory::Recent),
            "most-downloaded" => Ok(MemeCategory::MostDownloaded),
            other => Err(format!("Unknown category '{other}'")),
        }
    }
}

/// Card height bucket picked from the video aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSize {
    Tall,
    Square,
    Wide,
}

/// One meme video tracked by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemeEntity {
    pub id: String,
    pub title: String,
    pub original_filename: String,
    pub upload_date: chrono::DateTime<chrono::Utc>,
    pub file_size: String,
    pub duration: String,
    pub tags: Vec<String>,
    pub view_count: u64,
    pub download_count: u64,
    pub trending_score: i64,
    pub status: MemeStatus,
    pub thumbnail: String,
    pub video_url: String,
    pub format: MemeFormat,
    pub category: MemeCategory,
    pub aspect_ratio: f64,
}

impl MemeEntity {
    pub fn is_processed(&self) -> bool {
        self.status == MemeStatus::Processed
    }

    pub fn is_hot(&self) -> bool {
        self.trending_score > HOT_SCORE_THRESHOLD
    }

    pub fn card_size(&self) -> CardSize {
        if self.aspect_ratio < 1.0 {
            CardSize::Tall
        } else if self.aspect_ratio > 1.2 {
            CardSize::Wide
        } else {
            CardSize::Square
        }
    }

    /// File name offered when the meme is downloaded in `format`
    pub fn download_filename(&self, format: MemeFormat) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}.{}", stem, format.extension())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_serializes_camel_case() {
        let mut meme = fixtures::meme("sample-1");
        meme.category = MemeCategory::MostDownloaded;
        let json = serde_json::to_value(&meme).unwrap();
        assert_eq!(json["originalFilename"], "sample-1.mp4");
        assert_eq!(json["category"], "most-downloaded");
        assert_eq!(json["status"], "processed");
        assert!(json.get("aspectRatio").is_some());
    }

    #[test]
    fn test_hot_threshold_is_exclusive() {
        let mut meme = fixtures::meme("a");
        meme.trending_score = 90;
        assert!(!meme.is_hot());
        meme.trending_score = 91;
        assert!(meme.is_hot());
    }

    #[test]
    fn test_card_size_from_aspect_ratio() {
        let mut meme = fixtures::meme("a");
        meme.aspect_ratio = 0.75;
        assert_eq!(meme.card_size(), CardSize::Tall);
        meme.aspect_ratio = 1.2;
        assert_eq!(meme.card_size(), CardSize::Square);
        meme.aspect_ratio = 1.33;
        assert_eq!(meme.card_size(), CardSize::Wide);
    }

    #[test]
    fn test_download_filename_replaces_symbols() {
        let mut meme = fixtures::meme("a");
        meme.title = "Cat Vibing to Beat!".to_string();
        assert_eq!(meme.download_filename(MemeFormat::Webm), "Cat_Vibing_to_Beat_.webm");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("most-downloaded".parse::<MemeCategory>(), Ok(MemeCategory::MostDownloaded));
        assert_eq!("Recent".parse::<MemeCategory>(), Ok(MemeCategory::Recent));
        assert!("viral".parse::<MemeCategory>().is_err());
    }
}
