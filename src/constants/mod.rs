/// Maximum number of entries returned by the trending strip
pub const TRENDING_LIMIT: usize = 20;
/// Maximum number of entries returned for one category
pub const CATEGORY_LIMIT: usize = 50;
/// Admin activity log keeps the newest entries only
pub const ACTIVITY_LOG_CAPACITY: usize = 100;
/// Trending score above which a meme is shown as hot
pub const HOT_SCORE_THRESHOLD: i64 = 90;

pub struct Env {
    pub admin_pin: String,
    pub session_timeout_secs: u64,
    pub max_upload_bytes: u64,
    pub upload_delay_ms: u64,
    pub processing_delay_ms: u64,
    pub seed_sample_data: bool,
}

impl Env {
    fn new() -> Self {
        let admin_pin = std::env::var("ADMIN_PIN").unwrap_or_else(|_| "0919".to_string());

        let session_timeout_secs = parse_var("SESSION_TIMEOUT_SECS", 30 * 60);
        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", 100 * 1024 * 1024);
        let upload_delay_ms = parse_var("UPLOAD_DELAY_MS", 1000);
        let processing_delay_ms = parse_var("PROCESSING_DELAY_MS", 2000);
        let seed_sample_data = parse_var("SEED_SAMPLE_DATA", true);

        Env {
            admin_pin,
            session_timeout_secs,
            max_upload_bytes,
            upload_delay_ms,
            processing_delay_ms,
            seed_sample_data,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            log::warn!("{key}={raw:?} is not valid, falling back to {default}");
            default
        }),
        Err(_) => default,
    }
}
