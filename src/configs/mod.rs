use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::{
    api::error,
    middlewares::AdminActions,
    modules::{
        admin::AdminGate,
        meme::{MemeService, MemeStore},
        upload::{SimulatedProbe, UploadConfig, UploadService},
    },
    ENV,
};

/// `log` goes through env_logger and tracing events through a fmt layer,
/// both filtered by `RUST_LOG` (`memewall=info` when unset).
pub fn init_logging() {
    dotenvy::dotenv().ok();

    if env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("memewall=info"))
        .try_init()
        .is_err()
    {
        return;
    }

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "memewall=info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false));
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        log::warn!("Tracing subscriber not installed: {}", e);
    }
}

/// Everything the views share, built once and passed around explicitly
pub struct AppContext {
    pub store: Arc<MemeStore>,
    pub memes: MemeService<MemeStore>,
    pub uploads: UploadService<MemeStore, SimulatedProbe>,
    pub gate: Arc<AdminGate>,
    pub admin: AdminActions<MemeStore, SimulatedProbe>,
}

impl AppContext {
    pub fn from_env() -> Result<Self, error::SystemError> {
        Self::build(AdminGate::from_env()?, UploadConfig::from_env(), ENV.seed_sample_data)
    }

    pub fn build(
        gate: AdminGate,
        upload_config: UploadConfig,
        seed_sample_data: bool,
    ) -> Result<Self, error::SystemError> {
        let store = Arc::new(MemeStore::new());
        let memes = MemeService::with_dependencies(store.clone());
        let probe = Arc::new(SimulatedProbe::new(upload_config.thumbnail_base_url.clone()));
        let uploads = UploadService::new(memes.clone(), probe, upload_config);
        let gate = Arc::new(gate);
        let admin = AdminActions::new(gate.clone(), memes.clone(), uploads.clone());

        if seed_sample_data {
            memes.seed_sample_data()?;
        }

        Ok(Self { store, memes, uploads, gate, admin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::admin::SessionConfig;
    use crate::modules::upload::UploadFile;

    fn gate() -> AdminGate {
        AdminGate::new("0919", SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
        log::info!("logging ready");
        tracing::info!("tracing ready");
    }

    #[test]
    fn test_seeded_context() {
        let ctx = AppContext::build(gate(), UploadConfig::default(), true).unwrap();
        assert_eq!(ctx.memes.count(), 3);
        assert_eq!(ctx.memes.get_all()[0].id, "sample-3");
    }

    #[test]
    fn test_empty_context() {
        let ctx = AppContext::build(gate(), UploadConfig::default(), false).unwrap();
        assert_eq!(ctx.memes.count(), 0);
        assert_eq!(ctx.store.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_views_share_one_store() {
        let ctx = AppContext::build(gate(), UploadConfig::default(), false).unwrap();
        ctx.gate.login("0919").unwrap();
        let meme = ctx.admin.upload(UploadFile::new("shared.mp4", 2048)).await.unwrap();
        assert_eq!(ctx.memes.get(&meme.id), Some(meme));
    }
}
