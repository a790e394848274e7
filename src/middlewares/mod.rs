use std::sync::Arc;

use crate::{
    api::error,
    modules::{
        admin::{ActivityEntry, AdminGate},
        meme::{MemeEntity, MemePatch, MemeQuery, MemeRepository, MemeService},
        upload::{MediaProbe, UploadFile, UploadService},
    },
};

/// Curation operations, refused while the admin gate is locked. Every
/// outcome is written to the gate's activity log.
pub struct AdminActions<R, P>
where
    R: MemeRepository + Send + Sync,
    P: MediaProbe + Send + Sync,
{
    gate: Arc<AdminGate>,
    memes: MemeService<R>,
    uploads: UploadService<R, P>,
}

impl<R, P> Clone for AdminActions<R, P>
where
    R: MemeRepository + Send + Sync,
    P: MediaProbe + Send + Sync,
{
    fn clone(&self) -> Self {
        Self { gate: self.gate.clone(), memes: self.memes.clone(), uploads: self.uploads.clone() }
    }
}

impl<R, P> AdminActions<R, P>
where
    R: MemeRepository + Send + Sync,
    P: MediaProbe + Send + Sync,
{
    pub fn new(gate: Arc<AdminGate>, memes: MemeService<R>, uploads: UploadService<R, P>) -> Self {
        Self { gate, memes, uploads }
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    fn authenticate(&self) -> Result<(), error::Error> {
        if !self.gate.is_authenticated() {
            return Err(error::Error::unauthorized("Admin session required"));
        }
        Ok(())
    }

    pub async fn upload(&self, file: UploadFile) -> Result<MemeEntity, error::Error> {
        self.authenticate()?;
        let result = self.uploads.upload(file).await;
        self.record_upload(&result);
        Ok(result?)
    }

    /// Per-file results in input order; the batch itself only fails when locked
    pub async fn upload_many(
        &self,
        files: Vec<UploadFile>,
    ) -> Result<Vec<Result<MemeEntity, error::Error>>, error::Error> {
        self.authenticate()?;
        let results = self.uploads.upload_many(files).await;
        Ok(results
            .into_iter()
            .map(|result| {
                self.record_upload(&result);
                result.map_err(error::Error::from)
            })
            .collect())
    }

    pub fn edit(&self, id: &str, patch: MemePatch) -> Result<(), error::Error> {
        self.authenticate()?;
        match self.memes.update(id, patch) {
            Ok(()) => {
                self.gate.activity_log().success("Meme updated", format!("Updated meme {id}"));
                Ok(())
            }
            Err(e) => {
                self.gate.activity_log().error("Meme update failed", e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn delete(&self, id: &str) -> Result<usize, error::Error> {
        self.delete_many(&[id.to_string()])
    }

    pub fn delete_many(&self, ids: &[String]) -> Result<usize, error::Error> {
        self.authenticate()?;
        let removed = self.memes.delete_many(ids);
        self.gate
            .activity_log()
            .success("Memes deleted", format!("Deleted {} meme(s)", removed));
        Ok(removed)
    }

    /// Database listing over every status
    pub fn database(&self, query: &MemeQuery) -> Result<Vec<MemeEntity>, error::Error> {
        self.authenticate()?;
        Ok(self.memes.query(query))
    }

    pub fn activity(&self) -> Result<Vec<ActivityEntry>, error::Error> {
        self.authenticate()?;
        Ok(self.gate.activity_log().entries())
    }

    fn record_upload(&self, result: &Result<MemeEntity, error::SystemError>) {
        let log = self.gate.activity_log();
        match result {
            Ok(meme) => log.success(
                "File processed",
                format!("Successfully processed: {}", meme.original_filename),
            ),
            Err(e) => log.error("File processing error", e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::admin::{ActivityStatus, SessionConfig};
    use crate::modules::meme::{schema::fixtures::meme, MemeStatus, MemeStore, StatusFilter};
    use crate::modules::upload::{SimulatedProbe, UploadConfig};

    fn actions() -> (AdminActions<MemeStore, SimulatedProbe>, MemeService<MemeStore>) {
        let gate = Arc::new(AdminGate::new("0919", SessionConfig::default()).unwrap());
        let memes = MemeService::with_dependencies(Arc::new(MemeStore::new()));
        let uploads = UploadService::new(
            memes.clone(),
            Arc::new(SimulatedProbe::default()),
            UploadConfig::default(),
        );
        (AdminActions::new(gate, memes.clone(), uploads), memes)
    }

    #[tokio::test(start_paused = true)]
    async fn test_locked_gate_refuses_everything() {
        let (admin, memes) = actions();
        let kept = meme("keep");
        memes.add(kept.clone()).unwrap();

        let unauthorized = error::Error::unauthorized("Admin session required");
        assert_eq!(admin.upload(UploadFile::new("a.mp4", 1024)).await.unwrap_err(), unauthorized);
        assert_eq!(admin.upload_many(vec![]).await.unwrap_err(), unauthorized);
        assert_eq!(admin.edit("keep", MemePatch::default().title("x")).unwrap_err(), unauthorized);
        assert_eq!(admin.delete("keep").unwrap_err(), unauthorized);
        assert_eq!(admin.delete_many(&["keep".to_string()]).unwrap_err(), unauthorized);
        assert!(admin.activity().is_err());
        assert_eq!(admin.database(&MemeQuery::default()).unwrap_err(), unauthorized);

        assert_eq!(memes.get_all(), vec![kept]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlocked_gate_allows_curation() {
        let (admin, memes) = actions();
        memes.add(meme("a")).unwrap();
        memes.add(meme("b")).unwrap();
        admin.gate().login("0919").unwrap();

        admin.edit("a", MemePatch::default().title("Renamed")).unwrap();
        assert_eq!(memes.get("a").unwrap().title, "Renamed");

        assert_eq!(admin.delete_many(&["b".to_string(), "missing".to_string()]).unwrap(), 1);
        assert_eq!(memes.count(), 1);

        let entries = admin.activity().unwrap();
        assert_eq!(entries[0].action, "Memes deleted");
        assert_eq!(entries[1].action, "Meme updated");
    }

    #[tokio::test(start_paused = true)]
    async fn test_database_lists_every_status() {
        let (admin, memes) = actions();
        let mut failed = meme("failed");
        failed.status = MemeStatus::Error;
        memes.add(failed).unwrap();
        memes.add(meme("ok")).unwrap();
        admin.gate().login("0919").unwrap();

        assert_eq!(admin.database(&MemeQuery::default()).unwrap().len(), 2);
        let errors = admin
            .database(&MemeQuery::default().status(StatusFilter::Only(MemeStatus::Error)))
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, "failed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_uploads_are_logged_per_file() {
        let (admin, memes) = actions();
        admin.gate().login("0919").unwrap();

        let results = admin
            .upload_many(vec![UploadFile::new("good.mp4", 4096), UploadFile::new("bad.gif", 10)])
            .await
            .unwrap();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(error::Error::BadRequest(_))));
        assert_eq!(memes.count(), 1);

        let entries = admin.activity().unwrap();
        assert_eq!(entries[0].status, ActivityStatus::Error);
        assert_eq!(entries[1].message, "Successfully processed: good.mp4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_locks_actions_again() {
        let (admin, memes) = actions();
        memes.add(meme("a")).unwrap();
        admin.gate().login("0919").unwrap();
        admin.gate().logout();
        assert!(admin.delete("a").is_err());
        assert_eq!(memes.count(), 1);
    }
}
