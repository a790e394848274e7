use crate::{
    api::error,
    configs::AppContext,
    console::route::{Command, HELP},
    modules::{
        admin::{ActivityEntry, ActivityStatus, PinPrompt},
        meme::{MemeEntity, MemeFormat, MemePatch, MemeQuery, MemeStatus, StatusFilter},
        upload::UploadFile,
    },
};

/// What the console prints after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

fn card(meme: &MemeEntity) -> String {
    let hot = if meme.is_hot() { " HOT" } else { "" };
    format!(
        "{:<24} {:<32} [{}{}] {:?} {} views {} downloads {} {}",
        meme.id,
        meme.title,
        meme.category.badge(),
        hot,
        meme.card_size(),
        meme.view_count,
        meme.download_count,
        meme.duration,
        meme.file_size,
    )
}

fn cards(memes: &[MemeEntity]) -> String {
    if memes.is_empty() {
        return "No memes found".to_string();
    }
    memes.iter().map(card).collect::<Vec<_>>().join("\n")
}

fn log_line(entry: &ActivityEntry) -> String {
    let status = match entry.status {
        ActivityStatus::Success => "ok ",
        ActivityStatus::Error => "err",
    };
    format!(
        "{} {} {:<24} {} ({})",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        status,
        entry.action,
        entry.message,
        entry.user
    )
}

pub async fn handle(ctx: &AppContext, command: Command) -> Result<Reply, error::Error> {
    let text = match command {
        Command::Help => HELP.to_string(),
        Command::List(filter) => cards(&ctx.memes.grid(filter)),
        Command::Hot => cards(&ctx.memes.get_trending()),
        Command::Search(term) => {
            let query = MemeQuery::default()
                .search(term)
                .status(StatusFilter::Only(MemeStatus::Processed));
            cards(&ctx.memes.query(&query))
        }
        Command::View(id) => {
            ctx.memes
                .increment_view_count(&id)
                .ok_or_else(|| error::Error::not_found(format!("Meme {id} not found")))?;
            let meme = ctx
                .memes
                .get(&id)
                .ok_or_else(|| error::Error::not_found(format!("Meme {id} not found")))?;
            serde_json::to_string_pretty(&meme).map_err(error::SystemError::from)?
        }
        Command::Download(id) => {
            let count = ctx
                .memes
                .increment_download_count(&id)
                .ok_or_else(|| error::Error::not_found(format!("Meme {id} not found")))?;
            let meme = ctx
                .memes
                .get(&id)
                .ok_or_else(|| error::Error::not_found(format!("Meme {id} not found")))?;
            format!(
                "Downloading {} from {} ({} downloads)",
                meme.download_filename(MemeFormat::Mp4),
                meme.video_url,
                count
            )
        }
        Command::Login(pin) => {
            let mut prompt = PinPrompt::new();
            prompt.push_input(&pin);
            if !prompt.can_submit() {
                return Err(error::Error::bad_request("Enter the 4-digit PIN"));
            }
            if !prompt.submit(&ctx.gate) {
                let message = prompt.error().unwrap_or_default().to_string();
                return Err(error::Error::unauthorized(message));
            }
            ctx.gate.spawn_expiry_watcher();
            "Admin panel unlocked".to_string()
        }
        Command::Logout => {
            ctx.gate.logout();
            "Admin panel locked".to_string()
        }
        Command::Upload { filename, size } => {
            let meme = ctx.admin.upload(UploadFile::new(filename, size)).await?;
            format!("Uploaded\n{}", card(&meme))
        }
        Command::Edit { id, title, tags, category, score } => {
            ctx.admin.edit(&id, MemePatch::from_edit_form(&title, &tags, category, &score))?;
            format!("Meme {id} saved")
        }
        Command::Delete(ids) => {
            let removed = ctx.admin.delete_many(&ids)?;
            format!("Deleted {removed} meme(s)")
        }
        Command::Database(query) => cards(&ctx.admin.database(&query)?),
        Command::Logs => {
            let entries = ctx.admin.activity()?;
            if entries.is_empty() {
                "No activity yet".to_string()
            } else {
                entries.iter().map(log_line).collect::<Vec<_>>().join("\n")
            }
        }
        Command::Quit => return Ok(Reply::Quit),
    };
    Ok(Reply::Text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{
        admin::{AdminGate, SessionConfig},
        upload::UploadConfig,
    };

    fn context() -> AppContext {
        let gate = AdminGate::new("0919", SessionConfig::default()).unwrap();
        AppContext::build(gate, UploadConfig::default(), true).unwrap()
    }

    async fn run(ctx: &AppContext, line: &str) -> Result<Reply, error::Error> {
        handle(ctx, line.parse()?).await
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_browse_and_counters() {
        let ctx = context();
        let listing = text(run(&ctx, "list").await.unwrap());
        assert_eq!(listing.lines().count(), 3);

        let before = ctx.memes.get("sample-2").unwrap();
        run(&ctx, "view sample-2").await.unwrap();
        let reply = text(run(&ctx, "download sample-2").await.unwrap());
        let after = ctx.memes.get("sample-2").unwrap();
        assert_eq!(after.view_count, before.view_count + 1);
        assert_eq!(after.download_count, before.download_count + 1);
        assert!(reply.contains(&after.download_filename(MemeFormat::Mp4)));

        assert!(matches!(run(&ctx, "view nope").await, Err(error::Error::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admin_commands_need_login() {
        let ctx = context();
        assert!(matches!(run(&ctx, "delete sample-1").await, Err(error::Error::Unauthorized(_))));
        assert!(matches!(run(&ctx, "login 1234").await, Err(error::Error::Unauthorized(_))));
        assert_eq!(ctx.memes.count(), 3);

        run(&ctx, "login 0919").await.unwrap();
        run(&ctx, "edit sample-1 Renamed | a, b | trending | 95").await.unwrap();
        let edited = ctx.memes.get("sample-1").unwrap();
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.tags, vec!["a", "b"]);
        assert_eq!(edited.trending_score, 95);

        assert_eq!(text(run(&ctx, "delete sample-1 sample-2").await.unwrap()), "Deleted 2 meme(s)");
        assert!(text(run(&ctx, "logs").await.unwrap()).contains("Memes deleted"));

        run(&ctx, "logout").await.unwrap();
        assert!(run(&ctx, "logs").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_database_command_and_strict_pin() {
        let ctx = context();
        assert!(matches!(run(&ctx, "db").await, Err(error::Error::Unauthorized(_))));
        assert!(matches!(run(&ctx, "login 09195").await, Err(error::Error::BadRequest(_))));
        assert!(!ctx.gate.is_authenticated());

        run(&ctx, "login 0919").await.unwrap();
        ctx.memes
            .update("sample-2", MemePatch::default().status(MemeStatus::Error))
            .unwrap();
        assert_eq!(text(run(&ctx, "db").await.unwrap()).lines().count(), 3);
        assert_eq!(text(run(&ctx, "list").await.unwrap()).lines().count(), 2);

        let errors = text(run(&ctx, "db error").await.unwrap());
        assert!(errors.starts_with("sample-2"));
        assert_eq!(errors.lines().count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_command() {
        let ctx = context();
        run(&ctx, "login 0919").await.unwrap();
        let reply = text(run(&ctx, "upload party_parrot.mp4 4096").await.unwrap());
        assert!(reply.contains("Party Parrot"));
        assert_eq!(ctx.memes.count(), 4);

        let err = run(&ctx, "upload notes.txt 10").await.unwrap_err();
        assert!(err.body().message.contains("Only MP4 files are allowed"));
        assert_eq!(ctx.memes.count(), 4);
    }

    #[tokio::test]
    async fn test_quit() {
        let ctx = context();
        assert_eq!(run(&ctx, "quit").await.unwrap(), Reply::Quit);
    }
}
