use memewall::{
    api::error,
    configs::{init_logging, AppContext},
    console::{handle, Command, Reply, HELP},
    modules::{admin::ActivityKind, meme::MemeEntity, upload::UploadProgress},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let ctx = AppContext::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;

    let _store_watch = ctx.memes.subscribe(|memes: &[MemeEntity]| {
        log::debug!("Store changed, {} meme(s)", memes.len());
    });
    let _progress_watch = ctx.uploads.on_progress(|progress: &UploadProgress| {
        log::info!("{} {:?} {}%", progress.filename, progress.stage, progress.percent);
    });

    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("Meme wall ready, {} meme(s)\n{}\n", ctx.memes.count(), HELP).as_bytes()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        ctx.gate.record_activity(ActivityKind::KeyPress);

        let result = match line.parse::<Command>() {
            Ok(command) => handle(&ctx, command).await,
            Err(e) => Err(e),
        };
        let output = match result {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) => text,
            Err(e) => render_error(&e),
        };
        stdout.write_all(format!("{output}\n").as_bytes()).await?;
    }

    log::info!("Bye");
    Ok(())
}

fn render_error(e: &error::Error) -> String {
    format!("error: {}", e.body().message)
}
