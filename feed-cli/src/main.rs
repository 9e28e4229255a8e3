use std::fmt::Write as _;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use feed_app::{
    Composer, DeleteOutcome, FeedSync, PickOutcome, Prompt, Screen, Session, SubmitOutcome,
};
use feed_client::{FeedApi, FeedClientError, HttpClient};

mod logging;
mod settings;
mod terminal;

use logging::init_logging;
use settings::Settings;
use terminal::{CliNavigator, FilePicker, TerminalPrompt};

#[derive(Debug, Parser)]
#[command(name = "feed-cli", version, about = "CLI клиент ленты постов")]
struct Cli {
    /// Адрес API ленты (по умолчанию FEED_API_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Показать ленту.
    List {
        /// Раскрыть комментарии под постами.
        #[arg(long)]
        comments: bool,
    },
    /// Удалить пост (с подтверждением).
    Delete {
        #[arg(long)]
        id: String,
        /// Не спрашивать подтверждение.
        #[arg(long)]
        yes: bool,
    },
    /// Опубликовать пост с изображением.
    Post {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        caption: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let base_url = resolve_server(cli.server, &settings.api_url);
    tracing::debug!(%base_url, "using feed api");
    let client = HttpClient::with_timeouts(
        base_url,
        Duration::from_secs(settings.connect_timeout_secs),
        Duration::from_secs(settings.request_timeout_secs),
    )
    .map_err(map_client_error)?;
    let api: Arc<dyn FeedApi> = Arc::new(client);
    let session = settings.session();

    match cli.command {
        Command::List { comments } => {
            let mut feed = FeedSync::new(api, Arc::new(TerminalPrompt::new(false)), session);
            feed.on_focus().await.map_err(map_client_error)?;
            if comments {
                let ids: Vec<String> = feed.posts().iter().map(|post| post.id.clone()).collect();
                for id in &ids {
                    feed.toggle_comments(id);
                }
            }
            print!("{}", render_feed(&feed));
        }
        Command::Delete { id, yes } => {
            let mut feed = FeedSync::new(api, Arc::new(TerminalPrompt::new(yes)), session);
            match feed.delete_post(&id).await.map_err(map_client_error)? {
                DeleteOutcome::Cancelled => println!("Удаление отменено"),
                DeleteOutcome::Deleted => {
                    println!("Пост удалён: id={id}");
                    print!("{}", render_feed(&feed));
                }
            }
        }
        Command::Post {
            image,
            title,
            caption,
        } => {
            let prompt: Arc<dyn Prompt> = Arc::new(TerminalPrompt::new(false));
            let navigator = Arc::new(CliNavigator::default());
            let composer = Composer::new(
                api.clone(),
                Arc::new(FilePicker::new(image.clone())),
                navigator.clone(),
                prompt.clone(),
                session.clone(),
            );

            match composer.pick_image().await {
                PickOutcome::Picked(_) => {}
                PickOutcome::Cancelled | PickOutcome::PermissionDenied => {
                    bail!("не удалось открыть изображение {}", image.display());
                }
            }
            composer.set_title(title);
            composer.set_caption(caption);

            submit_result(composer.submit().await)?;
            println!("Пост опубликован");

            if navigator.take() == Some(Screen::Feed) {
                show_feed(api, prompt, session).await?;
            }
        }
    }

    Ok(())
}

async fn show_feed(api: Arc<dyn FeedApi>, prompt: Arc<dyn Prompt>, session: Session) -> Result<()> {
    let mut feed = FeedSync::new(api, prompt, session);
    feed.on_focus()
        .await
        .map_err(map_client_error)
        .context("лента не обновилась")?;
    print!("{}", render_feed(&feed));
    Ok(())
}

/// Причину отказа композитор уже показал через `Prompt::notify`,
/// здесь остаётся только код выхода.
fn submit_result(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Posted => Ok(()),
        SubmitOutcome::Failed(err) => {
            tracing::debug!(error = %err, "post was not published");
            Err(anyhow!("пост не опубликован"))
        }
        SubmitOutcome::MissingImage => Err(anyhow!("пост не опубликован")),
        SubmitOutcome::Ignored => bail!("публикация уже выполняется"),
    }
}

fn resolve_server(server: Option<String>, configured: &str) -> String {
    let raw = server.unwrap_or_else(|| configured.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn map_client_error(err: FeedClientError) -> anyhow::Error {
    let message = match err {
        FeedClientError::Api(message) => format!("сервер вернул ошибку: {message}"),
        FeedClientError::MissingData(field) => format!("в ответе сервера нет поля {field}"),
        FeedClientError::Decode(err) => format!("ответ сервера не разобран: {err}"),
        FeedClientError::HttpStatus { status, message } => {
            format!("ошибка HTTP {status}: {message}")
        }
        FeedClientError::Http(err) => format!("ошибка HTTP: {err}"),
        FeedClientError::InvalidImage(message) => format!("некорректное изображение: {message}"),
        FeedClientError::ImageFile(err) => format!("не удалось прочитать изображение: {err}"),
        FeedClientError::ClientBuild(err) => format!("не удалось создать HTTP-клиент: {err}"),
    };
    anyhow::anyhow!(message)
}

fn render_feed(feed: &FeedSync) -> String {
    let mut out = String::new();
    if let Some(err) = feed.last_error() {
        let _ = writeln!(out, "Лента не обновилась: {err}");
    }

    let rows = feed.rows();
    let _ = writeln!(out, "Постов: {}", rows.len());

    for row in rows {
        let like = if row.state.liked { "♥" } else { "♡" };
        let _ = writeln!(out, "- [{}] {} {like}", row.post.id, row.post.title);
        let _ = writeln!(out, "  автор: {}", row.author.display_name);
        if !row.post.description.is_empty() {
            let _ = writeln!(out, "  {}", row.post.description);
        }
        if !row.post.image.is_empty() {
            let _ = writeln!(out, "  image: {}", row.post.image);
        }
        if row.state.comments_expanded {
            for comment in feed.comments() {
                let _ = writeln!(out, "    {}: {}", comment.username, comment.text);
            }
        }
    }
    out
}
