//! Терминальные реализации платформенных участников экранов.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use feed_app::{ImagePicker, Navigator, Permission, PermissionState, Prompt, Screen, UserChoice};
use feed_client::LocalImage;

/// Диалоги через stdin/stderr.
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn confirm(&self, title: &str, message: &str) -> UserChoice {
        if self.assume_yes {
            return UserChoice::Confirm;
        }

        let question = format!("{title} {message} [y/N] ");
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut stderr = io::stderr();
            stderr.write_all(question.as_bytes())?;
            stderr.flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => parse_choice(&line),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "failed to read confirmation");
                UserChoice::Cancel
            }
            Err(err) => {
                tracing::warn!(error = %err, "confirmation task failed");
                UserChoice::Cancel
            }
        }
    }

    async fn notify(&self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }
}

fn parse_choice(raw: &str) -> UserChoice {
    match raw.trim().to_lowercase().as_str() {
        "y" | "yes" | "д" | "да" => UserChoice::Confirm,
        _ => UserChoice::Cancel,
    }
}

/// Выбор изображения из файла, переданного в аргументах.
///
/// Доступ к медиатеке означает, что файл существует и читается. Камеры в
/// терминале нет, её разрешение всегда выдано.
pub struct FilePicker {
    path: PathBuf,
}

impl FilePicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ImagePicker for FilePicker {
    async fn request_permissions(&self) -> PermissionState {
        let readable = match tokio::fs::File::open(&self.path).await {
            Ok(file) => file.metadata().await.is_ok_and(|meta| meta.is_file()),
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "image is not readable");
                false
            }
        };

        PermissionState {
            media_library: if readable {
                Permission::Granted
            } else {
                Permission::Denied
            },
            camera: Permission::Granted,
        }
    }

    async fn pick_image(&self) -> Option<LocalImage> {
        Some(local_image(&self.path))
    }
}

fn local_image(path: &Path) -> LocalImage {
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    LocalImage {
        uri: path.display().to_string(),
        mime_type,
        file_name,
    }
}

/// Запоминает запрошенный экран; `main` показывает его после команды.
#[derive(Default)]
pub struct CliNavigator {
    requested: Mutex<Option<Screen>>,
}

impl CliNavigator {
    pub fn take(&self) -> Option<Screen> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Navigator for CliNavigator {
    fn navigate_to(&self, screen: Screen) {
        tracing::debug!(?screen, "navigate");
        *self.requested.lock().unwrap_or_else(PoisonError::into_inner) = Some(screen);
    }
}
