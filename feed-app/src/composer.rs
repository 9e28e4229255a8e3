use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use feed_client::{FeedApi, FeedClientError, FeedClientResult, LocalImage, NewPost};
use tokio::sync::watch;

use crate::collaborators::{ImagePicker, Navigator, Prompt, Screen};
use crate::session::Session;

const PERMISSIONS_MESSAGE: &str = "Camera and photo permissions are required to make this work!";
const MISSING_IMAGE_MESSAGE: &str = "Please pick an image first";
const POST_FAILED_MESSAGE: &str = "An error occurred while posting";
const ALERT_TITLE: &str = "Error";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Поля формы нового поста.
pub struct ComposerForm {
    /// Заголовок.
    pub title: String,
    /// Подпись, уходит на сервер как `description`.
    pub caption: String,
    /// Выбранное изображение: URI, MIME-тип и имя файла.
    pub image: Option<LocalImage>,
}

impl ComposerForm {
    /// Все поля пусты.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.caption.is_empty() && self.image.is_none()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Стадия отправки поста.
pub enum ComposerPhase {
    /// Готов к отправке.
    #[default]
    Idle,
    /// Загружается изображение.
    Uploading,
    /// Создаётся запись поста.
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Результат выбора изображения.
pub enum PickOutcome {
    /// Изображение выбрано и сохранено в форме.
    Picked(LocalImage),
    /// Пользователь закрыл выбор, форма не изменилась.
    Cancelled,
    /// Нет доступа к медиатеке или камере.
    PermissionDenied,
}

#[derive(Debug)]
/// Результат нажатия «опубликовать».
pub enum SubmitOutcome {
    /// Пост создан, форма очищена, выполнен переход на ленту.
    Posted,
    /// Отправка уже идёт, нажатие проигнорировано.
    Ignored,
    /// Изображение не выбрано, запросов не было.
    MissingImage,
    /// Загрузка или создание не удались, форма сохранена.
    Failed(FeedClientError),
}

/// Возвращает стадию в `Idle` при любом выходе из `submit`,
/// включая отмену future.
struct PhaseGuard<'a> {
    phase: &'a watch::Sender<ComposerPhase>,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(ComposerPhase::Idle);
    }
}

/// Экран создания поста.
///
/// Отправка идёт строго последовательно: сначала загрузка изображения, затем
/// создание записи с полученным URL. Пока отправка не завершилась, повторные
/// нажатия игнорируются.
pub struct Composer {
    api: Arc<dyn FeedApi>,
    picker: Arc<dyn ImagePicker>,
    navigator: Arc<dyn Navigator>,
    prompt: Arc<dyn Prompt>,
    session: Session,
    form: Mutex<ComposerForm>,
    phase: watch::Sender<ComposerPhase>,
}

impl Composer {
    /// Создаёт экран с пустой формой.
    pub fn new(
        api: Arc<dyn FeedApi>,
        picker: Arc<dyn ImagePicker>,
        navigator: Arc<dyn Navigator>,
        prompt: Arc<dyn Prompt>,
        session: Session,
    ) -> Self {
        let (phase, _) = watch::channel(ComposerPhase::Idle);
        Self {
            api,
            picker,
            navigator,
            prompt,
            session,
            form: Mutex::new(ComposerForm::default()),
            phase,
        }
    }

    /// Текущий пользователь.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Копия текущих полей формы.
    pub fn form(&self) -> ComposerForm {
        self.lock_form().clone()
    }

    /// Задаёт заголовок.
    pub fn set_title(&self, title: impl Into<String>) {
        self.lock_form().title = title.into();
    }

    /// Задаёт подпись.
    pub fn set_caption(&self, caption: impl Into<String>) {
        self.lock_form().caption = caption.into();
    }

    /// Текущая стадия отправки.
    pub fn phase(&self) -> ComposerPhase {
        *self.phase.borrow()
    }

    /// Индикатор загрузки: отправка начата и ещё не завершилась.
    pub fn is_loading(&self) -> bool {
        self.phase() != ComposerPhase::Idle
    }

    /// Подписка на смену стадий.
    pub fn subscribe(&self) -> watch::Receiver<ComposerPhase> {
        self.phase.subscribe()
    }

    /// Запрашивает разрешения и открывает выбор изображения.
    ///
    /// Без обоих разрешений показывает предупреждение и ничего не меняет.
    pub async fn pick_image(&self) -> PickOutcome {
        let permissions = self.picker.request_permissions().await;
        if !permissions.all_granted() {
            tracing::warn!(?permissions, "image picker permissions denied");
            self.prompt.notify(ALERT_TITLE, PERMISSIONS_MESSAGE).await;
            return PickOutcome::PermissionDenied;
        }

        match self.picker.pick_image().await {
            Some(image) => {
                tracing::debug!(uri = %image.uri, mime = %image.mime_type, "image picked");
                self.lock_form().image = Some(image.clone());
                PickOutcome::Picked(image)
            }
            None => PickOutcome::Cancelled,
        }
    }

    /// Публикует пост: загрузка изображения, создание записи, очистка формы и
    /// переход на ленту.
    ///
    /// Ошибка любой из стадий показывается пользователю, форма при этом не
    /// очищается. Повторов нет, повторная отправка только по нажатию.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.is_loading() {
            tracing::debug!("submit ignored, previous submission in flight");
            return SubmitOutcome::Ignored;
        }

        let form = self.form();
        let Some(image) = form.image.as_ref() else {
            self.prompt.notify(ALERT_TITLE, MISSING_IMAGE_MESSAGE).await;
            return SubmitOutcome::MissingImage;
        };

        let claimed = self.phase.send_if_modified(|phase| {
            if *phase != ComposerPhase::Idle {
                return false;
            }
            *phase = ComposerPhase::Uploading;
            true
        });
        if !claimed {
            tracing::debug!("submit ignored, previous submission in flight");
            return SubmitOutcome::Ignored;
        }
        let guard = PhaseGuard { phase: &self.phase };

        match self.publish(&form, image).await {
            Ok(()) => {
                *self.lock_form() = ComposerForm::default();
                tracing::info!(title = %form.title, "post published");
                self.navigator.navigate_to(Screen::Feed);
                SubmitOutcome::Posted
            }
            Err(err) => {
                tracing::error!(error = %err, phase = ?self.phase(), "failed to publish post");
                // алерт показывается уже без индикатора загрузки
                drop(guard);
                self.prompt.notify(ALERT_TITLE, &alert_message(&err)).await;
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn publish(&self, form: &ComposerForm, image: &LocalImage) -> FeedClientResult<()> {
        let image_url = self.api.upload_image(image).await?;

        self.phase.send_replace(ComposerPhase::Submitting);
        let post = NewPost {
            title: form.title.clone(),
            description: form.caption.clone(),
            image: image_url,
        };
        self.api.create_post(&post).await
    }

    fn lock_form(&self) -> MutexGuard<'_, ComposerForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn alert_message(err: &FeedClientError) -> String {
    match err {
        FeedClientError::Api(message) => message.clone(),
        _ => POST_FAILED_MESSAGE.to_string(),
    }
}
