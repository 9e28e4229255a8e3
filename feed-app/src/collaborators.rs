//! Внешние участники экранов: выбор изображения, навигация и диалоги.
//!
//! Платформенные вызовы скрыты за узкими трейтами, чтобы контроллеры
//! [`FeedSync`](crate::FeedSync) и [`Composer`](crate::Composer) можно было
//! запускать в любом хосте (терминал, тесты, мобильная оболочка).

use async_trait::async_trait;
use feed_client::LocalImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Ответ платформы на запрос разрешения.
pub enum Permission {
    /// Доступ выдан.
    Granted,
    /// Доступ запрещён.
    Denied,
}

impl Permission {
    /// `true`, если доступ выдан.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Разрешения, необходимые для выбора изображения.
pub struct PermissionState {
    /// Доступ к медиатеке.
    pub media_library: Permission,
    /// Доступ к камере.
    pub camera: Permission,
}

impl PermissionState {
    /// Оба разрешения выданы.
    pub fn all_granted(&self) -> bool {
        self.media_library.is_granted() && self.camera.is_granted()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Выбор пользователя в диалоге подтверждения.
pub enum UserChoice {
    /// Подтвердить действие.
    Confirm,
    /// Отменить действие.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Экраны приложения.
pub enum Screen {
    /// Лента постов.
    Feed,
    /// Создание поста.
    Composer,
}

/// Платформенный выбор изображения.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Запрашивает доступ к медиатеке и камере.
    async fn request_permissions(&self) -> PermissionState;

    /// Открывает выбор изображения. `None`, если пользователь отменил выбор.
    async fn pick_image(&self) -> Option<LocalImage>;
}

/// Хост навигации.
///
/// Событие фокуса хост доставляет сам, вызывая
/// [`FeedSync::on_focus`](crate::FeedSync::on_focus).
pub trait Navigator: Send + Sync {
    /// Переходит на указанный экран.
    fn navigate_to(&self, screen: Screen);
}

/// Диалоги и уведомления.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Показывает диалог с двумя вариантами и ждёт выбора.
    async fn confirm(&self, title: &str, message: &str) -> UserChoice;

    /// Показывает блокирующее уведомление.
    async fn notify(&self, title: &str, message: &str);
}
