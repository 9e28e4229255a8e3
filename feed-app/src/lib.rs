//! Контроллеры двух экранов приложения ленты.
//!
//! - [`FeedSync`] — лента: загрузка при каждом фокусе, удаление с
//!   подтверждением, локальные лайки и комментарии.
//! - [`Composer`] — новый пост: выбор изображения, загрузка, создание записи.
//!
//! Экраны не делят состояние. Источник правды — сервер: после публикации
//! `Composer` только переходит на ленту, а лента перечитывает данные при фокусе.
#![warn(missing_docs)]

pub mod collaborators;
mod composer;
mod feed;
mod session;

pub use collaborators::{
    ImagePicker, Navigator, Permission, PermissionState, Prompt, Screen, UserChoice,
};
pub use composer::{Composer, ComposerForm, ComposerPhase, PickOutcome, SubmitOutcome};
pub use feed::{Comment, DeleteOutcome, FeedRow, FeedSync, RowState};
pub use session::Session;
