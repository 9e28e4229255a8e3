//! Клиентская библиотека для HTTP API ленты постов.
//!
//! Покрывает четыре операции сервера:
//! - `GET /post/getAll` — список постов;
//! - `POST /post/addRecord` — создание поста (url-encoded форма);
//! - `POST /post/deleteRecord` — удаление поста (JSON `{recordId}`);
//! - `POST /utils/uploadImage` — загрузка изображения (multipart).
//!
//! Все ответы сервера имеют вид `{status, data?, message?}`; любой `status`,
//! отличный от `"success"`, превращается в [`FeedClientError::Api`].
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

use async_trait::async_trait;

pub use error::{FeedClientError, FeedClientResult};
pub use http_client::HttpClient;
pub use models::{LocalImage, NewPost, Post};

/// Операции API ленты, которыми пользуются экраны приложения.
///
/// Реализуется [`HttpClient`]; в тестах подменяется моками.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// Возвращает все посты в порядке сервера.
    async fn list_posts(&self) -> FeedClientResult<Vec<Post>>;

    /// Создаёт пост.
    async fn create_post(&self, post: &NewPost) -> FeedClientResult<()>;

    /// Удаляет пост по идентификатору.
    async fn delete_post(&self, id: &str) -> FeedClientResult<()>;

    /// Загружает изображение и возвращает его URL на сервере.
    async fn upload_image(&self, image: &LocalImage) -> FeedClientResult<String>;
}
