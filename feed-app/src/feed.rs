use std::collections::HashMap;
use std::sync::Arc;

use feed_client::{FeedApi, FeedClientError, FeedClientResult, Post};

use crate::collaborators::{Prompt, UserChoice};
use crate::session::Session;

const DELETE_CONFIRM_TITLE: &str = "Are you sure?";
const DELETE_CONFIRM_MESSAGE: &str = "Do you want to delete this post?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Комментарий-заглушка. Сервер комментарии не хранит.
pub struct Comment {
    /// Автор.
    pub username: &'static str,
    /// Текст.
    pub text: &'static str,
}

const PLACEHOLDER_COMMENTS: &[Comment] = &[
    Comment {
        username: "Jane Doe",
        text: "Wow 😍",
    },
    Comment {
        username: "John Smith",
        text: "Loving It",
    },
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Локальное состояние строки ленты. На сервер не отправляется.
pub struct RowState {
    /// Пользователь поставил лайк.
    pub liked: bool,
    /// Комментарии раскрыты.
    pub comments_expanded: bool,
}

#[derive(Debug, Clone, Copy)]
/// Строка ленты, готовая к отрисовке.
pub struct FeedRow<'a> {
    /// Пост в том виде, в каком его вернул сервер.
    pub post: &'a Post,
    /// Состояние строки.
    pub state: RowState,
    /// Пользователь, от имени которого показывается лента.
    pub author: &'a Session,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Чем закончился запрос на удаление.
pub enum DeleteOutcome {
    /// Пользователь отменил удаление, запросов не было.
    Cancelled,
    /// Пост удалён, лента перезапрошена.
    Deleted,
}

/// Экран ленты: загрузка постов при фокусе, удаление с подтверждением,
/// локальные лайки и раскрытие комментариев.
///
/// Список постов всегда заменяется целиком ответом сервера. Создание нового
/// экземпляра соответствует монтированию экрана и сбрасывает состояние строк.
pub struct FeedSync {
    api: Arc<dyn FeedApi>,
    prompt: Arc<dyn Prompt>,
    session: Session,
    posts: Vec<Post>,
    rows: HashMap<String, RowState>,
    last_error: Option<String>,
}

impl FeedSync {
    /// Создаёт экран с пустой лентой.
    pub fn new(api: Arc<dyn FeedApi>, prompt: Arc<dyn Prompt>, session: Session) -> Self {
        Self {
            api,
            prompt,
            session,
            posts: Vec::new(),
            rows: HashMap::new(),
            last_error: None,
        }
    }

    /// Хост вызывает при каждом появлении ленты на экране.
    pub async fn on_focus(&mut self) -> FeedClientResult<&[Post]> {
        tracing::debug!("feed focused, reloading");
        self.load_feed().await
    }

    /// Загружает ленту и заменяет текущий список.
    ///
    /// При ошибке прежний список сохраняется, ошибка пишется в лог и
    /// запоминается в [`FeedSync::last_error`].
    pub async fn load_feed(&mut self) -> FeedClientResult<&[Post]> {
        match self.api.list_posts().await {
            Ok(posts) => {
                tracing::info!(count = posts.len(), "feed loaded");
                self.rows
                    .retain(|id, _| posts.iter().any(|post| &post.id == id));
                self.posts = posts;
                self.last_error = None;
                Ok(&self.posts)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load feed");
                self.remember(&err);
                Err(err)
            }
        }
    }

    /// Удаляет пост после подтверждения пользователем.
    ///
    /// После успешного удаления лента перезагружается ровно один раз. Ошибка
    /// перезагрузки не отменяет удаления и остаётся в [`FeedSync::last_error`].
    pub async fn delete_post(&mut self, id: &str) -> FeedClientResult<DeleteOutcome> {
        let choice = self
            .prompt
            .confirm(DELETE_CONFIRM_TITLE, DELETE_CONFIRM_MESSAGE)
            .await;
        if choice == UserChoice::Cancel {
            tracing::debug!(post_id = id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(err) = self.api.delete_post(id).await {
            tracing::error!(post_id = id, error = %err, "failed to delete post");
            self.remember(&err);
            return Err(err);
        }
        tracing::info!(post_id = id, "post deleted");

        // ошибка уже залогирована в load_feed
        let _ = self.load_feed().await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Посты в порядке сервера.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Строки для отрисовки в порядке сервера.
    pub fn rows(&self) -> Vec<FeedRow<'_>> {
        self.posts
            .iter()
            .map(|post| FeedRow {
                post,
                state: self.row_state(&post.id),
                author: &self.session,
            })
            .collect()
    }

    /// Состояние строки поста. Для неизвестного id возвращает состояние по умолчанию.
    pub fn row_state(&self, id: &str) -> RowState {
        self.rows.get(id).copied().unwrap_or_default()
    }

    /// Переключает лайк. Возвращает `None`, если поста нет в ленте.
    pub fn toggle_like(&mut self, id: &str) -> Option<RowState> {
        self.update_row(id, |row| row.liked = !row.liked)
    }

    /// Раскрывает или скрывает комментарии. Возвращает `None`, если поста нет в ленте.
    pub fn toggle_comments(&mut self, id: &str) -> Option<RowState> {
        self.update_row(id, |row| row.comments_expanded = !row.comments_expanded)
    }

    /// Комментарии, показываемые под раскрытым постом.
    pub fn comments(&self) -> &'static [Comment] {
        PLACEHOLDER_COMMENTS
    }

    /// Текущий пользователь.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Последняя ошибка загрузки или удаления.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn update_row(&mut self, id: &str, change: impl FnOnce(&mut RowState)) -> Option<RowState> {
        if !self.posts.iter().any(|post| post.id == id) {
            return None;
        }
        let row = self.rows.entry(id.to_string()).or_default();
        change(row);
        Some(*row)
    }

    fn remember(&mut self, err: &FeedClientError) {
        self.last_error = Some(err.to_string());
    }
}
