//! Моки API и платформенных участников для тестов экранов.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use feed_app::{ComposerPhase, ImagePicker, Navigator, Permission, PermissionState, Prompt, Screen, UserChoice};
use feed_client::{FeedApi, FeedClientError, FeedClientResult, LocalImage, NewPost, Post};
use tokio::sync::{Notify, watch};

pub const UPLOADED_URL: &str = "https://cdn.example.com/uploaded.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create(NewPost),
    Delete(String),
    Upload(LocalImage),
}

#[derive(Default)]
struct MockApiInner {
    calls: Vec<ApiCall>,
    list_responses: VecDeque<FeedClientResult<Vec<Post>>>,
    create_responses: VecDeque<FeedClientResult<()>>,
    delete_responses: VecDeque<FeedClientResult<()>>,
    upload_responses: VecDeque<FeedClientResult<String>>,
}

/// API с очередями ответов и журналом вызовов.
///
/// Пустая очередь отвечает успехом: пустой список, `()` или [`UPLOADED_URL`].
#[derive(Default)]
pub struct MockApi {
    inner: Mutex<MockApiInner>,
    upload_gate: Option<Arc<Notify>>,
    create_gate: Option<Arc<Notify>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Загрузка изображения ждёт [`MockApi::release_upload`].
    pub fn with_upload_gate() -> Self {
        Self {
            upload_gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn release_upload(&self) {
        if let Some(gate) = &self.upload_gate {
            gate.notify_one();
        }
    }

    /// Создание поста ждёт [`MockApi::release_create`].
    pub fn with_create_gate() -> Self {
        Self {
            create_gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn release_create(&self) {
        if let Some(gate) = &self.create_gate {
            gate.notify_one();
        }
    }

    pub fn queue_list(&self, response: FeedClientResult<Vec<Post>>) {
        self.inner.lock().unwrap().list_responses.push_back(response);
    }

    pub fn queue_create(&self, response: FeedClientResult<()>) {
        self.inner.lock().unwrap().create_responses.push_back(response);
    }

    pub fn queue_delete(&self, response: FeedClientResult<()>) {
        self.inner.lock().unwrap().delete_responses.push_back(response);
    }

    pub fn queue_upload(&self, response: FeedClientResult<String>) {
        self.inner.lock().unwrap().upload_responses.push_back(response);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: ApiCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl FeedApi for MockApi {
    async fn list_posts(&self) -> FeedClientResult<Vec<Post>> {
        self.record(ApiCall::List);
        let next = self.inner.lock().unwrap().list_responses.pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_post(&self, post: &NewPost) -> FeedClientResult<()> {
        self.record(ApiCall::Create(post.clone()));
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        let next = self.inner.lock().unwrap().create_responses.pop_front();
        next.unwrap_or(Ok(()))
    }

    async fn delete_post(&self, id: &str) -> FeedClientResult<()> {
        self.record(ApiCall::Delete(id.to_string()));
        let next = self.inner.lock().unwrap().delete_responses.pop_front();
        next.unwrap_or(Ok(()))
    }

    async fn upload_image(&self, image: &LocalImage) -> FeedClientResult<String> {
        self.record(ApiCall::Upload(image.clone()));
        if let Some(gate) = &self.upload_gate {
            gate.notified().await;
        }
        let next = self.inner.lock().unwrap().upload_responses.pop_front();
        next.unwrap_or_else(|| Ok(UPLOADED_URL.to_string()))
    }
}

/// Диалоги с заранее заданным ответом и журналом показанных сообщений.
pub struct MockPrompt {
    choice: UserChoice,
    confirms: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
    watched: Mutex<Option<watch::Receiver<ComposerPhase>>>,
    phases_at_notice: Mutex<Vec<ComposerPhase>>,
}

impl MockPrompt {
    pub fn answering(choice: UserChoice) -> Self {
        Self {
            choice,
            confirms: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            watched: Mutex::new(None),
            phases_at_notice: Mutex::new(Vec::new()),
        }
    }

    /// Каждое уведомление запоминает стадию композитора в момент показа.
    pub fn watch_phase(&self, phases: watch::Receiver<ComposerPhase>) {
        *self.watched.lock().unwrap() = Some(phases);
    }

    pub fn phases_at_notice(&self) -> Vec<ComposerPhase> {
        self.phases_at_notice.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompt for MockPrompt {
    async fn confirm(&self, _title: &str, message: &str) -> UserChoice {
        self.confirms.lock().unwrap().push(message.to_string());
        self.choice
    }

    async fn notify(&self, _title: &str, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
        let phase = self.watched.lock().unwrap().as_ref().map(|rx| *rx.borrow());
        if let Some(phase) = phase {
            self.phases_at_notice.lock().unwrap().push(phase);
        }
    }
}

pub struct MockPicker {
    permissions: PermissionState,
    image: Mutex<Option<LocalImage>>,
    picks: Mutex<usize>,
}

impl MockPicker {
    pub fn granted(image: Option<LocalImage>) -> Self {
        Self {
            permissions: PermissionState {
                media_library: Permission::Granted,
                camera: Permission::Granted,
            },
            image: Mutex::new(image),
            picks: Mutex::new(0),
        }
    }

    pub fn with_permissions(media_library: Permission, camera: Permission) -> Self {
        Self {
            permissions: PermissionState {
                media_library,
                camera,
            },
            image: Mutex::new(Some(sample_image())),
            picks: Mutex::new(0),
        }
    }

    /// Что вернёт следующий выбор; `None` означает отмену.
    pub fn set_image(&self, image: Option<LocalImage>) {
        *self.image.lock().unwrap() = image;
    }

    pub fn picks(&self) -> usize {
        *self.picks.lock().unwrap()
    }
}

#[async_trait]
impl ImagePicker for MockPicker {
    async fn request_permissions(&self) -> PermissionState {
        self.permissions
    }

    async fn pick_image(&self) -> Option<LocalImage> {
        *self.picks.lock().unwrap() += 1;
        self.image.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct MockNavigator {
    visited: Mutex<Vec<Screen>>,
}

impl MockNavigator {
    pub fn visited(&self) -> Vec<Screen> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for MockNavigator {
    fn navigate_to(&self, screen: Screen) {
        self.visited.lock().unwrap().push(screen);
    }
}

pub fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        image: format!("http://x/{id}.png"),
    }
}

pub fn sample_image() -> LocalImage {
    LocalImage {
        uri: "file:///photos/cat.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
        file_name: "image".to_string(),
    }
}

pub fn api_error(message: &str) -> FeedClientError {
    FeedClientError::Api(message.to_string())
}

pub fn server_error() -> FeedClientError {
    FeedClientError::HttpStatus {
        status: 500,
        message: "internal".to_string(),
    }
}
