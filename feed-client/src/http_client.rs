use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned, de::IgnoredAny};
use std::time::Duration;

use crate::FeedApi;
use crate::error::{FeedClientError, FeedClientResult};
use crate::models::{LocalImage, NewPost, Post};

const LIST_POSTS_PATH: &str = "/post/getAll";
const CREATE_POST_PATH: &str = "/post/addRecord";
const DELETE_POST_PATH: &str = "/post/deleteRecord";
const UPLOAD_IMAGE_PATH: &str = "/utils/uploadImage";

/// Имя multipart-поля с файлом изображения.
const IMAGE_FIELD: &str = "image";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiStatus {
    Success,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Общая обёртка всех ответов API: `{status, data?, message?}`.
///
/// `data` остаётся сырым JSON, пока не проверен `status`: ответ с ошибкой
/// может нести в `data` что угодно.
#[derive(Debug, Deserialize)]
struct EnvelopeDto {
    #[serde(default)]
    status: ApiStatus,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl EnvelopeDto {
    fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn into_data<T: DeserializeOwned>(self) -> FeedClientResult<Option<T>> {
        if self.status != ApiStatus::Success {
            let message = self.message_text().unwrap_or_else(|| match self.status {
                ApiStatus::Error => "server reported an error".to_string(),
                _ => "unexpected response status".to_string(),
            });
            return Err(FeedClientError::Api(message));
        }

        self.data
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(FeedClientError::Decode)
    }
}

#[derive(Debug, Serialize)]
struct DeletePostRequestDto<'a> {
    #[serde(rename = "recordId")]
    record_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadedImageDto {
    image: String,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для API ленты.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт клиент с таймаутами по умолчанию (5 с на соединение, 15 с на запрос).
    pub fn new(base_url: impl Into<String>) -> FeedClientResult<Self> {
        Self::with_timeouts(base_url, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Создаёт клиент с заданными таймаутами.
    pub fn with_timeouts(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> FeedClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(FeedClientError::ClientBuild)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Базовый URL сервера.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> FeedClientError {
        let status = response.status();

        let message = match response.json::<EnvelopeDto>().await {
            Ok(body) => body.message_text(),
            Err(_) => None,
        };
        FeedClientError::from_http_status(status, message)
    }

    /// отправляет запрос и разворачивает конверт `{status, data}`
    async fn execute<T>(&self, request: RequestBuilder) -> FeedClientResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(FeedClientError::from_reqwest)?;
        tracing::debug!(url = %response.url(), status = %response.status(), "api response");

        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<EnvelopeDto>()
            .await
            .map_err(FeedClientError::from_reqwest)?
            .into_data::<T>()
    }

    /// Возвращает все посты в порядке, заданном сервером.
    pub async fn list_posts(&self) -> FeedClientResult<Vec<Post>> {
        let request = self.client.get(self.endpoint(LIST_POSTS_PATH));
        let posts = self
            .execute::<Vec<Post>>(request)
            .await?
            .ok_or(FeedClientError::MissingData("data"))?;
        Ok(posts)
    }

    /// Создаёт пост. Поля отправляются как `application/x-www-form-urlencoded`.
    pub async fn create_post(&self, post: &NewPost) -> FeedClientResult<()> {
        let request = self.client.post(self.endpoint(CREATE_POST_PATH)).form(post);
        self.execute::<IgnoredAny>(request).await?;
        Ok(())
    }

    /// Удаляет пост по идентификатору.
    pub async fn delete_post(&self, id: &str) -> FeedClientResult<()> {
        let payload = DeletePostRequestDto { record_id: id };
        let request = self
            .client
            .post(self.endpoint(DELETE_POST_PATH))
            .json(&payload);
        self.execute::<IgnoredAny>(request).await?;
        Ok(())
    }

    /// Загружает изображение multipart-формой и возвращает его URL на сервере.
    pub async fn upload_image(&self, image: &LocalImage) -> FeedClientResult<String> {
        let bytes = tokio::fs::read(image.path())
            .await
            .map_err(FeedClientError::ImageFile)?;

        let part = Part::bytes(bytes)
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|_| FeedClientError::InvalidImage(format!("mime type {}", image.mime_type)))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let request = self
            .client
            .post(self.endpoint(UPLOAD_IMAGE_PATH))
            .multipart(form);
        let uploaded = self
            .execute::<UploadedImageDto>(request)
            .await?
            .ok_or(FeedClientError::MissingData("data.image"))?;
        Ok(uploaded.image)
    }
}

#[async_trait]
impl FeedApi for HttpClient {
    async fn list_posts(&self) -> FeedClientResult<Vec<Post>> {
        HttpClient::list_posts(self).await
    }

    async fn create_post(&self, post: &NewPost) -> FeedClientResult<()> {
        HttpClient::create_post(self, post).await
    }

    async fn delete_post(&self, id: &str) -> FeedClientResult<()> {
        HttpClient::delete_post(self, id).await
    }

    async fn upload_image(&self, image: &LocalImage) -> FeedClientResult<String> {
        HttpClient::upload_image(self, image).await
    }
}
