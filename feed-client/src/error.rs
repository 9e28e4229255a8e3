use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `feed-client`.
pub enum FeedClientError {
    /// Ошибка HTTP-транспорта или разбора тела ответа (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Сервер ответил статусом вне диапазона 2xx.
    #[error("http status {status}: {message}")]
    HttpStatus {
        /// HTTP-статус ответа.
        status: u16,
        /// Сообщение сервера или текст по умолчанию.
        message: String,
    },

    /// Ответ разобран, но `status` не равен `"success"`.
    #[error("api error: {0}")]
    Api(String),

    /// Успешный ответ без ожидаемого поля `data`.
    #[error("response is missing {0}")]
    MissingData(&'static str),

    /// Поле `data` успешного ответа не совпало с ожидаемой формой.
    #[error("failed to decode response data: {0}")]
    Decode(#[source] serde_json::Error),

    /// Некорректные метаданные изображения (например, MIME-тип).
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Не удалось прочитать локальный файл изображения.
    #[error("failed to read image file: {0}")]
    ImageFile(#[source] std::io::Error),

    /// Не удалось собрать HTTP-клиент.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Результат операций `feed-client`.
pub type FeedClientResult<T> = Result<T, FeedClientError>;

impl FeedClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        Self::HttpStatus {
            status: status.as_u16(),
            message,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }

    /// Ошибка транспорта: запрос не дошёл или сервер ответил не-2xx.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::HttpStatus { .. })
    }

    /// Сервер ответил, но сообщил об ошибке в поле `status`.
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_) | Self::MissingData(_) | Self::Decode(_))
    }
}
