use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PostDto")]
/// Публичная модель поста в ленте.
pub struct Post {
    /// Идентификатор поста. На сервере это поле `_id`.
    pub id: String,
    /// Заголовок поста.
    pub title: String,
    /// Подпись к посту.
    pub description: String,
    /// URL размещённого на сервере изображения.
    pub image: String,
}

/// Пост в том виде, в каком его отдаёт сервер. Mongoose с виртуальными
/// полями присылает и `_id`, и `id`; приоритет у `_id`.
#[derive(Debug, Deserialize)]
struct PostDto {
    #[serde(rename = "_id", default)]
    underscore_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
}

impl From<PostDto> for Post {
    fn from(value: PostDto) -> Self {
        Self {
            id: value.underscore_id.or(value.id).unwrap_or_default(),
            title: value.title,
            description: value.description,
            image: value.image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Данные для создания поста (`/post/addRecord`).
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Подпись.
    pub description: String,
    /// URL изображения, полученный после загрузки.
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Локальное изображение, выбранное пользователем, до загрузки на сервер.
pub struct LocalImage {
    /// Путь к файлу или `file://` URI.
    pub uri: String,
    /// MIME-тип, например `image/png`.
    pub mime_type: String,
    /// Имя файла в multipart-форме.
    pub file_name: String,
}

impl LocalImage {
    /// Путь в файловой системе без схемы `file://`.
    pub fn path(&self) -> &str {
        self.uri.strip_prefix("file://").unwrap_or(&self.uri)
    }
}
