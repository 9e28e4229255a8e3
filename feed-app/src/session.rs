#[derive(Debug, Clone, PartialEq, Eq)]
/// Текущий пользователь, от имени которого показываются экраны.
pub struct Session {
    /// Отображаемое имя.
    pub display_name: String,
    /// URI аватара, если есть.
    pub avatar: Option<String>,
}

impl Session {
    /// Создаёт сессию с именем и без аватара.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            avatar: None,
        }
    }

    /// Задаёт аватар.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
