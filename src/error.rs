use thiserror::Error;

/// Категории ошибок внешнего провайдера синтеза речи
///
/// Сохраняются без изменений, чтобы вызывающий код мог решить,
/// имеет ли смысл повторять запрос.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Сетевая ошибка (соединение, таймаут, DNS)
    Network,
    /// Ошибка аутентификации или прав доступа (401/403)
    Auth,
    /// Превышена квота или лимит запросов (429)
    Quota,
    /// Провайдер отверг запрос, например из-за некорректного SSML (400)
    InvalidRequest,
    /// Внутренняя ошибка провайдера (5xx)
    Server,
    /// Прочие ошибки
    Other,
}

impl ProviderErrorKind {
    /// Определяет категорию ошибки по HTTP статусу ответа
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::Quota,
            400 | 404 | 413 | 422 => Self::InvalidRequest,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Quota => "quota",
            Self::InvalidRequest => "invalid request",
            Self::Server => "server",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Типы ошибок для конструктора [`Error::new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// Ошибка ввода/вывода
    Io,
    /// Ошибка парсинга субтитров
    SubtitleParsing,
    /// Ошибка файла конфигурации и алиасов
    Config,
    /// Неверные параметры
    InvalidParameters,
}

/// Ошибки, которые могут возникнуть при генерации SSML и синтезе речи
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка парсинга субтитров: {0}")]
    SubtitleParsing(String),

    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    #[error("Ошибка провайдера синтеза речи ({kind}): {message}")]
    Provider {
        kind: ProviderErrorKind,
        message: String,
    },

    #[error("Неверные параметры: {0}")]
    InvalidParameters(String),

    #[error("{0}")]
    LoggedError(String),

    #[error("Ошибка сериализации JSON: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("Ошибка декодирования аудио данных: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

impl Error {
    /// Создает новую ошибку указанного типа с сообщением
    pub fn new(error_type: ErrorType, message: &str) -> Self {
        match error_type {
            ErrorType::Io => Self::Io(std::io::Error::new(std::io::ErrorKind::Other, message)),
            ErrorType::SubtitleParsing => Self::SubtitleParsing(message.to_string()),
            ErrorType::Config => Self::Config(message.to_string()),
            ErrorType::InvalidParameters => Self::InvalidParameters(message.to_string()),
        }
    }

    /// Создает ошибку провайдера указанной категории
    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self::Provider {
            kind,
            message: message.into(),
        }
    }

    /// Возвращает категорию ошибки провайдера, если это ошибка провайдера
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Self::Provider { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = match err.status() {
            Some(status) => ProviderErrorKind::from_status(status.as_u16()),
            None if err.is_decode() || err.is_body() => ProviderErrorKind::Other,
            None => ProviderErrorKind::Network,
        };
        Self::provider(kind, err.to_string())
    }
}

/// Результат с обработкой ошибок
pub type Result<T> = std::result::Result<T, Error>;
