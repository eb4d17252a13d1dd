use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

mod google;

pub use google::{GoogleAudioEncoding, GoogleCredentials, GoogleTts, GoogleTtsOptions};

/// Голос по умолчанию для синтеза
pub const DEFAULT_VOICE: &str = "en-GB-Neural2-B";

/// Интерфейс для сервисов синтеза речи из SSML
pub trait SpeechSynthesizer: Send + Sync {
    /// Синтезирует один SSML документ заданным голосом и возвращает аудио данные
    ///
    /// Ошибки провайдера возвращаются как есть, без повторных попыток.
    fn synthesize_ssml(&self, ssml: &str, voice: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

/// Интерфейс для получения списка доступных голосов
pub trait VoiceCatalog: Send + Sync {
    fn list_voices(&self) -> impl Future<Output = Result<Vec<VoiceDescriptor>>>;
}

/// Пол голоса в терминах SSML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
    #[default]
    #[serde(other, rename = "SSML_VOICE_GENDER_UNSPECIFIED")]
    Unspecified,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Neutral => "NEUTRAL",
            Self::Unspecified => "SSML_VOICE_GENDER_UNSPECIFIED",
        }
    }
}

/// Описание голоса из каталога провайдера
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDescriptor {
    /// Имя голоса, например "es-ES-Neural2-B"
    pub name: String,
    /// Поддерживаемые языки
    #[serde(default)]
    pub language_codes: Vec<String>,
    #[serde(default, rename = "ssmlGender")]
    pub gender: VoiceGender,
    /// Собственная частота дискретизации голоса в Гц
    #[serde(default)]
    pub natural_sample_rate_hertz: u32,
}

impl VoiceDescriptor {
    /// Поддерживает ли голос хотя бы один язык из списка
    pub fn supports_any<S: AsRef<str>>(&self, languages: &[S]) -> bool {
        self.language_codes
            .iter()
            .any(|code| languages.iter().any(|lang| lang.as_ref() == code))
    }
}

/// Код языка голоса: первые пять символов имени ("es-ES" из "es-ES-Neural2-B")
pub fn language_code_for_voice(voice: &str) -> String {
    voice.chars().take(5).collect()
}
