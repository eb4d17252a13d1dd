use crate::error::{Error, ErrorType, ProviderErrorKind, Result};
use crate::logging::{log_debug, log_warning};
use crate::tts::{language_code_for_voice, SpeechSynthesizer, VoiceCatalog, VoiceDescriptor};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::future::Future;

const GOOGLE_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1";

/// Учетные данные для Google Cloud Text-to-Speech
#[derive(Clone)]
pub enum GoogleCredentials {
    /// API ключ проекта, передается параметром `key`
    ApiKey(String),
    /// OAuth2 токен доступа, например из `gcloud auth print-access-token`
    AccessToken(String),
}

impl std::fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::AccessToken(_) => f.write_str("AccessToken(***)"),
        }
    }
}

/// Формат аудио, возвращаемый Google TTS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoogleAudioEncoding {
    /// MP3 формат
    #[default]
    #[serde(rename = "MP3")]
    Mp3,
    /// Несжатый 16-битный PCM с WAV заголовком
    #[serde(rename = "LINEAR16")]
    Linear16,
    /// Opus в контейнере Ogg
    #[serde(rename = "OGG_OPUS")]
    OggOpus,
}

impl GoogleAudioEncoding {
    /// Возвращает строковое представление формата
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "MP3",
            Self::Linear16 => "LINEAR16",
            Self::OggOpus => "OGG_OPUS",
        }
    }

    /// Создает формат из строки
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "linear16" | "wav" => Ok(Self::Linear16),
            "ogg_opus" | "ogg" | "opus" => Ok(Self::OggOpus),
            _ => Err(Error::new(
                ErrorType::InvalidParameters,
                &format!("Unknown audio encoding: {}", s),
            )),
        }
    }

    /// Возвращает расширение файла для формата
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Linear16 => "wav",
            Self::OggOpus => "ogg",
        }
    }
}

/// Настройки клиента Google TTS
#[derive(Debug, Clone)]
pub struct GoogleTtsOptions {
    /// Формат аудио
    pub audio_encoding: GoogleAudioEncoding,
    /// Базовый адрес API (можно переопределить для прокси или эмулятора)
    pub endpoint: String,
}

impl Default for GoogleTtsOptions {
    fn default() -> Self {
        Self {
            audio_encoding: GoogleAudioEncoding::default(),
            endpoint: GOOGLE_TTS_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    ssml: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: String,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: GoogleAudioEncoding,
}

/// Запрос `text:synthesize`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

#[derive(Debug, Deserialize)]
struct ListVoicesResponse {
    #[serde(default)]
    voices: Vec<VoiceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Клиент для Google Cloud Text-to-Speech REST API
pub struct GoogleTts {
    credentials: GoogleCredentials,
    options: GoogleTtsOptions,
    client: reqwest::Client,
}

impl GoogleTts {
    /// Создает новый клиент
    pub fn new(credentials: GoogleCredentials, options: GoogleTtsOptions) -> Self {
        Self {
            credentials,
            options,
            client: reqwest::Client::new(),
        }
    }

    /// Создает клиент с настройками по умолчанию
    pub fn with_credentials(credentials: GoogleCredentials) -> Self {
        Self::new(credentials, GoogleTtsOptions::default())
    }

    pub fn options(&self) -> &GoogleTtsOptions {
        &self.options
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            GoogleCredentials::ApiKey(key) => request.query(&[("key", key)]),
            GoogleCredentials::AccessToken(token) => request.bearer_auth(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.options.endpoint.trim_end_matches('/'), path)
    }

    /// Превращает неуспешный ответ в ошибку провайдера с категорией по статусу
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        log_debug(&format!("Получен ответ от Google TTS API, статус: {}", status));

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Не удалось получить текст ошибки".to_string());

        Err(Error::provider(
            ProviderErrorKind::from_status(status.as_u16()),
            format!("{}: {}", status, describe_error_body(&body)),
        ))
    }

    /// Синтезирует SSML документ и возвращает аудио данные
    pub async fn synthesize(&self, ssml: &str, voice: &str) -> Result<Vec<u8>> {
        let request = SynthesizeRequest {
            input: SynthesisInput { ssml },
            voice: VoiceSelection {
                language_code: language_code_for_voice(voice),
                name: voice,
            },
            audio_config: AudioConfig {
                audio_encoding: self.options.audio_encoding,
            },
        };

        log_debug(&format!(
            "Google TTS запрос: {} байт SSML, голос {}, формат {}",
            ssml.len(),
            voice,
            self.options.audio_encoding.as_str()
        ));

        let response = self
            .authorize(self.client.post(self.url("text:synthesize")))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let body: SynthesizeResponse = response.json().await?;
        let audio = base64::engine::general_purpose::STANDARD.decode(body.audio_content.as_bytes())?;

        if audio.is_empty() {
            log_warning("Google TTS вернул пустые аудио данные");
        } else {
            log_debug(&format!("Получено {} байт аудио данных от Google TTS", audio.len()));
        }

        Ok(audio)
    }

    /// Возвращает список всех голосов
    pub async fn voices(&self) -> Result<Vec<VoiceDescriptor>> {
        let response = self
            .authorize(self.client.get(self.url("voices")))
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let body: ListVoicesResponse = response.json().await?;
        log_debug(&format!("Получено {} голосов от Google TTS", body.voices.len()));

        Ok(body.voices)
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn synthesize_ssml(&self, ssml: &str, voice: &str) -> impl Future<Output = Result<Vec<u8>>> {
        self.synthesize(ssml, voice)
    }
}

impl VoiceCatalog for GoogleTts {
    fn list_voices(&self) -> impl Future<Output = Result<Vec<VoiceDescriptor>>> {
        self.voices()
    }
}

/// Извлекает текст ошибки из JSON ответа Google, если он там есть
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{} ({})", envelope.error.message, envelope.error.status)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}
