pub mod error;
pub mod subtitle;
pub mod ssml;
pub mod config;
pub mod tts;
pub mod synthesis;
pub mod progress;
pub mod logging;

pub use error::{Error, ErrorType, ProviderErrorKind, Result};
pub use logging::{
    setup_logging, setup_test_logging, log_error, log_warning, log_info, log_debug, log_trace
};
pub use subtitle::{SubtitleEntry, SubtitleTrack, SrtParser, VttParser};
pub use ssml::{
    AliasRule, AliasTable, ChunkConfig, SsmlChunker, SsmlDocument, SsmlUnit,
    SsmlEmitter, OutputFs, LocalFs
};
pub use config::ProjectConfig;
pub use tts::{
    SpeechSynthesizer, VoiceCatalog, VoiceDescriptor, VoiceGender,
    GoogleTts, GoogleTtsOptions, GoogleCredentials, GoogleAudioEncoding
};
pub use progress::{ProgressTracker, ProgressCallback};
pub use synthesis::SynthesisCore;

use std::path::{Path, PathBuf};

/// Настройки конвейера генерации SSML
///
/// Поля со значением `Some` переопределяют одноименные параметры из файла конфигурации.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Максимальный размер документа в байтах
    pub max_bytes: Option<usize>,
    /// Порог промежутка для вставки паузы, мс
    pub min_gap_ms: Option<u64>,
    /// Максимальная длительность паузы, с
    pub max_pause_seconds: Option<f64>,
    /// Скорость речи
    pub rate: Option<String>,
    /// Уровень логирования
    pub log_level: log::LevelFilter,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_bytes: None,
            min_gap_ms: None,
            max_pause_seconds: None,
            rate: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

/// Основной интерфейс: субтитры и словарь произношений превращаются в SSML файлы
pub struct SsmlPipeline {
    options: PipelineOptions,
}

impl SsmlPipeline {
    /// Создает конвейер с заданными настройками
    pub fn new(options: PipelineOptions) -> Self {
        #[cfg(test)]
        {
            setup_test_logging(options.log_level);
        }
        #[cfg(not(test))]
        {
            setup_logging(options.log_level);
        }

        log_debug(&format!("Создан конвейер SSML с настройками: {:?}", options));

        Self { options }
    }

    /// Устанавливает максимальный размер документа
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        log_debug(&format!("Установлен лимит размера документа: {} байт", max_bytes));
        self.options.max_bytes = Some(max_bytes);
        self
    }

    /// Устанавливает скорость речи
    pub fn with_rate(mut self, rate: &str) -> Self {
        log_debug(&format!("Установлена скорость речи: {}", rate));
        self.options.rate = Some(rate.to_string());
        self
    }

    /// Устанавливает параметры пауз
    pub fn with_pauses(mut self, min_gap_ms: u64, max_pause_seconds: f64) -> Self {
        log_debug(&format!(
            "Установлены параметры пауз: порог {} мс, максимум {} с",
            min_gap_ms, max_pause_seconds
        ));
        self.options.min_gap_ms = Some(min_gap_ms);
        self.options.max_pause_seconds = Some(max_pause_seconds);
        self
    }

    /// Применяет переопределения из настроек к параметрам разбиения
    pub fn effective_config(&self, base: &ChunkConfig) -> Result<ChunkConfig> {
        let config = ChunkConfig {
            rate: self.options.rate.clone().unwrap_or_else(|| base.rate.clone()),
            max_bytes: self.options.max_bytes.unwrap_or(base.max_bytes),
            min_gap_ms: self.options.min_gap_ms.unwrap_or(base.min_gap_ms),
            max_pause_seconds: self.options.max_pause_seconds.unwrap_or(base.max_pause_seconds),
        };
        config.validate()?;
        Ok(config)
    }

    /// Чистая часть конвейера: записи субтитров в SSML документы
    pub fn render(&self, entries: &[SubtitleEntry], project: &ProjectConfig) -> Result<Vec<SsmlDocument>> {
        let config = self.effective_config(&project.chunk)?;
        Ok(ssml::chunk_entries(entries, &config, &project.aliases))
    }

    /// Генерирует SSML файлы из файла субтитров и файла алиасов
    ///
    /// Возвращает пути записанных файлов.
    pub fn generate<P, Q, R>(&self, subtitle_path: P, alias_path: Q, output_path: R) -> Result<Vec<PathBuf>>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        self.generate_with(subtitle_path, alias_path, output_path, &SsmlEmitter::local())
    }

    /// То же, что [`generate`](Self::generate), но с заданным эмиттером
    pub fn generate_with<P, Q, R, F>(
        &self,
        subtitle_path: P,
        alias_path: Q,
        output_path: R,
        emitter: &SsmlEmitter<F>,
    ) -> Result<Vec<PathBuf>>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
        F: OutputFs,
    {
        let subtitle_path = subtitle_path.as_ref();
        log_info(&format!("Генерация SSML для файла: {}", subtitle_path.display()));

        let project = ProjectConfig::load(alias_path)?;
        let track = subtitle::parse_file(subtitle_path)?;
        if track.is_empty() {
            log_warning(&format!("В файле {} не найдено субтитров", subtitle_path.display()));
        }

        let documents = self.render(track.as_slice(), &project)?;
        emitter.emit(&documents, output_path)
    }
}

impl Default for SsmlPipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}
