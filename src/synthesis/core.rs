use crate::error::{Error, Result};
use crate::logging::{log_debug, log_error_message, log_info, log_warning};
use crate::progress::ProgressTracker;
use crate::tts::SpeechSynthesizer;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Расширение SSML файлов, которые подхватываются пакетным синтезом
pub const SSML_EXTENSION: &str = "ssml";

/// Пакетный синтез аудио из готовых SSML файлов
pub struct SynthesisCore {
    /// Трекер прогресса
    progress_tracker: ProgressTracker,
    /// Расширение создаваемых аудио файлов (без точки)
    audio_extension: String,
}

impl SynthesisCore {
    /// Создает ядро синтеза, сохраняющее MP3 файлы
    pub fn new(progress_tracker: ProgressTracker) -> Self {
        Self {
            progress_tracker,
            audio_extension: "mp3".to_string(),
        }
    }

    /// Устанавливает расширение аудио файлов
    pub fn with_audio_extension(mut self, extension: &str) -> Self {
        self.audio_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn audio_extension(&self) -> &str {
        &self.audio_extension
    }

    /// Синтезирует один SSML файл в аудио файл
    pub async fn synthesize_file<P: SpeechSynthesizer>(
        &self,
        ssml_path: &Path,
        audio_path: &Path,
        voice: &str,
        provider: &P,
    ) -> Result<()> {
        let ssml = fs::read_to_string(ssml_path).await?;

        let start = std::time::Instant::now();
        let audio = match provider.synthesize_ssml(&ssml, voice).await {
            Ok(audio) => audio,
            Err(e) => {
                log_error_message(&format!("Ошибка синтеза {}: {}", ssml_path.display(), e));
                return Err(e);
            }
        };
        log_debug(&format!(
            "{} синтезирован за {:.2?}",
            ssml_path.display(),
            start.elapsed()
        ));

        fs::write(audio_path, &audio).await?;
        log_info(&format!("Аудио сгенерировано: {}", audio_path.display()));

        Ok(())
    }

    /// Синтезирует все SSML файлы каталога
    ///
    /// Сначала удаляет все аудио файлы с тем же расширением, затем для каждого
    /// `<name>.ssml` (в порядке имен) создает `<name>.<ext>` рядом с ним.
    /// Возвращает пути созданных аудио файлов.
    pub async fn synthesize_directory<P: SpeechSynthesizer>(
        &self,
        dir: &Path,
        voice: &str,
        provider: &P,
    ) -> Result<Vec<PathBuf>> {
        if !fs::metadata(dir).await?.is_dir() {
            return Err(Error::InvalidParameters(format!("Not a directory: {}", dir.display())));
        }

        for stale in self.list_with_extension(dir, &self.audio_extension).await? {
            fs::remove_file(&stale).await?;
            log_info(&format!("Удален старый файл: {}", stale.display()));
        }

        let ssml_files = self.list_with_extension(dir, SSML_EXTENSION).await?;
        if ssml_files.is_empty() {
            log_warning(&format!("В каталоге {} нет SSML файлов", dir.display()));
        }

        self.progress_tracker
            .start(ssml_files.len(), "Синтез SSML файлов")?;

        let mut written = Vec::with_capacity(ssml_files.len());
        for (i, ssml_path) in ssml_files.iter().enumerate() {
            let audio_path = ssml_path.with_extension(&self.audio_extension);
            self.synthesize_file(ssml_path, &audio_path, voice, provider).await?;
            written.push(audio_path);

            self.progress_tracker
                .advance(&format!("Синтезировано {}/{}", i + 1, ssml_files.len()))?;
        }

        Ok(written)
    }

    /// Файлы каталога с заданным расширением, отсортированные по имени
    async fn list_with_extension(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == extension)
                .unwrap_or(false);
            if matches {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
