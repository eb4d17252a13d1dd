use crate::error::{Error, Result};
use crate::logging::{log_debug, log_trace, log_warning};
use crate::ssml::alias::AliasTable;
use crate::ssml::document::{SsmlDocument, SsmlFrame, SsmlUnit};
use crate::subtitle::SubtitleEntry;
use std::time::Duration;

/// Лимит Google Cloud Text-to-Speech на размер одного запроса
pub const DEFAULT_MAX_BYTES: usize = 5000;
/// Промежутки не длиннее этого значения не превращаются в паузу
pub const DEFAULT_MIN_GAP_MS: u64 = 100;
/// Максимальная длительность одной паузы
pub const DEFAULT_MAX_PAUSE_SECONDS: f64 = 3.0;
pub const DEFAULT_RATE: &str = "100%";

/// Параметры разбиения субтитров на SSML документы
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkConfig {
    /// Скорость речи для `<prosody rate>`, например "100%"
    pub rate: String,
    /// Максимальный размер документа в байтах UTF-8
    pub max_bytes: usize,
    /// Порог промежутка, ниже или равный которому пауза не вставляется
    pub min_gap_ms: u64,
    /// Ограничение длительности паузы в секундах
    pub max_pause_seconds: f64,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            min_gap_ms: DEFAULT_MIN_GAP_MS,
            max_pause_seconds: DEFAULT_MAX_PAUSE_SECONDS,
        }
    }
}

impl ChunkConfig {
    /// Проверяет корректность параметров
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(Error::InvalidParameters("max_bytes must be greater than zero".to_string()));
        }
        if !self.max_pause_seconds.is_finite() || self.max_pause_seconds < 0.0 {
            return Err(Error::InvalidParameters(format!(
                "max_pause_seconds must be a non-negative number, got {}",
                self.max_pause_seconds
            )));
        }
        if self.rate.trim().is_empty() {
            return Err(Error::InvalidParameters("rate must not be empty".to_string()));
        }
        Ok(())
    }

    /// Рассчитывает паузу для промежутка между двумя записями
    ///
    /// Возвращает `None`, если промежуток не превышает `min_gap_ms`.
    pub fn pause_for_gap(&self, gap_ms: u64) -> Option<Duration> {
        if gap_ms <= self.min_gap_ms {
            return None;
        }
        let max_pause_ms = (self.max_pause_seconds.max(0.0) * 1000.0).round() as u64;
        Some(Duration::from_millis(gap_ms.min(max_pause_ms)))
    }

    /// Пауза между записью и следующей за ней
    pub fn pause_between(&self, entry: &SubtitleEntry, next: &SubtitleEntry) -> Option<Duration> {
        self.pause_for_gap(entry.gap_to(next))
    }
}

/// Документ в процессе сборки
struct DocumentBuilder<'a> {
    frame: &'a SsmlFrame,
    units: Vec<SsmlUnit>,
    lines: Vec<String>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(frame: &'a SsmlFrame) -> Self {
        Self {
            frame,
            units: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        !self.units.is_empty()
    }

    /// Размер документа, если добавить единицу; пересчитывается по полной сериализации
    fn size_with(&self, line: &str) -> usize {
        self.frame
            .join(self.lines.iter().map(String::as_str).chain(std::iter::once(line)))
            .len()
    }

    fn push(&mut self, unit: SsmlUnit, line: String) {
        self.units.push(unit);
        self.lines.push(line);
    }

    fn seal(self) -> SsmlDocument {
        SsmlDocument::new(self.frame.clone(), self.units)
    }
}

/// Разбивает записи субтитров на SSML документы, не превышающие лимит размера
///
/// Упаковка жадная и строго хронологическая: текст реплики и следующая за ней
/// пауза проверяются на размер по отдельности и могут попасть в разные документы.
/// Единица, которая не помещается даже в пустой документ, добавляется в него
/// принудительно, так что такой документ может превышать лимит.
pub struct SsmlChunker<'a> {
    config: &'a ChunkConfig,
    aliases: &'a AliasTable,
    frame: SsmlFrame,
}

impl<'a> SsmlChunker<'a> {
    pub fn new(config: &'a ChunkConfig, aliases: &'a AliasTable) -> Self {
        Self {
            config,
            aliases,
            frame: SsmlFrame::new(&config.rate),
        }
    }

    /// Единицы, которые нужно добавить для записи `i`: текст и, возможно, пауза
    fn units_for(&self, entries: &[SubtitleEntry], i: usize) -> Vec<SsmlUnit> {
        let entry = &entries[i];
        let mut units = vec![SsmlUnit::Text(self.aliases.apply(&entry.text))];
        if let Some(next) = entries.get(i + 1) {
            if let Some(pause) = self.config.pause_between(entry, next) {
                units.push(SsmlUnit::Break(pause));
            }
        }
        units
    }

    /// Выполняет разбиение
    pub fn chunk(&self, entries: &[SubtitleEntry]) -> Vec<SsmlDocument> {
        let max_bytes = self.config.max_bytes;
        let mut documents = Vec::new();
        let mut current = DocumentBuilder::new(&self.frame);

        for i in 0..entries.len() {
            for unit in self.units_for(entries, i) {
                let line = unit.render();
                let size = current.size_with(&line);

                if size <= max_bytes {
                    current.push(unit, line);
                } else if !current.has_content() {
                    log_warning(&format!(
                        "Запись #{} не помещается в документ: {} байт при лимите {}",
                        entries[i].index, size, max_bytes
                    ));
                    current.push(unit, line);
                } else {
                    log_trace(&format!(
                        "Документ #{} закрыт перед записью #{}",
                        documents.len() + 1,
                        entries[i].index
                    ));
                    let sealed = std::mem::replace(&mut current, DocumentBuilder::new(&self.frame));
                    documents.push(sealed.seal());
                    current.push(unit, line);
                }
            }
        }

        if current.has_content() {
            documents.push(current.seal());
        }

        log_debug(&format!(
            "{} записей субтитров разбито на {} SSML документов",
            entries.len(),
            documents.len()
        ));

        documents
    }
}

/// Разбивает записи на документы с заданными параметрами и алиасами
pub fn chunk_entries(entries: &[SubtitleEntry], config: &ChunkConfig, aliases: &AliasTable) -> Vec<SsmlDocument> {
    SsmlChunker::new(config, aliases).chunk(entries)
}
