use std::time::Duration;

/// Одна запись субтитров: порядковый номер, время показа и текст
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// Порядковый номер записи (начиная с 1)
    pub index: usize,
    /// Время начала в миллисекундах
    pub start_ms: u64,
    /// Время окончания в миллисекундах
    pub end_ms: u64,
    /// Текст записи, переводы строк заменены пробелами
    pub text: String,
}

impl SubtitleEntry {
    /// Создает новую запись, схлопывая переводы строк в тексте в пробелы
    ///
    /// Если `end_ms` меньше `start_ms`, время окончания приравнивается ко времени начала.
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: &str) -> Self {
        Self {
            index,
            start_ms,
            end_ms: end_ms.max(start_ms),
            text: collapse_newlines(text),
        }
    }

    /// Возвращает промежуток до начала следующей записи в миллисекундах
    ///
    /// Перекрывающиеся записи дают нулевой промежуток.
    pub fn gap_to(&self, next: &SubtitleEntry) -> u64 {
        next.start_ms.saturating_sub(self.end_ms)
    }
}

fn collapse_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Полная упорядоченная последовательность записей субтитров
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTrack {
    /// Записи
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleTrack {
    /// Создает пустую дорожку
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Добавляет запись в дорожку
    pub fn add(&mut self, entry: SubtitleEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubtitleEntry> {
        self.entries.iter()
    }

    /// Возвращает записи в виде среза
    pub fn as_slice(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    /// Сортирует записи по времени начала и перенумеровывает их с 1
    ///
    /// Сортировка устойчивая: записи с одинаковым временем начала сохраняют исходный порядок.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|entry| entry.start_ms);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.index = i + 1;
        }
    }

    /// Возвращает время от начала первой до конца последней записи
    pub fn total_duration(&self) -> Duration {
        let min_start = self.entries.iter().map(|e| e.start_ms).min();
        let max_end = self.entries.iter().map(|e| e.end_ms).max();

        match (min_start, max_end) {
            (Some(start), Some(end)) => Duration::from_millis(end.saturating_sub(start)),
            _ => Duration::ZERO,
        }
    }
}

impl From<Vec<SubtitleEntry>> for SubtitleTrack {
    fn from(entries: Vec<SubtitleEntry>) -> Self {
        Self { entries }
    }
}

impl std::ops::Index<usize> for SubtitleTrack {
    type Output = SubtitleEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}
