use crate::ssml::alias::escape_attribute;
use std::fmt;
use std::time::Duration;

/// Содержимое одной строки SSML документа
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsmlUnit {
    /// Строка текста субтитра (с уже примененными алиасами)
    Text(String),
    /// Пауза между репликами
    Break(Duration),
}

impl SsmlUnit {
    /// Возвращает строковое представление единицы
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            // Секунды берутся из целых миллисекунд: 1235 мс -> "1.24s"
            Self::Break(pause) => format!("<break time=\"{:.2}s\"/>", pause.as_millis() as f64 / 1000.0),
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break(_))
    }
}

impl fmt::Display for SsmlUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Фиксированные заголовок и окончание документа, зависящие от скорости речи
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsmlFrame {
    pub header: String,
    pub footer: String,
}

impl SsmlFrame {
    /// Создает рамку `<speak><prosody rate="...">`
    pub fn new(rate: &str) -> Self {
        Self {
            header: format!("<speak>\n<prosody rate=\"{}\">", escape_attribute(rate)),
            footer: "</prosody>\n</speak>".to_string(),
        }
    }

    /// Собирает документ из уже отрисованных строк
    pub fn join<'a>(&'a self, lines: impl IntoIterator<Item = &'a str>) -> String {
        let mut parts: Vec<&str> = vec![self.header.as_str()];
        parts.extend(lines);
        parts.push(self.footer.as_str());
        parts.join("\n")
    }
}

/// Завершенный SSML документ, пригодный для отдельного синтеза
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsmlDocument {
    frame: SsmlFrame,
    units: Vec<SsmlUnit>,
}

impl SsmlDocument {
    pub fn new(frame: SsmlFrame, units: Vec<SsmlUnit>) -> Self {
        Self { frame, units }
    }

    /// Единицы содержимого в порядке следования
    pub fn units(&self) -> &[SsmlUnit] {
        &self.units
    }

    /// Текстовые строки без пауз
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.units.iter().filter_map(|unit| match unit {
            SsmlUnit::Text(text) => Some(text.as_str()),
            SsmlUnit::Break(_) => None,
        })
    }

    /// Паузы документа
    pub fn breaks(&self) -> impl Iterator<Item = Duration> + '_ {
        self.units.iter().filter_map(|unit| match unit {
            SsmlUnit::Break(pause) => Some(*pause),
            SsmlUnit::Text(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Сериализует документ: заголовок, строки и окончание через `\n`
    pub fn render(&self) -> String {
        let lines: Vec<String> = self.units.iter().map(SsmlUnit::render).collect();
        self.frame.join(lines.iter().map(String::as_str))
    }

    /// Размер сериализованного документа в байтах UTF-8
    pub fn byte_len(&self) -> usize {
        self.render().len()
    }
}

impl fmt::Display for SsmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
