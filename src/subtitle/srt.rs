use crate::error::Result;
use crate::logging::{log_debug, log_warning};
use crate::subtitle::models::{SubtitleEntry, SubtitleTrack};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// HH:MM:SS,mmm --> HH:MM:SS,mmm, точка вместо запятой тоже допускается
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})")
        .expect("SRT timestamp regex is valid")
});

/// Парсер SRT файлов
///
/// Парсинг терпим к ошибкам: блоки без корректной временной метки пропускаются
/// с предупреждением, а не прерывают разбор всего файла.
pub struct SrtParser;

impl SrtParser {
    /// Парсит SRT файл (UTF-8, допускается BOM)
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SubtitleTrack> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse_str(&content))
    }

    /// Парсит SRT из строки
    pub fn parse_str(content: &str) -> SubtitleTrack {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let normalized = content.replace("\r\n", "\n");

        let mut track = SubtitleTrack::new();
        let mut skipped = 0usize;

        for (block_no, block) in split_blocks(&normalized).into_iter().enumerate() {
            match Self::parse_block(&block) {
                Some(entry) => track.add(entry),
                None => {
                    skipped += 1;
                    log_warning(&format!(
                        "Пропущен некорректный блок субтитров #{}: {:?}",
                        block_no + 1,
                        block.first().copied().unwrap_or_default()
                    ));
                }
            }
        }

        track.sort();

        log_debug(&format!(
            "Разобрано {} записей SRT ({:.1?}), пропущено блоков: {}",
            track.len(),
            track.total_duration(),
            skipped
        ));

        track
    }

    /// Разбирает один блок: необязательный номер, временная метка, строки текста
    fn parse_block(lines: &[&str]) -> Option<SubtitleEntry> {
        let timestamp_pos = lines
            .iter()
            .take(2)
            .position(|line| TIMESTAMP_REGEX.is_match(line.trim()))?;

        let index = if timestamp_pos == 1 {
            lines[0].trim().parse::<usize>().ok()?
        } else {
            0
        };

        let captures = TIMESTAMP_REGEX.captures(lines[timestamp_pos].trim())?;
        let start_ms = Self::parse_timestamp(&captures[1], &captures[2], &captures[3], &captures[4])?;
        let end_ms = Self::parse_timestamp(&captures[5], &captures[6], &captures[7], &captures[8])?;

        let text = lines[timestamp_pos + 1..]
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        Some(SubtitleEntry::new(index, start_ms, end_ms, text.trim()))
    }

    /// Переводит компоненты временной метки в миллисекунды
    ///
    /// Дробная часть короче трех цифр дополняется нулями справа ("5" = 500 мс).
    fn parse_timestamp(hours: &str, minutes: &str, seconds: &str, fraction: &str) -> Option<u64> {
        let hours: u64 = hours.parse().ok()?;
        let minutes: u64 = minutes.parse().ok()?;
        let seconds: u64 = seconds.parse().ok()?;
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        let millis: u64 = format!("{:0<3}", fraction).parse().ok()?;

        hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)?
            .checked_mul(1000)?
            .checked_add(millis)
    }
}

/// Делит содержимое на блоки, разделенные пустыми строками
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(SrtParser::parse_timestamp("00", "00", "00", "000"), Some(0));
        assert_eq!(SrtParser::parse_timestamp("00", "00", "01", "250"), Some(1250));
        assert_eq!(SrtParser::parse_timestamp("01", "30", "45", "500"), Some(5_445_500));
        assert_eq!(SrtParser::parse_timestamp("00", "00", "00", "5"), Some(500));
        assert_eq!(SrtParser::parse_timestamp("00", "61", "00", "000"), None);
    }

    #[test]
    fn test_parse_simple() {
        let srt = "1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n\n2\n00:00:05,000 --> 00:00:08,000\nThis is a test.\n";
        let track = SrtParser::parse_str(srt);

        assert_eq!(track.len(), 2);
        assert_eq!(track[0].start_ms, 1000);
        assert_eq!(track[0].end_ms, 4000);
        assert_eq!(track[0].text, "Hello, world!");
        assert_eq!(track[1].index, 2);
        assert_eq!(track[1].text, "This is a test.");
    }

    #[test]
    fn test_parse_multiline_is_collapsed() {
        let srt = "1\n00:00:01,000 --> 00:00:04,000\nHello,\nworld!\n";
        let track = SrtParser::parse_str(srt);
        assert_eq!(track[0].text, "Hello, world!");
    }

    #[test]
    fn test_parse_bom_and_crlf() {
        let srt = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHola\r\n\r\n";
        let track = SrtParser::parse_str(srt);
        assert_eq!(track.len(), 1);
        assert_eq!(track[0].text, "Hola");
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let srt = "1\nnot a timestamp\nbroken\n\n2\n00:00:05,000 --> 00:00:06,000\nkept\n\nx\n00:00:07,000 --> 00:00:08,000\nbad index\n";
        let track = SrtParser::parse_str(srt);
        assert_eq!(track.len(), 1);
        assert_eq!(track[0].text, "kept");
    }

    #[test]
    fn test_out_of_order_entries_are_sorted() {
        let srt = "1\n00:00:05,000 --> 00:00:06,000\nlater\n\n2\n00:00:01,000 --> 00:00:02,000\nearlier\n";
        let track = SrtParser::parse_str(srt);
        assert_eq!(track[0].text, "earlier");
        assert_eq!(track[1].text, "later");
    }

    #[test]
    fn test_overflowing_hours_are_skipped() {
        let srt = "1\n99999999999999999:00:00,000 --> 99999999999999999:00:01,000\nbroken\n\n2\n00:00:02,000 --> 00:00:03,000\nkept\n";
        let track = SrtParser::parse_str(srt);
        assert_eq!(track.len(), 1);
        assert_eq!(track[0].text, "kept");
        assert_eq!(track[0].start_ms, 2000);
    }
}
