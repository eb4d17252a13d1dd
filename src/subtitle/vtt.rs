use crate::error::{Error, Result};
use crate::logging::{log_debug, log_warning};
use crate::subtitle::models::{SubtitleEntry, SubtitleTrack};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// Часы в WebVTT необязательны: "00:01.000 --> 00:04.000" тоже корректная метка
static CUE_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})\s*-->\s*(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})")
        .expect("WebVTT cue timing regex is valid")
});

/// Парсер WebVTT файлов
pub struct VttParser;

impl VttParser {
    /// Парсит VTT файл и возвращает дорожку субтитров
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SubtitleTrack> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::parse_reader(reader)
    }

    /// Парсит VTT из строки
    pub fn parse_str(content: &str) -> Result<SubtitleTrack> {
        Self::parse_reader(BufReader::new(content.as_bytes()))
    }

    /// Парсит VTT из любого источника, реализующего BufRead
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<SubtitleTrack> {
        let mut track = SubtitleTrack::new();
        let mut lines = reader.lines();

        // Проверка заголовка WebVTT
        match lines.next() {
            Some(first_line) => {
                let first_line = first_line?;
                if !first_line.trim_start_matches('\u{feff}').trim().starts_with("WEBVTT") {
                    return Err(Error::SubtitleParsing(
                        "Invalid WebVTT file: missing WEBVTT header".to_string(),
                    ));
                }
            }
            // Пустой файл - возвращаем пустую дорожку
            None => return Ok(track),
        }

        let mut current: Option<(u64, u64)> = None;
        let mut current_text = String::new();
        let mut in_note = false;

        for line_result in lines {
            let line = line_result?;
            let trimmed_line = line.trim();

            if trimmed_line.is_empty() {
                in_note = false;
                if let Some((start_ms, end_ms)) = current.take() {
                    Self::push_cue(&mut track, start_ms, end_ms, &current_text);
                }
                current_text.clear();
                continue;
            }

            if in_note {
                continue;
            }

            if current.is_none() && (trimmed_line == "NOTE" || trimmed_line.starts_with("NOTE ")) {
                in_note = true;
                continue;
            }

            if let Some(captures) = CUE_TIMING_REGEX.captures(trimmed_line) {
                if let Some((start_ms, end_ms)) = current.take() {
                    Self::push_cue(&mut track, start_ms, end_ms, &current_text);
                    current_text.clear();
                }
                let start = Self::parse_timestamp(captures.get(1).map(|m| m.as_str()), &captures[2], &captures[3], &captures[4]);
                let end = Self::parse_timestamp(captures.get(5).map(|m| m.as_str()), &captures[6], &captures[7], &captures[8]);
                match (start, end) {
                    (Some(start_ms), Some(end_ms)) => current = Some((start_ms, end_ms)),
                    _ => log_warning(&format!("Пропущена некорректная временная метка VTT: {}", trimmed_line)),
                }
            } else if current.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed_line);
            }
            // Иначе это идентификатор реплики или метаданные заголовка
        }

        if let Some((start_ms, end_ms)) = current {
            Self::push_cue(&mut track, start_ms, end_ms, &current_text);
        }

        track.sort();
        log_debug(&format!(
            "Разобрано {} реплик VTT ({:.1?})",
            track.len(),
            track.total_duration()
        ));

        Ok(track)
    }

    fn push_cue(track: &mut SubtitleTrack, start_ms: u64, end_ms: u64, text: &str) {
        if text.trim().is_empty() {
            log_warning(&format!("Пропущена пустая реплика VTT на {} мс", start_ms));
            return;
        }
        track.add(SubtitleEntry::new(track.len() + 1, start_ms, end_ms, text.trim()));
    }

    /// Переводит временную метку в миллисекунды
    fn parse_timestamp(hours: Option<&str>, minutes: &str, seconds: &str, milliseconds: &str) -> Option<u64> {
        let hours: u64 = match hours {
            Some(h) => h.parse().ok()?,
            None => 0,
        };
        let minutes: u64 = minutes.parse().ok()?;
        let seconds: u64 = seconds.parse().ok()?;
        let milliseconds: u64 = milliseconds.parse().ok()?;
        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        hours
            .checked_mul(3600)?
            .checked_add(minutes * 60 + seconds)?
            .checked_mul(1000)?
            .checked_add(milliseconds)
    }
}
