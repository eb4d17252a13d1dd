mod models;
mod srt;
mod vtt;

pub use models::{SubtitleEntry, SubtitleTrack};
pub use srt::SrtParser;
pub use vtt::VttParser;

use crate::error::Result;
use std::path::Path;

/// Парсит файл субтитров, выбирая формат по расширению
///
/// `.vtt` разбирается как WebVTT, все остальное как SRT.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SubtitleTrack> {
    let path = path.as_ref();
    let is_vtt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("vtt"))
        .unwrap_or(false);

    if is_vtt {
        VttParser::parse_file(path)
    } else {
        SrtParser::parse_file(path)
    }
}
