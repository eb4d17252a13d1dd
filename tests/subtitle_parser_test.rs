use srt_ssml::{subtitle, Error, Result, SrtParser, VttParser};
use tempfile::{Builder, NamedTempFile};

#[test]
fn test_parse_empty_srt_file() -> Result<()> {
    // Пустой файл дает пустую дорожку
    let temp_file = NamedTempFile::new().unwrap();

    let subtitles = SrtParser::parse_file(temp_file.path())?;

    assert_eq!(subtitles.len(), 0);
    Ok(())
}

#[test]
fn test_parse_valid_srt() -> Result<()> {
    let temp_file = NamedTempFile::new().unwrap();
    let srt_content = "1
00:00:01,000 --> 00:00:05,000
Hello, world!

2
00:00:06,000 --> 00:00:10,500
This is
a test.
";
    std::fs::write(temp_file.path(), srt_content).unwrap();

    let subtitles = SrtParser::parse_file(temp_file.path())?;

    assert_eq!(subtitles.len(), 2);

    let first = &subtitles[0];
    assert_eq!(first.index, 1);
    assert_eq!(first.start_ms, 1000);
    assert_eq!(first.end_ms, 5000);
    assert_eq!(first.text, "Hello, world!");

    let second = &subtitles[1];
    assert_eq!(second.start_ms, 6000);
    assert_eq!(second.end_ms, 10_500);
    assert_eq!(second.text, "This is a test.");
    assert_eq!(first.gap_to(second), 1000);

    Ok(())
}

#[test]
fn test_malformed_srt_entries_are_skipped() -> Result<()> {
    let temp_file = NamedTempFile::new().unwrap();
    let srt_content = "1
00:00:01,000 --> 00:00:02,000
Good one

2
00:00:xx,000 --> 00:00:04,000
Broken timestamp

3
00:00:05,000 --> 00:00:06,000
Another good one
";
    std::fs::write(temp_file.path(), srt_content).unwrap();

    let subtitles = SrtParser::parse_file(temp_file.path())?;

    let texts: Vec<_> = subtitles.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Good one", "Another good one"]);
    Ok(())
}

#[test]
fn test_parse_missing_srt_file_is_io_error() {
    let result = SrtParser::parse_file("/definitely/not/here.srt");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_parse_vtt_with_metadata() -> Result<()> {
    let temp_file = NamedTempFile::new().unwrap();
    let vtt_content = r#"WEBVTT - Some title

NOTE
This is a comment and should be ignored.

00:00:01.000 --> 00:00:05.000
Hello, world!

NOTE Another comment
This should also be ignored.

00:00:06.000 --> 00:00:10.000
This is a test.
"#;
    std::fs::write(temp_file.path(), vtt_content).unwrap();

    let subtitles = VttParser::parse_file(temp_file.path())?;

    assert_eq!(subtitles.len(), 2);
    assert_eq!(subtitles[0].text, "Hello, world!");
    assert_eq!(subtitles[1].start_ms, 6000);
    assert_eq!(subtitles[1].text, "This is a test.");
    Ok(())
}

#[test]
fn test_parse_file_dispatches_on_extension() -> Result<()> {
    let vtt_file = Builder::new().suffix(".vtt").tempfile().unwrap();
    std::fs::write(vtt_file.path(), "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nfrom vtt\n").unwrap();

    let srt_file = Builder::new().suffix(".srt").tempfile().unwrap();
    std::fs::write(srt_file.path(), "1\n00:00:01,000 --> 00:00:02,000\nfrom srt\n").unwrap();

    assert_eq!(subtitle::parse_file(vtt_file.path())?[0].text, "from vtt");
    assert_eq!(subtitle::parse_file(srt_file.path())?[0].text, "from srt");
    Ok(())
}
