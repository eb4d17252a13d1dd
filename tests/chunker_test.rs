use std::time::Duration;

use srt_ssml::ssml::{chunk_entries, SsmlFrame};
use srt_ssml::{AliasRule, AliasTable, ChunkConfig, SsmlDocument, SsmlUnit, SubtitleEntry};

fn entry(index: usize, start_ms: u64, end_ms: u64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(index, start_ms, end_ms, text)
}

fn aliases(rules: &[(&str, &str)]) -> AliasTable {
    rules
        .iter()
        .map(|(phrase, label)| AliasRule::new(*phrase, Some(label.to_string())))
        .collect()
}

// Детерминированный генератор псевдослучайных чисел для тестов свойств
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_entries(seed: u64, count: usize) -> Vec<SubtitleEntry> {
    let mut rng = Lcg(seed);
    let words = ["hola", "NASA", "señor", "año", "the", "launch", "über", "日本", "R&D", "ok"];
    let mut entries = Vec::with_capacity(count);
    let mut time = 0u64;

    for i in 0..count {
        let start = time + rng.next(4000);
        let end = start + 200 + rng.next(3000);
        let word_count = 1 + rng.next(25) as usize;
        let text = (0..word_count)
            .map(|_| words[rng.next(words.len() as u64) as usize])
            .collect::<Vec<_>>()
            .join(" ");
        entries.push(entry(i + 1, start, end, &text));
        time = end;
    }
    entries
}

fn flatten(docs: &[SsmlDocument]) -> Vec<SsmlUnit> {
    docs.iter().flat_map(|doc| doc.units().iter().cloned()).collect()
}

#[test]
fn test_scenario_a_single_entry() {
    let docs = chunk_entries(
        &[entry(1, 0, 1000, "Hello world")],
        &ChunkConfig::default(),
        &AliasTable::new(),
    );

    assert_eq!(docs.len(), 1);
    assert_eq!(
        docs[0].render(),
        "<speak>\n<prosody rate=\"100%\">\nHello world\n</prosody>\n</speak>"
    );
}

#[test]
fn test_scenario_b_long_gap_becomes_break() {
    let entries = vec![entry(1, 0, 1000, "First"), entry(2, 3500, 4000, "Second")];
    let docs = chunk_entries(&entries, &ChunkConfig::default(), &AliasTable::new());

    assert_eq!(docs.len(), 1);
    assert_eq!(
        docs[0].render(),
        "<speak>\n<prosody rate=\"100%\">\nFirst\n<break time=\"2.50s\"/>\nSecond\n</prosody>\n</speak>"
    );
}

#[test]
fn test_scenario_c_short_gap_has_no_break() {
    let entries = vec![entry(1, 0, 1000, "First"), entry(2, 1050, 2000, "Second")];
    let docs = chunk_entries(&entries, &ChunkConfig::default(), &AliasTable::new());

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].breaks().count(), 0);
    assert!(!docs[0].render().contains("<break"));
}

#[test]
fn test_scenario_d_alias_substitution() {
    let docs = chunk_entries(
        &[entry(1, 0, 1000, "NASA launched it")],
        &ChunkConfig::default(),
        &aliases(&[("NASA", "N-A-S-A")]),
    );

    assert_eq!(
        docs[0].text_lines().collect::<Vec<_>>(),
        vec!["<sub alias=\"N-A-S-A\">NASA</sub> launched it"]
    );
}

#[test]
fn test_scenario_e_split_at_sixth_entry() {
    let entries: Vec<_> = (1..=10)
        .map(|i| entry(i, i as u64 * 1000, i as u64 * 1000 + 950, &format!("Line {:02}", i)))
        .collect();
    let first_five: Vec<String> = (1..=5).map(|i| format!("Line {:02}", i)).collect();
    let max_bytes = SsmlFrame::new("100%")
        .join(first_five.iter().map(String::as_str))
        .len();
    let config = ChunkConfig { max_bytes, ..ChunkConfig::default() };

    let docs = chunk_entries(&entries, &config, &AliasTable::new());

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].text_lines().collect::<Vec<_>>(), first_five);
    assert_eq!(
        docs[1].text_lines().collect::<Vec<_>>(),
        (6..=10).map(|i| format!("Line {:02}", i)).collect::<Vec<_>>()
    );
    for doc in &docs {
        assert!(doc.byte_len() <= max_bytes);
    }
}

#[test]
fn test_scenario_f_oversized_entry_is_kept() {
    let text = "x".repeat(500);
    let config = ChunkConfig { max_bytes: 100, ..ChunkConfig::default() };

    let docs = chunk_entries(&[entry(1, 0, 1000, &text)], &config, &AliasTable::new());

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].text_lines().collect::<Vec<_>>(), vec![text.as_str()]);
    assert!(docs[0].byte_len() > 100);
}

#[test]
fn test_oversized_entry_in_the_middle_gets_own_document() {
    let big = "y".repeat(300);
    let entries = vec![
        entry(1, 0, 1000, "before"),
        entry(2, 1000, 2000, &big),
        entry(3, 2000, 3000, "after"),
    ];
    let config = ChunkConfig { max_bytes: 120, ..ChunkConfig::default() };

    let docs = chunk_entries(&entries, &config, &AliasTable::new());

    assert_eq!(docs.len(), 3);
    assert_eq!(docs[1].text_lines().collect::<Vec<_>>(), vec![big.as_str()]);
    assert_eq!(docs[2].text_lines().collect::<Vec<_>>(), vec!["after"]);
}

#[test]
fn test_rate_appears_in_every_document() {
    let entries = random_entries(7, 40);
    let config = ChunkConfig {
        rate: "85%".to_string(),
        max_bytes: 400,
        ..ChunkConfig::default()
    };

    let docs = chunk_entries(&entries, &config, &AliasTable::new());

    assert!(docs.len() > 1);
    for doc in &docs {
        let rendered = doc.render();
        assert!(rendered.starts_with("<speak>\n<prosody rate=\"85%\">\n"));
        assert!(rendered.ends_with("\n</prosody>\n</speak>"));
    }
}

#[test]
fn test_size_bound_holds() {
    for seed in 1..20 {
        let entries = random_entries(seed, 120);
        let max_bytes = 200 + (seed as usize * 37) % 800;
        let config = ChunkConfig { max_bytes, ..ChunkConfig::default() };

        let docs = chunk_entries(&entries, &config, &aliases(&[("NASA", "N-A-S-A")]));

        for doc in &docs {
            if doc.units().len() > 1 {
                assert!(
                    doc.byte_len() <= max_bytes,
                    "seed {}: document of {} bytes exceeds {}",
                    seed,
                    doc.byte_len(),
                    max_bytes
                );
            }
            assert_eq!(doc.byte_len(), doc.render().as_bytes().len());
        }
    }
}

#[test]
fn test_order_is_preserved() {
    let rules = aliases(&[("NASA", "N-A-S-A"), ("ok", "okay")]);
    for seed in 1..10 {
        let entries = random_entries(seed, 80);
        let config = ChunkConfig { max_bytes: 350, ..ChunkConfig::default() };

        let docs = chunk_entries(&entries, &config, &rules);

        let produced: Vec<String> = docs
            .iter()
            .flat_map(|doc| doc.text_lines().map(str::to_string).collect::<Vec<_>>())
            .collect();
        let expected: Vec<String> = entries.iter().map(|e| rules.apply(&e.text)).collect();
        assert_eq!(produced, expected);
    }
}

#[test]
fn test_pauses_match_gaps() {
    let config = ChunkConfig { max_bytes: 300, ..ChunkConfig::default() };
    for seed in 1..10 {
        let entries = random_entries(seed, 60);
        let units = flatten(&chunk_entries(&entries, &config, &AliasTable::new()));

        let mut pos = 0;
        for (i, current) in entries.iter().enumerate() {
            assert!(matches!(units[pos], SsmlUnit::Text(_)));
            pos += 1;

            let Some(next) = entries.get(i + 1) else { continue };
            let gap = next.start_ms.saturating_sub(current.end_ms);
            if gap > 100 {
                let expected = Duration::from_millis(gap.min(3000));
                assert_eq!(units[pos], SsmlUnit::Break(expected), "seed {} entry {}", seed, i);
                pos += 1;
            }
        }
        assert_eq!(pos, units.len(), "no units after the last entry");
    }
}

#[test]
fn test_no_empty_documents() {
    for seed in 1..10 {
        let entries = random_entries(seed, 50);
        let config = ChunkConfig { max_bytes: 60, ..ChunkConfig::default() };

        let docs = chunk_entries(&entries, &config, &AliasTable::new());

        assert!(docs.iter().all(|doc| !doc.is_empty()));
    }
}

#[test]
fn test_break_seconds_follow_millisecond_gap() {
    let entries = vec![
        entry(1, 0, 1000, "one"),
        entry(2, 2235, 3000, "two"),
        entry(3, 4265, 5000, "three"),
    ];
    let docs = chunk_entries(&entries, &ChunkConfig::default(), &AliasTable::new());

    let rendered = docs[0].render();
    assert!(rendered.contains("one\n<break time=\"1.24s\"/>\ntwo"));
    assert!(rendered.contains("two\n<break time=\"1.26s\"/>\nthree"));
}
