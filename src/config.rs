use crate::error::{Error, Result};
use crate::logging::log_debug;
use crate::ssml::{AliasRule, AliasTable, ChunkConfig, DEFAULT_RATE};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Конфигурация проекта: параметры разбиения и словарь произношений
///
/// Файл имеет вид
/// ```json
/// {
///   "config": { "rate": "95%" },
///   "alias": { "NASA": { "alias": "N-A-S-A" }, "SQL": {} }
/// }
/// ```
/// Порядок ключей `alias` сохраняется и определяет порядок применения правил.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    pub chunk: ChunkConfig,
    pub aliases: AliasTable,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    config: ConfigSection,
    #[serde(default, deserialize_with = "ordered_alias_rules")]
    alias: Vec<AliasRule>,
}

#[derive(Debug, Deserialize)]
struct ConfigSection {
    #[serde(default = "default_rate")]
    rate: String,
    max_bytes: Option<usize>,
    min_gap_ms: Option<u64>,
    max_pause_seconds: Option<f64>,
    escape_aliases: Option<bool>,
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            max_bytes: None,
            min_gap_ms: None,
            max_pause_seconds: None,
            escape_aliases: None,
        }
    }
}

fn default_rate() -> String {
    DEFAULT_RATE.to_string()
}

/// Настройки одного правила; неизвестные поля игнорируются
#[derive(Debug, Default, Deserialize)]
struct AliasSettings {
    #[serde(default)]
    alias: Option<String>,
}

fn ordered_alias_rules<'de, D>(deserializer: D) -> std::result::Result<Vec<AliasRule>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RulesVisitor;

    impl<'de> Visitor<'de> for RulesVisitor {
        type Value = Vec<AliasRule>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of phrases to alias settings")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut rules = Vec::new();
            while let Some((phrase, settings)) = map.next_entry::<String, Option<AliasSettings>>()? {
                rules.push(AliasRule::new(phrase, settings.and_then(|s| s.alias)));
            }
            Ok(rules)
        }
    }

    deserializer.deserialize_map(RulesVisitor)
}

impl ProjectConfig {
    /// Загружает конфигурацию из JSON файла
    ///
    /// Отсутствующий или некорректный файл считается фатальной ошибкой конфигурации.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        log_debug(&format!(
            "Загружена конфигурация {}: скорость {}, правил произношения: {}",
            path.display(),
            config.chunk.rate,
            config.aliases.len()
        ));

        Ok(config)
    }

    /// Разбирает конфигурацию из JSON строки
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: ProjectFile = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid alias/config JSON: {}", e)))?;

        let defaults = ChunkConfig::default();
        let section = file.config;
        let chunk = ChunkConfig {
            rate: section.rate,
            max_bytes: section.max_bytes.unwrap_or(defaults.max_bytes),
            min_gap_ms: section.min_gap_ms.unwrap_or(defaults.min_gap_ms),
            max_pause_seconds: section.max_pause_seconds.unwrap_or(defaults.max_pause_seconds),
        };
        chunk
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        let aliases = file
            .alias
            .into_iter()
            .collect::<AliasTable>()
            .with_escaping(section.escape_aliases.unwrap_or(true));

        Ok(Self { chunk, aliases })
    }
}
