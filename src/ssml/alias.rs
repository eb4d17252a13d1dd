/// Правило произношения: фраза выводится как есть, но читается как `label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    /// Искомая фраза (буквальное совпадение подстроки)
    pub phrase: String,
    /// Как фразу следует произносить
    pub label: String,
}

impl AliasRule {
    /// Создает правило; без явной метки фраза читается сама собой
    pub fn new(phrase: impl Into<String>, label: Option<String>) -> Self {
        let phrase = phrase.into();
        let label = label.unwrap_or_else(|| phrase.clone());
        Self { phrase, label }
    }

    /// Возвращает SSML разметку `<sub>` для этого правила
    pub fn markup(&self, escape_label: bool) -> String {
        let label = if escape_label {
            escape_attribute(&self.label)
        } else {
            self.label.clone()
        };
        format!("<sub alias=\"{}\">{}</sub>", label, self.phrase)
    }
}

/// Упорядоченный набор правил произношения
///
/// Правила применяются строго в порядке добавления, и каждое следующее правило
/// работает с текстом, уже измененным предыдущими. Поэтому ключ одного правила
/// может совпасть внутри разметки, вставленной другим.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    rules: Vec<AliasRule>,
    escape_labels: bool,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            escape_labels: true,
        }
    }
}

impl AliasTable {
    /// Создает пустую таблицу с экранированием меток
    pub fn new() -> Self {
        Self::default()
    }

    /// Включает или отключает экранирование меток в атрибуте `alias`
    pub fn with_escaping(mut self, escape_labels: bool) -> Self {
        self.escape_labels = escape_labels;
        self
    }

    /// Добавляет правило
    ///
    /// Повторная фраза сохраняет позицию первого вхождения и получает новую метку.
    pub fn push(&mut self, rule: AliasRule) {
        match self.rules.iter_mut().find(|r| r.phrase == rule.phrase) {
            Some(existing) => existing.label = rule.label,
            None => self.rules.push(rule),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasRule> {
        self.rules.iter()
    }

    pub fn escapes_labels(&self) -> bool {
        self.escape_labels
    }

    /// Применяет все правила к тексту
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            if rule.phrase.is_empty() {
                continue;
            }
            result = result.replace(&rule.phrase, &rule.markup(self.escape_labels));
        }
        result
    }
}

impl FromIterator<AliasRule> for AliasTable {
    fn from_iter<I: IntoIterator<Item = AliasRule>>(iter: I) -> Self {
        let mut table = AliasTable::new();
        for rule in iter {
            table.push(rule);
        }
        table
    }
}

/// Экранирует строку для значения XML атрибута
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
