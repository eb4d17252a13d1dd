use crate::error::{Error, Result};
use crate::logging::{log_debug, log_info, log_warning};
use crate::ssml::document::SsmlDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Доступ к файловой системе, который нужен эмиттеру
///
/// Алгоритм разбиения не работает с диском, вся запись идет через этот интерфейс.
pub trait OutputFs {
    /// Возвращает имена обычных файлов в каталоге
    fn list_files(&self, dir: &Path) -> Result<Vec<String>>;

    /// Удаляет файл
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Записывает файл целиком
    fn write_file(&self, path: &Path, contents: &str) -> Result<()>;
}

impl<T: OutputFs + ?Sized> OutputFs for &T {
    fn list_files(&self, dir: &Path) -> Result<Vec<String>> {
        (**self).list_files(dir)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        (**self).remove_file(path)
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        (**self).write_file(path, contents)
    }
}

/// Локальная файловая система
///
/// Файл сначала пишется во временный скрытый файл рядом с целевым и затем
/// переименовывается, поэтому наполовину записанный документ не бывает виден.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl OutputFs for LocalFs {
    fn list_files(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidParameters(format!("Invalid output path: {}", path.display())))?;
        let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

        fs::write(&tmp_path, contents)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::Io(e));
        }
        Ok(())
    }
}

/// Логическое имя выходного файла: каталог, основа имени и расширение
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    path: PathBuf,
    stem: String,
    extension: String,
}

impl OutputTarget {
    /// Разбирает путь вида `dir/base.ext`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::InvalidParameters(format!("Invalid output path: {}", path.display())))?
            .to_string();
        let extension = match path.extension() {
            Some(ext) => format!(
                ".{}",
                ext.to_str().ok_or_else(|| Error::InvalidParameters(format!(
                    "Invalid output extension: {}",
                    path.display()
                )))?
            ),
            None => String::new(),
        };

        Ok(Self { path, stem, extension })
    }

    /// Точный путь для единственного документа
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Каталог, в котором лежат выходные файлы
    pub fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Путь для части с номером `n` (нумерация с 1)
    pub fn part_path(&self, n: usize) -> PathBuf {
        self.path
            .with_file_name(format!("{}_part{}{}", self.stem, n, self.extension))
    }

    /// Принадлежит ли файл с таким именем этому выходу (основной файл или любая часть)
    pub fn owns(&self, file_name: &str) -> bool {
        let exact = format!("{}{}", self.stem, self.extension);
        let part_prefix = format!("{}_part", self.stem);
        file_name == exact || (file_name.starts_with(&part_prefix) && file_name.ends_with(&self.extension))
    }
}

/// Файл, который будет записан
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Полностью вычисленный набор выходных файлов
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub target: OutputTarget,
    pub files: Vec<PlannedFile>,
}

impl OutputPlan {
    /// Один документ пишется в точный путь, несколько в `<base>_part<N><ext>`
    pub fn new(documents: &[SsmlDocument], target: OutputTarget) -> Self {
        let files = match documents {
            [single] => vec![PlannedFile {
                path: target.path().to_path_buf(),
                contents: single.render(),
            }],
            _ => documents
                .iter()
                .enumerate()
                .map(|(i, doc)| PlannedFile {
                    path: target.part_path(i + 1),
                    contents: doc.render(),
                })
                .collect(),
        };

        Self { target, files }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|file| file.path.clone()).collect()
    }
}

/// Записывает SSML документы на диск, удаляя результаты предыдущего запуска
///
/// Один выход не должен обрабатываться двумя эмиттерами одновременно.
pub struct SsmlEmitter<F: OutputFs> {
    fs: F,
}

impl SsmlEmitter<LocalFs> {
    /// Эмиттер, работающий с локальной файловой системой
    pub fn local() -> Self {
        Self::new(LocalFs)
    }
}

impl<F: OutputFs> SsmlEmitter<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Записывает документы и возвращает пути созданных файлов
    pub fn emit<P: AsRef<Path>>(&self, documents: &[SsmlDocument], target: P) -> Result<Vec<PathBuf>> {
        let plan = OutputPlan::new(documents, OutputTarget::new(target)?);
        self.apply(&plan)?;
        Ok(plan.paths())
    }

    /// Удаляет устаревшие файлы выхода и записывает новые
    pub fn apply(&self, plan: &OutputPlan) -> Result<()> {
        let dir = plan.target.dir();

        for name in self.fs.list_files(&dir)? {
            if plan.target.owns(&name) {
                let stale = dir.join(&name);
                self.fs.remove_file(&stale)?;
                log_debug(&format!("Удален старый файл: {}", stale.display()));
            }
        }

        if plan.files.is_empty() {
            log_warning(&format!(
                "Нет документов для записи в {}",
                plan.target.path().display()
            ));
            return Ok(());
        }

        for file in &plan.files {
            self.fs.write_file(&file.path, &file.contents)?;
            log_info(&format!("SSML сгенерирован: {}", file.path.display()));
        }

        Ok(())
    }
}
