use crate::error::{Error, Result};
use std::sync::{Arc, Mutex};

/// Тип для функций обратного вызова прогресса: (процент, статус)
pub type ProgressCallback = Box<dyn Fn(f32, &str) + Send + Sync + 'static>;

#[derive(Debug, Default)]
struct ProgressState {
    completed: usize,
    total: usize,
    status: String,
}

/// Трекер прогресса пакетной обработки, считает выполненные шаги из общего числа
#[derive(Clone, Default)]
pub struct ProgressTracker {
    state: Arc<Mutex<ProgressState>>,
    callback: Option<Arc<ProgressCallback>>,
}

impl ProgressTracker {
    /// Создает новый трекер прогресса
    pub fn new() -> Self {
        Self::default()
    }

    /// Создает новый трекер прогресса с функцией обратного вызова
    pub fn with_callback(callback: ProgressCallback) -> Self {
        Self {
            state: Arc::default(),
            callback: Some(Arc::new(callback)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ProgressState>> {
        self.state
            .lock()
            .map_err(|_| Error::InvalidParameters("progress state lock poisoned".to_string()))
    }

    /// Начинает новую серию из `total` шагов
    pub fn start(&self, total: usize, status: &str) -> Result<()> {
        {
            let mut state = self.lock()?;
            state.completed = 0;
            state.total = total;
            state.status = status.to_string();
        }
        self.notify()
    }

    /// Отмечает выполнение очередного шага
    pub fn advance(&self, status: &str) -> Result<()> {
        {
            let mut state = self.lock()?;
            state.completed = (state.completed + 1).min(state.total);
            state.status = status.to_string();
        }
        self.notify()
    }

    /// Текущий прогресс в процентах; пустая серия считается завершенной
    pub fn get_progress(&self) -> f32 {
        match self.state.lock() {
            Ok(state) if state.total == 0 => 100.0,
            Ok(state) => state.completed as f32 * 100.0 / state.total as f32,
            Err(_) => 0.0,
        }
    }

    /// Текущий статус
    pub fn get_status(&self) -> String {
        self.state
            .lock()
            .map(|state| state.status.clone())
            .unwrap_or_default()
    }

    fn notify(&self) -> Result<()> {
        if let Some(callback) = &self.callback {
            let status = self.get_status();
            callback(self.get_progress(), &status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_progress_tracker() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.get_progress(), 100.0);

        tracker.start(4, "Synthesizing").unwrap();
        assert_eq!(tracker.get_progress(), 0.0);

        tracker.advance("part 1").unwrap();
        assert_eq!(tracker.get_progress(), 25.0);
        assert_eq!(tracker.get_status(), "part 1");

        for _ in 0..10 {
            tracker.advance("more").unwrap();
        }
        assert_eq!(tracker.get_progress(), 100.0);
    }

    #[test]
    fn test_progress_callback() {
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);

        let callback = Box::new(move |progress: f32, status: &str| {
            tx.lock().unwrap().send((progress, status.to_string())).unwrap();
        });

        let tracker = ProgressTracker::with_callback(callback);
        tracker.start(2, "begin").unwrap();
        tracker.advance("half").unwrap();

        assert_eq!(rx.recv().unwrap(), (0.0, "begin".to_string()));
        assert_eq!(rx.recv().unwrap(), (50.0, "half".to_string()));
    }
}
