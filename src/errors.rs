use thiserror::Error;

/// Ошибки уровня пула. Всегда возвращаются синхронно вызывающему коду,
/// никогда не доставляются через handle задачи.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Пул из нуля потоков не имеет смысла, отклоняем при конструировании.
    #[error("thread pool requires at least one worker thread")]
    ZeroWorkers,

    /// ОС не смогла запустить рабочий поток.
    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    /// `execute` после начала shutdown: задача не попадает в очередь.
    #[error("enqueue on a stopped thread pool")]
    ShuttingDown,
}

/// Ошибки отдельной задачи. Доставляются только через её `JoinHandle` и
/// не затрагивают ни очередь, ни соседние задачи, ни воркеров.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Тело задачи запаниковало; payload паники сохранён как строка.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// Результат так и не был записан (пул разрушен аварийно).
    #[error("task result was dropped before delivery")]
    Lost,

    /// Истёк таймаут `wait_timeout`; сама задача продолжает выполняться.
    #[error("timed out waiting for task result")]
    Timeout,
}
