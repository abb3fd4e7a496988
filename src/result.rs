use super::errors::TaskError;

/// Итог выполнения одной задачи: значение либо её локальная ошибка.
pub type TaskResult<T> = Result<T, TaskError>;
