use super::{
    errors::TaskError,
    result::TaskResult,
};
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};


/// Единица работы в очереди пула: замыкание плюс promise-обёртка,
/// связанные в момент `execute`. Вызывается ровно один раз одним воркером.
pub type Task = Box<dyn FnOnce() + Send + 'static>;


/// Handle на результат задачи с блокирующим, неблокирующим и timeout-ожиданием.
///
/// Обёртка над одноместным каналом: promise-конец зашит в задачу,
/// запись результата happens-before любого чтения через этот handle.
pub struct JoinHandle<T> {
    receiver: Receiver<TaskResult<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(receiver: Receiver<TaskResult<T>>) -> Self {
        Self { receiver }
    }

    /// Блокирует вызывающий поток до завершения задачи и возвращает её
    /// результат либо захваченную ошибку.
    pub fn wait(self) -> TaskResult<T> {
        self.receiver.recv().unwrap_or(Err(TaskError::Lost))
    }

    /// Как [`wait`](Self::wait), но не дольше `timeout`. По истечении
    /// возвращает `TaskError::Timeout`; задача при этом не отменяется.
    pub fn wait_timeout(self, timeout: Duration) -> TaskResult<T> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(TaskError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(TaskError::Lost),
        }
    }

    /// Неблокирующий опрос. `None` — задача ещё не завершилась.
    /// Результат забирается из канала: повторный вызов после `Some`
    /// вернёт уже `Some(Err(TaskError::Lost))`.
    pub fn try_wait(&self) -> Option<TaskResult<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskError::Lost)),
        }
    }
}
