use super::{
    errors::{PoolError, TaskError},
    handle::{
        JoinHandle,
        Task,
    },
    model::PoolMetrics,
};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error, info};


/// Конфигурация пула потоков
#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: usize,
    pub name_prefix: String,
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            name_prefix: "workpool-worker".to_string(),
            stack_size: None,
        }
    }
}

impl Config {
    /// Один воркер на ядро.
    pub fn cpu_bound() -> Self {
        Self {
            num_threads: num_cpus::get(),
            ..Default::default()
        }
    }

    /// Два воркера на ядро: задачи, которые в основном спят на I/O.
    pub fn io_bound() -> Self {
        Self {
            num_threads: num_cpus::get() * 2,
            ..Default::default()
        }
    }
}


// Счётчики, разделяемые между контроллером и воркерами.
struct PoolShared {
    queued_tasks: AtomicUsize,
    total_submitted: AtomicUsize,
    completed_tasks: AtomicUsize,
    failed_tasks: AtomicUsize,
    idle_workers: AtomicUsize,
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

/// Пул потоков фиксированного размера с общей FIFO-очередью задач.
///
/// Очередь — неограниченный MPMC-канал: push будит ровно одного спящего
/// воркера, закрытие канала — broadcast для graceful shutdown. Задачи
/// раздаются в порядке отправки; порядок завершения не гарантируется.
pub struct ThreadPool {
    sender: Option<Sender<Task>>,
    workers: Vec<Worker>,
    shared: Arc<PoolShared>,
}

impl ThreadPool {
    /// Создаёт пул и сразу запускает `num_threads` воркеров.
    ///
    /// Возвращает `PoolError::ZeroWorkers` для нулевого размера.
    pub fn new(num_threads: usize) -> Result<Self, PoolError> {
        Self::with_config(Config {
            num_threads,
            ..Default::default()
        })
    }

    pub fn with_config(config: Config) -> Result<Self, PoolError> {
        if config.num_threads == 0 {
            return Err(PoolError::ZeroWorkers);
        }

        let (sender, receiver) = channel::unbounded::<Task>();
        let shared = Arc::new(PoolShared {
            queued_tasks: AtomicUsize::new(0),
            total_submitted: AtomicUsize::new(0),
            completed_tasks: AtomicUsize::new(0),
            failed_tasks: AtomicUsize::new(0),
            idle_workers: AtomicUsize::new(0),
        });

        let mut workers = Vec::with_capacity(config.num_threads);
        for id in 0..config.num_threads {
            workers.push(spawn_worker(
                id,
                &config,
                receiver.clone(),
                Arc::clone(&shared),
            )?);
        }

        info!("пул запущен: {} воркеров", config.num_threads);
        Ok(ThreadPool {
            sender: Some(sender),
            workers,
            shared,
        })
    }

    /// Отправляет задачу в очередь и немедленно возвращает handle на её
    /// будущий результат. Никогда не блокируется на выполнении.
    ///
    /// Паника внутри `task` перехватывается promise-обёрткой и доставляется
    /// через handle как `TaskError::Panicked`; воркер при этом продолжает
    /// обслуживать очередь.
    ///
    /// После начала shutdown возвращает `PoolError::ShuttingDown`, не
    /// касаясь очереди.
    pub fn execute<F, T>(&self, task: F) -> Result<JoinHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::ShuttingDown)?;

        let (tx, rx) = channel::bounded(1);
        let shared = Arc::clone(&self.shared);
        let job: Task = Box::new(move || {
            match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(value) => {
                    shared.completed_tasks.fetch_add(1, Ordering::Relaxed);
                    // Вызывающий мог уже дропнуть handle, это не ошибка.
                    let _ = tx.send(Ok(value));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!("задача запаниковала: {message}");
                    shared.failed_tasks.fetch_add(1, Ordering::Relaxed);
                    let _ = tx.send(Err(TaskError::Panicked(message)));
                }
            }
        });

        self.shared.total_submitted.fetch_add(1, Ordering::Relaxed);
        self.shared.queued_tasks.fetch_add(1, Ordering::Relaxed);
        sender.send(job).map_err(|_| PoolError::ShuttingDown)?;

        Ok(JoinHandle::new(rx))
    }

    #[inline]
    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            workers: self.workers.len(),
            idle_workers: self.shared.idle_workers.load(Ordering::Relaxed),
            queued_tasks: self.shared.queued_tasks.load(Ordering::Relaxed),
            total_submitted: self.shared.total_submitted.load(Ordering::Relaxed),
            completed_tasks: self.shared.completed_tasks.load(Ordering::Relaxed),
            failed_tasks: self.shared.failed_tasks.load(Ordering::Relaxed),
        }
    }

    /// Graceful shutdown: закрывает очередь для новых задач, даёт воркерам
    /// доработать всё уже принятое и блокируется до выхода каждого из них.
    /// Повторный вызов — no-op.
    pub fn shutdown(&mut self) {
        if self.sender.take().is_some() {
            debug!("очередь закрыта, ждём воркеров");
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.thread.take() {
                if handle.join().is_err() {
                    error!("воркер {} завершился аварийно", worker.id);
                }
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker(
    id: usize,
    config: &Config,
    receiver: Receiver<Task>,
    shared: Arc<PoolShared>,
) -> Result<Worker, PoolError> {
    let mut builder = thread::Builder::new().name(format!("{}-{id}", config.name_prefix));
    if let Some(stack_size) = config.stack_size {
        builder = builder.stack_size(stack_size);
    }

    let thread = builder.spawn(move || loop {
        // Единственная точка ожидания воркера. После закрытия канала recv
        // продолжает отдавать оставшиеся задачи и лишь потом возвращает
        // ошибку, поэтому очередь дорабатывается до конца.
        shared.idle_workers.fetch_add(1, Ordering::SeqCst);
        let message = receiver.recv();
        shared.idle_workers.fetch_sub(1, Ordering::SeqCst);

        match message {
            Ok(job) => {
                shared.queued_tasks.fetch_sub(1, Ordering::Relaxed);
                debug!("воркер {id} взял задачу");
                // Паники уже перехвачены обёрткой в execute.
                job();
            }
            Err(_) => {
                debug!("воркер {id}: очередь закрыта, выходим");
                break;
            }
        }
    })?;

    Ok(Worker {
        id,
        thread: Some(thread),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
