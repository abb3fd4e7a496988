//! Синхронный thread pool фиксированного размера с общей очередью задач
//!
//! # Features
//! - FIFO-очередь на MPMC-канале, раздача "первый свободный воркер"
//! - JoinHandle на каждую задачу: блокирующее, timeout- и poll-ожидание
//! - Обработка паник: упавшая задача не роняет воркера
//! - Graceful shutdown: очередь дорабатывается до конца
//! - Счётчики метрик
//! - Конфигурация для CPU-bound и I/O-bound workloads

pub mod errors;
pub mod handle;
pub mod model;
pub mod pool;
pub mod result;

pub use errors::{PoolError, TaskError};
pub use handle::JoinHandle;
pub use model::PoolMetrics;
pub use pool::{ThreadPool, Config};
pub use result::TaskResult;
