//! Fixed-size worker pool draining one FIFO queue.
//!
//! One mutex guards the queue, the active-job count and the shutdown flag.
//! `work_available` wakes idle workers; `work_complete` wakes `wait_all`.
//!
//! # Usage
//!
//! ```ignore
//! let pool = WorkerPool::new(4)?;
//!
//! // Queue work (non-blocking)
//! pool.enqueue(move || build_mesh());
//!
//! // Block until the queue is empty and no job is running
//! pool.wait_all();
//! ```

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::error::{ConfigError, PlanetError};

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct Queue {
  jobs: VecDeque<Job>,
  active: usize,
  shutdown: bool,
}

impl Queue {
  #[inline]
  fn is_idle(&self) -> bool {
    self.jobs.is_empty() && self.active == 0
  }
}

#[derive(Default)]
struct Shared {
  queue: Mutex<Queue>,
  work_available: Condvar,
  work_complete: Condvar,
}

impl Shared {
  fn lock(&self) -> MutexGuard<'_, Queue> {
    self.queue.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Long-lived generation threads.
pub struct WorkerPool {
  shared: Arc<Shared>,
  threads: Vec<JoinHandle<()>>,
  num_threads: usize,
}

impl WorkerPool {
  /// Spawn `num_threads` named workers.
  ///
  /// Threads already started are shut down if a later spawn fails.
  pub fn new(num_threads: usize) -> Result<Self, PlanetError> {
    if num_threads == 0 {
      return Err(ConfigError::NoWorkerThreads.into());
    }

    let mut pool = Self {
      shared: Arc::new(Shared::default()),
      threads: Vec::with_capacity(num_threads),
      num_threads,
    };

    for index in 0..num_threads {
      let shared = Arc::clone(&pool.shared);
      let handle = thread::Builder::new()
        .name(format!("planet-worker-{index}"))
        .spawn(move || worker_loop(&shared))
        .map_err(|source| PlanetError::WorkerSpawn { index, source })?;
      pool.threads.push(handle);
    }

    tracing::debug!(num_threads, "worker pool started");
    Ok(pool)
  }

  /// Append a job and wake one worker. Jobs enqueued after shutdown are dropped.
  pub fn enqueue<F>(&self, job: F)
  where
    F: FnOnce() + Send + 'static,
  {
    let mut queue = self.shared.lock();
    if queue.shutdown {
      tracing::warn!("job enqueued after worker pool shutdown, dropping");
      return;
    }
    queue.jobs.push_back(Box::new(job));
    drop(queue);
    self.shared.work_available.notify_one();
  }

  /// Block until the queue is empty and no job is running.
  pub fn wait_all(&self) {
    let mut queue = self.shared.lock();
    while !queue.is_idle() {
      queue = self
        .shared
        .work_complete
        .wait(queue)
        .unwrap_or_else(PoisonError::into_inner);
    }
  }

  /// Jobs waiting to start.
  pub fn queue_len(&self) -> usize {
    self.shared.lock().jobs.len()
  }

  /// Jobs currently running.
  pub fn active_count(&self) -> usize {
    self.shared.lock().active
  }

  pub fn num_threads(&self) -> usize {
    self.num_threads
  }

  /// Stop all workers and join them. Running jobs finish; queued jobs are
  /// dropped. Returns how many were discarded. Idempotent.
  pub fn shutdown(&mut self) -> usize {
    let discarded: Vec<Job> = {
      let mut queue = self.shared.lock();
      queue.shutdown = true;
      queue.jobs.drain(..).collect()
    };
    self.shared.work_available.notify_all();

    for handle in self.threads.drain(..) {
      if handle.join().is_err() {
        tracing::error!("worker thread panicked outside a job");
      }
    }

    self.shared.work_complete.notify_all();

    if !discarded.is_empty() {
      tracing::debug!(discarded = discarded.len(), "worker pool dropped queued jobs");
    }
    discarded.len()
  }
}

impl Drop for WorkerPool {
  fn drop(&mut self) {
    self.shutdown();
  }
}

fn worker_loop(shared: &Shared) {
  loop {
    let job = {
      let mut queue = shared.lock();
      while queue.jobs.is_empty() && !queue.shutdown {
        queue = shared
          .work_available
          .wait(queue)
          .unwrap_or_else(PoisonError::into_inner);
      }
      if queue.shutdown {
        return;
      }
      let Some(job) = queue.jobs.pop_front() else {
        continue;
      };
      queue.active += 1;
      job
    };

    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
      tracing::error!(
        thread = thread::current().name().unwrap_or("worker"),
        "worker job panicked: {}",
        panic_message(&*payload)
      );
    }

    let mut queue = shared.lock();
    queue.active = queue.active.saturating_sub(1);
    if queue.is_idle() {
      shared.work_complete.notify_all();
    }
  }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    (*message).to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else {
    "unknown panic payload".to_string()
  }
}

// =============================================================================
// Tests
// =============================================================================
