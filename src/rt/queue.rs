use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::warn;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub(crate) enum Command {
    Task(Task),
    Stop,
}

/// Schedules tasks on a deferred task queue. Scheduling never runs the
/// task inline.
#[derive(Clone)]
pub struct Handle {
    sender: Sender<Command>,
}

/// A task queue pumped by its owner on the current thread.
pub struct Queue {
    handle:   Handle,
    receiver: Receiver<Command>,
}

impl Handle {
    pub(crate) fn channel() -> (Self, Receiver<Command>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    pub fn schedule<F: FnOnce() + Send + 'static>(&self, task: F) {
        if let Err(e) = self.send(Command::Task(Box::new(task))) {
            warn!("task dropped: {e}");
        }
    }

    pub(crate) fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    fn send(&self, cmd: Command) -> Result<()> {
        match self.sender.send(cmd) {
            Ok(()) => Ok(()),
            Err(_) => Err(anyhow!("task queue closed")),
        }
    }
}

impl Queue {
    pub fn new() -> Self {
        let (handle, receiver) = Handle::channel();
        Self { handle, receiver }
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    /// Runs the oldest ready task, returning false when none is ready.
    pub fn turn(&self) -> bool {
        loop {
            match self.receiver.try_recv() {
                Ok(Command::Task(task)) => {
                    task();
                    return true;
                }
                Ok(Command::Stop) => continue,
                Err(_)            => return false,
            }
        }
    }

    /// Runs tasks until the queue is idle, including tasks scheduled by
    /// the tasks it runs.
    pub fn run(&self) -> usize {
        let mut count = 0;
        while self.turn() {
            count += 1;
        }
        count
    }

    pub fn is_idle(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use super::Queue;

    #[test]
    fn tasks_run_in_fifo_order() {
        let queue = Queue::new();
        let log   = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let log = log.clone();
            queue.handle().schedule(move || log.lock().unwrap().push(n));
        }

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(queue.run(), 3);
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert!(queue.is_idle());
    }

    #[test]
    fn run_drains_tasks_scheduled_while_running() {
        let queue  = Queue::new();
        let handle = queue.handle();
        let log    = Arc::new(Mutex::new(Vec::new()));

        let inner = log.clone();
        handle.clone().schedule(move || {
            inner.lock().unwrap().push("outer");
            let inner = inner.clone();
            handle.schedule(move || inner.lock().unwrap().push("inner"));
        });

        assert_eq!(queue.run(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
        assert!(!queue.turn());
    }
}
