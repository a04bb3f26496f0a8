use std::thread::{Builder, JoinHandle};
use anyhow::Result;
use crossbeam_channel::Receiver;
use tracing::{debug, error};
use super::queue::{Command, Handle};

/// Runs a task queue on a dedicated worker thread.
pub struct Machine {
    name: String,
}

/// Stops the worker when dropped. Tasks queued before the drop still run.
pub struct Guard {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

struct Thread {
    receiver: Receiver<Command>,
}

impl Machine {
    pub fn new() -> Self {
        let name = "deferred".to_owned();
        Self { name }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    pub fn exec(self) -> Result<(Handle, Guard)> {
        let (handle, receiver) = Handle::channel();

        let thread = Thread { receiver };
        let thread = Builder::new().name(self.name).spawn(move || {
            let count = thread.exec();
            debug!("machine finished after {count} tasks");
        })?;

        let guard = Guard {
            handle: handle.clone(),
            thread: Some(thread),
        };

        Ok((handle, guard))
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Thread {
    fn exec(self) -> usize {
        debug!("machine started");

        let mut count = 0;
        loop {
            match self.receiver.recv() {
                Ok(Command::Task(task))    => task(),
                Ok(Command::Stop) | Err(_) => break,
            }
            count += 1;
        }

        count
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        if let Some(handle) = self.thread.take() {
            if let Err(e) = self.handle.stop() {
                error!("machine stop failed: {e:?}");
            }
            match handle.join() {
                Ok(()) => (),
                Err(e) => error!("join error: {e:?}"),
            }
        }
    }
}
