use std::future::Future;
use anyhow::anyhow;
use tokio::runtime::Handle as Runtime;
use crate::rt::{Deferred, Error, Handle, Value};

/// Spawns `future` on `runtime` and settles the returned value with its
/// output. A panicking future rejects with `Error::Panic` carrying the
/// panic message.
pub fn spawn<F>(handle: &Handle, runtime: &Runtime, future: F) -> Deferred
where
    F: Future<Output = Result<Value, Value>> + Send + 'static,
{
    Deferred::new(handle, |fulfill, reject| {
        let task = runtime.spawn(future);
        runtime.spawn(async move {
            match task.await {
                Ok(Ok(v))                => fulfill.fulfill(v),
                Ok(Err(e))               => reject.reject(e),
                Err(e) if e.is_panic()   => reject.reject(Value::error(Error::panic(e.into_panic()))),
                Err(e)                   => reject.reject(Value::error(anyhow!("task failed: {e}"))),
            }
        });
        Ok(())
    })
}
