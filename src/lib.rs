//! Settle-once deferred values.
//!
//! A [`Deferred`] is created pending, settles at most once, and delivers
//! its outcome to reactions attached with [`Deferred::then`] through a
//! deferred task queue. Fulfilling with another `Deferred`, or with a
//! foreign object exposing a callable `then`, adopts that value's outcome.
//!
//! ```
//! use deferred::{Deferred, Queue, Value};
//! use deferred::rt::handler;
//!
//! let queue  = Queue::new();
//! let handle = queue.handle();
//!
//! let value = Deferred::resolve(&handle, 20)
//!     .then(handler(|v| Ok(Value::from(v.as_i64().unwrap_or(0) + 1))), None)
//!     .then(handler(|v| Ok(Value::from(v.as_i64().unwrap_or(0) * 2))), None);
//!
//! queue.run();
//! assert_eq!(value.outcome(), Some(Ok(Value::from(42))));
//! ```

pub use rt::{Deferred, Handle, Machine, Queue, Value};

pub mod ex;
pub mod rt;
