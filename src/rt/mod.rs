pub use channel::Rx;
pub use deferred::{handler, Deferred, Fulfill, Handler, Outcome, Reject, State};
pub use error::{Error, TypeError};
pub use machine::{Guard, Machine};
pub use object::{Function, Object, Record};
pub use queue::{Handle, Queue, Task};
pub use value::Value;

mod channel;
mod deferred;
mod error;
mod machine;
mod object;
mod queue;
mod reaction;
mod resolve;
mod value;
