pub use thenable::Thenable;

#[cfg(feature = "tokio")]
pub mod future;
pub mod thenable;
