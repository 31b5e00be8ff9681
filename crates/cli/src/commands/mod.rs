//! Subcommand implementations.
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod batch;
mod compile;
mod pve;
mod simulate;
mod validate;

pub use batch::Batch;
pub use compile::Compile;
pub use pve::Pve;
pub use simulate::Simulate;
pub use validate::Validate;
