//! macOS workstation maintenance tools — registry, dispatch, and handlers.
//!
//! Every tool wraps one or more native OS utilities behind an injected
//! command runner, parses their textual output, and returns a structured
//! JSON record. Calls flow through the pipeline: lookup → default-fill →
//! validate → handler, with handler failures reported in-band.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod exec;
pub mod registry;
pub mod units;

pub mod cleanup;
pub mod disk;
pub mod monitor;
pub mod power;
pub mod system;

pub use config::Config;
pub use context::ToolCtx;
pub use dispatch::{DispatchError, Dispatcher};
pub use exec::{CommandOutput, CommandRunner, ExecError, SystemRunner};
pub use registry::{builtin_registry, ParamKind, ParamSpec, Registry, ToolSpec};
