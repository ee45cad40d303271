//! Application-level orchestration.
//!
//! This module owns the session (array and control values), run lifecycle control
//! (start/stop/regenerate) and post-run processing. UI/CLI layers call into this
//! module to keep responsibilities separated.

mod controller;
mod post_process;
pub(crate) mod session;

pub(crate) use controller::{run_controller, UiCommand};
pub(crate) use post_process::process_run_completion;
