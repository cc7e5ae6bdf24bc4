//! # execkit
//!
//! A narrow abstraction over child-process execution.
//!
//! Every external command the automator runs (provisioning scripts, the
//! `aws` identity probe, remote state copies) is described as a
//! [`ProcessSpec`] value and executed through a [`ProcessRunner`]. Production
//! code uses [`SystemRunner`]; tests use [`ScriptedRunner`], which records
//! every spec and answers with canned outputs.
//!
//! ## Example
//!
//! ```no_run
//! use execkit::{ProcessRunner, ProcessSpec, SystemRunner};
//!
//! let spec = ProcessSpec::new("aws")
//!     .args(["sts", "get-caller-identity"])
//!     .capture();
//!
//! let output = SystemRunner.run(&spec).expect("failed to spawn aws");
//! println!("authenticated: {}", output.success());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fake;
pub mod runner;
pub mod spec;

pub use error::{Error, Result};
pub use fake::ScriptedRunner;
pub use runner::{ProcessRunner, SystemRunner};
pub use spec::{CommandOutput, ProcessSpec, StdioMode};
