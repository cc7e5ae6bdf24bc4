//! # statekit
//!
//! Tracks the identifiers of cloud resources created by the provisioning
//! scripts.
//!
//! The scripts append IDs to a JSON state file while holding an exclusive
//! `flock` on a sidecar `.lock` file. This crate is the reading side of that
//! protocol: [`StateTracker::load`] takes a shared lock, decodes the file and
//! never fails. When an S3 bucket is configured the file is mirrored with
//! `aws s3 cp` ([`StateTracker::pull`] / [`StateTracker::push`]).
//!
//! ## Example
//!
//! ```no_run
//! use execkit::SystemRunner;
//! use statekit::{RemoteStateConfig, StateTracker};
//!
//! let tracker = StateTracker::new(
//!     "created_resources.json",
//!     RemoteStateConfig::from_env(),
//!     Box::new(SystemRunner),
//! );
//!
//! let state = tracker.load();
//! println!("{} instances", state.instances.len());
//! ```

pub mod error;
pub mod lock;
pub mod remote;
pub mod tracker;
pub mod types;

pub use error::{Error, Result};
pub use lock::{LockFile, LockMode};
pub use remote::RemoteStateConfig;
pub use tracker::{PullOutcome, StateTracker};
pub use types::{ResourceKind, ResourceState};
