//! Rename and delete operations for jingtool, and the request engine that
//! fronts them.
//!
//! Batch operations never fail as a whole: each input item yields exactly
//! one [`OperationOutcome`](jingtool_core::OperationOutcome), in input
//! order, whatever happens to its neighbours.

mod delete;
mod engine;
mod operation;
mod rename;

pub use delete::{delete_many, delete_one};
pub use engine::{FileEngine, FixedPicker, FolderPicker, NoPicker};
pub use operation::{OperationType, Request, Response};
pub use rename::{rename_batch, rename_destination, rename_one, validate_filename};

pub use tokio_util::sync::CancellationToken;
