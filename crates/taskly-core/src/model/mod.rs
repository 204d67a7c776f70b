// ── Domain model ──
//
// Canonical task types handed to consumers. Wire types from
// `taskly-api` are converted in `crate::convert`.

mod patch;
mod task;

pub use patch::TaskPatch;
pub use task::{Task, TaskId};

pub(crate) use task::is_blank;
