//! Domain models for StudyDesk.
//!
//! # Records
//!
//! - [`Task`]: an assignment or exam with an optional due date and a
//!   pending/completed status.
//! - [`Subject`]: a school subject whose name and color are copied into tasks
//!   and marks when those are created.
//! - [`Mark`]: a recorded result; its `stars` count towards the reward score.
//! - [`Note`]: a free-form study note.
//! - [`Reward`]: a self-set reward with a star cost.
//!
//! Records never reference each other by id once stored. Cross-record data
//! (a task's subject name and color, a mark's subject name) is a snapshot
//! taken at creation time.

mod collection;
mod mark;
mod note;
mod reward;
mod subject;
mod task;

pub use collection::*;
pub use mark::*;
pub use note::*;
pub use reward::*;
pub use subject::*;
pub use task::*;
