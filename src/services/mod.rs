//! Business logic, shared by the HTTP layer and the AI tool executor.

pub mod ai;
pub mod object;
pub mod placement;
