// The linear improvement pipeline:
// parse → analyze → match → generate → (apply) → quality check.

pub mod handlers;
pub mod pipeline;
pub mod state;
