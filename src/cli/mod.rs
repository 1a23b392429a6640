pub mod orchestration;

pub use orchestration::{BumpWorkflowArgs, CommandContext, WorkflowResult};
