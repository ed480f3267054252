//! Publish workflow orchestration, separated from argument parsing in `main.rs`

pub mod orchestration;

pub use orchestration::{
    plan, publish, run_publish_workflow, Progress, PublishReport, PublishWorkflowArgs, Step,
    StepOutcome, WorkflowResult,
};
