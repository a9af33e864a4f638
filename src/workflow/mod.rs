pub mod publish_flow;
pub mod stage;

pub use publish_flow::{PublishFlow, WorkflowState};
pub use stage::Stage;
