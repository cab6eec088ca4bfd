pub mod backend;
pub mod question_ctx;
pub mod question_flow;
pub mod segmentation;

pub use backend::{DemoBackend, GradingBackend, ModelBackend};
pub use question_ctx::QuestionCtx;
pub use question_flow::{ProcessResult, QuestionFlow};
pub use segmentation::segment_questions;
