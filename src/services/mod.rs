pub mod answer_separator;
pub mod arithmetic_verifier;
pub mod llm_service;
pub mod normalizer;
pub mod report_writer;
pub mod segmenter;

pub use arithmetic_verifier::ArithmeticVerifier;
pub use llm_service::{CompletionClient, CompletionRequest, LlmService};
pub use report_writer::{ReportWriter, ScoreTotals};
