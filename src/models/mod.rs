pub mod question;
pub mod verdict;

pub use question::{GradeStatus, GradedRecord, QuestionRecord, UNPARSED_ANSWER};
pub use verdict::{ModelVerdict, Verdict};
