pub mod ocr;

pub use ocr::TextExtractor;
