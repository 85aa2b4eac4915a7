// Text preprocessing: language resources, tokenization, language filtering.

pub mod detect;
pub mod language;
pub mod preprocess;
pub mod tokenizer;

pub use detect::{filter_by_language, LanguageDetector, StopwordDetector};
pub use language::Language;
pub use preprocess::{PreprocessingConfig, TextOptions};
pub use tokenizer::Tokenizer;
