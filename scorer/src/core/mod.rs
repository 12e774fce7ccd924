//! Core scoring logic

pub mod batch;
pub mod judgement;
pub mod persona;
pub mod prompt;
pub mod scorer;

pub use batch::{BatchRunner, PacingPolicy};
pub use judgement::{JudgementError, parse_judgement};
pub use persona::{PERSONA_SPEC, classify_company_size};
pub use prompt::PromptHandler;
pub use scorer::LeadScorer;
