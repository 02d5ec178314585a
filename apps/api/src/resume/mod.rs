//! Resume Analysis — structured extraction of pasted resume text.
//!
//! Primary: the hosted model fills the `ResumeData` schema.
//! Fallback: a fixed placeholder document plus a warning for the client to
//! show, so the candidate can complete the fields by hand.

pub mod handlers;
pub mod parser;
pub mod prompts;

pub use parser::{ResumeAnalysis, ResumeParser};
