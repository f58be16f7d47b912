pub mod prompt;
pub mod report;
