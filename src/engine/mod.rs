pub mod navigation;
pub mod progress;
pub mod quiz_attempt;
