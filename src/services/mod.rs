pub mod progress;
pub mod quiz;
pub mod review_policy;
pub mod session;
