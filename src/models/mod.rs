pub mod contracts;
pub mod jobs;
pub mod money;
pub mod profiles;
