pub mod comics;
pub mod jobs;
