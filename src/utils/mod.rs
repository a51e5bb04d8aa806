pub mod batch;
pub mod file_ops;
pub mod reporting;
