pub mod filename;
pub mod sort;
