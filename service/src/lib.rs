pub mod error;
pub mod filter_cascade;
pub mod report_file;
pub mod report_service;
