pub mod analytics;
pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod fetcher;
pub mod insights;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod time_format;
