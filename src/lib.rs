pub mod analyzer;
pub mod config;
pub mod data_models;
pub mod fetcher;
pub mod pipeline;
pub mod ranker;
pub mod reporter;
