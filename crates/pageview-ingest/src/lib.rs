pub mod cli;
pub mod ingestor;
pub mod reporter;
