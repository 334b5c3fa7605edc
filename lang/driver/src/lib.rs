mod cache;
mod config;
mod database;
mod dependency_graph;
mod fs;
mod result;
mod templates;

pub use cache::Cache;
pub use config::Config;
pub use database::{Database, GeneratedModule};
pub use dependency_graph::DependencyGraph;
pub use fs::{FileSource, FileSystemSource, InMemorySource};
pub use result::{DriverError, Error};

pub use girts_lowering::{BuildType, Environment};
