// Domain-driven module structure for the Logrelay agent.

// Core pipeline
pub mod fetch;
pub mod parser;
pub mod event;

// Domain modules
pub mod conf;
pub mod runtime;
pub mod state;
