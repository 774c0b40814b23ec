pub mod check;
pub mod clickup;
pub mod config;
pub mod error;
pub mod mcp;
pub mod server;
pub mod sse;
