// Tool-invocation protocol: wire types, tool registry, built-in tools and the
// protocol server

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{ErrorCode, McpError};
pub use protocol::{Envelope, McpRequest, Outcome, ToolResult, WireRequest};
pub use server::McpServer;
