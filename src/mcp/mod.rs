/// JSON-RPC protocol implementation
///
/// This module handles the wire protocol: message types, framing and
/// request routing.

pub mod protocol;
pub mod server;

// Re-export main types
pub use server::McpServer;
