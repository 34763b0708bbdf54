//! Application layer: agent implementations, context providers, and the
//! dispatcher that routes typed requests to exactly one agent.

pub mod agents;
pub mod context;
pub mod dispatch;
