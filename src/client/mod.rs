//! Gateway client and builder.

mod builder;
mod core;

pub use builder::GatewayClientBuilder;
pub use core::GatewayClient;
