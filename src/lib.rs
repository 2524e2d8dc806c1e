//! # linkpoint
//!
//! Client for the First Data Global Gateway (ex LinkPoint) Web Service API.
//!
//! The gateway accepts credit-card transactions (sale, preAuth, postAuth,
//! ForceTicket, Return, Credit, Void) as SOAP 1.1 envelopes posted over TLS
//! with HTTP Basic authentication plus a per-merchant TLS client certificate.
//!
//! ## Overview
//!
//! A [`GatewayClient`] owns one in-flight transaction at a time: card, payment,
//! billing and shipping fields are accumulated on an [`OrderRequest`], rendered
//! into the envelope the gateway schema mandates (fixed section order, derived
//! fields injected from client configuration), submitted, and the raw exchange
//! is classified into success or failure as a [`GatewayResponse`].
//!
//! Transport and gateway failures are never surfaced as `Err`: `submit()`
//! always completes with a [`GatewayResponse`] and callers react through
//! [`GatewayResponse::is_success`] / [`GatewayResponse::error_message`].
//! Only input validation (order-id format, card-expiry format, enum
//! membership) returns [`Error`] values, raised before anything is stored.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use linkpoint::{Environment, GatewayClient, TransactionKind};
//!
//! #[tokio::main]
//! async fn main() -> linkpoint::Result<()> {
//!     let mut client = GatewayClient::builder()
//!         .username("WS12345._.1")
//!         .password("apipassword")
//!         .cert_dir("/etc/linkpoint/certs")
//!         .environment(Environment::Sandbox)
//!         .build()?;
//!
//!     client
//!         .order()
//!         .set_transaction_kind(TransactionKind::Sale)
//!         .set_charge_total(42.50)
//!         .set_card_number("4111111111111111");
//!     client.order().set_card_expiration_month("07")?;
//!     client.order().set_card_expiration_year("29")?;
//!
//!     let response = client.submit().await;
//!     if response.is_success() {
//!         println!("approved: {:?}", response.order());
//!     } else {
//!         eprintln!("declined: {:?}", response.error_message());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Gateway client and builder |
//! | [`config`] | Endpoint selection and credential configuration |
//! | [`request`] | Field accumulation and SOAP envelope rendering |
//! | [`response`] | Response parsing and success/failure classification |
//! | [`transport`] | HTTP/TLS transport with client-certificate auth |

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

// Re-export main types for convenience
pub use client::{GatewayClient, GatewayClientBuilder};
pub use config::{Environment, GatewayConfig};
pub use error::Error;
pub use request::{
    CardCodeIndicator, Origin, OrderRequest, Recurring, Section, TerminalType, TransactionKind,
    YesNo,
};
pub use response::{GatewayResponse, OrderResponse, SoapBody};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
