//! # Switchboard Server
//!
//! Binds a single-method service to HTTP.
//!
//! - [`ServiceHandler`] - decode, invoke and encode for one service
//! - [`Server`] - hyper HTTP/1.1 server hosting one handler on every path
//! - [`ShutdownSignal`] - graceful shutdown trigger
//! - [`ServerConfig`] - bind address, timeouts and decoder settings
//!
//! Routing several services onto paths is left to the host application;
//! any router can call [`ServiceHandler::handle`] directly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use switchboard_server::{Server, ServerConfig, ServiceHandler};
//!
//! let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
//! let handler = ServiceHandler::new("Repeat", RepeatService).with_config(&config);
//!
//! Server::bind(config, handler).await?.run().await?;
//! ```

#![doc(html_root_url = "https://docs.rs/switchboard-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod handler;
pub mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use handler::{HttpHandler, HttpResponse, ServiceHandler, REQUEST_ID_HEADER};
pub use server::{Server, ServerError};
pub use shutdown::ShutdownSignal;
