//! Composition layer that federates accounts with their orders.
//!
//! This crate provides:
//! - The account service port and an in-memory implementation
//! - `OrderSource`, the seam through which orders are read
//! - `AccountResolver`, which resolves every edge of the account graph
//!   concurrently under its own timeout

pub mod account;
pub mod error;
pub mod resolver;
pub mod source;
pub mod view;

pub use account::{Account, AccountService, InMemoryAccountService};
pub use error::{AccountError, FieldError, FieldErrorKind};
pub use resolver::{AccountGraph, AccountResolver, DEFAULT_EDGE_TIMEOUT};
pub use source::OrderSource;
pub use view::{AccountView, OrderView, OrderedProductView};
