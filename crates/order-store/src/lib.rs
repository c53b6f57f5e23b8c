//! Relational persistence for order aggregates.
//!
//! An order is stored as one `orders` row plus one `order_products` row per
//! line item. Writes are transactional; reads run a single join and rebuild
//! the nested records with [`OrderGrouper`].

pub mod error;
pub mod grouping;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod repository;

pub use common::{AccountId, OrderId, ProductId};
pub use error::{OrderStoreError, Result};
pub use grouping::{OrderGrouper, group_joined_rows};
pub use memory::InMemoryOrderRepository;
pub use postgres::PostgresOrderRepository;
pub use record::{JoinedRow, LineItemRecord, OrderRecord};
pub use repository::{MAX_QUANTITY, OrderRepository, validate_record};
