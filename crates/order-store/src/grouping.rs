//! Reconstruction of order aggregates from a flat join.
//!
//! The join query returns one row per line item with the owning order's
//! columns repeated. [`OrderGrouper`] folds that stream back into one
//! [`OrderRecord`] per order.
//!
//! Rows belonging to one order must arrive contiguously, which the join
//! guarantees with `ORDER BY orders.id`. The grouper only compares each row
//! with the order it is currently assembling, so if the same order ID shows
//! up again after a different one, the second run becomes a separate record.

use crate::record::{JoinedRow, OrderRecord};

#[derive(Debug, Default)]
enum GroupState {
    #[default]
    Idle,
    Accumulating(OrderRecord),
}

/// Streaming group-by over join rows keyed by order ID.
#[derive(Debug, Default)]
pub struct OrderGrouper {
    state: GroupState,
    completed: Vec<OrderRecord>,
}

impl OrderGrouper {
    /// Creates an idle grouper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next join row.
    ///
    /// A row for the order being assembled extends its line items. A row for
    /// any other order finalizes the current one and starts a new record.
    pub fn push(&mut self, row: JoinedRow) {
        self.state = match std::mem::take(&mut self.state) {
            GroupState::Accumulating(mut order) if order.id == row.order_id => {
                order.products.push(row.product);
                GroupState::Accumulating(order)
            }
            GroupState::Accumulating(order) => {
                self.completed.push(order);
                GroupState::Accumulating(row.into_order())
            }
            GroupState::Idle => GroupState::Accumulating(row.into_order()),
        };
    }

    /// Number of orders finalized so far, excluding the one in progress.
    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    /// Flushes the order in progress, if any, and returns every record in
    /// input order.
    pub fn finish(self) -> Vec<OrderRecord> {
        let mut completed = self.completed;
        if let GroupState::Accumulating(order) = self.state {
            completed.push(order);
        }
        completed
    }
}

/// Groups a complete row sequence into order records.
pub fn group_joined_rows(rows: impl IntoIterator<Item = JoinedRow>) -> Vec<OrderRecord> {
    rows.into_iter()
        .fold(OrderGrouper::new(), |mut grouper, row| {
            grouper.push(row);
            grouper
        })
        .finish()
}
