//! Transactions receipts are attached to

pub mod store;

pub use store::{InMemoryTransactionStore, Transaction, TransactionStore};
