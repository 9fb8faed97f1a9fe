//! Transaction lookup
//!
//! The intake pipeline only needs to know whether a transaction exists for
//! the current user. Persistence lives elsewhere; the in-memory store here is
//! seeded from configuration.

use std::collections::HashMap;

/// A transaction a receipt can be attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
}

/// Looks up transactions owned by the current user.
pub trait TransactionStore: Send + Sync {
    fn get_user_transaction(&self, id: &str) -> Option<Transaction>;
}

/// Transaction store backed by a fixed map
#[derive(Debug, Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: HashMap<String, Transaction>,
}

impl InMemoryTransactionStore {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transactions = ids
            .into_iter()
            .map(|id| {
                let id = id.into();
                (id.clone(), Transaction { id })
            })
            .collect();
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn get_user_transaction(&self, id: &str) -> Option<Transaction> {
        self.transactions.get(id).cloned()
    }
}
