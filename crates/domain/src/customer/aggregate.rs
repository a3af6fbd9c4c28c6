//! Customer aggregate implementation.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::entity::{Entity, EntityInfo};

/// Customer aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Identity and concurrency token.
    #[serde(flatten)]
    info: EntityInfo,

    first_name: String,
    last_name: String,
    shipping_address: Address,
}

impl Entity for Customer {
    fn collection() -> &'static str {
        "customers"
    }

    fn info(&self) -> &EntityInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut EntityInfo {
        &mut self.info
    }
}

impl Customer {
    /// Creates a new customer, not yet persisted.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        shipping_address: Address,
    ) -> Self {
        Self {
            info: EntityInfo::default(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            shipping_address,
        }
    }

    /// Returns the customer's first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the customer's last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the shipping address.
    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }
}
