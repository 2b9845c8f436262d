//! Order submission with dry-run support.

use log::info;
use orderbridge::OrderRecord;
use orderbridge_broker::{Broker, BrokerError, OrderRequest, PlacedOrder};

/// What happened to an order handed to the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Dry run: the request that would have been sent.
    Simulated(OrderRequest),
    /// Live: the service accepted the order.
    Placed(PlacedOrder),
}

/// Build the placement request for a validated record.
pub fn build_request(order: &OrderRecord, account_id: &str, universal_symbol_id: &str) -> OrderRequest {
    OrderRequest {
        account_id: account_id.to_string(),
        action: order.action(),
        order_type: order.order_type(),
        time_in_force: order.time_in_force(),
        universal_symbol_id: universal_symbol_id.to_string(),
        units: order.quantity(),
    }
}

/// Places orders, or only simulates them when `dry_run` is set.
pub struct OrderSubmitter {
    dry_run: bool,
}

impl OrderSubmitter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Submit one order. Makes exactly one place-order call when live and none
    /// in dry-run mode.
    pub fn submit<B: Broker>(
        &self,
        broker: &B,
        order: &OrderRecord,
        account_id: &str,
        universal_symbol_id: &str,
    ) -> Result<Submission, BrokerError> {
        let request = build_request(order, account_id, universal_symbol_id);

        if self.dry_run {
            info!("[DRY RUN] would place {request}");
            return Ok(Submission::Simulated(request));
        }

        broker.place_order(&request).map(Submission::Placed)
    }
}
