//! Plan checkout via the external payment gateway.
//!
//! Two calls: create an order server-side, then verify the gateway's
//! signature triple after the user completes payment. The gateway widget
//! itself is outside this crate; we only speak to our own backend.

use tracing::info;

use crate::clients::{ApiClient, OrderDetails, PaymentVerification};
use crate::error::{AppResult, WorkflowError};

/// One checkout attempt. Serializes its two network calls: a second call
/// while one is pending is refused rather than double-submitted.
pub struct CheckoutFlow<'a> {
    api: &'a ApiClient,
    in_flight: bool,
    order: Option<OrderDetails>,
}

impl<'a> CheckoutFlow<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            in_flight: false,
            order: None,
        }
    }

    /// Order created and awaiting verification, if any.
    pub fn pending_order(&self) -> Option<&OrderDetails> {
        self.order.as_ref()
    }

    /// Create a payment order for `plan`. The returned details (key, amount,
    /// currency, order id) are what the gateway widget needs to open.
    pub async fn create_order(&mut self, plan: &str, amount: u64) -> AppResult<OrderDetails> {
        if self.in_flight {
            return Err(WorkflowError::Busy.into());
        }
        self.in_flight = true;
        let result = self.api.create_payment_order(plan, amount).await;
        self.in_flight = false;

        let order = result?;
        info!("✓ payment order {} created for plan {}", order.order_id, plan);
        self.order = Some(order.clone());
        Ok(order)
    }

    /// Verify a completed payment. On success the pending order is cleared;
    /// on failure it is kept so the user can retry verification.
    pub async fn verify(
        &mut self,
        payment_id: &str,
        signature: &str,
        plan: &str,
    ) -> AppResult<()> {
        if self.in_flight {
            return Err(WorkflowError::Busy.into());
        }
        let order_id = match &self.order {
            Some(order) => order.order_id.clone(),
            None => return Err(WorkflowError::NoPendingOrder.into()),
        };

        let verification = PaymentVerification {
            order_id,
            payment_id: payment_id.to_string(),
            signature: signature.to_string(),
            plan: plan.to_string(),
        };

        self.in_flight = true;
        let result = self.api.verify_payment(&verification).await;
        self.in_flight = false;

        result?;
        info!("✓ payment verified for order {}", verification.order_id);
        self.order = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::AppError;
    use crate::session::Session;
    use std::sync::Arc;

    fn offline_client() -> ApiClient {
        let session = Arc::new(Session::new("tok"));
        ApiClient::new(&Config::default(), session).unwrap()
    }

    #[tokio::test]
    async fn verify_without_an_order_is_refused_locally() {
        let api = offline_client();
        let mut checkout = CheckoutFlow::new(&api);

        let err = checkout.verify("pay_1", "sig", "pro").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Workflow(WorkflowError::NoPendingOrder)
        ));
        assert!(checkout.pending_order().is_none());
    }
}
