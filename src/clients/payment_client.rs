//! # Payment Gateway Client
//!
//! The gateway answers `create.payment.session` requests with an opaque session descriptor.
use crate::model::{PaymentSession, PaymentSessionRequest};
use actor_runtime::{FrameworkError, ServiceClient};
use async_trait::async_trait;

/// Channel client for a gateway endpoint or a broker bridge in front of one.
pub type GatewayServiceClient = ServiceClient<PaymentSessionRequest, PaymentSession>;

/// Request-reply access to the payment gateway.
#[async_trait]
pub trait PaymentGatewayClient: Send + Sync {
    async fn send(&self, request: PaymentSessionRequest) -> Result<PaymentSession, FrameworkError>;
}

#[async_trait]
impl PaymentGatewayClient for GatewayServiceClient {
    async fn send(&self, request: PaymentSessionRequest) -> Result<PaymentSession, FrameworkError> {
        ServiceClient::send(self, request).await
    }
}
