//! Checkout webhook receivers.
//!
//! Each receiver decodes the platform payload, checks the identifying fields
//! and echoes the typed payload back. Nothing is stored.

use axum::{
    body::Bytes,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::checkout::{HotmartWebhook, KirvanoWebhook, KiwifyAbandonedCart, KiwifyEvent, KiwifyOrder};
use crate::models::{KiwifyQuery, WebhookResponse};

const PROCESSED: &str = "webhook processed";

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid JSON payload")]
    InvalidJson(#[source] serde_json::Error),

    #[error("invalid JSON for {platform} webhook")]
    InvalidPayload {
        platform: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("signature query parameter is required")]
    MissingSignature,

    #[error("Kiwify payload is neither an order nor an abandoned cart")]
    UnrecognizedKiwifyPayload,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        warn!(error = %self, "webhook rejected");
        (StatusCode::BAD_REQUEST, Json(WebhookResponse::error(self.to_string()))).into_response()
    }
}

fn decode<T: serde::de::DeserializeOwned>(platform: &'static str, body: &[u8]) -> Result<T, WebhookError> {
    serde_json::from_slice(body).map_err(|source| WebhookError::InvalidPayload { platform, source })
}

// ------------------------------------------------------------------ //
//  POST /webhook/echo                                                 //
// ------------------------------------------------------------------ //

pub async fn echo(body: Bytes) -> Result<Json<Value>, WebhookError> {
    let payload: Value = serde_json::from_slice(&body).map_err(WebhookError::InvalidJson)?;
    debug!(bytes = body.len(), "echo payload received");
    Ok(Json(payload))
}

// ------------------------------------------------------------------ //
//  POST /webhook/hotmart                                              //
// ------------------------------------------------------------------ //

pub async fn hotmart(body: Bytes) -> Result<Json<WebhookResponse<HotmartWebhook>>, WebhookError> {
    let webhook: HotmartWebhook = decode("Hotmart", &body)?;

    if webhook.product.ucode.is_empty() {
        return Err(WebhookError::MissingField("product.ucode"));
    }
    if let Some(purchase) = &webhook.purchase {
        if purchase.transaction.is_empty() {
            return Err(WebhookError::MissingField("purchase.transaction"));
        }
    }

    info!(
        event = %webhook.event,
        product = %webhook.product.name,
        transaction = webhook.purchase.as_ref().map(|p| p.transaction.as_str()),
        status = webhook.purchase.as_ref().map(|p| p.status.as_str()),
        "hotmart event received"
    );
    if let Some(affiliate) = webhook.affiliates.first() {
        info!(affiliate_code = %affiliate.affiliate_code, "hotmart sale has affiliate");
    }

    Ok(Json(WebhookResponse::success(PROCESSED, webhook)))
}

// ------------------------------------------------------------------ //
//  POST /webhook/kiwify?signature=…                                   //
// ------------------------------------------------------------------ //

pub async fn kiwify(
    Query(query): Query<KiwifyQuery>,
    body: Bytes,
) -> Result<Json<WebhookResponse<KiwifyEvent>>, WebhookError> {
    if query.signature.as_deref().map_or(true, str::is_empty) {
        return Err(WebhookError::MissingSignature);
    }

    let order = serde_json::from_slice::<KiwifyOrder>(&body);
    let cart = serde_json::from_slice::<KiwifyAbandonedCart>(&body);

    let event = match (order, cart) {
        (Err(source), Err(_)) => {
            return Err(WebhookError::InvalidPayload {
                platform: "Kiwify",
                source,
            })
        }
        (Ok(order), _) if !order.order_id.is_empty() => {
            if order.order_status.is_empty() {
                return Err(WebhookError::MissingField("order_status"));
            }
            info!(
                order_id = %order.order_id,
                status = %order.order_status,
                event = %order.webhook_event_type,
                product_id = %order.product.id,
                utm_source = %order.tracking_data.utm_source,
                "kiwify order received"
            );
            KiwifyEvent::Order(order)
        }
        (_, Ok(cart)) if !cart.checkout_link.is_empty() => {
            info!(product_id = %cart.product_id, store_id = %cart.store_id, "kiwify abandoned cart received");
            KiwifyEvent::AbandonedCart(cart)
        }
        _ => return Err(WebhookError::UnrecognizedKiwifyPayload),
    };

    Ok(Json(WebhookResponse::success(PROCESSED, event)))
}

// ------------------------------------------------------------------ //
//  POST /webhook/kirvano                                              //
// ------------------------------------------------------------------ //

pub async fn kirvano(body: Bytes) -> Result<Json<WebhookResponse<KirvanoWebhook>>, WebhookError> {
    let webhook: KirvanoWebhook = decode("Kirvano", &body)?;

    if webhook.sale_id.is_empty() {
        return Err(WebhookError::MissingField("sale_id"));
    }
    if webhook.status.is_empty() {
        return Err(WebhookError::MissingField("status"));
    }

    info!(
        sale_id = %webhook.sale_id,
        status = %webhook.status,
        event = %webhook.event,
        products = webhook.products.len(),
        "kirvano event received"
    );

    Ok(Json(WebhookResponse::success(PROCESSED, webhook)))
}
