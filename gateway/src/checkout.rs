//! Typed payloads posted by the checkout platforms.
//!
//! Containers default every field so partial events (abandoned carts, trial
//! subscriptions) still decode; presence checks live in the webhook handlers.

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------ //
//  Hotmart                                                            //
// ------------------------------------------------------------------ //

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartWebhook {
    pub id: String,
    pub event: String,
    pub version: String,
    pub creation_date: i64,
    pub hottok: String,
    pub product: HotmartProduct,
    pub buyer: HotmartBuyer,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commissions: Vec<HotmartCommission>,
    /// Absent on abandoned-cart events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase: Option<HotmartPurchase>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affiliates: Vec<HotmartAffiliate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<HotmartProducer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<HotmartSubscription>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub buyer_ip: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub affiliate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<HotmartOffer>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartProduct {
    pub id: i64,
    pub name: String,
    pub has_co_production: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ucode: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartBuyer {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checkout_phone: String,
    /// Used instead of `checkout_phone` on abandoned-cart events.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<HotmartAddress>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartAddress {
    pub country: String,
    pub country_iso: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartCommission {
    pub source: String,
    pub value: f64,
    pub currency_value: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartPurchase {
    pub transaction: String,
    /// APPROVED, DISPUTE, EXPIRED, ...
    pub status: String,
    pub order_date: i64,
    pub approved_date: i64,
    pub offer: HotmartOffer,
    pub price: HotmartPrice,
    pub full_price: HotmartPrice,
    pub original_offer_price: HotmartPrice,
    pub checkout_country: HotmartCountry,
    #[serde(rename = "sckPaymentLink")]
    pub sck_payment_link: String,
    pub order_bump: HotmartOrderBump,
    pub payment: HotmartPayment,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartOffer {
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartPrice {
    pub value: f64,
    pub currency_value: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartCountry {
    pub iso: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartOrderBump {
    pub is_order_bump: bool,
    pub parent_purchase_transaction: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartPayment {
    #[serde(rename = "type")]
    pub kind: String,
    pub installments_number: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartAffiliate {
    pub affiliate_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartProducer {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartSubscription {
    pub status: String,
    pub subscriber: HotmartSubscriber,
    pub plan: HotmartPlan,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartSubscriber {
    pub code: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotmartPlan {
    pub id: i64,
    pub name: String,
}

// ------------------------------------------------------------------ //
//  Kiwify                                                             //
// ------------------------------------------------------------------ //

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyOrder {
    pub order_id: String,
    pub order_ref: String,
    pub order_status: String,
    pub webhook_event_type: String,
    pub webhook_event_id: String,
    pub created_at: String,
    pub commissions: KiwifyCommissions,
    pub customer: KiwifyCustomer,
    pub product: KiwifyProduct,
    pub payment: KiwifyPayment,
    pub producer: KiwifyContact,
    pub store: KiwifyStore,
    pub tracking_data: KiwifyTracking,
    pub subscription: KiwifySubscription,
    pub subscription_id: String,
    pub access_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyCommissions {
    pub currency: String,
    pub commissioned_stores: Vec<KiwifyCommissionedStore>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyCommissionedStore {
    pub custom_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyCustomer {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyProduct {
    pub id: String,
    pub name: String,
    pub regular: bool,
    pub quantity: i64,
    pub price: String,
    pub order_bump_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyPayment {
    pub method: String,
    pub installments: i64,
    pub processor_id: String,
    pub status: String,
    pub safe_status: String,
    pub currency: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyStore {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyTracking {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    pub content: String,
    pub term: String,
    pub identifier: String,
    pub segment_name: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub utm_content: String,
    pub utm_term: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifySubscription {
    pub id: String,
    pub status: String,
    pub plan: KiwifyPlan,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyPlan {
    pub name: String,
    pub frequency: String,
    pub recurrences: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KiwifyAbandonedCart {
    pub checkout_link: String,
    pub country: String,
    pub cnpj: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub product_id: String,
    pub product_name: String,
    pub store_id: String,
    /// Shape varies with the plan type; kept as raw JSON.
    pub subscription_plan: serde_json::Value,
}

/// A Kiwify notification is either an order event or an abandoned cart.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum KiwifyEvent {
    Order(KiwifyOrder),
    AbandonedCart(KiwifyAbandonedCart),
}

// ------------------------------------------------------------------ //
//  Kirvano                                                            //
// ------------------------------------------------------------------ //

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KirvanoWebhook {
    pub event: String,
    pub event_description: String,
    pub checkout_id: String,
    pub sale_id: String,
    pub payment_method: String,
    pub total_price: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub created_at: String,
    pub customer: KirvanoCustomer,
    pub payment: KirvanoPayment,
    pub products: Vec<KirvanoProduct>,
    pub utm: KirvanoUtm,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KirvanoCustomer {
    pub name: String,
    pub document: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KirvanoPayment {
    pub method: String,
    pub brand: String,
    pub installments: i64,
    pub finished_at: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KirvanoProduct {
    pub id: String,
    pub name: String,
    pub offer_id: String,
    pub offer_name: String,
    pub description: String,
    pub price: String,
    pub photo: String,
    pub is_order_bump: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KirvanoUtm {
    pub src: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub utm_term: String,
    pub utm_content: String,
}
