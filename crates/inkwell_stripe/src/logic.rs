// --- File: crates/inkwell_stripe/src/logic.rs ---
use hmac::{Hmac, Mac};
use inkwell_config::StripeConfig;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, error, info, warn};

use crate::error::StripeError;

// Import the HTTP client from inkwell_common
use inkwell_common::HTTP_CLIENT;

// --- Data Structures ---

/// Request to create a deposit Checkout Session for a booking.
#[derive(Debug, Clone)]
pub struct DepositSessionRequest {
    /// Pre-generated booking id, stored in the session metadata so the
    /// webhook can find the booking again.
    pub booking_id: String,
    /// Line-item label, e.g. "Deposit for Jane Doe". A fixed product name in
    /// the Stripe config takes precedence.
    pub product_name: String,
    /// Forwarded to the hosted checkout page when present.
    pub customer_email: Option<String>,
}

/// Response after creating a Checkout Session.
#[derive(Serialize, Debug)]
pub struct CreateCheckoutSessionResponse {
    pub url: String,
    pub session_id: String,
}

/// Represents the `data` field within a Stripe Event.
#[derive(Deserialize, Debug, Clone)]
pub struct StripeEventData {
    /// The actual object related to the event, e.g., a Checkout Session.
    /// Using serde_json::Value because the structure of 'object' varies by
    /// event type.
    pub object: serde_json::Value,
}

/// Represents the outer Stripe Event object.
#[derive(Deserialize, Debug, Clone)]
pub struct StripeEvent {
    pub id: String,
    pub object: String, // "event"
    pub created: i64,   // Unix timestamp
    pub livemode: bool,
    #[serde(rename = "type")]
    pub event_type: String, // e.g., "checkout.session.completed"
    pub data: StripeEventData,
}

/// The `data.object` when event_type is "checkout.session.completed".
#[derive(Deserialize, Debug, Clone)]
pub struct StripeCheckoutSessionObject {
    pub id: String,     // Checkout Session ID (cs_...)
    pub object: String, // "checkout.session"
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    pub payment_status: Option<String>, // "paid", "unpaid", "no_payment_required"
    pub status: Option<String>,         // "open", "complete", "expired"
}

// Response FROM Stripe API when retrieving a session
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct StripeCheckoutSessionData {
    pub id: String,
    pub object: String, // "checkout.session"
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    pub payment_intent: Option<String>,
    pub payment_status: Option<String>, // "paid", "unpaid", "no_payment_required"
    pub status: Option<String>,         // "open", "complete", "expired"
    pub created: Option<i64>,
    pub expires_at: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct StripeCheckoutSessionApiResponse {
    pub id: String,
    pub url: Option<String>,
}

// --- Webhook Processing Logic ---

/// Verifies the signature of an incoming Stripe webhook request.
///
/// # Arguments
/// * `payload_bytes` - The raw request body bytes.
/// * `sig_header` - The value of the 'Stripe-Signature' header.
/// * `secret` - Your Stripe webhook signing secret (whsec_...).
///
/// Returns Ok(()) if the signature is valid, otherwise
/// StripeError::WebhookSignatureError.
pub fn verify_stripe_signature(
    payload_bytes: &[u8],
    sig_header: Option<&str>,
    secret: &str,
) -> Result<(), StripeError> {
    let sig_header_value = sig_header.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing Stripe-Signature header".to_string())
    })?;

    let mut timestamp_str: Option<&str> = None;
    let mut v1_signatures_hex: Vec<&str> = Vec::new();

    for item in sig_header_value.split(',') {
        let parts: Vec<&str> = item.trim().splitn(2, '=').collect();
        if parts.len() == 2 {
            match parts[0] {
                "t" => timestamp_str = Some(parts[1]),
                "v1" => v1_signatures_hex.push(parts[1]),
                _ => {} // Ignore other parts like v0
            }
        }
    }

    let timestamp_str = timestamp_str.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing timestamp 't' in Stripe-Signature".to_string())
    })?;
    let parsed_timestamp = timestamp_str.parse::<i64>().map_err(|_| {
        StripeError::WebhookSignatureError("Invalid timestamp format in Stripe-Signature".to_string())
    })?;

    if v1_signatures_hex.is_empty() {
        return Err(StripeError::WebhookSignatureError(
            "Missing v1 signature in Stripe-Signature".to_string(),
        ));
    }

    // Check timestamp tolerance (10 minutes) against replayed payloads
    let current_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| StripeError::InternalError("System clock before UNIX epoch".to_string()))?
        .as_secs() as i64;
    const TOLERANCE_SECONDS: i64 = 600;
    if (current_timestamp - parsed_timestamp).abs() > TOLERANCE_SECONDS {
        warn!(
            "Stripe webhook timestamp outside tolerance. Current: {}, Event: {}",
            current_timestamp, parsed_timestamp
        );
        return Err(StripeError::WebhookSignatureError(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    // Construct the signed payload string: "{timestamp}.{payload}"
    let signed_payload_string = format!(
        "{}.{}",
        timestamp_str,
        String::from_utf8_lossy(payload_bytes)
    );

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        StripeError::WebhookSignatureError("Invalid webhook secret format for HMAC".to_string())
    })?;
    mac.update(signed_payload_string.as_bytes());
    let expected_signature_bytes = mac.finalize().into_bytes();
    let calculated_signature_hex = hex::encode(expected_signature_bytes);

    // Any of the provided v1 signatures may match (key rotation)
    for provided_sig_hex in v1_signatures_hex {
        if constant_time_eq(
            calculated_signature_hex.as_bytes(),
            provided_sig_hex.as_bytes(),
        ) {
            return Ok(());
        }
    }
    error!("Stripe signature mismatch; no provided v1 signature matched.");
    Err(StripeError::WebhookSignatureError(
        "Signature mismatch".to_string(),
    ))
}

/// Helper for constant-time string comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Extracts the checkout session from a verified webhook event, if the event
/// is one we act on. Returns `None` for event types that need no handling.
pub fn checkout_session_from_event(
    event: &StripeEvent,
) -> Result<Option<StripeCheckoutSessionObject>, StripeError> {
    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: StripeCheckoutSessionObject =
                serde_json::from_value(event.data.object.clone()).map_err(|e| {
                    StripeError::WebhookProcessingError(format!(
                        "Failed to parse checkout session object: {}",
                        e
                    ))
                })?;
            Ok(Some(session))
        }
        other => {
            debug!("Ignoring Stripe event type: {}", other);
            Ok(None)
        }
    }
}

// --- Core Logic Functions ---

/// Creates a Stripe Checkout Session for the fixed deposit.
pub async fn create_checkout_session(
    stripe_config: &StripeConfig,
    request: DepositSessionRequest,
) -> Result<CreateCheckoutSessionResponse, StripeError> {
    info!(
        "[Stripe Logic] Creating deposit Checkout Session for booking {}",
        request.booking_id
    );

    let stripe_secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| StripeError::ConfigError)?;

    let product_name = stripe_config
        .product_name
        .clone()
        .unwrap_or_else(|| request.product_name.clone());
    let currency = stripe_config.currency.to_lowercase();

    let mut form_body: Vec<(String, String)> = vec![
        ("payment_method_types[]".to_string(), "card".to_string()),
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), stripe_config.success_url.clone()),
        ("cancel_url".to_string(), stripe_config.cancel_url.clone()),
        ("line_items[0][price_data][currency]".to_string(), currency),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            product_name,
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            stripe_config.deposit_amount_cents.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "metadata[booking_id]".to_string(),
            request.booking_id.clone(),
        ),
    ];
    if let Some(email) = &request.customer_email {
        form_body.push(("customer_email".to_string(), email.clone()));
    }

    let api_url = "https://api.stripe.com/v1/checkout/sessions";

    let response = HTTP_CLIENT
        .post(api_url)
        .basic_auth(stripe_secret_key, None::<&str>)
        .form(&form_body)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        let stripe_response: StripeCheckoutSessionApiResponse = serde_json::from_str(&body_text)?;
        if let Some(url) = stripe_response.url {
            info!(
                "[Stripe Logic] Checkout Session {} created for booking {}",
                stripe_response.id, request.booking_id
            );
            Ok(CreateCheckoutSessionResponse {
                url,
                session_id: stripe_response.id,
            })
        } else {
            error!(
                "[Stripe Logic] Stripe response missing checkout session URL: {}",
                body_text
            );
            Err(StripeError::InternalError(
                "Stripe response missing checkout URL".to_string(),
            ))
        }
    } else {
        let error_message = extract_api_error(&body_text);
        error!(
            "[Stripe Logic] Stripe API request failed with HTTP status: {}. Message: {}",
            status, error_message
        );
        Err(StripeError::ApiError {
            status_code: status.as_u16(),
            message: error_message,
        })
    }
}

/// Retrieves details of a Stripe Checkout Session, including its
/// `payment_status`.
pub async fn get_checkout_session_details(
    session_id: &str,
) -> Result<StripeCheckoutSessionData, StripeError> {
    debug!(
        "[Stripe Logic] Retrieving Checkout Session details for ID: {}",
        session_id
    );

    let stripe_secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| StripeError::ConfigError)?;

    let api_url = format!("https://api.stripe.com/v1/checkout/sessions/{}", session_id);

    let response = HTTP_CLIENT
        .get(&api_url)
        .basic_auth(stripe_secret_key, None::<&str>)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        let session_data: StripeCheckoutSessionData = serde_json::from_str(&body_text)?;
        Ok(session_data)
    } else {
        let error_message = extract_api_error(&body_text);
        error!(
            "[Stripe Logic] Failed to retrieve session {}: {} - {}",
            session_id, status, error_message
        );
        Err(StripeError::ApiError {
            status_code: status.as_u16(),
            message: error_message,
        })
    }
}

fn extract_api_error(body_text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body_text) {
        Ok(json_body) => json_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body_text)
            .to_string(),
        Err(_) => body_text.to_string(),
    }
}
