// --- File: crates/inkwell_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., sqlite://bookings.db, loaded via INK_DATABASE__URL
}

// --- Studio Config ---
// Business-hours rules for the slot validator. All times are local to `timezone`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StudioConfig {
    /// IANA timezone name the studio operates in, e.g. "America/New_York".
    pub timezone: String,
    /// Opening hour, inclusive (e.g. 12 for noon).
    pub open_hour: u32,
    /// Closing hour; appointments may end exactly at this boundary (e.g. 20).
    pub close_hour: u32,
    /// Weekday the studio is closed, 0 = Monday .. 6 = Sunday.
    pub closed_weekday: u8,
    /// Minimum appointment length in minutes. Values below
    /// [`StudioConfig::MIN_DURATION_FLOOR_MINUTES`] are clamped up.
    pub min_duration_minutes: i64,
    /// Earliest bookable date is today + this many days.
    pub booking_lead_days: i64,
    /// Latest bookable date is today + this many days.
    pub booking_horizon_days: i64,
}

impl StudioConfig {
    /// Hard floor for `min_duration_minutes`.
    pub const MIN_DURATION_FLOOR_MINUTES: i64 = 30;

    /// Effective minimum appointment duration, with the floor applied.
    pub fn effective_min_duration_minutes(&self) -> i64 {
        self.min_duration_minutes.max(Self::MIN_DURATION_FLOOR_MINUTES)
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
            open_hour: 12,
            close_hour: 20,
            closed_weekday: 6, // Sunday
            min_duration_minutes: 120,
            booking_lead_days: 1,
            booking_horizon_days: 90,
        }
    }
}

// --- Stripe Config ---
// Holds non-secret Stripe config. Secret key loaded directly from env var:
// STRIPE_SECRET_KEY. Webhook secret from STRIPE_WEBHOOK_SECRET.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    pub success_url: String, // Mandatory
    pub cancel_url: String,  // Mandatory
    /// Fixed deposit collected to lock a slot, in the smallest currency unit.
    pub deposit_amount_cents: i64,
    pub currency: String,
    pub product_name: Option<String>,
}

// --- Notification Config ---
// SMTP settings for owner notification. Password loaded directly from env
// var: SMTP_PASSWORD.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotificationConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub from_email: String,
    pub from_name: String,
    /// Studio owner address that receives confirmation mails / invites.
    pub organizer_email: String,
}

// --- Upload Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    /// Root directory reference images are stored under.
    pub dir: String,
    /// Per-file size cap in bytes.
    pub max_file_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
            max_file_bytes: 10 * 1024 * 1024,
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_stripe: bool,
    #[serde(default)]
    pub use_notifications: bool,

    // --- Core Configurations ---
    #[serde(default)]
    pub studio: StudioConfig,
    #[serde(default)]
    pub upload: UploadConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
    #[serde(default)]
    pub notification: Option<NotificationConfig>,
}
