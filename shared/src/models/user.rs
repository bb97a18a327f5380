//! User, business and preference models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles a user can hold within a business
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    User,
}

/// A user's personal profile
///
/// `password_hash` is a bcrypt hash; plaintext passwords are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Business types supported by the application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    Restaurant,
    Grocery,
    Wholesale,
    Retail,
    Other,
}

/// The business a user account belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    pub business_name: String,
    pub business_type: BusinessType,
    pub business_address: String,
    pub business_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub currency: String,
    pub timezone: String,
}

/// UI theme preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

/// Notification toggles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub low_stock: bool,
    pub reports: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            low_stock: true,
            reports: false,
        }
    }
}

/// Per-user display preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub language: String,
    pub theme: Theme,
    pub notifications: NotificationSettings,
    pub date_format: String,
    pub number_format: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            theme: Theme::Light,
            notifications: NotificationSettings::default(),
            date_format: "MM/DD/YYYY".to_string(),
            number_format: "en-US".to_string(),
        }
    }
}

/// A complete registered account: profile, business and preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub profile: UserProfile,
    pub business: BusinessInfo,
    pub preferences: Preferences,
}

/// Input for registering a new account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub business_name: String,
    pub business_type: BusinessType,
    pub business_address: String,
    pub business_phone: String,
    pub business_email: Option<String>,
    pub currency: String,
    pub timezone: String,
    pub tax_id: Option<String>,
    pub website: Option<String>,
}

/// Partial profile update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Partial business update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUpdate {
    pub business_name: Option<String>,
    pub business_type: Option<BusinessType>,
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
}

/// Partial preference update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub language: Option<String>,
    pub theme: Option<Theme>,
    pub notifications: Option<NotificationSettings>,
    pub date_format: Option<String>,
    pub number_format: Option<String>,
}
