//! Account and session management
//!
//! Accounts live in the local store under the registered-users key; the
//! signed-in account and its synthetic session token are mirrored under their
//! own keys so a later launch can restore the session. Passwords are stored
//! as bcrypt hashes only.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::local::{keys, LocalStore};
use shared::models::{
    BusinessInfo, BusinessUpdate, Preferences, PreferencesUpdate, ProfileUpdate, RegisterInput,
    UserAccount, UserProfile, UserRole,
};
use shared::validation;

pub struct AuthService {
    store: Arc<LocalStore>,
    bcrypt_cost: u32,
    session: Mutex<Option<UserAccount>>,
    last_error: Mutex<Option<String>>,
}

impl AuthService {
    pub fn new(store: Arc<LocalStore>, bcrypt_cost: u32) -> Self {
        Self {
            store,
            bcrypt_cost,
            session: Mutex::new(None),
            last_error: Mutex::new(None),
        }
    }

    /// Restore a previous session from the stored account and token, if both
    /// survive on disk
    ///
    /// An unreadable or corrupt store degrades to signed-out with a retained
    /// error message rather than failing. A restored session counts as a
    /// login, so the last-login timestamp is refreshed and mirrored back.
    pub async fn restore_session(&self) -> AppResult<Option<UserAccount>> {
        let stored = async {
            let token: Option<String> = self.store.get(keys::AUTH_TOKEN).await?;
            if token.is_none() {
                return Ok(None);
            }
            self.store.get::<UserAccount>(keys::USER).await
        }
        .await;

        let mut account = match stored {
            Ok(Some(account)) => account,
            Ok(None) => return Ok(None),
            Err(err) => {
                tracing::warn!(error = %err, "failed to restore session");
                *self.last_error.lock().await =
                    Some("Failed to restore your session.".to_string());
                return Ok(None);
            }
        };

        account.profile.last_login = Some(Utc::now());
        *self.session.lock().await = Some(account.clone());
        self.put_best_effort(keys::USER, &account).await;
        tracing::info!(email = %account.profile.email, "session restored");
        Ok(Some(account))
    }

    /// Register a new account
    ///
    /// The first account ever registered becomes the administrator; later
    /// ones default to the regular user role. The new account is signed in
    /// immediately.
    pub async fn register(&self, input: RegisterInput) -> AppResult<UserAccount> {
        Self::require("name", !input.name.trim().is_empty(), "Name is required")?;
        Self::check("email", validation::validate_email(&input.email))?;
        Self::check("password", validation::validate_password(&input.password))?;
        Self::require(
            "confirmPassword",
            input.password == input.confirm_password,
            "Passwords do not match",
        )?;
        Self::require(
            "businessName",
            !input.business_name.trim().is_empty(),
            "Business name is required",
        )?;
        Self::check("businessPhone", validation::validate_phone(&input.business_phone))?;

        let mut registered: Vec<UserAccount> = self
            .store
            .get(keys::REGISTERED_USERS)
            .await?
            .unwrap_or_default();
        if registered
            .iter()
            .any(|a| a.profile.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = bcrypt::hash(&input.password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
        let role = if registered.is_empty() {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let account = UserAccount {
            profile: UserProfile {
                id: Uuid::new_v4(),
                name: input.name,
                email: input.email,
                password_hash,
                avatar: None,
                role,
                created_at: Utc::now(),
                last_login: Some(Utc::now()),
            },
            business: BusinessInfo {
                business_name: input.business_name,
                business_type: input.business_type,
                business_address: input.business_address,
                business_phone: input.business_phone,
                business_email: input.business_email,
                tax_id: input.tax_id,
                website: input.website,
                currency: input.currency,
                timezone: input.timezone,
            },
            preferences: Preferences::default(),
        };

        registered.push(account.clone());
        self.store.put(keys::REGISTERED_USERS, &registered).await?;

        self.open_session(&account, false).await;
        tracing::info!(email = %account.profile.email, role = ?account.profile.role, "account registered");
        Ok(account)
    }

    /// Sign in with email and password
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> AppResult<UserAccount> {
        let mut registered: Vec<UserAccount> = self
            .store
            .get(keys::REGISTERED_USERS)
            .await?
            .unwrap_or_default();

        let account = registered
            .iter_mut()
            .find(|a| a.profile.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| {
                AppError::NotFound("No account found with this email address".to_string())
            })?;

        let valid = bcrypt::verify(password, &account.profile.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        account.profile.last_login = Some(Utc::now());
        let account = account.clone();
        self.store.put(keys::REGISTERED_USERS, &registered).await?;

        self.open_session(&account, remember).await;
        tracing::info!(email = %account.profile.email, "signed in");
        Ok(account)
    }

    /// End the session, dropping the stored account and token but leaving the
    /// registered accounts and the remembered email intact
    pub async fn logout(&self) -> AppResult<()> {
        *self.session.lock().await = None;
        self.store.remove(keys::USER).await?;
        self.store.remove(keys::AUTH_TOKEN).await?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Email saved by a previous "remember me" login, for form prefill
    pub async fn remembered_email(&self) -> AppResult<Option<String>> {
        self.store.get(keys::REMEMBER_USER).await
    }

    /// Apply a partial update to the signed-in profile
    pub async fn update_profile(&self, update: ProfileUpdate) -> AppResult<UserAccount> {
        if let Some(email) = &update.email {
            Self::check("email", validation::validate_email(email))?;
        }
        self.update_account(|account| {
            if let Some(name) = update.name {
                account.profile.name = name;
            }
            if let Some(email) = update.email {
                account.profile.email = email;
            }
            if let Some(avatar) = update.avatar {
                account.profile.avatar = Some(avatar);
            }
        })
        .await
    }

    /// Apply a partial update to the business settings
    pub async fn update_business(&self, update: BusinessUpdate) -> AppResult<UserAccount> {
        if let Some(phone) = &update.business_phone {
            Self::check("businessPhone", validation::validate_phone(phone))?;
        }
        self.update_account(|account| {
            let business = &mut account.business;
            if let Some(v) = update.business_name {
                business.business_name = v;
            }
            if let Some(v) = update.business_type {
                business.business_type = v;
            }
            if let Some(v) = update.business_address {
                business.business_address = v;
            }
            if let Some(v) = update.business_phone {
                business.business_phone = v;
            }
            if let Some(v) = update.business_email {
                business.business_email = Some(v);
            }
            if let Some(v) = update.tax_id {
                business.tax_id = Some(v);
            }
            if let Some(v) = update.website {
                business.website = Some(v);
            }
            if let Some(v) = update.currency {
                business.currency = v;
            }
            if let Some(v) = update.timezone {
                business.timezone = v;
            }
        })
        .await
    }

    /// Apply a partial update to the interface preferences
    pub async fn update_preferences(&self, update: PreferencesUpdate) -> AppResult<UserAccount> {
        self.update_account(|account| {
            let prefs = &mut account.preferences;
            if let Some(v) = update.language {
                prefs.language = v;
            }
            if let Some(v) = update.theme {
                prefs.theme = v;
            }
            if let Some(v) = update.notifications {
                prefs.notifications = v;
            }
            if let Some(v) = update.date_format {
                prefs.date_format = v;
            }
            if let Some(v) = update.number_format {
                prefs.number_format = v;
            }
        })
        .await
    }

    /// Signed-in account, if any
    pub async fn current_user(&self) -> Option<UserAccount> {
        self.session.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Last non-fatal persistence failure, retained for the presentation layer
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    pub async fn clear_error(&self) {
        *self.last_error.lock().await = None;
    }

    /// Mutate the signed-in account, then write it back to every place it is
    /// mirrored
    async fn update_account(
        &self,
        apply: impl FnOnce(&mut UserAccount),
    ) -> AppResult<UserAccount> {
        let mut session = self.session.lock().await;
        let account = session
            .as_mut()
            .ok_or_else(|| AppError::NotFound("No active session".to_string()))?;
        apply(account);
        let account = account.clone();
        drop(session);

        let mut registered: Vec<UserAccount> = self
            .store
            .get(keys::REGISTERED_USERS)
            .await?
            .unwrap_or_default();
        if let Some(slot) = registered
            .iter_mut()
            .find(|a| a.profile.id == account.profile.id)
        {
            *slot = account.clone();
        }
        self.store.put(keys::REGISTERED_USERS, &registered).await?;
        self.put_best_effort(keys::USER, &account).await;
        Ok(account)
    }

    /// Open a session and mirror it to disk; the account itself is already
    /// saved, so a failed mirror write only degrades restore-on-relaunch
    async fn open_session(&self, account: &UserAccount, remember: bool) {
        *self.session.lock().await = Some(account.clone());
        self.put_best_effort(keys::USER, account).await;
        self.put_best_effort(keys::AUTH_TOKEN, &Uuid::new_v4().to_string())
            .await;
        if remember {
            self.put_best_effort(keys::REMEMBER_USER, &account.profile.email)
                .await;
        }
    }

    async fn put_best_effort<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.store.put(key, value).await {
            tracing::warn!(key, error = %err, "failed to persist session state");
            *self.last_error.lock().await = Some(err.user_message());
        }
    }

    fn require(field: &str, ok: bool, message: &str) -> AppResult<()> {
        if ok {
            Ok(())
        } else {
            Err(AppError::Validation {
                field: field.to_string(),
                message: message.to_string(),
            })
        }
    }

    fn check(field: &str, result: Result<(), &'static str>) -> AppResult<()> {
        result.map_err(|message| AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        })
    }
}
