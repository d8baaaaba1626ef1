//! # Input Validation
//!
//! Pure precondition checks run before any store access. A failure here
//! always produces `RegistryError::InvalidInput` naming the offending field.

use chrono::{DateTime, Utc};
use shared_types::{ClientId, UserId};

use super::entities::Client;
use super::errors::{RegistryError, RegistryResult};
use super::normalize::{
    is_valid_email, non_blank, normalize_email, normalize_legal_id, normalize_name, phone_digits,
};
use super::value_objects::RegistryConfig;

/// Attributes of a new client, as entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInput {
    pub display_name: String,
    pub legal_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
}

impl ClientInput {
    pub fn new(display_name: impl Into<String>, legal_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            legal_id: legal_id.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_contact_name(mut self, contact_name: impl Into<String>) -> Self {
        self.contact_name = Some(contact_name.into());
        self
    }
}

/// Change to a single optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch<T> {
    /// Leave the stored value alone.
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Remove the stored value.
    Clear,
}

impl<T> Default for FieldPatch<T> {
    fn default() -> Self {
        FieldPatch::Keep
    }
}

impl<T> FieldPatch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldPatch::Keep)
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldPatch<U> {
        match self {
            FieldPatch::Keep => FieldPatch::Keep,
            FieldPatch::Set(value) => FieldPatch::Set(f(value)),
            FieldPatch::Clear => FieldPatch::Clear,
        }
    }
}

impl<T: Clone> FieldPatch<T> {
    fn apply_to(&self, current: &mut Option<T>) {
        match self {
            FieldPatch::Keep => {}
            FieldPatch::Set(value) => *current = Some(value.clone()),
            FieldPatch::Clear => *current = None,
        }
    }
}

/// Partial edit of an existing client. Only provided fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub display_name: Option<String>,
    pub legal_id: Option<String>,
    pub email: FieldPatch<String>,
    pub phone: FieldPatch<String>,
    pub address: FieldPatch<String>,
    pub contact_name: FieldPatch<String>,
}

impl ClientPatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.legal_id.is_none()
            && self.email.is_keep()
            && self.phone.is_keep()
            && self.address.is_keep()
            && self.contact_name.is_keep()
    }
}

/// `ClientInput` after validation, with derived fields computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedClient {
    pub display_name: String,
    pub normalized_name: String,
    pub legal_id: String,
    pub legal_id_normalized: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
}

impl ValidatedClient {
    /// Materialize the client record for a freshly allocated ID.
    pub fn into_client(self, client_id: ClientId, acting_user: &UserId, now: DateTime<Utc>) -> Client {
        Client {
            client_id,
            legal_id: self.legal_id,
            legal_id_normalized: self.legal_id_normalized,
            display_name: self.display_name,
            normalized_name: self.normalized_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            contact_name: self.contact_name,
            active: true,
            revision: 1,
            created_by: acting_user.clone(),
            created_at: now,
            updated_by: acting_user.clone(),
            updated_at: now,
        }
    }
}

/// `ClientPatch` after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPatch {
    display_name: Option<(String, String)>,
    legal_id: Option<(String, String)>,
    email: FieldPatch<String>,
    phone: FieldPatch<String>,
    address: FieldPatch<String>,
    contact_name: FieldPatch<String>,
}

impl ValidatedPatch {
    /// New normalized legal ID, if the patch changes the legal ID.
    pub fn legal_id_normalized(&self) -> Option<&str> {
        self.legal_id.as_ref().map(|(_, normalized)| normalized.as_str())
    }

    /// Merge the patch over `current`, leaving audit stamps untouched.
    pub fn merge(&self, current: &Client) -> Client {
        let mut merged = current.clone();
        if let Some((display, normalized)) = &self.display_name {
            merged.display_name = display.clone();
            merged.normalized_name = normalized.clone();
        }
        if let Some((raw, normalized)) = &self.legal_id {
            merged.legal_id = raw.clone();
            merged.legal_id_normalized = normalized.clone();
        }
        self.email.apply_to(&mut merged.email);
        self.phone.apply_to(&mut merged.phone);
        self.address.apply_to(&mut merged.address);
        self.contact_name.apply_to(&mut merged.contact_name);
        merged
    }
}

fn validate_display_name(value: &str) -> RegistryResult<(String, String)> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::invalid("display_name", "must not be blank"));
    }
    Ok((trimmed.to_string(), normalize_name(trimmed)))
}

fn validate_legal_id(value: &str) -> RegistryResult<(String, String)> {
    let normalized = normalize_legal_id(value);
    if normalized.is_empty() {
        return Err(RegistryError::invalid(
            "legal_id",
            "must contain at least one letter or digit",
        ));
    }
    Ok((value.trim().to_string(), normalized))
}

fn validate_email(value: &str) -> RegistryResult<String> {
    let email = normalize_email(value);
    if !is_valid_email(&email) {
        return Err(RegistryError::invalid(
            "email",
            format!("{email:?} is not a valid address"),
        ));
    }
    Ok(email)
}

fn validate_phone(value: &str, config: &RegistryConfig) -> RegistryResult<String> {
    let digits = phone_digits(value);
    if digits.len() != config.phone_digits {
        return Err(RegistryError::invalid(
            "phone",
            format!(
                "must have exactly {} digits, got {}",
                config.phone_digits,
                digits.len()
            ),
        ));
    }
    Ok(digits)
}

/// Validate a new-client form.
pub fn validate_input(input: &ClientInput, config: &RegistryConfig) -> RegistryResult<ValidatedClient> {
    let (display_name, normalized_name) = validate_display_name(&input.display_name)?;
    let (legal_id, legal_id_normalized) = validate_legal_id(&input.legal_id)?;

    let email = non_blank(input.email.as_deref())
        .map(|v| validate_email(&v))
        .transpose()?;
    let phone = non_blank(input.phone.as_deref())
        .map(|v| validate_phone(&v, config))
        .transpose()?;

    Ok(ValidatedClient {
        display_name,
        normalized_name,
        legal_id,
        legal_id_normalized,
        email,
        phone,
        address: non_blank(input.address.as_deref()),
        contact_name: non_blank(input.contact_name.as_deref()),
    })
}

/// Validate an edit. Setting an optional field to a blank value clears it.
pub fn validate_patch(patch: &ClientPatch, config: &RegistryConfig) -> RegistryResult<ValidatedPatch> {
    let display_name = patch
        .display_name
        .as_deref()
        .map(validate_display_name)
        .transpose()?;
    let legal_id = patch.legal_id.as_deref().map(validate_legal_id).transpose()?;

    let email = blank_clears(patch.email.clone());
    if let FieldPatch::Set(value) = &email {
        validate_email(value)?;
    }
    let email = email.map(|v| normalize_email(&v));

    let phone = match blank_clears(patch.phone.clone()) {
        FieldPatch::Set(value) => FieldPatch::Set(validate_phone(&value, config)?),
        other => other,
    };

    Ok(ValidatedPatch {
        display_name,
        legal_id,
        email,
        phone,
        address: blank_clears(patch.address.clone()).map(|v| v.trim().to_string()),
        contact_name: blank_clears(patch.contact_name.clone()).map(|v| v.trim().to_string()),
    })
}

fn blank_clears(patch: FieldPatch<String>) -> FieldPatch<String> {
    match patch {
        FieldPatch::Set(value) if value.trim().is_empty() => FieldPatch::Clear,
        other => other,
    }
}

/// A reason attached to a state change or deletion; trimmed, non-blank.
pub fn validate_reason(reason: &str) -> RegistryResult<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::invalid("reason", "must not be blank"));
    }
    Ok(trimmed.to_string())
}
