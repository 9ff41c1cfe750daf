//! Address book rules
//!
//! [`AddressBook`] is a plain value over a user's shipping addresses. Every
//! mutation keeps exactly one default entry whenever the book is non-empty,
//! and the last remaining entry can never be removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};

/// A saved shipping address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddress {
    pub id: Uuid,
    /// Label such as "Home" or "Office"
    pub title: String,
    pub address: String,
    pub contact_number: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for adding an address
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateAddress {
    #[serde(default)]
    #[validate(length(max = 50))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 300))]
    pub address: String,
    #[serde(alias = "contactNumber")]
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
    #[serde(alias = "isDefault")]
    pub is_default: Option<bool>,
}

/// DTO for editing an address
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAddress {
    #[validate(length(max = 50))]
    pub title: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[serde(alias = "contactNumber")]
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
    #[serde(alias = "isDefault")]
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressBook {
    entries: Vec<ShippingAddress>,
}

impl AddressBook {
    /// Wrap stored entries, repairing a missing or duplicated default
    pub fn new(mut entries: Vec<ShippingAddress>) -> Self {
        let first_default = entries.iter().position(|a| a.is_default).unwrap_or(0);
        for (idx, entry) in entries.iter_mut().enumerate() {
            entry.is_default = idx == first_default;
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[ShippingAddress] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ShippingAddress> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_address(&self) -> Option<&ShippingAddress> {
        self.entries.iter().find(|a| a.is_default)
    }

    /// Append an address. It becomes the default when asked to or when the
    /// book is empty.
    pub fn add(&mut self, input: CreateAddress) -> UserResult<ShippingAddress> {
        let title = required(&input.title, "title")?;
        let address = required(&input.address, "address")?;

        let make_default = input.is_default.unwrap_or(false) || self.entries.is_empty();
        if make_default {
            self.clear_default();
        }

        let now = Utc::now();
        let entry = ShippingAddress {
            id: Uuid::now_v7(),
            title,
            address,
            contact_number: input.contact_number,
            is_default: make_default,
            created_at: now,
            updated_at: now,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Edit fields of an address. Un-setting the current default is ignored.
    pub fn update(&mut self, id: Uuid, input: UpdateAddress) -> UserResult<ShippingAddress> {
        let idx = self.position(id)?;

        let title = input.title.as_deref().map(|t| required(t, "title")).transpose()?;
        let address = input
            .address
            .as_deref()
            .map(|a| required(a, "address"))
            .transpose()?;

        if input.is_default == Some(true) {
            self.clear_default();
            self.entries[idx].is_default = true;
        }

        let entry = &mut self.entries[idx];
        if let Some(title) = title {
            entry.title = title;
        }
        if let Some(address) = address {
            entry.address = address;
        }
        if let Some(contact_number) = input.contact_number {
            entry.contact_number = Some(contact_number);
        }
        entry.updated_at = Utc::now();

        Ok(entry.clone())
    }

    /// Remove an address, promoting the first remaining entry when the
    /// default goes away.
    pub fn remove(&mut self, id: Uuid) -> UserResult<ShippingAddress> {
        let idx = self.position(id)?;
        if self.entries.len() == 1 {
            return Err(UserError::LastAddress);
        }

        let removed = self.entries.remove(idx);
        if removed.is_default {
            if let Some(first) = self.entries.first_mut() {
                first.is_default = true;
                first.updated_at = Utc::now();
            }
        }

        Ok(removed)
    }

    pub fn set_default(&mut self, id: Uuid) -> UserResult<ShippingAddress> {
        let idx = self.position(id)?;
        self.clear_default();

        let entry = &mut self.entries[idx];
        entry.is_default = true;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    fn position(&self, id: Uuid) -> UserResult<usize> {
        self.entries
            .iter()
            .position(|a| a.id == id)
            .ok_or(UserError::AddressNotFound(id))
    }

    fn clear_default(&mut self) {
        let now = Utc::now();
        for entry in self.entries.iter_mut().filter(|a| a.is_default) {
            entry.is_default = false;
            entry.updated_at = now;
        }
    }
}

fn required(value: &str, field: &str) -> UserResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserError::Validation(format!("Address {} is required", field)));
    }
    Ok(trimmed.to_string())
}
