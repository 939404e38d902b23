use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::client::{NewClient, UpdateClient};
use crate::forms::empty_string_as_none;

/// Maximum allowed length for a client name.
const NAME_MAX_LEN: u64 = 128;

#[derive(Debug, Error)]
pub enum ClientFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("client name cannot be empty")]
    EmptyName,
}

/// Form payload for both the "add client" and "edit client" dialogs; an edit
/// overwrites every field.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveClientForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tax_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[validate(email)]
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub locality: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub is_legacy: bool,
}

impl SaveClientForm {
    fn validated_name(&self) -> Result<String, ClientFormError> {
        self.validate()?;
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ClientFormError::EmptyName);
        }
        Ok(name)
    }

    pub fn into_new_client(self) -> Result<NewClient, ClientFormError> {
        let name = self.validated_name()?;

        let mut new_client = NewClient::new(name);
        if let Some(tax_id) = self.tax_id {
            new_client = new_client.with_tax_id(tax_id);
        }
        if let Some(phone) = self.phone {
            new_client = new_client.with_phone(phone);
        }
        if let Some(email) = self.email {
            new_client = new_client.with_email(email);
        }
        if let Some(address) = self.address {
            new_client = new_client.with_address(address);
        }
        if let Some(locality) = self.locality {
            new_client = new_client.with_locality(locality);
        }
        if let Some(neighborhood) = self.neighborhood {
            new_client = new_client.with_neighborhood(neighborhood);
        }
        if self.is_legacy {
            new_client = new_client.legacy();
        }

        Ok(new_client)
    }

    pub fn into_update_client(self) -> Result<UpdateClient, ClientFormError> {
        let name = self.validated_name()?;

        Ok(UpdateClient {
            name,
            tax_id: self.tax_id,
            phone: self.phone,
            email: self.email.map(|email| email.to_lowercase()),
            address: self.address,
            locality: self.locality,
            neighborhood: self.neighborhood,
            is_legacy: self.is_legacy,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str) -> SaveClientForm {
        SaveClientForm {
            name: name.to_string(),
            tax_id: Some("20-12345678-9".to_string()),
            phone: None,
            email: Some("Cliente@Example.com".to_string()),
            address: Some("Av. Siempre Viva 742".to_string()),
            locality: None,
            neighborhood: None,
            is_legacy: false,
        }
    }

    #[test]
    fn into_new_client_lowercases_email() {
        let client = form("Corralón El Tala").into_new_client().expect("valid form");
        assert_eq!(client.name, "Corralón El Tala");
        assert_eq!(client.email.as_deref(), Some("cliente@example.com"));
        assert_eq!(client.tax_id.as_deref(), Some("20-12345678-9"));
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(
            form("   ").into_new_client(),
            Err(ClientFormError::EmptyName) | Err(ClientFormError::Validation(_))
        ));
    }
}
