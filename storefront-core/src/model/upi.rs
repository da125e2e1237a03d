use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::field::{field_from_key, EditableField, FieldKind, FieldValue};
use crate::resource::{mismatch, require, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentProvider {
    PhonePe,
    BhimUpi,
    GooglePay,
    Upi,
}

impl PaymentProvider {
    pub const ALL: [PaymentProvider; 4] = [
        PaymentProvider::PhonePe,
        PaymentProvider::BhimUpi,
        PaymentProvider::GooglePay,
        PaymentProvider::Upi,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PaymentProvider::PhonePe => "divphonepe",
            PaymentProvider::BhimUpi => "divbhimupi",
            PaymentProvider::GooglePay => "divgooglepay",
            PaymentProvider::Upi => "divupi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentProvider::PhonePe => "PhonePe",
            PaymentProvider::BhimUpi => "BHIM UPI",
            PaymentProvider::GooglePay => "Google Pay",
            PaymentProvider::Upi => "UPI",
        }
    }
}

impl FromStr for PaymentProvider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentProvider::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| ValidationError::UnknownProvider(s.to_string()))
    }
}

/// Enabled flags per provider. Keys missing from stored documents read as off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentOptions {
    pub divphonepe: bool,
    pub divbhimupi: bool,
    pub divgooglepay: bool,
    pub divupi: bool,
}

impl PaymentOptions {
    pub fn is_enabled(&self, provider: PaymentProvider) -> bool {
        match provider {
            PaymentProvider::PhonePe => self.divphonepe,
            PaymentProvider::BhimUpi => self.divbhimupi,
            PaymentProvider::GooglePay => self.divgooglepay,
            PaymentProvider::Upi => self.divupi,
        }
    }

    pub fn set(&mut self, provider: PaymentProvider, enabled: bool) {
        let flag = match provider {
            PaymentProvider::PhonePe => &mut self.divphonepe,
            PaymentProvider::BhimUpi => &mut self.divbhimupi,
            PaymentProvider::GooglePay => &mut self.divgooglepay,
            PaymentProvider::Upi => &mut self.divupi,
        };
        *flag = enabled;
    }

    pub fn enabled(&self) -> Vec<PaymentProvider> {
        PaymentProvider::ALL
            .into_iter()
            .filter(|p| self.is_enabled(*p))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpiConfig {
    #[serde(alias = "_id")]
    pub id: String,
    pub upi_id: String,
    pub upi_name: String,
    #[serde(default)]
    pub payment_options: PaymentOptions,
}

impl UpiConfig {
    /// Providers the payment page offers for this payee.
    pub fn enabled_providers(&self) -> Vec<PaymentProvider> {
        self.payment_options.enabled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpiField {
    UpiId,
    UpiName,
    PaymentOptions,
}

impl EditableField for UpiField {
    fn key(&self) -> &'static str {
        match self {
            UpiField::UpiId => "upi_id",
            UpiField::UpiName => "upi_name",
            UpiField::PaymentOptions => "payment_options",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            UpiField::UpiId | UpiField::UpiName => FieldKind::RequiredText,
            UpiField::PaymentOptions => FieldKind::PaymentOptions,
        }
    }

    fn all() -> &'static [Self] {
        &[UpiField::UpiId, UpiField::UpiName, UpiField::PaymentOptions]
    }
}

impl fmt::Display for UpiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UpiField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        field_from_key(s)
    }
}

impl Resource for UpiConfig {
    type Field = UpiField;

    const COLLECTION: &'static str = "upi";

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: UpiField) -> FieldValue {
        match field {
            UpiField::UpiId => FieldValue::Text(self.upi_id.clone()),
            UpiField::UpiName => FieldValue::Text(self.upi_name.clone()),
            UpiField::PaymentOptions => FieldValue::PaymentOptions(self.payment_options),
        }
    }

    fn set_field(&mut self, field: UpiField, value: FieldValue) -> Result<(), ValidationError> {
        match (field, value) {
            (UpiField::UpiId, FieldValue::Text(v)) => self.upi_id = v,
            (UpiField::UpiName, FieldValue::Text(v)) => self.upi_name = v,
            (UpiField::PaymentOptions, FieldValue::PaymentOptions(v)) => self.payment_options = v,
            (field, _) => return Err(mismatch(field)),
        }
        Ok(())
    }

    fn summary(&self) -> String {
        let providers: Vec<&str> = self.enabled_providers().iter().map(|p| p.label()).collect();
        format!(
            "{}  {} <{}>  [{}]",
            self.id,
            self.upi_name,
            self.upi_id,
            providers.join(", ")
        )
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("id", &self.id)?;
        require("upi_id", &self.upi_id)?;
        require("upi_name", &self.upi_name)
    }
}
