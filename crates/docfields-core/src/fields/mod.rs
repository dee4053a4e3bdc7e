//! Business field identifiers and the per-document field map.

mod map;

pub use map::{normalize_value, FieldMap};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// One of the fixed set of business fields recognized in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    ReferenceNumber,
    LastName,
    FirstName,
    Date,
    Amount,
    TaxId,
    Address,
    Phone,
    Email,
}

impl FieldName {
    /// Every field, in canonical order.
    pub const ALL: [FieldName; 9] = [
        FieldName::ReferenceNumber,
        FieldName::LastName,
        FieldName::FirstName,
        FieldName::Date,
        FieldName::Amount,
        FieldName::TaxId,
        FieldName::Address,
        FieldName::Phone,
        FieldName::Email,
    ];

    /// Number of fields.
    pub const COUNT: usize = Self::ALL.len();

    /// Machine key, as used in exports and overrides.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReferenceNumber => "reference_number",
            Self::LastName => "last_name",
            Self::FirstName => "first_name",
            Self::Date => "date",
            Self::Amount => "amount",
            Self::TaxId => "tax_id",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }

    /// Human-readable label shown on review forms.
    pub fn label(self) -> &'static str {
        match self {
            Self::ReferenceNumber => "Numéro de référence",
            Self::LastName => "Nom",
            Self::FirstName => "Prénom",
            Self::Date => "Date",
            Self::Amount => "Montant",
            Self::TaxId => "SIRET/SIREN",
            Self::Address => "Adresse",
            Self::Phone => "Téléphone",
            Self::Email => "Email",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}
