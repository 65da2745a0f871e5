use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::category::{Category, CategoryPolicy};

/// Date format accepted for purchase and expiration dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields of a grocery record that validation can complain about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Category,
    ExpirationDate,
    PurchaseDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Category => write!(f, "category"),
            Field::ExpirationDate => write!(f, "expiration date"),
            Field::PurchaseDate => write!(f, "purchase date"),
        }
    }
}

/// Errors produced while turning a [`RawItem`] into a [`GroceryItem`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(Field),

    #[error("Invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: Field, value: String },

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}

/// Unvalidated grocery input, as typed into the entry form or produced by a scan.
///
/// Accepts both snake_case keys and the camelCase keys used by receipt exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    #[serde(alias = "purchaseDate")]
    pub purchase_date: Option<String>,
    #[serde(alias = "expirationDate")]
    pub expiration_date: Option<String>,
}

impl RawItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        expiration_date: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            expiration_date: Some(expiration_date.into()),
            ..Self::default()
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn with_purchase_date(mut self, purchase_date: impl Into<String>) -> Self {
        self.purchase_date = Some(purchase_date.into());
        self
    }

    /// Validate against today's UTC date, rejecting unknown categories.
    pub fn validate(&self) -> Result<GroceryItem, ValidationError> {
        self.validate_on(Utc::now().date_naive(), CategoryPolicy::Reject)
    }

    /// Validate with an explicit "today" (used when no purchase date is given)
    /// and an explicit unknown-category policy.
    pub fn validate_on(
        &self,
        today: NaiveDate,
        policy: CategoryPolicy,
    ) -> Result<GroceryItem, ValidationError> {
        let name = required(&self.name).ok_or(ValidationError::MissingField(Field::Name))?;
        let category_raw =
            required(&self.category).ok_or(ValidationError::MissingField(Field::Category))?;
        let expiration_raw = required(&self.expiration_date)
            .ok_or(ValidationError::MissingField(Field::ExpirationDate))?;

        let category = match Category::from_str(category_raw) {
            Ok(category) => category,
            Err(_) if policy == CategoryPolicy::Other => Category::Other,
            Err(_) => return Err(ValidationError::UnknownCategory(category_raw.to_string())),
        };

        let expiration_date = parse_date(expiration_raw, Field::ExpirationDate)?;
        let purchase_date = match required(&self.purchase_date) {
            Some(raw) => parse_date(raw, Field::PurchaseDate)?,
            None => today,
        };

        Ok(GroceryItem {
            name: name.to_string(),
            category,
            quantity: required(&self.quantity).map(str::to_string),
            purchase_date,
            expiration_date,
        })
    }
}

impl From<&GroceryItem> for RawItem {
    fn from(item: &GroceryItem) -> Self {
        Self {
            name: Some(item.name.clone()),
            category: Some(item.category.to_string()),
            quantity: item.quantity.clone(),
            purchase_date: Some(item.purchase_date.format(DATE_FORMAT).to_string()),
            expiration_date: Some(item.expiration_date.format(DATE_FORMAT).to_string()),
        }
    }
}

/// A validated pantry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    pub category: Category,
    pub quantity: Option<String>,
    pub purchase_date: NaiveDate,
    pub expiration_date: NaiveDate,
}

impl GroceryItem {
    pub fn new(name: impl Into<String>, category: Category, expiration_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            category,
            quantity: None,
            purchase_date: Utc::now().date_naive(),
            expiration_date,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    pub fn with_purchase_date(mut self, purchase_date: NaiveDate) -> Self {
        self.purchase_date = purchase_date;
        self
    }
}

impl fmt::Display for GroceryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)?;
        if let Some(quantity) = &self.quantity {
            write!(f, ", {}", quantity)?;
        }
        write!(f, ", expires {}", self.expiration_date)
    }
}

/// Trimmed, non-empty value of an optional field.
fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: &str, field: Field) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
