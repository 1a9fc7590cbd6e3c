//! Catalog product model.
//!
//! Products are keyed by [`ProductId`]; the id is the identity used when
//! diffing rendered lists.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Validation errors raised while decoding products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// Product id was blank.
    EmptyId,
    /// Badge colour was not `#RGB` or `#RRGGBB`.
    InvalidColor {
        /// Rejected value.
        value: String,
    },
    /// Price was below zero.
    NegativePrice,
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "product id must not be empty"),
            Self::InvalidColor { value } => {
                write!(f, "badge colour must be a #RGB or #RRGGBB hex string (got {value})")
            }
            Self::NegativePrice => write!(f, "price must not be negative"),
        }
    }
}

impl std::error::Error for ProductValidationError {}

/// Stable product identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Validate a raw identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProductValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ProductValidationError::EmptyId);
        }
        Ok(Self(raw))
    }

    /// Identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Badge colour in `#RGB` or `#RRGGBB` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Validate a hex colour string.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProductValidationError> {
        let raw = raw.into();
        let valid = raw
            .strip_prefix('#')
            .is_some_and(|digits| {
                matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
            });
        if valid {
            Ok(Self(raw))
        } else {
            Err(ProductValidationError::InvalidColor { value: raw })
        }
    }

    /// Colour string including the leading `#`.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for HexColor {
    type Error = ProductValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// Promotional badge shown on a product card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductBadge {
    /// Badge text.
    pub value: String,
    /// Badge background colour.
    pub color: HexColor,
}

/// A catalog product.
///
/// ## Invariants
/// - `price` is non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ProductDto", into = "ProductDto")]
pub struct Product {
    /// Identity used as the list diff key.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Preview image reference.
    pub preview: String,
    /// Gallery image references, in display order.
    pub images: Vec<String>,
    /// Department the product belongs to.
    pub department: String,
    /// Promotional badge, if the product carries one.
    pub badge: Option<ProductBadge>,
    /// Detail lines shown on the product screen.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDto {
    id: ProductId,
    title: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    preview: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    badge: Option<ProductBadge>,
    #[serde(default)]
    details: Vec<String>,
}

impl TryFrom<ProductDto> for Product {
    type Error = ProductValidationError;

    fn try_from(value: ProductDto) -> Result<Self, Self::Error> {
        if value.price.is_sign_negative() && !value.price.is_zero() {
            return Err(ProductValidationError::NegativePrice);
        }
        Ok(Self {
            id: value.id,
            title: value.title,
            description: value.description,
            price: value.price,
            preview: value.preview,
            images: value.images,
            department: value.department,
            badge: value.badge,
            details: value.details,
        })
    }
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            price: value.price,
            preview: value.preview,
            images: value.images,
            department: value.department,
            badge: value.badge,
            details: value.details,
        }
    }
}

impl Product {
    /// Preview followed by the gallery images, as shown on the detail screen.
    pub fn gallery(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.preview.as_str())
            .filter(|preview| !preview.is_empty())
            .chain(self.images.iter().map(String::as_str))
    }
}
