//! Order placement and order history models.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::FieldError;
use super::product::ProductId;

/// Message attached to a required form input left blank.
pub const EMPTY_FIELD_MESSAGE: &str = "field must not be empty";

/// Server-assigned order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Identifier as used in request paths.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted and not yet delivered.
    InWork,
    /// Delivered.
    Done,
    /// Cancelled by the customer.
    Cancelled,
}

impl OrderStatus {
    /// Whether the order still counts as active.
    pub fn is_active(self) -> bool {
        matches!(self, Self::InWork)
    }
}

/// Which orders the history screen lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFilter {
    /// Every order.
    #[default]
    All,
    /// Only orders still in work.
    ActiveOnly,
}

impl OrderFilter {
    /// Whether `summary` passes the filter.
    pub fn accepts(self, summary: &OrderSummary) -> bool {
        match self {
            Self::All => true,
            Self::ActiveOnly => summary.status.is_active(),
        }
    }
}

/// Raw order form inputs as typed on the order screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFormInput {
    /// Selected size, if the product has sizes.
    pub size: Option<String>,
    /// Quantity text.
    pub quantity: String,
    /// House / street line.
    pub house: String,
    /// Apartment line.
    pub apartment: String,
    /// Requested delivery date, `YYYY-MM-DD`.
    pub delivery_date: String,
}

/// Validated order form, serialised as the `POST orders` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    quantity: u32,
    house: String,
    apartment: String,
    delivery_date: NaiveDate,
}

impl OrderForm {
    /// Validate raw inputs for `product_id`.
    ///
    /// Every failing input is reported, in form order, using the same
    /// [`FieldError`] shape the server uses, so local and remote rejections
    /// are displayed identically.
    pub fn try_from_input(
        product_id: ProductId,
        input: &OrderFormInput,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let quantity = match input.quantity.trim().parse::<u32>() {
            Ok(0) => {
                errors.push(FieldError::new("quantity", "quantity must be positive"));
                0
            }
            Ok(value) => value,
            Err(_) => {
                errors.push(FieldError::new("quantity", "quantity must be a number"));
                0
            }
        };

        let house = input.house.trim();
        if house.is_empty() {
            errors.push(FieldError::new("house", EMPTY_FIELD_MESSAGE));
        }
        let apartment = input.apartment.trim();
        if apartment.is_empty() {
            errors.push(FieldError::new("apartment", EMPTY_FIELD_MESSAGE));
        }

        let delivery_date = match NaiveDate::parse_from_str(input.delivery_date.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new("deliveryDate", "date must be YYYY-MM-DD"));
                None
            }
        };

        let size = input
            .size
            .as_deref()
            .map(str::trim)
            .filter(|size| !size.is_empty())
            .map(str::to_owned);

        match delivery_date {
            Some(delivery_date) if errors.is_empty() => Ok(Self {
                product_id,
                size,
                quantity,
                house: house.to_owned(),
                apartment: apartment.to_owned(),
                delivery_date,
            }),
            _ => Err(errors),
        }
    }

    /// Product being ordered.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Selected size.
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Number of units.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// House line of the delivery address.
    pub fn house(&self) -> &str {
        self.house.as_str()
    }

    /// Apartment line of the delivery address.
    pub fn apartment(&self) -> &str {
        self.apartment.as_str()
    }

    /// Requested delivery date.
    pub fn delivery_date(&self) -> NaiveDate {
        self.delivery_date
    }
}

/// Receipt returned after an order is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// New order's identifier.
    pub id: OrderId,
    /// Status at creation, normally in work.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expected delivery date.
    pub eta: NaiveDate,
}

/// One row of the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Order identifier.
    pub id: OrderId,
    /// Title of the ordered product.
    pub title: String,
    /// Preview image of the ordered product.
    #[serde(default)]
    pub preview: String,
    /// Number of units.
    pub quantity: u32,
    /// Size, if one was chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Current status.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expected delivery date.
    pub eta: NaiveDate,
}

#[cfg(test)]
mod tests {
    //! Order form validation and history filtering.

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn product_id() -> ProductId {
        ProductId::new("p-1").expect("valid id")
    }

    #[fixture]
    fn input() -> OrderFormInput {
        OrderFormInput {
            size: Some("M".to_owned()),
            quantity: "2".to_owned(),
            house: "Main st. 1".to_owned(),
            apartment: "12".to_owned(),
            delivery_date: "2026-11-02".to_owned(),
        }
    }

    #[rstest]
    fn valid_form_serialises_wire_body(product_id: ProductId, input: OrderFormInput) {
        let form = OrderForm::try_from_input(product_id, &input).expect("valid form");
        let body = serde_json::to_value(&form).expect("encode");
        assert_eq!(
            body,
            json!({
                "productId": "p-1",
                "size": "M",
                "quantity": 2,
                "house": "Main st. 1",
                "apartment": "12",
                "deliveryDate": "2026-11-02"
            })
        );
    }

    #[rstest]
    fn blank_size_is_omitted(product_id: ProductId, mut input: OrderFormInput) {
        input.size = Some("  ".to_owned());
        let form = OrderForm::try_from_input(product_id, &input).expect("valid form");
        assert!(form.size().is_none());
        let body = serde_json::to_value(&form).expect("encode");
        assert!(body.get("size").is_none());
    }

    #[rstest]
    fn every_invalid_input_is_reported_in_form_order(product_id: ProductId) {
        let input = OrderFormInput {
            quantity: "0".to_owned(),
            delivery_date: "tomorrow".to_owned(),
            ..OrderFormInput::default()
        };
        let errors = OrderForm::try_from_input(product_id, &input).expect_err("invalid");
        let fields: Vec<_> = errors.iter().map(|err| err.field.as_str()).collect();
        assert_eq!(fields, ["quantity", "house", "apartment", "deliveryDate"]);
    }

    #[rstest]
    #[case(OrderStatus::InWork, OrderFilter::ActiveOnly, true)]
    #[case(OrderStatus::Done, OrderFilter::ActiveOnly, false)]
    #[case(OrderStatus::Cancelled, OrderFilter::ActiveOnly, false)]
    #[case(OrderStatus::Cancelled, OrderFilter::All, true)]
    fn filter_matches_status(
        #[case] status: OrderStatus,
        #[case] filter: OrderFilter,
        #[case] expected: bool,
    ) {
        let summary: OrderSummary = serde_json::from_value(json!({
            "id": "o-1",
            "title": "Hoodie",
            "quantity": 1,
            "status": status,
            "createdAt": "2026-10-01T10:00:00Z",
            "eta": "2026-10-05"
        }))
        .expect("decode");
        assert_eq!(filter.accepts(&summary), expected);
    }

    #[rstest]
    fn status_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(OrderStatus::InWork).expect("encode"),
            json!("in_work")
        );
    }
}
