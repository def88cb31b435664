use std::collections::BTreeMap;
use std::str::FromStr;

use async_graphql::{InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Order fulfilment states, canonical lowercase in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "preparing")]
    Preparing,
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    // The original clients were inconsistent about casing; accept any.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::BadRequest(format!("unknown order status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "refunded")]
    Refunded,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(AppError::BadRequest(format!(
                "unknown payment status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ComplaintStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(ComplaintStatus::Pending),
            "resolved" => Ok(ComplaintStatus::Resolved),
            "rejected" => Ok(ComplaintStatus::Rejected),
            other => Err(AppError::BadRequest(format!(
                "unknown complaint status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ComplaintCategory {
    #[sea_orm(string_value = "food_quality")]
    FoodQuality,
    #[sea_orm(string_value = "wrong_order")]
    WrongOrder,
    #[sea_orm(string_value = "billing_issue")]
    BillingIssue,
    #[sea_orm(string_value = "pickup_issue")]
    PickupIssue,
    #[sea_orm(string_value = "poor_service")]
    PoorService,
    #[sea_orm(string_value = "other")]
    Other,
}

impl ComplaintCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintCategory::FoodQuality => "food_quality",
            ComplaintCategory::WrongOrder => "wrong_order",
            ComplaintCategory::BillingIssue => "billing_issue",
            ComplaintCategory::PickupIssue => "pickup_issue",
            ComplaintCategory::PoorService => "poor_service",
            ComplaintCategory::Other => "other",
        }
    }
}

impl FromStr for ComplaintCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "food_quality" => Ok(ComplaintCategory::FoodQuality),
            "wrong_order" => Ok(ComplaintCategory::WrongOrder),
            "billing_issue" => Ok(ComplaintCategory::BillingIssue),
            "pickup_issue" => Ok(ComplaintCategory::PickupIssue),
            "poor_service" => Ok(ComplaintCategory::PoorService),
            "other" => Ok(ComplaintCategory::Other),
            unknown => Err(AppError::BadRequest(format!(
                "unknown complaint type '{unknown}'"
            ))),
        }
    }
}

/// Extras selected on a cart line. Stored as JSON on the row; part of the
/// line identity together with the menu item id and the selected size.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, InputObject)]
#[graphql(input_name = "SelectedExtrasInput")]
pub struct SelectedExtras {
    #[serde(default)]
    pub additions: Vec<String>,
    #[serde(default)]
    pub removals: Vec<String>,
}

impl SelectedExtras {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// The customization shape the clients consume: size, additions, removals and
/// free-text notes folded into one object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, SimpleObject, InputObject)]
#[graphql(input_name = "CustomizationsInput")]
pub struct Customizations {
    pub size: Option<String>,
    pub additions: Option<Vec<String>>,
    pub removals: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl Customizations {
    /// Project the columns of a cart/order line into the combined shape the
    /// clients expect. Returns `None` when nothing was customized.
    pub fn project(
        size: Option<&str>,
        extras: Option<&SelectedExtras>,
        notes: Option<&str>,
    ) -> Option<Self> {
        if size.is_none() && extras.is_none_or(SelectedExtras::is_empty) && notes.is_none() {
            return None;
        }
        Some(Self {
            size: size.map(str::to_string),
            additions: extras
                .filter(|e| !e.additions.is_empty())
                .map(|e| e.additions.clone()),
            removals: extras
                .filter(|e| !e.removals.is_empty())
                .map(|e| e.removals.clone()),
            notes: notes.map(str::to_string),
        })
    }
}

/// Named size -> price delta, e.g. `{"regular": 0, "large": 40}`.
pub type SizeOptionMap = BTreeMap<String, i64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub struct SizeOption {
    pub name: String,
    pub price_delta: i64,
}

pub fn size_options_from_json(value: &serde_json::Value) -> Option<Vec<SizeOption>> {
    let map: SizeOptionMap = serde_json::from_value(value.clone()).ok()?;
    Some(
        map.into_iter()
            .map(|(name, price_delta)| SizeOption { name, price_delta })
            .collect(),
    )
}

/// The fixed fulfilment pipeline every order walks through.
pub const ORDER_STEP_LABELS: [&str; 4] =
    ["Order Placed", "Preparing", "Ready for Pickup", "Completed"];

/// Which pipeline step is current for a status. Cancelled orders are not
/// active and have no current step.
pub fn step_cursor(status: OrderStatus) -> Option<usize> {
    match status {
        OrderStatus::Pending | OrderStatus::Confirmed => Some(0),
        OrderStatus::Preparing => Some(1),
        OrderStatus::Ready => Some(2),
        OrderStatus::Delivered => Some(3),
        OrderStatus::Cancelled => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_parses_any_case() {
        assert_eq!("Preparing".parse::<OrderStatus>().unwrap(), OrderStatus::Preparing);
        assert_eq!("CANCELLED".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn projection_is_none_without_customization() {
        assert_eq!(Customizations::project(None, None, None), None);
        let empty = SelectedExtras::default();
        assert_eq!(Customizations::project(None, Some(&empty), None), None);
    }

    #[test]
    fn projection_folds_columns() {
        let extras = SelectedExtras {
            additions: vec!["cheese".into()],
            removals: vec![],
        };
        let c = Customizations::project(Some("large"), Some(&extras), Some("no onions")).unwrap();
        assert_eq!(c.size.as_deref(), Some("large"));
        assert_eq!(c.additions, Some(vec!["cheese".to_string()]));
        assert_eq!(c.removals, None);
        assert_eq!(c.notes.as_deref(), Some("no onions"));
    }

    #[test]
    fn step_cursor_matches_pipeline() {
        assert_eq!(step_cursor(OrderStatus::Pending), Some(0));
        assert_eq!(step_cursor(OrderStatus::Confirmed), Some(0));
        assert_eq!(step_cursor(OrderStatus::Preparing), Some(1));
        assert_eq!(step_cursor(OrderStatus::Ready), Some(2));
        assert_eq!(step_cursor(OrderStatus::Delivered), Some(3));
        assert_eq!(step_cursor(OrderStatus::Cancelled), None);
    }

    #[test]
    fn size_options_parse_named_deltas() {
        let value = serde_json::json!({"regular": 0, "large": 40});
        let options = size_options_from_json(&value).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].name, "large");
        assert_eq!(options[0].price_delta, 40);
    }
}
