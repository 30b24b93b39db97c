use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{ItemType, ProductRef};

// 支付状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
    Refunded,
    Failed,
}

impl PaymentStatus {
    /// 状态机：pending -> paid | cancelled | failed，paid -> refunded
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid)
                | (Self::Pending, Self::Cancelled)
                | (Self::Pending, Self::Failed)
                | (Self::Paid, Self::Refunded)
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
            PaymentStatus::Refunded => write!(f, "refunded"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            "refunded" => Ok(PaymentStatus::Refunded),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!("Invalid payment status: {s}")),
        }
    }
}

// 订单中的商品行，下单时锁定价格
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentLine {
    pub item_type: ItemType,
    pub item_id: i64,
    pub title: String,
    pub amount: i64,
}

impl PaymentLine {
    pub fn product(&self) -> ProductRef {
        ProductRef {
            item_type: self.item_type,
            item_id: self.item_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub order_id: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub method: Option<String>,
    pub items: Vec<PaymentLine>,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_transitions() {
        use PaymentStatus::*;
        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Refunded));
        assert!(!Paid.can_transition_to(Cancelled));
        assert!(!Refunded.can_transition_to(Paid));
        assert!(!Cancelled.can_transition_to(Paid));
    }
}
