//! 支付实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(unique)]
    pub order_id: String,
    pub amount: i64,
    pub status: String,
    pub method: Option<String>,
    /// PaymentLine 数组的 JSON
    #[sea_orm(column_type = "Text")]
    pub items: String,
    pub paid_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::payments::entities::Payment {
        use crate::models::payments::entities::{Payment, PaymentStatus};

        let items = serde_json::from_str(&self.items).unwrap_or_else(|e| {
            tracing::warn!("订单 {} 的商品数据无法解析: {}", self.order_id, e);
            Vec::new()
        });

        Payment {
            id: self.id,
            user_id: self.user_id,
            order_id: self.order_id,
            amount: self.amount,
            status: self.status.parse().unwrap_or(PaymentStatus::Pending),
            method: self.method,
            items,
            paid_at: self.paid_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
