//! 支付存储操作

use super::{SeaOrmStorage, map_write_err, now_ts};
use crate::entity::cart_items::{Column as CartColumn, Entity as CartItems};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::payments::{ActiveModel, Column, Entity as Payments, Model as PaymentModel};
use crate::errors::{EduMarketError, Result};
use crate::models::{
    enrollments::entities::{Enrollment, EnrollmentStatus},
    payments::{
        entities::{Payment, PaymentLine, PaymentStatus},
        requests::{NewPayment, PaymentListQuery},
        responses::PaymentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// 为订单中的一行创建选课记录；已取消的记录重新激活
async fn enroll_line<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    payment_id: i64,
    line: &PaymentLine,
    now: i64,
) -> Result<Enrollment> {
    let existing = Enrollments::find()
        .filter(EnrollmentColumn::UserId.eq(user_id))
        .filter(EnrollmentColumn::ItemType.eq(line.item_type.to_string()))
        .filter(EnrollmentColumn::ItemId.eq(line.item_id))
        .one(conn)
        .await
        .map_err(|e| EduMarketError::database_operation(format!("查询选课记录失败: {e}")))?;

    let saved = match existing {
        Some(existing) if existing.status == EnrollmentStatus::Cancelled.to_string() => {
            let mut model: EnrollmentActiveModel = existing.into();
            model.status = Set(EnrollmentStatus::Active.to_string());
            model.payment_id = Set(Some(payment_id));
            model.progress = Set(0);
            model.updated_at = Set(now);
            model
                .update(conn)
                .await
                .map_err(|e| EduMarketError::database_operation(format!("更新选课记录失败: {e}")))?
        }
        Some(_) => {
            return Err(EduMarketError::conflict(format!(
                "Already enrolled in {} {}",
                line.item_type, line.item_id
            )));
        }
        None => EnrollmentActiveModel {
            user_id: Set(user_id),
            item_type: Set(line.item_type.to_string()),
            item_id: Set(line.item_id),
            payment_id: Set(Some(payment_id)),
            status: Set(EnrollmentStatus::Active.to_string()),
            progress: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| map_write_err(e, "Already enrolled", "创建选课记录失败"))?,
    };

    Ok(saved.into_enrollment())
}

async fn find_payment<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<PaymentModel>> {
    Payments::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| EduMarketError::database_operation(format!("查询支付失败: {e}")))
}

impl SeaOrmStorage {
    /// 创建待支付订单
    pub async fn create_payment_impl(&self, payment: NewPayment) -> Result<Payment> {
        let now = now_ts();
        let items = serde_json::to_string(&payment.items)?;

        let model = ActiveModel {
            user_id: Set(payment.user_id),
            order_id: Set(payment.order_id),
            amount: Set(payment.amount),
            status: Set(PaymentStatus::Pending.to_string()),
            method: Set(None),
            items: Set(items),
            paid_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Duplicate order id", "创建支付失败"))?;

        Ok(result.into_payment())
    }

    /// 通过 ID 获取支付
    pub async fn get_payment_by_id_impl(&self, id: i64) -> Result<Option<Payment>> {
        Ok(find_payment(&self.db, id).await?.map(|m| m.into_payment()))
    }

    /// 通过订单号获取支付
    pub async fn get_payment_by_order_id_impl(&self, order_id: &str) -> Result<Option<Payment>> {
        let result = Payments::find()
            .filter(Column::OrderId.eq(order_id))
            .one(&self.db)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询支付失败: {e}")))?;

        Ok(result.map(|m| m.into_payment()))
    }

    /// 分页列出支付
    pub async fn list_payments_with_pagination_impl(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        let mut select = Payments::find();

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (items, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(PaymentListResponse {
            items: items.into_iter().map(|m| m.into_payment()).collect(),
            pagination,
        })
    }

    /// 确认支付：pending -> paid，逐项创建选课并移出购物车
    pub async fn confirm_payment_impl(
        &self,
        order_id: &str,
        method: Option<String>,
    ) -> Result<(Payment, Vec<Enrollment>)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Payments::find()
            .filter(Column::OrderId.eq(order_id))
            .one(&txn)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("查询支付失败: {e}")))?
            .ok_or_else(|| EduMarketError::not_found("Payment not found"))?;

        if existing.status != PaymentStatus::Pending.to_string() {
            return Err(EduMarketError::conflict(format!(
                "Payment is {}, not pending",
                existing.status
            )));
        }

        let now = now_ts();
        let user_id = existing.user_id;
        let payment_id = existing.id;
        let lines: Vec<PaymentLine> = serde_json::from_str(&existing.items)?;

        let mut model: ActiveModel = existing.into();
        model.status = Set(PaymentStatus::Paid.to_string());
        model.method = Set(method);
        model.paid_at = Set(Some(now));
        model.updated_at = Set(now);
        let paid = model
            .update(&txn)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新支付状态失败: {e}")))?;

        let mut enrollments = Vec::with_capacity(lines.len());
        for line in &lines {
            enrollments.push(enroll_line(&txn, user_id, payment_id, line, now).await?);

            CartItems::delete_many()
                .filter(CartColumn::UserId.eq(user_id))
                .filter(CartColumn::ItemType.eq(line.item_type.to_string()))
                .filter(CartColumn::ItemId.eq(line.item_id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    EduMarketError::database_operation(format!("移除购物车条目失败: {e}"))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((paid.into_payment(), enrollments))
    }

    /// 支付状态迁移；退款时取消关联选课
    pub async fn transition_payment_impl(&self, id: i64, next: PaymentStatus) -> Result<Payment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = find_payment(&txn, id)
            .await?
            .ok_or_else(|| EduMarketError::not_found("Payment not found"))?;

        let current: PaymentStatus = existing
            .status
            .parse()
            .map_err(EduMarketError::database_operation)?;
        if !current.can_transition_to(next) {
            return Err(EduMarketError::conflict(format!(
                "Cannot change payment from {current} to {next}"
            )));
        }

        let now = now_ts();
        let mut model: ActiveModel = existing.into();
        model.status = Set(next.to_string());
        model.updated_at = Set(now);
        if next == PaymentStatus::Paid {
            model.paid_at = Set(Some(now));
        }
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| EduMarketError::database_operation(format!("更新支付状态失败: {e}")))?;

        if next == PaymentStatus::Refunded {
            Enrollments::update_many()
                .col_expr(
                    EnrollmentColumn::Status,
                    sea_orm::sea_query::Expr::value(EnrollmentStatus::Cancelled.to_string()),
                )
                .col_expr(EnrollmentColumn::UpdatedAt, sea_orm::sea_query::Expr::value(now))
                .filter(EnrollmentColumn::PaymentId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| EduMarketError::database_operation(format!("取消选课失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| EduMarketError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_payment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemType, ProductRef};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{seed_course, seed_user, seed_workbook};

    fn line(item_type: ItemType, item_id: i64, amount: i64) -> PaymentLine {
        PaymentLine {
            item_type,
            item_id,
            title: format!("{item_type} {item_id}"),
            amount,
        }
    }

    #[actix_web::test]
    async fn test_confirm_creates_enrollments_and_empties_cart() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;
        let student = seed_user(&storage, "student", UserRole::User).await;
        let course = seed_course(&storage, business.id, "Grammar", 10_000).await;
        let workbook = seed_workbook(&storage, business.id, "Drill", 5_000).await;
        let other = seed_course(&storage, business.id, "Listening", 7_000).await;

        for item in [
            ProductRef { item_type: ItemType::Course, item_id: course.id },
            ProductRef { item_type: ItemType::Workbook, item_id: workbook.id },
            ProductRef { item_type: ItemType::Course, item_id: other.id },
        ] {
            storage.add_cart_item_impl(student.id, item).await.unwrap();
        }

        let payment = storage
            .create_payment_impl(NewPayment {
                user_id: student.id,
                order_id: "8a4f5c7e-0000-4000-8000-000000000001".to_string(),
                amount: 15_000,
                items: vec![
                    line(ItemType::Course, course.id, 10_000),
                    line(ItemType::Workbook, workbook.id, 5_000),
                ],
            })
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);

        let (paid, enrollments) = storage
            .confirm_payment_impl(&payment.order_id, Some("card".to_string()))
            .await
            .unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);
        assert!(paid.paid_at.is_some());
        assert_eq!(paid.method.as_deref(), Some("card"));
        assert_eq!(enrollments.len(), 2);
        assert!(enrollments.iter().all(|e| e.payment_id == Some(payment.id)));

        // 只剩未购买的课程
        let cart = storage.list_cart_items_impl(student.id).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].item_id, other.id);

        let again = storage
            .confirm_payment_impl(&payment.order_id, None)
            .await
            .unwrap_err();
        assert_eq!(again.code(), "E008");
    }

    #[actix_web::test]
    async fn test_confirm_rolls_back_when_already_enrolled() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;
        let student = seed_user(&storage, "student", UserRole::User).await;
        let course = seed_course(&storage, business.id, "Grammar", 10_000).await;

        let first = storage
            .create_payment_impl(NewPayment {
                user_id: student.id,
                order_id: "order-1".to_string(),
                amount: 10_000,
                items: vec![line(ItemType::Course, course.id, 10_000)],
            })
            .await
            .unwrap();
        let second = storage
            .create_payment_impl(NewPayment {
                user_id: student.id,
                order_id: "order-2".to_string(),
                amount: 10_000,
                items: vec![line(ItemType::Course, course.id, 10_000)],
            })
            .await
            .unwrap();

        storage.confirm_payment_impl(&first.order_id, None).await.unwrap();
        let err = storage
            .confirm_payment_impl(&second.order_id, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");

        // 事务回滚后第二笔订单仍为 pending
        let second = storage.get_payment_by_id_impl(second.id).await.unwrap().unwrap();
        assert_eq!(second.status, PaymentStatus::Pending);
    }

    #[actix_web::test]
    async fn test_refund_cancels_enrollments() {
        let storage = SeaOrmStorage::in_memory().await;
        let business = seed_user(&storage, "academy", UserRole::Business).await;
        let student = seed_user(&storage, "student", UserRole::User).await;
        let course = seed_course(&storage, business.id, "Grammar", 10_000).await;

        let payment = storage
            .create_payment_impl(NewPayment {
                user_id: student.id,
                order_id: "order-refund".to_string(),
                amount: 10_000,
                items: vec![line(ItemType::Course, course.id, 10_000)],
            })
            .await
            .unwrap();

        let cancel_paid = storage
            .transition_payment_impl(payment.id, PaymentStatus::Refunded)
            .await
            .unwrap_err();
        assert_eq!(cancel_paid.code(), "E008");

        let (_, enrollments) = storage
            .confirm_payment_impl(&payment.order_id, None)
            .await
            .unwrap();

        let refunded = storage
            .transition_payment_impl(payment.id, PaymentStatus::Refunded)
            .await
            .unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);

        let enrollment = storage
            .get_enrollment_by_id_impl(enrollments[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Cancelled);
    }
}
