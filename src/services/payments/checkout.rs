use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::PaymentService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, ProductRef, sum_prices,
    payments::{
        entities::PaymentLine,
        requests::{CheckoutRequest, NewPayment},
    },
};
use crate::services::cart::resolve_product;
use crate::services::{bad_request, error_response, not_found, unauthorized};

/// 结算：未指定商品时结算整个购物车，价格在下单时锁定
pub async fn checkout(
    service: &PaymentService,
    checkout: CheckoutRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    // 1. 确定结算的商品
    let requested: Vec<ProductRef> = match checkout.items {
        Some(items) => items,
        None => match storage.list_cart_items(user_id).await {
            Ok(cart) => cart
                .into_iter()
                .map(|item| ProductRef {
                    item_type: item.item_type,
                    item_id: item.item_id,
                })
                .collect(),
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        },
    };

    let mut seen = HashSet::new();
    let products: Vec<ProductRef> = requested
        .into_iter()
        .filter(|item| seen.insert(*item))
        .collect();

    if products.is_empty() {
        return Ok(bad_request(ErrorCode::CartEmpty, "Nothing to check out"));
    }

    // 2. 逐项校验并锁定价格
    let mut lines = Vec::with_capacity(products.len());
    for product in products {
        let resolved = match resolve_product(&storage, product).await {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::NotFound,
                    &format!("{} {} not found", product.item_type, product.item_id),
                ));
            }
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        };

        if !resolved.is_active {
            return Ok(bad_request(
                ErrorCode::ItemInactive,
                format!("{} is not available", resolved.title),
            ));
        }

        match storage.find_enrollment(user_id, product).await {
            Ok(Some(enrollment)) if enrollment.status.allows_review() => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::AlreadyEnrolled,
                    format!("Already enrolled in {}", resolved.title),
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        }

        lines.push(PaymentLine {
            item_type: product.item_type,
            item_id: product.item_id,
            title: resolved.title,
            amount: resolved.effective_price,
        });
    }

    // 3. 创建订单
    let Some(amount) = sum_prices(lines.iter().map(|line| line.amount)) else {
        return Ok(bad_request(
            ErrorCode::InvalidPrice,
            "Order total exceeds the allowed amount",
        ));
    };
    let payment = NewPayment {
        user_id,
        order_id: uuid::Uuid::new_v4().to_string(),
        amount,
        items: lines,
    };

    match storage.create_payment(payment).await {
        Ok(payment) => {
            tracing::info!(
                "Payment {} created for user {} ({} won)",
                payment.order_id,
                user_id,
                payment.amount
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(payment, "Order created")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::models::payments::requests::{
        ConfirmPaymentRequest, PaymentListQuery, UpdatePaymentStatusRequest,
    };
    use crate::models::payments::entities::PaymentStatus;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    fn course(title: &str, price: i64, discount: Option<i64>) -> CreateCourseRequest {
        CreateCourseRequest {
            title: title.to_string(),
            description: None,
            category: None,
            level: None,
            price,
            discount_price: discount,
            thumbnail_url: None,
            instructor_id: None,
            source_material_id: None,
        }
    }

    #[actix_web::test]
    async fn test_cart_checkout_confirm_and_refund() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        let admin = seed(&storage, "operator", UserRole::Admin).await;
        let speaking = storage
            .create_course(business.id, course("Speaking", 50_000, Some(40_000)))
            .await
            .unwrap();
        let writing = storage
            .create_course(business.id, course("Writing", 30_000, None))
            .await
            .unwrap();
        for id in [speaking.id, writing.id] {
            storage
                .add_cart_item(
                    student.id,
                    ProductRef {
                        item_type: ItemType::Course,
                        item_id: id,
                    },
                )
                .await
                .unwrap();
        }

        let service = PaymentService::with_storage(storage.clone());
        let req = request_as(&student);

        let resp = service
            .checkout(CheckoutRequest { items: None }, &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["amount"], 70_000);
        assert_eq!(body["data"]["status"], "pending");
        let order_id = body["data"]["order_id"].as_str().unwrap().to_string();

        // 别人的订单不可见
        let stranger = seed(&storage, "stranger", UserRole::User).await;
        let resp = service
            .confirm_payment(
                &order_id,
                ConfirmPaymentRequest::default(),
                &request_as(&stranger),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = service
            .confirm_payment(
                &order_id,
                ConfirmPaymentRequest {
                    method: Some("card".to_string()),
                },
                &req,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["enrollments"].as_array().unwrap().len(), 2);
        assert!(storage.list_cart_items(student.id).await.unwrap().is_empty());

        // 重复确认冲突
        let again = service
            .confirm_payment(&order_id, ConfirmPaymentRequest::default(), &req)
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::CONFLICT);

        // 已购买的商品不能再次结算
        let resp = service
            .checkout(
                CheckoutRequest {
                    items: Some(vec![ProductRef {
                        item_type: ItemType::Course,
                        item_id: writing.id,
                    }]),
                },
                &req,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["code"], ErrorCode::AlreadyEnrolled as i32);

        // 管理员只能退款或标记失败
        let payment = storage
            .get_payment_by_order_id(&order_id)
            .await
            .unwrap()
            .unwrap();
        let admin_req = request_as(&admin);
        let resp = service
            .update_payment_status(
                payment.id,
                UpdatePaymentStatusRequest {
                    status: PaymentStatus::Cancelled,
                },
                &admin_req,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .update_payment_status(
                payment.id,
                UpdatePaymentStatusRequest {
                    status: PaymentStatus::Refunded,
                },
                &admin_req,
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let enrollment = storage
            .find_enrollment(
                student.id,
                ProductRef {
                    item_type: ItemType::Course,
                    item_id: speaking.id,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Cancelled);
    }

    #[actix_web::test]
    async fn test_empty_checkout_and_cancel() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        let service = PaymentService::with_storage(storage.clone());
        let req = request_as(&student);

        let resp = service
            .checkout(CheckoutRequest { items: None }, &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], ErrorCode::CartEmpty as i32);

        let listening = storage
            .create_course(business.id, course("Listening", 20_000, None))
            .await
            .unwrap();
        let resp = service
            .checkout(
                CheckoutRequest {
                    items: Some(vec![
                        ProductRef {
                            item_type: ItemType::Course,
                            item_id: listening.id,
                        };
                        2
                    ]),
                },
                &req,
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        // 重复的商品只计一次
        assert_eq!(body["data"]["amount"], 20_000);
        let order_id = body["data"]["order_id"].as_str().unwrap().to_string();

        let resp = service.cancel_payment(&order_id, &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"]["status"], "cancelled");

        let resp = service.cancel_payment(&order_id, &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_checkout_total_overflow_is_rejected() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        // 绕过服务层校验直接写入极端价格
        let premium = storage
            .create_course(business.id, course("Premium", i64::MAX, None))
            .await
            .unwrap();
        let sample = storage
            .create_course(business.id, course("Sample", 1, None))
            .await
            .unwrap();

        let service = PaymentService::with_storage(storage.clone());
        let resp = service
            .checkout(
                CheckoutRequest {
                    items: Some(vec![
                        ProductRef {
                            item_type: ItemType::Course,
                            item_id: premium.id,
                        },
                        ProductRef {
                            item_type: ItemType::Course,
                            item_id: sample.id,
                        },
                    ]),
                },
                &request_as(&student),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], ErrorCode::InvalidPrice as i32);
        let payments = storage
            .list_payments_with_pagination(PaymentListQuery::default())
            .await
            .unwrap();
        assert!(payments.items.is_empty());
    }
}
