use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CartService, resolve_product};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, ProductRef, sum_prices,
    cart::responses::{CartLine, CartResponse},
};
use crate::services::{bad_request, error_response, unauthorized};

/// 总价只计算仍在售的商品
pub async fn list_cart(service: &CartService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let items = match storage.list_cart_items(user_id).await {
        Ok(items) => items,
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = ProductRef {
            item_type: item.item_type,
            item_id: item.item_id,
        };
        let line = match resolve_product(&storage, product).await {
            Ok(Some(resolved)) => CartLine {
                id: item.id,
                item_type: item.item_type,
                item_id: item.item_id,
                title: resolved.title,
                price: resolved.price,
                effective_price: resolved.effective_price,
                thumbnail_url: resolved.thumbnail_url,
                available: resolved.is_active,
            },
            // 商品已被删除
            Ok(None) => CartLine {
                id: item.id,
                item_type: item.item_type,
                item_id: item.item_id,
                title: String::new(),
                price: 0,
                effective_price: 0,
                thumbnail_url: None,
                available: false,
            },
            Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
        };
        lines.push(line);
    }

    let Some(total_amount) = sum_prices(
        lines
            .iter()
            .filter(|line| line.available)
            .map(|line| line.effective_price),
    ) else {
        return Ok(bad_request(
            ErrorCode::InvalidPrice,
            "Cart total exceeds the allowed amount",
        ));
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CartResponse {
            items: lines,
            total_amount,
        },
        "Cart retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;
    use crate::models::cart::requests::AddCartItemRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::workbooks::requests::{CreateWorkbookRequest, UpdateWorkbookRequest};
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    fn workbook(title: &str, price: i64, discount: Option<i64>) -> CreateWorkbookRequest {
        CreateWorkbookRequest {
            title: title.to_string(),
            description: None,
            price,
            discount_price: discount,
            thumbnail_url: None,
            page_count: Some(80),
            source_material_id: None,
        }
    }

    #[actix_web::test]
    async fn test_cart_totals_use_effective_price() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        let grammar = storage
            .create_workbook(business.id, workbook("Grammar drills", 20_000, Some(15_000)))
            .await
            .unwrap();
        let reading = storage
            .create_workbook(business.id, workbook("Reading drills", 12_000, None))
            .await
            .unwrap();

        let service = CartService::with_storage(storage.clone());
        let req = request_as(&student);

        for id in [grammar.id, reading.id] {
            let resp = service
                .add_item(
                    AddCartItemRequest {
                        item_type: ItemType::Workbook,
                        item_id: id,
                    },
                    &req,
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let dup = service
            .add_item(
                AddCartItemRequest {
                    item_type: ItemType::Workbook,
                    item_id: grammar.id,
                },
                &req,
            )
            .await
            .unwrap();
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let body = body_json(service.list_cart(&req).await.unwrap()).await;
        assert_eq!(body["data"]["total_amount"], 27_000);

        // 下架后仍显示在购物车中，但不计入总价
        storage
            .update_workbook(
                reading.id,
                UpdateWorkbookRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let body = body_json(service.list_cart(&req).await.unwrap()).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["total_amount"], 15_000);
    }

    #[actix_web::test]
    async fn test_inactive_item_cannot_be_added() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        let retired = storage
            .create_workbook(business.id, workbook("Old edition", 9_000, None))
            .await
            .unwrap();
        storage
            .update_workbook(
                retired.id,
                UpdateWorkbookRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let service = CartService::with_storage(storage);
        let resp = service
            .add_item(
                AddCartItemRequest {
                    item_type: ItemType::Workbook,
                    item_id: retired.id,
                },
                &request_as(&student),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], ErrorCode::ItemInactive as i32);
    }

    #[actix_web::test]
    async fn test_cart_total_overflow_is_rejected() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let student = seed(&storage, "student", UserRole::User).await;
        let premium = storage
            .create_workbook(business.id, workbook("Premium", i64::MAX, None))
            .await
            .unwrap();
        let sample = storage
            .create_workbook(business.id, workbook("Sample", 1, None))
            .await
            .unwrap();
        for id in [premium.id, sample.id] {
            storage
                .add_cart_item(
                    student.id,
                    ProductRef {
                        item_type: ItemType::Workbook,
                        item_id: id,
                    },
                )
                .await
                .unwrap();
        }

        let service = CartService::with_storage(storage);
        let resp = service.list_cart(&request_as(&student)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], ErrorCode::InvalidPrice as i32);
    }
}
