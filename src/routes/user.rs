use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::applications::requests::{ApplicationListParams, ApplyRequest};
use crate::models::cart::requests::AddCartItemRequest;
use crate::models::enrollments::requests::{EnrollmentListParams, UpdateProgressRequest};
use crate::models::payments::requests::{
    CheckoutRequest, ConfirmPaymentRequest, PaymentListParams,
};
use crate::models::reviews::requests::{CreateReviewRequest, UpdateReviewRequest};
use crate::services::{
    ApplicationService, CartService, EnrollmentService, PaymentService, ReviewService,
};
use crate::utils::{SafeIDI64, SafeOrderId};

static CART_SERVICE: Lazy<CartService> = Lazy::new(CartService::new_lazy);
static PAYMENT_SERVICE: Lazy<PaymentService> = Lazy::new(PaymentService::new_lazy);
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static REVIEW_SERVICE: Lazy<ReviewService> = Lazy::new(ReviewService::new_lazy);
static APPLICATION_SERVICE: Lazy<ApplicationService> = Lazy::new(ApplicationService::new_lazy);

// 购物车
pub async fn list_cart(req: HttpRequest) -> ActixResult<HttpResponse> {
    CART_SERVICE.list_cart(&req).await
}

pub async fn add_cart_item(
    req: HttpRequest,
    item: web::Json<AddCartItemRequest>,
) -> ActixResult<HttpResponse> {
    CART_SERVICE.add_item(item.into_inner(), &req).await
}

pub async fn remove_cart_item(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CART_SERVICE.remove_item(id.0, &req).await
}

pub async fn clear_cart(req: HttpRequest) -> ActixResult<HttpResponse> {
    CART_SERVICE.clear_cart(&req).await
}

// 结算与支付
pub async fn checkout(
    req: HttpRequest,
    body: Option<web::Json<CheckoutRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    PAYMENT_SERVICE.checkout(body, &req).await
}

pub async fn confirm_payment(
    req: HttpRequest,
    order_id: SafeOrderId,
    body: Option<web::Json<ConfirmPaymentRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    PAYMENT_SERVICE.confirm_payment(&order_id.0, body, &req).await
}

pub async fn cancel_payment(req: HttpRequest, order_id: SafeOrderId) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.cancel_payment(&order_id.0, &req).await
}

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    PAYMENT_SERVICE.list_my_payments(query.into_inner(), &req).await
}

// 选课
pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_my_enrollments(query.into_inner(), &req)
        .await
}

pub async fn update_progress(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateProgressRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_progress(id.0, body.into_inner(), &req)
        .await
}

// 评价
pub async fn create_review(
    req: HttpRequest,
    body: web::Json<CreateReviewRequest>,
) -> ActixResult<HttpResponse> {
    REVIEW_SERVICE.create_review(body.into_inner(), &req).await
}

pub async fn update_review(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateReviewRequest>,
) -> ActixResult<HttpResponse> {
    REVIEW_SERVICE.update_review(id.0, body.into_inner(), &req).await
}

pub async fn delete_review(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    REVIEW_SERVICE.delete_review(id.0, &req).await
}

// 研讨会报名
pub async fn apply_seminar(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<ApplyRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    APPLICATION_SERVICE.apply(id.0, body, &req).await
}

pub async fn list_applications(
    req: HttpRequest,
    query: web::Query<ApplicationListParams>,
) -> ActixResult<HttpResponse> {
    APPLICATION_SERVICE
        .list_my_applications(query.into_inner(), &req)
        .await
}

pub async fn cancel_application(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    APPLICATION_SERVICE.cancel_application(id.0, &req).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/user")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/cart")
                    .route(web::get().to(list_cart))
                    .route(web::post().to(add_cart_item))
                    .route(web::delete().to(clear_cart)),
            )
            .route("/cart/{id}", web::delete().to(remove_cart_item))
            .service(
                web::resource("/checkout")
                    .wrap(middlewares::RateLimit::checkout())
                    .route(web::post().to(checkout)),
            )
            .route("/payments", web::get().to(list_payments))
            .route(
                "/payments/{order_id}/confirm",
                web::post().to(confirm_payment),
            )
            .route("/payments/{order_id}/cancel", web::post().to(cancel_payment))
            .route("/enrollments", web::get().to(list_enrollments))
            .route("/enrollments/{id}/progress", web::put().to(update_progress))
            .route("/reviews", web::post().to(create_review))
            .service(
                web::resource("/reviews/{id}")
                    .route(web::put().to(update_review))
                    .route(web::delete().to(delete_review)),
            )
            .route("/seminars/{id}/apply", web::post().to(apply_seminar))
            .route("/applications", web::get().to(list_applications))
            .route(
                "/applications/{id}/cancel",
                web::post().to(cancel_application),
            ),
    );
}
