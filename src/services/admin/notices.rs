use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    notices::requests::{CreateNoticeRequest, NoticeListParams, NoticeListQuery, UpdateNoticeRequest},
};
use crate::services::{bad_request, error_response, not_found, unauthorized};
use crate::utils::validate::validate_title;

const NOTICE_TITLE_MAX_LENGTH: usize = 200;

fn validate_content(content: &str) -> Result<(), HttpResponse> {
    if content.trim().is_empty() {
        return Err(bad_request(
            ErrorCode::InvalidParameter,
            "Content must not be empty",
        ));
    }
    Ok(())
}

/// 包括已删除的公告
pub async fn list_notices(
    service: &AdminService,
    query: NoticeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = NoticeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        include_inactive: true,
    };

    match storage.list_notices_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notices retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_notice(
    service: &AdminService,
    body: CreateNoticeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(author_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_title(&body.title, "Title", NOTICE_TITLE_MAX_LENGTH) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if let Err(response) = validate_content(&body.content) {
        return Ok(response);
    }

    match storage.create_notice(author_id, body).await {
        Ok(notice) => Ok(HttpResponse::Created().json(ApiResponse::success(
            notice,
            "Notice created",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn update_notice(
    service: &AdminService,
    id: i64,
    body: UpdateNoticeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Some(ref title) = body.title
        && let Err(msg) = validate_title(title, "Title", NOTICE_TITLE_MAX_LENGTH)
    {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if let Some(ref content) = body.content
        && let Err(response) = validate_content(content)
    {
        return Ok(response);
    }

    match storage.update_notice(id, body).await {
        Ok(Some(notice)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            notice,
            "Notice updated",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::NoticeNotFound, "Notice not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

// 软删除
pub async fn delete_notice(
    service: &AdminService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let update = UpdateNoticeRequest {
        is_active: Some(false),
        ..Default::default()
    };

    match storage.update_notice(id, update).await {
        Ok(Some(_)) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notice deleted"))),
        Ok(None) => Ok(not_found(ErrorCode::NoticeNotFound, "Notice not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::CatalogService;
    use crate::services::test_support::{anonymous_request, body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_deleted_notice_hidden_from_public() {
        let storage = memory_storage().await;
        let admin = seed(&storage, "operator", UserRole::Admin).await;
        let service = AdminService::with_storage(storage.clone());
        let catalog = CatalogService::with_storage(storage.clone());

        let resp = service
            .create_notice(
                CreateNoticeRequest {
                    title: "Holiday schedule".to_string(),
                    content: "Closed on Chuseok.".to_string(),
                    is_pinned: true,
                },
                &request_as(&admin),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let notice_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let resp = catalog.get_notice(notice_id, &anonymous_request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = service
            .delete_notice(notice_id, &request_as(&admin))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = catalog.get_notice(notice_id, &anonymous_request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = service
            .list_notices(
                NoticeListParams {
                    pagination: Default::default(),
                    search: None,
                },
                &request_as(&admin),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["data"]["pagination"]["total"], 1);
    }
}
