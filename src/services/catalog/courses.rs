use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::{CourseListParams, CourseListQuery},
};
use crate::services::{error_response, not_found};

pub async fn list_courses(
    service: &CatalogService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        category: query.category,
        business_id: query.business_id,
        instructor_id: query.instructor_id,
        include_inactive: false,
    };

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Courses retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_course(
    service: &CatalogService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_course_by_id(id).await {
        Ok(Some(course)) if course.is_active => Ok(HttpResponse::Ok().json(
            ApiResponse::success(course, "Course retrieved successfully"),
        )),
        Ok(_) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::{CreateCourseRequest, UpdateCourseRequest};
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{anonymous_request, body_json, memory_storage, seed};
    use actix_web::http::StatusCode;

    fn course(title: &str) -> CreateCourseRequest {
        CreateCourseRequest {
            title: title.to_string(),
            description: None,
            category: Some("toeic".to_string()),
            level: Some("beginner".to_string()),
            price: 30_000,
            discount_price: Some(25_000),
            thumbnail_url: None,
            instructor_id: None,
            source_material_id: None,
        }
    }

    #[actix_web::test]
    async fn test_inactive_courses_are_hidden() {
        let storage = memory_storage().await;
        let business = seed(&storage, "academy", UserRole::Business).await;
        let visible = storage
            .create_course(business.id, course("TOEIC 700"))
            .await
            .unwrap();
        let hidden = storage
            .create_course(business.id, course("Retired course"))
            .await
            .unwrap();
        storage
            .update_course(
                hidden.id,
                UpdateCourseRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let service = CatalogService::with_storage(storage);
        let req = anonymous_request();

        let resp = service
            .list_courses(
                CourseListParams {
                    pagination: Default::default(),
                    search: None,
                    category: Some("toeic".to_string()),
                    business_id: None,
                    instructor_id: None,
                },
                &req,
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["pagination"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["id"], visible.id);

        let resp = service.get_course(hidden.id, &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["code"], ErrorCode::CourseNotFound as i32);

        let resp = service.get_course(visible.id, &req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
