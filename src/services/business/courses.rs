use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{BusinessService, TITLE_MAX_LENGTH, check_instructor, owned_material, scoped_business_id};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::{CourseListParams, CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
    validate_price,
};
use crate::services::{
    bad_request, can_manage, error_response, forbidden, not_found, unauthorized,
};
use crate::utils::validate::validate_title;

pub async fn list_courses(
    service: &BusinessService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        category: query.category,
        business_id: scoped_business_id(&user, query.business_id),
        instructor_id: query.instructor_id,
        include_inactive: true,
    };

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Courses retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_course(
    service: &BusinessService,
    body: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_title(&body.title, "Title", TITLE_MAX_LENGTH) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if let Err(msg) = validate_price(body.price, body.discount_price) {
        return Ok(bad_request(ErrorCode::InvalidPrice, msg));
    }
    if let Some(instructor_id) = body.instructor_id
        && let Err(response) = check_instructor(&storage, user.id, instructor_id).await
    {
        return Ok(response);
    }
    if let Some(material_id) = body.source_material_id
        && let Err(response) = owned_material(&storage, &user, material_id).await
    {
        return Ok(response);
    }

    match storage.create_course(user.id, body).await {
        Ok(course) => {
            tracing::info!("Course {} created by business {}", course.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 部分更新；价格按合并后的结果校验
pub async fn update_course(
    service: &BusinessService,
    id: i64,
    body: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let course = match storage.get_course_by_id(id).await {
        Ok(Some(course)) => course,
        Ok(None) => return Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => return Ok(error_response(&e, ErrorCode::InternalServerError)),
    };
    if !can_manage(&user, course.business_id) {
        return Ok(forbidden("You do not own this course"));
    }

    if let Some(ref title) = body.title
        && let Err(msg) = validate_title(title, "Title", TITLE_MAX_LENGTH)
    {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }

    let price = body.price.unwrap_or(course.price);
    let discount_price = if body.clear_discount {
        None
    } else {
        body.discount_price.or(course.discount_price)
    };
    if let Err(msg) = validate_price(price, discount_price) {
        return Ok(bad_request(ErrorCode::InvalidPrice, msg));
    }

    if let Some(instructor_id) = body.instructor_id
        && let Err(response) = check_instructor(&storage, course.business_id, instructor_id).await
    {
        return Ok(response);
    }

    match storage.update_course(id, body).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::instructors::requests::CreateInstructorRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::test_support::{body_json, memory_storage, request_as, seed};
    use actix_web::http::StatusCode;

    fn course_body(price: i64, discount_price: Option<i64>) -> CreateCourseRequest {
        CreateCourseRequest {
            title: "TOEIC 900".to_string(),
            description: None,
            category: Some("toeic".to_string()),
            level: Some("advanced".to_string()),
            price,
            discount_price,
            thumbnail_url: None,
            instructor_id: None,
            source_material_id: None,
        }
    }

    #[actix_web::test]
    async fn test_course_ownership_and_price_rules() {
        let storage = memory_storage().await;
        let owner = seed(&storage, "academy", UserRole::Business).await;
        let rival = seed(&storage, "rival", UserRole::Business).await;
        let admin = seed(&storage, "operator", UserRole::Admin).await;
        let service = BusinessService::with_storage(storage.clone());

        let resp = service
            .create_course(course_body(50_000, Some(60_000)), &request_as(&owner))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], ErrorCode::InvalidPrice as i32);

        let resp = service
            .create_course(course_body(50_000, Some(39_000)), &request_as(&owner))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let course_id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        // 合并后折扣价高于新原价
        let resp = service
            .update_course(
                course_id,
                UpdateCourseRequest {
                    price: Some(30_000),
                    ..Default::default()
                },
                &request_as(&owner),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .update_course(
                course_id,
                UpdateCourseRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
                &request_as(&rival),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = service
            .update_course(
                course_id,
                UpdateCourseRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
                &request_as(&admin),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // 停用的课程仍出现在商家自己的列表中
        let resp = service
            .list_courses(
                CourseListParams {
                    pagination: Default::default(),
                    search: None,
                    category: None,
                    business_id: Some(rival.id),
                    instructor_id: None,
                },
                &request_as(&owner),
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["pagination"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["is_active"], false);
    }

    #[actix_web::test]
    async fn test_course_rejects_foreign_instructor() {
        let storage = memory_storage().await;
        let owner = seed(&storage, "academy", UserRole::Business).await;
        let rival = seed(&storage, "rival", UserRole::Business).await;
        let instructor = storage
            .create_instructor(
                rival.id,
                CreateInstructorRequest {
                    name: "Park".to_string(),
                    bio: None,
                    profile_image_url: None,
                },
            )
            .await
            .unwrap();
        let service = BusinessService::with_storage(storage.clone());

        let mut body = course_body(10_000, None);
        body.instructor_id = Some(instructor.id);
        let resp = service.create_course(body, &request_as(&owner)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
