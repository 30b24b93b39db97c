use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    materials::requests::{CreateMaterialRequest, MaterialListParams, MaterialListQuery},
};
use crate::services::business::{TITLE_MAX_LENGTH, owned_material, scoped_business_id};
use crate::services::{bad_request, error_response, not_found, unauthorized};
use crate::utils::validate::validate_title;

pub async fn list_materials(
    service: &MaterialService,
    query: MaterialListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let list_query = MaterialListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        owner_id: scoped_business_id(&user, None),
        search: query.search,
    };

    match storage.list_materials_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Materials retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_material(
    service: &MaterialService,
    mut body: CreateMaterialRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    if let Err(msg) = validate_title(&body.title, "Title", TITLE_MAX_LENGTH) {
        return Ok(bad_request(ErrorCode::InvalidParameter, msg));
    }
    if body.content_text.trim().is_empty() {
        return Ok(bad_request(
            ErrorCode::MaterialEmpty,
            "Extracted text must not be empty",
        ));
    }
    body.title = body.title.trim().to_string();

    match storage.create_material(user.id, body).await {
        Ok(material) => {
            tracing::info!(
                "Material {} created by user {} ({} chars)",
                material.id,
                user.id,
                material.content_text.chars().count()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(material, "Material created")))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_material(
    service: &MaterialService,
    material_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    match owned_material(&storage, &user, material_id).await {
        Ok(material) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            material,
            "Material retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}

pub async fn delete_material(
    service: &MaterialService,
    material_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    if let Err(response) = owned_material(&storage, &user, material_id).await {
        return Ok(response);
    }

    match storage.delete_material(material_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Material deleted"))),
        Ok(false) => Ok(not_found(
            ErrorCode::MaterialNotFound,
            "Source material not found",
        )),
        Err(e) => Ok(error_response(&e, ErrorCode::InternalServerError)),
    }
}
