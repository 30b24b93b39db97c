//! 商家内容管理
//!
//! 所有写操作都要求调用者是行的所有者或管理员，见 [`can_manage`]。
//! 商家的列表接口包含已停用的行。

pub mod courses;
pub mod enrollments;
pub mod instructors;
pub mod seminars;
pub mod workbooks;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::models::enrollments::requests::EnrollmentListParams;
use crate::models::instructors::requests::{
    CreateInstructorRequest, InstructorListParams, UpdateInstructorRequest,
};
use crate::models::materials::entities::SourceMaterial;
use crate::models::seminars::requests::{
    CreateSeminarRequest, SeminarListParams, UpdateSeminarRequest,
};
use crate::models::users::entities::User;
use crate::models::workbooks::requests::{
    CreateWorkbookRequest, UpdateWorkbookRequest, WorkbookListParams,
};
use crate::services::{can_manage, error_response, forbidden, not_found};
use crate::storage::Storage;

pub(crate) const TITLE_MAX_LENGTH: usize = 200;

pub struct BusinessService {
    storage: Option<Arc<dyn Storage>>,
}

/// 管理员可按参数查看任意商家，商家只能看到自己
pub(crate) fn scoped_business_id(user: &User, requested: Option<i64>) -> Option<i64> {
    if user.is_admin() {
        requested
    } else {
        Some(user.id)
    }
}

/// 引用的资料必须存在且归调用者所有
pub(crate) async fn owned_material(
    storage: &Arc<dyn Storage>,
    user: &User,
    material_id: i64,
) -> Result<SourceMaterial, HttpResponse> {
    match storage.get_material_by_id(material_id).await {
        Ok(Some(material)) if can_manage(user, material.owner_id) => Ok(material),
        Ok(Some(_)) => Err(forbidden("You do not own this source material")),
        Ok(None) => Err(not_found(
            ErrorCode::MaterialNotFound,
            "Source material not found",
        )),
        Err(e) => Err(error_response(&e, ErrorCode::InternalServerError)),
    }
}

/// 课程引用的讲师必须属于同一商家
pub(crate) async fn check_instructor(
    storage: &Arc<dyn Storage>,
    business_id: i64,
    instructor_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_instructor_by_id(instructor_id).await {
        Ok(Some(instructor)) if instructor.business_id == business_id => Ok(()),
        Ok(Some(_)) => Err(forbidden("Instructor belongs to another business")),
        Ok(None) => Err(not_found(
            ErrorCode::InstructorNotFound,
            "Instructor not found",
        )),
        Err(e) => Err(error_response(&e, ErrorCode::InternalServerError)),
    }
}

impl BusinessService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    #[cfg(test)]
    pub(crate) fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    // 讲师
    pub async fn list_instructors(
        &self,
        query: InstructorListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        instructors::list_instructors(self, query, request).await
    }

    pub async fn create_instructor(
        &self,
        body: CreateInstructorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        instructors::create_instructor(self, body, request).await
    }

    pub async fn update_instructor(
        &self,
        id: i64,
        body: UpdateInstructorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        instructors::update_instructor(self, id, body, request).await
    }

    // 课程
    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_courses(self, query, request).await
    }

    pub async fn create_course(
        &self,
        body: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::create_course(self, body, request).await
    }

    pub async fn update_course(
        &self,
        id: i64,
        body: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::update_course(self, id, body, request).await
    }

    // 练习册
    pub async fn list_workbooks(
        &self,
        query: WorkbookListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        workbooks::list_workbooks(self, query, request).await
    }

    pub async fn create_workbook(
        &self,
        body: CreateWorkbookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        workbooks::create_workbook(self, body, request).await
    }

    pub async fn update_workbook(
        &self,
        id: i64,
        body: UpdateWorkbookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        workbooks::update_workbook(self, id, body, request).await
    }

    // 研讨会
    pub async fn list_seminars(
        &self,
        query: SeminarListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        seminars::list_seminars(self, query, request).await
    }

    pub async fn create_seminar(
        &self,
        body: CreateSeminarRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        seminars::create_seminar(self, body, request).await
    }

    pub async fn update_seminar(
        &self,
        id: i64,
        body: UpdateSeminarRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        seminars::update_seminar(self, id, body, request).await
    }

    // 选课记录（只读）
    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::list_business_enrollments(self, query, request).await
    }
}
