//! 公开目录：只返回上架中的内容，无需登录

pub mod courses;
pub mod instructors;
pub mod notices;
pub mod reviews;
pub mod seminars;
pub mod workbooks;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    courses::requests::CourseListParams, instructors::requests::InstructorListParams,
    notices::requests::NoticeListParams, reviews::requests::ReviewListParams,
    seminars::requests::SeminarListParams, workbooks::requests::WorkbookListParams,
};
use crate::storage::Storage;

pub struct CatalogService {
    storage: Option<Arc<dyn Storage>>,
}

impl CatalogService {
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

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_courses(self, query, request).await
    }

    pub async fn get_course(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        courses::get_course(self, id, request).await
    }

    pub async fn list_workbooks(
        &self,
        query: WorkbookListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        workbooks::list_workbooks(self, query, request).await
    }

    pub async fn get_workbook(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        workbooks::get_workbook(self, id, request).await
    }

    pub async fn list_seminars(
        &self,
        query: SeminarListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        seminars::list_seminars(self, query, request).await
    }

    pub async fn get_seminar(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        seminars::get_seminar(self, id, request).await
    }

    pub async fn list_instructors(
        &self,
        query: InstructorListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        instructors::list_instructors(self, query, request).await
    }

    pub async fn get_instructor(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        instructors::get_instructor(self, id, request).await
    }

    pub async fn list_notices(
        &self,
        query: NoticeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notices::list_notices(self, query, request).await
    }

    pub async fn get_notice(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        notices::get_notice(self, id, request).await
    }

    pub async fn list_reviews(
        &self,
        query: ReviewListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        reviews::list_reviews(self, query, request).await
    }
}
