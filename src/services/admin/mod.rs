//! 管理后台：用户、内容上下架、公告、聊天频道
//!
//! 路由层已经通过 RequireRole 限定为管理员，这里不再重复检查角色。

pub mod channels;
pub mod moderation;
pub mod notices;
pub mod users;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::SetActiveRequest;
use crate::models::chat::requests::CreateChannelRequest;
use crate::models::courses::requests::CourseListParams;
use crate::models::notices::requests::{CreateNoticeRequest, NoticeListParams, UpdateNoticeRequest};
use crate::models::seminars::requests::SeminarListParams;
use crate::models::users::requests::{UpdateUserRequest, UserListParams};
use crate::models::workbooks::requests::WorkbookListParams;
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
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

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    // 用户
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        users::list_users(self, query, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        users::get_user(self, user_id, request).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        body: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        users::update_user(self, user_id, body, request).await
    }

    // 内容上下架
    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        moderation::list_courses(self, query, request).await
    }

    pub async fn set_course_active(
        &self,
        id: i64,
        body: SetActiveRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        moderation::set_course_active(self, id, body, request).await
    }

    pub async fn list_workbooks(
        &self,
        query: WorkbookListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        moderation::list_workbooks(self, query, request).await
    }

    pub async fn set_workbook_active(
        &self,
        id: i64,
        body: SetActiveRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        moderation::set_workbook_active(self, id, body, request).await
    }

    pub async fn list_seminars(
        &self,
        query: SeminarListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        moderation::list_seminars(self, query, request).await
    }

    pub async fn set_seminar_active(
        &self,
        id: i64,
        body: SetActiveRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        moderation::set_seminar_active(self, id, body, request).await
    }

    // 公告
    pub async fn list_notices(
        &self,
        query: NoticeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notices::list_notices(self, query, request).await
    }

    pub async fn create_notice(
        &self,
        body: CreateNoticeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notices::create_notice(self, body, request).await
    }

    pub async fn update_notice(
        &self,
        id: i64,
        body: UpdateNoticeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notices::update_notice(self, id, body, request).await
    }

    pub async fn delete_notice(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        notices::delete_notice(self, id, request).await
    }

    // 聊天频道
    pub async fn create_channel(
        &self,
        body: CreateChannelRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        channels::create_channel(self, body, request).await
    }

    pub async fn deactivate_channel(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        channels::deactivate_channel(self, id, request).await
    }
}
