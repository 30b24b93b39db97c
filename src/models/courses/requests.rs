use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 课程查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub category: Option<String>,
    pub business_id: Option<i64>,
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub instructor_id: Option<i64>,
    pub source_material_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub price: Option<i64>,
    pub discount_price: Option<i64>,
    /// 为 true 时清除折扣价
    #[serde(default)]
    pub clear_discount: bool,
    pub thumbnail_url: Option<String>,
    pub instructor_id: Option<i64>,
    pub is_active: Option<bool>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub business_id: Option<i64>,
    pub instructor_id: Option<i64>,
    pub include_inactive: bool,
}
