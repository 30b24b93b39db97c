use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/instructor.ts")]
pub struct InstructorListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub business_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/instructor.ts")]
pub struct CreateInstructorRequest {
    pub name: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/instructor.ts")]
pub struct UpdateInstructorRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_active: Option<bool>,
}

// 存储层查询
#[derive(Debug, Clone, Default)]
pub struct InstructorListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub business_id: Option<i64>,
    pub search: Option<String>,
    /// 是否包含已停用的讲师
    pub include_inactive: bool,
}
