use super::entities::ApplicationStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/application.ts")]
pub struct ApplyRequest {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/application.ts")]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/application.ts")]
pub struct ApplicationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub seminar_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<ApplicationStatus>,
}
