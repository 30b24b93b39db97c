use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 讲师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/instructor.ts")]
pub struct Instructor {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
