use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 报名状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/application.ts")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    /// 商家审核允许的状态变更
    pub fn can_review_to(&self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Rejected)
                | (Self::Rejected, Self::Approved)
        )
    }

    /// 用户可以取消未结束的报名
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Approved => write!(f, "approved"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
            ApplicationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "cancelled" => Ok(ApplicationStatus::Cancelled),
            _ => Err(format!("Invalid application status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/application.ts")]
pub struct SeminarApplication {
    pub id: i64,
    pub seminar_id: i64,
    pub user_id: i64,
    pub status: ApplicationStatus,
    pub message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_transitions() {
        use ApplicationStatus::*;
        assert!(Pending.can_review_to(Approved));
        assert!(Pending.can_review_to(Rejected));
        assert!(!Cancelled.can_review_to(Approved));
        assert!(!Pending.can_review_to(Cancelled));
        assert!(Approved.can_cancel());
        assert!(!Rejected.can_cancel());
    }
}
