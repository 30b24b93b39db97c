/// 业务错误码，作为 `ApiResponse.code` 返回给前端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,
    InvalidParameter = 1006,

    // 认证 / 用户 2xxx
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserPhoneInvalid = 2006,
    UserNameAlreadyExists = 2007,
    UserEmailAlreadyExists = 2008,
    UserInactive = 2009,

    // 商品（课程 / 练习册 / 研讨会 / 讲师）3xxx
    CourseNotFound = 3000,
    WorkbookNotFound = 3001,
    SeminarNotFound = 3002,
    InstructorNotFound = 3003,
    ItemInactive = 3004,
    InvalidPrice = 3005,
    ContentPermissionDenied = 3006,
    SeminarFull = 3007,
    ApplicationNotFound = 3008,
    ApplicationAlreadyExists = 3009,
    InvalidStatusTransition = 3010,

    // 交易 4xxx
    CartItemNotFound = 4000,
    CartItemAlreadyExists = 4001,
    CartEmpty = 4002,
    PaymentNotFound = 4003,
    PaymentStateConflict = 4004,
    AlreadyEnrolled = 4005,
    EnrollmentNotFound = 4006,

    // 内容 5xxx
    NoticeNotFound = 5000,
    ReviewNotFound = 5001,
    ReviewAlreadyExists = 5002,
    ReviewNotAllowed = 5003,
    ChannelNotFound = 5004,
    ChannelAlreadyExists = 5005,

    // 资料与分析 6xxx
    MaterialNotFound = 6000,
    MaterialEmpty = 6001,
    AnalysisUnavailable = 6002,
    AnalysisFailed = 6003,
    AnalysisNotReady = 6004,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::PaymentStateConflict as i32, 4004);
        assert_eq!(ErrorCode::AnalysisFailed as i32, 6003);
    }
}
