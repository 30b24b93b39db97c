//! 预导入模块，方便使用

pub use super::cart_items::{
    ActiveModel as CartItemActiveModel, Entity as CartItems, Model as CartItemModel,
};
pub use super::chat_channels::{
    ActiveModel as ChatChannelActiveModel, Entity as ChatChannels, Model as ChatChannelModel,
};
pub use super::chat_messages::{
    ActiveModel as ChatMessageActiveModel, Entity as ChatMessages, Model as ChatMessageModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::instructors::{
    ActiveModel as InstructorActiveModel, Entity as Instructors, Model as InstructorModel,
};
pub use super::notices::{ActiveModel as NoticeActiveModel, Entity as Notices, Model as NoticeModel};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::reviews::{ActiveModel as ReviewActiveModel, Entity as Reviews, Model as ReviewModel};
pub use super::seminar_applications::{
    ActiveModel as SeminarApplicationActiveModel, Entity as SeminarApplications,
    Model as SeminarApplicationModel,
};
pub use super::seminars::{
    ActiveModel as SeminarActiveModel, Entity as Seminars, Model as SeminarModel,
};
pub use super::source_materials::{
    ActiveModel as SourceMaterialActiveModel, Entity as SourceMaterials,
    Model as SourceMaterialModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::workbooks::{
    ActiveModel as WorkbookActiveModel, Entity as Workbooks, Model as WorkbookModel,
};
