use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::Organization).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建讲师表
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Instructors::BusinessId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Instructors::Name).string().not_null())
                    .col(ColumnDef::new(Instructors::Bio).text().null())
                    .col(ColumnDef::new(Instructors::ProfileImageUrl).string().null())
                    .col(
                        ColumnDef::new(Instructors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Instructors::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Instructors::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Instructors::Table, Instructors::BusinessId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建资料表（上传文档及其分析结果）
        manager
            .create_table(
                Table::create()
                    .table(SourceMaterials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SourceMaterials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SourceMaterials::OwnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SourceMaterials::Title).string().not_null())
                    .col(ColumnDef::new(SourceMaterials::FileName).string().null())
                    .col(ColumnDef::new(SourceMaterials::FileUrl).string().null())
                    .col(
                        ColumnDef::new(SourceMaterials::ContentText)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SourceMaterials::AnalysisStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SourceMaterials::AnalysisJson).text().null())
                    .col(
                        ColumnDef::new(SourceMaterials::AnalyzedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SourceMaterials::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SourceMaterials::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SourceMaterials::Table, SourceMaterials::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::BusinessId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::InstructorId).big_integer().null())
                    .col(
                        ColumnDef::new(Courses::SourceMaterialId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::Category).string().null())
                    .col(ColumnDef::new(Courses::Level).string().null())
                    .col(ColumnDef::new(Courses::Price).big_integer().not_null())
                    .col(ColumnDef::new(Courses::DiscountPrice).big_integer().null())
                    .col(ColumnDef::new(Courses::ThumbnailUrl).string().null())
                    .col(
                        ColumnDef::new(Courses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::BusinessId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::InstructorId)
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::SourceMaterialId)
                            .to(SourceMaterials::Table, SourceMaterials::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建练习册表
        manager
            .create_table(
                Table::create()
                    .table(Workbooks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workbooks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Workbooks::BusinessId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Workbooks::SourceMaterialId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Workbooks::Title).string().not_null())
                    .col(ColumnDef::new(Workbooks::Description).text().null())
                    .col(ColumnDef::new(Workbooks::PageCount).integer().null())
                    .col(ColumnDef::new(Workbooks::Price).big_integer().not_null())
                    .col(ColumnDef::new(Workbooks::DiscountPrice).big_integer().null())
                    .col(ColumnDef::new(Workbooks::ThumbnailUrl).string().null())
                    .col(
                        ColumnDef::new(Workbooks::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Workbooks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Workbooks::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Workbooks::Table, Workbooks::BusinessId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Workbooks::Table, Workbooks::SourceMaterialId)
                            .to(SourceMaterials::Table, SourceMaterials::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建研讨会表（线下活动 / 本文分析）
        manager
            .create_table(
                Table::create()
                    .table(Seminars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Seminars::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Seminars::BusinessId).big_integer().not_null())
                    .col(ColumnDef::new(Seminars::Kind).string().not_null())
                    .col(ColumnDef::new(Seminars::Title).string().not_null())
                    .col(ColumnDef::new(Seminars::Description).text().null())
                    .col(ColumnDef::new(Seminars::Location).string().null())
                    .col(ColumnDef::new(Seminars::StartsAt).big_integer().null())
                    .col(ColumnDef::new(Seminars::Capacity).integer().null())
                    .col(ColumnDef::new(Seminars::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Seminars::SourceMaterialId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Seminars::AnalysisJson).text().null())
                    .col(
                        ColumnDef::new(Seminars::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Seminars::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Seminars::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Seminars::Table, Seminars::BusinessId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Seminars::Table, Seminars::SourceMaterialId)
                            .to(SourceMaterials::Table, SourceMaterials::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建研讨会报名表
        manager
            .create_table(
                Table::create()
                    .table(SeminarApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeminarApplications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeminarApplications::SeminarId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeminarApplications::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeminarApplications::Status)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SeminarApplications::Message).text().null())
                    .col(
                        ColumnDef::new(SeminarApplications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SeminarApplications::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SeminarApplications::Table, SeminarApplications::SeminarId)
                            .to(Seminars::Table, Seminars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SeminarApplications::Table, SeminarApplications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建公告表
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notices::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(Notices::Title).string().not_null())
                    .col(ColumnDef::new(Notices::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notices::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notices::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Notices::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Notices::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notices::Table, Notices::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评价表
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::ItemType).string().not_null())
                    .col(ColumnDef::new(Reviews::ItemId).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::Rating).integer().not_null())
                    .col(ColumnDef::new(Reviews::Content).text().null())
                    .col(
                        ColumnDef::new(Reviews::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Reviews::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Reviews::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instructors_business_id")
                    .table(Instructors::Table)
                    .col(Instructors::BusinessId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_source_materials_owner_id")
                    .table(SourceMaterials::Table)
                    .col(SourceMaterials::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_business_id")
                    .table(Courses::Table)
                    .col(Courses::BusinessId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_workbooks_business_id")
                    .table(Workbooks::Table)
                    .col(Workbooks::BusinessId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_seminars_business_id")
                    .table(Seminars::Table)
                    .col(Seminars::BusinessId)
                    .to_owned(),
            )
            .await?;

        // 同一用户只能报名同一研讨会一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_seminar_applications_seminar_user")
                    .table(SeminarApplications::Table)
                    .col(SeminarApplications::SeminarId)
                    .col(SeminarApplications::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 同一用户对同一商品只能评价一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reviews_user_item")
                    .table(Reviews::Table)
                    .col(Reviews::UserId)
                    .col(Reviews::ItemType)
                    .col(Reviews::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reviews_item")
                    .table(Reviews::Table)
                    .col(Reviews::ItemType)
                    .col(Reviews::ItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SeminarApplications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Seminars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workbooks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SourceMaterials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Instructors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    Phone,
    Organization,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Instructors {
    #[sea_orm(iden = "instructors")]
    Table,
    Id,
    BusinessId,
    Name,
    Bio,
    ProfileImageUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SourceMaterials {
    #[sea_orm(iden = "source_materials")]
    Table,
    Id,
    OwnerId,
    Title,
    FileName,
    FileUrl,
    ContentText,
    AnalysisStatus,
    AnalysisJson,
    AnalyzedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    BusinessId,
    InstructorId,
    SourceMaterialId,
    Title,
    Description,
    Category,
    Level,
    Price,
    DiscountPrice,
    ThumbnailUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Workbooks {
    #[sea_orm(iden = "workbooks")]
    Table,
    Id,
    BusinessId,
    SourceMaterialId,
    Title,
    Description,
    PageCount,
    Price,
    DiscountPrice,
    ThumbnailUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Seminars {
    #[sea_orm(iden = "seminars")]
    Table,
    Id,
    BusinessId,
    Kind,
    Title,
    Description,
    Location,
    StartsAt,
    Capacity,
    Price,
    SourceMaterialId,
    AnalysisJson,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SeminarApplications {
    #[sea_orm(iden = "seminar_applications")]
    Table,
    Id,
    SeminarId,
    UserId,
    Status,
    Message,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notices {
    #[sea_orm(iden = "notices")]
    Table,
    Id,
    AuthorId,
    Title,
    Content,
    IsPinned,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    #[sea_orm(iden = "reviews")]
    Table,
    Id,
    UserId,
    ItemType,
    ItemId,
    Rating,
    Content,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
