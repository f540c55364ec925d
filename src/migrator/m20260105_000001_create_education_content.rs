use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EducationContent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EducationContent::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EducationContent::Title).string().not_null())
                    .col(ColumnDef::new(EducationContent::Description).text())
                    .col(ColumnDef::new(EducationContent::Type).string().not_null())
                    .col(ColumnDef::new(EducationContent::Link).string().not_null())
                    .col(ColumnDef::new(EducationContent::ThumbnailUrl).string())
                    .col(
                        ColumnDef::new(EducationContent::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EducationContent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EducationContent {
    Table,
    Id,
    Title,
    Description,
    Type,
    Link,
    ThumbnailUrl,
    CreatedAt,
}
