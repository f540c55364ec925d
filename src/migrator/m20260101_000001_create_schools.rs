use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schools::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schools::Name).string().not_null())
                    .col(ColumnDef::new(Schools::LogoUrl).string())
                    .col(ColumnDef::new(Schools::PrimaryColor).string().not_null())
                    .col(ColumnDef::new(Schools::SecondaryColor).string().not_null())
                    .col(ColumnDef::new(Schools::FontStyle).string().not_null())
                    .col(
                        ColumnDef::new(Schools::SubscriptionPlan)
                            .string()
                            .not_null()
                            .default("basic"),
                    )
                    .col(ColumnDef::new(Schools::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Schools {
    Table,
    Id,
    Name,
    LogoUrl,
    PrimaryColor,
    SecondaryColor,
    FontStyle,
    SubscriptionPlan,
    CreatedAt,
}
