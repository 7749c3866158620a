use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Models::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Models::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Models::Name).string().not_null())
                    .col(ColumnDef::new(Models::Provider).string_len(50).not_null())
                    .col(ColumnDef::new(Models::BaseUrl).string().null())
                    // 明文保存
                    .col(ColumnDef::new(Models::ApiKey).string().null())
                    .col(ColumnDef::new(Models::ModelId).string().not_null())
                    .col(ColumnDef::new(Models::Config).json().null())
                    .col(
                        ColumnDef::new(Models::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Models::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_models_provider")
                    .table(Models::Table)
                    .col(Models::Provider)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Models::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Models {
    Table,
    Id,
    Name,
    Provider,
    BaseUrl,
    ApiKey,
    ModelId,
    Config,
    CreatedAt,
    UpdatedAt,
}
