use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Datasets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Datasets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Datasets::Name).string().not_null())
                    .col(ColumnDef::new(Datasets::Description).text().null())
                    .col(ColumnDef::new(Datasets::FileName).string().null())
                    .col(ColumnDef::new(Datasets::FilePath).string().null())
                    .col(ColumnDef::new(Datasets::FileSize).big_integer().null())
                    .col(
                        ColumnDef::new(Datasets::ItemCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Datasets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Datasets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Datasets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Datasets {
    Table,
    Id,
    Name,
    Description,
    FileName,
    FilePath,
    FileSize,
    ItemCount,
    CreatedAt,
    UpdatedAt,
}
