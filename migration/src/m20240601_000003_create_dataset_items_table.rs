use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DatasetItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DatasetItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DatasetItems::DatasetId).string().not_null())
                    .col(ColumnDef::new(DatasetItems::InputText).text().not_null())
                    .col(ColumnDef::new(DatasetItems::ReferenceOutput).text().null())
                    .col(ColumnDef::new(DatasetItems::ItemMetadata).json().null())
                    .col(
                        ColumnDef::new(DatasetItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dataset_items_dataset_id")
                            .from(DatasetItems::Table, DatasetItems::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dataset_items_dataset_id")
                    .table(DatasetItems::Table)
                    .col(DatasetItems::DatasetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DatasetItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DatasetItems {
    Table,
    Id,
    DatasetId,
    InputText,
    ReferenceOutput,
    ItemMetadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Datasets {
    Table,
    Id,
}
