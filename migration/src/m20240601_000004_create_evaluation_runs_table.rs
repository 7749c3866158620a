use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EvaluationRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationRuns::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EvaluationRuns::Name).string().not_null())
                    // 不设外键，数据集删除后保留悬空引用
                    .col(
                        ColumnDef::new(EvaluationRuns::DatasetId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(EvaluationRuns::ModelIds).json().not_null())
                    .col(
                        ColumnDef::new(EvaluationRuns::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(EvaluationRuns::Progress)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(EvaluationRuns::TotalItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EvaluationRuns::CompletedItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EvaluationRuns::FailedItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(EvaluationRuns::ConfigSnapshot).json().null())
                    .col(
                        ColumnDef::new(EvaluationRuns::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRuns::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRuns::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRuns::UpdatedAt)
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
                    .name("idx_evaluation_runs_dataset_id")
                    .table(EvaluationRuns::Table)
                    .col(EvaluationRuns::DatasetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_runs_status")
                    .table(EvaluationRuns::Table)
                    .col(EvaluationRuns::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EvaluationRuns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EvaluationRuns {
    Table,
    Id,
    Name,
    DatasetId,
    ModelIds,
    Status,
    Progress,
    TotalItems,
    CompletedItems,
    FailedItems,
    ConfigSnapshot,
    CreatedAt,
    StartedAt,
    CompletedAt,
    UpdatedAt,
}
