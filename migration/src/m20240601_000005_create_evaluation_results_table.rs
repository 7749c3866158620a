use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EvaluationResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationResults::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EvaluationResults::RunId).string().not_null())
                    // 数据集条目与模型只做索引，不设外键
                    .col(
                        ColumnDef::new(EvaluationResults::DatasetItemId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(EvaluationResults::ModelId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(EvaluationResults::InputText).text().not_null())
                    .col(ColumnDef::new(EvaluationResults::ExpectedOutput).text().null())
                    .col(ColumnDef::new(EvaluationResults::ActualOutput).text().null())
                    .col(ColumnDef::new(EvaluationResults::Metrics).json().null())
                    .col(
                        ColumnDef::new(EvaluationResults::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(EvaluationResults::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(EvaluationResults::ProcessingTimeMs)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluation_results_run_id")
                            .from(EvaluationResults::Table, EvaluationResults::RunId)
                            .to(EvaluationRuns::Table, EvaluationRuns::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_results_run_id")
                    .table(EvaluationResults::Table)
                    .col(EvaluationResults::RunId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_results_model_id")
                    .table(EvaluationResults::Table)
                    .col(EvaluationResults::ModelId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluation_results_dataset_item_id")
                    .table(EvaluationResults::Table)
                    .col(EvaluationResults::DatasetItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EvaluationResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EvaluationResults {
    Table,
    Id,
    RunId,
    DatasetItemId,
    ModelId,
    InputText,
    ExpectedOutput,
    ActualOutput,
    Metrics,
    Status,
    ErrorMessage,
    ProcessingTimeMs,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EvaluationRuns {
    Table,
    Id,
}
