pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_models_table;
mod m20240601_000002_create_datasets_table;
mod m20240601_000003_create_dataset_items_table;
mod m20240601_000004_create_evaluation_runs_table;
mod m20240601_000005_create_evaluation_results_table;
mod m20240601_000006_create_api_keys_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_models_table::Migration),
            Box::new(m20240601_000002_create_datasets_table::Migration),
            Box::new(m20240601_000003_create_dataset_items_table::Migration),
            Box::new(m20240601_000004_create_evaluation_runs_table::Migration),
            Box::new(m20240601_000005_create_evaluation_results_table::Migration),
            Box::new(m20240601_000006_create_api_keys_table::Migration),
        ]
    }
}
