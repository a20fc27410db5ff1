pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_profiles_table;
mod m20250301_000002_create_contracts_table;
mod m20250301_000003_create_jobs_table;
mod m20250301_000004_add_settlement_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_profiles_table::Migration),
            Box::new(m20250301_000002_create_contracts_table::Migration),
            Box::new(m20250301_000003_create_jobs_table::Migration),
            Box::new(m20250301_000004_add_settlement_indexes::Migration),
        ]
    }
}
