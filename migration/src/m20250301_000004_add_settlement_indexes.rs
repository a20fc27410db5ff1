use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Contracts {
    Table,
    ClientId,
    ContractorId,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    ContractId,
    Paid,
    PaymentDate,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Deposit cap and "my contracts" lookups by client
        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_client_id")
                    .table(Contracts::Table)
                    .col(Contracts::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_contractor_id")
                    .table(Contracts::Table)
                    .col(Contracts::ContractorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_contract_id")
                    .table(Jobs::Table)
                    .col(Jobs::ContractId)
                    .to_owned(),
            )
            .await?;

        // Reporting windows scan paid jobs by payment date
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_paid_payment_date")
                    .table(Jobs::Table)
                    .col(Jobs::Paid)
                    .col(Jobs::PaymentDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_contracts_client_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_contracts_contractor_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_jobs_contract_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_jobs_paid_payment_date").to_owned())
            .await?;

        Ok(())
    }
}
