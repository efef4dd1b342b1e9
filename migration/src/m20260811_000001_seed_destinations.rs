use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED: &[(&str, &str)] = &[
    ("Bali", "Indonesia"),
    ("Santorini", "Greece"),
    ("Kashmir", "India"),
    ("Dubai", "United Arab Emirates"),
    ("Maldives", "Maldives"),
    ("Swiss Alps", "Switzerland"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, country) in SEED {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Destinations::Table)
                        .columns([
                            Destinations::Name,
                            Destinations::Country,
                            Destinations::Status,
                        ])
                        .values_panic([(*name).into(), (*country).into(), "active".into()])
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Destinations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Destinations {
    Table,
    Name,
    Country,
    Status,
}
