use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateFaqs)]
    }
}

#[derive(DeriveIden)]
enum Faqs {
    Table,
    Id,
    Question,
    Answer,
    Status,
}

struct CreateFaqs;

impl MigrationName for CreateFaqs {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_faqs"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateFaqs {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Faqs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Faqs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Faqs::Question).string().not_null().default(""))
                    .col(ColumnDef::new(Faqs::Answer).string().not_null().default(""))
                    .col(ColumnDef::new(Faqs::Status).string().not_null().default("draft"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Faqs::Table).to_owned())
            .await
    }
}
