use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string_len(Products::Name, 100))
                    .col(string_len_null(Products::Description, 500))
                    .col(decimal_len(Products::Price, 10, 2))
                    .col(string_len_null(Products::ImageUrl, 200))
                    .col(integer(Products::Stock).default(0))
                    .col(double(Products::Rating).default(0.0))
                    .col(boolean(Products::IsActive).default(true))
                    .col(integer(Products::CategoryId))
                    .col(integer(Products::SellerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category_id")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_seller_id")
                            .from(Products::Table, Products::SellerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_seller_id")
                    .table(Products::Table)
                    .col(Products::SellerId)
                    .to_owned(),
            )
            .await?;

        // Weighted bilingual search vector: names rank above descriptions,
        // both english and russian configurations feed the same column.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE products ADD COLUMN tsv tsvector
                GENERATED ALWAYS AS (
                    setweight(to_tsvector('english', name), 'A') ||
                    setweight(to_tsvector('russian', name), 'A') ||
                    setweight(to_tsvector('english', coalesce(description, '')), 'B') ||
                    setweight(to_tsvector('russian', coalesce(description, '')), 'B')
                ) STORED
                "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("CREATE INDEX idx_products_tsv ON products USING GIN (tsv)")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Price,
    ImageUrl,
    Stock,
    Rating,
    IsActive,
    CategoryId,
    SellerId,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
