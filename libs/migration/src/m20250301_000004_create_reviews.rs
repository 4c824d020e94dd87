use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(pk_auto(Reviews::Id))
                    .col(integer(Reviews::UserId))
                    .col(integer(Reviews::ProductId))
                    .col(string_len_null(Reviews::Comment, 1000))
                    .col(integer(Reviews::Grade))
                    .col(
                        timestamp_with_time_zone(Reviews::CommentDate)
                            .default(Expr::current_timestamp()),
                    )
                    .col(boolean(Reviews::IsActive).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_user_id")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_product_id")
                            .from(Reviews::Table, Reviews::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .check(Expr::col(Reviews::Grade).between(1, 5))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_product_id")
                    .table(Reviews::Table)
                    .col(Reviews::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    UserId,
    ProductId,
    Comment,
    Grade,
    CommentDate,
    IsActive,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
