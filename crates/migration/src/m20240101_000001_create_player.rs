//! Create `player` table.
//!
//! Holds the single counter row keyed by a fixed id; the row itself is
//! inserted by the counter store on first start, not here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Player::Table)
                    .if_not_exists()
                    .col(integer(Player::Id).primary_key())
                    .col(big_integer(Player::Money).default(0i64))
                    .col(timestamp_with_time_zone(Player::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Player::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Player { Table, Id, Money, UpdatedAt }
