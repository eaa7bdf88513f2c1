//! The single player row and the counter it carries.
//!
//! Helpers take any `ConnectionTrait` so they run on a pool or inside a
//! transaction alike.
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Fixed key of the only player row.
pub const PLAYER_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "player")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub money: i64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Load the player row, `None` when it was never created.
pub async fn find<C: ConnectionTrait>(db: &C) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(PLAYER_ID).one(db).await?)
}

/// Insert the row with `money = 0` unless it already exists.
/// Returns whether a row was inserted.
pub async fn insert_if_absent<C: ConnectionTrait>(db: &C) -> Result<bool, ModelError> {
    let am = ActiveModel {
        id: Set(PLAYER_ID),
        money: Set(0),
        updated_at: Set(Utc::now().into()),
    };
    let inserted = Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(inserted > 0)
}

/// `money = money + 1` on the player row, evaluated by the database.
/// Returns the number of rows touched (0 when the row is missing).
pub async fn add_one<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::Money, Expr::col(Column::Money).add(1i64))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(PLAYER_ID))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
