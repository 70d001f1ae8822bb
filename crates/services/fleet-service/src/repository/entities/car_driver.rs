//! Car/driver assignment join table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cars_drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub car_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub driver_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
