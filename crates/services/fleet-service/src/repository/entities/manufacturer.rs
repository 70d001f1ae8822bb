//! Manufacturer database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Manufacturer;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "manufacturers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub country: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Manufacturer {
    fn from(model: Model) -> Self {
        Manufacturer {
            id: model.id,
            name: model.name,
            country: model.country,
        }
    }
}
