use crate::models::Review;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the reviews table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub comment: Option<String>,
    pub grade: i32,
    pub comment_date: DateTimeWithTimeZone,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_catalog::entity::product::Entity",
        from = "Column::ProductId",
        to = "domain_catalog::entity::product::Column::Id"
    )]
    Product,
}

impl Related<domain_catalog::entity::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Review {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            comment: model.comment,
            grade: model.grade,
            comment_date: model.comment_date.into(),
            is_active: model.is_active,
        }
    }
}
