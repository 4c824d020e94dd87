//! Sea-ORM entities for the catalog tables.
//!
//! The generated `tsv` column on products is deliberately absent from the
//! entity: PostgreSQL maintains it, queries reference it through raw
//! expressions only.

pub mod category {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "categories")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub is_active: bool,
        pub parent_id: Option<i32>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::product::Entity")]
        Product,
    }

    impl Related<super::product::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Product.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Category {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                is_active: model.is_active,
                parent_id: model.parent_id,
            }
        }
    }
}

pub mod product {
    use rust_decimal::Decimal;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub description: Option<String>,
        #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
        pub price: Decimal,
        pub image_url: Option<String>,
        pub stock: i32,
        pub rating: f64,
        pub is_active: bool,
        pub category_id: i32,
        pub seller_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::category::Entity",
            from = "Column::CategoryId",
            to = "super::category::Column::Id"
        )]
        Category,
    }

    impl Related<super::category::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Category.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Product {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                name: model.name,
                description: model.description,
                price: model.price,
                image_url: model.image_url,
                stock: model.stock,
                rating: model.rating,
                is_active: model.is_active,
                category_id: model.category_id,
                seller_id: model.seller_id,
            }
        }
    }
}
