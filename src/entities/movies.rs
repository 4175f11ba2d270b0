use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub video_url: String,
    pub image_path: String,
    pub description: String,
    pub genre: String,
    /// Number of accounts with a `like` vote row for this movie.
    pub likes: i32,
    /// Number of accounts with a `dislike` vote row for this movie.
    pub dislikes: i32,
    /// Editorial note, empty when unset.
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::votes::Entity")]
    Votes,
}

impl Related<super::votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
