use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::mark;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub age: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Marks,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Marks => Entity::has_many(mark::Entity).into() }
    }
}

impl Related<mark::Entity> for Entity {
    fn to() -> RelationDef { Relation::Marks.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trimmed, non-empty name.
pub fn validate_name(name: &str) -> Result<String, ModelError> {
    let name = name.trim();
    if name.is_empty() { return Err(ModelError::Validation("name must not be empty".into())); }
    Ok(name.to_string())
}

/// Trimmed, non-empty email.
pub fn validate_email(email: &str) -> Result<String, ModelError> {
    let email = email.trim();
    if email.is_empty() { return Err(ModelError::Validation("email must not be empty".into())); }
    Ok(email.to_string())
}

pub fn validate_age(age: Option<i32>) -> Result<(), ModelError> {
    match age {
        Some(a) if a < 0 => Err(ModelError::Validation("age must be a non-negative integer".into())),
        _ => Ok(()),
    }
}

/// Map a failed insert/update on `students`. The only unique key besides
/// the primary key is `email`, so a unique violation is a duplicate email.
pub fn classify_write_error(e: DbErr) -> ModelError {
    if errors::is_unique_violation(&e) {
        ModelError::DuplicateEmail
    } else {
        ModelError::Db(e.to_string())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, email: &str, age: Option<i32>) -> Result<Model, ModelError> {
    let name = validate_name(name)?;
    let email = validate_email(email)?;
    validate_age(age)?;
    let am = ActiveModel {
        name: Set(name),
        email: Set(email),
        age: Set(age),
        ..Default::default()
    };
    am.insert(db).await.map_err(classify_write_error)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    use sea_orm::PaginatorTrait;
    Ok(Entity::find().count(db).await?)
}

/// One window of students ordered by ascending id.
pub async fn window<C: ConnectionTrait>(db: &C, offset: u64, limit: u64) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find()
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
