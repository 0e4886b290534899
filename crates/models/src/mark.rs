use sea_orm::{entity::prelude::*, ConnectionTrait, FromQueryResult, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::student;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub subject: String,
    pub marks: f64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Student }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(student::Entity)
                .from(Column::StudentId)
                .to(student::Column::Id)
                .into(),
        }
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef { Relation::Student.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Mark as nested under its student: no `student_id`.
#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize, Deserialize)]
pub struct MarkView {
    pub id: i32,
    pub subject: String,
    pub marks: f64,
}

pub async fn create<C: ConnectionTrait>(db: &C, student_id: i32, subject: &str, marks: f64) -> Result<Model, ModelError> {
    if subject.trim().is_empty() { return Err(ModelError::Validation("subject required".into())); }
    let am = ActiveModel {
        student_id: Set(student_id),
        subject: Set(subject.to_string()),
        marks: Set(marks),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Marks of one student ordered by ascending mark id.
pub async fn list_for_student<C: ConnectionTrait>(db: &C, student_id: i32) -> Result<Vec<MarkView>, ModelError> {
    let rows = Entity::find()
        .select_only()
        .column(Column::Id)
        .column(Column::Subject)
        .column(Column::Marks)
        .filter(Column::StudentId.eq(student_id))
        .order_by_asc(Column::Id)
        .into_model::<MarkView>()
        .all(db)
        .await?;
    Ok(rows)
}
