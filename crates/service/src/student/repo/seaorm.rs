use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set, TransactionTrait};

use models::{mark, student};
use crate::errors::ServiceError;
use crate::student::domain::{Student, StudentDetail, StudentPatch};
use crate::student::repository::StudentRepository;

/// SeaORM-backed repository implementation.
///
/// Every call checks a connection out of the shared pool for its own
/// duration only. Multi-statement operations run in a transaction that is
/// rolled back on any early return.
#[derive(Clone)]
pub struct SeaOrmStudentRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmStudentRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn insert(&self, name: &str, email: &str, age: Option<i32>) -> Result<Student, ServiceError> {
        Ok(student::create(&self.db, name, email, age).await?)
    }

    async fn list_window(&self, offset: u64, limit: u64) -> Result<(u64, Vec<Student>), ServiceError> {
        let total = student::count(&self.db).await?;
        let rows = student::window(&self.db, offset, limit).await?;
        Ok((total, rows))
    }

    async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(student::find(&self.db, id).await?.is_some())
    }

    async fn find_with_marks(&self, id: i32) -> Result<Option<StudentDetail>, ServiceError> {
        let Some(found) = student::find(&self.db, id).await? else { return Ok(None) };
        let marks = mark::list_for_student(&self.db, id).await?;
        Ok(Some(StudentDetail { student: found, marks }))
    }

    async fn update(&self, id: i32, patch: StudentPatch) -> Result<Option<Student>, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(current) = student::find(&txn, id).await? else { return Ok(None) };
        if patch.is_empty() {
            txn.commit().await?;
            return Ok(Some(current));
        }

        let mut am: student::ActiveModel = current.into();
        if let Some(name) = patch.name { am.name = Set(name); }
        if let Some(email) = patch.email { am.email = Set(email); }
        if let Some(age) = patch.age { am.age = Set(age); }
        let updated = match am.update(&txn).await {
            Ok(updated) => updated,
            // row removed by a concurrent delete after the read
            Err(DbErr::RecordNotUpdated) => return Ok(None),
            Err(e) => return Err(student::classify_write_error(e).into()),
        };
        txn.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<Option<Student>, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(current) = student::find(&txn, id).await? else { return Ok(None) };
        if !student::hard_delete(&txn, id).await? {
            return Ok(None);
        }
        txn.commit().await?;
        Ok(Some(current))
    }
}
