use std::sync::Arc;

use tracing::{info, instrument, warn};

use models::student::{validate_age, validate_email, validate_name};
use super::domain::{NewStudent, Student, StudentDetail, StudentPage, StudentPatch};
use super::repository::StudentRepository;
use crate::errors::ServiceError;
use crate::pagination::PageRequest;

const REQUIRED_FIELDS: &str = "name and email are required";

/// Student business service independent of web framework
pub struct StudentService<R: StudentRepository> {
    repo: Arc<R>,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a student. Uniqueness of `email` is left to storage so that
    /// concurrent creates cannot both succeed.
    ///
    /// # Examples
    /// ```
    /// use service::student::{StudentService, domain::NewStudent, repository::mock::MockStudentRepository};
    /// use std::sync::Arc;
    /// let svc = StudentService::new(Arc::new(MockStudentRepository::default()));
    /// let input = NewStudent { name: Some("Ana".into()), email: Some("ana@x.com".into()), age: Some(20) };
    /// let s = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(s.email, "ana@x.com");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewStudent) -> Result<Student, ServiceError> {
        let (Some(name), Some(email)) = (input.name.as_deref(), input.email.as_deref()) else {
            return Err(ServiceError::Validation(REQUIRED_FIELDS.into()));
        };
        let (name, email) = match (validate_name(name), validate_email(email)) {
            (Ok(n), Ok(e)) => (n, e),
            _ => return Err(ServiceError::Validation(REQUIRED_FIELDS.into())),
        };
        validate_age(input.age)?;

        let created = self.repo.insert(&name, &email, input.age).await.map_err(log_failure)?;
        info!(student_id = created.id, "student_created");
        Ok(created)
    }

    /// One page of students ordered by ascending id.
    ///
    /// # Examples
    /// ```
    /// use service::student::{StudentService, repository::mock::MockStudentRepository};
    /// use service::pagination::PageRequest;
    /// use std::sync::Arc;
    /// let svc = StudentService::new(Arc::new(MockStudentRepository::default()));
    /// let page = tokio_test::block_on(svc.list(PageRequest::default())).unwrap();
    /// assert_eq!((page.total, page.page, page.limit, page.total_pages), (0, 1, 10, 0));
    /// ```
    #[instrument(skip(self))]
    pub async fn list(&self, req: PageRequest) -> Result<StudentPage, ServiceError> {
        let p = req.normalize();
        let (total, students) = self.repo.list_window(p.offset(), p.limit).await.map_err(log_failure)?;
        Ok(StudentPage {
            total,
            page: p.page,
            limit: p.limit,
            total_pages: p.total_pages(total),
            students,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<StudentDetail, ServiceError> {
        self.repo
            .find_with_marks(id)
            .await
            .map_err(log_failure)?
            .ok_or_else(|| ServiceError::not_found("Student"))
    }

    /// Apply a partial update; see [`StudentPatch`] for field semantics.
    ///
    /// An unknown id is reported as not found even when the supplied fields
    /// are also invalid.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: StudentPatch) -> Result<Student, ServiceError> {
        let patch = match validate_patch(patch) {
            Ok(patch) => patch,
            Err(e) => {
                if !self.repo.exists(id).await.map_err(log_failure)? {
                    return Err(ServiceError::not_found("Student"));
                }
                return Err(e);
            }
        };

        let updated = self.repo
            .update(id, patch)
            .await
            .map_err(log_failure)?
            .ok_or_else(|| ServiceError::not_found("Student"))?;
        info!(student_id = updated.id, "student_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<Student, ServiceError> {
        let deleted = self.repo
            .delete(id)
            .await
            .map_err(log_failure)?
            .ok_or_else(|| ServiceError::not_found("Student"))?;
        info!(student_id = deleted.id, "student_deleted");
        Ok(deleted)
    }
}

fn validate_patch(patch: StudentPatch) -> Result<StudentPatch, ServiceError> {
    if let Some(age) = patch.age {
        validate_age(age)?;
    }
    Ok(StudentPatch {
        name: patch.name.as_deref().map(validate_name).transpose()?,
        email: patch.email.as_deref().map(validate_email).transpose()?,
        age: patch.age,
    })
}

/// Storage failures are logged once, where they become a 500 at the HTTP edge.
fn log_failure(e: ServiceError) -> ServiceError {
    if let ServiceError::DuplicateEmail = e {
        warn!("duplicate email rejected");
    }
    e
}
