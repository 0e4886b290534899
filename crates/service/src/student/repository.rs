use async_trait::async_trait;

use super::domain::{Student, StudentDetail, StudentPatch};
use crate::errors::ServiceError;

/// Repository abstraction for student persistence.
///
/// Inputs arrive already validated by [`super::StudentService`]. Methods that
/// address a student by id return `Ok(None)` when it does not exist.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert(&self, name: &str, email: &str, age: Option<i32>) -> Result<Student, ServiceError>;
    /// Total row count plus the window `[offset, offset + limit)` ordered by id.
    async fn list_window(&self, offset: u64, limit: u64) -> Result<(u64, Vec<Student>), ServiceError>;
    async fn exists(&self, id: i32) -> Result<bool, ServiceError>;
    async fn find_with_marks(&self, id: i32) -> Result<Option<StudentDetail>, ServiceError>;
    async fn update(&self, id: i32, patch: StudentPatch) -> Result<Option<Student>, ServiceError>;
    async fn delete(&self, id: i32) -> Result<Option<Student>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use models::mark::MarkView;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct State {
        last_id: i32,
        last_mark_id: i32,
        students: BTreeMap<i32, Student>,
        marks: BTreeMap<i32, (i32, MarkView)>, // key: mark id, value: (student_id, mark)
    }

    #[derive(Default)]
    pub struct MockStudentRepository {
        state: Mutex<State>,
    }

    impl MockStudentRepository {
        /// Attach a mark to an existing student.
        pub fn seed_mark(&self, student_id: i32, subject: &str, marks: f64) -> Option<MarkView> {
            let mut st = self.state.lock().unwrap();
            if !st.students.contains_key(&student_id) {
                return None;
            }
            st.last_mark_id += 1;
            let view = MarkView { id: st.last_mark_id, subject: subject.to_string(), marks };
            st.marks.insert(view.id, (student_id, view.clone()));
            Some(view)
        }

        fn email_taken(st: &State, email: &str, except: Option<i32>) -> bool {
            st.students.values().any(|s| s.email == email && Some(s.id) != except)
        }
    }

    #[async_trait]
    impl StudentRepository for MockStudentRepository {
        async fn insert(&self, name: &str, email: &str, age: Option<i32>) -> Result<Student, ServiceError> {
            let mut st = self.state.lock().unwrap();
            if Self::email_taken(&st, email, None) {
                return Err(ServiceError::DuplicateEmail);
            }
            st.last_id += 1;
            let s = Student { id: st.last_id, name: name.to_string(), email: email.to_string(), age };
            st.students.insert(s.id, s.clone());
            Ok(s)
        }

        async fn list_window(&self, offset: u64, limit: u64) -> Result<(u64, Vec<Student>), ServiceError> {
            let st = self.state.lock().unwrap();
            let total = st.students.len() as u64;
            let rows = st.students.values()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok((total, rows))
        }

        async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.state.lock().unwrap().students.contains_key(&id))
        }

        async fn find_with_marks(&self, id: i32) -> Result<Option<StudentDetail>, ServiceError> {
            let st = self.state.lock().unwrap();
            Ok(st.students.get(&id).map(|s| StudentDetail {
                student: s.clone(),
                marks: st.marks.values().filter(|(sid, _)| *sid == id).map(|(_, m)| m.clone()).collect(),
            }))
        }

        async fn update(&self, id: i32, patch: StudentPatch) -> Result<Option<Student>, ServiceError> {
            let mut st = self.state.lock().unwrap();
            let Some(current) = st.students.get(&id).cloned() else { return Ok(None) };
            if let Some(email) = &patch.email {
                if Self::email_taken(&st, email, Some(id)) {
                    return Err(ServiceError::DuplicateEmail);
                }
            }
            let updated = Student {
                id,
                name: patch.name.unwrap_or(current.name),
                email: patch.email.unwrap_or(current.email),
                age: patch.age.unwrap_or(current.age),
            };
            st.students.insert(id, updated.clone());
            Ok(Some(updated))
        }

        async fn delete(&self, id: i32) -> Result<Option<Student>, ServiceError> {
            let mut st = self.state.lock().unwrap();
            let removed = st.students.remove(&id);
            if removed.is_some() {
                st.marks.retain(|_, (sid, _)| *sid != id);
            }
            Ok(removed)
        }
    }
}
