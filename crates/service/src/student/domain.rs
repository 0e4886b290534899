use models::mark::MarkView;
use serde::{Deserialize, Deserializer, Serialize};

pub use models::student::Model as Student;

/// Create input. `name`/`email` stay optional here so that a missing field
/// surfaces as a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
}

/// Partial update.
///
/// `name`/`email`: omitted or `null` keeps the stored value.
/// `age`: omitted keeps it, `null` clears it, a number replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub age: Option<Option<i32>>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

fn explicit_null<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Student merged with its marks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: Student,
    pub marks: Vec<MarkView>,
}

/// One page of the student list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentPage {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub students: Vec<Student>,
}
