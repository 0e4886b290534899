use models::errors::ModelError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::DuplicateEmail => ServiceError::DuplicateEmail,
            ModelError::Db(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self { ServiceError::Storage(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_keep_their_kind() {
        assert!(matches!(ServiceError::from(ModelError::DuplicateEmail), ServiceError::DuplicateEmail));
        assert!(matches!(ServiceError::from(ModelError::Validation("x".into())), ServiceError::Validation(m) if m == "x"));
        assert!(matches!(ServiceError::from(ModelError::Db("boom".into())), ServiceError::Storage(m) if m == "boom"));
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(ServiceError::not_found("Student").to_string(), "Student not found");
        assert_eq!(ServiceError::DuplicateEmail.to_string(), "Email already exists");
    }
}
