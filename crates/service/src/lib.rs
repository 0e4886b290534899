//! Service layer providing the student CRUD operations on top of models.
//! - Separates business rules (validation, pagination, partial updates)
//!   from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Surfaces a single typed error, [`errors::ServiceError`].

pub mod errors;
pub mod pagination;
pub mod student;
#[cfg(test)]
pub mod test_support;
