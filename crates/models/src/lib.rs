//! SeaORM entities for the `students` and `marks` tables, their field
//! validation, and database connection helpers.

pub mod errors;
pub mod db;
pub mod student;
pub mod mark;

#[cfg(test)]
mod tests;
