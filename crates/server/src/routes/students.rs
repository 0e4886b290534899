use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use service::pagination::PageRequest;
use service::student::domain::{NewStudent, Student, StudentDetail, StudentPage, StudentPatch};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page index, defaults to 1
    pub page: Option<String>,
    /// Page size, defaults to 10
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedStudent {
    pub message: &'static str,
    pub student: Student,
}

/// Student ids are integers; anything else cannot name an existing student.
fn parse_id(raw: &str) -> Result<i32, JsonApiError> {
    raw.parse::<i32>().map_err(|_| JsonApiError::not_found("Student"))
}

#[utoipa::path(
    post, path = "/api/student", tag = "students",
    request_body = crate::openapi::CreateStudentDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::StudentDoc),
        (status = 400, description = "Missing or invalid fields", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Email already exists", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<NewStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<Student>), JsonApiError> {
    let Json(input) = body?;
    let created = state.students.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/students-list", tag = "students",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of students", body = crate::openapi::StudentListDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<StudentPage>, JsonApiError> {
    // Unreadable query strings fall back to the default window.
    let q = query.map(|Query(q)| q).unwrap_or_default();
    let req = PageRequest::from_query(q.page.as_deref(), q.limit.as_deref());
    let page = state.students.list(req).await?;
    info!(total = page.total, page = page.page, limit = page.limit, count = page.students.len(), "list students");
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/api/student/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student with marks", body = crate::openapi::StudentDetailDoc),
        (status = 404, description = "Student not found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<StudentDetail>, JsonApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.students.get(id).await?))
}

#[utoipa::path(
    put, path = "/api/student/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    request_body = crate::openapi::UpdateStudentDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::StudentDoc),
        (status = 400, description = "Invalid fields", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Student not found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Email already exists", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<StudentPatch>, JsonRejection>,
) -> Result<Json<Student>, JsonApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = body?;
    Ok(Json(state.students.update(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/api/student/{id}", tag = "students",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeletedStudentDoc),
        (status = 404, description = "Student not found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedStudent>, JsonApiError> {
    let id = parse_id(&id)?;
    let student = state.students.delete(id).await?;
    Ok(Json(DeletedStudent { message: "Deleted", student }))
}
