use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(Serialize, ToSchema)]
pub struct StudentDoc {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateStudentDoc {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

/// Omitted fields keep their value; `age: null` clears the age.
#[derive(Serialize, ToSchema)]
pub struct UpdateStudentDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct MarkDoc {
    pub id: i32,
    pub subject: String,
    pub marks: f64,
}

#[derive(Serialize, ToSchema)]
pub struct StudentDetailDoc {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub marks: Vec<MarkDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct StudentListDoc {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub students: Vec<StudentDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct DeletedStudentDoc {
    pub message: String,
    pub student: StudentDoc,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::students::create,
        crate::routes::students::list,
        crate::routes::students::get,
        crate::routes::students::update,
        crate::routes::students::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            StudentDoc,
            CreateStudentDoc,
            UpdateStudentDoc,
            MarkDoc,
            StudentDetailDoc,
            StudentListDoc,
            DeletedStudentDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "students")
    )
)]
pub struct ApiDoc;
