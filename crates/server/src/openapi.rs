use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Envelope wrapped around every successful response.
#[derive(ToSchema)]
pub struct SuccessEnvelopeDoc {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub pagination: Option<PageMetaDoc>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct PageMetaDoc {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Envelope of every failure. `details` carries the clashing block on `SCHEDULE_CONFLICT`.
#[derive(ToSchema)]
pub struct ErrorEnvelopeDoc {
    pub success: bool,
    pub message: String,
    #[schema(example = "VALIDATION_ERROR")]
    pub error_code: String,
    pub errors: Vec<String>,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    pub timestamp: String,
}

#[derive(ToSchema)]
pub struct NewPositionDoc { pub name: String, pub description: Option<String> }

#[derive(ToSchema)]
pub struct PositionPatchDoc { pub name: Option<String>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct NewPersonDoc {
    #[schema(example = "4567890-LP")]
    pub national_id: String,
    pub first_names: String,
    pub paternal_surname: String,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub position_id: Option<Uuid>,
    #[schema(example = "2024-02-01")]
    pub hire_date: Option<String>,
    /// `administrative` (default) or `support`
    pub kind: Option<String>,
}

#[derive(ToSchema)]
pub struct PersonPatchDoc {
    pub national_id: Option<String>,
    pub first_names: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position_id: Option<Uuid>,
    pub hire_date: Option<String>,
    pub kind: Option<String>,
}

#[derive(ToSchema)]
pub struct NewTeacherDoc {
    pub national_id: String,
    pub first_names: String,
    pub paternal_surname: String,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub position_id: Option<Uuid>,
    pub hire_date: Option<String>,
    #[schema(example = "Lic.")]
    pub academic_title: Option<String>,
    pub specialty: Option<String>,
}

#[derive(ToSchema)]
pub struct TeacherPatchDoc {
    pub national_id: Option<String>,
    pub first_names: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position_id: Option<Uuid>,
    pub hire_date: Option<String>,
    pub academic_title: Option<String>,
    pub specialty: Option<String>,
}

#[derive(ToSchema)]
pub struct NewSubjectDoc {
    #[schema(example = "MAT-101")]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct SubjectPatchDoc { pub code: Option<String>, pub name: Option<String>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct NewCourseDoc {
    #[schema(example = "3ro")]
    pub name: String,
    #[schema(example = "secundaria")]
    pub level: String,
    pub section: Option<String>,
}

#[derive(ToSchema)]
pub struct CoursePatchDoc { pub name: Option<String>, pub level: Option<String>, pub section: Option<String> }

#[derive(ToSchema)]
pub struct NewAssignmentDoc {
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub subject_id: Uuid,
    pub planned_weekly_hours: Option<i32>,
}

#[derive(ToSchema)]
pub struct AssignmentPatchDoc { pub planned_weekly_hours: Option<i32> }

#[derive(ToSchema)]
pub struct NewScheduleBlockDoc {
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub subject_id: Uuid,
    #[schema(example = "monday")]
    pub day: String,
    #[schema(example = "08:00")]
    pub start_time: String,
    #[schema(example = "09:30")]
    pub end_time: String,
    pub room: Option<String>,
}

#[derive(ToSchema)]
pub struct ScheduleBlockPatchDoc {
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::health::api_health,
        crate::routes::health::status,
        crate::routes::positions::list,
        crate::routes::positions::create,
        crate::routes::positions::get,
        crate::routes::positions::update,
        crate::routes::positions::delete,
        crate::routes::persons::list,
        crate::routes::persons::create,
        crate::routes::persons::get,
        crate::routes::persons::update,
        crate::routes::persons::delete,
        crate::routes::teachers::list,
        crate::routes::teachers::create,
        crate::routes::teachers::get,
        crate::routes::teachers::update,
        crate::routes::teachers::delete,
        crate::routes::teachers::assignments,
        crate::routes::subjects::list,
        crate::routes::subjects::create,
        crate::routes::subjects::get,
        crate::routes::subjects::update,
        crate::routes::subjects::delete,
        crate::routes::courses::list,
        crate::routes::courses::create,
        crate::routes::courses::get,
        crate::routes::courses::update,
        crate::routes::courses::delete,
        crate::routes::assignments::list,
        crate::routes::assignments::create,
        crate::routes::assignments::get,
        crate::routes::assignments::update,
        crate::routes::assignments::delete,
        crate::routes::schedule_blocks::list,
        crate::routes::schedule_blocks::create,
        crate::routes::schedule_blocks::get,
        crate::routes::schedule_blocks::update,
        crate::routes::schedule_blocks::delete,
        crate::routes::views::teacher_loads,
        crate::routes::views::teacher_load,
        crate::routes::views::teacher_schedule,
        crate::routes::views::course_schedule,
    ),
    components(
        schemas(
            HealthResponse,
            SuccessEnvelopeDoc,
            PageMetaDoc,
            ErrorEnvelopeDoc,
            NewPositionDoc,
            PositionPatchDoc,
            NewPersonDoc,
            PersonPatchDoc,
            NewTeacherDoc,
            TeacherPatchDoc,
            NewSubjectDoc,
            SubjectPatchDoc,
            NewCourseDoc,
            CoursePatchDoc,
            NewAssignmentDoc,
            AssignmentPatchDoc,
            NewScheduleBlockDoc,
            ScheduleBlockPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "positions"),
        (name = "persons"),
        (name = "teachers"),
        (name = "subjects"),
        (name = "courses"),
        (name = "assignments"),
        (name = "schedule-blocks"),
        (name = "views")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/status",
            "/api/teachers/{id}/assignments",
            "/api/assignments/{teacher_id}/{course_id}/{subject_id}",
            "/api/schedule-blocks/{id}",
            "/api/views/courses/{course_id}/schedule",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
