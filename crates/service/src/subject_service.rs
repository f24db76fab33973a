use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{assignment, schedule_block, subject};
use crate::domain::{NewSubject, SubjectPatch};
use crate::errors::ServiceError;
use crate::{Page, Pagination};

async fn ensure_code_free<C: ConnectionTrait>(db: &C, code: &str, exclude: Option<Uuid>) -> Result<(), ServiceError> {
    let mut finder = subject::Entity::find().filter(subject::Column::Code.eq(code));
    if let Some(id) = exclude { finder = finder.filter(subject::Column::Id.ne(id)); }
    if finder.one(db).await?.is_some() {
        return Err(ServiceError::conflict(format!("subject code '{code}' already exists")));
    }
    Ok(())
}

pub(crate) async fn ensure_exists<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<subject::Model, ServiceError> {
    subject::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("subject"))
}

/// Create a subject; codes are stored uppercase and must be unique.
#[instrument(skip(db, input), fields(code = %input.code))]
pub async fn create_subject(db: &DatabaseConnection, input: NewSubject) -> Result<subject::Model, ServiceError> {
    let code = subject::validate_code(&input.code)?;
    let name = subject::validate_name(&input.name)?;
    let description = subject::validate_description(input.description.as_deref())?;

    let txn = db.begin().await?;
    ensure_code_free(&txn, &code, None).await?;
    let now = Utc::now().into();
    let created = subject::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        name: Set(name),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(subject_id = %created.id, "subject_created");
    Ok(created)
}

pub async fn get_subject(db: &DatabaseConnection, id: Uuid) -> Result<subject::Model, ServiceError> {
    ensure_exists(db, id).await
}

pub async fn list_subjects(db: &DatabaseConnection, opts: Pagination) -> Result<Page<subject::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = subject::Entity::find().order_by_asc(subject::Column::Code).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page::new(items, total, page_idx, per_page))
}

#[instrument(skip(db, patch), fields(subject_id = %id))]
pub async fn update_subject(db: &DatabaseConnection, id: Uuid, patch: SubjectPatch) -> Result<subject::Model, ServiceError> {
    let txn = db.begin().await?;
    let mut am: subject::ActiveModel = ensure_exists(&txn, id).await?.into();
    if let Some(c) = patch.code.as_deref() {
        let c = subject::validate_code(c)?;
        ensure_code_free(&txn, &c, Some(id)).await?;
        am.code = Set(c);
    }
    if let Some(n) = patch.name.as_deref() { am.name = Set(subject::validate_name(n)?); }
    if let Some(d) = patch.description.as_deref() { am.description = Set(subject::validate_description(Some(d))?); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!("subject_updated");
    Ok(updated)
}

/// Delete a subject with every assignment and block that teaches it.
#[instrument(skip(db), fields(subject_id = %id))]
pub async fn delete_subject(db: &DatabaseConnection, id: Uuid) -> Result<subject::Model, ServiceError> {
    let txn = db.begin().await?;
    let existing = ensure_exists(&txn, id).await?;
    let blocks = schedule_block::Entity::delete_many()
        .filter(schedule_block::Column::SubjectId.eq(id))
        .exec(&txn)
        .await?;
    let assignments = assignment::Entity::delete_many()
        .filter(assignment::Column::SubjectId.eq(id))
        .exec(&txn)
        .await?;
    subject::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(assignments = assignments.rows_affected, blocks = blocks.rows_affected, "subject_deleted");
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, new_subject};

    #[tokio::test]
    async fn subject_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = create_subject(&db, new_subject("mat-1")).await?;
        assert_eq!(s.code, "MAT-1");

        let dup = create_subject(&db, new_subject("MAT-1")).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let other = create_subject(&db, new_subject("QMC-1")).await?;
        let clash = update_subject(&db, other.id, SubjectPatch { code: Some("mat-1".into()), ..Default::default() }).await;
        assert!(matches!(clash, Err(ServiceError::Conflict(_))));

        let renamed = update_subject(&db, s.id, SubjectPatch { name: Some("Matemáticas".into()), ..Default::default() }).await?;
        assert_eq!(renamed.name, "Matemáticas");

        let page = list_subjects(&db, Pagination::default()).await?;
        assert_eq!(page.items.iter().map(|s| s.code.as_str()).collect::<Vec<_>>(), vec!["MAT-1", "QMC-1"]);

        delete_subject(&db, s.id).await?;
        assert!(matches!(get_subject(&db, s.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_subject_removes_its_assignments_and_blocks() -> Result<(), anyhow::Error> {
        use crate::assignment_service::{create_assignment, list_assignments};
        use crate::course_service::create_course;
        use crate::domain::{AssignmentFilter, NewAssignment, NewScheduleBlock};
        use crate::schedule_service::{create_block, get_block};
        use crate::teacher_service::create_teacher;
        use crate::test_support::{hm, new_course, new_teacher};
        use models::schedule_block::Weekday;

        let db = get_db().await?;
        let t = create_teacher(&db, new_teacher("cascade")).await?;
        let c = create_course(&db, new_course("3ro")).await?;
        let doomed = create_subject(&db, new_subject("BIO-3")).await?;
        let kept = create_subject(&db, new_subject("GEO-3")).await?;
        let mut blocks = Vec::new();
        for (s, start) in [(doomed.id, hm(8, 0)), (kept.id, hm(9, 0))] {
            create_assignment(
                &db,
                NewAssignment { teacher_id: t.person.id, course_id: c.id, subject_id: s, planned_weekly_hours: None },
            )
            .await?;
            let b = create_block(
                &db,
                NewScheduleBlock {
                    teacher_id: t.person.id,
                    course_id: c.id,
                    subject_id: s,
                    day: Weekday::Thursday,
                    start_time: start,
                    end_time: start + chrono::Duration::minutes(45),
                    room: None,
                },
            )
            .await?;
            blocks.push(b.id);
        }

        delete_subject(&db, doomed.id).await?;

        let left = list_assignments(&db, AssignmentFilter { course_id: Some(c.id), ..Default::default() }, Pagination::default()).await?;
        assert_eq!(left.total, 1);
        assert_eq!(left.items[0].subject_id, kept.id);
        assert!(matches!(get_block(&db, blocks[0]).await, Err(ServiceError::NotFound(_))));
        assert_eq!(get_block(&db, blocks[1]).await?.subject_id, kept.id);
        Ok(())
    }

}
