use clo_document::{DocumentConfig, DocumentError, DocumentStatus, DocumentStore, ExportFormat};
use clo_mapping::ConsistencyViolation;
use clo_model::{Clo, Entity, EntityId, SequentialIdGenerator, Strength};
use clo_test_utils::{
    memory_service, memory_service_with, sample_identity, sample_new_course, sample_snapshot,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_create_course_validates() {
    let svc = memory_service();
    let me = sample_identity();

    let mut bad = sample_new_course();
    bad.credits = 0;
    let err = svc.create_course(&me, bad).await.unwrap_err();
    assert!(err.is_validation());

    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    assert_eq!(course.created_by_id, "user-1");
    assert_eq!(svc.list_courses().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_document_requires_course() {
    let svc = memory_service();
    let err = svc
        .create_document(&sample_identity(), "missing")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_new_draft_is_empty_version_one() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();

    let draft = svc.create_document(&me, &course.id).await.unwrap();

    assert_eq!(draft.version, 1);
    assert_eq!(draft.status, DocumentStatus::Draft);
    assert!(draft.content.clos.is_empty());
    let codes: Vec<&str> = draft.content.plos.iter().map(|p| p.code_en.as_str()).collect();
    assert_eq!(codes, vec!["PLO1", "PLO2", "PLO3"]);
}

#[tokio::test]
async fn test_list_plos_sorted_by_code() {
    let plos = memory_service().list_plos().await.unwrap();
    let codes: Vec<&str> = plos.iter().map(|p| p.code_en.as_str()).collect();
    assert_eq!(codes, vec!["PLO1", "PLO2", "PLO3"]);
}

#[tokio::test]
async fn test_update_persists_ids_and_keeps_values() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    let content = sample_snapshot();
    let first_clo = content.clos[0].id.clone();
    assert!(first_clo.is_temporary());

    let saved = svc
        .update_document(&me, &draft.id, content, draft.revision)
        .await
        .unwrap();

    assert_eq!(saved.revision, draft.revision + 1);
    assert!(saved.content.temporary_ids().is_empty());
    assert!(saved.content.is_consistent());
    // PLO ids were already persisted and stay as they were
    assert!(saved
        .content
        .plos
        .iter()
        .any(|p| p.id() == &EntityId::persisted("plo-1")));

    let c1 = &saved.content.clos[0].id;
    assert_eq!(saved.content.assessment_total(c1), 50.0);
    assert_eq!(saved.content.assessment_totals()[1].total, 100.0);
    let c2 = &saved.content.clos[1].id;
    assert_eq!(
        saved.content.mappings.plo.get(c2, &EntityId::persisted("plo-1")),
        Some(Strength::High)
    );
}

#[tokio::test]
async fn test_update_reconciles_loaded_content() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    let mut content = sample_snapshot();
    content.clos[0].number = 7;
    content.mappings.teaching = Default::default();
    assert!(!content.is_consistent());

    let saved = svc
        .update_document(&me, &draft.id, content, draft.revision)
        .await
        .unwrap();

    assert!(saved.content.is_consistent());
    assert_eq!(saved.content.mappings.teaching.len(), 3 * 2);
    // the CLO numbered 7 sorts last
    assert_eq!(saved.content.clos[2].bloom_level, clo_model::BloomLevel::Remember);
}

#[tokio::test]
async fn test_update_rejects_shared_ids() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    let mut content = sample_snapshot();
    let copy = Clo::new(content.clos[0].id.clone(), 4);
    content.clos.push(copy);

    let err = svc
        .update_document(&me, &draft.id, content, draft.revision)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let stored = svc.get_document(&draft.id).await.unwrap();
    assert_eq!(stored.revision, draft.revision);
    assert!(stored.content.clos.is_empty());
}

#[tokio::test]
async fn test_stale_update_conflicts() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    svc.update_document(&me, &draft.id, sample_snapshot(), draft.revision)
        .await
        .unwrap();
    let err = svc
        .update_document(&me, &draft.id, sample_snapshot(), draft.revision)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_update_enforces_limits() {
    let svc = memory_service_with(DocumentConfig::new().with_max_clos(2));
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    let err = svc
        .update_document(&me, &draft.id, sample_snapshot(), draft.revision)
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_publish_and_export() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();
    let saved = svc
        .update_document(&me, &draft.id, sample_snapshot(), draft.revision)
        .await
        .unwrap();

    let published = svc.publish(&saved.id).await.unwrap();
    assert!(published.is_published());
    assert_eq!(published.revision, saved.revision + 1);

    let pdf = svc.export(&saved.id, None).await.unwrap();
    assert_eq!(pdf.file_name, "CS101_มคอ3.pdf");

    let docx = svc.export(&saved.id, Some(ExportFormat::Docx)).await.unwrap();
    assert_eq!(docx.file_name, "CS101_มคอ3.docx");
    assert_ne!(pdf.digest, docx.digest);
}

#[tokio::test]
async fn test_export_default_format_from_config() {
    let svc = memory_service_with(
        DocumentConfig::new().with_default_export_format(ExportFormat::Docx),
    );
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    let artifact = svc.export(&draft.id, None).await.unwrap();
    assert_eq!(
        artifact.content_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
}

#[tokio::test]
async fn test_publish_refuses_inconsistent_content() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    // Bypass the service so the stored content is never reconciled
    let mut broken = draft.clone();
    broken.content = sample_snapshot();
    broken.content.mappings.plo = Default::default();
    svc.store()
        .as_ref()
        .save_document(broken, draft.revision)
        .await
        .unwrap();

    let err = svc.publish(&draft.id).await.unwrap_err();
    match err {
        DocumentError::Inconsistent { violations, .. } => {
            assert_eq!(violations.len(), 3 * 3);
            assert!(violations
                .iter()
                .all(|v| matches!(v, ConsistencyViolation::MissingMapping { .. })));
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = svc.export(&draft.id, None).await.unwrap_err();
    assert!(matches!(err, DocumentError::Inconsistent { .. }));
    assert!(!svc.get_document(&draft.id).await.unwrap().is_published());
}

#[tokio::test]
async fn test_delete_document() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();

    svc.delete_document(&draft.id).await.unwrap();
    assert!(svc.get_document(&draft.id).await.unwrap_err().is_not_found());
    assert!(svc.delete_document(&draft.id).await.unwrap_err().is_not_found());
    assert!(svc.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_documents_most_recent_first() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let older = svc.create_document(&me, &course.id).await.unwrap();
    let newer = svc.create_document(&me, &course.id).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    svc.update_document(&me, &older.id, sample_snapshot(), older.revision)
        .await
        .unwrap();

    let ids: Vec<String> = svc
        .list_documents()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![older.id, newer.id]);
}

#[tokio::test]
async fn test_capacity_helpers_feed_update() {
    let svc = memory_service();
    let me = sample_identity();
    let course = svc.create_course(&me, sample_new_course()).await.unwrap();
    let draft = svc.create_document(&me, &course.id).await.unwrap();
    let mut ids = SequentialIdGenerator::new();

    let (content, clo) = svc.add_clo(&draft.content, None, &mut ids).unwrap();
    let (content, _) = svc
        .add_assessment_method(&content, "Exam", "สอบ", 100.0, &mut ids)
        .unwrap();
    assert!(content.mappings.plo.for_clo(&clo).count() == 3);

    let saved = svc
        .update_document(&me, &draft.id, content, draft.revision)
        .await
        .unwrap();
    assert_eq!(saved.content.mappings.assessment.len(), 1);
}
