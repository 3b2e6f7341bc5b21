//! Testing utilities for the CLO workspace
//!
//! Shared fixtures: a small PLO catalog, a course, and a fully mapped
//! document.

#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use clo_document::{
    Course, DocumentConfig, DocumentService, DocumentVersion, Identity, MemoryStore, NewCourse,
};
use clo_mapping::CloSnapshot;
use clo_model::{BloomLevel, EntityId, Plo, SequentialIdGenerator, Strength};
use std::sync::Arc;

pub fn sample_identity() -> Identity {
    Identity::new("user-1", "Somchai Jaidee")
}

/// Catalog deliberately out of code order
pub fn sample_plos() -> Vec<Plo> {
    vec![
        Plo::new(EntityId::persisted("plo-3"), "PLO3", "ผลลัพธ์ 3"),
        Plo::new(EntityId::persisted("plo-1"), "PLO1", "ผลลัพธ์ 1"),
        Plo::new(EntityId::persisted("plo-2"), "PLO2", "ผลลัพธ์ 2"),
    ]
}

pub fn sample_new_course() -> NewCourse {
    NewCourse::new("CS101", "Introduction to Programming", "การเขียนโปรแกรมเบื้องต้น", 3)
        .with_description("Basic programming", "การเขียนโปรแกรมพื้นฐาน")
        .with_faculty("Science", "Computer Science")
        .with_prerequisites(vec!["CS100".into()])
}

pub fn sample_course() -> Course {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    sample_new_course().into_course("course-1".into(), "user-1".into(), now)
}

/// Three CLOs, two teaching methods, two assessment methods, three PLOs,
/// with some values set; still carries temporary ids
pub fn sample_snapshot() -> CloSnapshot {
    let mut ids = SequentialIdGenerator::new();
    let s = CloSnapshot::with_plos(sample_plos());

    let (s, c1) = s.add_clo(None, BloomLevel::Remember, &mut ids).unwrap();
    let (s, c2) = s.add_clo(None, BloomLevel::Apply, &mut ids).unwrap();
    let (s, _c3) = s.add_clo(None, BloomLevel::Create, &mut ids).unwrap();
    let (s, lecture) = s.add_teaching_method("Lecture", "บรรยาย", &mut ids);
    let (s, _lab) = s.add_teaching_method("Lab", "ปฏิบัติการ", &mut ids);
    let (s, exam) = s.add_assessment_method("Exam", "สอบ", 60.0, &mut ids).unwrap();
    let (s, project) = s.add_assessment_method("Project", "โครงงาน", 40.0, &mut ids).unwrap();

    s.set_used(&c1, &lecture, true)
        .and_then(|s| s.set_percentage(&c1, &exam, 30.0))
        .and_then(|s| s.set_percentage(&c1, &project, 20.0))
        .and_then(|s| s.set_percentage(&c2, &exam, 100.0))
        .and_then(|s| s.set_strength(&c2, &EntityId::persisted("plo-1"), Strength::High))
        .unwrap()
}

pub fn sample_document() -> DocumentVersion {
    let course = sample_course();
    let now = course.created_at;
    DocumentVersion::draft("doc-1".into(), course, "user-1".into(), sample_snapshot(), now)
}

pub fn memory_service() -> DocumentService<MemoryStore> {
    memory_service_with(DocumentConfig::default())
}

pub fn memory_service_with(config: DocumentConfig) -> DocumentService<MemoryStore> {
    DocumentService::new(Arc::new(MemoryStore::with_plos(sample_plos())), config)
}
