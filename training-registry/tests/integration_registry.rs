//! End-to-end tests of the integrity rules and persistence

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use training_registry::{
    batch::{AddBatch, DeleteBatch, ListBatches},
    course::{AddCourse, DeleteCourse},
    student::{AddStudent, DeleteStudent, ListStudents},
    subject::{AddSubject, DeleteSubject, ListSubjects},
    Collection, Execute, JsonFileStore, MemoryStore, MissingDeletePolicy, RegistryConfig,
    RegistryContext, RegistryError, RegistryPolicy, SnapshotStore, ValidationError,
};

async fn science(ctx: &RegistryContext) {
    for name in ["Math", "Physics"] {
        AddSubject::new(name).execute(ctx).await.into_result().unwrap();
    }
    AddCourse::new("Sci", ["Math", "Physics"])
        .execute(ctx)
        .await
        .into_result()
        .unwrap();
}

#[tokio::test]
async fn test_subject_names_are_unique_ignoring_case() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;

    AddSubject::new("Math").execute(&ctx).await.into_result().unwrap();
    for attempt in ["Math", "math", "  MATH "] {
        let err = AddSubject::new(attempt)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::DuplicateSubject {
                name: attempt.trim().to_string()
            })
        );
    }

    let listed = ListSubjects::new()
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    assert_eq!(listed["count"], 1);
}

#[tokio::test]
async fn test_course_needs_two_subjects() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;

    AddSubject::new("Math").execute(&ctx).await.into_result().unwrap();
    let err = AddCourse::new("Sci", ["Math"])
        .execute(&ctx)
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(err.to_string(), "Create at least 2 subjects first");

    AddSubject::new("Physics").execute(&ctx).await.into_result().unwrap();
    let err = AddCourse::new("Sci", ["Math"])
        .execute(&ctx)
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(err.to_string(), "Minimum 2 subjects required");

    AddCourse::new("Sci", ["Math", "Physics"])
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
}

#[tokio::test]
async fn test_delete_course_cascades_to_batches_and_students() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;
    science(&ctx).await;
    AddBatch::new("A", "Sci", "09:00", "10:00")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    AddStudent::new("Ann", "Sci", "A")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    let mut events = ctx.subscribe();
    let result = DeleteCourse::new("sci")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    assert_eq!(result["batches_removed"], 1);
    assert_eq!(result["students_removed"], 1);

    let event = events.recv().await.unwrap();
    assert_eq!(
        event.changed,
        vec![Collection::Courses, Collection::Batches, Collection::Students]
    );

    let snapshot = ctx.snapshot().await;
    assert!(snapshot.courses.is_empty());
    assert!(snapshot.batches.is_empty());
    assert!(snapshot.students.is_empty());
    assert_eq!(snapshot.subjects.len(), 2);
}

#[tokio::test]
async fn test_delete_subject_keeps_course() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;
    science(&ctx).await;

    DeleteSubject::new("Math")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    let course = ctx.read(|r| r.course("Sci").cloned()).await.unwrap();
    assert_eq!(course.subjects, ["Physics"]);
}

#[tokio::test]
async fn test_delete_batch_removes_its_students() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;
    science(&ctx).await;
    for (name, start, end) in [("A", "09:00", "10:00"), ("B", "10:00", "11:00")] {
        AddBatch::new(name, "Sci", start, end)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
    }
    AddStudent::new("Ann", "Sci", "A")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    AddStudent::new("Bob", "Sci", "B")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    DeleteBatch::new("a")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    let batches = ListBatches::for_course("Sci")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    assert_eq!(batches["count"], 1);
    let students = ListStudents::for_course("Sci")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    assert_eq!(students["count"], 1);
    assert_eq!(students["students"][0]["name"], "Bob");
}

#[tokio::test]
async fn test_strict_delete_policy_reports_missing() {
    let policy = RegistryPolicy {
        missing_delete: MissingDeletePolicy::Error,
        ..RegistryPolicy::default()
    };
    let ctx = RegistryContext::in_memory(&RegistryConfig::default().with_policy(policy)).await;

    let err = DeleteSubject::new("Math")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { kind: "subject", .. }));

    let err = DeleteStudent::new("01ARZ3NDEKTSV4RRFFQ69G5FAV")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { kind: "student", .. }));
}

#[tokio::test]
async fn test_round_trip_through_json_files() {
    let temp = TempDir::new().unwrap();
    let config = RegistryConfig::default().with_data_dir(temp.path());

    let student_id = {
        let ctx = RegistryContext::open_dir(&config).await;
        science(&ctx).await;
        AddBatch::new("A", "Sci", "09:00", "10:30")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let student = AddStudent::new("Ann", "Sci", "a")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        ctx.flush().await.unwrap();
        student["id"].as_str().unwrap().to_string()
    };

    let batches: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("batches.json")).unwrap())
            .unwrap();
    assert_eq!(
        batches,
        serde_json::json!([{"name": "A", "course": "Sci", "start": "09:00", "end": "10:30"}])
    );

    let ctx = RegistryContext::open_dir(&config).await;
    let snapshot = ctx.snapshot().await;
    assert_eq!(snapshot.subjects.len(), 2);
    assert_eq!(snapshot.courses[0].subjects, ["Math", "Physics"]);
    assert_eq!(snapshot.students[0].id.as_str(), student_id);
    // Section is stored with the batch's own spelling
    assert_eq!(snapshot.students[0].section, "A");
}

#[tokio::test]
async fn test_corrupt_collection_loads_empty() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp.path());
    store.save("subjects", r#"["Math", "Physics"]"#).await.unwrap();
    fs::write(temp.path().join("courses.json"), "{ not json").unwrap();

    let ctx = RegistryContext::open(Arc::new(store), &RegistryConfig::default()).await;
    let summary = ctx.read(|r| r.summary()).await;
    assert_eq!(summary.subjects, 2);
    assert_eq!(summary.courses, 0);
}

#[tokio::test]
async fn test_orphans_are_dropped_and_saved_on_open() {
    let store = Arc::new(MemoryStore::new());
    store.insert("subjects", r#"["Math", "Physics"]"#).await;
    store
        .insert("courses", r#"[{"name": "Sci", "subjects": ["math", "Ghost", "Physics"]}]"#)
        .await;
    store
        .insert(
            "batches",
            r#"[{"name": "A", "course": "Gone", "start": "09:00", "end": "10:00"}]"#,
        )
        .await;

    let ctx = RegistryContext::open(store.clone(), &RegistryConfig::default()).await;
    ctx.flush().await.unwrap();

    assert!(ctx.snapshot().await.batches.is_empty());
    assert_eq!(store.get("batches").await.as_deref(), Some("[]"));
    let courses: serde_json::Value =
        serde_json::from_str(&store.get("courses").await.unwrap()).unwrap();
    assert_eq!(
        courses,
        serde_json::json!([{"name": "Sci", "subjects": ["Math", "Physics"]}])
    );
}
