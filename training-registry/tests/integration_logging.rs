//! Integration tests for activity logging

use training_registry::{
    batch::AddBatch,
    course::{AddCourse, ListCourses},
    subject::AddSubject,
    summary::GetSummary,
    OperationProcessor, RegistryConfig, RegistryContext, RegistryOperationProcessor,
};

#[tokio::test]
async fn test_activity_logging_end_to_end() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;
    let processor = RegistryOperationProcessor::with_actor("registrar[desk-2]");

    processor
        .process(&AddSubject::new("Math"), &ctx)
        .await
        .unwrap();
    processor
        .process(&AddSubject::new("Physics"), &ctx)
        .await
        .unwrap();
    processor
        .process(&AddCourse::new("Sci", ["Math", "Physics"]), &ctx)
        .await
        .unwrap();

    // Reads are unlogged
    processor.process(&ListCourses::new(), &ctx).await.unwrap();
    let summary = processor.process(&GetSummary::new(), &ctx).await.unwrap();
    assert_eq!(summary["courses"], 1);

    let entries = ctx.read_activity(None).await;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].op, "add course"); // Newest first
    assert_eq!(entries[1].op, "add subject");
    assert_eq!(entries[2].op, "add subject");

    for entry in &entries {
        assert_eq!(entry.actor, Some("registrar[desk-2]".to_string()));
        assert!(!entry.is_error());
    }

    assert_eq!(entries[0].input["name"], "Sci");
    assert_eq!(entries[0].output["subjects"], serde_json::json!(["Math", "Physics"]));
}

#[tokio::test]
async fn test_rejected_operations_are_logged_as_errors() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;
    let processor = RegistryOperationProcessor::new();

    processor
        .process(&AddSubject::new("Math"), &ctx)
        .await
        .unwrap();
    let err = processor
        .process(&AddSubject::new("math"), &ctx)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Duplicate subject not allowed");

    let err = processor
        .process(&AddBatch::new("A", "Sci", "09:00", "10:00"), &ctx)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown course: Sci");

    let entries = ctx.read_activity(None).await;
    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_error());
    assert_eq!(entries[0].op, "add batch");
    assert_eq!(entries[0].output["error"], "Unknown course: Sci");
    assert!(entries[1].is_error());
    assert!(!entries[2].is_error());
    assert_eq!(entries[2].actor, None);
}

#[tokio::test]
async fn test_activity_limit_from_config() {
    let config = RegistryConfig {
        activity_limit: 3,
        ..RegistryConfig::default()
    };
    let ctx = RegistryContext::in_memory(&config).await;
    let processor = RegistryOperationProcessor::new();

    for name in ["A", "B", "C", "D", "E"] {
        processor
            .process(&AddSubject::new(name), &ctx)
            .await
            .unwrap();
    }

    let entries = ctx.read_activity(None).await;
    let names: Vec<_> = entries
        .iter()
        .map(|e| e.input["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["E", "D", "C"]);
}
