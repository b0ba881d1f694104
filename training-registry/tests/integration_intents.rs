//! Driving the registry with JSON intents

use serde_json::json;
use training_registry::{parse::parse_input, RegistryConfig, RegistryContext};

#[tokio::test]
async fn test_intents_end_to_end() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;

    let intents = parse_input(json!([
        { "op": "add subject", "name": "Math" },
        { "op": "create subject", "subjectName": "Physics" },
        { "verb": "add", "noun": "course", "name": "Sci", "subjects": ["math", "physics"] },
        { "add": "batch", "name": "A", "course": "Sci", "start": "09:00", "end": "10:00" },
        { "op": "add student", "name": "Ann", "course": "Sci", "batch": "A", "actor": "office" }
    ]))
    .unwrap();

    let mut results = Vec::new();
    for parsed in &intents {
        results.push(parsed.dispatch(&ctx).await.unwrap());
    }

    // Subject spellings are canonicalized on the course
    assert_eq!(results[2]["subjects"], json!(["Math", "Physics"]));
    assert_eq!(results[4]["batch"], "A");

    let summary = parse_input(json!({ "op": "get summary" })).unwrap();
    let value = summary[0].dispatch(&ctx).await.unwrap();
    assert_eq!(
        value,
        json!({"subjects": 2, "courses": 1, "batches": 1, "students": 1})
    );

    let activity = ctx.read_activity(None).await;
    assert_eq!(activity.len(), 5);
    assert_eq!(activity[0].actor.as_deref(), Some("office"));
    assert_eq!(activity[1].actor, None);
}

#[tokio::test]
async fn test_overlap_reported_through_intent() {
    let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;

    for input in [
        json!({ "op": "add subject", "name": "Math" }),
        json!({ "op": "add subject", "name": "Physics" }),
        json!({ "op": "add course", "name": "Sci", "subjects": ["Math", "Physics"] }),
        json!({ "op": "add batch", "name": "A", "course": "Sci", "start": "09:00", "end": "10:00" }),
    ] {
        for parsed in parse_input(input).unwrap() {
            parsed.dispatch(&ctx).await.unwrap();
        }
    }

    let parsed = parse_input(json!({
        "op": "add batch",
        "name": "B",
        "course": "Sci",
        "startTime": "09:30",
        "endTime": "10:30"
    }))
    .unwrap();
    let err = parsed[0].dispatch(&ctx).await.unwrap_err();
    assert_eq!(err.to_string(), "Batch timing overlaps");
}
