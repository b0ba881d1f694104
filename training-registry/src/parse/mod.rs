//! Forgiving intent parsing
//!
//! The presentation layer sends intents as JSON. The parser accepts several
//! shapes and normalizes them to a typed [`Intent`] holding the command struct:
//!
//! - `{"op": "add subject", "name": "Math"}`
//! - `{"verb": "add", "noun": "subject", "name": "Math"}`
//! - `{"add": "subject", "name": "Math"}`
//!
//! An optional `"actor"` key attributes the resulting log entry.

use crate::batch::{AddBatch, DeleteBatch, ListBatches};
use crate::context::RegistryContext;
use crate::course::{AddCourse, DeleteCourse, ListCourses};
use crate::error::{RegistryError, Result};
use crate::processor::RegistryOperationProcessor;
use crate::student::{AddStudent, DeleteStudent, ListStudents};
use crate::subject::{AddSubject, DeleteSubject, ListSubjects};
use crate::summary::GetSummary;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use training_operations::{Operation, OperationProcessor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Add,
    Delete,
    List,
}

impl Verb {
    pub fn from_alias(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "add" | "create" | "new" | "insert" => Some(Self::Add),
            "delete" | "remove" | "rm" | "del" => Some(Self::Delete),
            "list" | "ls" | "get" | "show" => Some(Self::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Noun {
    Subject,
    Course,
    Batch,
    Student,
    Summary,
}

impl Noun {
    /// Singular and plural forms are both accepted
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "subject" | "subjects" => Some(Self::Subject),
            "course" | "courses" => Some(Self::Course),
            "batch" | "batches" | "section" | "sections" => Some(Self::Batch),
            "student" | "students" => Some(Self::Student),
            "summary" | "dashboard" => Some(Self::Summary),
            _ => None,
        }
    }
}

/// One parsed request, ready to dispatch
#[derive(Debug)]
pub enum Intent {
    AddSubject(AddSubject),
    DeleteSubject(DeleteSubject),
    ListSubjects(ListSubjects),
    AddCourse(AddCourse),
    DeleteCourse(DeleteCourse),
    ListCourses(ListCourses),
    AddBatch(AddBatch),
    DeleteBatch(DeleteBatch),
    ListBatches(ListBatches),
    AddStudent(AddStudent),
    DeleteStudent(DeleteStudent),
    ListStudents(ListStudents),
    GetSummary(GetSummary),
}

impl Intent {
    fn operation(&self) -> &dyn Operation {
        match self {
            Self::AddSubject(op) => op,
            Self::DeleteSubject(op) => op,
            Self::ListSubjects(op) => op,
            Self::AddCourse(op) => op,
            Self::DeleteCourse(op) => op,
            Self::ListCourses(op) => op,
            Self::AddBatch(op) => op,
            Self::DeleteBatch(op) => op,
            Self::ListBatches(op) => op,
            Self::AddStudent(op) => op,
            Self::DeleteStudent(op) => op,
            Self::ListStudents(op) => op,
            Self::GetSummary(op) => op,
        }
    }

    /// Canonical op string of the wrapped command, e.g. "add subject"
    pub fn op_string(&self) -> String {
        self.operation().op_string()
    }

    /// Run the wrapped command through `processor`
    pub async fn dispatch<P>(&self, processor: &P, ctx: &RegistryContext) -> Result<Value>
    where
        P: OperationProcessor<RegistryContext, RegistryError>,
    {
        match self {
            Self::AddSubject(op) => processor.process(op, ctx).await,
            Self::DeleteSubject(op) => processor.process(op, ctx).await,
            Self::ListSubjects(op) => processor.process(op, ctx).await,
            Self::AddCourse(op) => processor.process(op, ctx).await,
            Self::DeleteCourse(op) => processor.process(op, ctx).await,
            Self::ListCourses(op) => processor.process(op, ctx).await,
            Self::AddBatch(op) => processor.process(op, ctx).await,
            Self::DeleteBatch(op) => processor.process(op, ctx).await,
            Self::ListBatches(op) => processor.process(op, ctx).await,
            Self::AddStudent(op) => processor.process(op, ctx).await,
            Self::DeleteStudent(op) => processor.process(op, ctx).await,
            Self::ListStudents(op) => processor.process(op, ctx).await,
            Self::GetSummary(op) => processor.process(op, ctx).await,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.op_string())
    }
}

/// An intent plus who asked for it
#[derive(Debug)]
pub struct ParsedIntent {
    pub intent: Intent,
    pub actor: Option<String>,
}

impl ParsedIntent {
    /// Dispatch, attributing the log entry to this intent's actor if it has one
    pub async fn dispatch(&self, ctx: &RegistryContext) -> Result<Value> {
        let processor = match &self.actor {
            Some(actor) => RegistryOperationProcessor::with_actor(actor.clone()),
            None => RegistryOperationProcessor::new(),
        };
        self.intent.dispatch(&processor, ctx).await
    }
}

/// Parse a single intent object or an array of them
pub fn parse_input(input: Value) -> Result<Vec<ParsedIntent>> {
    match input {
        Value::Array(arr) => arr.into_iter().map(parse_intent).collect(),
        Value::Object(obj) => Ok(vec![parse_intent(Value::Object(obj))?]),
        _ => Err(RegistryError::parse("input must be an object or array")),
    }
}

/// Parse one intent object
pub fn parse_intent(input: Value) -> Result<ParsedIntent> {
    let Value::Object(obj) = input else {
        return Err(RegistryError::parse("intent must be an object"));
    };

    let (verb, noun, mut params) = extract_operation(&obj)?;
    let actor = obj
        .get("actor")
        .and_then(Value::as_str)
        .map(str::to_string);

    normalize_params(&mut params);
    let intent = build_intent(verb, noun, params)?;

    Ok(ParsedIntent { intent, actor })
}

fn extract_operation(obj: &Map<String, Value>) -> Result<(Verb, Noun, Map<String, Value>)> {
    // "op": "verb noun"
    if let Some(op_str) = obj.get("op").and_then(Value::as_str) {
        return match parse_op_string(op_str) {
            Some((verb, noun)) => Ok((verb, noun, filter_keys(obj, &["op"]))),
            None => Err(RegistryError::parse(format!("unknown operation: {}", op_str))),
        };
    }

    // separate verb/noun fields
    if let (Some(verb_str), Some(noun_str)) = (
        obj.get("verb").and_then(Value::as_str),
        obj.get("noun").and_then(Value::as_str),
    ) {
        if let (Some(verb), Some(noun)) = (Verb::from_alias(verb_str), Noun::parse(noun_str)) {
            return Ok((verb, noun, filter_keys(obj, &["verb", "noun"])));
        }
        return Err(RegistryError::parse(format!(
            "unknown operation: {} {}",
            verb_str, noun_str
        )));
    }

    // shorthand {"add": "subject"}
    for (key, value) in obj {
        if let (Some(verb), Some(noun)) = (
            Verb::from_alias(key),
            value.as_str().and_then(Noun::parse),
        ) {
            return Ok((verb, noun, filter_keys(obj, &[key.as_str()])));
        }
    }

    Err(RegistryError::parse("cannot determine operation from input"))
}

fn parse_op_string(s: &str) -> Option<(Verb, Noun)> {
    let mut parts = s.split_whitespace();
    let verb = Verb::from_alias(parts.next()?)?;
    let noun = Noun::parse(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((verb, noun))
}

/// Drop the operation keys and metadata, keeping only parameters
fn filter_keys(obj: &Map<String, Value>, op_keys: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| k.as_str() != "actor" && !op_keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Resolve form-style key aliases to parameter names
fn normalize_params(params: &mut Map<String, Value>) {
    let aliases: &[(&[&str], &str)] = &[
        (&["subjectName", "courseName", "batchName", "studentName"], "name"),
        (&["selectedSubjects", "subjectNames"], "subjects"),
        (&["startTime", "start_time"], "start"),
        (&["endTime", "end_time"], "end"),
        (&["studentId", "student_id"], "id"),
    ];

    for (from_keys, to_key) in aliases {
        for from_key in *from_keys {
            if let Some(value) = params.remove(*from_key) {
                if !params.contains_key(*to_key) {
                    params.insert(to_key.to_string(), value);
                }
            }
        }
    }
}

fn build_intent(verb: Verb, noun: Noun, params: Map<String, Value>) -> Result<Intent> {
    let params = Value::Object(params);
    let intent = match (verb, noun) {
        (Verb::Add, Noun::Subject) => Intent::AddSubject(decode(params)?),
        (Verb::Delete, Noun::Subject) => Intent::DeleteSubject(decode(params)?),
        (Verb::List, Noun::Subject) => Intent::ListSubjects(decode(params)?),
        (Verb::Add, Noun::Course) => Intent::AddCourse(decode(params)?),
        (Verb::Delete, Noun::Course) => Intent::DeleteCourse(decode(params)?),
        (Verb::List, Noun::Course) => Intent::ListCourses(decode(params)?),
        (Verb::Add, Noun::Batch) => Intent::AddBatch(decode(params)?),
        (Verb::Delete, Noun::Batch) => Intent::DeleteBatch(decode(params)?),
        (Verb::List, Noun::Batch) => Intent::ListBatches(decode(params)?),
        (Verb::Add, Noun::Student) => Intent::AddStudent(decode(params)?),
        (Verb::Delete, Noun::Student) => Intent::DeleteStudent(decode(params)?),
        (Verb::List, Noun::Student) => Intent::ListStudents(decode(params)?),
        (Verb::List, Noun::Summary) => Intent::GetSummary(decode(params)?),
        (verb, Noun::Summary) => {
            return Err(RegistryError::parse(format!(
                "summary is read-only, cannot {:?} it",
                verb
            )))
        }
    };
    Ok(intent)
}

fn decode<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| RegistryError::parse(format!("invalid parameters: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use serde_json::json;

    fn single(input: Value) -> ParsedIntent {
        let mut intents = parse_input(input).unwrap();
        assert_eq!(intents.len(), 1);
        intents.remove(0)
    }

    #[test]
    fn test_parse_explicit_op() {
        let parsed = single(json!({ "op": "add subject", "name": "Math" }));
        match parsed.intent {
            Intent::AddSubject(op) => assert_eq!(op.name, "Math"),
            other => panic!("unexpected intent: {:?}", other),
        }
        assert_eq!(parsed.actor, None);
    }

    #[test]
    fn test_parse_verb_noun_fields() {
        let parsed = single(json!({
            "verb": "create",
            "noun": "course",
            "name": "Sci",
            "subjects": ["Math", "Physics"]
        }));
        match parsed.intent {
            Intent::AddCourse(op) => {
                assert_eq!(op.name, "Sci");
                assert_eq!(op.subjects, ["Math", "Physics"]);
            }
            other => panic!("unexpected intent: {:?}", other),
        }
    }

    #[test]
    fn test_parse_shorthand() {
        let parsed = single(json!({ "rm": "batch", "name": "A" }));
        assert!(matches!(parsed.intent, Intent::DeleteBatch(_)));
        assert_eq!(parsed.intent.op_string(), "delete batch");
    }

    #[test]
    fn test_plural_nouns_and_list_aliases() {
        let parsed = single(json!({ "op": "ls batches", "course": "Sci" }));
        match parsed.intent {
            Intent::ListBatches(op) => assert_eq!(op.course.as_deref(), Some("Sci")),
            other => panic!("unexpected intent: {:?}", other),
        }

        let parsed = single(json!({ "op": "get dashboard" }));
        assert!(matches!(parsed.intent, Intent::GetSummary(_)));
    }

    #[test]
    fn test_form_aliases() {
        let parsed = single(json!({
            "op": "add batch",
            "batchName": "A",
            "course": "Sci",
            "startTime": "09:00",
            "endTime": "10:00"
        }));
        match parsed.intent {
            Intent::AddBatch(op) => {
                assert_eq!(op.name, "A");
                assert_eq!(op.start, "09:00");
                assert_eq!(op.end, "10:00");
            }
            other => panic!("unexpected intent: {:?}", other),
        }
    }

    #[test]
    fn test_student_batch_field_is_section() {
        let parsed = single(json!({
            "op": "add student",
            "name": "Ann",
            "course": "Sci",
            "batch": "A"
        }));
        match parsed.intent {
            Intent::AddStudent(op) => assert_eq!(op.section, "A"),
            other => panic!("unexpected intent: {:?}", other),
        }
    }

    #[test]
    fn test_actor_is_extracted() {
        let parsed = single(json!({ "op": "add subject", "name": "Math", "actor": "admin" }));
        assert_eq!(parsed.actor.as_deref(), Some("admin"));
    }

    #[test]
    fn test_array_input() {
        let intents = parse_input(json!([
            { "op": "add subject", "name": "Math" },
            { "op": "add subject", "name": "Physics" }
        ]))
        .unwrap();
        assert_eq!(intents.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        for input in [
            json!("add subject"),
            json!({ "op": "fly subject" }),
            json!({ "verb": "add", "noun": "instructor" }),
            json!({ "name": "Math" }),
            json!({ "op": "add summary" }),
            json!({ "op": "add batch", "name": "A" }),
        ] {
            let err = parse_input(input.clone()).unwrap_err();
            assert!(
                matches!(err, RegistryError::Parse { .. }),
                "expected parse error for {}, got {:?}",
                input,
                err
            );
        }
    }

    #[tokio::test]
    async fn test_dispatch_records_actor() {
        let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;

        let parsed = single(json!({ "op": "add subject", "name": "Math", "actor": "admin" }));
        let value = parsed.dispatch(&ctx).await.unwrap();
        assert_eq!(value["name"], "Math");

        let activity = ctx.read_activity(None).await;
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].op, "add subject");
        assert_eq!(activity[0].actor.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_dispatch_returns_validation_message() {
        let ctx = RegistryContext::in_memory(&RegistryConfig::default()).await;

        let parsed = single(json!({ "op": "add subject", "name": "  " }));
        let err = parsed.dispatch(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "Subject name required");
    }
}
