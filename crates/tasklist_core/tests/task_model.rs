use tasklist_core::{Task, TaskId, TaskValidationError};

#[test]
fn task_serialization_uses_stored_record_fields() {
    let mut task = Task::with_parts(
        TaskId::parse("1739900000000").unwrap(),
        "Buy milk",
        "2/18/2025, 6:13:20 PM",
    )
    .unwrap();
    task.toggle();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "1739900000000",
            "text": "Buy milk",
            "completed": true,
            "createdAt": "2/18/2025, 6:13:20 PM"
        })
    );

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_defaults_missing_optional_fields() {
    let value = serde_json::json!({ "id": "abc", "text": "legacy" });

    let task: Task = serde_json::from_value(value).unwrap();
    assert_eq!(task.id.as_str(), "abc");
    assert!(!task.completed);
    assert!(task.created_at.is_empty());
}

#[test]
fn deserialize_does_not_revalidate_text() {
    let value = serde_json::json!({
        "id": "abc",
        "text": "   ",
        "completed": false,
        "createdAt": "1/1/2025, 9:00:00 AM"
    });

    let task: Task = serde_json::from_value(value).unwrap();
    assert_eq!(task.text, "   ");
}

#[test]
fn created_at_uses_locale_style_display_format() {
    let task = Task::new("stamp me").unwrap();
    let (date, time) = task
        .created_at
        .split_once(", ")
        .expect("date and time are comma separated");

    assert_eq!(date.split('/').count(), 3);
    assert!(time.ends_with(" AM") || time.ends_with(" PM"));
    assert_eq!(time.matches(':').count(), 2);
}

#[test]
fn task_id_rejects_blank_values() {
    assert_eq!(TaskId::parse("  ").unwrap_err(), TaskValidationError::EmptyId);
    assert_eq!(TaskId::parse("42").unwrap().to_string(), "42");
}

#[test]
fn with_parts_rejects_blank_text() {
    let err = Task::with_parts(TaskId::generate(), "\n", "now").unwrap_err();
    assert_eq!(err, TaskValidationError::EmptyText);
}
