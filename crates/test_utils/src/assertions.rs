//! Custom Test Assertions
//!
//! Provides assertion helpers for CRM request items (the objects inside a
//! `set` envelope) that give more meaningful failure messages than indexing
//! into JSON by hand.

use serde_json::Value;

/// Returns the values array sent for a custom field id, if any
pub fn custom_field_values(item: &Value, field_id: u64) -> Option<&Vec<Value>> {
    item.get("custom_fields")?
        .as_array()?
        .iter()
        .find(|field| field["id"].as_u64() == Some(field_id))?
        .get("values")?
        .as_array()
}

/// Asserts that an item is a create: no `id` key
pub fn assert_create_item(item: &Value) {
    assert!(
        item.get("id").is_none(),
        "Expected a create item without id, got {item}"
    );
}

/// Asserts that an item updates the object with `id`
pub fn assert_update_item(item: &Value, id: u64) {
    assert_eq!(
        item.get("id").and_then(Value::as_u64),
        Some(id),
        "Expected an update item for id {id}, got {item}"
    );
}

/// Asserts that a contact item links exactly the given lead
pub fn assert_linked_to(item: &Value, lead_id: u64) {
    assert_eq!(
        item["linked_leads_id"],
        serde_json::json!([lead_id]),
        "Expected contact linked to lead {lead_id}, got {item}"
    );
}

/// Asserts the single value sent for a custom field
pub fn assert_custom_field(item: &Value, field_id: u64, expected: impl Into<Value>) {
    let expected = expected.into();
    let values = custom_field_values(item, field_id)
        .unwrap_or_else(|| panic!("Custom field {field_id} missing from {item}"));
    assert_eq!(
        values.first().map(|value| &value["value"]),
        Some(&expected),
        "Custom field {field_id} has unexpected value"
    );
}

/// Asserts that an item carries no custom fields at all
pub fn assert_no_custom_fields(item: &Value) {
    let count = item
        .get("custom_fields")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    assert_eq!(count, 0, "Expected no custom fields, got {item}");
}
