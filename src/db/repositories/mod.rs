pub mod assignment;
pub mod course;
pub mod note;
pub mod user;

/// Encodes an optional string list into the JSON text column format.
pub(crate) fn encode_list(list: Option<&Vec<String>>) -> Option<String> {
    list.and_then(|l| serde_json::to_string(l).ok())
}

/// Decodes a JSON text column back into a string list. Garbage decodes as `None`.
pub(crate) fn decode_list(raw: Option<String>) -> Option<Vec<String>> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_columns_round_trip_and_tolerate_garbage() {
        let tags = vec!["exam".to_string(), "week 3".to_string()];
        let encoded = encode_list(Some(&tags));
        assert_eq!(decode_list(encoded), Some(tags));
        assert_eq!(encode_list(None), None);
        assert_eq!(decode_list(Some("not json".to_string())), None);
    }
}
