use yamlet::{stringify, yaml, Mapping, Sequence, StringifyOptions, Value};

#[test]
fn test_yaml_macro_null() {
    let value = yaml!(null);
    assert_eq!(value, Value::Null);
}

#[test]
fn test_yaml_macro_booleans() {
    assert_eq!(yaml!(true), Value::Bool(true));
    assert_eq!(yaml!(false), Value::Bool(false));
}

#[test]
fn test_yaml_macro_numbers() {
    assert_eq!(yaml!(42), Value::Int(42));
    assert_eq!(yaml!(3.5), Value::Float(3.5));
    assert_eq!(yaml!(-123), Value::Int(-123));
}

#[test]
fn test_yaml_macro_strings() {
    assert_eq!(yaml!("hello world"), Value::Str("hello world".to_string()));
    assert_eq!(yaml!(""), Value::Str(String::new()));
}

#[test]
fn test_yaml_macro_sequences() {
    assert_eq!(yaml!([]), Value::Sequence(Sequence::new()));

    let mixed = yaml!([1, "hello", true, null]);
    assert_eq!(
        mixed,
        Value::Sequence(
            vec![
                Value::Int(1),
                Value::from("hello"),
                Value::Bool(true),
                Value::Null,
            ]
            .into()
        )
    );
}

#[test]
fn test_yaml_macro_mappings() {
    assert_eq!(yaml!({}), Value::Mapping(Mapping::new()));

    let user = yaml!({
        "user": {
            "id": 123,
            "name": "Bob"
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    let map = user.as_mapping().unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["user", "tags", "count"]);

    let inner = map.get("user").and_then(Value::as_mapping).unwrap();
    assert_eq!(inner.get("id"), Some(&Value::Int(123)));
    assert_eq!(inner.get("name"), Some(&Value::from("Bob")));

    let tags = map.get("tags").and_then(Value::as_sequence).unwrap();
    assert_eq!(tags[1], Value::from("developer"));
}

#[test]
fn test_yaml_macro_expressions() {
    let name = String::from("dynamic");
    let ports = vec![80u16, 443];
    let value = yaml!({"name": name, "ports": ports});
    assert_eq!(value.get("name"), Some(&Value::from("dynamic")));
    assert_eq!(value.get("ports"), Some(&yaml!([80, 443])));
}

#[test]
fn test_value_methods() {
    let null_val = yaml!(null);
    assert!(null_val.is_null());
    assert!(!null_val.is_bool());
    assert!(!null_val.is_i64());
    assert!(!null_val.is_string());
    assert!(!null_val.is_sequence());
    assert!(!null_val.is_mapping());

    let str_val = yaml!("hello");
    assert!(str_val.is_string());
    assert_eq!(str_val.as_str(), Some("hello"));

    let seq_val = yaml!([1, 2, 3]);
    assert!(seq_val.is_sequence());
    assert_eq!(seq_val.as_sequence().unwrap().len(), 3);

    assert_eq!(yaml!(2.5).kind_name(), "float");
    assert_eq!(yaml!({"k": 1}).kind_name(), "mapping");
}

#[test]
fn test_macro_value_dumps() {
    let value = yaml!({"name": "Alice", "scores": [1, 2]});
    let yaml = stringify(&value, &StringifyOptions::default()).unwrap();
    assert_eq!(yaml, "name: Alice\nscores:\n  - 1\n  - 2\n");
    assert_eq!(value.to_string(), "name: Alice\nscores:\n  - 1\n  - 2");
}
