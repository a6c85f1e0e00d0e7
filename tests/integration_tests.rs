use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use yamlet::{
    from_str, parse, parse_all, parse_documents, stringify, to_string, yaml, Error, Mapping,
    ParseOptions, Schema, SortKeys, StringifyOptions, Value,
};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
}

fn load(text: &str) -> Value {
    parse(text, &ParseOptions::default()).unwrap()
}

fn load_err(text: &str) -> Error {
    parse(text, &ParseOptions::default()).unwrap_err()
}

fn dump(value: &Value) -> String {
    stringify(value, &StringifyOptions::default()).unwrap()
}

fn mapping(entries: &[(&str, Value)]) -> Value {
    Value::Mapping(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<Mapping>(),
    )
}

// Loading

#[test]
fn test_block_mapping_with_flow_sequence() {
    let value = load("name: web\nports: [80, 443]\nenabled: true\n");
    assert_eq!(
        value,
        mapping(&[
            ("name", Value::from("web")),
            ("ports", yaml!([80, 443])),
            ("enabled", Value::Bool(true)),
        ])
    );
}

#[test]
fn test_nested_block_collections() {
    let value = load("servers:\n  - host: a\n    port: 1\n  - host: b\n    port: 2\n");
    let servers = value.get("servers").and_then(Value::as_sequence).unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[1].get("host"), Some(&Value::from("b")));
    assert_eq!(servers[1].get("port"), Some(&Value::Int(2)));
}

#[test]
fn test_sequence_at_parent_indentation() {
    let value = load("key:\n- a\n- b\n");
    assert_eq!(value, mapping(&[("key", yaml!(["a", "b"]))]));
}

#[test]
fn test_explicit_keys_allow_compact_collections() {
    let value = load("? k\n: v\n? - a\n  - b\n: - c\n  - d\n? lone\n");
    assert_eq!(
        value,
        yaml!({"k": "v", "a,b": ["c", "d"], "lone": null})
    );
}

#[test]
fn test_core_scalars() {
    assert_eq!(load("~"), Value::Null);
    assert_eq!(load("null"), Value::Null);
    assert_eq!(load("True"), Value::Bool(true));
    assert_eq!(load("0x1F"), Value::Int(31));
    assert_eq!(load("0o17"), Value::Int(15));
    assert_eq!(load("0b101"), Value::Int(5));
    assert_eq!(load("-42"), Value::Int(-42));
    assert_eq!(load("1.5e3"), Value::Float(1500.0));
    assert_eq!(load("-.inf"), Value::Float(f64::NEG_INFINITY));
    assert!(load(".nan").as_f64().unwrap().is_nan());
    assert_eq!(load("yes"), Value::from("yes"));
}

#[test]
fn test_quoted_scalars() {
    assert_eq!(load("'it''s'"), Value::from("it's"));
    assert_eq!(load("\"a\\tb\\u00e9\""), Value::from("a\tb\u{e9}"));
    assert_eq!(load("\"x\\\n  y\""), Value::from("xy"));
    assert_eq!(load("'123'"), Value::from("123"));
}

#[test]
fn test_block_scalars() {
    assert_eq!(load("|\n  a\n  b\n"), Value::from("a\nb\n"));
    assert_eq!(load(">\n  a\n  b\n"), Value::from("a b\n"));
    assert_eq!(load("|-\n  a\n"), Value::from("a"));
    assert_eq!(load("|+\n  a\n\n"), Value::from("a\n\n"));
    assert_eq!(load("k: |1\n   a\n"), yaml!({"k": "  a\n"}));
    assert_eq!(load("|3-\n   a\n  b\n"), Value::from(" a\nb"));
}

#[test]
fn test_comments_are_ignored() {
    let value = load("# heading\na: 1 # trailing\n# tail\n");
    assert_eq!(value, mapping(&[("a", Value::Int(1))]));
}

#[test]
fn test_empty_input_is_null() {
    assert_eq!(load(""), Value::Null);
    assert_eq!(load("# only a comment\n"), Value::Null);
}

#[test]
fn test_anchors_and_aliases() {
    let value = load("a: &x [1, 2]\nb: *x\n");
    assert_eq!(value.get("a"), value.get("b"));
    assert_eq!(value.get("b"), Some(&yaml!([1, 2])));
}

#[test]
fn test_unknown_alias() {
    let err = load_err("a: *missing\n");
    assert!(err.is_syntax());
    assert!(err.to_string().contains("unidentified alias \"missing\""));
}

#[test]
fn test_merge_keys() {
    let value = load("base: &b {x: 1, y: 1}\nderived:\n  <<: *b\n  y: 2\n");
    let derived = value.get("derived").unwrap();
    assert_eq!(derived.get("x"), Some(&Value::Int(1)));
    assert_eq!(derived.get("y"), Some(&Value::Int(2)));
}

#[test]
fn test_merge_from_sequence_keeps_first_source() {
    let value = load("a: &a {k: 1}\nb: &b {k: 2, m: 3}\nc:\n  <<: [*a, *b]\n");
    let merged = value.get("c").unwrap();
    assert_eq!(merged.get("k"), Some(&Value::Int(1)));
    assert_eq!(merged.get("m"), Some(&Value::Int(3)));
}

#[test]
fn test_merge_rejects_scalars() {
    let err = load_err("a:\n  <<: 1\n");
    assert!(err
        .to_string()
        .contains("the provided source object is unacceptable"));
}

#[test]
fn test_duplicate_keys() {
    let err = load_err("a: 1\na: 2\n");
    assert_eq!(
        err.message(),
        Some("Cannot store mapping pair: duplicated key")
    );
    assert_eq!(err.mark().map(|m| m.line()), Some(2));

    let options = ParseOptions::new().with_allow_duplicate_keys(true);
    let value = parse("a: 1\na: 2\n", &options).unwrap();
    assert_eq!(value, mapping(&[("a", Value::Int(2))]));
}

#[test]
fn test_unterminated_quote() {
    let err = load_err("a: 'open\n");
    assert_eq!(
        err.message(),
        Some("Unexpected end of the stream within a single quoted scalar")
    );
}

#[test]
fn test_error_display_has_snippet() {
    let err = load_err("a: 1\na: 2\n");
    let text = err.to_string();
    assert!(text.starts_with("Cannot store mapping pair: duplicated key at line 2"));
    assert!(text.contains("    a: 2\n"));
}

#[test]
fn test_explicit_tags() {
    assert_eq!(load("!!str 123"), Value::from("123"));
    assert_eq!(load("!!int '42'"), Value::Int(42));
    assert_eq!(load("!!binary SGVsbG8="), Value::Binary(b"Hello".to_vec()));
    assert_eq!(load("! 12"), Value::from("12"));
}

#[test]
fn test_unknown_tag() {
    let err = load_err("!!foo bar");
    assert!(err
        .to_string()
        .contains("Cannot resolve unknown tag !<tag:yaml.org,2002:foo>"));
}

#[test]
fn test_tag_directive_expands_handles() {
    let value = load("%TAG !e! tag:yaml.org,2002:\n---\n!e!int '7'\n");
    assert_eq!(value, Value::Int(7));
}

#[test]
fn test_duplicate_yaml_directive() {
    let err = load_err("%YAML 1.2\n%YAML 1.2\n--- a\n");
    assert!(err.to_string().contains("duplication of %YAML directive"));
}

#[test]
fn test_unknown_directive_warns() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = ParseOptions::new().with_on_warning(move |err| {
        sink.lock().unwrap().push(err.to_string());
    });
    let value = parse("%FOO bar\n--- a\n", &options).unwrap();
    assert_eq!(value, Value::from("a"));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].starts_with("unknown document directive \"FOO\""));
}

#[test]
fn test_timestamps() {
    let value = load("2001-12-14");
    let ts = value.as_timestamp().unwrap();
    assert_eq!(ts.to_rfc3339(), "2001-12-14T00:00:00+00:00");

    let value = load("2001-12-14t21:59:43.10-05:00");
    let ts = value.as_timestamp().unwrap();
    assert_eq!(ts.to_rfc3339(), "2001-12-15T02:59:43.100+00:00");
}

#[test]
fn test_yaml_collection_types() {
    let set = load("!!set {a, b}\n");
    assert!(matches!(&set, Value::Set(items) if items.len() == 2));

    let omap = load("!!omap\n- a: 1\n- b: 2\n");
    assert!(matches!(&omap, Value::OrderedMap(entries) if entries.len() == 2));

    let pairs = load("!!pairs\n- a: 1\n- a: 2\n");
    assert_eq!(
        pairs,
        Value::Pairs(vec![
            ("a".to_string(), Value::Int(1)),
            ("a".to_string(), Value::Int(2)),
        ])
    );
}

#[test]
fn test_omap_rejects_duplicate_keys() {
    let err = load_err("!!omap\n- a: 1\n- a: 2\n");
    assert!(err.to_string().contains("!<tag:yaml.org,2002:omap>"));
}

#[test]
fn test_schemas() {
    let failsafe = ParseOptions::new().with_schema(Schema::failsafe());
    assert_eq!(parse("1", &failsafe).unwrap(), Value::from("1"));
    assert_eq!(parse("null", &failsafe).unwrap(), Value::from("null"));

    let json = ParseOptions::new().with_schema(Schema::json());
    assert_eq!(parse("2001-12-14", &json).unwrap(), Value::from("2001-12-14"));

    let err = parse("!!js/regexp /a/", &ParseOptions::default()).unwrap_err();
    assert!(err.is_syntax());

    let extended = ParseOptions::new().with_schema(Schema::extended());
    assert_eq!(
        parse("!!js/regexp /a+b/gi", &extended).unwrap(),
        Value::Regexp {
            source: "a+b".to_string(),
            flags: "gi".to_string()
        }
    );
    assert_eq!(parse("!!js/undefined ''", &extended).unwrap(), Value::Null);
}

#[test]
fn test_multiple_documents() {
    let docs = parse_all("--- a\n--- b\n...\n--- c\n", &ParseOptions::default()).unwrap();
    assert_eq!(docs, vec![Value::from("a"), Value::from("b"), Value::from("c")]);

    assert!(matches!(load_err("a\n---\nb\n"), Error::MultipleDocuments));
}

#[test]
fn test_documents_iterator() {
    let mut docs = parse_documents("--- 1\n--- [\n--- 3\n", &ParseOptions::default());
    assert_eq!(docs.next().unwrap().unwrap(), Value::Int(1));
    assert!(docs.next().unwrap().is_err());
    assert!(docs.next().is_none());
}

#[test]
fn test_bom_and_crlf() {
    let value = load("\u{FEFF}a: 1\r\nb: 2\r\n");
    assert_eq!(value, mapping(&[("a", Value::Int(1)), ("b", Value::Int(2))]));
}

// Dumping

#[test]
fn test_dump_scalars() {
    assert_eq!(dump(&Value::Null), "null\n");
    assert_eq!(dump(&Value::Bool(false)), "false\n");
    assert_eq!(dump(&Value::Int(-3)), "-3\n");
    assert_eq!(dump(&Value::Float(1.0)), "1.0\n");
    assert_eq!(dump(&Value::from("plain text")), "plain text\n");
    assert_eq!(dump(&Value::from("123")), "'123'\n");
    assert_eq!(dump(&Value::from("null")), "'null'\n");
    assert_eq!(dump(&Value::from(" lead")), "' lead'\n");
    assert_eq!(dump(&Value::from("bell\u{7}")), "\"bell\\a\"\n");
    assert_eq!(dump(&Value::from("a\nb")), "|-\n  a\n  b\n");
}

#[test]
fn test_dump_nested_collections() {
    let value = yaml!({
        "items": [{"a": 1, "b": 2}],
        "empty_list": [],
        "empty_map": {}
    });
    assert_eq!(
        dump(&value),
        "items:\n  - a: 1\n    b: 2\nempty_list: []\nempty_map: {}\n"
    );
}

#[test]
fn test_dump_without_array_indent() {
    let value = yaml!({"items": [{"a": 1, "b": 2}]});
    let options = StringifyOptions::new().with_array_indent(false);
    assert_eq!(
        stringify(&value, &options).unwrap(),
        "items:\n- a: 1\n  b: 2\n"
    );
}

#[test]
fn test_dump_flow_level() {
    let value = yaml!({"a": {"b": [1, 2]}});
    let options = StringifyOptions::new().with_flow_level(Some(1));
    assert_eq!(stringify(&value, &options).unwrap(), "a: {b: [1, 2]}\n");

    let options = options.with_flow_level(Some(0)).with_condense_flow(true);
    assert_eq!(
        stringify(&value, &options).unwrap(),
        "{\"a\":{\"b\":[1,2]}}\n"
    );
}

#[test]
fn test_dump_sort_keys() {
    let value = yaml!({"b": 1, "c": 2, "a": 3});
    let ascending = StringifyOptions::new().with_sort_keys(SortKeys::Ascending);
    assert_eq!(stringify(&value, &ascending).unwrap(), "a: 3\nb: 1\nc: 2\n");

    let descending = StringifyOptions::new().with_sort_keys(SortKeys::by(|a, b| b.cmp(a)));
    assert_eq!(stringify(&value, &descending).unwrap(), "c: 2\nb: 1\na: 3\n");
}

#[test]
fn test_dump_styles() {
    let options = StringifyOptions::new()
        .with_style("!!null", "canonical")
        .with_style("!!bool", "uppercase")
        .with_style("tag:yaml.org,2002:int", "binary");
    let value = yaml!([null, true, 5]);
    assert_eq!(
        stringify(&value, &options).unwrap(),
        "- ~\n- TRUE\n- 0b101\n"
    );

    let options = StringifyOptions::new().with_style("!!int", "roman");
    let err = stringify(&Value::Int(1), &options).unwrap_err();
    assert!(matches!(err, Error::UnknownStyle { .. }));
}

#[test]
fn test_dump_compat_mode() {
    assert_eq!(dump(&Value::from("on")), "'on'\n");
    let options = StringifyOptions::new().with_compat_mode(false);
    assert_eq!(stringify(&Value::from("on"), &options).unwrap(), "on\n");
}

#[test]
fn test_dump_unrepresentable() {
    let value = mapping(&[
        ("a", Value::Int(1)),
        (
            "re",
            Value::Regexp {
                source: "x".to_string(),
                flags: String::new(),
            },
        ),
    ]);
    let err = stringify(&value, &StringifyOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Cannot stringify regexp");

    let options = StringifyOptions::new().with_skip_invalid(true);
    assert_eq!(stringify(&value, &options).unwrap(), "a: 1\n");

    let extended = StringifyOptions::new().with_schema(Schema::extended());
    assert_eq!(
        stringify(&value, &extended).unwrap(),
        "a: 1\nre: !<tag:yaml.org,2002:js/regexp> /x/\n"
    );
}

#[test]
fn test_dump_binary_is_tagged() {
    let yaml = dump(&Value::Binary(b"Hello".to_vec()));
    assert_eq!(yaml, "!<tag:yaml.org,2002:binary> SGVsbG8=\n");
    assert_eq!(load(&yaml), Value::Binary(b"Hello".to_vec()));
}

#[test]
fn test_dump_shared_nodes() {
    let shared = yaml!([1, 2]);
    let root = Value::Sequence(vec![shared.clone(), shared].into());
    assert_eq!(dump(&root), "- &ref_0\n  - 1\n  - 2\n- *ref_0\n");

    let options = StringifyOptions::new().with_use_anchors(false);
    assert_eq!(
        stringify(&root, &options).unwrap(),
        "- - 1\n  - 2\n- - 1\n  - 2\n"
    );
}

#[test]
fn test_dump_long_lines_fold() {
    let text = "lorem ipsum dolor ".repeat(10);
    let text = text.trim_end();
    let yaml = dump(&Value::from(text));
    assert!(yaml.starts_with(">-\n  "));
    assert!(yaml.lines().all(|line| line.chars().count() <= 82));
    assert_eq!(load(&yaml), Value::from(text));

    let options = StringifyOptions::new().with_line_width(None);
    let yaml = stringify(&Value::from(text), &options).unwrap();
    assert_eq!(yaml, format!("{text}\n"));
}

#[test]
fn test_dump_indent() {
    let value = yaml!({"a": {"b": 1}});
    let options = StringifyOptions::new().with_indent(4);
    assert_eq!(stringify(&value, &options).unwrap(), "a:\n    b: 1\n");
}

#[test]
fn test_dump_load_round_trip() {
    let value = yaml!({
        "string": "hello",
        "quoted": "true",
        "multi": "line one\nline two\n",
        "number": 42,
        "float": 2.5,
        "nested": {"list": [1, "two", null, false]},
        "empty": ""
    });
    assert_eq!(load(&dump(&value)), value);
}

// Serde

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let yaml = to_string(&user).unwrap();
    let user_back: User = from_str(&yaml).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec![],
        },
        items: vec![
            Product {
                sku: "A-1".to_string(),
                price: 9.99,
                quantity: 2,
            },
            Product {
                sku: "B-2".to_string(),
                price: 20.0,
                quantity: 1,
            },
        ],
        total: 39.98,
    };

    let yaml = to_string(&order).unwrap();
    assert!(yaml.contains("customer:\n  id: 123\n"));
    assert!(yaml.contains("tags: []\n"));
    let order_back: Order = from_str(&yaml).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_strings_that_look_like_other_types() {
    let values = vec![
        "true".to_string(),
        "42".to_string(),
        "1.5".to_string(),
        "~".to_string(),
        "- item".to_string(),
        "key: value".to_string(),
        "#comment".to_string(),
        String::new(),
    ];
    let yaml = to_string(&values).unwrap();
    let back: Vec<String> = from_str(&yaml).unwrap();
    assert_eq!(values, back);
}

#[test]
fn test_deserialize_type_mismatch() {
    let result: Result<User, _> = from_str("id: not a number\nname: x\nactive: true\ntags: []\n");
    assert!(result.is_err());
}
