//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use std::error::Error;
use yamlet::{parse, stringify, to_value, yaml, ParseOptions, SortKeys, StringifyOptions, Value};

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

const CONFIG: &str = "\
defaults: &defaults
  host: localhost
  port: 8080
production:
  <<: *defaults
  host: example.com
features: [auth, logging, metrics]
";

fn main() -> Result<(), Box<dyn Error>> {
    // Load a document with anchors and merge keys
    let config = parse(CONFIG, &ParseOptions::default())?;

    if let Some(production) = config.get("production") {
        if let Some(Value::Str(host)) = production.get("host") {
            println!("Accessing field 'production.host': {}", host);
        }
        if let Some(port) = production.get("port").and_then(Value::as_i64) {
            println!("Accessing field 'production.port': {}", port);
        }
    }
    if let Some(features) = config.get("features").and_then(Value::as_sequence) {
        println!("Accessing field 'features': {} items\n", features.len());
    }

    // Re-dump with sorted keys and flow collections below the top level
    let options = StringifyOptions::new()
        .with_sort_keys(SortKeys::Ascending)
        .with_flow_level(Some(1));
    println!("Config as YAML:\n{}", stringify(&config, &options)?);

    // Build a value with the yaml! macro
    let extra = yaml!({
        "debug": true,
        "retries": 3
    });
    println!("Built with yaml!:\n{}\n", extra);

    // Convert existing struct to Value
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!("User as YAML:\n{}", stringify(&user_value, &StringifyOptions::default())?);

    // Runtime type checks
    println!("Type checks:");
    println!("  kind:        {}", user_value.kind_name());
    println!("  is_mapping:  {}", user_value.is_mapping());
    println!("  is_sequence: {}", user_value.is_sequence());
    println!("  is_string:   {}", user_value.is_string());

    Ok(())
}
