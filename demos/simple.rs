//! Basic YAML serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use std::error::Error;
use yamlet::{from_str, to_string};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
    bio: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
            bio: "Likes Rust.\nWrites parsers.\n".to_string(),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: "bob@example.com".to_string(),
            bio: "yes".to_string(),
        },
    ];

    // Serialize to YAML
    let yaml = to_string(&users)?;
    println!("YAML output:\n{}", yaml);

    // Deserialize back to struct
    let users_back: Vec<User> = from_str(&yaml)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    Ok(())
}
