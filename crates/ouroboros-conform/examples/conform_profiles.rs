//! Conform Profiles Example
//!
//! This example validates and corrects a batch of user profiles with
//! ouroboros-conform.
//!
//! Run with:
//! ```bash
//! cargo run -p ouroboros-conform --example conform_profiles
//! ```

use ouroboros_conform::{
    correctors::{clamp, default_to, trim, truncate},
    validators::{email, in_range, integer, max_length, min_length, required, string, trimmed},
    validate_with_config, ConformConfig, Spec, SpecMap, Value,
};

// ============================================================================
// Specification
// ============================================================================

fn profile_spec() -> SpecMap {
    let user = SpecMap::new()
        .with(
            "name",
            vec![
                required(),
                string(),
                min_length(2),
                max_length(12).with_corrector(truncate(12)),
            ],
        )
        .with("email", vec![required(), email()])
        .with(
            "age",
            vec![integer(), in_range(0, 130).with_corrector(clamp(0, 130))],
        )
        .with("role", required().with_corrector(default_to("member")));

    SpecMap::new().with(
        "users",
        Spec::wildcard(
            user,
            // The first user is the account owner and must have a role set explicitly.
            SpecMap::new().with(
                0,
                SpecMap::new().with("role", required().with_message("owner role must be set")),
            ),
        ),
    )
    .with("team", vec![string(), trimmed().with_corrector(trim())])
}

// ============================================================================
// Data
// ============================================================================

fn profiles() -> Value {
    Value::map([
        (
            "users",
            Value::list([
                Value::map([
                    ("name", Value::from("Ada Lovelace-Byron")),
                    ("email", Value::from("ada@example.com")),
                    ("age", Value::from(36)),
                    ("role", Value::from("owner")),
                ]),
                Value::map([
                    ("name", Value::from("G")),
                    ("email", Value::from("grace.example.com")),
                    ("age", Value::from(212)),
                ]),
            ]),
        ),
        ("team", Value::from("  platform ")),
    ])
}

fn main() {
    println!("Conform Profiles Example");
    println!("========================\n");

    let config = ConformConfig::new().fallback_message("invalid value");
    let result = validate_with_config(&profiles(), &profile_spec(), &config);

    println!("Corrections:");
    for path in &result.corrections {
        println!("  - {}", path);
    }
    println!();

    match &result.errors {
        None => println!("All profiles are valid"),
        Some(errors) => {
            println!("{} error(s):", errors.message_count());
            for (path, message) in errors.flatten() {
                println!("  {}: {}", path, message);
            }
        }
    }
    println!();

    println!("Corrected value:");
    println!("  {:?}", result.value);
}
