use std::fmt::Display;

use axum::response::IntoResponse;
use db::{environment::Environment, user::Role};
use serde_json::{json, Value};

/// Generate example values for OAPI documentation.
macro_rules! generate_examples {
    ($name:ident, $type:ty, $expr:expr) => {
        ::paste::paste! {
            #[doc = concat!("Generate example [`", stringify!($type), "`] value for OAPI documentation.")]
            pub(crate) fn [<example_ $name>]() -> $type {
                $expr
            }
        }
    };

    ($name:ident, $type:ty, $expr:expr; $($name_repeat:ident, $type_repeat:ty, $expr_repeat:expr);+) => {
        generate_examples!($name, $type, $expr);
        generate_examples!($($name_repeat, $type_repeat, $expr_repeat);+);
    }
}

/// Convert an error into a JSON value suitable for OAPI documentation.
pub(crate) fn example_error<E: Display + IntoResponse>(err: E) -> Value {
    let error = err.to_string();

    json! {{
        "code": err.into_response().status().as_u16(),
        "error": error,
    }}
}

generate_examples!(
    database_identifier, i64, 1;
    version_number, String, String::from("1.2.0");
    description, String, String::from("Quarterly feature release");
    environment, Environment, Environment::Qa;
    notes, Option<String>, Some(String::from("Release promoted from DEV to QA"));
    timestamp, i64, 1672531200;
    username, String, String::from("john.doe");
    email, String, String::from("john.doe@example.com");
    full_name, String, String::from("John Doe");
    role, Role, Role::Developer
);
