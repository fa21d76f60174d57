//! flowvars - Nested Workflow Variables
//!
//! Typed, nested variable declarations for workflow nodes, validation of
//! runtime values against them, and a per-execution variable pool with
//! `{{#scope.name.path#}}` template substitution.
//!
//! # Architecture
//!
//! The library is organized into two modules:
//!
//! - [`variable`]: Definitions, validator, serializer and UI vocabulary
//! - [`pool`]: Runtime store, typed segments and templates
//!
//! # Example
//!
//! ```rust
//! use flowvars::{VariableDefinition, VariablePool, VariableType};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let user = VariableDefinition::builder("user", VariableType::Object)
//!         .child(VariableDefinition::builder("name", VariableType::String).required().build()?)
//!         .build()?;
//!
//!     let mut pool = VariablePool::empty();
//!     pool.add_nested(&["start", "user"], json!({"name": "Jo"}), Some(&user))?;
//!
//!     assert_eq!(pool.convert_template("Hi {{#start.user.name#}}"), "Hi Jo");
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod variable;

// Re-export commonly used types
pub use pool::{MergeStrategy, PoolError, Segment, SystemVariables, VariablePool, VariableTemplateParser};
pub use variable::{
    deserialize_definition,
    serialize_definition,
    validate_definition,
    validate_value,
    ErrorCode,
    ValidationError,
    VariableDefinition,
    VariableType,
    MAX_NESTING_DEPTH
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_definition() -> VariableDefinition {
        let email = VariableDefinition::builder("email", VariableType::String)
            .required()
            .build()
            .unwrap();
        let contact = VariableDefinition::builder("contact", VariableType::Object)
            .child(email)
            .build()
            .unwrap();
        let name = VariableDefinition::builder("name", VariableType::String)
            .required()
            .build()
            .unwrap();

        VariableDefinition::builder("user", VariableType::Object)
            .child(name)
            .child(contact)
            .build()
            .unwrap()
    }

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_end_to_end_user_flow() {
        let _ = env_logger::builder().is_test(true).try_init();

        // Definitions arrive as wire data
        let def = deserialize_definition(&serialize_definition(&user_definition())).unwrap();
        assert!(validate_definition(&def).is_empty());

        let errors = validate_value(Some(&json!({"name": "Jo", "contact": {}})), &def);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::RequiredFieldMissing);
        assert_eq!(errors[0].path, "user.contact.email");

        let mut pool = VariablePool::empty();
        let rejected = pool.add_nested(&["n", "user"], json!({"name": "Jo", "contact": {}}), Some(&def));
        assert_eq!(
            rejected.unwrap_err().to_string(),
            "Required field 'user.contact.email' is missing"
        );

        pool.add_nested(
            &["n", "user"],
            json!({"name": "Jo", "contact": {"email": "jo@example.com"}}),
            Some(&def),
        )
        .unwrap();

        let email = pool.get_nested(&["n", "user"], Some("contact.email")).unwrap();
        assert_eq!(*email, Segment::String("jo@example.com".to_string()));
        assert_eq!(
            pool.convert_template("Mail {{#n.user.name#}} at {{#n.user.contact.email#}}"),
            "Mail Jo at jo@example.com"
        );
    }

    #[test]
    fn test_depth_boundary() {
        let mut def = VariableDefinition::new("leaf", VariableType::String).unwrap();
        for i in 1..MAX_NESTING_DEPTH {
            def = VariableDefinition::builder(format!("level{}", i), VariableType::Object)
                .child(def)
                .build()
                .unwrap();
        }
        assert_eq!(def.max_depth(), MAX_NESTING_DEPTH);
        assert!(validate_definition(&def).is_empty());

        let too_deep = VariableDefinition::builder("root", VariableType::Object)
            .child(def)
            .build()
            .unwrap();
        assert!(validate_definition(&too_deep)
            .iter()
            .any(|e| e.code == ErrorCode::MaxDepthExceeded));
    }
}
