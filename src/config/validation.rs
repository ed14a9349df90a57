//! Manifest validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Controller ids present and unique
//! - Route names, actions and method lists present
//! - Where-option keys resolvable to a known constraint, with the right arity
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RoutingConfig → Result<(), Vec<ValidationError>>
//! - Duplicate route names are allowed: the later declaration wins

use std::collections::HashSet;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::RoutingConfig;
use crate::routing::Constraint;

/// A single semantic problem in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("controller #{index} has an empty id")]
    EmptyControllerId { index: usize },

    #[error("controller \"{0}\" is declared more than once")]
    DuplicateControllerId(String),

    #[error("controller \"{controller}\": route #{index} has an empty name")]
    EmptyRouteName { controller: String, index: usize },

    #[error("controller \"{controller}\": route \"{route}\" has an empty action")]
    EmptyAction { controller: String, route: String },

    #[error("controller \"{controller}\": route \"{route}\" declares no HTTP methods")]
    EmptyMethods { controller: String, route: String },

    #[error("controller \"{controller}\": route \"{route}\": {reason}")]
    InvalidOption {
        controller: String,
        route: String,
        reason: String,
    },

    #[error("invalid log level \"{0}\"")]
    InvalidLogLevel(String),
}

/// Validate a parsed manifest.
pub fn validate_config(config: &RoutingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, controller) in config.controllers.iter().enumerate() {
        if controller.id.trim().is_empty() {
            errors.push(ValidationError::EmptyControllerId { index });
        } else if !seen.insert(controller.id.as_str()) {
            errors.push(ValidationError::DuplicateControllerId(controller.id.clone()));
        }

        for (index, route) in controller.routes.iter().enumerate() {
            if route.name.trim().is_empty() {
                errors.push(ValidationError::EmptyRouteName {
                    controller: controller.id.clone(),
                    index,
                });
            }
            if route.action.trim().is_empty() {
                errors.push(ValidationError::EmptyAction {
                    controller: controller.id.clone(),
                    route: route.name.clone(),
                });
            }
            if route.methods.iter().all(|m| m.trim().is_empty()) {
                errors.push(ValidationError::EmptyMethods {
                    controller: controller.id.clone(),
                    route: route.name.clone(),
                });
            }
            for (key, value) in &route.options {
                let checked = Constraint::from_option_key(key)
                    .and_then(|constraint| constraint.check_arity(key, value.names().len()));
                if let Err(e) = checked {
                    errors.push(ValidationError::InvalidOption {
                        controller: controller.id.clone(),
                        route: route.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
