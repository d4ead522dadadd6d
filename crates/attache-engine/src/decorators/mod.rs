//! Decorator registry — all available decorators.

pub mod attachments;

use super::decorator::Decorator;

/// Returns all available decorators.
pub fn all_decorators() -> Vec<Box<dyn Decorator>> {
    vec![Box::new(attachments::Attachments)]
}
