//! Custom request extractors.

mod validated_form;

pub use validated_form::{field_errors, ValidatedForm};
