//! Generic building blocks of the HTML UI: base template data, error pages, flash messages and
//! form handling

pub mod base_template;
pub mod error_page;
pub mod flash;
pub mod form_inputs;
pub mod form_values;
pub mod validation;
