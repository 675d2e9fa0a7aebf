//! This module provides the `FormValue` helper types that encapsulate string values and validation
//! error messages for rendering HTML form input fields and validating the corresponding user input.

use crate::web::fyyur::framework::form_inputs::{
    CheckboxTemplate, FormFieldTemplate, InputType, MultiSelectTemplate, SelectEntry,
    SelectTemplate,
};
use askama::Template;
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

const MISSING_VALUE_ERROR: &str = "This field is missing in the form data.";

#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct FormValue<T: FormValueRepresentation> {
    value: Option<String>,
    #[serde(skip)]
    errors: Vec<String>,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

/// Implemented by types that can be used as an HTML form string value
///
/// In general this includes two functionalities:
/// * converting the type into a string for form value representation ([into_form_value_string]),
///   **and**
/// * validating a submitted form input string and converting it to this type.
///
/// Validation can either be implemented via the [ValidateFromFormInput] trait (when no additional
/// data is required for validating/converting a value) or by implementing
/// [ValidationDataForFormValue] for one or more additional data type.
pub trait FormValueRepresentation: Debug {
    fn into_form_value_string(self) -> String;
}

/// Trait for [FormValueRepresentation]-implementing types that can be validated and converted
/// directly from their form string representation, without additional data.
///
/// This allows validating (and converting) the value of a [FormValue] of this type by calling
/// `form_value.validate()` (implemented in [_FormValidSimpleValidate::validate] trait).
pub trait ValidateFromFormInput: FormValueRepresentation + Sized {
    fn from_form_value(value: &'_ str) -> Result<Self, String>;
}

/// Allow validating/converting the [FormValueRepresentation] type `R` with the help of this type.
///
/// Every type `D` implementing this trait, can be used as additional validation data for validating
/// (and converting) the value of a [FormValue] of type `R` via the [FormValue::validate_with]
/// function.
pub trait ValidationDataForFormValue<R: FormValueRepresentation> {
    fn validate_form_value(self, value: &'_ str) -> Result<R, String>;
}

impl FormValueRepresentation for String {
    fn into_form_value_string(self) -> String {
        self
    }
}

impl ValidateFromFormInput for String {
    fn from_form_value(value: &'_ str) -> Result<Self, String> {
        Ok(value.trim().to_owned())
    }
}

impl<T: FormValueRepresentation> FormValue<T> {
    /// Create a FormValue without contained value. This will cause an error when trying to validate
    /// it.
    pub fn empty() -> Self {
        Self {
            value: None,
            errors: vec![],
            _phantom: Default::default(),
        }
    }

    pub fn validate_with<'d, D: ValidationDataForFormValue<T> + 'd>(
        &'_ mut self,
        data: D,
    ) -> Option<T> {
        if let Some(value) = &self.value {
            match data.validate_form_value(value) {
                Ok(v) => Some(v),
                Err(e) => {
                    self.errors.push(e);
                    None
                }
            }
        } else {
            self.errors.push(MISSING_VALUE_ERROR.to_owned());
            None
        }
    }

    /// Manually add a validation error related to this form field.
    ///
    /// This can be used to attach error messages to a specific input field to inform the user about
    /// higher-level validation errors that were found when checking the consistency of the overall
    /// form/entity.
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error)
    }

    /// Check if validation errors have occurred, related to this form value.
    ///
    /// This should only be used by form input sub-templates for changing the rendering of a form
    /// input (like a text input) representing this form value.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the list of validation errors related to this form value.
    ///
    /// This should only be used by form input sub-templates for rendering the validation errors
    /// near to the input representing this form value.
    pub fn errors(&self) -> &Vec<String> {
        &self.errors
    }

    /// Get the current string representation of the form value to be used as the `value` attribute
    /// when rendering the form input.
    pub fn string_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn create_text_field(
        &self,
        name: &str,
        label: &str,
    ) -> Result<askama::filters::Safe<String>, askama::Error> {
        self.create_form_field(name, label, InputType::Text)
    }

    pub fn create_textarea(
        &self,
        name: &str,
        label: &str,
    ) -> Result<askama::filters::Safe<String>, askama::Error> {
        self.create_form_field(name, label, InputType::Textarea)
    }

    pub fn create_datetime_field(
        &self,
        name: &str,
        label: &str,
    ) -> Result<askama::filters::Safe<String>, askama::Error> {
        self.create_form_field(name, label, InputType::DateTime)
    }

    fn create_form_field(
        &self,
        name: &str,
        label: &str,
        input_type: InputType,
    ) -> Result<askama::filters::Safe<String>, askama::Error> {
        let template = FormFieldTemplate::new(self, name, label, input_type);
        Ok(askama::filters::Safe(template.render()?))
    }

    pub fn create_select(
        &self,
        name: &str,
        label: &str,
        entries: &[SelectEntry],
    ) -> Result<askama::filters::Safe<String>, askama::Error> {
        let template = SelectTemplate::new(self, name, label, entries);
        Ok(askama::filters::Safe(template.render()?))
    }
}

impl<T: FormValueRepresentation> Default for FormValue<T>
where
    T: Default,
{
    fn default() -> Self {
        FormValue {
            value: Some(T::default().into_form_value_string()),
            errors: vec![],
            _phantom: Default::default(),
        }
    }
}

impl<T: FormValueRepresentation> From<T> for FormValue<T> {
    fn from(value: T) -> Self {
        FormValue {
            value: Some(value.into_form_value_string()),
            errors: vec![],
            _phantom: Default::default(),
        }
    }
}

/// Helper trait with a simplified version of the [FormValue::validate_with] method that is added
/// to the [FormValue] type when the data type `T` does not need additional validation data
pub trait _FormValidSimpleValidate<T> {
    fn validate(&mut self) -> Option<T>;
}

impl<T: ValidateFromFormInput> _FormValidSimpleValidate<T> for FormValue<T> {
    fn validate(&mut self) -> Option<T> {
        if let Some(value) = &self.value {
            match T::from_form_value(value) {
                Ok(v) => Some(v),
                Err(e) => {
                    self.errors.push(e);
                    None
                }
            }
        } else {
            self.errors.push(MISSING_VALUE_ERROR.to_owned());
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct BoolFormValue {
    value: bool,
    errors: Vec<String>,
}

impl BoolFormValue {
    pub fn get_value(&self) -> bool {
        self.value
    }

    /// Check if validation errors have occurred, related to this form value.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &Vec<String> {
        &self.errors
    }

    pub fn create_checkbox(
        &self,
        name: &str,
        label: &str,
    ) -> Result<askama::filters::Safe<String>, askama::Error> {
        let template = CheckboxTemplate::new(self, name, label);
        Ok(askama::filters::Safe(template.render()?))
    }
}

/// Custom serde Deserialize implementation for BoolFormValue:
/// We want to treat the value like an Option<()>: The value shall be `true` when the field is
/// present (with any value) and `false` if the field is not present.
///
/// We achive this by the custom simple Visitor implementation [BoolFormValueVisitor] that only
/// reacts to `visit_some()` and `visit_none()`
impl<'de> serde::Deserialize<'de> for BoolFormValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(BoolFormValueVisitor {})
    }
}

struct BoolFormValueVisitor;

impl<'de> serde::de::Visitor<'de> for BoolFormValueVisitor {
    type Value = BoolFormValue;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("any value (true) or no such field at all")
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(BoolFormValue {
            value: false,
            errors: vec![],
        })
    }

    fn visit_some<D>(self, _deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(BoolFormValue {
            value: true,
            errors: vec![],
        })
    }
}

impl From<bool> for BoolFormValue {
    fn from(value: bool) -> Self {
        Self {
            value,
            errors: vec![],
        }
    }
}

/// Form value of a multi-select input, i.e. a form field that may occur multiple times in the
/// submitted form data
///
/// serde_urlencoded cannot deserialize repeated keys into a struct field, so this value is not
/// deserialized with the rest of the form but filled from the raw key-value pairs using
/// [MultiFormValue::from_pairs].
#[derive(Debug)]
pub struct MultiFormValue<T: FormValueRepresentation> {
    values: Vec<String>,
    errors: Vec<String>,
    _phantom: PhantomData<T>,
}

impl<T: FormValueRepresentation> Default for MultiFormValue<T> {
    fn default() -> Self {
        Self {
            values: vec![],
            errors: vec![],
            _phantom: Default::default(),
        }
    }
}

impl<T: FormValueRepresentation> MultiFormValue<T> {
    /// Collect the values of all occurrences of the form field `name`
    pub fn from_pairs(pairs: &[(String, String)], name: &str) -> Self {
        Self {
            values: pairs
                .iter()
                .filter(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .collect(),
            errors: vec![],
            _phantom: Default::default(),
        }
    }

    /// Validate and convert all selected values. Returns `None` if any value is invalid.
    pub fn validate_with<D: ValidationDataForFormValue<T> + Copy>(
        &mut self,
        data: D,
    ) -> Option<Vec<T>> {
        let mut result = Vec::with_capacity(self.values.len());
        for value in self.values.iter() {
            match data.validate_form_value(value) {
                Ok(v) => result.push(v),
                Err(e) => self.errors.push(e),
            }
        }
        self.errors.is_empty().then_some(result)
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &Vec<String> {
        &self.errors
    }

    pub fn create_multi_select(
        &self,
        name: &str,
        label: &str,
        entries: &[SelectEntry],
    ) -> Result<askama::filters::Safe<String>, askama::Error> {
        let template = MultiSelectTemplate::new(self, name, label, entries);
        Ok(askama::filters::Safe(template.render()?))
    }
}

impl<T: FormValueRepresentation> FromIterator<T> for MultiFormValue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|v| v.into_form_value_string())
                .collect(),
            errors: vec![],
            _phantom: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct TestForm {
        name: FormValue<String>,
        flag: BoolFormValue,
        other_flag: BoolFormValue,
    }

    #[test]
    fn test_deserialize_form() {
        let mut data: TestForm =
            serde_urlencoded::from_str("name=+The+Musical+Hop+&flag=y&genres=1").unwrap();
        assert_eq!(data.name.string_value(), " The Musical Hop ");
        assert_eq!(data.name.validate(), Some("The Musical Hop".to_owned()));
        assert!(data.flag.get_value());
        assert!(!data.other_flag.get_value());
    }

    #[test]
    fn test_missing_value() {
        let mut value: FormValue<String> = FormValue::empty();
        assert_eq!(value.validate(), None);
        assert!(value.has_errors());
        assert_eq!(value.string_value(), "");
    }

    #[test]
    fn test_multi_form_value() {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str("genres=3&name=x&genres=5").unwrap();
        let value: MultiFormValue<String> = MultiFormValue::from_pairs(&pairs, "genres");
        assert!(value.is_selected("3"));
        assert!(value.is_selected("5"));
        assert!(!value.is_selected("x"));
    }
}
