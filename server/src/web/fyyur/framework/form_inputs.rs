use crate::web::fyyur::framework::form_values::{
    BoolFormValue, FormValue, FormValueRepresentation, MultiFormValue,
};
use askama::Template;
use std::borrow::Cow;

#[derive(Debug, PartialEq)]
pub enum InputType {
    Text,
    DateTime,
    Textarea,
}

impl InputType {
    fn as_html_type_attr(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::DateTime => "datetime-local",
            InputType::Textarea => "textarea",
        }
    }
}

#[derive(Template)]
#[template(path = "sub_templates/form_inputs/form_field.html")]
pub struct FormFieldTemplate<'a, T: FormValueRepresentation> {
    name: &'a str,
    label: &'a str,
    input_type: InputType,
    data: &'a FormValue<T>,
}

impl<'a, T: FormValueRepresentation> FormFieldTemplate<'a, T> {
    pub fn new(
        data: &'a FormValue<T>,
        name: &'a str,
        label: &'a str,
        input_type: InputType,
    ) -> Self {
        Self {
            name,
            label,
            input_type,
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectEntry<'a> {
    pub value: Cow<'a, str>,
    pub text: Cow<'a, str>,
}

impl SelectEntry<'_> {
    pub fn value_str(&self) -> &str {
        &self.value
    }
}

#[derive(Template)]
#[template(path = "sub_templates/form_inputs/select.html")]
pub struct SelectTemplate<'a, T: FormValueRepresentation> {
    name: &'a str,
    label: &'a str,
    entries: &'a [SelectEntry<'a>],
    data: &'a FormValue<T>,
}

impl<'a, T: FormValueRepresentation> SelectTemplate<'a, T> {
    pub fn new(
        data: &'a FormValue<T>,
        name: &'a str,
        label: &'a str,
        entries: &'a [SelectEntry<'a>],
    ) -> Self {
        Self {
            name,
            label,
            entries,
            data,
        }
    }
}

#[derive(Template)]
#[template(path = "sub_templates/form_inputs/multi_select.html")]
pub struct MultiSelectTemplate<'a, T: FormValueRepresentation> {
    name: &'a str,
    label: &'a str,
    entries: &'a [SelectEntry<'a>],
    data: &'a MultiFormValue<T>,
}

impl<'a, T: FormValueRepresentation> MultiSelectTemplate<'a, T> {
    pub fn new(
        data: &'a MultiFormValue<T>,
        name: &'a str,
        label: &'a str,
        entries: &'a [SelectEntry<'a>],
    ) -> Self {
        Self {
            name,
            label,
            entries,
            data,
        }
    }
}

#[derive(Template)]
#[template(path = "sub_templates/form_inputs/checkbox.html")]
pub struct CheckboxTemplate<'a> {
    name: &'a str,
    label: &'a str,
    data: &'a BoolFormValue,
}

impl<'a> CheckboxTemplate<'a> {
    pub fn new(data: &'a BoolFormValue, name: &'a str, label: &'a str) -> Self {
        Self { name, label, data }
    }
}
