use std::collections::HashMap;

use super::{Catalog, Topic};

/// Identifier of the page's code editor field.
pub const CODE_FIELD: &str = "id_code";

/// Something holding named text fields, such as a page form.
pub trait CodeField {
    fn set_value(&mut self, id: &str, value: &str);
}

/// In-memory stand-in for a page form.
#[derive(Clone, Debug, Default)]
pub struct Form {
    fields: HashMap<String, String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }
}

impl CodeField for Form {
    fn set_value(&mut self, id: &str, value: &str) {
        self.fields.insert(id.to_string(), value.to_string());
    }
}

/// Replace the code field with the sample for `topic` in `flavor`.
///
/// Undefined pairs clear the field.
pub fn write_sample<F>(field: &mut F, catalog: &Catalog, topic: Topic, flavor: &str)
where
    F: CodeField + ?Sized,
{
    field.set_value(CODE_FIELD, catalog.lookup(topic, flavor));
}
