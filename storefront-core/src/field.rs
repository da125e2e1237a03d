//! Editable field values and the text form they take inside an editor.
//!
//! Every field is edited as a single line of text. Seeding an editor turns the
//! stored value into that text, committing parses it back according to the
//! field's [`FieldKind`].

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::error::ValidationError;
use crate::model::{ColorOption, PaymentOptions, PaymentProvider};

/// Separator used when a sequence is shown as editable text.
pub const LIST_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    RequiredText,
    Number,
    List,
    Colors,
    PaymentOptions,
}

/// The typed value of one field of a resource instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
    Colors(Vec<ColorOption>),
    PaymentOptions(PaymentOptions),
}

impl FieldValue {
    /// Text seeded into the editor when editing starts.
    pub fn edit_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::List(items) => join_list(items),
            FieldValue::Colors(colors) => colors
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            FieldValue::PaymentOptions(options) => options
                .enabled()
                .iter()
                .map(|p| p.key())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Number(n) => json!(n),
            FieldValue::List(items) => json!(items),
            FieldValue::Colors(colors) => Value::Array(
                colors
                    .iter()
                    .map(|c| json!({ "name": c.name, "image": c.image }))
                    .collect(),
            ),
            FieldValue::PaymentOptions(options) => {
                let map: Map<String, Value> = PaymentProvider::ALL
                    .iter()
                    .map(|p| (p.key().to_string(), Value::Bool(options.is_enabled(*p))))
                    .collect();
                Value::Object(map)
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.edit_text())
    }
}

/// A closed set of editable fields for one resource kind.
pub trait EditableField:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = ValidationError> + Send + Sync + 'static
{
    /// JSON key of the field, also its name on the wire.
    fn key(&self) -> &'static str;

    fn kind(&self) -> FieldKind;

    fn all() -> &'static [Self];
}

/// Looks a field up by its JSON key.
pub fn field_from_key<F: EditableField>(key: &str) -> Result<F, ValidationError> {
    F::all()
        .iter()
        .copied()
        .find(|f| f.key() == key)
        .ok_or_else(|| ValidationError::UnknownField(key.to_string()))
}

pub fn join_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Splits editor text on `,` and trims each element. Blank text is an empty list.
pub fn split_list(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|item| item.trim().to_string()).collect()
}

pub fn parse_price(field: &str, text: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
        input: text.to_string(),
    };
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Parses a committed draft for `field`. `current` is the value being replaced;
/// colors keep the image of any existing color with the same name.
pub fn parse_draft<F: EditableField>(
    field: F,
    text: &str,
    current: &FieldValue,
) -> Result<FieldValue, ValidationError> {
    match field.kind() {
        FieldKind::Text => Ok(FieldValue::Text(text.to_string())),
        FieldKind::RequiredText => {
            if text.trim().is_empty() {
                Err(ValidationError::Required {
                    field: field.key().to_string(),
                })
            } else {
                Ok(FieldValue::Text(text.to_string()))
            }
        }
        FieldKind::Number => parse_price(field.key(), text).map(FieldValue::Number),
        FieldKind::List => Ok(FieldValue::List(split_list(text))),
        FieldKind::Colors => {
            let existing: &[ColorOption] = match current {
                FieldValue::Colors(colors) => colors,
                _ => &[],
            };
            let colors = split_list(text)
                .into_iter()
                .map(|name| {
                    let image = existing
                        .iter()
                        .find(|c| c.name == name)
                        .map(|c| c.image.clone())
                        .unwrap_or_default();
                    ColorOption { name, image }
                })
                .collect();
            Ok(FieldValue::Colors(colors))
        }
        FieldKind::PaymentOptions => {
            let mut options = PaymentOptions::default();
            for key in split_list(text) {
                let provider: PaymentProvider = key.parse()?;
                options.set(provider, true);
            }
            Ok(FieldValue::PaymentOptions(options))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductField;

    #[test]
    fn numbers_seed_like_their_display_form() {
        assert_eq!(FieldValue::Number(999.0).edit_text(), "999");
        assert_eq!(FieldValue::Number(499.5).edit_text(), "499.5");
    }

    #[test]
    fn lists_are_trimmed_per_element() {
        assert_eq!(split_list("S, L ,XL"), vec!["S", "L", "XL"]);
        assert_eq!(split_list("   "), Vec::<String>::new());
        assert_eq!(split_list("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let current = FieldValue::Number(10.0);
        for input in ["abc", "", "-1", "NaN", "inf"] {
            let err = parse_draft(ProductField::Mrp, input, &current).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidNumber { .. }), "{input}");
        }
        assert_eq!(
            parse_draft(ProductField::Mrp, " 12.5 ", &current).unwrap(),
            FieldValue::Number(12.5)
        );
    }

    #[test]
    fn required_text_rejects_blank() {
        let current = FieldValue::Text("Shirt".into());
        assert_eq!(
            parse_draft(ProductField::Name, "  ", &current),
            Err(ValidationError::Required { field: "name".into() })
        );
    }

    #[test]
    fn colors_keep_images_by_name() {
        let current = FieldValue::Colors(vec![
            ColorOption { name: "Red".into(), image: "r.png".into() },
            ColorOption { name: "Blue".into(), image: "b.png".into() },
        ]);
        let parsed = parse_draft(ProductField::Colors, "Blue, Green", &current).unwrap();
        assert_eq!(
            parsed,
            FieldValue::Colors(vec![
                ColorOption { name: "Blue".into(), image: "b.png".into() },
                ColorOption { name: "Green".into(), image: String::new() },
            ])
        );
    }

    #[test]
    fn payment_options_render_as_provider_map() {
        let mut options = PaymentOptions::default();
        options.set(PaymentProvider::GooglePay, true);
        let value = FieldValue::PaymentOptions(options);
        assert_eq!(value.edit_text(), "divgooglepay");
        assert_eq!(
            value.to_json(),
            json!({
                "divphonepe": false,
                "divbhimupi": false,
                "divgooglepay": true,
                "divupi": false
            })
        );
    }
}
