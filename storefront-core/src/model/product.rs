use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::field::{field_from_key, parse_price, split_list, EditableField, FieldKind, FieldValue};
use crate::resource::{mismatch, require, require_price, Resource};

pub const DEFAULT_ASSURED_IMAGE: &str = "/assets/logo/assured.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub image: String,
    pub name: String,
    pub mrp: f64,
    #[serde(rename = "sellingPrice")]
    pub selling_price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub carousel_images: Vec<String>,
    #[serde(rename = "assuredImage", default, skip_serializing_if = "Option::is_none")]
    pub assured_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Image,
    Name,
    Mrp,
    SellingPrice,
    Description,
    Sizes,
    Colors,
    Variant,
    CarouselImages,
}

impl EditableField for ProductField {
    fn key(&self) -> &'static str {
        match self {
            ProductField::Image => "image",
            ProductField::Name => "name",
            ProductField::Mrp => "mrp",
            ProductField::SellingPrice => "sellingPrice",
            ProductField::Description => "description",
            ProductField::Sizes => "sizes",
            ProductField::Colors => "colors",
            ProductField::Variant => "variant",
            ProductField::CarouselImages => "carousel_images",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            ProductField::Image | ProductField::Name => FieldKind::RequiredText,
            ProductField::Mrp | ProductField::SellingPrice => FieldKind::Number,
            ProductField::Description | ProductField::Variant => FieldKind::Text,
            ProductField::Sizes | ProductField::CarouselImages => FieldKind::List,
            ProductField::Colors => FieldKind::Colors,
        }
    }

    fn all() -> &'static [Self] {
        &[
            ProductField::Image,
            ProductField::Name,
            ProductField::Mrp,
            ProductField::SellingPrice,
            ProductField::Description,
            ProductField::Sizes,
            ProductField::Colors,
            ProductField::Variant,
            ProductField::CarouselImages,
        ]
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProductField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        field_from_key(s)
    }
}

impl Resource for Product {
    type Field = ProductField;

    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: ProductField) -> FieldValue {
        match field {
            ProductField::Image => FieldValue::Text(self.image.clone()),
            ProductField::Name => FieldValue::Text(self.name.clone()),
            ProductField::Mrp => FieldValue::Number(self.mrp),
            ProductField::SellingPrice => FieldValue::Number(self.selling_price),
            ProductField::Description => FieldValue::Text(self.description.clone()),
            ProductField::Sizes => FieldValue::List(self.sizes.clone()),
            ProductField::Colors => FieldValue::Colors(self.colors.clone()),
            ProductField::Variant => FieldValue::Text(self.variant.clone()),
            ProductField::CarouselImages => FieldValue::List(self.carousel_images.clone()),
        }
    }

    fn set_field(&mut self, field: ProductField, value: FieldValue) -> Result<(), ValidationError> {
        match (field, value) {
            (ProductField::Image, FieldValue::Text(v)) => self.image = v,
            (ProductField::Name, FieldValue::Text(v)) => self.name = v,
            (ProductField::Mrp, FieldValue::Number(v)) => self.mrp = v,
            (ProductField::SellingPrice, FieldValue::Number(v)) => self.selling_price = v,
            (ProductField::Description, FieldValue::Text(v)) => self.description = v,
            (ProductField::Sizes, FieldValue::List(v)) => self.sizes = v,
            (ProductField::Colors, FieldValue::Colors(v)) => self.colors = v,
            (ProductField::Variant, FieldValue::Text(v)) => self.variant = v,
            (ProductField::CarouselImages, FieldValue::List(v)) => self.carousel_images = v,
            (field, _) => return Err(mismatch(field)),
        }
        Ok(())
    }

    fn summary(&self) -> String {
        format!(
            "{}  {} [{}]  ₹{} (MRP ₹{})",
            self.id, self.name, self.variant, self.selling_price, self.mrp
        )
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("id", &self.id)?;
        require("image", &self.image)?;
        require("name", &self.name)?;
        require_price("mrp", self.mrp)?;
        require_price("sellingPrice", self.selling_price)
    }
}

/// Text form of the admin "add product" form, validated into a [`Product`].
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub id: String,
    pub image: String,
    pub name: String,
    pub mrp: String,
    pub selling_price: String,
    pub description: String,
    pub sizes: String,
    pub variant: String,
    pub carousel_images: String,
    pub colors: Vec<ColorOption>,
    pub assured_image: Option<String>,
}

impl NewProduct {
    pub fn validate(self) -> Result<Product, ValidationError> {
        for (field, value) in [
            ("id", &self.id),
            ("image", &self.image),
            ("name", &self.name),
            ("mrp", &self.mrp),
            ("sellingPrice", &self.selling_price),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: field.to_string(),
                });
            }
        }
        if self.colors.is_empty() {
            return Err(ValidationError::MissingColors);
        }

        let mrp = parse_price("mrp", &self.mrp)?;
        let selling_price = parse_price("sellingPrice", &self.selling_price)?;

        Ok(Product {
            id: self.id.trim().to_string(),
            image: self.image,
            name: self.name,
            mrp,
            selling_price,
            description: self.description,
            sizes: split_list(&self.sizes),
            colors: self.colors,
            variant: self.variant,
            carousel_images: split_list(&self.carousel_images),
            assured_image: Some(
                self.assured_image
                    .unwrap_or_else(|| DEFAULT_ASSURED_IMAGE.to_string()),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewProduct {
        NewProduct {
            id: "p1".into(),
            image: "shirt.png".into(),
            name: "Shirt".into(),
            mrp: "999".into(),
            selling_price: "499".into(),
            sizes: "S, M".into(),
            colors: vec![ColorOption { name: "Red".into(), image: "r.png".into() }],
            ..Default::default()
        }
    }

    #[test]
    fn wire_names_match_the_storefront_api() {
        let product = form().validate().unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["sellingPrice"], 499.0);
        assert_eq!(json["carousel_images"], serde_json::json!([]));
        assert_eq!(json["assuredImage"], DEFAULT_ASSURED_IMAGE);
    }

    #[test]
    fn create_form_requires_prices_and_colors() {
        let mut missing_price = form();
        missing_price.selling_price.clear();
        assert_eq!(
            missing_price.validate(),
            Err(ValidationError::Required { field: "sellingPrice".into() })
        );

        let mut bad_mrp = form();
        bad_mrp.mrp = "nine".into();
        assert!(matches!(bad_mrp.validate(), Err(ValidationError::InvalidNumber { .. })));

        let mut no_colors = form();
        no_colors.colors.clear();
        assert_eq!(no_colors.validate(), Err(ValidationError::MissingColors));
    }

    #[test]
    fn set_field_rejects_wrong_shapes() {
        let mut product = form().validate().unwrap();
        assert!(product
            .set_field(ProductField::Mrp, FieldValue::Text("1".into()))
            .is_err());
        product
            .set_field(ProductField::Sizes, FieldValue::List(vec!["XL".into()]))
            .unwrap();
        assert_eq!(product.sizes, vec!["XL"]);
    }

    #[test]
    fn field_names_parse_from_json_keys() {
        assert_eq!("sellingPrice".parse::<ProductField>(), Ok(ProductField::SellingPrice));
        assert_eq!(
            "price".parse::<ProductField>(),
            Err(ValidationError::UnknownField("price".into()))
        );
    }
}
