use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ProductError, ProductResult};

/// Confirmation sent back by a successful update
pub const MSG_PRODUCT_UPDATED: &str = "Producto Actualizado";
/// Confirmation sent back by a successful delete
pub const MSG_PRODUCT_DELETED: &str = "Producto eliminado";

/// Product identifier, an ObjectId rendered as 24 lowercase hex characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(ObjectId);

impl ProductId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ProductId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ProductId {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

/// Allowed product categories
///
/// Matching is exact and case-sensitive on the Spanish name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
    ToSchema,
)]
pub enum ProductCategory {
    Ropa,
    Calzado,
    Accesorios,
}

impl ProductCategory {
    /// Parse a category name, rejecting anything outside the allow-list
    pub fn parse(value: &str) -> ProductResult<Self> {
        Self::from_str(value).map_err(|_| ProductError::InvalidCategory(value.to_string()))
    }

    /// Allowed names, comma separated, for error messages
    pub fn allowed() -> String {
        Self::VARIANTS.join(", ")
    }
}

/// Product entity as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Identifier assigned by the store
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "507f1f77bcf86cd799439011")]
    pub id: ProductId,
    /// Unique product code
    #[serde(rename = "codigo")]
    pub code: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "categoria")]
    pub category: ProductCategory,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with a fresh id and timestamps
    pub fn new(input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            code: input.code,
            name: input.name,
            price: input.price,
            category: input.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the fields present in `changes` and bump `updated_at`
    pub fn apply_changes(&mut self, changes: ProductChanges) {
        if let Some(code) = changes.code {
            self.code = code;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        self.updated_at = Utc::now();
    }
}

/// Request body for creating a product
///
/// Every field is optional at the wire level so a missing one can be
/// reported by name instead of as a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[schema(example = 1001)]
    pub codigo: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Camiseta básica")]
    pub nombre: Option<String>,
    #[validate(range(min = 0.0))]
    #[schema(example = 19.99)]
    pub precio: Option<f64>,
    #[schema(example = "Ropa")]
    pub categoria: Option<String>,
}

impl CreateProduct {
    /// Names of the required fields that are absent, in wire order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.codigo.is_none() {
            missing.push("codigo");
        }
        if self.nombre.is_none() {
            missing.push("nombre");
        }
        if self.precio.is_none() {
            missing.push("precio");
        }
        if self.categoria.is_none() {
            missing.push("categoria");
        }
        missing
    }

    /// Check presence, field constraints and category, in that order
    pub fn into_new_product(self) -> ProductResult<NewProduct> {
        let Self {
            codigo: Some(code),
            nombre: Some(name),
            precio: Some(price),
            categoria: Some(category),
        } = &self
        else {
            return Err(ProductError::MissingFields(self.missing_fields()));
        };
        self.validate()?;

        Ok(NewProduct {
            code: *code,
            name: name.clone(),
            price: *price,
            category: ProductCategory::parse(category)?,
        })
    }
}

/// Request body for updating a product; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[schema(example = 1002)]
    pub codigo: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Camiseta estampada")]
    pub nombre: Option<String>,
    #[validate(range(min = 0.0))]
    #[schema(example = 24.5)]
    pub precio: Option<f64>,
    #[schema(example = "Accesorios")]
    pub categoria: Option<String>,
}

impl UpdateProduct {
    pub fn into_changes(self) -> ProductResult<ProductChanges> {
        self.validate()?;

        let category = self
            .categoria
            .as_deref()
            .map(ProductCategory::parse)
            .transpose()?;

        Ok(ProductChanges {
            code: self.codigo,
            name: self.nombre,
            price: self.precio,
            category,
        })
    }
}

/// A validated product, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub code: i64,
    pub name: String,
    pub price: f64,
    pub category: ProductCategory,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ProductCategory>,
}

/// Response body for a successful update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductUpdated {
    #[schema(example = "Producto Actualizado")]
    pub mensaje: String,
    pub producto: Product,
}

impl From<Product> for ProductUpdated {
    fn from(producto: Product) -> Self {
        Self {
            mensaje: MSG_PRODUCT_UPDATED.to_string(),
            producto,
        }
    }
}

/// Response body for a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDeleted {
    #[schema(example = "Producto eliminado")]
    pub mensaje: String,
}

impl Default for ProductDeleted {
    fn default() -> Self {
        Self {
            mensaje: MSG_PRODUCT_DELETED.to_string(),
        }
    }
}
