//! The catalog item and the documents used to create and update it

use crate::core::error::{CatalogResult, FieldValidationError, ValidationError};
use crate::core::field::FieldValue;
use crate::core::price::Price;
use crate::core::validation::ValidationConfig;
use crate::core::validation::validators::{
    decimal_range, int_range, max_length, min_int, not_blank, required,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Attribute names as they appear in documents and predicates
pub mod attr {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PUBLICATION_DATE: &str = "publicationDate";
    pub const LANGUAGE: &str = "language";
    pub const ISBN: &str = "isbn";
    pub const NUMBER_PAGES: &str = "numberPages";
    pub const PRICE: &str = "price";
    pub const CATEGORY_ID: &str = "categoryId";
    pub const AUTHOR_ID: &str = "authorId";
    pub const IMAGE: &str = "image";
    pub const REVIEW_SCORE: &str = "reviewScore";
    pub const STATUS: &str = "status";
}

pub const TITLE_MAX_LEN: usize = 150;
pub const DESCRIPTION_MAX_LEN: usize = 300;
pub const LANGUAGE_MAX_LEN: usize = 100;
pub const ISBN_MAX_LEN: usize = 150;
pub const IMAGE_MAX_LEN: usize = 300;
pub const REVIEW_SCORE_MAX: i32 = 5;

/// Storage-assigned identifier of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ItemId)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        ItemId(value)
    }
}

/// A catalog record.
///
/// `id` is `Some` exactly when the item has been persisted at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub title: String,
    pub description: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub language: String,
    pub isbn: Option<String>,
    pub number_pages: Option<i32>,
    pub price: Price,
    pub category_id: i64,
    pub author_id: i64,
    pub image: String,
    #[serde(default)]
    pub review_score: i32,
    pub status: bool,
}

impl Item {
    /// Every attribute name, in declaration order
    pub const ATTRIBUTES: &'static [&'static str] = &[
        attr::ID,
        attr::TITLE,
        attr::DESCRIPTION,
        attr::PUBLICATION_DATE,
        attr::LANGUAGE,
        attr::ISBN,
        attr::NUMBER_PAGES,
        attr::PRICE,
        attr::CATEGORY_ID,
        attr::AUTHOR_ID,
        attr::IMAGE,
        attr::REVIEW_SCORE,
        attr::STATUS,
    ];

    /// Attributes that can never be null
    pub const REQUIRED_ATTRIBUTES: &'static [&'static str] = &[
        attr::TITLE,
        attr::LANGUAGE,
        attr::PRICE,
        attr::CATEGORY_ID,
        attr::AUTHOR_ID,
        attr::IMAGE,
        attr::REVIEW_SCORE,
        attr::STATUS,
    ];

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_required(attribute: &str) -> bool {
        Self::REQUIRED_ATTRIBUTES.contains(&attribute)
    }

    /// Get the typed value of an attribute by name
    ///
    /// Returns `None` for names outside [`Item::ATTRIBUTES`], and
    /// `Some(FieldValue::Null)` for an unset optional attribute.
    pub fn field_value(&self, attribute: &str) -> Option<FieldValue> {
        let value = match attribute {
            attr::ID => self.id.map(|id| id.0).into(),
            attr::TITLE => self.title.as_str().into(),
            attr::DESCRIPTION => self.description.clone().into(),
            attr::PUBLICATION_DATE => self.publication_date.into(),
            attr::LANGUAGE => self.language.as_str().into(),
            attr::ISBN => self.isbn.clone().into(),
            attr::NUMBER_PAGES => self.number_pages.into(),
            attr::PRICE => self.price.into(),
            attr::CATEGORY_ID => self.category_id.into(),
            attr::AUTHOR_ID => self.author_id.into(),
            attr::IMAGE => self.image.as_str().into(),
            attr::REVIEW_SCORE => self.review_score.into(),
            attr::STATUS => self.status.into(),
            _ => return None,
        };
        Some(value)
    }

    /// SQL column backing an attribute
    pub fn column_name(attribute: &str) -> Option<&'static str> {
        let column = match attribute {
            attr::ID => "id",
            attr::TITLE => "title",
            attr::DESCRIPTION => "description",
            attr::PUBLICATION_DATE => "publication_date",
            attr::LANGUAGE => "language",
            attr::ISBN => "isbn",
            attr::NUMBER_PAGES => "number_pages",
            attr::PRICE => "price",
            attr::CATEGORY_ID => "fk_id_category",
            attr::AUTHOR_ID => "fk_id_author",
            attr::IMAGE => "image",
            attr::REVIEW_SCORE => "review_score",
            attr::STATUS => "status",
            _ => return None,
        };
        Some(column)
    }

    /// Rules every persisted item satisfies
    pub fn validation_config() -> &'static ValidationConfig {
        static CONFIG: OnceLock<ValidationConfig> = OnceLock::new();
        CONFIG.get_or_init(|| {
            ValidationConfig::new()
                .field(attr::TITLE, required())
                .field(attr::TITLE, not_blank())
                .field(attr::TITLE, max_length(TITLE_MAX_LEN))
                .field(attr::DESCRIPTION, max_length(DESCRIPTION_MAX_LEN))
                .field(attr::LANGUAGE, required())
                .field(attr::LANGUAGE, not_blank())
                .field(attr::LANGUAGE, max_length(LANGUAGE_MAX_LEN))
                .field(attr::ISBN, max_length(ISBN_MAX_LEN))
                .field(attr::NUMBER_PAGES, min_int(1))
                .field(attr::PRICE, required())
                .field(attr::PRICE, decimal_range(Price::ZERO, Price::MAX))
                .field(attr::CATEGORY_ID, required())
                .field(attr::AUTHOR_ID, required())
                .field(attr::IMAGE, required())
                .field(attr::IMAGE, not_blank())
                .field(attr::IMAGE, max_length(IMAGE_MAX_LEN))
                .field(attr::REVIEW_SCORE, int_range(0, i64::from(REVIEW_SCORE_MAX)))
                .field(attr::STATUS, required())
        })
    }

    /// Check every invariant, reporting all violated fields at once
    pub fn validate(&self) -> CatalogResult<()> {
        Self::validation_config()
            .validate(|field| self.field_value(field).unwrap_or(FieldValue::Null))
            .map_err(|errors| ValidationError::FieldErrors(errors).into())
    }
}

/// Fields supplied when creating an item.
///
/// Every field is optional at the type level so missing required fields are
/// reported as validation failures instead of deserialization errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub language: Option<String>,
    pub isbn: Option<String>,
    pub number_pages: Option<i32>,
    pub price: Option<Price>,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub image: Option<String>,
    pub review_score: Option<i32>,
    pub status: Option<bool>,
}

impl NewItem {
    /// Build an unpersisted item.
    ///
    /// Rejects the document when title, language, price, categoryId, authorId
    /// or image is absent (or an empty string). Text fields are trimmed, an
    /// absent review score becomes 0 and an absent status becomes active.
    pub fn into_item(self) -> CatalogResult<Item> {
        let missing: Vec<_> = [
            (attr::TITLE, has_length(&self.title)),
            (attr::LANGUAGE, has_length(&self.language)),
            (attr::PRICE, self.price.is_some()),
            (attr::CATEGORY_ID, self.category_id.is_some()),
            (attr::AUTHOR_ID, self.author_id.is_some()),
            (attr::IMAGE, has_length(&self.image)),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(field, _)| FieldValidationError::new(field, "is required"))
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError::FieldErrors(missing).into());
        }

        let item = Item {
            id: None,
            title: trimmed(self.title).unwrap_or_default(),
            description: non_blank(self.description),
            publication_date: self.publication_date,
            language: trimmed(self.language).unwrap_or_default(),
            isbn: non_blank(self.isbn),
            number_pages: self.number_pages,
            price: self.price.unwrap_or_default(),
            category_id: self.category_id.unwrap_or_default(),
            author_id: self.author_id.unwrap_or_default(),
            image: trimmed(self.image).unwrap_or_default(),
            review_score: self.review_score.unwrap_or(0),
            status: self.status.unwrap_or(true),
        };

        item.validate()?;
        Ok(item)
    }
}

/// Full-shape update document where `None` always means "leave unchanged"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub language: Option<String>,
    pub isbn: Option<String>,
    pub number_pages: Option<i32>,
    pub price: Option<Price>,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub image: Option<String>,
    pub review_score: Option<i32>,
    pub status: Option<bool>,
}

pub(crate) fn has_length(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

/// Trimmed optional text; blank values are stored as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    trimmed(value).filter(|s| !s.is_empty())
}
