use thiserror::Error;

use crate::model::CategoryId;

/// Wire id carried by the all-categories choice.
const ALL_CATEGORIES_ID: u64 = 0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category label is empty")]
    EmptyLabel,

    #[error("category id 0 is reserved for the all-categories choice")]
    ReservedId,
}

/// A quiz category as supplied by the question provider.
///
/// Immutable once fetched; the provider owns category identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    label: String,
}

impl Category {
    /// Build a category from provider data.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyLabel` if the label is blank and
    /// `CategoryError::ReservedId` for id 0, which the wire protocol
    /// reserves for "all categories".
    pub fn new(id: CategoryId, label: impl Into<String>) -> Result<Self, CategoryError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(CategoryError::EmptyLabel);
        }
        if id.value() == ALL_CATEGORIES_ID {
            return Err(CategoryError::ReservedId);
        }
        Ok(Self { id, label })
    }

    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The player's category pick for one play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChoice {
    /// Play questions from every category (wire id 0).
    All,
    /// Play questions from a single category.
    One(Category),
}

impl CategoryChoice {
    #[must_use]
    pub fn id(&self) -> CategoryId {
        match self {
            CategoryChoice::All => CategoryId::new(ALL_CATEGORIES_ID),
            CategoryChoice::One(category) => category.id(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            CategoryChoice::All => "ALL",
            CategoryChoice::One(category) => category.label(),
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, CategoryChoice::All)
    }
}
