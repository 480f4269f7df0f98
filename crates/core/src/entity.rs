//! Polymorphic entity payloads.
//!
//! A caller never names the entity type. The shape of the payload selects it:
//! `first_name`/`last_name` make an individual, `name`/`legal_name` make a
//! non-individual. Exactly one shape must be present.

use std::str::FromStr;

use crm_shared::AppError;
use serde::{Deserialize, Serialize};

use crate::patch;

/// Discriminator stored in the entity `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A person.
    #[serde(rename = "individual")]
    Individual,
    /// An organization.
    #[serde(rename = "non-individual")]
    NonIndividual,
}

impl EntityKind {
    /// Returns the column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::NonIndividual => "non-individual",
        }
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "non-individual" => Ok(Self::NonIndividual),
            _ => Err(AppError::EntityTypeInvalid),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw entity creation payload as sent by clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityPayload {
    /// Tax identifier.
    pub tin: Option<String>,
    /// Individual first name.
    pub first_name: Option<String>,
    /// Individual last name.
    pub last_name: Option<String>,
    /// Non-individual display name.
    pub name: Option<String>,
    /// Non-individual legal name.
    pub legal_name: Option<String>,
}

/// Individual child fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIndividual {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
}

/// Non-individual child fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNonIndividual {
    /// Display name.
    pub name: String,
    /// Legal name.
    pub legal_name: Option<String>,
}

/// The child row an entity is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityChild {
    /// Created with an individual.
    Individual(NewIndividual),
    /// Created with a non-individual.
    NonIndividual(NewNonIndividual),
}

impl EntityChild {
    /// Returns the matching discriminator.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Individual(_) => EntityKind::Individual,
            Self::NonIndividual(_) => EntityKind::NonIndividual,
        }
    }
}

/// A validated entity and its single child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntity {
    /// Tax identifier.
    pub tin: Option<String>,
    /// The child row.
    pub child: EntityChild,
}

impl NewEntity {
    /// Returns the discriminator for the entity row.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.child.kind()
    }
}

impl EntityPayload {
    /// Selects the entity variant from the payload shape.
    ///
    /// # Errors
    ///
    /// - `EntityPayloadOverloaded` if both shapes carry data.
    /// - `EntityDataInvalid` if neither shape carries data, or the shape's
    ///   required name is blank.
    pub fn resolve(self) -> Result<NewEntity, AppError> {
        let tin = patch::optional_text(self.tin);
        let first_name = patch::optional_text(self.first_name);
        let last_name = patch::optional_text(self.last_name);
        let name = patch::optional_text(self.name);
        let legal_name = patch::optional_text(self.legal_name);

        let individual_shape = first_name.is_some() || last_name.is_some();
        let non_individual_shape = name.is_some() || legal_name.is_some();

        let child = match (individual_shape, non_individual_shape) {
            (true, true) => return Err(AppError::EntityPayloadOverloaded),
            (false, false) => return Err(AppError::EntityDataInvalid),
            (true, false) => EntityChild::Individual(NewIndividual {
                first_name: first_name.ok_or(AppError::EntityDataInvalid)?,
                last_name,
            }),
            (false, true) => EntityChild::NonIndividual(NewNonIndividual {
                name: name.ok_or(AppError::EntityDataInvalid)?,
                legal_name,
            }),
        };

        Ok(NewEntity { tin, child })
    }
}

/// Checks that a child of `requested` kind may hang off an entity of `stored` kind.
///
/// # Errors
///
/// Returns `AppError::EntityTypeInvalid` on mismatch.
pub fn ensure_kind(stored: &str, requested: EntityKind) -> Result<(), AppError> {
    if stored.parse::<EntityKind>()? == requested {
        Ok(())
    } else {
        Err(AppError::EntityTypeInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> EntityPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_individual_shape() {
        let entity = payload(r#"{"first_name": "Ada", "last_name": "Lovelace", "tin": "123"}"#)
            .resolve()
            .unwrap();
        assert_eq!(entity.kind(), EntityKind::Individual);
        assert_eq!(entity.tin.as_deref(), Some("123"));
        assert_eq!(
            entity.child,
            EntityChild::Individual(NewIndividual {
                first_name: "Ada".into(),
                last_name: Some("Lovelace".into()),
            })
        );
    }

    #[test]
    fn test_non_individual_shape() {
        let entity = payload(r#"{"name": "Acme", "legal_name": "Acme LLC"}"#)
            .resolve()
            .unwrap();
        assert_eq!(entity.kind(), EntityKind::NonIndividual);
    }

    #[test]
    fn test_both_shapes_are_overloaded() {
        let result = payload(r#"{"first_name": "Ada", "name": "Acme"}"#).resolve();
        assert!(matches!(result, Err(AppError::EntityPayloadOverloaded)));
    }

    #[test]
    fn test_no_shape_is_invalid() {
        let result = payload(r#"{"tin": "123"}"#).resolve();
        assert!(matches!(result, Err(AppError::EntityDataInvalid)));
    }

    #[test]
    fn test_missing_required_name_is_invalid() {
        let result = payload(r#"{"last_name": "Lovelace"}"#).resolve();
        assert!(matches!(result, Err(AppError::EntityDataInvalid)));

        let result = payload(r#"{"legal_name": "Acme LLC", "name": ""}"#).resolve();
        assert!(matches!(result, Err(AppError::EntityDataInvalid)));
    }

    #[test]
    fn test_kind_round_trips_column_value() {
        assert_eq!("non-individual".parse::<EntityKind>().unwrap(), EntityKind::NonIndividual);
        assert!(matches!(
            "company".parse::<EntityKind>(),
            Err(AppError::EntityTypeInvalid)
        ));
    }

    #[test]
    fn test_ensure_kind() {
        assert!(ensure_kind("individual", EntityKind::Individual).is_ok());
        assert!(matches!(
            ensure_kind("individual", EntityKind::NonIndividual),
            Err(AppError::EntityTypeInvalid)
        ));
    }
}
