//! Ownership check gating mutations on articles and revisions.

use crate::article::{Article, Revision};
use crate::error::CoreError;
use crate::types::DbId;

/// An entity with an owning user.
pub trait Owned {
    fn owner_id(&self) -> DbId;
}

impl Owned for Article {
    fn owner_id(&self) -> DbId {
        self.state.owner_id
    }
}

impl Owned for Revision {
    fn owner_id(&self) -> DbId {
        self.state.owner_id
    }
}

/// Allow the action only when `acting_user` owns `entity`.
pub fn authorize<E: Owned + ?Sized>(entity: &E, acting_user: DbId) -> Result<(), CoreError> {
    if entity.owner_id() == acting_user {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the owner may modify this document".into(),
        ))
    }
}
