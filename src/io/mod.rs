//! Interchange forms of a [`Solid`](crate::solid::Solid) and their JSON helpers.

pub mod compact;
pub mod object;

pub use compact::CompactSolid;
pub use object::SolidObject;

use crate::errors::IoError;
use crate::solid::Solid;
use serde::{Serialize, de::DeserializeOwned};

pub fn to_json<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(serde_json::to_string(value)?)
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, IoError> {
    Ok(serde_json::from_str(json)?)
}

impl<S> Solid<S>
where
    S: Clone + Send + Sync + PartialEq + Serialize + DeserializeOwned,
{
    /// JSON text of [`Solid::to_compact`].
    pub fn to_compact_json(&self) -> Result<String, IoError> {
        to_json(&self.to_compact())
    }

    pub fn from_compact_json(json: &str) -> Result<Solid<S>, IoError> {
        Solid::from_compact(&from_json::<CompactSolid<S>>(json)?)
    }

    /// JSON text of [`Solid::to_object`].
    pub fn to_object_json(&self) -> Result<String, IoError> {
        to_json(&self.to_object())
    }

    pub fn from_object_json(json: &str) -> Result<Solid<S>, IoError> {
        Ok(Solid::from_object(from_json::<SolidObject<S>>(json)?)?)
    }
}
