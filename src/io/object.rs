//! Plain object form: the polygon list plus the two post-processing flags.

use crate::errors::ValidationError;
use crate::solid::Solid;
use crate::solid::polygon::Polygon;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidObject<S: Clone> {
    pub polygons: Vec<Polygon<S>>,
    pub is_canonicalized: bool,
    pub is_retesselated: bool,
}

impl<S: Clone + Send + Sync + PartialEq> Solid<S> {
    pub fn to_object(&self) -> SolidObject<S> {
        SolidObject {
            polygons: self.polygons.clone(),
            is_canonicalized: self.is_canonicalized,
            is_retesselated: self.is_retesselated,
        }
    }

    /// Rebuild a solid from its object form, keeping the stored flags.
    ///
    /// ## Errors
    /// [`ValidationError::TooFewPoints`] for a polygon with fewer than three
    /// vertices.
    pub fn from_object(object: SolidObject<S>) -> Result<Solid<S>, ValidationError> {
        if let Some(short) = object.polygons.iter().find(|p| p.vertices.len() < 3) {
            return Err(ValidationError::TooFewPoints(short.vertices.len()));
        }
        Ok(Solid {
            polygons: object.polygons,
            bounding_box: OnceLock::new(),
            is_canonicalized: object.is_canonicalized,
            is_retesselated: object.is_retesselated,
        })
    }
}
