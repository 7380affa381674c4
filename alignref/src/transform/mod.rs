//! Horizontal coordinate transformation.
//!
//! The reconciler only knows the [`HorizontalTransform`] trait. [`GridRegistry`] is the implementation shipped with
//! the crate, other implementations (e.g. a PROJ binding) can be injected instead.

use std::sync::Arc;

use alignref_types::CrsDescriptor;

use crate::error::Result;

mod registry;

pub use registry::{GridDefinition, GridKind, GridRegistry, Reprojection, TransformRoute};

/// Converts a horizontal coordinate pair from one CRS to another.
///
/// Implementations work strictly on 2d pairs. Elevation never passes through this trait, so a 2d projected system is
/// never promoted to a 3d transformation.
pub trait HorizontalTransform: Send + Sync {
    /// Transforms `(x, y)` expressed in `from` into `to`.
    ///
    /// When both descriptors have the same horizontal id and linear unit the input must be returned unchanged.
    fn transform(
        &self,
        x: f64,
        y: f64,
        from: &CrsDescriptor,
        to: &CrsDescriptor,
    ) -> Result<(f64, f64)>;

    /// Returns true if coordinates of the system are longitude and latitude in degrees, so that planar distances
    /// between them are meaningless.
    ///
    /// Implementations that cannot tell return `false`.
    fn is_geographic(&self, _crs: &CrsDescriptor) -> bool {
        false
    }
}

impl<T: HorizontalTransform + ?Sized> HorizontalTransform for Arc<T> {
    fn transform(
        &self,
        x: f64,
        y: f64,
        from: &CrsDescriptor,
        to: &CrsDescriptor,
    ) -> Result<(f64, f64)> {
        (**self).transform(x, y, from, to)
    }

    fn is_geographic(&self, crs: &CrsDescriptor) -> bool {
        (**self).is_geographic(crs)
    }
}

impl<T: HorizontalTransform + ?Sized> HorizontalTransform for &T {
    fn transform(
        &self,
        x: f64,
        y: f64,
        from: &CrsDescriptor,
        to: &CrsDescriptor,
    ) -> Result<(f64, f64)> {
        (**self).transform(x, y, from, to)
    }

    fn is_geographic(&self, crs: &CrsDescriptor) -> bool {
        (**self).is_geographic(crs)
    }
}
