use std::sync::Arc;

/// Conversion of points between two coordinate spaces.
///
/// `project` goes from `InPoint` to `OutPoint` (for map projections, from geographic to projected coordinates),
/// `unproject` goes back. Both return `None` if the point cannot be converted (e.g. it lies outside of the
/// projection domain or the result is not finite).
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the output point.
    type OutPoint;

    /// Projects a point.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Unprojects a point.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

impl<P: Projection + ?Sized> Projection for Arc<P> {
    type InPoint = P::InPoint;
    type OutPoint = P::OutPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        (**self).project(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        (**self).unproject(input)
    }
}

/// Projection that swaps the directions of the inner projection.
pub struct InvertedProjection<In, Out> {
    inner: Box<dyn Projection<InPoint = Out, OutPoint = In> + Send + Sync>,
}

impl<In, Out> InvertedProjection<In, Out> {
    /// Creates a new instance.
    pub fn new(inner: Box<dyn Projection<InPoint = Out, OutPoint = In> + Send + Sync>) -> Self {
        Self { inner }
    }
}

impl<In, Out> Projection for InvertedProjection<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &In) -> Option<Out> {
        self.inner.unproject(input)
    }

    fn unproject(&self, input: &Out) -> Option<In> {
        self.inner.project(input)
    }
}

/// Applies two projections one after another.
pub struct ChainProjection<In, Mid, Out> {
    first: Box<dyn Projection<InPoint = In, OutPoint = Mid> + Send + Sync>,
    second: Box<dyn Projection<InPoint = Mid, OutPoint = Out> + Send + Sync>,
}

impl<In, Mid, Out> ChainProjection<In, Mid, Out> {
    /// Creates a new instance.
    pub fn new(
        first: Box<dyn Projection<InPoint = In, OutPoint = Mid> + Send + Sync>,
        second: Box<dyn Projection<InPoint = Mid, OutPoint = Out> + Send + Sync>,
    ) -> Self {
        Self { first, second }
    }
}

impl<In, Mid, Out> Projection for ChainProjection<In, Mid, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &In) -> Option<Out> {
        self.second.project(&self.first.project(input)?)
    }

    fn unproject(&self, input: &Out) -> Option<In> {
        self.first.unproject(&self.second.unproject(input)?)
    }
}
