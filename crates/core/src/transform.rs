use crate::Result;
use geojson::Geometry;

/// A coordinate transform collaborator.
///
/// The transform math itself is outside this crate; implementors wrap
/// whatever projection library the embedder uses. Implementations must be
/// pure: same geometry and CRS pair in, same geometry out.
pub trait GeometryTransformer: Send + Sync {
    /// Transforms a geometry's coordinates from the source CRS to the target
    /// CRS.
    fn transform(&self, geometry: Geometry, source_crs: &str, target_crs: &str)
    -> Result<Geometry>;
}

/// A transformer bound to a (source, target) CRS pair for one request.
#[derive(Clone, Copy)]
pub struct CrsTransform<'a> {
    /// The transform implementation.
    pub transformer: &'a dyn GeometryTransformer,

    /// The CRS geometries are stored in.
    pub source: &'a str,

    /// The CRS geometries are requested in.
    pub target: &'a str,
}

impl CrsTransform<'_> {
    /// Applies the bound transform to a geometry.
    pub fn apply(&self, geometry: Geometry) -> Result<Geometry> {
        self.transformer.transform(geometry, self.source, self.target)
    }
}
