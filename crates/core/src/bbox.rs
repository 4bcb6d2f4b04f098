use crate::Error;
use geojson::Geometry;
use serde::{Deserialize, Serialize};

/// A two-dimensional bounding box.
///
/// # Examples
///
/// ```
/// use ogcfeat::Bbox;
///
/// let bbox = Bbox::new(-106.1, 40.5, -106.0, 40.6);
/// assert_eq!(bbox.xmin, -106.1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Bbox {
    /// Minimum longitude.
    pub xmin: f64,

    /// Minimum latitude.
    pub ymin: f64,

    /// Maximum longitude.
    pub xmax: f64,

    /// Maximum latitude.
    pub ymax: f64,
}

impl Bbox {
    /// Creates a new bounding box.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Bbox {
        Bbox {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Converts this bounding box to a closed GeoJSON polygon.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogcfeat::Bbox;
    ///
    /// let geometry = Bbox::new(0., 0., 1., 1.).to_geometry();
    /// ```
    pub fn to_geometry(&self) -> Geometry {
        Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![self.xmin, self.ymin],
            vec![self.xmax, self.ymin],
            vec![self.xmax, self.ymax],
            vec![self.xmin, self.ymax],
            vec![self.xmin, self.ymin],
        ]]))
    }

    /// Returns the upper-left and lower-right corners of this bounding box.
    ///
    /// This is the corner layout expected by envelope intersects predicates.
    pub fn envelope_corners(&self) -> [[f64; 2]; 2] {
        [[self.xmin, self.ymax], [self.xmax, self.ymin]]
    }
}

impl TryFrom<Vec<f64>> for Bbox {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Bbox, Error> {
        if let [xmin, ymin, xmax, ymax] = values[..] {
            Ok(Bbox::new(xmin, ymin, xmax, ymax))
        } else {
            Err(Error::InvalidBbox(values))
        }
    }
}

impl From<[f64; 4]> for Bbox {
    fn from(values: [f64; 4]) -> Bbox {
        Bbox::new(values[0], values[1], values[2], values[3])
    }
}

impl From<Bbox> for Vec<f64> {
    fn from(bbox: Bbox) -> Vec<f64> {
        vec![bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax]
    }
}
