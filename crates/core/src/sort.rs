use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A sort descriptor: a field name and a direction.
///
/// # Examples
///
/// ```
/// use ogcfeat::{Direction, Sortby};
///
/// let sortby: Sortby = "-population".parse().unwrap();
/// assert_eq!(sortby.field, "population");
/// assert_eq!(sortby.direction, Direction::Descending);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sortby {
    /// The field to sort on.
    pub field: String,

    /// The sort direction.
    #[serde(default)]
    pub direction: Direction,
}

/// A sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending.
    #[default]
    #[serde(rename = "asc")]
    Ascending,

    /// Descending.
    #[serde(rename = "desc")]
    Descending,
}

impl Sortby {
    /// Creates an ascending sort on a field.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogcfeat::Sortby;
    ///
    /// let sortby = Sortby::asc("name");
    /// ```
    pub fn asc(field: impl ToString) -> Sortby {
        Sortby {
            field: field.to_string(),
            direction: Direction::Ascending,
        }
    }

    /// Creates a descending sort on a field.
    pub fn desc(field: impl ToString) -> Sortby {
        Sortby {
            field: field.to_string(),
            direction: Direction::Descending,
        }
    }
}

impl FromStr for Sortby {
    type Err = Error;

    fn from_str(s: &str) -> Result<Sortby, Error> {
        let (direction, field) = match s.strip_prefix('-') {
            Some(field) => (Direction::Descending, field),
            None => (Direction::Ascending, s.strip_prefix('+').unwrap_or(s)),
        };
        if field.is_empty() {
            Err(Error::InvalidSortby(s.to_string()))
        } else {
            Ok(Sortby {
                field: field.to_string(),
                direction,
            })
        }
    }
}
