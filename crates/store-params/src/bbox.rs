//! Bounding box values in `minx,miny,maxx,maxy` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic or projected bounding box.
///
/// Units follow the CRS the box is used with; nothing here interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a BBOX string: "minx,miny,maxx,maxy"
    pub fn parse(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let number = |part: &str| {
            part.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))
        };

        Ok(Self {
            min_x: number(parts[0])?,
            min_y: number(parts[1])?,
            max_x: number(parts[2])?,
            max_y: number(parts[3])?,
        })
    }

    /// True when min <= max on both axes.
    pub fn is_ordered(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl FromStr for BoundingBox {
    type Err = BboxParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox = BoundingBox::parse("-125.0,24.0,-66.0,50.0").unwrap();
        assert_eq!(bbox.min_x, -125.0);
        assert_eq!(bbox.min_y, 24.0);
        assert_eq!(bbox.max_x, -66.0);
        assert_eq!(bbox.max_y, 50.0);
        assert!(bbox.is_ordered());
    }

    #[test]
    fn test_parse_bbox_with_spaces() {
        let bbox = BoundingBox::parse(" 0, 0 ,10,  10").unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_parse_bbox_errors() {
        assert!(matches!(
            BoundingBox::parse("1,2,3"),
            Err(BboxParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            BoundingBox::parse("1,2,x,4"),
            Err(BboxParseError::InvalidNumber(n)) if n == "x"
        ));
    }

    #[test]
    fn test_display_parses_back() {
        let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.5);
        assert_eq!(bbox.to_string(), "-180,-90,180,90.5");
        assert_eq!(bbox.to_string().parse::<BoundingBox>().unwrap(), bbox);
    }
}
