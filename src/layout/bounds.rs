use serde::Serialize;

/// Axis-aligned box in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Smallest box holding every `node_width` x `node_height` rectangle
    /// whose top-left corner is in `corners`, grown by `padding` on each side.
    pub fn enclosing(
        corners: impl IntoIterator<Item = (f64, f64)>,
        node_width: f64,
        node_height: f64,
        padding: f64,
    ) -> Option<Self> {
        let mut corners = corners.into_iter();
        let (x, y) = corners.next()?;
        let (mut min_x, mut min_y) = (x, y);
        let (mut max_x, mut max_y) = (x + node_width, y + node_height);

        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x + node_width);
            max_y = max_y.max(y + node_height);
        }

        Some(Self {
            x: min_x - padding,
            y: min_y - padding,
            width: max_x - min_x + 2.0 * padding,
            height: max_y - min_y + 2.0 * padding,
        })
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_corners() {
        assert_eq!(Bounds::enclosing([], 10.0, 10.0, 5.0), None);
    }

    #[test]
    fn test_single_rectangle_with_padding() {
        let bounds = Bounds::enclosing([(100.0, 50.0)], 180.0, 80.0, 40.0).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                x: 60.0,
                y: 10.0,
                width: 260.0,
                height: 160.0,
            }
        );
        assert_eq!(bounds.right(), 320.0);
        assert_eq!(bounds.bottom(), 170.0);
    }

    #[test]
    fn test_negative_coordinates() {
        let bounds = Bounds::enclosing([(-20.0, 0.0), (30.0, -10.0)], 10.0, 10.0, 0.0).unwrap();
        assert_eq!(bounds.x, -20.0);
        assert_eq!(bounds.y, -10.0);
        assert_eq!(bounds.width, 60.0);
        assert_eq!(bounds.height, 20.0);
    }
}
