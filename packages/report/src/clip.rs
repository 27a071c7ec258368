//! Clipping of projected overlay geometry to a map panel.
//!
//! Overlays are projected into panel pixels before they are emitted, and a
//! scaled main map or the inset footprint can reach far past the panel.
//! Everything is trimmed to a slightly enlarged panel box first, so the
//! emitted geometry stays proportional to the panel rather than to the
//! survey extent.

/// A pixel-space point.
pub type Px = (f64, f64);

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl PixelRect {
    /// The `width` x `height` box anchored at the origin.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        }
    }

    /// This box grown by `margin` on every side.
    #[must_use]
    pub fn expanded(self, margin: f64) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    /// Whether `point` lies inside or on the edge.
    #[must_use]
    pub fn contains(self, (x, y): Px) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

fn lerp(a: Px, b: Px, t: f64) -> Px {
    ((b.0 - a.0).mul_add(t, a.0), (b.1 - a.1).mul_add(t, a.1))
}

/// Liang–Barsky parameter range of `a -> b` inside `rect`.
fn segment_range(a: Px, b: Px, rect: PixelRect) -> Option<(f64, f64)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.0 - rect.left),
        (dx, rect.right - a.0),
        (-dy, a.1 - rect.top),
        (dy, rect.bottom - a.1),
    ] {
        if p.abs() < f64::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((t0, t1))
}

/// Splits `vertices` into the runs that lie inside `rect`.
#[must_use]
pub fn clip_polyline(vertices: &[Px], rect: PixelRect) -> Vec<Vec<Px>> {
    let mut runs: Vec<Vec<Px>> = Vec::new();
    let mut open = false;

    for pair in vertices.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let Some((t0, t1)) = segment_range(a, b, rect) else {
            open = false;
            continue;
        };
        let end = if t1 < 1.0 { lerp(a, b, t1) } else { b };
        if open && t0 <= 0.0 {
            if let Some(run) = runs.last_mut() {
                run.push(end);
            }
        } else {
            let start = if t0 > 0.0 { lerp(a, b, t0) } else { a };
            runs.push(vec![start, end]);
        }
        open = t1 >= 1.0;
    }

    runs
}

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    fn inside(self, (x, y): Px, rect: PixelRect) -> bool {
        match self {
            Self::Left => x >= rect.left,
            Self::Right => x <= rect.right,
            Self::Top => y >= rect.top,
            Self::Bottom => y <= rect.bottom,
        }
    }

    fn crossing(self, a: Px, b: Px, rect: PixelRect) -> Px {
        match self {
            Self::Left | Self::Right => {
                let x = if matches!(self, Self::Left) {
                    rect.left
                } else {
                    rect.right
                };
                let t = (x - a.0) / (b.0 - a.0);
                (x, (b.1 - a.1).mul_add(t, a.1))
            }
            Self::Top | Self::Bottom => {
                let y = if matches!(self, Self::Top) {
                    rect.top
                } else {
                    rect.bottom
                };
                let t = (y - a.1) / (b.1 - a.1);
                ((b.0 - a.0).mul_add(t, a.0), y)
            }
        }
    }
}

/// Sutherland–Hodgman clip of a ring (closed or open) to `rect`.
///
/// Returns an open ring, or nothing when fewer than three vertices remain.
#[must_use]
pub fn clip_ring(ring: &[Px], rect: PixelRect) -> Vec<Px> {
    let mut output = ring.to_vec();
    if output.len() > 1 && output.first() == output.last() {
        output.pop();
    }

    for edge in Edge::ALL {
        let input = std::mem::take(&mut output);
        let Some(&last) = input.last() else {
            break;
        };
        let mut previous = last;
        for &current in &input {
            let current_in = edge.inside(current, rect);
            if current_in != edge.inside(previous, rect) {
                output.push(edge.crossing(previous, current, rect));
            }
            if current_in {
                output.push(current);
            }
            previous = current;
        }
    }

    if output.len() < 3 {
        output.clear();
    }
    output
}
