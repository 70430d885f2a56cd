//! Rectilinear connectors with rounded corners between a child anchor and its
//! parent anchor.

use std::fmt::Write;

use super::Point;

pub const MAX_CORNER_RADIUS: f32 = 35.0;

/// Extra displacement applied to the source before the curve is traced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeOffset {
    pub sy: f32,
}

pub type EdgeCurve = fn(Point, Point, Point, EdgeOffset) -> String;

pub fn corner_radius(source: Point, target: Point) -> f32 {
    let half_dx = (target.x - source.x).abs() / 2.0;
    let half_dy = (target.y - source.y).abs() / 2.0;
    MAX_CORNER_RADIUS.min(half_dx).min(half_dy).max(0.0)
}

fn sign(delta: f32) -> f32 {
    if delta < 0.0 { -1.0 } else { 1.0 }
}

/// Connector whose middle run is horizontal; used when the tree grows
/// downwards or upwards.
pub fn curved_edge_vertical(source: Point, target: Point, mid: Point, offset: EdgeOffset) -> String {
    let x = source.x;
    let y = source.y + offset.sy;
    let (ex, ey) = (target.x, target.y);
    let shifted = Point::new(x, y);
    // Direction follows the anchors, not the shifted start.
    let xrvs = sign(ex - source.x);
    let yrvs = sign(ey - source.y);
    let r = corner_radius(shifted, target);
    let h = (ey - y).abs() / 2.0 - r;
    let turn_y = y + h * yrvs + r * yrvs;

    let mut path = PathBuilder::default();
    path.move_to(mid.x, mid.y);
    path.line_to(mid.x, y);
    path.line_to(x, y);
    path.line_to(x, y + h * yrvs);
    path.cubic_to((x, turn_y), (x, turn_y), (x + r * xrvs, turn_y));
    path.line_to(x + ((ex - x).abs() - r * 2.0) * xrvs + r * xrvs, turn_y);
    path.cubic_to((ex, turn_y), (ex, turn_y), (ex, ey - h * yrvs));
    path.line_to(ex, ey);
    path.finish()
}

/// Connector whose middle run is vertical; used when the tree grows sideways.
pub fn curved_edge_horizontal(
    source: Point,
    target: Point,
    mid: Point,
    offset: EdgeOffset,
) -> String {
    let x = source.x;
    let y = source.y + offset.sy;
    let (ex, ey) = (target.x, target.y);
    let shifted = Point::new(x, y);
    let xrvs = sign(ex - source.x);
    let yrvs = sign(ey - source.y);
    let r = corner_radius(shifted, target);
    let w = (ex - x).abs() / 2.0 - r;
    let turn_x = x + w * xrvs + r * xrvs;

    let mut path = PathBuilder::default();
    path.move_to(mid.x, mid.y);
    path.line_to(x, mid.y);
    path.line_to(x, y);
    path.line_to(x + w * xrvs, y);
    path.cubic_to((turn_x, y), (turn_x, y), (turn_x, y + r * yrvs));
    path.line_to(turn_x, ey - r * yrvs);
    path.cubic_to((turn_x, ey), (turn_x, ey), (ex - w * xrvs, ey));
    path.line_to(ex, ey);
    path.finish()
}

#[derive(Default)]
struct PathBuilder {
    d: String,
}

impl PathBuilder {
    fn push_command(&mut self, command: char) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push(command);
    }

    fn push_point(&mut self, x: f32, y: f32) {
        let _ = write!(self.d, " {:.2} {:.2}", clean(x), clean(y));
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push_command('M');
        self.push_point(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push_command('L');
        self.push_point(x, y);
    }

    fn cubic_to(&mut self, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) {
        self.push_command('C');
        self.push_point(c1.0, c1.1);
        self.push_point(c2.0, c2.1);
        self.push_point(end.0, end.1);
    }

    fn finish(self) -> String {
        self.d
    }
}

// -0.00 would otherwise leak into the path data.
fn clean(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { value }
}
