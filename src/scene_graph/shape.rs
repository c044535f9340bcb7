use glam::{Vec2, Vec3};

use crate::math::Aabb;
use crate::scene_graph::style::Attribute;

/// Geometry of a node, fixed in kind when the node is created.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group,
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
    },
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
    },
    /// Width and height may be negative; the box extends from the anchor
    /// towards the sign.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Polyline {
        points: Vec<Vec2>,
    },
    Polygon {
        points: Vec<Vec2>,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Monospace text layout anchored at its top-left corner.
    Text {
        x: f32,
        y: f32,
        content: String,
        advance: f32,
        line_height: f32,
    },
}

impl Shape {
    pub fn circle(cx: f32, cy: f32, r: f32) -> Shape {
        Shape::Circle { cx, cy, r }
    }

    pub fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Shape {
        Shape::Ellipse { cx, cy, rx, ry }
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Shape {
        Shape::Line { x1, y1, x2, y2 }
    }

    pub fn polyline(points: Vec<Vec2>) -> Shape {
        Shape::Polyline { points }
    }

    pub fn polygon(points: Vec<Vec2>) -> Shape {
        Shape::Polygon { points }
    }

    pub fn text(x: f32, y: f32, content: impl Into<String>, advance: f32, line_height: f32) -> Shape {
        Shape::Text {
            x,
            y,
            content: content.into(),
            advance,
            line_height,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Group => "group",
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Rect { .. } => "rect",
            Shape::Line { .. } => "line",
            Shape::Polyline { .. } => "polyline",
            Shape::Polygon { .. } => "polygon",
            Shape::Image { .. } => "image",
            Shape::Text { .. } => "text",
        }
    }

    /// Intrinsic extent in the node's own space; `None` for groups and empty text.
    pub fn geometry_bounds(&self) -> Option<Aabb> {
        match self {
            Shape::Group => None,
            Shape::Circle { cx, cy, r } => Some(Aabb::new(
                Vec3::new(*cx, *cy, 0.0),
                Vec3::new(*r, *r, 0.0),
            )),
            Shape::Ellipse { cx, cy, rx, ry } => Some(Aabb::new(
                Vec3::new(*cx, *cy, 0.0),
                Vec3::new(*rx, *ry, 0.0),
            )),
            Shape::Rect {
                x,
                y,
                width,
                height,
            }
            | Shape::Image {
                x,
                y,
                width,
                height,
            } => Some(Aabb::from_min_max(
                Vec3::new(*x, *y, 0.0),
                Vec3::new(x + width, y + height, 0.0),
            )),
            Shape::Line { x1, y1, x2, y2 } => Some(Aabb::from_min_max(
                Vec3::new(*x1, *y1, 0.0),
                Vec3::new(*x2, *y2, 0.0),
            )),
            Shape::Polyline { points } | Shape::Polygon { points } => {
                Aabb::from_points(points.iter().map(|p| p.extend(0.0)))
            }
            Shape::Text {
                x,
                y,
                content,
                advance,
                line_height,
            } => {
                if content.is_empty() {
                    return None;
                }
                let lines = content.lines().count().max(1);
                let columns = content
                    .lines()
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0);
                let size = Vec2::new(columns as f32 * advance, lines as f32 * line_height);
                Some(Aabb::from_min_max(
                    Vec3::new(*x, *y, 0.0),
                    Vec3::new(x + size.x, y + size.y, 0.0),
                ))
            }
        }
    }

    /// Applies a geometry attribute. Returns `false` when the attribute does
    /// not belong to this shape, is invalid, or changes nothing; the previous
    /// geometry is kept in every such case.
    pub(crate) fn apply(&mut self, attribute: Attribute) -> bool {
        fn assign(slot: &mut f32, value: f32) -> bool {
            if !value.is_finite() || *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        fn assign_radius(slot: &mut f32, value: f32) -> bool {
            if value < 0.0 {
                return false;
            }
            assign(slot, value)
        }

        match (self, attribute) {
            (Shape::Circle { cx, .. } | Shape::Ellipse { cx, .. }, Attribute::Cx(value)) => {
                assign(cx, value)
            }
            (Shape::Circle { cy, .. } | Shape::Ellipse { cy, .. }, Attribute::Cy(value)) => {
                assign(cy, value)
            }
            (Shape::Circle { r, .. }, Attribute::R(value)) => assign_radius(r, value),
            (Shape::Ellipse { rx, .. }, Attribute::Rx(value)) => assign_radius(rx, value),
            (Shape::Ellipse { ry, .. }, Attribute::Ry(value)) => assign_radius(ry, value),
            (
                Shape::Rect { x, .. } | Shape::Image { x, .. } | Shape::Text { x, .. },
                Attribute::X(value),
            ) => assign(x, value),
            (
                Shape::Rect { y, .. } | Shape::Image { y, .. } | Shape::Text { y, .. },
                Attribute::Y(value),
            ) => assign(y, value),
            (Shape::Rect { width, .. } | Shape::Image { width, .. }, Attribute::Width(value)) => {
                assign(width, value)
            }
            (Shape::Rect { height, .. } | Shape::Image { height, .. }, Attribute::Height(value)) => {
                assign(height, value)
            }
            (Shape::Line { x1, .. }, Attribute::X1(value)) => assign(x1, value),
            (Shape::Line { y1, .. }, Attribute::Y1(value)) => assign(y1, value),
            (Shape::Line { x2, .. }, Attribute::X2(value)) => assign(x2, value),
            (Shape::Line { y2, .. }, Attribute::Y2(value)) => assign(y2, value),
            (
                Shape::Polyline { points } | Shape::Polygon { points },
                Attribute::Points(value),
            ) => {
                if value.iter().any(|p| !p.is_finite()) || *points == value {
                    return false;
                }
                *points = value;
                true
            }
            (Shape::Text { content, .. }, Attribute::Text(value)) => {
                if *content == value {
                    return false;
                }
                *content = value;
                true
            }
            _ => false,
        }
    }
}
