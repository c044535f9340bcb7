use glam::{Mat4, Vec2, Vec3};

use crate::math::Aabb;
use crate::scene_graph::node::NodeId;

/// Resolved filter effect. Only blur and drop shadow change the painted extent.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Blur(f32),
    DropShadow {
        offset_x: f32,
        offset_y: f32,
        blur: f32,
    },
    Brightness(f32),
    Contrast(f32),
    Grayscale(f32),
    Invert(f32),
    Opacity(f32),
    Saturate(f32),
    Sepia(f32),
    HueRotate(f32),
}

/// A resolved style value pushed in by the style pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Cx(f32),
    Cy(f32),
    R(f32),
    Rx(f32),
    Ry(f32),
    X(f32),
    Y(f32),
    Width(f32),
    Height(f32),
    X1(f32),
    Y1(f32),
    X2(f32),
    Y2(f32),
    Points(Vec<Vec2>),
    Text(String),

    LineWidth(f32),
    IncreasedLineWidthForHitTesting(f32),
    ShadowBlur(f32),
    ShadowOffsetX(f32),
    ShadowOffsetY(f32),
    Filter(Vec<Filter>),

    ClipPath(Option<NodeId>),
    Transform(Mat4),
    TransformOrigin(Vec3),
    Visible(bool),
}

/// Which cache an attribute change has to invalidate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    Geometry,
    Paint,
    Clip,
    Transform,
    Visibility,
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Cx(_)
            | Attribute::Cy(_)
            | Attribute::R(_)
            | Attribute::Rx(_)
            | Attribute::Ry(_)
            | Attribute::X(_)
            | Attribute::Y(_)
            | Attribute::Width(_)
            | Attribute::Height(_)
            | Attribute::X1(_)
            | Attribute::Y1(_)
            | Attribute::X2(_)
            | Attribute::Y2(_)
            | Attribute::Points(_)
            | Attribute::Text(_) => AttributeKind::Geometry,
            Attribute::LineWidth(_)
            | Attribute::IncreasedLineWidthForHitTesting(_)
            | Attribute::ShadowBlur(_)
            | Attribute::ShadowOffsetX(_)
            | Attribute::ShadowOffsetY(_)
            | Attribute::Filter(_) => AttributeKind::Paint,
            Attribute::ClipPath(_) => AttributeKind::Clip,
            Attribute::Transform(_) | Attribute::TransformOrigin(_) => AttributeKind::Transform,
            Attribute::Visible(_) => AttributeKind::Visibility,
        }
    }
}

/// Paint-affecting style of a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintStyle {
    pub line_width: f32,
    pub increased_line_width_for_hit_testing: Option<f32>,
    pub shadow_blur: f32,
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
    pub filters: Vec<Filter>,
    pub clip_path: Option<NodeId>,
}

impl PaintStyle {
    /// Stroke width used for bounds; the hit-testing width replaces the
    /// painted one when set.
    pub fn effective_line_width(&self) -> f32 {
        self.increased_line_width_for_hit_testing
            .unwrap_or(self.line_width)
    }

    fn has_shadow(&self) -> bool {
        self.shadow_blur != 0.0 || self.shadow_offset_x != 0.0 || self.shadow_offset_y != 0.0
    }

    /// Applies a paint attribute. Returns `false` when the value is invalid or
    /// unchanged.
    pub(crate) fn apply(&mut self, attribute: Attribute) -> bool {
        fn assign(slot: &mut f32, value: f32) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match attribute {
            Attribute::LineWidth(value) if value.is_finite() => {
                assign(&mut self.line_width, value.max(0.0))
            }
            Attribute::IncreasedLineWidthForHitTesting(value) if value.is_finite() => {
                let value = Some(value.max(0.0));
                if self.increased_line_width_for_hit_testing == value {
                    return false;
                }
                self.increased_line_width_for_hit_testing = value;
                true
            }
            Attribute::ShadowBlur(value) if value.is_finite() => {
                assign(&mut self.shadow_blur, value.max(0.0))
            }
            Attribute::ShadowOffsetX(value) if value.is_finite() => {
                assign(&mut self.shadow_offset_x, value)
            }
            Attribute::ShadowOffsetY(value) if value.is_finite() => {
                assign(&mut self.shadow_offset_y, value)
            }
            Attribute::Filter(filters) => {
                if self.filters == filters {
                    return false;
                }
                self.filters = filters;
                true
            }
            _ => false,
        }
    }

    /// Expands geometry bounds by stroke, shadow and filter effects.
    pub fn expand(&self, geometry: Aabb) -> Aabb {
        let half_line_width = self.effective_line_width() / 2.0;
        let mut bounds = geometry.expand(Vec3::new(half_line_width, half_line_width, 0.0));

        if self.has_shadow() {
            let shadow = bounds
                .translate(Vec3::new(self.shadow_offset_x, self.shadow_offset_y, 0.0))
                .expand(Vec3::new(self.shadow_blur, self.shadow_blur, 0.0));
            bounds = bounds.union(&shadow);
        }

        for filter in &self.filters {
            match *filter {
                Filter::Blur(radius) => {
                    bounds = bounds.expand(Vec3::new(radius, radius, 0.0));
                }
                Filter::DropShadow {
                    offset_x,
                    offset_y,
                    blur,
                } => {
                    let shadow = bounds
                        .translate(Vec3::new(offset_x, offset_y, 0.0))
                        .expand(Vec3::new(blur, blur, 0.0));
                    bounds = bounds.union(&shadow);
                }
                _ => {}
            }
        }

        bounds
    }
}
