use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Stroke/fill attributes of one shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub stroke_width: f64,
    pub dashed: bool,
}

impl ShapeStyle {
    #[must_use]
    pub const fn stroked(color: Color, stroke_width: f64) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            stroke_width,
            dashed: false,
        }
    }

    #[must_use]
    pub const fn filled(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            stroke_width: 1.0,
            dashed: false,
        }
    }

    #[must_use]
    pub const fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        Ok(())
    }
}

/// Geometry of one draw primitive in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Path {
        points: Vec<(f64, f64)>,
    },
}

impl Shape {
    pub fn validate(&self) -> ChartResult<()> {
        let finite = match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => {
                if *width < 0.0 || *height < 0.0 {
                    return Err(ChartError::InvalidData(
                        "rect size must be >= 0".to_owned(),
                    ));
                }
                [x, y, width, height].iter().all(|v| v.is_finite())
            }
            Self::Line { x1, y1, x2, y2 } => [x1, y1, x2, y2].iter().all(|v| v.is_finite()),
            Self::Path { points } => {
                if points.len() < 2 {
                    return Err(ChartError::InvalidData(
                        "path needs at least two points".to_owned(),
                    ));
                }
                points.iter().all(|(x, y)| x.is_finite() && y.is_finite())
            }
        };
        if !finite {
            return Err(ChartError::InvalidData(
                "shape coordinates must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Shape with style and optional hover text, as appended to a scene layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneShape {
    pub shape: Shape,
    pub style: ShapeStyle,
    pub tooltip: Option<String>,
}

impl SceneShape {
    #[must_use]
    pub fn new(shape: Shape, style: ShapeStyle) -> Self {
        Self {
            shape,
            style,
            tooltip: None,
        }
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.shape.validate()?;
        self.style.validate()
    }
}
