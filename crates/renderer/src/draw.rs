use meter_core::Visibility;
use meter_theme::Color;

/// Path-based 2D drawing capability.
///
/// Calls build up a current path; [`DrawContext::stroke`] and
/// [`DrawContext::fill`] paint it with the current source and consume it.
pub trait DrawContext {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);
    fn set_source(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    /// Empty `dashes` means a solid line.
    fn set_dash(&mut self, dashes: &[f64], offset: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
}

/// Size and host visibility of the area being painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width:      f64,
    pub height:     f64,
    pub visibility: Visibility,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            visibility: Visibility::SHOWN,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Rectangle(f64, f64, f64, f64),
    ClosePath,
    SetSource(Color),
    SetLineWidth(f64),
    SetDash(Vec<f64>, f64),
    Stroke,
    Fill,
}

/// [`DrawContext`] that only records calls.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn strokes(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Stroke))
    }

    pub fn fills(&self) -> usize {
        self.count(|op| matches!(op, DrawOp::Fill))
    }
}

impl DrawContext for Recorder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Rectangle(x, y, width, height));
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn set_source(&mut self, color: Color) {
        self.ops.push(DrawOp::SetSource(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn set_dash(&mut self, dashes: &[f64], offset: f64) {
        self.ops.push(DrawOp::SetDash(dashes.to_vec(), offset));
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }
}
