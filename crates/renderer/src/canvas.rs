//! iced `canvas` adapter for the renderers.

use crate::bars::{render_bars, BarGeometry};
use crate::draw::{DrawContext, Surface};
use crate::strip::render_strip_chart;
use iced::mouse;
use iced::widget::canvas::{self, path, Cache, Frame, Geometry, LineDash, Stroke, Text};
use iced::{Point, Rectangle, Renderer, Size, Theme};
use meter_core::Visibility;
use meter_series::{BarSet, Graph};
use meter_theme::{Color, ColorCache};

/// [`DrawContext`] on top of an iced [`Frame`].
pub struct FrameContext<'a> {
    frame:       &'a mut Frame,
    builder:     path::Builder,
    source:      Color,
    line_width:  f32,
    dash:        Vec<f32>,
    dash_offset: usize,
}

impl<'a> FrameContext<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        Self {
            frame,
            builder: path::Builder::new(),
            source: Color::BLACK,
            line_width: 1.0,
            dash: Vec::new(),
            dash_offset: 0,
        }
    }

    fn take_path(&mut self) -> canvas::Path {
        std::mem::replace(&mut self.builder, path::Builder::new()).build()
    }
}

impl DrawContext for FrameContext<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.builder.move_to(Point::new(x as f32, y as f32));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.builder.line_to(Point::new(x as f32, y as f32));
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.builder
            .rectangle(Point::new(x as f32, y as f32), Size::new(width as f32, height as f32));
    }

    fn close_path(&mut self) {
        self.builder.close();
    }

    fn set_source(&mut self, color: Color) {
        self.source = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width as f32;
    }

    fn set_dash(&mut self, dashes: &[f64], offset: f64) {
        self.dash = dashes.iter().map(|d| *d as f32).collect();
        self.dash_offset = offset as usize;
    }

    fn stroke(&mut self) {
        let path = self.take_path();
        let stroke = Stroke {
            line_dash: LineDash {
                segments: &self.dash,
                offset:   self.dash_offset,
            },
            ..Stroke::default()
                .with_color(self.source.to_iced())
                .with_width(self.line_width)
        };
        self.frame.stroke(&path, stroke);
    }

    fn fill(&mut self) {
        let path = self.take_path();
        self.frame.fill(&path, self.source.to_iced());
    }
}

/// Cached geometry for the two canvases of one indicator.
///
/// Frames are only rebuilt after [`ChartCache::clear`] or a resize.
pub struct ChartCache {
    pub bars:  Cache,
    pub strip: Cache,
}

impl Default for ChartCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartCache {
    pub fn new() -> Self {
        Self {
            bars:  Cache::new(),
            strip: Cache::new(),
        }
    }

    pub fn clear(&self) {
        self.bars.clear();
        self.strip.clear();
    }
}

/// Strip chart program for a `Canvas` widget.
pub struct StripChart<'a> {
    pub graph:      &'a Graph,
    pub colors:     &'a ColorCache,
    pub visibility: Visibility,
    pub cache:      &'a Cache,
}

impl<Message> canvas::Program<Message> for StripChart<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_chart(frame, bounds.size());
        });

        vec![geometry]
    }
}

impl StripChart<'_> {
    fn draw_chart(&self, frame: &mut Frame, size: Size) {
        let surface = Surface::new(size.width as f64, size.height as f64)
            .with_visibility(self.visibility);

        let drawn = render_strip_chart(&mut FrameContext::new(frame), &surface, self.graph, self.colors);

        if let (true, Some(label)) = (drawn, self.graph.max_label()) {
            frame.fill_text(Text {
                content: label.to_string(),
                position: Point::new(2.0, 1.0),
                color: self.colors.color_or("label-color", Color::WHITE).to_iced(),
                size: 10.0.into(),
                ..Text::default()
            });
        }
    }
}

/// Bar indicator program for a `Canvas` widget.
pub struct BarChart<'a> {
    pub bars:       &'a BarSet,
    pub geometry:   BarGeometry,
    pub colors:     &'a ColorCache,
    pub visibility: Visibility,
    pub cache:      &'a Cache,
}

impl<Message> canvas::Program<Message> for BarChart<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            let surface = Surface::new(bounds.width as f64, bounds.height as f64)
                .with_visibility(self.visibility);
            render_bars(&mut FrameContext::new(frame), &surface, self.bars, &self.geometry, self.colors);
        });

        vec![geometry]
    }
}
