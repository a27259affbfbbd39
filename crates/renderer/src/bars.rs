use crate::draw::{DrawContext, Surface};
use crate::strip::{GRID_COLOR, GRID_DASH, NUM_GRID_LINES};
use meter_series::BarSet;
use meter_theme::{Color, ColorCache};

/// Bar width and gap, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub width:   f64,
    pub padding: f64,
}

impl BarGeometry {
    /// Logical sizes multiplied by the display scale factor.
    pub fn scaled(width: f64, padding: f64, scale_factor: f64) -> Self {
        Self {
            width:   width * scale_factor,
            padding: padding * scale_factor,
        }
    }

    fn outer(&self) -> f64 {
        self.width + self.padding
    }

    /// Horizontal extent of bar `index`.
    pub fn span(&self, index: usize) -> (f64, f64) {
        let i = index as f64;
        (i * self.outer() + self.padding, (i + 1.0) * self.outer())
    }

    /// Width of an indicator holding `bars` bars.
    pub fn indicator_width(&self, bars: usize) -> f64 {
        bars as f64 * self.outer() + self.padding * 2.0 - 1.0
    }
}

/// Paint the latest value of every bar. Returns `false` when skipped.
pub fn render_bars(
    ctx: &mut dyn DrawContext,
    surface: &Surface,
    bars: &BarSet,
    geometry: &BarGeometry,
    colors: &ColorCache,
) -> bool {
    if !surface.visibility.should_draw() {
        return false;
    }

    let (width, height) = (surface.width, surface.height);
    let offset = (height / (NUM_GRID_LINES + 2) as f64).floor();

    for i in 0..=NUM_GRID_LINES + 2 {
        let y = i as f64 * offset;
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
    }
    ctx.set_source(colors.color_or(GRID_COLOR, Color::DEFAULT_GRID));
    ctx.set_line_width(1.0);
    ctx.set_dash(&GRID_DASH, 0.0);
    ctx.stroke();

    for (index, bar) in bars.iter().enumerate() {
        let Some(latest) = bar.latest() else { continue };
        let (x0, x1) = geometry.span(index);

        for segment in latest.draw_order() {
            let color = colors.color_or(&segment.color, Color::DEFAULT_STATS);
            let top = (1.0 - segment.value.clamp(0.0, 1.0)) * height;

            ctx.move_to(x0, top);
            ctx.line_to(x1, top);
            ctx.line_to(x1, height);
            ctx.line_to(x0, height);
            ctx.close_path();
            ctx.set_source(color.fade(0.8));
            ctx.fill();

            ctx.move_to(x0, top + 0.5);
            ctx.line_to(x1, top + 0.5);
            ctx.set_source(color);
            ctx.set_line_width(1.0);
            ctx.set_dash(&[], 0.0);
            ctx.stroke();
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawOp, Recorder};
    use meter_core::Visibility;
    use meter_series::{StatValue, StatValues};

    #[test]
    fn geometry_matches_bar_layout() {
        let g = BarGeometry::scaled(6.0, 1.0, 2.0);
        assert_eq!(g.span(0), (2.0, 14.0));
        assert_eq!(g.span(1), (16.0, 28.0));
        assert_eq!(g.indicator_width(4), 4.0 * 14.0 + 4.0 - 1.0);
    }

    #[test]
    fn segments_drawn_tallest_first() {
        let mut bars = BarSet::new();
        bars.add_data_set("cpu_0", "cpu-color").unwrap();
        bars.add_data_point(
            "cpu_0",
            StatValues::new(vec![StatValue::new(0.25, "cpu-sys-color"), StatValue::new(0.75, "cpu-total-color")]),
        )
        .unwrap();

        let mut rec = Recorder::new();
        let geometry = BarGeometry::scaled(6.0, 1.0, 1.0);
        assert!(render_bars(&mut rec, &Surface::new(20.0, 20.0), &bars, &geometry, &ColorCache::new()));

        // grid + two stroked segment tops
        assert_eq!(rec.strokes(), 3);
        assert_eq!(rec.fills(), 2);

        let tops: Vec<f64> = rec
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::MoveTo(x, y) if *x == 1.0 => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(tops, vec![5.0, 5.5, 15.0, 15.5]);
    }

    #[test]
    fn grid_spans_twelve_lines() {
        let mut rec = Recorder::new();
        let geometry = BarGeometry::scaled(6.0, 1.0, 1.0);
        render_bars(&mut rec, &Surface::new(10.0, 20.0), &BarSet::new(), &geometry, &ColorCache::new());
        assert_eq!(rec.count(|op| matches!(op, DrawOp::MoveTo(..))), NUM_GRID_LINES + 3);
        assert_eq!(rec.ops[2], DrawOp::MoveTo(0.0, 2.0));
    }

    #[test]
    fn unmapped_surface_draws_nothing() {
        let mut rec = Recorder::new();
        let surface = Surface::new(10.0, 20.0).with_visibility(Visibility { mapped: false, ..Visibility::SHOWN });
        let geometry = BarGeometry::scaled(6.0, 1.0, 1.0);
        assert!(!render_bars(&mut rec, &surface, &BarSet::new(), &geometry, &ColorCache::new()));
        assert!(rec.is_empty());
    }
}
