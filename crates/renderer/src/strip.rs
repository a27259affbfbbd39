use crate::draw::{DrawContext, Surface};
use meter_series::{FillPolicy, Graph};
use meter_theme::{Color, ColorCache};

/// Major horizontal divisions of a strip chart.
pub const NUM_GRID_LINES: usize = 8;
pub const GRID_COLOR: &str = "grid-color";
pub(crate) const GRID_DASH: [f64; 2] = [2.0, 1.0];

/// Paint `graph` onto `ctx`. Returns `false` when the frame was skipped,
/// in which case nothing at all was drawn.
pub fn render_strip_chart(
    ctx: &mut dyn DrawContext,
    surface: &Surface,
    graph: &Graph,
    colors: &ColorCache,
) -> bool {
    if !surface.visibility.should_draw() || !graph.is_ready() || !graph.scale().is_drawable() {
        return false;
    }

    let (width, height) = (surface.width, surface.height);
    let grid = colors.color_or(GRID_COLOR, Color::DEFAULT_GRID);
    let offset = (height / (NUM_GRID_LINES + 1) as f64).floor();

    grid_lines(ctx, width, offset, NUM_GRID_LINES, grid);
    grid_lines(ctx, width, offset / 2.0, NUM_GRID_LINES * 2 + 1, grid.fade(0.2));

    let scale = graph.scale();
    let mut drawn = 0;
    for series in graph.series().iter() {
        if series.is_empty() {
            continue;
        }
        let color = colors.color_or(series.color(), Color::DEFAULT_STATS);
        let scaled = series.scaled(scale.shared_max());

        let filled = match graph.config().fill_policy {
            FillPolicy::FirstOnly => drawn == 0,
            FillPolicy::All => true,
        };
        drawn += 1;
        if filled {
            plot(ctx, height, &scaled);
            ctx.line_to((scaled.len() - 1) as f64, height);
            ctx.line_to(0.0, height);
            ctx.close_path();
            ctx.set_source(color.fade(0.2));
            ctx.fill();
        }

        plot(ctx, height, &scaled);
        ctx.set_source(color);
        ctx.set_line_width(1.0);
        ctx.set_dash(&[], 0.0);
        ctx.stroke();
    }

    for line in graph.reference_lines() {
        let y = ((1.0 - scale.scale(line.value)) * height).floor() + 0.5;
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
        ctx.set_source(colors.color_or(&line.color, Color::DEFAULT_STATS));
        ctx.set_line_width(1.0);
        ctx.set_dash(&GRID_DASH, 0.0);
        ctx.stroke();
    }

    true
}

fn grid_lines(ctx: &mut dyn DrawContext, width: f64, offset: f64, count: usize, color: Color) {
    for i in 1..=count {
        let y = i as f64 * offset + 0.5;
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
    }
    ctx.set_source(color);
    ctx.set_line_width(1.0);
    ctx.set_dash(&GRID_DASH, 0.0);
    ctx.stroke();
}

fn plot(ctx: &mut dyn DrawContext, height: f64, scaled: &[f64]) {
    let first = scaled.first().copied().unwrap_or(0.0);
    ctx.move_to(0.0, (1.0 - first) * height);
    for (k, value) in scaled.iter().enumerate().skip(1) {
        ctx.line_to(k as f64, (1.0 - value) * height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawOp, Recorder};
    use meter_core::Visibility;
    use meter_series::{GraphConfig, ReferenceLine};

    fn graph(policy: FillPolicy) -> Graph {
        let mut g = Graph::new(GraphConfig {
            fill_policy: policy,
            width_px: 4,
            height_px: 18,
            ..GraphConfig::default()
        });
        g.add_data_set("in", "network-in-color").unwrap();
        g.add_data_set("out", "network-out-color").unwrap();
        g
    }

    fn surface() -> Surface {
        Surface::new(4.0, 18.0)
    }

    #[test]
    fn empty_autoscale_graph_draws_nothing() {
        let mut g = graph(FillPolicy::FirstOnly);
        g.add_data_point("in", 0.0).unwrap();
        g.add_data_point("out", 0.000_001).unwrap();

        let mut rec = Recorder::new();
        assert!(!render_strip_chart(&mut rec, &surface(), &g, &ColorCache::new()));
        assert!(rec.is_empty());
    }

    #[test]
    fn hidden_surface_draws_nothing() {
        let mut g = graph(FillPolicy::FirstOnly);
        g.add_data_point("in", 10.0).unwrap();

        let overview = surface().with_visibility(Visibility { overview: true, ..Visibility::SHOWN });
        let mut rec = Recorder::new();
        assert!(!render_strip_chart(&mut rec, &overview, &g, &ColorCache::new()));
        assert!(rec.is_empty());

        g.disable();
        assert!(!render_strip_chart(&mut rec, &surface(), &g, &ColorCache::new()));
        assert!(rec.is_empty());
    }

    #[test]
    fn grid_then_first_series_filled() {
        let mut g = graph(FillPolicy::FirstOnly);
        g.add_data_point("in", 10.0).unwrap();
        g.add_data_point("in", 5.0).unwrap();
        g.add_data_point("out", 2.5).unwrap();

        let mut rec = Recorder::new();
        assert!(render_strip_chart(&mut rec, &surface(), &g, &ColorCache::new()));

        // two grid strokes, one fill, two series strokes
        assert_eq!(rec.strokes(), 4);
        assert_eq!(rec.fills(), 1);

        // major grid: floor(18 / 9) = 2 px apart, offset by half a pixel
        assert_eq!(rec.ops[0], DrawOp::MoveTo(0.0, 2.5));
        assert_eq!(rec.count(|op| matches!(op, DrawOp::MoveTo(0.0, _))), 8 + 17 + 3);

        // first series: y = (1 - v / 10) * 18
        assert!(rec.ops.contains(&DrawOp::MoveTo(0.0, 0.0)));
        assert!(rec.ops.contains(&DrawOp::LineTo(1.0, 9.0)));
    }

    #[test]
    fn first_non_empty_series_gets_the_fill() {
        let mut g = graph(FillPolicy::FirstOnly);
        g.add_data_point("out", 8.0).unwrap();
        g.add_data_point("out", 4.0).unwrap();

        let mut rec = Recorder::new();
        assert!(render_strip_chart(&mut rec, &surface(), &g, &ColorCache::new()));
        assert_eq!(rec.fills(), 1);
        assert_eq!(rec.strokes(), 3);
    }

    #[test]
    fn fill_all_fills_every_series() {
        let mut g = graph(FillPolicy::All);
        g.add_data_point("in", 10.0).unwrap();
        g.add_data_point("out", 4.0).unwrap();

        let mut rec = Recorder::new();
        render_strip_chart(&mut rec, &surface(), &g, &ColorCache::new());
        assert_eq!(rec.fills(), 2);
    }

    #[test]
    fn reference_lines_are_dashed() {
        let mut g = graph(FillPolicy::FirstOnly);
        g.add_data_point("in", 10.0).unwrap();
        g.set_reference_lines(vec![ReferenceLine { value: 5.0, color: "network-in-color".into() }]);

        let mut rec = Recorder::new();
        render_strip_chart(&mut rec, &surface(), &g, &ColorCache::new());

        let tail = &rec.ops[rec.ops.len() - 6..];
        assert_eq!(tail[0], DrawOp::MoveTo(0.0, 9.5));
        assert_eq!(tail[4], DrawOp::SetDash(vec![2.0, 1.0], 0.0));
        assert_eq!(tail[5], DrawOp::Stroke);
    }
}
