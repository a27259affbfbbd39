use meter_core::{RuntimeContext, TimerToken};
use meter_theme::StyleLookup;
use meter_widgets::Monitor;
use tracing::{error, trace};

/// Hand every due token to the indicator that owns it. Returns how many
/// indicators sampled.
pub fn dispatch_due(
    monitors: &mut [Box<dyn Monitor>],
    due: &[TimerToken],
    ctx: &RuntimeContext,
    style: &dyn StyleLookup,
) -> usize {
    let mut sampled = 0;

    for token in due {
        for monitor in monitors.iter_mut() {
            match monitor.handle_tick(*token, ctx) {
                Ok(true) => {
                    monitor.indicator_mut().prepare_colors(style);
                    sampled += 1;
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    error!("{} update failed: {e}", monitor.id());
                    break;
                }
            }
        }
    }

    sampled
}

/// Indices of the indicators that asked for a repaint since the last call.
/// Their canvas caches must be cleared; every other canvas reuses its
/// geometry.
pub fn repaint_requests(monitors: &mut [Box<dyn Monitor>]) -> Vec<usize> {
    monitors
        .iter_mut()
        .enumerate()
        .filter_map(|(index, monitor)| {
            let repaint = monitor.indicator_mut().take_redraw();
            if repaint {
                trace!("{} repaint", monitor.id());
            }
            repaint.then_some(index)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::{DebugLog, Result, Scheduler, Settings, TimerQueue};
    use meter_system::{SwapProvider, SwapReading};
    use meter_theme::Theme;
    use meter_widgets::{IndicatorOptions, SwapIndicator};
    use std::time::Duration;

    #[derive(Debug)]
    struct Quarter;

    impl SwapProvider for Quarter {
        fn read_swap(&mut self) -> Result<SwapReading> {
            Ok(SwapReading { total: 400, used: 100, ..SwapReading::default() })
        }
    }

    #[test]
    fn due_tokens_sample_and_resolve_colors() {
        let ctx = RuntimeContext::new(Settings::default(), DebugLog::new("/nonexistent/debug.log"));
        let mut timers = TimerQueue::new();
        let mut monitors: Vec<Box<dyn Monitor>> =
            vec![Box::new(SwapIndicator::new(Quarter, &IndicatorOptions::default()).unwrap())];
        monitors[0].enable(&mut timers).unwrap();

        let due = timers.advance(Duration::from_millis(250));
        let sampled = dispatch_due(&mut monitors, &due, &ctx, &Theme::default());

        assert_eq!(sampled, 1);
        let colors = monitors[0].indicator().colors();
        assert!(colors.get("swap-used-color").is_some());
        assert!(colors.get("grid-color").is_some());

        timers.cancel(monitors[0].indicator().schedule().token());
        assert_eq!(dispatch_due(&mut monitors, &[TimerToken::IDLE], &ctx, &Theme::default()), 0);
    }

    #[test]
    fn only_sampled_indicators_repaint() {
        let ctx = RuntimeContext::new(Settings::default(), DebugLog::new("/nonexistent/debug.log"));
        let mut timers = TimerQueue::new();
        let slow = IndicatorOptions { interval: Duration::from_millis(2_000), ..IndicatorOptions::default() };
        let mut monitors: Vec<Box<dyn Monitor>> = vec![
            Box::new(SwapIndicator::new(Quarter, &IndicatorOptions::default()).unwrap()),
            Box::new(SwapIndicator::new(Quarter, &slow).unwrap()),
        ];
        for monitor in &mut monitors {
            monitor.enable(&mut timers).unwrap();
        }

        let due = timers.advance(Duration::from_millis(250));
        dispatch_due(&mut monitors, &due, &ctx, &Theme::default());
        assert_eq!(repaint_requests(&mut monitors), vec![0]);

        // Nothing sampled since: every canvas keeps its cached frame.
        dispatch_due(&mut monitors, &[], &ctx, &Theme::default());
        assert!(repaint_requests(&mut monitors).is_empty());

        monitors[1].indicator_mut().invalidate_styles();
        assert_eq!(repaint_requests(&mut monitors), vec![1]);
    }
}
