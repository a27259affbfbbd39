pub mod cpu;
pub mod indicator;
pub mod memory;
pub mod network;
pub mod scheduler;
pub mod swap;

pub use cpu::CpuIndicator;
pub use indicator::{Indicator, IndicatorOptions, Monitor, LABEL_COLOR};
pub use memory::MemoryIndicator;
pub use network::NetworkIndicator;
pub use scheduler::{Lifecycle, SampleScheduler};
pub use swap::SwapIndicator;

use meter_config::{IndicatorConfig, MeterConfig};
use meter_core::{Result, RuntimeContext};
use meter_system::{ProcStat, SystemMemory, SystemNetworks, SystemSwap};
use std::time::Duration;
use tracing::info;

/// Options for one indicator from the settings file.
pub fn options_for(config: &MeterConfig, indicator: &IndicatorConfig) -> IndicatorOptions {
    IndicatorOptions {
        interval:     Duration::from_millis(indicator.interval_ms),
        bar_width:    config.bars.width as f64,
        bar_padding:  config.bars.padding as f64,
        scale_factor: config.panel.scale_factor as f64,
        graph_width:  config.graph.width,
        graph_height: config.graph.height,
    }
}

/// Build the enabled indicators in panel order: CPU, memory, swap, network.
/// None of them is ticking yet.
pub fn from_config(config: &MeterConfig, ctx: &RuntimeContext) -> Result<Vec<Box<dyn Monitor>>> {
    let ind = &config.indicators;
    let mut monitors: Vec<Box<dyn Monitor>> = Vec::new();

    if ind.cpu.enabled {
        monitors.push(Box::new(CpuIndicator::new(ProcStat::default(), &options_for(config, &ind.cpu))?));
    }
    if ind.memory.enabled {
        monitors.push(Box::new(MemoryIndicator::new(
            SystemMemory::default(),
            &options_for(config, &ind.memory),
            ctx,
        )?));
    }
    if ind.swap.enabled {
        monitors.push(Box::new(SwapIndicator::new(SystemSwap::default(), &options_for(config, &ind.swap))?));
    }
    if ind.network.enabled {
        monitors.push(Box::new(NetworkIndicator::new(
            SystemNetworks::default(),
            &options_for(config, &ind.network),
            ctx,
        )?));
    }

    info!("{} indicators ready", monitors.len());
    Ok(monitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::{DebugLog, MeterWidget, Scheduler, Settings, TimerQueue, TimerToken};
    use meter_system::{SwapProvider, SwapReading};

    #[derive(Debug)]
    struct HalfFull;

    impl SwapProvider for HalfFull {
        fn read_swap(&mut self) -> Result<SwapReading> {
            Ok(SwapReading { total: 100, used: 50, ..SwapReading::default() })
        }
    }

    fn ctx() -> RuntimeContext {
        RuntimeContext::new(Settings::default(), DebugLog::new("/nonexistent/debug.log"))
    }

    fn swap(interval_ms: u64) -> SwapIndicator<HalfFull> {
        let options = IndicatorOptions {
            interval: Duration::from_millis(interval_ms),
            ..IndicatorOptions::default()
        };
        SwapIndicator::new(HalfFull, &options).unwrap()
    }

    fn dispatch(q: &mut TimerQueue, monitors: &mut [&mut dyn Monitor], elapsed: Duration) -> usize {
        let mut handled = 0;
        for token in q.advance(elapsed) {
            for m in monitors.iter_mut() {
                if m.handle_tick(token, &ctx()).unwrap() {
                    handled += 1;
                }
            }
        }
        handled
    }

    fn samples(m: &dyn Monitor) -> usize {
        m.indicator().bars().iter().map(|b| b.len()).sum()
    }

    #[test]
    fn enable_then_disable_before_first_tick_records_nothing() {
        let mut q = TimerQueue::new();
        let mut s = swap(250);

        s.enable(&mut q).unwrap();
        assert_eq!(samples(&s), 0);
        s.disable(&mut q).unwrap();

        let mut monitors: [&mut dyn Monitor; 1] = [&mut s];
        assert_eq!(dispatch(&mut q, &mut monitors, Duration::from_secs(5)), 0);
        assert_eq!(samples(&s), 0);
        assert_eq!(s.indicator().schedule().token(), TimerToken::IDLE);
    }

    #[test]
    fn ticks_reach_only_their_owner() {
        let mut q = TimerQueue::new();
        let mut fast = swap(250);
        let mut slow = swap(2000);
        fast.enable(&mut q).unwrap();
        slow.enable(&mut q).unwrap();

        let mut monitors: [&mut dyn Monitor; 2] = [&mut fast, &mut slow];
        let handled = dispatch(&mut q, &mut monitors, Duration::from_millis(250));
        assert_eq!(handled, 1);
        assert_eq!(samples(&fast), 1);
        assert_eq!(samples(&slow), 0);
        assert!(fast.indicator_mut().take_redraw());
        assert!(!fast.indicator_mut().take_redraw());
    }

    #[test]
    fn destroyed_indicator_stops_and_rejects_enable() {
        let mut q = TimerQueue::new();
        let mut s = swap(250);
        s.enable(&mut q).unwrap();
        s.destroy(&mut q).unwrap();

        assert!(q.is_empty());
        assert!(s.enable(&mut q).is_err());
        assert!(!s.indicator().graph().is_ready());
        assert!(!q.cancel(s.indicator().schedule().token()));
    }

    #[test]
    fn update_values_can_run_without_timer() {
        let mut s = swap(250);
        s.update_values(&ctx()).unwrap();
        assert_eq!(s.indicator().label("Total swap usage"), Some("50.00 B"));
    }

    #[test]
    fn options_come_from_config() {
        let config = MeterConfig::default();
        let options = options_for(&config, &config.indicators.memory);
        assert_eq!(options.interval, Duration::from_millis(1000));
        assert_eq!(options.graph_width, config.graph.width);
    }
}
