//! Wayland layer-shell surface for `vuemeter`.
//!
//! Owns the Iced application loop and wires together:
//! - the base clock, which drives the indicator timer queue
//! - the config file watcher (live reload on change)
//! - Ctrl-C handling for a clean teardown

mod dispatch;
mod popup;

pub use dispatch::{dispatch_due, repaint_requests};

use futures::channel::mpsc::Sender;
use iced::{
    widget::{container, row, Canvas, Row},
    Element, Length, Subscription, Task,
};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use meter_config::{default_path, load as load_config, MeterConfig, Position};
use meter_core::{event::Message as AppMessage, DebugLog, RuntimeContext, TimerQueue};
use meter_renderer::{BarChart, ChartCache, StripChart};
use meter_theme::Theme;
use meter_widgets::{from_config, options_for, Monitor};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Resolution of the base clock feeding the timer queue.
const BASE_TICK: Duration = Duration::from_millis(50);

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the panel.  Returns when the surface is closed.
pub fn run(config: MeterConfig, log: DebugLog) -> iced_layershell::Result {
    let height = config.panel.height;
    let anchor = position_to_anchor(config.panel.position);
    let exclusive_zone = if config.panel.exclusive_zone {
        height as i32
    } else {
        0
    };

    application(
        move || Panel::new(config.clone(), log.clone()),
        Panel::namespace,
        Panel::update,
        Panel::view,
    )
    .subscription(Panel::subscription)
    .style(Panel::style)
    .settings(Settings {
        layer_settings: LayerShellSettings {
            size: Some((0, height)), // width=0 + L|R anchor = full-width stretch
            exclusive_zone,
            anchor,
            layer: Layer::Top,
            ..Default::default()
        },
        ..Default::default()
    })
    .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants (AnchorChange,
/// SizeChange, etc.).  Those are handled by the backend and never reach
/// `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    /// Propagate a core event-bus message.
    App(AppMessage),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Panel {
    config:    MeterConfig,
    theme:     Theme,
    ctx:       RuntimeContext,
    timers:    TimerQueue,
    last_tick: Instant,
    monitors:  Vec<Box<dyn Monitor>>,
    /// Canvas geometry per monitor, same order as `monitors`.
    canvases:  Vec<ChartCache>,
}

impl Panel {
    fn new(config: MeterConfig, log: DebugLog) -> (Self, Task<Message>) {
        let theme = Theme::from_config(&config);
        let ctx = RuntimeContext::new(config.settings(), log);

        let mut panel = Self {
            config,
            theme,
            ctx,
            timers: TimerQueue::new(),
            last_tick: Instant::now(),
            monitors: Vec::new(),
            canvases: Vec::new(),
        };
        panel.build_monitors();

        (panel, Task::none())
    }

    fn namespace() -> String {
        String::from("vuemeter")
    }

    /// (Re)create and start every enabled indicator.
    fn build_monitors(&mut self) {
        self.destroy_monitors();

        self.monitors = match from_config(&self.config, &self.ctx) {
            Ok(monitors) => monitors,
            Err(e) => {
                error!("Cannot build indicators: {e}");
                Vec::new()
            }
        };

        for monitor in &mut self.monitors {
            monitor.indicator_mut().prepare_colors(&self.theme);
            if let Err(e) = monitor.enable(&mut self.timers) {
                error!("{} cannot start: {e}", monitor.id());
            }
        }
        self.canvases = self.monitors.iter().map(|_| ChartCache::new()).collect();
    }

    fn destroy_monitors(&mut self) {
        for mut monitor in self.monitors.drain(..) {
            if let Err(e) = monitor.destroy(&mut self.timers) {
                warn!("{} teardown: {e}", monitor.id());
            }
        }
        self.canvases.clear();
    }

    /// Drop cached geometry of every indicator that asked for a repaint.
    fn flush_repaints(&mut self) {
        for index in repaint_requests(&mut self.monitors) {
            if let Some(cache) = self.canvases.get(index) {
                cache.clear();
            }
        }
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(msg) => {
                let task = self.handle_app(msg);
                self.flush_repaints();
                task
            }
            // Layer-shell injected variants are handled by the backend.
            _ => Task::none(),
        }
    }

    fn handle_app(&mut self, msg: AppMessage) -> Task<Message> {
        match msg {
            AppMessage::Tick => {
                let now = Instant::now();
                let due = self.timers.advance(now.duration_since(self.last_tick));
                self.last_tick = now;
                dispatch_due(&mut self.monitors, &due, &self.ctx, &self.theme);
            }
            AppMessage::ConfigReloaded => match load_config(default_path()) {
                Ok(cfg) => {
                    info!("Config reloaded");
                    return self.apply_config(cfg);
                }
                Err(e) => warn!("Config reload failed: {e}"),
            },
            AppMessage::StyleChanged => {
                for monitor in &mut self.monitors {
                    let indicator = monitor.indicator_mut();
                    indicator.invalidate_styles();
                    indicator.prepare_colors(&self.theme);
                }
            }
            AppMessage::Shutdown => {
                info!("Shutting down");
                self.destroy_monitors();
                return iced::exit();
            }
        }
        Task::none()
    }

    fn apply_config(&mut self, cfg: MeterConfig) -> Task<Message> {
        let restyle = cfg.palette != self.config.palette;
        let rebuild = cfg.indicators.enabled_set() != self.config.indicators.enabled_set()
            || cfg.graph != self.config.graph
            || cfg.bars != self.config.bars
            || cfg.panel.scale_factor != self.config.panel.scale_factor;

        self.ctx.apply_settings(cfg.settings());
        self.theme = Theme::from_config(&cfg);
        self.config = cfg;

        if rebuild {
            self.build_monitors();
        } else {
            for monitor in &mut self.monitors {
                if let Some(indicator) = self.config.indicators.get(monitor.id()) {
                    let interval = options_for(&self.config, indicator).interval;
                    if let Err(e) = monitor.indicator_mut().set_interval(&mut self.timers, interval) {
                        warn!("{}: {e}", monitor.id());
                    }
                }
                if let Err(e) = monitor.apply_settings(&self.ctx) {
                    warn!("{}: {e}", monitor.id());
                }
                monitor.indicator_mut().request_redraw();
            }
        }

        if restyle {
            Task::done(Message::App(AppMessage::StyleChanged))
        } else {
            Task::none()
        }
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        // One sample per logical pixel; the compositor's output scale only
        // widens each sample on screen.
        let graph_width = self.config.graph.width as f32;

        let indicators = self.monitors.iter().zip(&self.canvases).map(|(monitor, cache)| {
            let indicator = monitor.indicator();

            let bars = Canvas::new(BarChart {
                bars:       indicator.bars(),
                geometry:   indicator.geometry(),
                colors:     indicator.colors(),
                visibility: indicator.visibility(),
                cache:      &cache.bars,
            })
            .width(Length::Fixed(indicator.width() as f32))
            .height(Length::Fill);

            let graph = Canvas::new(StripChart {
                graph:      indicator.graph(),
                colors:     indicator.colors(),
                visibility: indicator.visibility(),
                cache:      &cache.strip,
            })
            .width(Length::Fixed(graph_width))
            .height(Length::Fill);

            popup::with_readings(row![bars, graph].spacing(2), indicator, self.theme.background)
        });

        let panel = Row::with_children(indicators)
            .spacing(8)
            .height(Length::Fill);

        container(panel)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(2)
            .align_right(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let tick = iced::time::every(BASE_TICK).map(|_| Message::App(AppMessage::Tick));

        Subscription::batch([
            tick,
            Subscription::run(config_stream),
            Subscription::run(shutdown_stream),
        ])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        let bg = self.theme.background.with_alpha(self.theme.opacity);
        iced::theme::Style {
            background_color: bg.to_iced(),
            text_color: iced::Color::WHITE,
        }
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// Each free function acts as both the stream builder AND the unique identity
// key for `Subscription::run(fn_ptr)`.

/// Watches the settings file for writes and sends `ConfigReloaded`.
fn config_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = meter_config::ConfigWatcher::spawn(default_path());

        while rx.recv().await.is_some() {
            let _ = sender.try_send(Message::App(AppMessage::ConfigReloaded));
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Turns Ctrl-C / SIGINT into `Shutdown` so indicators are torn down.
fn shutdown_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = sender.try_send(Message::App(AppMessage::Shutdown));
            }
            Err(e) => error!("Cannot listen for Ctrl-C: {e}"),
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn position_to_anchor(pos: Position) -> Anchor {
    match pos {
        Position::Top    => Anchor::Top    | Anchor::Left | Anchor::Right,
        Position::Bottom => Anchor::Bottom | Anchor::Left | Anchor::Right,
    }
}
