//! Hover popup with an indicator's current readings.

use iced::widget::{container, text, tooltip};
use iced::Element;
use meter_theme::Color;
use meter_widgets::{Indicator, LABEL_COLOR};

const SEPARATOR: &str = "   ";

/// All `description: value` pairs on a single line; the panel is one text
/// row tall.
pub fn label_summary(labels: &[(String, String)]) -> String {
    labels
        .iter()
        .map(|(description, value)| format!("{description}: {value}"))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Wrap `content` in a tooltip listing the indicator's labels. Indicators
/// without labels yet (nothing sampled) get no tooltip.
pub fn with_readings<'a, Message: 'a>(
    content: impl Into<Element<'a, Message>>,
    indicator: &Indicator,
    background: Color,
) -> Element<'a, Message> {
    let summary = label_summary(indicator.labels());
    if summary.is_empty() {
        return content.into();
    }

    let fg = indicator.colors().color_or(LABEL_COLOR, Color::WHITE).to_iced();
    let bg = background.to_iced();
    let popup = container(text(summary).size(11).color(fg))
        .padding([1, 6])
        .style(move |_: &iced::Theme| container::Style {
            background: Some(bg.into()),
            ..Default::default()
        });

    tooltip(content, popup, tooltip::Position::Left).gap(4).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_keeps_label_order() {
        let labels = vec![
            ("Current inbound".to_string(), "1.5 KiB/s".to_string()),
            ("Maximum inbound (over 2 hours)".to_string(), "56.0 KiB/s".to_string()),
        ];
        assert_eq!(
            label_summary(&labels),
            "Current inbound: 1.5 KiB/s   Maximum inbound (over 2 hours): 56.0 KiB/s"
        );
    }

    #[test]
    fn no_labels_no_summary() {
        assert_eq!(label_summary(&[]), "");
    }
}
