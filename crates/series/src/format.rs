/// Format a value with a binary metric prefix: `"%0.2f <prefix><units>"`.
///
/// Only `Ki` and `Mi` are used; anything larger stays in `Mi`.
pub fn format_metric_pretty(value: f64, units: &str) -> String {
    const KI: f64 = 1024.0;
    const MI: f64 = 1024.0 * 1024.0;

    let (value, prefix) = if value > MI {
        (value / MI, "Mi")
    } else if value > KI {
        (value / KI, "Ki")
    } else {
        (value, "")
    };

    format!("{value:.2} {prefix}{units}")
}
