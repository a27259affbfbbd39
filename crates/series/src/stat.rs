/// One segment of a composite bar value.
#[derive(Debug, Clone, PartialEq)]
pub struct StatValue {
    /// Height as a fraction of the bar, in `[0, 1]`.
    pub value: f64,
    /// Hidden segments are tracked but not drawn.
    pub visible: bool,
    /// Palette class name.
    pub color: String,
}

impl StatValue {
    pub fn new(value: f64, color: impl Into<String>) -> Self {
        Self {
            value,
            visible: true,
            color: color.into(),
        }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Composite value of one bar: one or more segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatValues {
    pub values: Vec<StatValue>,
}

impl StatValues {
    pub fn new(values: Vec<StatValue>) -> Self {
        Self { values }
    }

    /// Flat value expressed as a one-segment composite.
    pub fn single(value: f64, color: impl Into<String>) -> Self {
        Self::new(vec![StatValue::new(value, color)])
    }

    /// Visible segments, tallest first, so that smaller ones stay on top.
    pub fn draw_order(&self) -> Vec<&StatValue> {
        let mut visible: Vec<&StatValue> = self.values.iter().filter(|v| v.visible).collect();
        visible.sort_by(|a, b| b.value.total_cmp(&a.value));
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_order_skips_hidden_and_sorts_tallest_first() {
        let stat = StatValues::new(vec![
            StatValue::new(0.2, "sys"),
            StatValue::new(0.9, "user").hidden(),
            StatValue::new(0.6, "total"),
        ]);
        let order: Vec<&str> = stat.draw_order().iter().map(|v| v.color.as_str()).collect();
        assert_eq!(order, vec!["total", "sys"]);
    }
}
