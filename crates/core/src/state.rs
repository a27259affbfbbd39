use std::time::Instant;

/// A single scalar reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value:     f64,
    pub timestamp: Instant,
}

impl Sample {
    pub fn now(value: f64) -> Self {
        Self {
            value,
            timestamp: Instant::now(),
        }
    }
}

/// Host-side visibility of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    /// Surface is attached to a stage / output.
    pub mapped: bool,
    /// Surface is shown (not hidden by its parent).
    pub visible: bool,
    /// The host is in overview / expose mode.
    pub overview: bool,
}

impl Visibility {
    pub const SHOWN: Self = Self {
        mapped:   true,
        visible:  true,
        overview: false,
    };

    /// Whether drawing would produce anything the user can see.
    #[must_use]
    pub fn should_draw(self) -> bool {
        self.mapped && self.visible && !self.overview
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::SHOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_suppresses_drawing() {
        let v = Visibility { overview: true, ..Visibility::SHOWN };
        assert!(!v.should_draw());
        assert!(Visibility::default().should_draw());
        assert!(!Visibility { mapped: false, ..Visibility::SHOWN }.should_draw());
    }
}
