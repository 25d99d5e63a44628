use std::time::{Duration, Instant};

/// Cursor blink state, advanced by the periodic tick.
///
/// The visible phase lasts longer than the hidden one.
#[derive(Debug, Clone)]
pub struct Blink {
    visible: bool,
    on: Duration,
    off: Duration,
    next_toggle: Instant,
}

impl Blink {
    pub fn new(on: Duration, off: Duration, now: Instant) -> Self {
        Self {
            visible: true,
            on,
            off,
            next_toggle: now + on,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Flip the flag if its phase is over. Returns true when it changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_toggle {
            return false;
        }
        self.visible = !self.visible;
        let phase = if self.visible { self.on } else { self.off };
        self.next_toggle = now + phase;
        true
    }

    /// Show the cursor and restart the visible phase, so it does not vanish
    /// while the user is typing.
    pub fn reset(&mut self, now: Instant) {
        self.visible = true;
        self.next_toggle = now + self.on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_with_uneven_phases() {
        let start = Instant::now();
        let mut blink = Blink::new(Duration::from_millis(1000), Duration::from_millis(300), start);
        assert!(blink.visible());

        assert!(!blink.tick(start + Duration::from_millis(999)));
        assert!(blink.tick(start + Duration::from_millis(1000)));
        assert!(!blink.visible());

        assert!(!blink.tick(start + Duration::from_millis(1299)));
        assert!(blink.tick(start + Duration::from_millis(1300)));
        assert!(blink.visible());
    }

    #[test]
    fn reset_restores_visibility() {
        let start = Instant::now();
        let mut blink = Blink::new(Duration::from_millis(10), Duration::from_millis(10), start);
        blink.tick(start + Duration::from_millis(10));
        assert!(!blink.visible());
        blink.reset(start + Duration::from_millis(11));
        assert!(blink.visible());
        assert!(!blink.tick(start + Duration::from_millis(20)));
    }
}
