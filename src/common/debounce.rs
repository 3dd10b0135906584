//! Contact debounce.
//!
//! One physical contact can produce several collision-enter events inside a single resolved
//! step. A debounce accepts the first and drops the rest until `cooldown` seconds pass.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debounce {
    cooldown: f32,
    last: Option<f32>,
}

impl Debounce {
    pub const fn new(cooldown: f32) -> Self {
        Self { cooldown, last: None }
    }

    /// Register a contact at `now`. Returns `false` if it falls inside the window.
    pub fn try_fire(&mut self, now: f32) -> bool {
        if let Some(last) = self.last
            && now - last < self.cooldown
        {
            return false;
        }
        self.last = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn last(&self) -> Option<f32> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::Debounce;

    #[test]
    fn first_contact_always_fires() {
        let mut d = Debounce::new(0.6);
        assert!(d.try_fire(0.0));
    }

    #[test]
    fn contacts_inside_window_are_dropped() {
        let mut d = Debounce::new(0.6);
        assert!(d.try_fire(1.0));
        assert!(!d.try_fire(1.0));
        assert!(!d.try_fire(1.3));
        assert!(!d.try_fire(1.59));
        assert!(d.try_fire(1.6));
        assert_eq!(d.last(), Some(1.6));
    }

    #[test]
    fn dropped_contacts_do_not_extend_the_window() {
        let mut d = Debounce::new(0.25);
        assert!(d.try_fire(0.0));
        assert!(!d.try_fire(0.2));
        assert!(d.try_fire(0.25));
    }

    #[test]
    fn reset_clears_history() {
        let mut d = Debounce::new(10.0);
        assert!(d.try_fire(0.0));
        d.reset();
        assert!(d.try_fire(0.1));
    }
}
