//! Haptic/audio cue hook fired on zone entry.

use crate::event::ZoneAlert;

/// Side-effect hook invoked once per zone entry.
///
/// Implementations should return quickly; they run inline while the
/// position update is processed.
pub trait AlertCue: Send {
    fn on_zone_entered(&mut self, alert: &ZoneAlert);
}

/// A cue that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCue;

impl AlertCue for NoCue {
    fn on_zone_entered(&mut self, _alert: &ZoneAlert) {}
}

/// Adapts a closure into an [`AlertCue`].
pub struct FnCue<F>(pub F);

impl<F> AlertCue for FnCue<F>
where
    F: FnMut(&ZoneAlert) + Send,
{
    fn on_zone_entered(&mut self, alert: &ZoneAlert) {
        (self.0)(alert)
    }
}
