//! Instrumentation bus.
//!
//! The driver notifies the bus once at start-up and once after every
//! completed slow step. Filters decide whether a notification goes through;
//! instruments then observe the state, usually by printing part of it.
//!
//! - Filters run in registration order. Any filter returning `false` blocks
//!   the notification.
//! - Every instrument runs on a permitted notification. One returning `false`
//!   is removed after its call.

mod filters;
mod instruments;

pub use filters::{OutputTimes, DEFAULT_OUTPUT_TIMES};
pub use instruments::{CsvRecorder, PressureInstrument, RenalInstrument, VarsInstrument};

use crate::config::Parameters;
use crate::state::{StateRegistry, Variables};

/// Read-only view of the state handed to filters and instruments.
pub struct Observation<'a> {
    pub params: &'a Parameters,
    pub vars: &'a Variables,
    pub registry: &'a StateRegistry,
}

impl Observation<'_> {
    /// Variable or parameter by name.
    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.registry.lookup(self.params, self.vars, name)
    }
}

/// Decides whether a notification reaches the instruments.
pub trait Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn permit(&mut self, obs: &Observation) -> bool;
}

/// Observes permitted notifications. Returning `false` deregisters it.
pub trait Instrument {
    fn name(&self) -> &'static str {
        "instrument"
    }

    fn observe(&mut self, obs: &Observation) -> bool;
}

struct FnFilter<F>(F);

impl<F> Filter for FnFilter<F>
where
    F: FnMut(&Observation) -> bool,
{
    fn permit(&mut self, obs: &Observation) -> bool {
        (self.0)(obs)
    }
}

struct FnInstrument<F>(F);

impl<F> Instrument for FnInstrument<F>
where
    F: FnMut(&Observation) -> bool,
{
    fn observe(&mut self, obs: &Observation) -> bool {
        (self.0)(obs)
    }
}

/// Ordered filters and instruments owned by the driver.
#[derive(Default)]
pub struct InstrumentBus {
    filters: Vec<Box<dyn Filter>>,
    instruments: Vec<Box<dyn Instrument>>,
    /// Notifications received
    pub notifications: u64,
    /// Notifications that passed every filter
    pub permitted: u64,
}

impl InstrumentBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter<F: Filter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    pub fn add_instrument<I: Instrument + 'static>(&mut self, instrument: I) {
        self.instruments.push(Box::new(instrument));
    }

    pub fn add_filter_fn<F>(&mut self, filter: F)
    where
        F: FnMut(&Observation) -> bool + 'static,
    {
        self.add_filter(FnFilter(filter));
    }

    pub fn add_instrument_fn<F>(&mut self, instrument: F)
    where
        F: FnMut(&Observation) -> bool + 'static,
    {
        self.add_instrument(FnInstrument(instrument));
    }

    /// Removes every filter with this name. Returns how many were removed.
    pub fn remove_filter(&mut self, name: &str) -> usize {
        let before = self.filters.len();
        self.filters.retain(|f| f.name() != name);
        before - self.filters.len()
    }

    /// Removes every instrument with this name. Returns how many were removed.
    pub fn remove_instrument(&mut self, name: &str) -> usize {
        let before = self.instruments.len();
        self.instruments.retain(|i| i.name() != name);
        before - self.instruments.len()
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    /// Runs the filters, then the instruments if all filters permit.
    /// Returns whether the notification was permitted.
    pub fn notify(&mut self, obs: &Observation) -> bool {
        self.notifications += 1;

        // Every filter sees every notification, even after one has refused
        let mut permit = true;
        for filter in &mut self.filters {
            permit &= filter.permit(obs);
        }
        if !permit {
            return false;
        }
        self.permitted += 1;

        self.instruments.retain_mut(|instrument| {
            let keep = instrument.observe(obs);
            if !keep {
                log::debug!("Deregistering instrument '{}'", instrument.name());
            }
            keep
        });
        true
    }
}
