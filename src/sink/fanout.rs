// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Passing events to multiple [`ReportSink`]s.

use std::fmt;

use tracing::{debug, warn};

use crate::{
    config::{SinkKind, SinkSet},
    error::{Condition, SinkResult},
};

use super::ReportSink;

/// Registered [`ReportSink`] along with its state.
struct Slot {
    /// Kind of the sink, checked against the enabled [`SinkSet`].
    kind: SinkKind,

    /// The sink itself.
    sink: Box<dyn ReportSink + Send>,

    /// Whether the sink failed once and is skipped since then.
    degraded: bool,
}

/// Set of [`ReportSink`]s every event is passed to.
///
/// Sinks of a kind missing from the enabled [`SinkSet`] are silently
/// skipped. A sink failing a call is marked as degraded and skipped for the
/// rest of the run, while the others keep receiving events.
pub struct Sinks {
    /// Registered sinks, in registration order.
    slots: Vec<Slot>,

    /// Enabled [`SinkKind`]s.
    enabled: SinkSet,
}

impl Sinks {
    /// Creates an empty [`Sinks`] set with the given kinds enabled.
    #[must_use]
    pub const fn new(enabled: SinkSet) -> Self {
        Self { slots: Vec::new(), enabled }
    }

    /// Registers a new [`ReportSink`] of the given `kind`.
    pub fn register(
        &mut self,
        kind: SinkKind,
        sink: impl ReportSink + Send + 'static,
    ) {
        if !self.enabled.contains(kind) {
            debug!(sink = %kind, "sink registered but disabled");
        }
        self.slots.push(Slot { kind, sink: Box::new(sink), degraded: false });
    }

    /// Number of sinks currently receiving events.
    #[must_use]
    pub fn active(&self) -> usize {
        self.slots.iter().filter(|s| self.is_active(s)).count()
    }

    /// Indicates whether any sink of the given `kind` is degraded.
    #[must_use]
    pub fn is_degraded(&self, kind: SinkKind) -> bool {
        self.slots.iter().any(|s| s.kind == kind && s.degraded)
    }

    fn is_active(&self, slot: &Slot) -> bool {
        !slot.degraded && self.enabled.contains(slot.kind)
    }

    /// Passes a single event to every active sink, saving each one right
    /// after.
    ///
    /// Returns [`Condition`]s of sinks degraded by this event.
    pub(crate) fn dispatch<F>(&mut self, mut call: F) -> Vec<Condition>
    where
        F: FnMut(&mut dyn ReportSink) -> SinkResult<()>,
    {
        let mut conditions = Vec::new();
        for slot in &mut self.slots {
            if slot.degraded || !self.enabled.contains(slot.kind) {
                continue;
            }

            let sink = slot.sink.as_mut();
            if let Err(e) = call(&mut *sink).and_then(|()| sink.save()) {
                warn!(sink = %slot.kind, error = %e, "sink degraded");
                slot.degraded = true;
                conditions.push(Condition::SinkWriteFailure {
                    sink: slot.kind,
                    error: e.to_string(),
                });
            }
        }
        conditions
    }
}

impl Default for Sinks {
    fn default() -> Self {
        Self::new(SinkSet::default())
    }
}

impl fmt::Debug for Sinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks")
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|s| (s.kind, s.degraded))
                    .collect::<Vec<_>>(),
            )
            .field("enabled", &self.enabled)
            .finish()
    }
}
