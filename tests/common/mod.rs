//! Shared test helpers: a sink that records every event for ordering
//! assertions, used only by the library-level (non-binary) integration tests.

use std::cell::RefCell;

use hardsnap::events::{tag_name, Event, EventSink};

/// Records the tag name of every event it observes, in order.
#[derive(Default)]
pub struct CollectingEventSink {
    tags: RefCell<Vec<&'static str>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.tags.borrow().clone()
    }
}

impl EventSink for CollectingEventSink {
    fn emit(&self, event: Event) {
        self.tags.borrow_mut().push(tag_name(&event));
    }
}
