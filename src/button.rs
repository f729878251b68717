use crate::{
    clock::elapsed_ms,
    event::{ButtonAction, Event, EventPublisher},
};

/// The button is active-low: falling edge = press, rising edge = release.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Falling,
    Rising,
}

impl Edge {
    /// EXTI doesn't say which edge fired, so the handler samples the pin right after.
    pub fn from_level(is_low: bool) -> Edge {
        if is_low {
            Edge::Falling
        } else {
            Edge::Rising
        }
    }

    pub fn action(self) -> ButtonAction {
        match self {
            Edge::Falling => ButtonAction::Press,
            Edge::Rising => ButtonAction::Release,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Debouncer {
    window_ms: u32,
    last_ms: Option<u32>,
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Debouncer {
        Debouncer {
            window_ms,
            last_ms: None,
        }
    }

    /// Accepts a transition at `now_ms` unless it lands inside the window of the last accepted one.
    pub fn accept(&mut self, now_ms: u32) -> bool {
        if let Some(last) = self.last_ms {
            if elapsed_ms(last, now_ms) < self.window_ms {
                return false;
            }
        }

        self.last_ms = Some(now_ms);
        true
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    Published(ButtonAction),
    Debounced,
    Dropped(ButtonAction),
}

/// Interrupt-side half of the button pipeline. Owns the debounce state and
/// the queue publisher; nothing in here may block.
pub struct ButtonSource<'a> {
    debouncer: Debouncer,
    publisher: EventPublisher<'a>,
}

impl<'a> ButtonSource<'a> {
    pub fn new(debouncer: Debouncer, publisher: EventPublisher<'a>) -> ButtonSource<'a> {
        ButtonSource {
            debouncer,
            publisher,
        }
    }

    pub fn on_edge(&mut self, edge: Edge, now_ms: u32) -> EdgeOutcome {
        if !self.debouncer.accept(now_ms) {
            return EdgeOutcome::Debounced;
        }

        let action = edge.action();
        if self.publisher.publish(Event::Button(action)) {
            EdgeOutcome::Published(action)
        } else {
            warn!("button: event queue full, dropped {:?}", action);
            EdgeOutcome::Dropped(action)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEBOUNCE_MS, EVENT_QUEUE_CAPACITY};
    use crate::event::{self, EventQueue};

    #[test]
    fn first_transition_is_accepted() {
        let mut debouncer = Debouncer::new(DEBOUNCE_MS);
        assert!(debouncer.accept(0));
    }

    #[test]
    fn bounce_inside_window_is_coalesced() {
        let mut debouncer = Debouncer::new(DEBOUNCE_MS);
        assert!(debouncer.accept(1000));
        assert!(!debouncer.accept(1001));
        assert!(!debouncer.accept(1019));
        assert!(debouncer.accept(1020));
    }

    #[test]
    fn rejected_bounce_does_not_extend_window() {
        let mut debouncer = Debouncer::new(DEBOUNCE_MS);
        assert!(debouncer.accept(0));
        assert!(!debouncer.accept(15));
        // measured from 0, not from 15
        assert!(debouncer.accept(20));
    }

    #[test]
    fn window_holds_across_counter_wrap() {
        let mut debouncer = Debouncer::new(DEBOUNCE_MS);
        assert!(debouncer.accept(u32::MAX - 5));
        assert!(!debouncer.accept(3));
        assert!(debouncer.accept(14));
    }

    #[test]
    fn edges_map_to_actions() {
        assert_eq!(Edge::from_level(true), Edge::Falling);
        assert_eq!(Edge::from_level(false), Edge::Rising);
        assert_eq!(Edge::Falling.action(), ButtonAction::Press);
        assert_eq!(Edge::Rising.action(), ButtonAction::Release);
    }

    #[test]
    fn bouncy_press_emits_one_event() {
        let mut queue = EventQueue::new();
        let (publisher, mut drain) = event::split(&mut queue);
        let mut source = ButtonSource::new(Debouncer::new(DEBOUNCE_MS), publisher);

        assert_eq!(
            source.on_edge(Edge::Falling, 100),
            EdgeOutcome::Published(ButtonAction::Press)
        );
        assert_eq!(source.on_edge(Edge::Rising, 102), EdgeOutcome::Debounced);
        assert_eq!(source.on_edge(Edge::Falling, 105), EdgeOutcome::Debounced);
        assert_eq!(
            source.on_edge(Edge::Rising, 250),
            EdgeOutcome::Published(ButtonAction::Release)
        );

        assert_eq!(drain.drain(), Some(Event::Button(ButtonAction::Press)));
        assert_eq!(drain.drain(), Some(Event::Button(ButtonAction::Release)));
        assert_eq!(drain.drain(), None);
    }

    #[test]
    fn full_queue_drops_but_still_debounces() {
        let mut queue = EventQueue::new();
        let (publisher, mut drain) = event::split(&mut queue);
        let mut source = ButtonSource::new(Debouncer::new(DEBOUNCE_MS), publisher);

        let mut now = 0;
        for _ in 0..EVENT_QUEUE_CAPACITY {
            assert!(matches!(
                source.on_edge(Edge::Falling, now),
                EdgeOutcome::Published(_)
            ));
            now += DEBOUNCE_MS;
        }

        assert_eq!(
            source.on_edge(Edge::Rising, now),
            EdgeOutcome::Dropped(ButtonAction::Release)
        );
        assert_eq!(source.on_edge(Edge::Falling, now + 1), EdgeOutcome::Debounced);
        assert_eq!(drain.len(), EVENT_QUEUE_CAPACITY);
    }
}
