use heapless::spsc::{Consumer, Producer, Queue};

use crate::constants::EVENT_QUEUE_SLOTS;

#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    Release = 0,
    Press = 1,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Button(ButtonAction),
}

impl Event {
    /// Payload as carried on the wire between ISR and main loop: 1 = press, 0 = release.
    pub fn payload(&self) -> i32 {
        match self {
            Event::Button(action) => *action as i32,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, Event::Button(ButtonAction::Press))
    }
}

/// Holds up to `EVENT_QUEUE_CAPACITY` events. Split it once at startup; the
/// publisher goes to the interrupt handler and the drain to the main loop.
pub type EventQueue = Queue<Event, EVENT_QUEUE_SLOTS>;

pub fn split(queue: &mut EventQueue) -> (EventPublisher<'_>, EventDrain<'_>) {
    let (producer, consumer) = queue.split();
    (EventPublisher { producer }, EventDrain { consumer })
}

pub struct EventPublisher<'a> {
    producer: Producer<'a, Event, EVENT_QUEUE_SLOTS>,
}

impl<'a> EventPublisher<'a> {
    /// Never blocks. A full queue drops `event` and returns `false`.
    pub fn publish(&mut self, event: Event) -> bool {
        self.producer.enqueue(event).is_ok()
    }

    pub fn is_full(&self) -> bool {
        !self.producer.ready()
    }
}

pub struct EventDrain<'a> {
    consumer: Consumer<'a, Event, EVENT_QUEUE_SLOTS>,
}

impl<'a> EventDrain<'a> {
    /// Pops the oldest event, or `None` right away when the queue is empty.
    pub fn drain(&mut self) -> Option<Event> {
        self.consumer.dequeue()
    }

    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.consumer.ready()
    }
}
