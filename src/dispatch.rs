use embedded_hal::serial::{Read, Write};

use crate::{
    at::{AtClient, ReportSink},
    clock::Clock,
    event::{Event, EventDrain},
};

/// Main-loop body. Drains everything queued so far, running one AT sequence
/// per press; releases are consumed and ignored. Returns how many sequences ran.
pub fn dispatch_pending<S, C, R>(
    events: &mut EventDrain<'_>,
    client: &mut AtClient<S, C>,
    sink: &mut R,
) -> usize
where
    S: Read<u8> + Write<u8>,
    C: Clock,
    R: ReportSink,
{
    let mut sequences = 0;

    while let Some(event) = events.drain() {
        match event {
            Event::Button(action) => {
                debug!("dispatch: button {:?}", action);
                if event.is_press() {
                    let _ = client.run_sequence(sink);
                    sequences += 1;
                }
            }
        }
    }

    sequences
}
