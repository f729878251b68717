/// Free-running millisecond counter. Wraps at `u32::MAX`, so every elapsed
/// time computation goes through [`elapsed_ms`].
pub trait Clock {
    fn now_ms(&self) -> u32;

    fn delay_ms(&self, ms: u32) {
        let start = self.now_ms();
        while elapsed_ms(start, self.now_ms()) < ms {
            core::hint::spin_loop();
        }
    }
}

#[inline]
pub fn elapsed_ms(since: u32, now: u32) -> u32 {
    now.wrapping_sub(since)
}
