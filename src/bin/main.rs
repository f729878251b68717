#![no_main]
#![no_std]

use lora_at_probe as _; // global logger + panicking-behavior + memory layout

#[rtic::app(device = stm32wlxx_hal::pac)]
mod app {
    use cortex_m::interrupt::CriticalSection;
    use heapless::spsc::Queue;
    use lora_at_probe::at::AtClient;
    use lora_at_probe::board::{ButtonPin, Console, ModuleUart, Mono, MonoClock, BUTTON_PULL};
    use lora_at_probe::button::{ButtonSource, Debouncer, Edge, EdgeOutcome};
    use lora_at_probe::clock::Clock;
    use lora_at_probe::constants::{
        SessionConfig, DEBOUNCE_MS, IDLE_DELAY_MS, MODULE_BAUD_RATE, SYSCLK_HZ,
    };
    use lora_at_probe::dispatch::dispatch_pending;
    use lora_at_probe::event::{self, EventDrain, EventQueue};
    use lora_at_probe::transport::LineTransport;
    use rtic_monotonics::systick::prelude::*;
    use stm32wlxx_hal::{
        gpio::{Exti, ExtiTrg, Input, PinState, PortA},
        rcc, uart,
        uart::LpUart,
    };

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        button: Input<ButtonPin>,
        source: ButtonSource<'static>,
        events: EventDrain<'static>,
        client: AtClient<ModuleUart, MonoClock>,
    }

    #[init(local = [queue: EventQueue = Queue::new()])]
    fn init(ctx: init::Context) -> (Shared, Local) {
        defmt::info!("init");

        let mut dp = ctx.device;
        let cs = unsafe { &CriticalSection::new() };

        unsafe {
            rcc::set_sysclk_msi(
                &mut dp.FLASH,
                &mut dp.PWR,
                &mut dp.RCC,
                rcc::MsiRange::Range16M,
                cs,
            );
        }
        Mono::start(ctx.core.SYST, SYSCLK_HZ);

        if dp.RCC.cr.read().hserdy().bit_is_clear() {
            dp.RCC.cr.write(|w| w.hseon().set_bit());
            while dp.RCC.cr.read().hserdy().bit_is_clear() {}
        }

        // LPUART runs off LSE so 9600 baud stays exact
        dp.RCC
            .bdcr
            .modify(|_, w| w.lseon().on().lsesysen().enabled());
        while dp.RCC.bdcr.read().lserdy().is_not_ready() {}
        while dp.RCC.bdcr.read().lsesysrdy().is_not_ready() {}

        let io_a: PortA = PortA::split(dp.GPIOA, &mut dp.RCC);

        let uart: ModuleUart = LpUart::new(dp.LPUART, MODULE_BAUD_RATE, uart::Clk::Lse, &mut dp.RCC)
            .enable_rx(io_a.a3, cs)
            .enable_tx(io_a.a2, cs);

        let button = Input::new(io_a.a0, BUTTON_PULL, cs);
        ButtonPin::setup_exti_c1(&mut dp.EXTI, &mut dp.SYSCFG, ExtiTrg::Both);

        let (publisher, events) = event::split(ctx.local.queue);
        let source = ButtonSource::new(Debouncer::new(DEBOUNCE_MS), publisher);
        let client = AtClient::new(LineTransport::new(uart, MonoClock), SessionConfig::default());

        defmt::info!("init: waiting for button presses");

        (
            Shared {},
            Local {
                button,
                source,
                events,
                client,
            },
        )
    }

    #[task(binds = EXTI0, local = [button, source])]
    fn button_edge(ctx: button_edge::Context) {
        ButtonPin::clear_exti();

        let edge = Edge::from_level(matches!(ctx.local.button.level(), PinState::Low));
        let now = Mono::now().ticks();

        if let EdgeOutcome::Published(action) = ctx.local.source.on_edge(edge, now) {
            defmt::debug!("button: {:?} at {=u32}ms", action, now);
        }
    }

    #[idle(local = [events, client])]
    fn idle(ctx: idle::Context) -> ! {
        let mut console = Console;

        loop {
            dispatch_pending(ctx.local.events, ctx.local.client, &mut console);
            MonoClock.delay_ms(IDLE_DELAY_MS);
        }
    }
}
