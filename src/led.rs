//! WS2812 strip animation, run by core 1's executor. Owns its PIO block, DMA channel and data
//! pin outright; nothing here is shared with core 0.

use defmt::info;
use embassy_rp::{
    bind_interrupts,
    peripherals::{DMA_CH0, PIN_10, PIO0},
    pio::{InterruptHandler, Pio},
    pio_programs::ws2812::{PioWs2812, PioWs2812Program},
};
#[cfg(feature = "second-strip")]
use embassy_rp::peripherals::{DMA_CH1, PIN_21, PIO1};
use embassy_time::Timer;
use pico_macropad_lib::animator::LedAnimator;
use pico_macropad_lib::config::{LED_BRIGHTNESS, LED_LENGTH, LED_STARTUP_DELAY_MS};

#[cfg(not(feature = "second-strip"))]
bind_interrupts!(struct PioIrqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});
#[cfg(feature = "second-strip")]
bind_interrupts!(struct PioIrqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
    PIO1_IRQ_0 => InterruptHandler<PIO1>;
});

/// Peripherals handed over to core 1
pub struct StripPeripherals {
    pub pio: PIO0,
    pub data_pin: PIN_10,
    pub dma: DMA_CH0,
    #[cfg(feature = "second-strip")]
    pub pio2: PIO1,
    #[cfg(feature = "second-strip")]
    pub data_pin2: PIN_21,
    #[cfg(feature = "second-strip")]
    pub dma2: DMA_CH1,
}

#[embassy_executor::task]
pub async fn run(p: StripPeripherals) {
    Timer::after_millis(LED_STARTUP_DELAY_MS).await;

    let Pio { mut common, sm0, .. } = Pio::new(p.pio, PioIrqs);
    let program = PioWs2812Program::new(&mut common);
    let mut strip: PioWs2812<'_, PIO0, 0, LED_LENGTH> =
        PioWs2812::new(&mut common, sm0, p.dma, p.data_pin, &program);

    #[cfg(feature = "second-strip")]
    let (mut common2, sm0_2) = {
        let Pio { common, sm0, .. } = Pio::new(p.pio2, PioIrqs);
        (common, sm0)
    };
    #[cfg(feature = "second-strip")]
    let program2 = PioWs2812Program::new(&mut common2);
    #[cfg(feature = "second-strip")]
    let mut strip2: PioWs2812<'_, PIO1, 0, LED_LENGTH> =
        PioWs2812::new(&mut common2, sm0_2, p.dma2, p.data_pin2, &program2);
    #[cfg(feature = "second-strip")]
    info!("Second strip on GPIO{}", pico_macropad_lib::config::LED_STRIP2_PIN);

    let mut animator = LedAnimator::<LED_LENGTH>::new(LED_BRIGHTNESS);
    info!("LED animation running on core 1 ({} pixels)", LED_LENGTH);

    loop {
        let frame = animator.next_frame();
        strip.write(&frame.pixels).await;
        #[cfg(feature = "second-strip")]
        strip2.write(&frame.pixels).await;
        Timer::after_millis(frame.dwell_ms).await;
    }
}
