use esp_hal::prelude::*;
use esp_hal::timer::timg::{Timer, Timer0, TimerGroup};
use esp_hal::peripherals::TIMG0;

pub(crate) static mut TIMER00: Option<Timer<Timer0<TIMG0>, esp_hal::Blocking>> = None;

/// Esp32 hardware timer setup. Used as the kernel's tick source.
pub fn setup_hardware_timer() {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timer_group0 = TimerGroup::new(peripherals.TIMG0);
    let timer00 = timer_group0.timer0;

    unsafe {
        TIMER00 = Some(timer00);
    }
}

/// Esp32 getting counter value of hardware timer, in ticks.
pub fn get_tick_counter() -> u64 {
    unsafe {
        let timer00 = TIMER00.take().expect("Timer error");
        let ticks = timer00.now().ticks();
        TIMER00 = Some(timer00);
        ticks
    }
}
