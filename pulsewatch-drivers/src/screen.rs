//! Status screen
//!
//! Renders monitor views and restart notices onto a 128x64 monochrome panel
//! with `embedded-graphics`. Layout:
//!
//! ```text
//! Finger On           *     <- status message, freeze marker
//! HR 72          <3         <- large heart rate, heart glyph
//!
//! SpO2 98%  Cf 95%          <- oxygen and confidence
//! ```

use core::convert::Infallible;
use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Triangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use pulsewatch_core::monitor::DisplayView;
use pulsewatch_core::state::RestartReason;
use pulsewatch_core::traits::{DisplayError, StatusDisplay};

/// Characters per line in the small font
pub const LINE_LEN: usize = 21;

const SMALL: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
const LARGE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
const FILLED: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_fill(BinaryColor::On);

const STATUS_ORIGIN: Point = Point::new(0, 0);
const FREEZE_ORIGIN: Point = Point::new(122, 0);
const HEART_RATE_ORIGIN: Point = Point::new(0, 16);
const HEART_GLYPH_ORIGIN: Point = Point::new(100, 20);
const VITALS_ORIGIN: Point = Point::new(0, 44);

/// Monochrome framebuffer panel
///
/// Drawing is infallible and lands in a buffer; `flush` sends it out.
pub trait PanelBackend: DrawTarget<Color = BinaryColor, Error = Infallible> {
    /// Blank the frame buffer
    fn clear_buffer(&mut self);

    /// Send the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Check if the panel has been initialized
    fn is_ready(&self) -> bool;
}

/// Large heart rate text, `--` while there is nothing to show
pub fn heart_rate_text(view: &DisplayView) -> String<LINE_LEN> {
    let mut line = String::new();
    let _ = match view.heart_rate {
        0 => write!(line, "HR --"),
        bpm => write!(line, "HR {}", bpm),
    };
    line
}

/// Oxygen and confidence line
pub fn vitals_text(view: &DisplayView) -> String<LINE_LEN> {
    let mut line = String::new();
    let _ = match (view.oxygen, view.confidence) {
        (0, 0) => write!(line, "SpO2 --%  Cf --%"),
        (oxygen, confidence) => write!(line, "SpO2 {}%  Cf {}%", oxygen, confidence),
    };
    line
}

/// [`StatusDisplay`] over any [`PanelBackend`]
pub struct StatusScreen<P> {
    panel: P,
}

impl<P: PanelBackend> StatusScreen<P> {
    pub fn new(panel: P) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn release(self) -> P {
        self.panel
    }

    fn draw<D>(&mut self, item: &D)
    where
        D: Drawable<Color = BinaryColor>,
    {
        match item.draw(&mut self.panel) {
            Ok(_) => {}
            Err(never) => match never {},
        }
    }

    fn text(&mut self, text: &str, origin: Point, style: MonoTextStyle<'static, BinaryColor>) {
        self.draw(&Text::with_baseline(text, origin, style, Baseline::Top));
    }

    fn draw_heart(&mut self) {
        let Point { x, y } = HEART_GLYPH_ORIGIN;
        self.draw(&Circle::new(Point::new(x, y), 7).into_styled(FILLED));
        self.draw(&Circle::new(Point::new(x + 6, y), 7).into_styled(FILLED));
        self.draw(
            &Triangle::new(
                Point::new(x, y + 4),
                Point::new(x + 12, y + 4),
                Point::new(x + 6, y + 11),
            )
            .into_styled(FILLED),
        );
    }

    fn begin_frame(&mut self) -> Result<(), DisplayError> {
        if !self.panel.is_ready() {
            return Err(DisplayError::NotInitialized);
        }
        self.panel.clear_buffer();
        Ok(())
    }
}

impl<P: PanelBackend> StatusDisplay for StatusScreen<P> {
    fn show(&mut self, view: &DisplayView) -> Result<(), DisplayError> {
        self.begin_frame()?;

        self.text(view.status_message, STATUS_ORIGIN, SMALL);
        if view.show_freeze_marker {
            self.text("*", FREEZE_ORIGIN, SMALL);
        }

        self.text(&heart_rate_text(view), HEART_RATE_ORIGIN, LARGE);
        if view.show_heart_glyph {
            self.draw_heart();
        }

        self.text(&vitals_text(view), VITALS_ORIGIN, SMALL);
        self.panel.flush()
    }

    fn show_restart(&mut self, reason: &RestartReason) -> Result<(), DisplayError> {
        self.begin_frame()?;

        self.text(reason.headline(), Point::new(0, 8), SMALL);
        self.text(&reason.detail(), Point::new(0, 24), SMALL);
        self.text("Restarting...", Point::new(0, 44), SMALL);
        self.panel.flush()
    }
}
