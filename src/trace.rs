//! CSV frame trace

use std::io::{self, Write};
use std::ops::ControlFlow;

use crate::driver::{Frame, FrameObserver};

const HEADER: &str =
    "step,upper_angle,upper_velocity,lower_angle,lower_velocity,upper_x,upper_y,lower_x,lower_y";

/// Writes one CSV row per frame, header first
///
/// Rows are not flushed; call `flush` on the writer from
/// [`into_inner`](Self::into_inner) once the run is over.
pub struct CsvTrace<W: Write> {
    writer: W,
    wrote_header: bool,
}

impl<W: Write> CsvTrace<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            wrote_header: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameObserver for CsvTrace<W> {
    type Error = io::Error;

    fn observe(&mut self, frame: &Frame) -> Result<ControlFlow<()>, io::Error> {
        if !self.wrote_header {
            writeln!(self.writer, "{HEADER}")?;
            self.wrote_header = true;
        }

        let Frame {
            step,
            upper,
            lower,
            positions,
        } = frame;

        writeln!(
            self.writer,
            "{step},{},{},{},{},{},{},{},{}",
            upper.angle,
            upper.angular_velocity,
            lower.angle,
            lower.angular_velocity,
            positions.upper.x,
            positions.upper.y,
            positions.lower.x,
            positions.lower.y,
        )?;

        Ok(ControlFlow::Continue(()))
    }
}
