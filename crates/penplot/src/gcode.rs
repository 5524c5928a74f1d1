//! Streaming G-code writer.
//!
//! [`GCodeWriter`] is a small state machine over any [`Write`]:
//!
//! ```text
//! Closed --open--> Open --start_layer--> InLayer
//!   ^               |  ^                    |
//!   +-----close-----+  +-----end_layer------+
//! ```
//!
//! Path segments are only accepted inside a layer. Calling an operation in
//! the wrong state is a bug in the caller and panics; I/O errors are
//! returned.
//!
//! ## Rust Lesson #24: Generic writers
//!
//! `GCodeWriter<W: Write>` works the same over a `File`, a `BufWriter`, or
//! a `Vec<u8>` in tests. The compiler generates one copy per writer type,
//! so there is no dynamic dispatch per line.

use std::io::{self, Write};

use crate::geometry::{PathSegment, Point};
use crate::transform::GCodeSettings;

/// Comment placed at the top of every generated file.
pub const PREAMBLE: &str = "Generated by penplot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Closed,
    Open,
    InLayer,
}

/// Write a user supplied code block; empty codes write nothing.
fn write_code(out: &mut impl Write, code: &str) -> io::Result<()> {
    if code.is_empty() {
        return Ok(());
    }
    writeln!(out, "{code}")
}

/// Format a coordinate with three decimals, never as `-0.000`.
pub fn format_coord(value: f64) -> String {
    let value = if (value * 1000.0).round() == 0.0 { 0.0 } else { value };
    format!("{value:.3}")
}

pub struct GCodeWriter<W: Write> {
    out: W,
    settings: GCodeSettings,
    state: WriterState,
    pen_down: bool,
    current: Point,
    subpath_start: Point,
}

impl<W: Write> GCodeWriter<W> {
    /// Codes are copied from `settings`; later edits do not reach this
    /// writer.
    pub fn new(out: W, settings: &GCodeSettings) -> Self {
        Self {
            out,
            settings: settings.clone(),
            state: WriterState::Closed,
            pen_down: false,
            current: Point::new(0.0, 0.0),
            subpath_start: Point::new(0.0, 0.0),
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    /// A parenthesised comment. Allowed in every state.
    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "({text})")
    }

    /// Write the preamble and start code, then raise the pen.
    pub fn open(&mut self) -> io::Result<()> {
        assert_eq!(self.state, WriterState::Closed, "open called on an open writer");
        self.comment(PREAMBLE)?;
        write_code(&mut self.out, &self.settings.start_code)?;
        // Raised unconditionally: the pen's state before the file runs is unknown.
        write_code(&mut self.out, &self.settings.pen_up_code)?;
        self.pen_down = false;
        self.state = WriterState::Open;
        Ok(())
    }

    pub fn start_layer(&mut self, name: &str) -> io::Result<()> {
        assert_eq!(self.state, WriterState::Open, "start_layer requires an open writer outside a layer");
        self.comment(&format!("Start Layer: {name}"))?;
        write_code(&mut self.out, &self.settings.start_layer_code)?;
        self.state = WriterState::InLayer;
        Ok(())
    }

    /// Raise the pen and leave the layer.
    pub fn end_layer(&mut self, name: &str) -> io::Result<()> {
        assert_eq!(self.state, WriterState::InLayer, "end_layer called outside a layer");
        self.pen_up()?;
        self.comment(&format!("End Layer: {name}"))?;
        write_code(&mut self.out, &self.settings.end_layer_code)?;
        self.state = WriterState::Open;
        Ok(())
    }

    /// Raise the pen and write the end code. The writer can be opened again.
    pub fn close(&mut self) -> io::Result<()> {
        assert_eq!(self.state, WriterState::Open, "close requires an open writer outside a layer");
        self.pen_up()?;
        write_code(&mut self.out, &self.settings.end_code)?;
        self.state = WriterState::Closed;
        self.out.flush()
    }

    pub fn pen_up(&mut self) -> io::Result<()> {
        assert_ne!(self.state, WriterState::Closed, "pen_up on a closed writer");
        if self.pen_down {
            write_code(&mut self.out, &self.settings.pen_up_code)?;
            self.pen_down = false;
        }
        Ok(())
    }

    pub fn pen_down(&mut self) -> io::Result<()> {
        assert_ne!(self.state, WriterState::Closed, "pen_down on a closed writer");
        if !self.pen_down {
            write_code(&mut self.out, &self.settings.pen_down_code)?;
            self.pen_down = true;
        }
        Ok(())
    }

    /// Rapid move, pen state unchanged.
    pub fn rapid_move(&mut self, x: f64, y: f64) -> io::Result<()> {
        assert_ne!(self.state, WriterState::Closed, "move on a closed writer");
        writeln!(self.out, "G0 X{} Y{}", format_coord(x), format_coord(y))?;
        self.current = Point::new(x, y);
        Ok(())
    }

    /// Linear move, pen state unchanged.
    pub fn linear_move(&mut self, x: f64, y: f64) -> io::Result<()> {
        assert_ne!(self.state, WriterState::Closed, "move on a closed writer");
        writeln!(self.out, "G1 X{} Y{}", format_coord(x), format_coord(y))?;
        self.current = Point::new(x, y);
        Ok(())
    }

    /// Cubic move. `I J` is the first control point relative to the start,
    /// `P Q` the second relative to the end.
    fn cubic_move(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> io::Result<()> {
        writeln!(
            self.out,
            "G5 I{} J{} P{} Q{} X{} Y{}",
            format_coord(ctrl1.x - self.current.x),
            format_coord(ctrl1.y - self.current.y),
            format_coord(ctrl2.x - to.x),
            format_coord(ctrl2.y - to.y),
            format_coord(to.x),
            format_coord(to.y),
        )?;
        self.current = to;
        Ok(())
    }

    /// Emit one already transformed path segment.
    ///
    /// A `MoveTo` lifts the pen, travels, and lowers it again; every other
    /// segment draws.
    pub fn segment(&mut self, segment: &PathSegment) -> io::Result<()> {
        assert_eq!(self.state, WriterState::InLayer, "path segments are only valid inside a layer");
        match *segment {
            PathSegment::MoveTo(p) => {
                self.pen_up()?;
                self.rapid_move(p.x, p.y)?;
                self.subpath_start = p;
                self.pen_down()
            }
            PathSegment::LineTo(p) => self.linear_move(p.x, p.y),
            PathSegment::QuadTo { ctrl, to } => {
                // Degree elevation: the same curve as a cubic.
                let from = self.current;
                let ctrl1 = Point::new(from.x + 2.0 / 3.0 * (ctrl.x - from.x), from.y + 2.0 / 3.0 * (ctrl.y - from.y));
                let ctrl2 = Point::new(to.x + 2.0 / 3.0 * (ctrl.x - to.x), to.y + 2.0 / 3.0 * (ctrl.y - to.y));
                self.cubic_move(ctrl1, ctrl2, to)
            }
            PathSegment::CubicTo { ctrl1, ctrl2, to } => self.cubic_move(ctrl1, ctrl2, to),
            PathSegment::Close => {
                let start = self.subpath_start;
                self.linear_move(start.x, start.y)
            }
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ============================================================================
// TESTS
// ============================================================================
