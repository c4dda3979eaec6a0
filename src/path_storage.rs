//! Path storage: the typed drawing command stream.
//!
//! [`PathCommand`] is the contract between the `d`-attribute tokenizer and
//! the polygon builder / stroker. Relative commands are kept relative here;
//! they are resolved against the pen position when the stream is walked.
//!
//! [`parse_path_data`] tokenizes the icon subset of SVG path syntax:
//! `M m L l H h V v C c A a Z z`. Multiple operand groups repeat the
//! command (after `M`/`m` they become implicit line-tos). Unknown commands
//! are skipped together with their operands.

use crate::basics::Point;
use log::trace;

// ============================================================================
// PathCommand
// ============================================================================

/// Parameters of an SVG elliptical arc command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub rx: f32,
    pub ry: f32,
    /// Rotation of the ellipse's x axis, in degrees.
    pub x_axis_rotation: f32,
    pub large_arc: bool,
    pub sweep: bool,
    pub end: Point,
}

/// One drawing command with its operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveAbs(Point),
    MoveRel(Point),
    LineAbs(Point),
    LineRel(Point),
    HLineAbs(f32),
    HLineRel(f32),
    VLineAbs(f32),
    VLineRel(f32),
    CubicAbs { cp1: Point, cp2: Point, end: Point },
    CubicRel { cp1: Point, cp2: Point, end: Point },
    ArcAbs(ArcParams),
    ArcRel(ArcParams),
    Close,
}

impl PathCommand {
    /// Returns `true` for `MoveAbs` / `MoveRel`.
    pub fn is_move_to(&self) -> bool {
        matches!(self, PathCommand::MoveAbs(_) | PathCommand::MoveRel(_))
    }

    /// Returns `true` for the close command.
    pub fn is_close(&self) -> bool {
        matches!(self, PathCommand::Close)
    }
}

// ============================================================================
// PathStorage
// ============================================================================

/// An ordered list of [`PathCommand`]s with builder-style helpers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathStorage {
    commands: Vec<PathCommand>,
}

impl PathStorage {
    /// Create an empty path storage.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Tokenize an SVG `d` attribute.
    pub fn from_svg_data(d: &str) -> Self {
        Self {
            commands: parse_path_data(d),
        }
    }

    /// Remove all commands (keeps allocated memory).
    pub fn remove_all(&mut self) {
        self.commands.clear();
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveAbs(Point::new(x, y)));
        self
    }

    pub fn move_rel(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveRel(Point::new(dx, dy)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineAbs(Point::new(x, y)));
        self
    }

    pub fn line_rel(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.commands.push(PathCommand::LineRel(Point::new(dx, dy)));
        self
    }

    pub fn hline_to(&mut self, x: f32) -> &mut Self {
        self.commands.push(PathCommand::HLineAbs(x));
        self
    }

    pub fn vline_to(&mut self, y: f32) -> &mut Self {
        self.commands.push(PathCommand::VLineAbs(y));
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn curve4(
        &mut self,
        x_ctrl1: f32,
        y_ctrl1: f32,
        x_ctrl2: f32,
        y_ctrl2: f32,
        x_to: f32,
        y_to: f32,
    ) -> &mut Self {
        self.commands.push(PathCommand::CubicAbs {
            cp1: Point::new(x_ctrl1, y_ctrl1),
            cp2: Point::new(x_ctrl2, y_ctrl2),
            end: Point::new(x_to, y_to),
        });
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(
        &mut self,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
    ) -> &mut Self {
        self.commands.push(PathCommand::ArcAbs(ArcParams {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            end: Point::new(x, y),
        }));
        self
    }

    pub fn close_polygon(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn push(&mut self, cmd: PathCommand) {
        self.commands.push(cmd);
    }

    // ---------------------------------------------------------------
    // Access
    // ---------------------------------------------------------------

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_commands(self) -> Vec<PathCommand> {
        self.commands
    }
}

// ============================================================================
// SVG path data tokenizer
// ============================================================================

/// Parse an SVG `d` attribute into typed commands.
///
/// Parsing is permissive: an incomplete operand group ends the current
/// command, unknown commands and stray characters are skipped.
pub fn parse_path_data(d: &str) -> Vec<PathCommand> {
    let mut cmds = Vec::new();
    let mut tok = PathTokens::new(d);

    while let Some(cmd) = tok.next_cmd() {
        match cmd {
            b'M' | b'm' => {
                let rel = cmd == b'm';
                let mut first = true;
                while let Some(p) = tok.next_point() {
                    cmds.push(match (first, rel) {
                        (true, false) => PathCommand::MoveAbs(p),
                        (true, true) => PathCommand::MoveRel(p),
                        (false, false) => PathCommand::LineAbs(p),
                        (false, true) => PathCommand::LineRel(p),
                    });
                    first = false;
                }
            }
            b'L' | b'l' => {
                while let Some(p) = tok.next_point() {
                    cmds.push(if cmd == b'l' {
                        PathCommand::LineRel(p)
                    } else {
                        PathCommand::LineAbs(p)
                    });
                }
            }
            b'H' | b'h' => {
                while let Some(v) = tok.next_number() {
                    cmds.push(if cmd == b'h' {
                        PathCommand::HLineRel(v)
                    } else {
                        PathCommand::HLineAbs(v)
                    });
                }
            }
            b'V' | b'v' => {
                while let Some(v) = tok.next_number() {
                    cmds.push(if cmd == b'v' {
                        PathCommand::VLineRel(v)
                    } else {
                        PathCommand::VLineAbs(v)
                    });
                }
            }
            b'C' | b'c' => {
                while let Some([cp1, cp2, end]) = tok.next_points::<3>() {
                    cmds.push(if cmd == b'c' {
                        PathCommand::CubicRel { cp1, cp2, end }
                    } else {
                        PathCommand::CubicAbs { cp1, cp2, end }
                    });
                }
            }
            b'A' | b'a' => {
                while let Some(arc) = tok.next_arc() {
                    cmds.push(if cmd == b'a' {
                        PathCommand::ArcRel(arc)
                    } else {
                        PathCommand::ArcAbs(arc)
                    });
                }
            }
            b'Z' | b'z' => cmds.push(PathCommand::Close),
            other => {
                trace!("skipping unsupported path command {:?}", other as char);
                while tok.next_number().is_some() {}
            }
        }
    }
    cmds
}

struct PathTokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PathTokens<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            data: d.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.data.len()
            && matches!(self.data[self.pos], b' ' | b'\t' | b'\n' | b'\r' | b',')
        {
            self.pos += 1;
        }
    }

    /// Next command letter, skipping anything that is neither a letter nor
    /// the start of a number.
    fn next_cmd(&mut self) -> Option<u8> {
        loop {
            self.skip_separators();
            let b = *self.data.get(self.pos)?;
            self.pos += 1;
            if b.is_ascii_alphabetic() {
                return Some(b);
            }
        }
    }

    fn at_number(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.data.get(self.pos),
            Some(b) if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.')
        )
    }

    fn next_number(&mut self) -> Option<f32> {
        if !self.at_number() {
            return None;
        }
        let start = self.pos;
        if matches!(self.data[self.pos], b'-' | b'+') {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(&b) = self.data.get(self.pos) {
            if b.is_ascii_digit() {
                self.pos += 1;
            } else if b == b'.' && !seen_dot {
                // "0.5.5" is two numbers
                seen_dot = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        if matches!(self.data.get(self.pos), Some(b'e' | b'E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.data.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if matches!(self.data.get(self.pos), Some(b) if b.is_ascii_digit()) {
                while matches!(self.data.get(self.pos), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                self.pos = save;
            }
        }
        let parsed = std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f32>().ok());
        if parsed.is_none() {
            // Lone sign or dot: consume it so the caller makes progress.
            self.pos = self.pos.max(start + 1);
        }
        parsed
    }

    fn next_point(&mut self) -> Option<Point> {
        let x = self.next_number()?;
        let y = self.next_number()?;
        Some(Point::new(x, y))
    }

    fn next_points<const N: usize>(&mut self) -> Option<[Point; N]> {
        let mut out = [Point::default(); N];
        for p in out.iter_mut() {
            *p = self.next_point()?;
        }
        Some(out)
    }

    /// Arc flags may be written without separators ("a1 1 0 011 1").
    fn next_flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let b = *self.data.get(self.pos)?;
        match b {
            b'0' | b'1' => {
                self.pos += 1;
                Some(b == b'1')
            }
            _ => None,
        }
    }

    fn next_arc(&mut self) -> Option<ArcParams> {
        let rx = self.next_number()?;
        let ry = self.next_number()?;
        let x_axis_rotation = self.next_number()?;
        let large_arc = self.next_flag()?;
        let sweep = self.next_flag()?;
        let end = self.next_point()?;
        Some(ArcParams {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            end,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
