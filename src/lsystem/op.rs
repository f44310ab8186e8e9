//! Turtle instructions shared by every grammar dialect.

use std::fmt;

use crate::core::number::Compact;

/// A single turtle instruction. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    /// `F(e)`: extend the segment by `e`, retire it and continue from its end
    Advance(f64),
    /// `f(e)`: move by `e` without retiring
    Move(f64),
    /// `G(e)` or `G(e,r)`: move by `e` without retiring; `r` scales `e` on rewrite
    Grow { elongation: f64, rate: Option<f64> },
    /// `!(w)` or `!(w,r)`: set the width; `r` scales `w` on rewrite
    Width { width: f64, rate: Option<f64> },
    /// `*(l,e)`: set the segment length to `l`; `e` scales `l` on rewrite
    SetLength { length: f64, elongation: f64 },
    /// `[`
    Push,
    /// `]`
    Pop,
    /// `/(a)`: roll the left vector about the heading
    Roll(f64),
    /// `&(a)`: pitch the heading about the left vector
    Pitch(f64),
    /// `+(a)`: turn heading and left vector about +Z
    TurnLeft(f64),
    /// `-(a)`: turn heading and left vector about -Z
    TurnRight(f64),
    /// `V(a)`: pitch by `a` in whichever direction ends closer to vertical
    Verticate(f64),
    /// `D(d)`: drop straight down by `d`
    Descend(f64),
    /// `$`
    Nop,
    /// `{`: open a new polygon
    BeginPolygon,
    /// `}`
    EndPolygon,
    /// `.`: add the turtle position to the open polygon
    Vertex,
    /// `RandomSeed(n)`: reseed the grammar generator during the next rewrite
    Seed(u64),
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Advance(e) => write!(f, "F({})", Compact(e)),
            Op::Move(e) => write!(f, "f({})", Compact(e)),
            Op::Grow { elongation, rate: None } => write!(f, "G({})", Compact(elongation)),
            Op::Grow { elongation, rate: Some(r) } => {
                write!(f, "G({},{})", Compact(elongation), Compact(r))
            }
            Op::Width { width, rate: None } => write!(f, "!({})", Compact(width)),
            Op::Width { width, rate: Some(r) } => write!(f, "!({},{})", Compact(width), Compact(r)),
            Op::SetLength { length, elongation } => {
                write!(f, "*({},{})", Compact(length), Compact(elongation))
            }
            Op::Push => f.write_str("["),
            Op::Pop => f.write_str("]"),
            Op::Roll(a) => write!(f, "/({})", Compact(a)),
            Op::Pitch(a) => write!(f, "&({})", Compact(a)),
            Op::TurnLeft(a) => write!(f, "+({})", Compact(a)),
            Op::TurnRight(a) => write!(f, "-({})", Compact(a)),
            Op::Verticate(a) => write!(f, "V({})", Compact(a)),
            Op::Descend(d) => write!(f, "D({})", Compact(d)),
            Op::Nop => f.write_str("$"),
            Op::BeginPolygon => f.write_str("{"),
            Op::EndPolygon => f.write_str("}"),
            Op::Vertex => f.write_str("."),
            Op::Seed(seed) => write!(f, "RandomSeed({})", seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Op::Advance(0.37).to_string(), "F(0.37)");
        assert_eq!(Op::Move(0.0).to_string(), "f(0)");
        assert_eq!(Op::Grow { elongation: 0.5, rate: Some(1.0) }.to_string(), "G(0.5,1)");
        assert_eq!(Op::Grow { elongation: 0.1, rate: None }.to_string(), "G(0.1)");
        assert_eq!(Op::Width { width: 0.05, rate: Some(1.6) }.to_string(), "!(0.05,1.6)");
        assert_eq!(Op::SetLength { length: 0.042, elongation: 0.9 }.to_string(), "*(0.042,0.9)");
        assert_eq!(Op::Pitch(-90.0).to_string(), "&(-90)");
        assert_eq!(Op::TurnRight(60.0).to_string(), "-(60)");
        assert_eq!(Op::Seed(1234).to_string(), "RandomSeed(1234)");
        let brackets: String = [Op::Push, Op::BeginPolygon, Op::Vertex, Op::EndPolygon, Op::Pop, Op::Nop]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(brackets, "[{.}]$");
    }
}
