//! Turtle-stack interpretation of an instruction program.
//!
//! `F` retires the active turtle into the output forest and continues with a
//! clone at the segment end. Brackets clone and discard stack turtles, and
//! polygon instructions collect vertices from the active turtle's position.

use crate::core::types::DVec3;
use crate::core::{Error, Result};
use crate::math::vector;
use crate::turtle::{Turtle, TurtleForest, TurtleId};

use super::op::Op;

/// Result of replaying a program.
#[derive(Clone, Debug, Default)]
pub struct Interpretation {
    /// Retired turtles, linked into a forest
    pub forest: TurtleForest,
    /// Retired turtles in retirement order
    pub retired: Vec<TurtleId>,
    /// Vertex loops opened with `{` and filled with `.`
    pub polygons: Vec<Vec<DVec3>>,
}

impl Interpretation {
    pub fn turtle(&self, id: TurtleId) -> Option<&Turtle> {
        self.forest.get(id)
    }

    /// Parentless retired turtles in retirement order.
    pub fn roots(&self) -> impl Iterator<Item = TurtleId> + '_ {
        self.retired
            .iter()
            .copied()
            .filter(|id| self.forest.parent(*id).is_none())
    }
}

/// Replay `program` starting from `start`.
///
/// The stack must hold exactly one turtle when the program ends; that turtle
/// is discarded.
pub fn interpret(program: &[Op], start: Turtle) -> Result<Interpretation> {
    let mut out = Interpretation::default();
    let mut stack = vec![out.forest.spawn(start)];

    for (index, op) in program.iter().enumerate() {
        apply(*op, &mut out, &mut stack).map_err(|e| match e {
            Error::StructuralContractViolation(message) => {
                Error::structure(format!("{} at instruction {} ({})", message, index, op))
            }
            other => other,
        })?;
    }

    match stack.as_slice() {
        [last] => {
            out.forest.remove(*last);
        }
        _ => {
            return Err(Error::structure(format!(
                "{} turtles left on the stack after interpretation",
                stack.len()
            )));
        }
    }

    log::debug!(
        "Interpreted {} instructions into {} turtles and {} polygons",
        program.len(),
        out.retired.len(),
        out.polygons.len()
    );
    Ok(out)
}

fn apply(op: Op, out: &mut Interpretation, stack: &mut Vec<TurtleId>) -> Result<()> {
    match op {
        Op::Advance(elongation) => {
            let id = pop(stack)?;
            let retired = active(&mut out.forest, id)?;
            retired.length += elongation;
            retired.complete = true;
            out.retired.push(id);

            let next = spawn_from(&mut out.forest, id)?;
            let turtle = active(&mut out.forest, next)?;
            turtle.move_forward();
            turtle.length = 0.0;
            stack.push(next);
        }
        Op::Move(elongation) | Op::Grow { elongation, .. } => {
            let turtle = top(&mut out.forest, stack)?;
            turtle.length += elongation;
            turtle.move_forward();
            turtle.length = 0.0;
        }
        Op::Width { width, .. } => top(&mut out.forest, stack)?.width = width,
        Op::SetLength { length, .. } => top(&mut out.forest, stack)?.length = length,
        Op::Push => {
            let source = *stack.last().ok_or_else(empty_stack)?;
            stack.push(spawn_from(&mut out.forest, source)?);
        }
        Op::Pop => {
            let id = pop(stack)?;
            out.forest.remove(id);
        }
        Op::Roll(angle) => {
            let turtle = top(&mut out.forest, stack)?;
            turtle.l_vector = vector::rotate_about(turtle.l_vector, turtle.orientation, angle.to_radians());
        }
        Op::Pitch(angle) => {
            let turtle = top(&mut out.forest, stack)?;
            turtle.orientation = vector::rotate_about(turtle.orientation, turtle.l_vector, angle.to_radians());
        }
        Op::TurnLeft(angle) => turn(top(&mut out.forest, stack)?, angle.to_radians()),
        Op::TurnRight(angle) => turn(top(&mut out.forest, stack)?, -angle.to_radians()),
        Op::Verticate(angle) => {
            let turtle = top(&mut out.forest, stack)?;
            let radians = angle.to_radians();
            let up = vector::rotate_about(turtle.orientation, turtle.l_vector, radians);
            let down = vector::rotate_about(turtle.orientation, turtle.l_vector, -radians);
            turtle.orientation = if vector::angle_between(up, vector::VERTICAL)
                < vector::angle_between(down, vector::VERTICAL)
            {
                up
            } else {
                down
            };
        }
        Op::Descend(distance) => {
            top(&mut out.forest, stack)?.move_along(DVec3::new(0.0, 0.0, -distance));
        }
        Op::BeginPolygon => out.polygons.push(Vec::new()),
        Op::Vertex => {
            let position = top(&mut out.forest, stack)?.position;
            out.polygons
                .last_mut()
                .ok_or_else(|| Error::structure("vertex emitted with no open polygon"))?
                .push(position);
        }
        Op::Nop | Op::EndPolygon | Op::Seed(_) => {}
    }
    Ok(())
}

fn turn(turtle: &mut Turtle, radians: f64) {
    turtle.orientation = vector::rotate_about(turtle.orientation, vector::VERTICAL, radians);
    turtle.l_vector = vector::rotate_about(turtle.l_vector, vector::VERTICAL, radians);
}

fn empty_stack() -> Error {
    Error::structure("turtle stack is empty")
}

fn pop(stack: &mut Vec<TurtleId>) -> Result<TurtleId> {
    stack.pop().ok_or_else(empty_stack)
}

fn active(forest: &mut TurtleForest, id: TurtleId) -> Result<&mut Turtle> {
    forest.get_mut(id).ok_or_else(|| Error::structure("active turtle was removed"))
}

fn top<'a>(forest: &'a mut TurtleForest, stack: &[TurtleId]) -> Result<&'a mut Turtle> {
    let id = *stack.last().ok_or_else(empty_stack)?;
    active(forest, id)
}

fn spawn_from(forest: &mut TurtleForest, source: TurtleId) -> Result<TurtleId> {
    forest
        .spawn_from(source)
        .ok_or_else(|| Error::structure("active turtle was removed"))
}
