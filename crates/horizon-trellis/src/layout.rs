//! Layout values: geometry expressions bound to the parent size.
//!
//! A widget's position and size are [`Layout2d`] values, one [`LayoutValue`]
//! per axis. A value is an expression tree over constants, fractions of the
//! parent size and bindings, and is re-evaluated whenever the parent is
//! resized.
//!
//! Evaluation is pure and never fails: division by zero yields `0`, and a size
//! expression that refers to the widget's own size sees `0` for that
//! reference, so expressions can never depend on themselves.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::layout::{Layout2d, LayoutContext, LayoutValue};
//! use horizon_trellis::Vector2f;
//!
//! let width = LayoutValue::parse("50% - 10").unwrap();
//! let size = Layout2d::new(width, LayoutValue::from(30.0));
//! let ctx = LayoutContext::new(Vector2f::new(400.0, 300.0));
//! assert_eq!(size.evaluate(&ctx), Vector2f::new(190.0, 30.0));
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use horizon_trellis_core::logging::targets;

use crate::geometry::Vector2f;

/// The axis a scalar layout is evaluated on.
///
/// Fractions of the parent (`50%`) resolve against the parent's extent on
/// this axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    fn pick(self, v: Vector2f) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }
}

/// Inputs available while evaluating a layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutContext {
    /// Resolved inner size of the parent container.
    pub parent_size: Vector2f,
    /// Resolved size of the widget itself. `None` while the size itself is
    /// being computed.
    pub own_size: Option<Vector2f>,
}

impl LayoutContext {
    /// Context for evaluating a size (own size unavailable).
    pub fn new(parent_size: Vector2f) -> Self {
        Self {
            parent_size,
            own_size: None,
        }
    }

    /// Context for evaluating a position (own size known).
    pub fn with_own_size(parent_size: Vector2f, own_size: Vector2f) -> Self {
        Self {
            parent_size,
            own_size: Some(own_size),
        }
    }
}

/// Binary operators in layout expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `lhs + rhs`
    Add,
    /// `lhs - rhs`
    Subtract,
    /// `lhs * rhs`
    Multiply,
    /// `lhs / rhs`, 0 when `rhs` is 0
    Divide,
    /// `min(lhs, rhs)`
    Minimum,
    /// `max(lhs, rhs)`
    Maximum,
}

/// Geometry a layout can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Inner width of the parent.
    ParentWidth,
    /// Inner height of the parent.
    ParentHeight,
    /// The widget's own width.
    Width,
    /// The widget's own height.
    Height,
}

/// A lazily evaluated scalar layout expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutValue {
    /// A constant.
    Absolute(f32),
    /// A fraction of the parent's extent on the evaluated axis.
    Relative(f32),
    /// A bound geometry value.
    Binding(Binding),
    /// A binary operation over two sub-expressions.
    Operation {
        /// The operator.
        op: Operation,
        /// Left operand.
        lhs: Box<LayoutValue>,
        /// Right operand.
        rhs: Box<LayoutValue>,
    },
}

impl LayoutValue {
    /// A fraction of the parent given in percent.
    pub fn percent(percent: f32) -> Self {
        Self::Relative(percent / 100.0)
    }

    /// Combine two values with an operator.
    pub fn operation(op: Operation, lhs: LayoutValue, rhs: LayoutValue) -> Self {
        Self::Operation {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `min(self, other)`
    pub fn min(self, other: LayoutValue) -> Self {
        Self::operation(Operation::Minimum, self, other)
    }

    /// `max(self, other)`
    pub fn max(self, other: LayoutValue) -> Self {
        Self::operation(Operation::Maximum, self, other)
    }

    /// Whether the value is a plain constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    /// Whether the value depends on the parent's size.
    pub fn depends_on_parent(&self) -> bool {
        match self {
            Self::Absolute(_) => false,
            Self::Relative(_) => true,
            Self::Binding(b) => matches!(b, Binding::ParentWidth | Binding::ParentHeight),
            Self::Operation { lhs, rhs, .. } => lhs.depends_on_parent() || rhs.depends_on_parent(),
        }
    }

    /// Evaluate on one axis.
    pub fn evaluate(&self, ctx: &LayoutContext, axis: Axis) -> f32 {
        match self {
            Self::Absolute(value) => *value,
            Self::Relative(fraction) => fraction * axis.pick(ctx.parent_size),
            Self::Binding(Binding::ParentWidth) => ctx.parent_size.x,
            Self::Binding(Binding::ParentHeight) => ctx.parent_size.y,
            Self::Binding(binding @ (Binding::Width | Binding::Height)) => match ctx.own_size {
                Some(own) if *binding == Binding::Width => own.x,
                Some(own) => own.y,
                None => {
                    tracing::warn!(target: targets::LAYOUT, ?binding, "size layout refers to itself, using 0");
                    0.0
                }
            },
            Self::Operation { op, lhs, rhs } => {
                let lhs = lhs.evaluate(ctx, axis);
                let rhs = rhs.evaluate(ctx, axis);
                match op {
                    Operation::Add => lhs + rhs,
                    Operation::Subtract => lhs - rhs,
                    Operation::Multiply => lhs * rhs,
                    Operation::Divide if rhs == 0.0 => 0.0,
                    Operation::Divide => lhs / rhs,
                    Operation::Minimum => lhs.min(rhs),
                    Operation::Maximum => lhs.max(rhs),
                }
            }
        }
    }

    /// Parse the textual form, e.g. `"50%"`, `"parent.width - 10"`,
    /// `"min(200, 40%)"` or `"(parent.height - height) / 2"`.
    pub fn parse(input: &str) -> Result<Self, LayoutError> {
        Parser::new(input).parse()
    }
}

impl Default for LayoutValue {
    fn default() -> Self {
        Self::Absolute(0.0)
    }
}

impl From<f32> for LayoutValue {
    fn from(value: f32) -> Self {
        Self::Absolute(value)
    }
}

impl From<Binding> for LayoutValue {
    fn from(binding: Binding) -> Self {
        Self::Binding(binding)
    }
}

impl Add for LayoutValue {
    type Output = LayoutValue;
    fn add(self, rhs: Self) -> Self::Output {
        Self::operation(Operation::Add, self, rhs)
    }
}

impl Sub for LayoutValue {
    type Output = LayoutValue;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::operation(Operation::Subtract, self, rhs)
    }
}

impl Mul for LayoutValue {
    type Output = LayoutValue;
    fn mul(self, rhs: Self) -> Self::Output {
        Self::operation(Operation::Multiply, self, rhs)
    }
}

impl Div for LayoutValue {
    type Output = LayoutValue;
    fn div(self, rhs: Self) -> Self::Output {
        Self::operation(Operation::Divide, self, rhs)
    }
}

impl Neg for LayoutValue {
    type Output = LayoutValue;
    fn neg(self) -> Self::Output {
        match self {
            Self::Absolute(v) => Self::Absolute(-v),
            Self::Relative(v) => Self::Relative(-v),
            other => Self::operation(Operation::Subtract, Self::Absolute(0.0), other),
        }
    }
}

/// Writes the same syntax [`LayoutValue::parse`] reads.
impl fmt::Display for LayoutValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(v) => write!(f, "{v}"),
            Self::Relative(v) => write!(f, "{}%", v * 100.0),
            Self::Binding(Binding::ParentWidth) => f.write_str("parent.width"),
            Self::Binding(Binding::ParentHeight) => f.write_str("parent.height"),
            Self::Binding(Binding::Width) => f.write_str("width"),
            Self::Binding(Binding::Height) => f.write_str("height"),
            Self::Operation { op, lhs, rhs } => match op {
                Operation::Add => write!(f, "({lhs} + {rhs})"),
                Operation::Subtract => write!(f, "({lhs} - {rhs})"),
                Operation::Multiply => write!(f, "({lhs} * {rhs})"),
                Operation::Divide => write!(f, "({lhs} / {rhs})"),
                Operation::Minimum => write!(f, "min({lhs}, {rhs})"),
                Operation::Maximum => write!(f, "max({lhs}, {rhs})"),
            },
        }
    }
}

/// A pair of layouts, one per axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout2d {
    /// Horizontal component.
    pub x: LayoutValue,
    /// Vertical component.
    pub y: LayoutValue,
}

impl Layout2d {
    /// Combine two scalar layouts.
    pub fn new(x: LayoutValue, y: LayoutValue) -> Self {
        Self { x, y }
    }

    /// Fractions of the parent size given in percent.
    pub fn percent(x: f32, y: f32) -> Self {
        Self::new(LayoutValue::percent(x), LayoutValue::percent(y))
    }

    /// Parse both components.
    pub fn parse(x: &str, y: &str) -> Result<Self, LayoutError> {
        Ok(Self::new(LayoutValue::parse(x)?, LayoutValue::parse(y)?))
    }

    /// Evaluate both components.
    pub fn evaluate(&self, ctx: &LayoutContext) -> Vector2f {
        Vector2f::new(self.x.evaluate(ctx, Axis::X), self.y.evaluate(ctx, Axis::Y))
    }

    /// Whether either component depends on the parent's size.
    pub fn depends_on_parent(&self) -> bool {
        self.x.depends_on_parent() || self.y.depends_on_parent()
    }
}

impl From<Vector2f> for Layout2d {
    fn from(v: Vector2f) -> Self {
        Self::new(v.x.into(), v.y.into())
    }
}

impl From<(f32, f32)> for Layout2d {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x.into(), y.into())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Errors produced when parsing a layout string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// A character that can't start or continue an expression.
    #[error("unexpected '{found}' at offset {offset} in layout \"{input}\"")]
    UnexpectedChar {
        /// The full input.
        input: String,
        /// Byte offset of the character.
        offset: usize,
        /// The offending character.
        found: char,
    },
    /// The input ended in the middle of an expression.
    #[error("unexpected end of layout \"{input}\"")]
    UnexpectedEnd {
        /// The full input.
        input: String,
    },
    /// A name that is not a known binding or function.
    #[error("unknown name '{name}' in layout \"{input}\"")]
    UnknownIdentifier {
        /// The full input.
        input: String,
        /// The unknown name.
        name: String,
    },
    /// A number that could not be read.
    #[error("invalid number '{text}' in layout \"{input}\"")]
    InvalidNumber {
        /// The full input.
        input: String,
        /// The text that failed to parse.
        text: String,
    },
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(mut self) -> Result<LayoutValue, LayoutError> {
        let value = self.expression()?;
        self.skip_whitespace();
        match self.peek() {
            None => Ok(value),
            Some(found) => Err(self.unexpected(found)),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, found: char) -> LayoutError {
        LayoutError::UnexpectedChar {
            input: self.input.to_string(),
            offset: self.pos,
            found,
        }
    }

    fn end(&self) -> LayoutError {
        LayoutError::UnexpectedEnd {
            input: self.input.to_string(),
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), LayoutError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(self.end()),
        }
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<LayoutValue, LayoutError> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('+') => Operation::Add,
                Some('-') => Operation::Subtract,
                _ => return Ok(value),
            };
            self.bump();
            value = LayoutValue::operation(op, value, self.term()?);
        }
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<LayoutValue, LayoutError> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('*') => Operation::Multiply,
                Some('/') => Operation::Divide,
                _ => return Ok(value),
            };
            self.bump();
            value = LayoutValue::operation(op, value, self.factor()?);
        }
    }

    // factor := '-' factor | number '%'? | name | name '(' expr ',' expr ')' | '(' expr ')'
    fn factor(&mut self) -> Result<LayoutValue, LayoutError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.end()),
            Some('-') => {
                self.bump();
                Ok(-self.factor()?)
            }
            Some('(') => {
                self.bump();
                let value = self.expression()?;
                self.expect(')')?;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '&' => self.name(),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn number(&mut self) -> Result<LayoutValue, LayoutError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        let text = &self.input[start..self.pos];
        let value: f32 = text.parse().map_err(|_| LayoutError::InvalidNumber {
            input: self.input.to_string(),
            text: text.to_string(),
        })?;

        self.skip_whitespace();
        if self.peek() == Some('%') {
            self.bump();
            return Ok(LayoutValue::percent(value));
        }
        Ok(LayoutValue::Absolute(value))
    }

    fn name(&mut self) -> Result<LayoutValue, LayoutError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '&' || c == '_')
        {
            self.bump();
        }
        let name = &self.input[start..self.pos];
        let binding = match name.to_ascii_lowercase().as_str() {
            "parent.width" | "parent.w" | "&.width" | "&.w" => Some(Binding::ParentWidth),
            "parent.height" | "parent.h" | "&.height" | "&.h" => Some(Binding::ParentHeight),
            "width" | "w" => Some(Binding::Width),
            "height" | "h" => Some(Binding::Height),
            _ => None,
        };
        if let Some(binding) = binding {
            return Ok(LayoutValue::Binding(binding));
        }

        let op = match name.to_ascii_lowercase().as_str() {
            "min" => Operation::Minimum,
            "max" => Operation::Maximum,
            _ => {
                return Err(LayoutError::UnknownIdentifier {
                    input: self.input.to_string(),
                    name: name.to_string(),
                });
            }
        };
        self.expect('(')?;
        let lhs = self.expression()?;
        self.expect(',')?;
        let rhs = self.expression()?;
        self.expect(')')?;
        Ok(LayoutValue::operation(op, lhs, rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> LayoutContext {
        LayoutContext::with_own_size(Vector2f::new(400.0, 300.0), Vector2f::new(100.0, 20.0))
    }

    fn eval(text: &str, axis: Axis) -> f32 {
        LayoutValue::parse(text).unwrap().evaluate(&ctx(), axis)
    }

    #[test]
    fn test_absolute_ignores_parent() {
        let value = LayoutValue::from(42.0);
        assert_eq!(value.evaluate(&LayoutContext::default(), Axis::X), 42.0);
        assert_eq!(value.evaluate(&ctx(), Axis::Y), 42.0);
        assert!(!value.depends_on_parent());
    }

    #[test]
    fn test_relative_uses_axis() {
        let value = LayoutValue::percent(50.0);
        assert_eq!(value.evaluate(&ctx(), Axis::X), 200.0);
        assert_eq!(value.evaluate(&ctx(), Axis::Y), 150.0);
    }

    #[test]
    fn test_operators() {
        let value = (LayoutValue::from(10.0) + LayoutValue::percent(10.0)) * LayoutValue::from(2.0);
        assert_eq!(value.evaluate(&ctx(), Axis::X), 100.0);
        let min = LayoutValue::from(10.0).min(LayoutValue::from(5.0));
        assert_eq!(min.evaluate(&ctx(), Axis::X), 5.0);
        let max = LayoutValue::from(10.0).max(LayoutValue::from(5.0));
        assert_eq!(max.evaluate(&ctx(), Axis::X), 10.0);
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        let value = LayoutValue::from(10.0) / LayoutValue::from(0.0);
        assert_eq!(value.evaluate(&ctx(), Axis::X), 0.0);
        assert_eq!(eval("parent.width / (height - 20)", Axis::X), 0.0);
    }

    #[test]
    fn test_self_reference_in_size_is_zero() {
        let value = LayoutValue::parse("width + 5").unwrap();
        let size_ctx = LayoutContext::new(Vector2f::new(400.0, 300.0));
        assert_eq!(value.evaluate(&size_ctx, Axis::X), 5.0);
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(eval("10", Axis::X), 10.0);
        assert_eq!(eval("50%", Axis::X), 200.0);
        assert_eq!(eval("parent.width - 10", Axis::X), 390.0);
        assert_eq!(eval("&.h / 3", Axis::Y), 100.0);
        assert_eq!(eval("(parent.width - width) / 2", Axis::X), 150.0);
        assert_eq!(eval("min(100, 40%)", Axis::X), 100.0);
        assert_eq!(eval("max(100, 40%)", Axis::X), 160.0);
        assert_eq!(eval("-5 + 2 * 3", Axis::X), 1.0);
        assert_eq!(eval("-50%", Axis::Y), -150.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            LayoutValue::parse("10 +"),
            Err(LayoutError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            LayoutValue::parse("sibling.width"),
            Err(LayoutError::UnknownIdentifier { .. })
        ));
        assert!(matches!(
            LayoutValue::parse("10 $"),
            Err(LayoutError::UnexpectedChar { found: '$', .. })
        ));
        assert!(matches!(
            LayoutValue::parse("1.2.3"),
            Err(LayoutError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for text in ["50%", "parent.width - 10", "min(100, 40%)", "(parent.height - height) / 2"] {
            let value = LayoutValue::parse(text).unwrap();
            let reparsed = LayoutValue::parse(&value.to_string()).unwrap();
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn test_layout2d() {
        let layout = Layout2d::parse("10%", "parent.height - 20").unwrap();
        assert!(layout.depends_on_parent());
        assert_eq!(layout.evaluate(&ctx()), Vector2f::new(40.0, 280.0));
        let fixed = Layout2d::from((5.0, 6.0));
        assert!(!fixed.depends_on_parent());
        assert_eq!(fixed.evaluate(&ctx()), Vector2f::new(5.0, 6.0));
    }
}
