//! Abstract syntax tree node types for fern programs.
//!
//! Every node keeps the token that begot it so diagnostics can point at the
//! source. `Display` renders the canonical textual form of a node.

use std::fmt;

use crate::lexer::Token;

/// A parsed program: an ordered sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Expression,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
    Break {
        token: Token,
    },
    Continue {
        token: Token,
    },
    Done {
        token: Token,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
            Statement::Return { value, .. } => write!(f, "return {};", value),
            Statement::Expression { expression, .. } => write!(f, "{}", expression),
            Statement::Break { .. } => f.write_str("break"),
            Statement::Continue { .. } => f.write_str("continue"),
            Statement::Done { .. } => f.write_str("done"),
        }
    }
}

/// A brace-delimited block, or the single-statement arrow form (`=> stmt`).
/// Both are semantically identical.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.len() == 1 {
            write!(f, "=> {}", self.statements[0])
        } else {
            f.write_str("{ ")?;
            for statement in &self.statements {
                write!(f, "{}", statement)?;
            }
            f.write_str(" }")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    /// Build an identifier straight from its token's lexeme.
    pub fn from_token(token: Token) -> Self {
        let value = token.literal.clone();
        Self { token, value }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    FloatLiteral {
        token: Token,
        value: f64,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Null {
        token: Token,
    },
    StringLiteral {
        token: Token,
        value: String,
    },
    FStringLiteral {
        token: Token,
        value: String,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    Assign {
        token: Token,
        name: Identifier,
        value: Box<Expression>,
    },
    If(IfExpression),
    Match(MatchExpression),
    Function(FunctionLiteral),
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Array {
        token: Token,
        elements: Vec<Expression>,
    },
    /// Pairs stay in source order; duplicate keys are resolved at evaluation
    /// time (later pairs overwrite earlier ones).
    Hash {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
    Loop(LoopExpression),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            Expression::IntegerLiteral { token, .. } => f.write_str(&token.literal),
            Expression::FloatLiteral { token, .. } => f.write_str(&token.literal),
            Expression::Boolean { token, .. } => f.write_str(&token.literal),
            Expression::Null { .. } => f.write_str("null"),
            Expression::StringLiteral { value, .. } => write!(f, "\"{}\"", value),
            Expression::FStringLiteral { value, .. } => write!(f, "f\"{}\"", value),
            Expression::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Assign { name, value, .. } => write!(f, "({} = {})", name, value),
            Expression::If(expression) => write!(f, "{}", expression),
            Expression::Match(expression) => write!(f, "{}", expression),
            Expression::Function(literal) => write!(f, "{}", literal),
            Expression::Call {
                function,
                arguments,
                ..
            } => {
                write!(f, "{}(", function)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(")")
            }
            Expression::Array { elements, .. } => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            Expression::Hash { pairs, .. } => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Expression::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
            Expression::Loop(expression) => write!(f, "{}", expression),
        }
    }
}

/// `if COND BODY (else if COND BODY)* (else BODY)?`. An `else if` nests as
/// the `elseif` field, a terminal `else` populates `alternative`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub elseif: Option<Box<IfExpression>>,
    pub alternative: Option<BlockStatement>,
}

impl fmt::Display for IfExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if {} {}", self.condition, self.consequence)?;
        if let Some(elseif) = &self.elseif {
            write!(f, " else {}", elseif)?;
        }
        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub block: MatchBlockStatement,
    pub alternative: Option<BlockStatement>,
}

impl fmt::Display for MatchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match {} {}", self.condition, self.block)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {}", alternative)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchBlockStatement {
    pub token: Token,
    pub cases: Vec<CaseExpression>,
}

impl fmt::Display for MatchBlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for case in &self.cases {
            write!(f, "{} ", case)?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    pub token: Token,
    pub condition: Expression,
    pub guard: Option<Expression>,
    pub consequence: BlockStatement,
}

impl fmt::Display for CaseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "case {}", self.condition)?;
        if let Some(guard) = &self.guard {
            write!(f, " if {}", guard)?;
        }
        write!(f, " {}", self.consequence)
    }
}

/// `fn [name] ( [params] ) BODY`. A name, when present, is bound into the
/// surrounding environment at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub name: Option<Identifier>,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn")?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        f.write_str("(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(f, ") {}", self.body)
    }
}

/// The loop form a `LoopExpression` was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    Loop,
    While,
    Until,
    For,
}

/// All four loop forms share one node: `loop BODY`, `while COND BODY`,
/// `until COND BODY`, `for VAR in ITER BODY`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopExpression {
    pub token: Token,
    pub kind: LoopKind,
    pub while_condition: Option<Box<Expression>>,
    pub until_condition: Option<Box<Expression>>,
    pub variable: Option<Identifier>,
    pub iterable: Option<Box<Expression>>,
    pub body: BlockStatement,
}

impl fmt::Display for LoopExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LoopKind::Loop => write!(f, "loop {}", self.body),
            LoopKind::While => match &self.while_condition {
                Some(condition) => write!(f, "while {} {}", condition, self.body),
                None => write!(f, "while {}", self.body),
            },
            LoopKind::Until => match &self.until_condition {
                Some(condition) => write!(f, "until {} {}", condition, self.body),
                None => write!(f, "until {}", self.body),
            },
            LoopKind::For => match (&self.variable, &self.iterable) {
                (Some(variable), Some(iterable)) => {
                    write!(f, "for {} in {} {}", variable, iterable, self.body)
                }
                _ => write!(f, "for {}", self.body),
            },
        }
    }
}
