//! Tree-walking evaluator.
//!
//! A single recursive walk over the AST against an environment (the lexical
//! scope chain). Control flow (`return`, `break`, `continue`, errors) is
//! modeled as ordinary [`Value`] variants that callers check for and forward,
//! so evaluation stays a pure function of `(node, env)`.

pub mod builtins;
pub mod environment;
pub mod object;

use std::cell::RefCell;
use std::rc::Rc;

use crate::lexer::Lexer;
use crate::parser::ast::{
    BlockStatement, Expression, IfExpression, LoopExpression, LoopKind, MatchExpression, Program,
    Statement,
};
use crate::parser::Parser;
use environment::Environment;
use object::{Function, HashPair, Value};

/// Shared handle to an environment frame.
pub type Env = Rc<RefCell<Environment>>;

/// Evaluate a whole program. A `ReturnValue` unwraps at this boundary; loop
/// control surfacing here degrades to `Void`.
pub fn eval_program(program: &Program, env: &Env) -> Value {
    let mut result = Value::Void;

    for statement in &program.statements {
        result = eval_statement(statement, env);
        match result {
            Value::ReturnValue(value) => return *value,
            Value::Error(_) => return result,
            Value::Break | Value::Continue => result = Value::Void,
            _ => {}
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Env) -> Value {
    match statement {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            env.borrow_mut().set(name.value.clone(), value);
            Value::Void
        }
        Statement::Return { value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            Value::ReturnValue(Box::new(value))
        }
        Statement::Expression { expression, .. } => eval_expression(expression, env),
        Statement::Break { .. } => Value::Break,
        Statement::Continue { .. } => Value::Continue,
        Statement::Done { .. } => Value::ReturnValue(Box::new(Value::Void)),
    }
}

fn eval_block_statement(block: &BlockStatement, env: &Env) -> Value {
    let mut result = Value::Void;

    for statement in &block.statements {
        result = eval_statement(statement, env);
        match result {
            Value::ReturnValue(_) | Value::Error(_) | Value::Break | Value::Continue => {
                return result
            }
            _ => {}
        }
    }

    result
}

fn eval_expression(expression: &Expression, env: &Env) -> Value {
    match expression {
        Expression::Identifier(identifier) => {
            if let Some(value) = env.borrow().get(&identifier.value) {
                return value;
            }
            if let Some(builtin) = builtins::lookup(&identifier.value) {
                return builtin;
            }
            let position = identifier.token.position;
            Value::Error(format!(
                "[{}:{}] identifier not found: {}",
                position.line, position.column, identifier.value
            ))
        }

        Expression::IntegerLiteral { value, .. } => Value::Integer(*value),
        Expression::FloatLiteral { value, .. } => Value::Float(*value),
        Expression::Boolean { value, .. } => Value::Boolean(*value),
        Expression::Null { .. } => Value::Null,
        Expression::StringLiteral { value, .. } => Value::Str(value.clone()),
        Expression::FStringLiteral { value, .. } => eval_fstring_literal(value, env),

        Expression::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(operator, &right)
        }

        Expression::Infix {
            left,
            operator,
            right,
            ..
        } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(operator, &left, &right)
        }

        Expression::Assign { name, value, .. } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            if env.borrow_mut().assign(&name.value, value.clone()) {
                value
            } else {
                let position = name.token.position;
                Value::Error(format!(
                    "[{}:{}] identifier not found: {}",
                    position.line, position.column, name.value
                ))
            }
        }

        Expression::If(expression) => eval_if_expression(expression, env),
        Expression::Match(expression) => eval_match_expression(expression, env),

        Expression::Function(literal) => {
            let function = Value::Function(Function {
                name: literal.name.clone(),
                parameters: literal.parameters.clone(),
                body: literal.body.clone(),
                env: Rc::clone(env),
            });
            if let Some(name) = &literal.name {
                env.borrow_mut().set(name.value.clone(), function.clone());
            }
            function
        }

        Expression::Call {
            function,
            arguments,
            ..
        } => {
            let function = eval_expression(function, env);
            if function.is_error() {
                return function;
            }
            let arguments = match eval_expressions(arguments, env) {
                Ok(arguments) => arguments,
                Err(error) => return error,
            };
            apply_function(function, arguments)
        }

        Expression::Array { elements, .. } => match eval_expressions(elements, env) {
            Ok(elements) => Value::Array(elements.into_iter().collect()),
            Err(error) => error,
        },

        Expression::Hash { pairs, .. } => eval_hash_literal(pairs, env),

        Expression::Index { left, index, .. } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(&left, &index)
        }

        Expression::Loop(expression) => eval_loop_expression(expression, env),
    }
}

/// Evaluate expressions left to right, stopping at the first error.
fn eval_expressions(expressions: &[Expression], env: &Env) -> Result<Vec<Value>, Value> {
    let mut results = Vec::with_capacity(expressions.len());

    for expression in expressions {
        let value = eval_expression(expression, env);
        if value.is_error() {
            return Err(value);
        }
        results.push(value);
    }

    Ok(results)
}

fn eval_prefix_expression(operator: &str, right: &Value) -> Value {
    match operator {
        "!" | "not" => eval_bang_operator_expression(right),
        "-" => eval_minus_prefix_operator_expression(right),
        _ => Value::Error(format!(
            "unknown operator: {}{}",
            operator,
            right.type_name()
        )),
    }
}

fn eval_bang_operator_expression(right: &Value) -> Value {
    match right {
        Value::Boolean(value) => Value::Boolean(!value),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_minus_prefix_operator_expression(right: &Value) -> Value {
    match right {
        Value::Integer(value) => Value::Integer(value.wrapping_neg()),
        _ => Value::Error(format!("unknown operator: -{}", right.type_name())),
    }
}

fn eval_infix_expression(operator: &str, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => {
            eval_integer_infix_expression(operator, *left, *right)
        }
        (Value::Str(left), Value::Str(right)) => {
            eval_string_infix_expression(operator, left, right)
        }
        _ if left.type_name() != right.type_name() => Value::Error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),
        // Same-typed operands beyond the fast paths still compare
        // structurally under the equality operators.
        _ => match operator {
            "==" | "is" => Value::Boolean(is_equal(left, right)),
            "!=" => Value::Boolean(!is_equal(left, right)),
            _ => Value::Error(format!(
                "unknown operator: {} {} {}",
                left.type_name(),
                operator,
                right.type_name()
            )),
        },
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left.wrapping_add(right)),
        "-" => Value::Integer(left.wrapping_sub(right)),
        "*" => Value::Integer(left.wrapping_mul(right)),
        // Division by zero is a fatal fault, per the host's semantics.
        "/" => Value::Integer(left / right),
        "%" => Value::Integer(left % right),

        "<<" => Value::Integer(shift_left(left, right)),
        ">>" => Value::Integer(shift_right(left, right)),

        "&" => Value::Integer(left & right),
        "|" => Value::Integer(left | right),
        "^" => Value::Integer(left ^ right),

        "<" => Value::Boolean(left < right),
        "<=" => Value::Boolean(left <= right),
        ">" => Value::Boolean(left > right),
        ">=" => Value::Boolean(left >= right),

        // For now `is` is just a synonym for `==`.
        "==" | "is" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),

        "&&" | "and" => Value::Boolean(left != 0 && right != 0),
        "||" | "or" => Value::Boolean(left != 0 || right != 0),

        _ => Value::Error(format!("unknown operator: INTEGER {} INTEGER", operator)),
    }
}

/// Shifts past the integer width drain to the fill bits: zero for `<<`, the
/// sign bit for `>>`. A negative shift count is a fatal fault.
fn shift_left(left: i64, right: i64) -> i64 {
    if right < 0 {
        panic!("negative shift amount");
    }
    if right >= 64 {
        0
    } else {
        left << right
    }
}

fn shift_right(left: i64, right: i64) -> i64 {
    if right < 0 {
        panic!("negative shift amount");
    }
    if right >= 64 {
        if left < 0 {
            -1
        } else {
            0
        }
    } else {
        left >> right
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::Str(format!("{}{}", left, right)),
        // String subtraction removes every occurrence of the right operand.
        "-" => Value::Str(left.replace(right, "")),

        "<" => Value::Boolean(left < right),
        "<=" => Value::Boolean(left <= right),
        ">" => Value::Boolean(left > right),
        ">=" => Value::Boolean(left >= right),

        "==" | "is" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),

        "&&" | "and" => Value::Boolean(!left.is_empty() && !right.is_empty()),
        "||" | "or" => Value::Boolean(!left.is_empty() || !right.is_empty()),

        _ => Value::Error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

/// Structural equality: same type tag and same canonical inspect form.
fn is_equal(left: &Value, right: &Value) -> bool {
    left.type_name() == right.type_name() && left.inspect() == right.inspect()
}

fn eval_if_expression(expression: &IfExpression, env: &Env) -> Value {
    let condition = eval_expression(&expression.condition, env);
    if condition.is_error() {
        return condition;
    }

    if condition.is_truthy() {
        return eval_block_statement(&expression.consequence, env);
    }

    if let Some(elseif) = &expression.elseif {
        return eval_if_expression(elseif, env);
    }
    if let Some(alternative) = &expression.alternative {
        return eval_block_statement(alternative, env);
    }
    Value::Null
}

fn eval_match_expression(expression: &MatchExpression, env: &Env) -> Value {
    let condition = eval_expression(&expression.condition, env);
    if condition.is_error() {
        return condition;
    }

    for case in &expression.block.cases {
        let case_condition = eval_expression(&case.condition, env);
        if case_condition.is_error() {
            return case_condition;
        }

        // A case condition of the subject's type must equal it; any other
        // type selects by its own truthiness.
        let mut selected = if case_condition.type_name() == condition.type_name() {
            is_equal(&condition, &case_condition)
        } else {
            case_condition.is_truthy()
        };

        if selected {
            if let Some(guard) = &case.guard {
                let guard = eval_expression(guard, env);
                if guard.is_error() {
                    return guard;
                }
                selected = guard.is_truthy();
            }
        }

        if selected {
            return eval_block_statement(&case.consequence, env);
        }
    }

    if let Some(alternative) = &expression.alternative {
        return eval_block_statement(alternative, env);
    }
    Value::Null
}

enum LoopControl {
    Normal,
    Break,
    Exit(Value),
}

fn eval_loop_body(body: &BlockStatement, env: &Env) -> LoopControl {
    match eval_block_statement(body, env) {
        Value::Break => LoopControl::Break,
        value @ (Value::ReturnValue(_) | Value::Error(_)) => LoopControl::Exit(value),
        // A Continue has already ended the body; nothing more to do here.
        _ => LoopControl::Normal,
    }
}

fn eval_loop_expression(expression: &LoopExpression, env: &Env) -> Value {
    if expression.kind == LoopKind::For {
        return eval_for_loop(expression, env);
    }

    loop {
        if let Some(condition) = &expression.while_condition {
            let condition = eval_expression(condition, env);
            if condition.is_error() {
                return condition;
            }
            if !condition.is_truthy() {
                break;
            }
        }

        if let Some(condition) = &expression.until_condition {
            let condition = eval_expression(condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.is_truthy() {
                break;
            }
        }

        match eval_loop_body(&expression.body, env) {
            LoopControl::Normal => {}
            LoopControl::Break => break,
            LoopControl::Exit(value) => return value,
        }
    }

    Value::Void
}

fn eval_for_loop(expression: &LoopExpression, env: &Env) -> Value {
    let (Some(variable), Some(iterable)) = (&expression.variable, &expression.iterable) else {
        return Value::Error("malformed for loop".to_string());
    };

    let iterable = eval_expression(iterable, env);
    if iterable.is_error() {
        return iterable;
    }

    // The loop variable lives in its own frame so it does not leak into the
    // surrounding scope.
    let loop_env = Environment::new_enclosed(env);

    match iterable {
        Value::Array(elements) => {
            for element in elements.iter() {
                loop_env
                    .borrow_mut()
                    .set(variable.value.clone(), element.clone());
                match eval_loop_body(&expression.body, &loop_env) {
                    LoopControl::Normal => {}
                    LoopControl::Break => break,
                    LoopControl::Exit(value) => return value,
                }
            }
        }
        Value::Integer(count) => {
            for i in 0..count {
                loop_env
                    .borrow_mut()
                    .set(variable.value.clone(), Value::Integer(i));
                match eval_loop_body(&expression.body, &loop_env) {
                    LoopControl::Normal => {}
                    LoopControl::Break => break,
                    LoopControl::Exit(value) => return value,
                }
            }
        }
        Value::Str(value) => {
            for ch in value.chars() {
                loop_env
                    .borrow_mut()
                    .set(variable.value.clone(), Value::Str(ch.to_string()));
                match eval_loop_body(&expression.body, &loop_env) {
                    LoopControl::Normal => {}
                    LoopControl::Break => break,
                    LoopControl::Exit(value) => return value,
                }
            }
        }
        other => return Value::Error(format!("not iterable: {}", other.type_name())),
    }

    Value::Void
}

/// Call a user function or built-in with already-evaluated arguments.
fn apply_function(function: Value, arguments: Vec<Value>) -> Value {
    match function {
        Value::Function(function) => {
            let env = Environment::new_enclosed(&function.env);
            // Parameters bind positionally; missing arguments are simply left
            // unbound and surface as name errors inside the body.
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                env.borrow_mut().set(parameter.value.clone(), argument);
            }
            unwrap_return_value(eval_block_statement(&function.body, &env))
        }
        Value::Builtin(builtin) => (builtin.func)(&arguments),
        other => Value::Error(format!("not a function: {}", other.type_name())),
    }
}

/// Unwrap a `ReturnValue` at the call boundary; loop control cannot cross a
/// function boundary and degrades to `Void`.
fn unwrap_return_value(value: Value) -> Value {
    match value {
        Value::ReturnValue(value) => *value,
        Value::Break | Value::Continue => Value::Void,
        value => value,
    }
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Env) -> Value {
    let mut hash = im::HashMap::new();

    for (key_expression, value_expression) in pairs {
        let key = eval_expression(key_expression, env);
        if key.is_error() {
            return key;
        }
        let Some(hash_key) = key.hash_key() else {
            return Value::Error(format!("unusable as hash key: {}", key.type_name()));
        };

        let value = eval_expression(value_expression, env);
        if value.is_error() {
            return value;
        }

        // Later duplicates overwrite earlier pairs.
        hash.insert(hash_key, HashPair { key, value });
    }

    Value::Hash(hash)
}

fn eval_index_expression(left: &Value, index: &Value) -> Value {
    match (left, index) {
        (Value::Array(elements), Value::Integer(index)) => {
            if *index < 0 || *index >= elements.len() as i64 {
                return Value::Null;
            }
            elements[*index as usize].clone()
        }
        (Value::Str(value), Value::Integer(index)) => {
            if *index < 0 {
                return Value::Null;
            }
            match value.chars().nth(*index as usize) {
                Some(ch) => Value::Str(ch.to_string()),
                None => Value::Null,
            }
        }
        (Value::Hash(pairs), _) => {
            let Some(hash_key) = index.hash_key() else {
                return Value::Error(format!("unusable as hash key: {}", index.type_name()));
            };
            match pairs.get(&hash_key) {
                Some(pair) => pair.value.clone(),
                None => Value::Null,
            }
        }
        _ => Value::Error(format!(
            "index operator not supported: {}",
            left.type_name()
        )),
    }
}

/// Scan the literal body for balanced `{…}` placeholders, evaluate each in a
/// child frame, and splice in its inspect form. The scan resumes after the
/// spliced text, so inserted content is never rescanned.
fn eval_fstring_literal(body: &str, env: &Env) -> Value {
    let placeholder_env = Environment::new_enclosed(env);

    let mut result = body.to_string();
    let mut start = 0;

    loop {
        let Some(open) = result[start..].find('{').map(|offset| start + offset) else {
            break;
        };
        let Some(close) = result[open..].find('}').map(|offset| open + offset) else {
            return Value::Error("unmatched '{' found in the string".to_string());
        };

        let placeholder = &result[open + 1..close];
        let mut parser = Parser::new(Lexer::new(placeholder));
        let program = parser.parse();
        if !parser.errors().is_empty() {
            let messages: Vec<String> = parser
                .errors()
                .iter()
                .map(|error| error.message.clone())
                .collect();
            return Value::Error(format!(
                "error parsing placeholder: {}",
                messages.join("; ")
            ));
        }

        let value = eval_program(&program, &placeholder_env);
        if value.is_error() {
            return value;
        }

        let inspected = value.inspect();
        result = format!("{}{}{}", &result[..open], inspected, &result[close + 1..]);
        start = open + inspected.len();
    }

    Value::Str(result)
}
