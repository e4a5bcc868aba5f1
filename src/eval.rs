//! Tree-walking evaluator.
//!
//! `Return` and `Error` values short-circuit evaluation: blocks pass them
//! through still wrapped, the program and function-call boundaries unwrap
//! `Return` exactly once, and the first `Error` produced becomes the result
//! of the enclosing program.

use std::io::prelude::*;
use std::rc::Rc;

use crate::ast::{Block, Expr, Ident, InfixOp, PrefixOp, Program, Stmt};
use crate::env::Env;
use crate::value::{Function, Predef, Value};

/// Walks the AST and produces values.
///
/// The writer is the sink for the `print`/`printLine` predefs; everything
/// else is pure with respect to the host.
#[derive(Debug)]
pub struct Evaluator<'a, W: Write> {
    output: &'a mut W,
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(output: &'a mut W) -> Evaluator<'a, W> {
        Evaluator { output }
    }

    /// Evaluates a program in `env`.
    ///
    /// Returns `None` when the final statement produces no value (a trailing
    /// `let`, or an empty program).
    pub fn eval_program(&mut self, program: &Program, env: &Rc<Env>) -> Option<Value> {
        let mut result = None;
        for stmt in &program.statements {
            match self.eval_stmt(stmt, env) {
                Some(Value::Return(inner)) => return Some(*inner),
                Some(Value::Error(message)) => return Some(Value::Error(message)),
                other => result = other,
            }
        }
        result
    }

    /// Like `eval_program`, but `Return` and `Error` stay wrapped so they
    /// keep bubbling through enclosing blocks.
    fn eval_block(&mut self, block: &Block, env: &Rc<Env>) -> Option<Value> {
        let mut result = None;
        for stmt in &block.statements {
            match self.eval_stmt(stmt, env) {
                Some(v) if matches!(v, Value::Return(_) | Value::Error(_)) => return Some(v),
                other => result = other,
            }
        }
        result
    }

    fn eval_stmt(&mut self, stmt: &Stmt, env: &Rc<Env>) -> Option<Value> {
        match stmt {
            Stmt::Let { name, value } => {
                let value = self.eval_expr(value, env);
                if value.is_error() {
                    return Some(value);
                }
                env.set(name.name.clone(), value);
                None
            }
            Stmt::Return { value } => {
                let value = self.eval_expr(value, env);
                if value.is_error() {
                    Some(value)
                } else {
                    Some(Value::Return(Box::new(value)))
                }
            }
            Stmt::Expr { expression } => Some(self.eval_expr(expression, env)),
        }
    }

    fn eval_expr(&mut self, expr: &Expr, env: &Rc<Env>) -> Value {
        match expr {
            Expr::Int { value } => Value::Int(*value),
            Expr::Str { value } => Value::string(value.clone()),
            Expr::Bool { value } => Value::Bool(*value),
            Expr::Ident(ident) => eval_identifier(ident, env),
            Expr::Prefix { op, right } => {
                let right = self.eval_expr(right, env);
                if right.is_error() {
                    return right;
                }
                eval_prefix(*op, right)
            }
            Expr::Infix { op, left, right } => {
                let left = self.eval_expr(left, env);
                if left.is_error() {
                    return left;
                }
                let right = self.eval_expr(right, env);
                if right.is_error() {
                    return right;
                }
                eval_infix(*op, left, right)
            }
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expr(condition, env);
                if condition.is_error() {
                    return condition;
                }
                if condition.is_truthy() {
                    self.eval_block(consequence, env).unwrap_or(Value::Null)
                } else if let Some(alt) = alternative {
                    self.eval_block(alt, env).unwrap_or(Value::Null)
                } else {
                    Value::Null
                }
            }
            Expr::Function { parameters, body } => Value::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            })),
            Expr::Call {
                function,
                arguments,
            } => {
                let callee = self.eval_expr(function, env);
                if callee.is_error() {
                    return callee;
                }
                let args = match self.eval_expressions(arguments, env) {
                    Ok(args) => args,
                    Err(e) => return e,
                };
                self.apply_function(callee, args)
            }
            Expr::Array { elements } => match self.eval_expressions(elements, env) {
                Ok(elements) => Value::Array(Rc::new(elements)),
                Err(e) => e,
            },
            Expr::Index { left, index } => {
                let left = self.eval_expr(left, env);
                if left.is_error() {
                    return left;
                }
                let index = self.eval_expr(index, env);
                if index.is_error() {
                    return index;
                }
                eval_index(left, index)
            }
        }
    }

    /// Evaluates `exprs` left to right; the first error collapses the whole
    /// list to that error.
    fn eval_expressions(&mut self, exprs: &[Expr], env: &Rc<Env>) -> Result<Vec<Value>, Value> {
        let mut result = Vec::with_capacity(exprs.len());
        for e in exprs {
            let value = self.eval_expr(e, env);
            if value.is_error() {
                return Err(value);
            }
            result.push(value);
        }
        Ok(result)
    }

    fn apply_function(&mut self, callee: Value, args: Vec<Value>) -> Value {
        match callee {
            Value::Function(func) => {
                if func.parameters.len() != args.len() {
                    return Value::Error(format!(
                        "incorrect number of arguments: need {}, got {}",
                        func.parameters.len(),
                        args.len()
                    ));
                }
                let call_env = Env::new_enclosed(func.env.clone());
                for (param, arg) in func.parameters.iter().zip(args) {
                    call_env.set(param.name.clone(), arg);
                }
                match self.eval_block(&func.body, &call_env) {
                    Some(Value::Return(inner)) => *inner,
                    Some(value) => value,
                    None => Value::Null,
                }
            }
            Value::Predef(predef) => (predef.func)(&mut *self.output, &args),
            other => Value::Error(format!(
                "applyFunction: unknown function; got {}",
                other.type_tag()
            )),
        }
    }
}

fn eval_identifier(ident: &Ident, env: &Rc<Env>) -> Value {
    if let Some(value) = env.get(&ident.name) {
        return value;
    }
    if let Some(predef) = lookup_predef(&ident.name) {
        return Value::Predef(predef);
    }
    Value::Error(format!(
        "unknown reference on line {}: {}",
        ident.line, ident.name
    ))
}

fn eval_prefix(op: PrefixOp, right: Value) -> Value {
    match op {
        PrefixOp::Bang => Value::Bool(!right.is_truthy()),
        PrefixOp::Neg => match right {
            Value::Int(v) => Value::Int(v.wrapping_neg()),
            other => Value::Error(format!(
                "unknown operator: unary - not defined for `{}`",
                other.type_tag()
            )),
        },
    }
}

fn eval_infix(op: InfixOp, left: Value, right: Value) -> Value {
    if let (Value::Int(l), Value::Int(r)) = (&left, &right) {
        return eval_integer_infix(op, *l, *r);
    }
    if op == InfixOp::Add {
        if let (Value::Str(l), Value::Str(r)) = (&left, &right) {
            let mut bytes = l.as_ref().clone();
            bytes.extend_from_slice(r.as_slice());
            return Value::Str(Rc::new(bytes));
        }
    }
    match op {
        InfixOp::Eq => Value::Bool(left.ref_eq(&right)),
        InfixOp::NotEq => Value::Bool(!left.ref_eq(&right)),
        _ if left.type_tag() != right.type_tag() => Value::Error(format!(
            "type mismatch: can not {} `{}` and `{}`",
            op,
            left.type_tag(),
            right.type_tag()
        )),
        _ => Value::Error(format!(
            "unknown operator: binary {} not defined for `{}` and `{}`",
            op,
            left.type_tag(),
            right.type_tag()
        )),
    }
}

fn eval_integer_infix(op: InfixOp, left: i64, right: i64) -> Value {
    match op {
        InfixOp::Add => Value::Int(left.wrapping_add(right)),
        InfixOp::Sub => Value::Int(left.wrapping_sub(right)),
        InfixOp::Mul => Value::Int(left.wrapping_mul(right)),
        InfixOp::Div => {
            if right == 0 {
                Value::Error("divide by zero".to_string())
            } else {
                Value::Int(left.wrapping_div(right))
            }
        }
        InfixOp::Rem => {
            if right == 0 {
                Value::Error("divide by zero".to_string())
            } else {
                Value::Int(left.wrapping_rem(right))
            }
        }
        InfixOp::Lt => Value::Bool(left < right),
        InfixOp::Gt => Value::Bool(left > right),
        InfixOp::Eq => Value::Bool(left == right),
        InfixOp::NotEq => Value::Bool(left != right),
    }
}

fn eval_index(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(elements), Value::Int(idx)) => {
            if *idx < 0 || *idx as usize >= elements.len() {
                Value::Error("index expression: index out of array bounds".to_string())
            } else {
                elements[*idx as usize].clone()
            }
        }
        (Value::Str(s), Value::Int(idx)) => {
            if *idx < 0 || *idx as usize >= s.len() {
                Value::Error("index expression: index out of string bounds".to_string())
            } else {
                Value::string(vec![s[*idx as usize]])
            }
        }
        _ => Value::Error(format!(
            "index expression: can not take index of type `{}` with `{}`",
            left.type_tag(),
            index.type_tag()
        )),
    }
}

/// Process-wide table of predefined functions; identifier lookup consults
/// the user environment first, then this registry.
const PREDEFS: [Predef; 5] = [
    Predef {
        name: "print",
        func: predef_print,
    },
    Predef {
        name: "printLine",
        func: predef_print_line,
    },
    Predef {
        name: "len",
        func: predef_len,
    },
    Predef {
        name: "head",
        func: predef_head,
    },
    Predef {
        name: "tail",
        func: predef_tail,
    },
];

pub fn lookup_predef(name: &str) -> Option<Predef> {
    PREDEFS.iter().find(|p| p.name == name).copied()
}

fn predef_print(out: &mut dyn Write, args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(format!(
            "print: expected exactly 1 argument. given {}",
            args.len()
        ));
    }
    if write!(out, "{}", args[0].printable()).is_err() {
        return Value::Error("print: could not write output".to_string());
    }
    Value::Null
}

fn predef_print_line(out: &mut dyn Write, args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(format!(
            "printLine: expected exactly 1 argument. given {}",
            args.len()
        ));
    }
    if writeln!(out, "{}", args[0].printable()).is_err() {
        return Value::Error("printLine: could not write output".to_string());
    }
    Value::Null
}

fn predef_len(_out: &mut dyn Write, args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(format!(
            "len: expected exactly 1 argument. given {}",
            args.len()
        ));
    }
    match &args[0] {
        Value::Str(s) => Value::Int(s.len() as i64),
        Value::Array(elements) => Value::Int(elements.len() as i64),
        _ => Value::Error("len: can only take length of strings and arrays".to_string()),
    }
}

fn predef_head(_out: &mut dyn Write, args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(format!(
            "head: expected exactly 1 argument. given {}",
            args.len()
        ));
    }
    match &args[0] {
        Value::Array(elements) => match elements.first() {
            Some(first) => first.clone(),
            None => Value::Error("head: can not take head of empty array".to_string()),
        },
        Value::Str(s) => match s.first() {
            Some(b) => Value::string(vec![*b]),
            None => Value::Error("head: can not take head of empty string".to_string()),
        },
        other => Value::Error(format!(
            "head: can not take head of `{}`",
            other.type_tag()
        )),
    }
}

fn predef_tail(_out: &mut dyn Write, args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(format!(
            "tail: expected exactly 1 argument. given {}",
            args.len()
        ));
    }
    match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Value::Error("tail: can not take tail of empty array".to_string())
            } else {
                Value::Array(Rc::new(elements[1..].to_vec()))
            }
        }
        Value::Str(s) => {
            if s.is_empty() {
                Value::Error("tail: can not take tail of empty string".to_string())
            } else {
                Value::string(s[1..].to_vec())
            }
        }
        other => Value::Error(format!(
            "tail: can not take tail of `{}`",
            other.type_tag()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn eval_with_output(input: &str, out: &mut Vec<u8>) -> Option<Value> {
        let mut parser = Parser::new(Scanner::new(input));
        let program = parser.parse_program();
        assert!(
            parser.errors().is_empty(),
            "parse errors: {:?}",
            parser.errors()
        );
        let env = Env::new();
        Evaluator::new(out).eval_program(&program, &env)
    }

    fn eval_input(input: &str) -> Option<Value> {
        let mut out: Vec<u8> = Vec::new();
        let result = eval_with_output(input, &mut out);
        assert!(out.is_empty(), "unexpected output: {:?}", out);
        result
    }

    fn eval_value(input: &str) -> Value {
        eval_input(input).unwrap_or_else(|| panic!("no value for input: {}", input))
    }

    fn assert_error(input: &str, expected: &str) {
        match eval_value(input) {
            Value::Error(message) => assert_eq!(message, expected, "input: {}", input),
            other => panic!("expected error for {}, got {:?}", input, other),
        }
    }

    #[test]
    fn integer_expressions() {
        let cases = [
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("-15", -15),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("20 * -10", -200),
            ("50 / 2 * 2 + 10", 60),
            ("3 * (3 * 3) + 10", 37),
            ("10 % 3", 1),
            ("10 % 2", 0),
        ];
        for (input, expected) in cases {
            assert_eq!(eval_value(input), Value::Int(expected), "input: {}", input);
        }
    }

    #[test]
    fn boolean_expressions() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 < 1", false),
            ("1 > 1", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("1 == 2", false),
            ("1 != 2", true),
            ("true == true", true),
            ("false == false", true),
            ("true == false", false),
            ("true != false", true),
            ("false != true", true),
            ("(1 < 2) == true", true),
            ("(1 < 2) == false", false),
            ("(1 > 2) == true", false),
            ("(1 > 2) == false", true),
        ];
        for (input, expected) in cases {
            assert_eq!(eval_value(input), Value::Bool(expected), "input: {}", input);
        }
    }

    #[test]
    fn bang_operator() {
        let cases = [
            ("!true", false),
            ("!false", true),
            ("!5", false),
            ("!!true", true),
            ("!!false", false),
            ("!!5", true),
            ("!0", false),
            ("!\"\"", false),
        ];
        for (input, expected) in cases {
            assert_eq!(eval_value(input), Value::Bool(expected), "input: {}", input);
        }
    }

    #[test]
    fn if_else_expressions() {
        let cases = [
            ("if (true) { 10 }", Some(10)),
            ("if (false) { 10 }", None),
            ("if (1) { 10 }", Some(10)),
            ("if (1 < 2) { 10 }", Some(10)),
            ("if (1 > 2) { 10 }", None),
            ("if (1 > 2) { 10 } else { 20 }", Some(20)),
            ("if (1 < 2) { 10 } else { 20 }", Some(10)),
        ];
        for (input, expected) in cases {
            let want = match expected {
                Some(v) => Value::Int(v),
                None => Value::Null,
            };
            assert_eq!(eval_value(input), want, "input: {}", input);
        }
    }

    #[test]
    fn return_statements() {
        let cases = [
            ("return 10;", 10),
            ("return 10; 9;", 10),
            ("return 2 * 5; 9;", 10),
            ("9; return 2 * 5; 9;", 10),
        ];
        for (input, expected) in cases {
            assert_eq!(eval_value(input), Value::Int(expected), "input: {}", input);
        }
    }

    #[test]
    fn inner_return_bubbles_through_outer_block() {
        let input = "if (10 > 1) { if (10 > 1) { return 10; } return 1; }";
        assert_eq!(eval_value(input), Value::Int(10));
    }

    #[test]
    fn let_statements() {
        let cases = [
            ("let a = 5; a;", 5),
            ("let a = 5 * 5; a;", 25),
            ("let a = 5 * 5; let b = a; b;", 25),
            ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
        ];
        for (input, expected) in cases {
            assert_eq!(eval_value(input), Value::Int(expected), "input: {}", input);
        }
    }

    #[test]
    fn trailing_let_produces_no_value() {
        assert_eq!(eval_input("let a = 5;"), None);
    }

    #[test]
    fn function_values_carry_parameters_and_body() {
        match eval_value("fn(x) { x + 2; };") {
            Value::Function(func) => {
                assert_eq!(func.parameters.len(), 1);
                assert_eq!(func.parameters[0].name, "x");
                assert_eq!(func.body.to_string(), "(x + 2)");
            }
            other => panic!("expected function value, got {:?}", other),
        }
    }

    #[test]
    fn function_application() {
        let cases = [
            ("let identity = fn(x) { x; }; identity(5);", 5),
            ("let identity = fn(x) { return x; }; identity(5);", 5),
            ("let double = fn(x) { x * 2; }; double(5);", 10),
            ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
            ("let add = fn(x, y) { x + y; }; add(add(5, 5), add(5, 5));", 20),
            ("fn(x) { x; }(5)", 5),
        ];
        for (input, expected) in cases {
            assert_eq!(eval_value(input), Value::Int(expected), "input: {}", input);
        }
    }

    #[test]
    fn closures_capture_definition_environment() {
        let input = "let adder = fn(x) { fn(y) { x + y }; };\
                     let addTwo = adder(2);\
                     addTwo(2);";
        assert_eq!(eval_value(input), Value::Int(4));
    }

    #[test]
    fn function_body_without_return_yields_null() {
        assert_eq!(eval_value("let f = fn() { let a = 1; }; f();"), Value::Null);
    }

    #[test]
    fn wrong_arity_is_an_error() {
        assert_error(
            "let f = fn(x, y) { x + y; }; f(1);",
            "incorrect number of arguments: need 2, got 1",
        );
    }

    #[test]
    fn calling_a_non_function_is_an_error() {
        assert_error("5(1);", "applyFunction: unknown function; got INTEGER");
    }

    #[test]
    fn runtime_errors() {
        let cases = [
            ("5 + true;", "type mismatch: can not + `INTEGER` and `BOOLEAN`"),
            ("5 + true; 5;", "type mismatch: can not + `INTEGER` and `BOOLEAN`"),
            ("-true", "unknown operator: unary - not defined for `BOOLEAN`"),
            (
                "true + false;",
                "unknown operator: binary + not defined for `BOOLEAN` and `BOOLEAN`",
            ),
            (
                "5; true + false; 5",
                "unknown operator: binary + not defined for `BOOLEAN` and `BOOLEAN`",
            ),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: binary + not defined for `BOOLEAN` and `BOOLEAN`",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: binary + not defined for `BOOLEAN` and `BOOLEAN`",
            ),
            (
                "\"Hello\" - \"World\"",
                "unknown operator: binary - not defined for `STRING` and `STRING`",
            ),
        ];
        for (input, expected) in cases {
            assert_error(input, expected);
        }
    }

    #[test]
    fn unknown_reference_reports_line() {
        assert_error("foobar", "unknown reference on line 1: foobar");
        assert_error("5;\nbar", "unknown reference on line 2: bar");
    }

    #[test]
    fn division_by_zero_is_trapped() {
        assert_error("5 / 0", "divide by zero");
        assert_error("5 % 0", "divide by zero");
    }

    #[test]
    fn string_literals_and_concatenation() {
        assert_eq!(eval_value("\"hello\""), Value::string("hello"));
        assert_eq!(
            eval_value("\"Hello\" + \" \" + \"World\""),
            Value::string("Hello World")
        );
    }

    #[test]
    fn strings_compare_by_reference_not_content() {
        assert_eq!(
            eval_value("let a = \"x\"; let b = \"x\"; a == b"),
            Value::Bool(false)
        );
        assert_eq!(eval_value("let a = \"x\"; a == a"), Value::Bool(true));
        assert_eq!(
            eval_value("let a = \"x\"; let b = \"x\"; a != b"),
            Value::Bool(true)
        );
    }

    #[test]
    fn mixed_type_equality_is_false() {
        assert_eq!(eval_value("5 == true"), Value::Bool(false));
        assert_eq!(eval_value("5 != true"), Value::Bool(true));
    }

    #[test]
    fn array_literals() {
        match eval_value("[1, 2 * 2, 3 + 3]") {
            Value::Array(elements) => {
                assert_eq!(
                    elements.as_ref(),
                    &vec![Value::Int(1), Value::Int(4), Value::Int(6)]
                );
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn array_index_expressions() {
        let cases = [
            ("[1, 2, 3][0]", 1),
            ("[1, 2, 3][1]", 2),
            ("[1, 2, 3][2]", 3),
            ("let i = 0; [1][i];", 1),
            ("let xs = [1, 2, 3]; xs[1] + xs[2];", 5),
        ];
        for (input, expected) in cases {
            assert_eq!(eval_value(input), Value::Int(expected), "input: {}", input);
        }
    }

    #[test]
    fn array_index_out_of_bounds() {
        assert_error("[1, 2, 3][3]", "index expression: index out of array bounds");
        assert_error("[1, 2, 3][-1]", "index expression: index out of array bounds");
    }

    #[test]
    fn string_index_expressions() {
        assert_eq!(eval_value("\"hello\"[1]"), Value::string("e"));
        assert_error("\"hi\"[2]", "index expression: index out of string bounds");
    }

    #[test]
    fn indexing_unsupported_types_is_an_error() {
        assert_error(
            "5[0]",
            "index expression: can not take index of type `INTEGER` with `INTEGER`",
        );
        assert_error(
            "[1][\"0\"]",
            "index expression: can not take index of type `ARRAY` with `STRING`",
        );
    }

    #[test]
    fn error_in_argument_list_collapses_call() {
        assert_error(
            "let f = fn(x) { x; }; f(5 + true);",
            "type mismatch: can not + `INTEGER` and `BOOLEAN`",
        );
        assert_error(
            "[1, 5 + true, 3]",
            "type mismatch: can not + `INTEGER` and `BOOLEAN`",
        );
    }

    #[test]
    fn len_builtin() {
        assert_eq!(eval_value("len(\"hello\")"), Value::Int(5));
        assert_eq!(eval_value("len(\"\")"), Value::Int(0));
        assert_eq!(eval_value("len([1, 2, 3])"), Value::Int(3));
        assert_eq!(eval_value("len([])"), Value::Int(0));
        assert_error("len(1)", "len: can only take length of strings and arrays");
        assert_error(
            "len(\"a\", \"b\")",
            "len: expected exactly 1 argument. given 2",
        );
    }

    #[test]
    fn head_builtin() {
        assert_eq!(eval_value("head(\"hello\")"), Value::string("h"));
        assert_eq!(eval_value("head([1, 2, 3])"), Value::Int(1));
        assert_error("head(\"\")", "head: can not take head of empty string");
        assert_error("head([])", "head: can not take head of empty array");
        assert_error("head(5)", "head: can not take head of `INTEGER`");
    }

    #[test]
    fn tail_builtin() {
        assert_eq!(eval_value("tail(\"hello\")"), Value::string("ello"));
        match eval_value("tail([1, 2, 3])") {
            Value::Array(elements) => {
                assert_eq!(elements.as_ref(), &vec![Value::Int(2), Value::Int(3)]);
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert_error("tail(\"\")", "tail: can not take tail of empty string");
        assert_error("tail([])", "tail: can not take tail of empty array");
        assert_error("tail(5)", "tail: can not take tail of `INTEGER`");
    }

    #[test]
    fn string_operations_are_byte_exact() {
        // "é" is the two bytes 0xC3 0xA9; head/tail/indexing split them.
        assert_eq!(eval_value("len(\"é\")"), Value::Int(2));
        assert_eq!(eval_value("head(\"é\")"), Value::string(vec![0xC3u8]));
        assert_eq!(eval_value("tail(\"é\")"), Value::string(vec![0xA9u8]));
        assert_eq!(eval_value("\"é\"[1]"), Value::string(vec![0xA9u8]));
        assert_eq!(eval_value("len(tail(\"é\"))"), Value::Int(1));
        assert_eq!(eval_value("head(\"é\") + tail(\"é\")"), Value::string("é"));
    }

    #[test]
    fn print_builtins_write_to_the_sink() {
        let mut out: Vec<u8> = Vec::new();
        let result = eval_with_output("print(\"a\"); print(\"b\");", &mut out);
        assert_eq!(result, Some(Value::Null));
        assert_eq!(out, b"ab");

        let mut out: Vec<u8> = Vec::new();
        eval_with_output("printLine(42);", &mut out);
        assert_eq!(out, b"42\n");
    }

    #[test]
    fn print_renders_printable_forms() {
        let mut out: Vec<u8> = Vec::new();
        eval_with_output("print(\"unquoted\"); print([1, \"x\"]);", &mut out);
        assert_eq!(out, b"unquoted[1, x]");
    }

    #[test]
    fn shadowed_binding_does_not_leak_out_of_function() {
        let input = "let x = 5; let f = fn(x) { x * 2; }; f(10) + x;";
        assert_eq!(eval_value(input), Value::Int(25));
    }

    #[test]
    fn predefs_are_shadowed_by_user_bindings() {
        assert_eq!(eval_value("let len = 42; len"), Value::Int(42));
    }

    #[test]
    fn let_binding_equals_inline_expression() {
        assert_eq!(eval_value("let x = 2 * 3; x"), eval_value("2 * 3"));
    }

    #[test]
    fn tail_return_equals_explicit_return() {
        let explicit = "let f = fn() { return 7; }; f();";
        let tail = "let f = fn() { 7 }; f();";
        assert_eq!(eval_value(explicit), eval_value(tail));
    }

    #[test]
    fn recursion_through_global_binding() {
        let input = "let fact = fn(n) { if (n < 2) { 1 } else { n * fact(n - 1) } }; fact(5);";
        assert_eq!(eval_value(input), Value::Int(120));
    }
}
