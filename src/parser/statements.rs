//! Keyword-led statement builders
//!
//! The single-expression dispatcher lands here first: a window whose
//! leading word is one of the dispatch keywords has that word consumed and
//! the rest handed to the dedicated builder. Windows led by anything else
//! fall through to the shape dispatch in [`expressions`].
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | realloc | if_chain | while_loop | syscall
//!             | function_decl | return | free | alloc | get | set
//!             | break | continue | expression
//! var_decl      ::= "var" type name "=" expression
//! realloc       ::= "realloc" name type
//! if_chain      ::= "if" "(" cond ")" block
//!                   ("else" "if" "(" cond ")" block)* ("else" block)?
//! while_loop    ::= "while" "(" cond ")" block
//! syscall       ::= "syscall" name "(" args ")"
//! function_decl ::= "function" name "(" params ")" ":" type block
//! set           ::= "set" expression "=" expression
//! ```
//!
//! [`expressions`]: crate::parser::expressions

use crate::parser::ast::{Branch, Expr, Param, SourceLocation};
use crate::parser::delimiters::{
    find_top_level, interior, match_delimited, split_on_commas,
};
use crate::parser::expressions::{parse_arguments, parse_expression};
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{
    expect_window, parse_block, parse_window, SyntaxError,
};
use crate::parser::types::{resolve_type, validate_name};

/// Dispatch a single statement/expression unit.
pub(crate) fn parse_statement(tokens: &[Token]) -> Result<Expr, SyntaxError> {
    let first = tokens.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "where a statement was expected".to_string(),
        location: SourceLocation::new(0, 0),
    })?;

    if first.kind == TokenKind::Word {
        let rest = &tokens[1..];
        match first.literal.as_str() {
            "var" => return parse_variable_declaration(rest, first.location),
            "realloc" => return parse_realloc(rest, first.location),
            "if" => return parse_if_chain(rest, first.location),
            "while" => return parse_while_loop(rest, first.location),
            "syscall" => return parse_system_call(rest, first.location),
            "function" => {
                return parse_function_declaration(rest, first.location)
            }
            "return" => return parse_return(rest),
            "free" => {
                let address =
                    expect_window(rest, first.location, "after 'free'")?;
                return Ok(Expr::FreeMemory {
                    address: Box::new(address),
                });
            }
            "alloc" => return parse_alloc(rest, first.location),
            "get" => {
                let address =
                    expect_window(rest, first.location, "after 'get'")?;
                return Ok(Expr::GetPointerValue {
                    address: Box::new(address),
                });
            }
            "set" => return parse_set(rest, first.location),
            "break" => {
                expect_empty(rest, "after 'break'")?;
                return Ok(Expr::Break);
            }
            "continue" => {
                expect_empty(rest, "after 'continue'")?;
                return Ok(Expr::Continue);
            }
            _ => {}
        }
    }

    parse_expression(tokens)
}

/// `var <type>[size]? <name> = <initializer>`
fn parse_variable_declaration(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let (var_type, consumed) = resolve_type(tokens, at)?;

    let name_token =
        tokens.get(consumed).ok_or(SyntaxError::UnexpectedEnd {
            context: "after type in variable declaration".to_string(),
            location: last_location(tokens, at),
        })?;
    let name = validate_name(name_token)?;

    let eq = tokens.get(consumed + 1).ok_or(SyntaxError::UnexpectedEnd {
        context: "after name in variable declaration".to_string(),
        location: name_token.location,
    })?;
    if eq.kind != TokenKind::Equal {
        return Err(SyntaxError::UnexpectedToken {
            found: eq.to_string(),
            context: "in variable declaration, expected '='".to_string(),
            location: eq.location,
        });
    }

    let initializer = expect_window(
        &tokens[consumed + 2..],
        eq.location,
        "after '=' in variable declaration",
    )?;

    Ok(Expr::VariableDeclaration {
        var_type,
        name,
        initializer: Box::new(initializer),
    })
}

/// `realloc <name> <type>[size]?`
fn parse_realloc(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let name_token = tokens.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "after 'realloc'".to_string(),
        location: at,
    })?;
    let name = validate_name(name_token)?;

    let (new_type, consumed) =
        resolve_type(&tokens[1..], name_token.location)?;
    expect_empty(&tokens[1 + consumed..], "after type in realloc statement")?;

    Ok(Expr::ReallocVariable { name, new_type })
}

/// `if (cond) { body }` with zero-or-more `else if` links and an optional
/// trailing `else`.
fn parse_if_chain(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let (if_branch, mut remaining) = parse_branch(tokens, at, "'if'")?;

    let mut else_ifs = Vec::new();
    let mut else_body = None;

    while let Some(token) = remaining.first() {
        if !token.is(TokenKind::Word, "else") {
            return Err(SyntaxError::UnexpectedToken {
                found: token.to_string(),
                context: "after if body".to_string(),
                location: token.location,
            });
        }

        let after_else = &remaining[1..];
        if after_else
            .first()
            .map_or(false, |t| t.is(TokenKind::Word, "if"))
        {
            let (branch, rest) =
                parse_branch(&after_else[1..], token.location, "'else if'")?;
            else_ifs.push(branch);
            remaining = rest;
        } else {
            let brace =
                after_else.first().ok_or(SyntaxError::UnexpectedEnd {
                    context: "after 'else'".to_string(),
                    location: token.location,
                })?;
            if !brace.is(TokenKind::Bracket, "{") {
                return Err(SyntaxError::UnexpectedToken {
                    found: brace.to_string(),
                    context: "after 'else', expected 'if' or '{'".to_string(),
                    location: brace.location,
                });
            }

            let delimited = match_delimited(after_else, "{", "}")?;
            else_body = Some(Box::new(parse_block(delimited)?));
            expect_empty(&after_else[delimited.len()..], "after else body")?;
            break;
        }
    }

    Ok(Expr::IfElseChain {
        if_branch,
        else_ifs,
        else_body,
    })
}

/// `while (cond) { body }`
fn parse_while_loop(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let (branch, rest) = parse_branch(tokens, at, "'while'")?;
    expect_empty(rest, "after while body")?;

    Ok(Expr::WhileLoop {
        condition: branch.condition,
        body: branch.body,
    })
}

/// Carve `( condition ) { body }` and parse both; returns the branch and
/// whatever follows the body.
fn parse_branch<'a>(
    tokens: &'a [Token],
    at: SourceLocation,
    what: &str,
) -> Result<(Branch, &'a [Token]), SyntaxError> {
    let open = tokens.first().ok_or_else(|| SyntaxError::UnexpectedEnd {
        context: format!("after {}", what),
        location: at,
    })?;
    if !open.is(TokenKind::Parenthesis, "(") {
        return Err(SyntaxError::UnexpectedToken {
            found: open.to_string(),
            context: format!("after {}, expected '('", what),
            location: open.location,
        });
    }

    let cond_delimited = match_delimited(tokens, "(", ")")?;
    let condition =
        expect_window(interior(cond_delimited), open.location, "as condition")?;

    let after = &tokens[cond_delimited.len()..];
    let brace = after.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "after condition".to_string(),
        location: last_location(tokens, at),
    })?;
    if !brace.is(TokenKind::Bracket, "{") {
        return Err(SyntaxError::UnexpectedToken {
            found: brace.to_string(),
            context: "after condition, expected '{'".to_string(),
            location: brace.location,
        });
    }

    let body_delimited = match_delimited(after, "{", "}")?;
    let body = parse_block(body_delimited)?;

    Ok((
        Branch {
            condition: Box::new(condition),
            body: Box::new(body),
        },
        &after[body_delimited.len()..],
    ))
}

/// `syscall <name> ( <args,> )`
fn parse_system_call(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let name_token = tokens.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "after 'syscall'".to_string(),
        location: at,
    })?;
    if name_token.kind != TokenKind::Word {
        return Err(SyntaxError::UnexpectedToken {
            found: name_token.to_string(),
            context: "after 'syscall', expected a name".to_string(),
            location: name_token.location,
        });
    }

    let paren = tokens.get(1).ok_or(SyntaxError::UnexpectedEnd {
        context: "after syscall name".to_string(),
        location: name_token.location,
    })?;
    if !paren.is(TokenKind::Parenthesis, "(") {
        return Err(SyntaxError::UnexpectedToken {
            found: paren.to_string(),
            context: "after syscall name, expected '('".to_string(),
            location: paren.location,
        });
    }

    let args_delimited = match_delimited(&tokens[1..], "(", ")")?;
    expect_empty(
        &tokens[1 + args_delimited.len()..],
        "after syscall arguments",
    )?;
    let args = parse_arguments(interior(args_delimited))?;

    Ok(Expr::SystemCall {
        name: name_token.literal.clone(),
        args,
    })
}

/// `function <name> ( <type> <name>, ... ) : <returnType> { body }`
fn parse_function_declaration(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let name_token = tokens.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "after 'function'".to_string(),
        location: at,
    })?;
    let name = validate_name(name_token)?;

    let paren = tokens.get(1).ok_or(SyntaxError::UnexpectedEnd {
        context: "after function name".to_string(),
        location: name_token.location,
    })?;
    if !paren.is(TokenKind::Parenthesis, "(") {
        return Err(SyntaxError::UnexpectedToken {
            found: paren.to_string(),
            context: "after function name, expected '('".to_string(),
            location: paren.location,
        });
    }

    let params_delimited = match_delimited(&tokens[1..], "(", ")")?;
    let params =
        parse_parameters(interior(params_delimited), paren.location)?;

    let after = &tokens[1 + params_delimited.len()..];
    let colon = after.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "after parameter list".to_string(),
        location: last_location(tokens, at),
    })?;
    if colon.kind != TokenKind::Colon {
        return Err(SyntaxError::UnexpectedToken {
            found: colon.to_string(),
            context: "after parameter list, expected ':'".to_string(),
            location: colon.location,
        });
    }

    let (return_type, consumed) = resolve_type(&after[1..], colon.location)?;

    let body_tokens = &after[1 + consumed..];
    let brace = body_tokens.first().ok_or(SyntaxError::UnexpectedEnd {
        context: "before function body".to_string(),
        location: last_location(tokens, at),
    })?;
    if !brace.is(TokenKind::Bracket, "{") {
        return Err(SyntaxError::UnexpectedToken {
            found: brace.to_string(),
            context: "before function body, expected '{'".to_string(),
            location: brace.location,
        });
    }

    let body_delimited = match_delimited(body_tokens, "{", "}")?;
    expect_empty(&body_tokens[body_delimited.len()..], "after function body")?;
    let body = parse_block(body_delimited)?;

    Ok(Expr::FunctionDeclaration {
        name,
        return_type,
        params,
        body: Box::new(body),
    })
}

/// Ordered `type name` pairs from a parameter list interior.
fn parse_parameters(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Vec<Param>, SyntaxError> {
    let mut params = Vec::new();

    if tokens.is_empty() {
        return Ok(params);
    }

    for segment in split_on_commas(tokens) {
        let (param_type, consumed) = resolve_type(segment, at)?;

        let name_token =
            segment.get(consumed).ok_or(SyntaxError::UnexpectedEnd {
                context: "after parameter type".to_string(),
                location: last_location(segment, at),
            })?;
        let name = validate_name(name_token)?;

        if let Some(extra) = segment.get(consumed + 1) {
            return Err(SyntaxError::UnexpectedToken {
                found: extra.to_string(),
                context: "after parameter name".to_string(),
                location: extra.location,
            });
        }

        params.push(Param { name, param_type });
    }

    Ok(params)
}

/// `return` with an optional value expression.
fn parse_return(tokens: &[Token]) -> Result<Expr, SyntaxError> {
    if tokens.is_empty() {
        return Ok(Expr::Return(None));
    }
    Ok(Expr::Return(Some(Box::new(parse_window(tokens)?))))
}

/// `alloc <type>[size]?` — the whole window must be the type descriptor.
fn parse_alloc(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let (alloc_type, consumed) = resolve_type(tokens, at)?;
    expect_empty(&tokens[consumed..], "after type in alloc expression")?;

    Ok(Expr::AllocationForPointer { alloc_type })
}

/// `set <addrExpr> = <valueExpr>` — split at the first top-level `=`.
fn parse_set(
    tokens: &[Token],
    at: SourceLocation,
) -> Result<Expr, SyntaxError> {
    let split = find_top_level(tokens, |t| t.kind == TokenKind::Equal)
        .ok_or(SyntaxError::UnexpectedEnd {
            context: "looking for '=' in set statement".to_string(),
            location: last_location(tokens, at),
        })?;

    let eq_location = tokens[split].location;
    let address = expect_window(&tokens[..split], at, "after 'set'")?;
    let value = expect_window(
        &tokens[split + 1..],
        eq_location,
        "after '=' in set statement",
    )?;

    Ok(Expr::ModifyPointerValue {
        address: Box::new(address),
        value: Box::new(value),
    })
}

/// The window must be fully consumed at this point.
fn expect_empty(tokens: &[Token], context: &str) -> Result<(), SyntaxError> {
    match tokens.first() {
        None => Ok(()),
        Some(token) => Err(SyntaxError::UnexpectedToken {
            found: token.to_string(),
            context: context.to_string(),
            location: token.location,
        }),
    }
}

fn last_location(tokens: &[Token], fallback: SourceLocation) -> SourceLocation {
    tokens.last().map(|t| t.location).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::BaseType;
    use crate::parser::parse::Parser;

    fn parse_one(source: &str) -> Expr {
        let parser = Parser::new(source).unwrap();
        let Expr::Block(mut statements) = parser.parse_program().unwrap()
        else {
            panic!("Expected top-level block");
        };
        assert_eq!(statements.len(), 1, "expected one statement");
        statements.remove(0)
    }

    fn parse_err(source: &str) -> SyntaxError {
        let parser = Parser::new(source).unwrap();
        parser.parse_program().unwrap_err()
    }

    #[test]
    fn test_reserved_keyword_as_name_rejected() {
        assert!(matches!(
            parse_err("var int32 if = 5;"),
            SyntaxError::ReservedName { ref name, .. } if name == "if"
        ));
    }

    #[test]
    fn test_numeric_name_rejected() {
        assert!(matches!(
            parse_err("var int32 9 = 5;"),
            SyntaxError::NumericName { ref name, .. } if name == "9"
        ));
    }

    #[test]
    fn test_unknown_base_type_rejected() {
        assert!(matches!(
            parse_err("var bogus x = 1;"),
            SyntaxError::UnknownBaseType { ref found, .. } if found == "bogus"
        ));
    }

    #[test]
    fn test_sized_declaration() {
        let statement = parse_one("var uint8[16] buf = alloc uint8[16];");

        match statement {
            Expr::VariableDeclaration {
                var_type,
                name,
                initializer,
            } => {
                assert_eq!(var_type.base, BaseType::UInt8);
                assert_eq!(*var_type.size.unwrap(), Expr::Number(16));
                assert_eq!(name, "buf");
                assert!(matches!(
                    *initializer,
                    Expr::AllocationForPointer { .. }
                ));
            }
            other => panic!("Expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_declaration_is_explicit_error() {
        assert!(matches!(
            parse_err("var int32 x"),
            SyntaxError::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            parse_err("var int32 x ="),
            SyntaxError::UnexpectedEnd { .. }
        ));
    }

    #[test]
    fn test_if_chain_full() {
        let statement = parse_one(
            "if (x < 1) { a = 1; } else if (x < 2) { a = 2; } \
             else if (x < 3) { a = 3; } else { a = 4; }",
        );

        match statement {
            Expr::IfElseChain {
                if_branch,
                else_ifs,
                else_body,
            } => {
                assert!(matches!(
                    *if_branch.condition,
                    Expr::MathExpression { .. }
                ));
                assert_eq!(else_ifs.len(), 2);
                assert!(else_body.is_some());
            }
            other => panic!("Expected if/else chain, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else() {
        let statement = parse_one("if (x == 1) { free x; }");

        match statement {
            Expr::IfElseChain {
                else_ifs,
                else_body,
                ..
            } => {
                assert!(else_ifs.is_empty());
                assert!(else_body.is_none());
            }
            other => panic!("Expected if/else chain, got {:?}", other),
        }
    }

    #[test]
    fn test_while_loop() {
        let statement = parse_one("while (i < 10) { i = i + 1; }");

        match statement {
            Expr::WhileLoop { condition, body } => {
                assert!(matches!(*condition, Expr::MathExpression { .. }));
                let Expr::Block(statements) = *body else {
                    panic!("Expected block body");
                };
                assert_eq!(statements.len(), 1);
            }
            other => panic!("Expected while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_body_is_explicit_error() {
        assert!(matches!(
            parse_err("while (i < 10) { i = i + 1;"),
            SyntaxError::UnbalancedDelimiter { .. }
        ));
    }

    #[test]
    fn test_syscall_arguments() {
        let statement = parse_one(r#"syscall write(1, "hi", 2);"#);

        match statement {
            Expr::SystemCall { name, args } => {
                assert_eq!(name, "write");
                assert_eq!(args.len(), 3);
                assert_eq!(args[0], Expr::Number(1));
                assert_eq!(args[1], Expr::StringLiteral("hi".to_string()));
            }
            other => panic!("Expected syscall, got {:?}", other),
        }
    }

    #[test]
    fn test_function_declaration() {
        let statement = parse_one(
            "function add(int32 a, int32 b): int64 { return a + b; }",
        );

        match statement {
            Expr::FunctionDeclaration {
                name,
                return_type,
                params,
                body,
            } => {
                assert_eq!(name, "add");
                assert_eq!(return_type.base, BaseType::Int64);
                assert_eq!(params.len(), 2);
                assert_eq!(params[0].name, "a");
                assert_eq!(params[0].param_type.base, BaseType::Int32);
                let Expr::Block(statements) = *body else {
                    panic!("Expected block body");
                };
                assert!(matches!(statements[0], Expr::Return(Some(_))));
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_function_with_no_parameters() {
        let statement = parse_one("function main(): int32 { return 0; }");

        match statement {
            Expr::FunctionDeclaration { params, .. } => {
                assert!(params.is_empty());
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_reserved_parameter_name_rejected() {
        assert!(matches!(
            parse_err("function f(int32 while): int32 { return 0; }"),
            SyntaxError::ReservedName { ref name, .. } if name == "while"
        ));
    }

    #[test]
    fn test_realloc_statement() {
        let statement = parse_one("realloc buf uint8[32];");

        match statement {
            Expr::ReallocVariable { name, new_type } => {
                assert_eq!(name, "buf");
                assert_eq!(new_type.base, BaseType::UInt8);
                assert_eq!(*new_type.size.unwrap(), Expr::Number(32));
            }
            other => panic!("Expected realloc, got {:?}", other),
        }
    }

    #[test]
    fn test_pointer_statements() {
        let statement = parse_one("set p + 4 = 255;");
        match statement {
            Expr::ModifyPointerValue { address, value } => {
                assert!(matches!(*address, Expr::MathExpression { .. }));
                assert_eq!(*value, Expr::Number(255));
            }
            other => panic!("Expected pointer write, got {:?}", other),
        }

        let statement = parse_one("free p;");
        assert!(matches!(statement, Expr::FreeMemory { .. }));

        let statement = parse_one("var int32 v = get p + 4;");
        match statement {
            Expr::VariableDeclaration { initializer, .. } => {
                assert!(matches!(*initializer, Expr::GetPointerValue { .. }));
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_jump_statements() {
        assert_eq!(
            parse_one("while (1) { break; }"),
            Expr::WhileLoop {
                condition: Box::new(Expr::Number(1)),
                body: Box::new(Expr::Block(vec![Expr::Break])),
            }
        );

        let statement = parse_one("while (1) { continue; }");
        match statement {
            Expr::WhileLoop { body, .. } => {
                assert_eq!(*body, Expr::Block(vec![Expr::Continue]));
            }
            other => panic!("Expected while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_return_with_and_without_value() {
        let statement = parse_one("function f(): int32 { return 1 + 2; }");
        let Expr::FunctionDeclaration { body, .. } = statement else {
            panic!("Expected function declaration");
        };
        let Expr::Block(statements) = *body else {
            panic!("Expected block body");
        };
        assert!(matches!(
            statements[0],
            Expr::Return(Some(ref e)) if matches!(**e, Expr::MathExpression { .. })
        ));

        assert!(matches!(parse_one("return;"), Expr::Return(None)));
    }
}
