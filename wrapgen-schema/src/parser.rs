//! Go declaration parser.
//!
//! The grammar in `go.pest` recognizes the package clause, imports and every
//! top-level type declaration of a Go source file. Function, variable and
//! constant declarations are skipped by bracket matching; their bodies are
//! never interpreted. The parse tree is lowered into [`crate::decl`] types.

use crate::decl::{
    FieldDecl, FuncExpr, ImportSpec, InterfaceElemExpr, ParamDecl, SourceFile, TermExpr,
    TypeDecl, TypeExpr, TypeParamDecl,
};
use crate::error::ParseError;
use crate::literal::{unquote, unquote_raw};
use crate::types::ChanDir;
use pest::Parser;
use pest::error::{Error, LineColLocation};
use pest::iterators::Pair;

#[derive(pest_derive::Parser)]
#[grammar = "go.pest"] // relative to src/
struct GoParser;

/// Parses a Go source file.
///
/// # Arguments
/// * `src` - Go source text
///
/// # Returns
/// The package name, imports and type declarations of the file.
///
/// # Errors
/// Returns `ParseError::Syntax` if the package clause, an import or a type
/// declaration is malformed.
pub fn parse_file(src: &str) -> Result<SourceFile, ParseError> {
    let root = parse_rule(Rule::file, src)?;
    let mut file = SourceFile::default();

    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::package_clause => file.package = first_ident(pair)?,
            Rule::import_decl => {
                for spec in children(pair, Rule::import_spec) {
                    file.imports.push(import_spec(spec)?);
                }
            }
            Rule::type_decl => {
                for spec in children(pair, Rule::type_spec) {
                    file.types.push(type_spec(spec)?);
                }
            }
            _ => {}
        }
    }

    Ok(file)
}

/// Parses a single type expression, e.g. `map[string]*sub.Item`.
///
/// # Errors
/// Returns `ParseError::Syntax` if `src` is not exactly one type.
pub fn parse_type_expr(src: &str) -> Result<TypeExpr, ParseError> {
    let root = parse_rule(Rule::type_only, src)?;
    first_type(root)
}

/// Evaluates a `//go:build` expression such as `linux && !arm64`.
///
/// `has_tag` reports whether a single build tag is satisfied.
///
/// # Errors
/// Returns `ParseError::Syntax` if `expr` is not a build expression.
pub fn eval_build_constraint(
    expr: &str,
    has_tag: &dyn Fn(&str) -> bool,
) -> Result<bool, ParseError> {
    let root = parse_rule(Rule::build_constraint, expr)?;
    let line = line_of(&root);
    let or = required(children(root, Rule::build_or).next(), line, "build expression")?;
    Ok(eval_or(or, has_tag))
}

fn eval_or(pair: Pair<'_, Rule>, has_tag: &dyn Fn(&str) -> bool) -> bool {
    children(pair, Rule::build_and).any(|and| eval_and(and, has_tag))
}

fn eval_and(pair: Pair<'_, Rule>, has_tag: &dyn Fn(&str) -> bool) -> bool {
    children(pair, Rule::build_not).all(|not| eval_not(not, has_tag))
}

fn eval_not(pair: Pair<'_, Rule>, has_tag: &dyn Fn(&str) -> bool) -> bool {
    let mut negate = false;
    let mut value = false;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::negation => negate = !negate,
            Rule::build_tag => value = has_tag(child.as_str()),
            Rule::build_or => value = eval_or(child, has_tag),
            _ => {}
        }
    }
    value != negate
}

fn parse_rule(rule: Rule, src: &str) -> Result<Pair<'_, Rule>, ParseError> {
    let mut pairs = GoParser::parse(rule, src).map_err(syntax_error)?;
    pairs
        .next()
        .ok_or_else(|| ParseError::syntax(1, "empty parse tree"))
}

fn syntax_error(err: Error<Rule>) -> ParseError {
    let err = err.renamed_rules(describe_rule);
    let line = match err.line_col {
        LineColLocation::Pos((line, _)) | LineColLocation::Span((line, _), _) => line,
    };
    ParseError::syntax(line, err.variant.message())
}

fn describe_rule(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of file".to_string(),
        Rule::ident => "identifier".to_string(),
        Rule::string_lit => "string literal".to_string(),
        Rule::type_expr | Rule::type_name => "type".to_string(),
        other => format!("{other:?}").replace('_', " "),
    }
}

fn line_of(pair: &Pair<'_, Rule>) -> usize {
    pair.as_span().start_pos().line_col().0
}

fn children<'i>(pair: Pair<'i, Rule>, rule: Rule) -> impl Iterator<Item = Pair<'i, Rule>> {
    pair.into_inner().filter(move |child| child.as_rule() == rule)
}

fn required<T>(value: Option<T>, line: usize, what: &str) -> Result<T, ParseError> {
    value.ok_or_else(|| ParseError::syntax(line, format!("missing {what}")))
}

fn first_ident(pair: Pair<'_, Rule>) -> Result<String, ParseError> {
    let line = line_of(&pair);
    let ident = required(children(pair, Rule::ident).next(), line, "identifier")?;
    Ok(ident.as_str().to_string())
}

fn idents(pair: Pair<'_, Rule>) -> Vec<String> {
    children(pair, Rule::ident)
        .map(|ident| ident.as_str().to_string())
        .collect()
}

fn string_value(pair: Pair<'_, Rule>) -> Result<String, ParseError> {
    let text = pair.as_str();
    let value = if text.starts_with('`') {
        unquote_raw(text)
    } else {
        unquote(text)
    };
    value.ok_or_else(|| ParseError::syntax(line_of(&pair), format!("invalid string {text}")))
}

fn import_spec(pair: Pair<'_, Rule>) -> Result<ImportSpec, ParseError> {
    let line = line_of(&pair);
    let mut name = None;
    let mut path = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::import_name => name = Some(child.as_str().to_string()),
            Rule::string_lit => path = Some(string_value(child)?),
            _ => {}
        }
    }
    Ok(ImportSpec {
        name,
        path: required(path, line, "import path")?,
    })
}

fn type_spec(pair: Pair<'_, Rule>) -> Result<TypeDecl, ParseError> {
    let line = line_of(&pair);
    let mut name = None;
    let mut type_params = Vec::new();
    let mut alias = false;
    let mut ty = None;

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = Some(child.as_str().to_string()),
            Rule::type_params => type_params = type_param_list(child)?,
            Rule::alias => alias = true,
            Rule::type_expr => ty = Some(type_expr(child)?),
            _ => {}
        }
    }

    Ok(TypeDecl {
        name: required(name, line, "type name")?,
        type_params,
        alias,
        ty: required(ty, line, "type")?,
        line,
    })
}

fn type_param_list(pair: Pair<'_, Rule>) -> Result<Vec<TypeParamDecl>, ParseError> {
    let mut params = Vec::new();
    for param in children(pair, Rule::type_param) {
        let line = line_of(&param);
        let mut names = Vec::new();
        let mut constraint = None;
        for child in param.into_inner() {
            match child.as_rule() {
                Rule::ident_list => names = idents(child),
                Rule::constraint => constraint = Some(constraint_type(child)?),
                _ => {}
            }
        }
        let constraint = required(constraint, line, "type parameter constraint")?;
        params.extend(names.into_iter().map(|name| TypeParamDecl {
            name,
            constraint: constraint.clone(),
        }));
    }
    Ok(params)
}

/// A lone non-tilde term is the constraint itself; anything else is an
/// implicit interface holding the union.
fn constraint_type(pair: Pair<'_, Rule>) -> Result<TypeExpr, ParseError> {
    let mut terms = term_list(pair)?;
    if terms.len() == 1 && !terms[0].tilde {
        if let Some(term) = terms.pop() {
            return Ok(term.ty);
        }
    }
    Ok(TypeExpr::Interface(vec![InterfaceElemExpr::Union(terms)]))
}

fn term_list(pair: Pair<'_, Rule>) -> Result<Vec<TermExpr>, ParseError> {
    children(pair, Rule::term).map(term).collect()
}

fn term(pair: Pair<'_, Rule>) -> Result<TermExpr, ParseError> {
    let line = line_of(&pair);
    let mut tilde = false;
    let mut ty = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::tilde => tilde = true,
            Rule::type_expr => ty = Some(type_expr(child)?),
            _ => {}
        }
    }
    Ok(TermExpr {
        tilde,
        ty: required(ty, line, "type")?,
    })
}

fn type_expr(pair: Pair<'_, Rule>) -> Result<TypeExpr, ParseError> {
    let line = line_of(&pair);
    let inner = required(pair.into_inner().next(), line, "type")?;

    match inner.as_rule() {
        Rule::paren_type => first_type(inner),
        Rule::pointer_type => Ok(TypeExpr::Pointer(Box::new(first_type(inner)?))),
        Rule::slice_type => Ok(TypeExpr::Slice(Box::new(first_type(inner)?))),
        Rule::array_type => array_type(inner),
        Rule::map_type => {
            let mut types = type_list(inner)?.into_iter();
            match (types.next(), types.next()) {
                (Some(key), Some(value)) => Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }),
                _ => Err(ParseError::syntax(line, "malformed map type")),
            }
        }
        Rule::chan_type => chan_type(inner),
        Rule::func_type => {
            let sig = required(children(inner, Rule::signature).next(), line, "signature")?;
            Ok(TypeExpr::Func(signature(sig)?))
        }
        Rule::struct_type => children(inner, Rule::field_decl)
            .map(field_decl)
            .collect::<Result<Vec<_>, _>>()
            .map(TypeExpr::Struct),
        Rule::interface_type => interface_type(inner),
        Rule::type_name => type_name(inner),
        other => Err(ParseError::syntax(line, format!("unexpected {other:?} in type"))),
    }
}

fn type_list(pair: Pair<'_, Rule>) -> Result<Vec<TypeExpr>, ParseError> {
    children(pair, Rule::type_expr).map(type_expr).collect()
}

fn first_type(pair: Pair<'_, Rule>) -> Result<TypeExpr, ParseError> {
    let line = line_of(&pair);
    type_expr(required(children(pair, Rule::type_expr).next(), line, "type")?)
}

fn array_type(pair: Pair<'_, Rule>) -> Result<TypeExpr, ParseError> {
    let line = line_of(&pair);
    let mut len = None;
    let mut elem = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::array_len => len = Some(child.as_str().split_whitespace().collect::<String>()),
            Rule::type_expr => elem = Some(type_expr(child)?),
            _ => {}
        }
    }
    Ok(TypeExpr::Array {
        len: required(len, line, "array length")?,
        elem: Box::new(required(elem, line, "array element type")?),
    })
}

fn chan_type(pair: Pair<'_, Rule>) -> Result<TypeExpr, ParseError> {
    let line = line_of(&pair);
    let mut dir = ChanDir::Both;
    let mut elem = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::recv_arrow => dir = ChanDir::Recv,
            Rule::send_arrow => dir = ChanDir::Send,
            Rule::type_expr => elem = Some(type_expr(child)?),
            _ => {}
        }
    }
    Ok(TypeExpr::Chan {
        dir,
        elem: Box::new(required(elem, line, "channel element type")?),
    })
}

fn type_name(pair: Pair<'_, Rule>) -> Result<TypeExpr, ParseError> {
    let line = line_of(&pair);
    let mut parts = Vec::with_capacity(2);
    let mut args = Vec::new();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => parts.push(child.as_str().to_string()),
            Rule::type_args => args = type_list(child)?,
            _ => {}
        }
    }

    let mut parts = parts.into_iter();
    let (qualifier, name) = match (parts.next(), parts.next()) {
        (Some(qualifier), Some(name)) => (Some(qualifier), name),
        (Some(name), None) => (None, name),
        _ => return Err(ParseError::syntax(line, "missing type name")),
    };

    Ok(TypeExpr::Name {
        qualifier,
        name,
        args,
    })
}

fn field_decl(pair: Pair<'_, Rule>) -> Result<FieldDecl, ParseError> {
    let line = line_of(&pair);
    let mut field = None;
    let mut embedded = false;
    let mut tag = None;

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::named_field => field = Some(named_field(child)?),
            Rule::embedded_field => {
                field = Some(embedded_field(child)?);
                embedded = true;
            }
            Rule::tag => {
                tag = children(child, Rule::string_lit)
                    .next()
                    .map(string_value)
                    .transpose()?;
            }
            _ => {}
        }
    }

    let (names, ty) = required(field, line, "field")?;
    Ok(FieldDecl {
        names,
        ty,
        tag,
        embedded,
        line,
    })
}

fn named_field(pair: Pair<'_, Rule>) -> Result<(Vec<String>, TypeExpr), ParseError> {
    let line = line_of(&pair);
    let mut names = Vec::new();
    let mut ty = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident_list => names = idents(child),
            Rule::type_expr => ty = Some(type_expr(child)?),
            _ => {}
        }
    }
    Ok((names, required(ty, line, "field type")?))
}

fn embedded_field(pair: Pair<'_, Rule>) -> Result<(Vec<String>, TypeExpr), ParseError> {
    let line = line_of(&pair);
    let mut pointer = false;
    let mut ty = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::pointer_mark => pointer = true,
            Rule::type_name => ty = Some(type_name(child)?),
            _ => {}
        }
    }

    let mut ty = required(ty, line, "embedded type")?;
    if pointer {
        ty = TypeExpr::Pointer(Box::new(ty));
    }
    let name = ty
        .embedded_name()
        .ok_or_else(|| ParseError::syntax(line, "invalid embedded field"))?
        .to_string();
    Ok((vec![name], ty))
}

fn interface_type(pair: Pair<'_, Rule>) -> Result<TypeExpr, ParseError> {
    let mut elems = Vec::new();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::method_spec => elems.push(method_spec(child)?),
            Rule::union_elem => elems.push(InterfaceElemExpr::Union(term_list(child)?)),
            _ => {}
        }
    }
    Ok(TypeExpr::Interface(elems))
}

fn method_spec(pair: Pair<'_, Rule>) -> Result<InterfaceElemExpr, ParseError> {
    let line = line_of(&pair);
    let mut name = None;
    let mut sig = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = Some(child.as_str().to_string()),
            Rule::signature => sig = Some(signature(child)?),
            _ => {}
        }
    }
    Ok(InterfaceElemExpr::Method {
        name: required(name, line, "method name")?,
        sig: required(sig, line, "method signature")?,
    })
}

fn signature(pair: Pair<'_, Rule>) -> Result<FuncExpr, ParseError> {
    let line = line_of(&pair);
    let mut params = None;
    let mut results = Vec::new();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::params => params = Some(param_list(child)?),
            Rule::result => results = result_list(child)?,
            _ => {}
        }
    }

    let (params, variadic) = required(params, line, "parameter list")?;
    Ok(FuncExpr {
        params,
        results,
        variadic,
    })
}

fn result_list(pair: Pair<'_, Rule>) -> Result<Vec<ParamDecl>, ParseError> {
    let line = line_of(&pair);
    let inner = required(pair.into_inner().next(), line, "result")?;
    match inner.as_rule() {
        Rule::params => Ok(param_list(inner)?.0),
        _ => Ok(vec![ParamDecl {
            name: None,
            ty: type_expr(inner)?,
        }]),
    }
}

fn param_list(pair: Pair<'_, Rule>) -> Result<(Vec<ParamDecl>, bool), ParseError> {
    let line = line_of(&pair);
    let mut entries: Vec<(Option<String>, TypeExpr)> = Vec::new();
    let mut variadic = false;

    for param in children(pair, Rule::param) {
        let param_line = line_of(&param);
        let mut name = None;
        let mut ty = None;
        for child in param.into_inner() {
            match child.as_rule() {
                Rule::ident => name = Some(child.as_str().to_string()),
                Rule::variadic => variadic = true,
                Rule::type_expr => ty = Some(type_expr(child)?),
                _ => {}
            }
        }
        entries.push((name, required(ty, param_line, "parameter type")?));
    }

    if entries.iter().all(|(name, _)| name.is_none()) {
        let params = entries
            .into_iter()
            .map(|(_, ty)| ParamDecl { name: None, ty })
            .collect();
        return Ok((params, variadic));
    }

    // `a, b int`: leading bare names share the type of the next named entry.
    let mut params = Vec::with_capacity(entries.len());
    let mut pending = Vec::new();
    for (name, ty) in entries {
        match name {
            Some(name) => {
                for pending_name in pending.drain(..) {
                    params.push(ParamDecl {
                        name: Some(pending_name),
                        ty: ty.clone(),
                    });
                }
                params.push(ParamDecl {
                    name: Some(name),
                    ty,
                });
            }
            None => match ty.as_bare_name() {
                Some(bare) => pending.push(bare.to_string()),
                None => {
                    return Err(ParseError::syntax(line, "mixed named and unnamed parameters"));
                }
            },
        }
    }
    if !pending.is_empty() {
        return Err(ParseError::syntax(line, "missing parameter type"));
    }

    Ok((params, variadic))
}
