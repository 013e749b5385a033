// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Record tokenizer using nom combinators
//!
//! Parses one `#<id> = TYPE(params);` record into a [`StepEntity`].
//! Parameter lists nest arbitrarily; quoted strings may contain
//! parentheses and escaped quotes and are never interpreted structurally.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult, Parser,
};
use panelcam_model::{AttrValue, EntityId, StepEntity, StepType};

/// Parse whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    Ok((input, ()))
}

/// Parse an entity reference (`#123`)
fn entity_ref(input: &str) -> IResult<&str, AttrValue> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = take_while1(|c: char| c.is_ascii_digit())(input)?;
    let id = digits.parse::<u32>().unwrap_or(0);
    Ok((input, AttrValue::EntityRef(EntityId(id))))
}

/// Parse a STEP string (`'text'` with `''` for escaped quotes)
fn step_string(input: &str) -> IResult<&str, AttrValue> {
    let (input, _) = char('\'')(input)?;

    let mut end = 0;
    let bytes = input.as_bytes();
    while end < bytes.len() {
        if bytes[end] == b'\'' {
            if end + 1 < bytes.len() && bytes[end + 1] == b'\'' {
                end += 2;
                continue;
            }
            break;
        }
        end += 1;
    }

    let content = input[..end].replace("''", "'");
    let remaining = &input[end + 1..];

    Ok((remaining, AttrValue::String(content)))
}

/// Parse a number (integer or real, optional exponent)
fn number(input: &str) -> IResult<&str, AttrValue> {
    let (input, num_str) = recognize((
        opt(alt((char('-'), char('+')))),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))
    .parse(input)?;

    if num_str.contains('.') || num_str.contains('e') || num_str.contains('E') {
        let f: f64 = lexical_core::parse(num_str.as_bytes()).unwrap_or(0.0);
        Ok((input, AttrValue::Float(f)))
    } else {
        let i: i64 = lexical_core::parse(num_str.as_bytes()).unwrap_or(0);
        Ok((input, AttrValue::Integer(i)))
    }
}

/// Parse an enumeration (`.VALUE.`)
fn enumeration(input: &str) -> IResult<&str, AttrValue> {
    let (input, _) = char('.')(input)?;
    let (input, name) = take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)?;
    let (input, _) = char('.')(input)?;
    Ok((input, AttrValue::Enum(name.to_string())))
}

/// Parse null (`$`)
fn null_value(input: &str) -> IResult<&str, AttrValue> {
    let (input, _) = char('$')(input)?;
    Ok((input, AttrValue::Null))
}

/// Parse derived (`*`)
fn derived_value(input: &str) -> IResult<&str, AttrValue> {
    let (input, _) = char('*')(input)?;
    Ok((input, AttrValue::Derived))
}

/// Parse a parenthesized list of values
fn list(input: &str) -> IResult<&str, AttrValue> {
    let (input, items) = delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), value),
        pair(ws, char(')')),
    )
    .parse(input)?;
    Ok((input, AttrValue::List(items)))
}

/// Parse any parameter value
fn value(input: &str) -> IResult<&str, AttrValue> {
    alt((
        entity_ref,
        step_string,
        null_value,
        derived_value,
        enumeration,
        number,
        list,
    ))
    .parse(input)
}

/// Parse a record's parameter list
fn param_list(input: &str) -> IResult<&str, Vec<AttrValue>> {
    delimited(
        pair(char('('), ws),
        separated_list0((ws, char(','), ws), value),
        pair(ws, char(')')),
    )
    .parse(input)
}

/// Parse a complete record
///
/// Format: `#123 = CARTESIAN_POINT('',(0.,0.,0.));`
pub fn parse_record(input: &str) -> Result<StepEntity, String> {
    let input = input.trim_start();

    let (input, _) = char::<&str, nom::error::Error<&str>>('#')
        .parse(input)
        .map_err(|_| "expected # at start of record")?;

    let (input, id_str) =
        take_while1::<_, &str, nom::error::Error<&str>>(|c: char| c.is_ascii_digit())
            .parse(input)
            .map_err(|_| "expected record id")?;

    let id: u32 = id_str.parse().map_err(|_| "invalid record id")?;

    let (input, _) = (ws, char('='), ws)
        .parse(input)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| "expected = after record id")?;

    let (input, type_tag) = take_while1::<_, &str, nom::error::Error<&str>>(|c: char| {
        c.is_ascii_alphanumeric() || c == '_'
    })
    .parse(input)
    .map_err(|_| "expected type tag")?;

    let (input, _) = ws(input).unwrap_or((input, ()));

    let (_, attrs) =
        param_list(input).map_err(|e| format!("failed to parse parameters: {e:?}"))?;

    Ok(StepEntity {
        id: EntityId(id),
        step_type: StepType::parse(type_tag),
        attrs,
    })
}

/// Parse a record from raw content at the given byte range
pub fn parse_record_at(content: &str, start: usize, end: usize) -> Result<StepEntity, String> {
    parse_record(&content[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity_ref() {
        let (remaining, v) = entity_ref("#123").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(v, AttrValue::EntityRef(EntityId(123)));
    }

    #[test]
    fn test_parse_string_with_escaped_quote() {
        let (remaining, v) = step_string("'it''s a shelf'").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(v, AttrValue::String("it's a shelf".to_string()));
    }

    #[test]
    fn test_parse_number_trailing_dot() {
        // STEP reals are commonly written as `500.`
        let (_, v) = number("500.").unwrap();
        assert_eq!(v, AttrValue::Float(500.0));
    }

    #[test]
    fn test_parse_number_scientific() {
        let (_, v) = number("1.5E-3").unwrap();
        if let AttrValue::Float(f) = v {
            assert!((f - 0.0015).abs() < 1e-12);
        } else {
            panic!("expected float");
        }
    }

    #[test]
    fn test_parse_nested_list() {
        let (_, v) = list("((1., 2.), (3., 4.))").unwrap();
        let items = v.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_record() {
        let entity = parse_record("#5 = CIRCLE('',#4,4.);").unwrap();
        assert_eq!(entity.id, EntityId(5));
        assert_eq!(entity.step_type, StepType::Circle);
        assert_eq!(entity.attrs.len(), 3);
        assert_eq!(entity.get_ref(1), Some(EntityId(4)));
        assert_eq!(entity.get_float(2), Some(4.0));
    }

    #[test]
    fn test_parse_record_multiline() {
        let entity = parse_record("#7 = ADVANCED_FACE('',(#8,\n  #9),\n  #12,.T.);").unwrap();
        assert_eq!(entity.step_type, StepType::AdvancedFace);
        assert_eq!(entity.all_refs(), vec![EntityId(8), EntityId(9), EntityId(12)]);
    }

    #[test]
    fn test_parse_cartesian_point() {
        let entity = parse_record("#2=CARTESIAN_POINT('',(500.,300.,18.));").unwrap();
        let coords = entity.get_list(1).unwrap();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0].as_float(), Some(500.0));
    }
}
