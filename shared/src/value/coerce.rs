//! Built-in coercions that normalize raw setter arguments into canonical
//! values.
//!
//! Every function returns `None` when the input can't be coerced, and hands
//! already-canonical input back unchanged, so applying a coercion to its own
//! output is a no-op.

use std::collections::BTreeSet;

use super::typed_value::{Angle, Color, EntityRef, Position, TypedValue, Vector};

pub fn string(args: &[TypedValue]) -> Option<TypedValue> {
    stringify(args.first()?).map(TypedValue::String)
}

pub fn number(args: &[TypedValue]) -> Option<TypedValue> {
    let value = match args.first()? {
        TypedValue::String(text) => text.trim().parse::<f64>().ok()?,
        other => other.as_number()?,
    };
    value.is_finite().then_some(TypedValue::Number(value))
}

pub fn boolean(args: &[TypedValue]) -> Option<TypedValue> {
    let value = match args.first()? {
        TypedValue::Bool(value) => *value,
        TypedValue::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" | "" => false,
            _ => return None,
        },
        other => {
            let number = other.as_number()?;
            if number.is_nan() {
                return None;
            }
            number != 0.0
        }
    };
    Some(TypedValue::Bool(value))
}

/// Builds a sorted, de-duplicated key set from a list or from varargs
pub fn set(args: &[TypedValue]) -> Option<TypedValue> {
    match args {
        [TypedValue::Set(keys)] => return Some(TypedValue::Set(keys.clone())),
        [TypedValue::List(items)] => return set(items),
        _ => {}
    }

    let mut keys = BTreeSet::new();
    for arg in args {
        keys.insert(stringify(arg)?);
    }
    Some(TypedValue::Set(keys))
}

/// Accepts `(r, g, b[, a])`, a list of the same, or a `#rrggbb[aa]` string
pub fn color(args: &[TypedValue]) -> Option<TypedValue> {
    match args {
        [TypedValue::Color(color)] => return Some(TypedValue::Color(*color)),
        [TypedValue::List(items)] => return color(items),
        [TypedValue::String(text)] => return parse_hex_color(text).map(TypedValue::Color),
        _ => {}
    }

    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let mut channels = [255u8; 4];
    for (channel, arg) in channels.iter_mut().zip(args) {
        let number = arg.as_number()?;
        if number.is_nan() {
            return None;
        }
        *channel = number.round().clamp(0.0, 255.0) as u8;
    }
    let [r, g, b, a] = channels;
    Some(TypedValue::Color(Color::rgba(r, g, b, a)))
}

pub fn vector(args: &[TypedValue]) -> Option<TypedValue> {
    match args {
        [TypedValue::Vector(vector)] => Some(TypedValue::Vector(*vector)),
        [TypedValue::List(items)] => vector(items),
        _ => {
            let [x, y, z] = components(args)?;
            Some(TypedValue::Vector(Vector::new(x, y, z)))
        }
    }
}

pub fn angle(args: &[TypedValue]) -> Option<TypedValue> {
    match args {
        [TypedValue::Angle(angle)] => Some(TypedValue::Angle(*angle)),
        [TypedValue::List(items)] => angle(items),
        _ => {
            let [pitch, yaw, roll] = components(args)?;
            Some(TypedValue::Angle(Angle::new(pitch, yaw, roll)))
        }
    }
}

/// A vector and an angle in either order. A missing half is zeroed.
pub fn position(args: &[TypedValue]) -> Option<TypedValue> {
    match args {
        [TypedValue::Position(position)] => return Some(TypedValue::Position(*position)),
        [TypedValue::List(items)] => return position(items),
        _ => {}
    }
    if args.len() > 2 {
        return None;
    }

    let mut vector = None;
    let mut angle = None;
    for arg in args {
        match arg {
            TypedValue::Vector(value) if vector.is_none() => vector = Some(*value),
            TypedValue::Angle(value) if angle.is_none() => angle = Some(*value),
            _ => return None,
        }
    }
    Some(TypedValue::Position(Position::new(
        vector.unwrap_or_default(),
        angle.unwrap_or_default(),
    )))
}

pub fn entity(args: &[TypedValue]) -> Option<TypedValue> {
    let index = match args.first()? {
        TypedValue::Entity(entity) => return Some(TypedValue::Entity(*entity)),
        TypedValue::Int(value) => u64::try_from(*value).ok()?,
        TypedValue::UInt(value) => *value,
        TypedValue::Number(value) => {
            if !value.is_finite() || value.fract() != 0.0 || *value < 0.0 || *value > u64::MAX as f64 {
                return None;
            }
            *value as u64
        }
        _ => return None,
    };
    Some(TypedValue::Entity(EntityRef::new(index)))
}

fn stringify(value: &TypedValue) -> Option<String> {
    match value {
        TypedValue::String(text) => Some(text.clone()),
        TypedValue::Bool(value) => Some(value.to_string()),
        TypedValue::Int(value) => Some(value.to_string()),
        TypedValue::UInt(value) => Some(value.to_string()),
        TypedValue::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn components(args: &[TypedValue]) -> Option<[f32; 3]> {
    if args.len() > 3 {
        return None;
    }
    let mut output = [0.0f32; 3];
    for (component, arg) in output.iter_mut().zip(args) {
        let value = arg.as_number()? as f32;
        if !value.is_finite() {
            return None;
        }
        *component = value;
    }
    Some(output)
}

fn parse_hex_color(text: &str) -> Option<Color> {
    let digits = text.trim().strip_prefix('#')?;
    if (digits.len() != 6 && digits.len() != 8) || !digits.is_ascii() {
        return None;
    }
    let channel = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16).ok();
    let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
    Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}
