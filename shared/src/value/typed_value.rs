use std::collections::BTreeSet;

use uiclass_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, Serde, SerdeErr, SignedVariableInteger,
    UnsignedVariableInteger,
};

/// An RGBA color, 8 bits per channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angle {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Angle {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// A location paired with an orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub vector: Vector,
    pub angle: Angle,
}

impl Position {
    pub fn new(vector: Vector, angle: Angle) -> Self {
        Self { vector, angle }
    }
}

/// Reference to an engine entity or player session, by its network index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityRef(u64);

impl EntityRef {
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u64 {
        self.0
    }
}

/// A dynamically typed field value.
///
/// `Nil` and `List` only appear as raw setter input; the coercion library
/// never produces them.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Number(f64),
    String(String),
    Color(Color),
    Vector(Vector),
    Angle(Angle),
    Position(Position),
    Entity(EntityRef),
    Set(BTreeSet<String>),
    List(Vec<TypedValue>),
}

impl TypedValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Nil => "nil",
            TypedValue::Bool(_) => "bool",
            TypedValue::Int(_) => "int",
            TypedValue::UInt(_) => "uint",
            TypedValue::Number(_) => "number",
            TypedValue::String(_) => "string",
            TypedValue::Color(_) => "color",
            TypedValue::Vector(_) => "vector",
            TypedValue::Angle(_) => "angle",
            TypedValue::Position(_) => "position",
            TypedValue::Entity(_) => "entity",
            TypedValue::Set(_) => "set",
            TypedValue::List(_) => "list",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view of any number-like variant
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedValue::Number(value) => Some(*value),
            TypedValue::Int(value) => Some(*value as f64),
            TypedValue::UInt(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            TypedValue::Color(value) => Some(*value),
            _ => None,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            TypedValue::Nil => 0,
            TypedValue::Bool(_) => 1,
            TypedValue::Int(_) => 2,
            TypedValue::UInt(_) => 3,
            TypedValue::Number(_) => 4,
            TypedValue::String(_) => 5,
            TypedValue::Color(_) => 6,
            TypedValue::Vector(_) => 7,
            TypedValue::Angle(_) => 8,
            TypedValue::Position(_) => 9,
            TypedValue::Entity(_) => 10,
            TypedValue::Set(_) => 11,
            TypedValue::List(_) => 12,
        }
    }

    fn ser_payload(&self, writer: &mut dyn BitWrite) {
        match self {
            TypedValue::Nil => {}
            TypedValue::Bool(value) => value.ser(writer),
            TypedValue::Int(value) => SignedVariableInteger::<7>::new(*value).ser(writer),
            TypedValue::UInt(value) => UnsignedVariableInteger::<7>::new(*value).ser(writer),
            TypedValue::Number(value) => value.ser(writer),
            TypedValue::String(value) => value.ser(writer),
            TypedValue::Color(color) => {
                for channel in [color.r, color.g, color.b, color.a] {
                    channel.ser(writer);
                }
            }
            TypedValue::Vector(vector) => write_vector(vector, writer),
            TypedValue::Angle(angle) => write_angle(angle, writer),
            TypedValue::Position(position) => {
                write_vector(&position.vector, writer);
                write_angle(&position.angle, writer);
            }
            TypedValue::Entity(entity) => UnsignedVariableInteger::<7>::new(entity.0).ser(writer),
            TypedValue::Set(keys) => {
                UnsignedVariableInteger::<7>::new(keys.len() as u64).ser(writer);
                for key in keys {
                    key.ser(writer);
                }
            }
            TypedValue::List(items) => {
                UnsignedVariableInteger::<7>::new(items.len() as u64).ser(writer);
                for item in items {
                    item.ser(writer);
                }
            }
        }
    }

    fn de_payload(tag: u8, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value = match tag {
            0 => TypedValue::Nil,
            1 => TypedValue::Bool(bool::de(reader)?),
            2 => TypedValue::Int(SignedVariableInteger::<7>::de(reader)?.try_to()?),
            3 => TypedValue::UInt(UnsignedVariableInteger::<7>::de(reader)?.try_to()?),
            4 => TypedValue::Number(f64::de(reader)?),
            5 => TypedValue::String(String::de(reader)?),
            6 => TypedValue::Color(Color {
                r: u8::de(reader)?,
                g: u8::de(reader)?,
                b: u8::de(reader)?,
                a: u8::de(reader)?,
            }),
            7 => TypedValue::Vector(read_vector(reader)?),
            8 => TypedValue::Angle(read_angle(reader)?),
            9 => TypedValue::Position(Position {
                vector: read_vector(reader)?,
                angle: read_angle(reader)?,
            }),
            10 => TypedValue::Entity(EntityRef(
                UnsignedVariableInteger::<7>::de(reader)?.try_to()?,
            )),
            11 => {
                let length = read_count(reader)?;
                let mut keys = BTreeSet::new();
                for _ in 0..length {
                    keys.insert(String::de(reader)?);
                }
                TypedValue::Set(keys)
            }
            12 => {
                let length = read_count(reader)?;
                let mut items = Vec::with_capacity(length);
                for _ in 0..length {
                    items.push(TypedValue::de(reader)?);
                }
                TypedValue::List(items)
            }
            tag => {
                return Err(SerdeErr::UnknownTag {
                    type_name: "TypedValue",
                    tag,
                })
            }
        };
        Ok(value)
    }

    /// Reads one tag + length-prefixed value.
    ///
    /// The outer error means the stream itself is broken. The inner error
    /// means this value could not be decoded (e.g. a tag from a newer build),
    /// but the reader has already been moved past it.
    pub fn read_framed(reader: &mut BitReader) -> Result<Result<Self, SerdeErr>, SerdeErr> {
        let tag = u8::de(reader)?;
        let payload_bits: u32 = UnsignedVariableInteger::<7>::de(reader)?.try_to()?;
        if payload_bits > reader.bits_remaining() {
            return Err(SerdeErr::UnexpectedEnd);
        }

        let mut payload = BitWriter::new();
        for _ in 0..payload_bits {
            payload.write_bit(reader.read_bit()?);
        }
        let payload = payload.to_bytes();

        let mut payload_reader = BitReader::new(&payload);
        Ok(Self::de_payload(tag, &mut payload_reader))
    }
}

impl Serde for TypedValue {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.tag().ser(writer);

        let mut counter = BitCounter::new();
        self.ser_payload(&mut counter);
        UnsignedVariableInteger::<7>::new(counter.bits_needed()).ser(writer);

        self.ser_payload(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Self::read_framed(reader)?
    }
}

fn read_count(reader: &mut BitReader) -> Result<usize, SerdeErr> {
    let count: usize = UnsignedVariableInteger::<7>::de(reader)?.try_to()?;
    if count > reader.bits_remaining() as usize {
        return Err(SerdeErr::UnexpectedEnd);
    }
    Ok(count)
}

fn write_vector(vector: &Vector, writer: &mut dyn BitWrite) {
    vector.x.ser(writer);
    vector.y.ser(writer);
    vector.z.ser(writer);
}

fn read_vector(reader: &mut BitReader) -> Result<Vector, SerdeErr> {
    Ok(Vector::new(f32::de(reader)?, f32::de(reader)?, f32::de(reader)?))
}

fn write_angle(angle: &Angle, writer: &mut dyn BitWrite) {
    angle.pitch.ser(writer);
    angle.yaw.ser(writer);
    angle.roll.ser(writer);
}

fn read_angle(reader: &mut BitReader) -> Result<Angle, SerdeErr> {
    Ok(Angle::new(f32::de(reader)?, f32::de(reader)?, f32::de(reader)?))
}

// Conversions

macro_rules! impl_from {
    ($($type:ty => $variant:ident),* $(,)?) => {$(
        impl From<$type> for TypedValue {
            fn from(value: $type) -> Self {
                TypedValue::$variant(value.into())
            }
        }
    )*};
}

impl_from!(
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => UInt,
    u64 => UInt,
    f32 => Number,
    f64 => Number,
    String => String,
    Color => Color,
    Vector => Vector,
    Angle => Angle,
    Position => Position,
    EntityRef => Entity,
    Vec<TypedValue> => List,
);

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

/// Builds a raw argument list for a setter, e.g. `args![255, 0, 0]`
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::TypedValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::TypedValue::from($value)),+]
    };
}
