use crate::{
    bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength,
};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

// This outer generic type wraps an inner type that is not generic, to reduce code bloat through monomorphization.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    inner: SerdeIntegerInner,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct SerdeIntegerInner {
    inner_value: i128,
    signed: bool,
    variable: bool,
    bits: u8,
}

impl SerdeIntegerInner {
    fn try_new(signed: bool, variable: bool, bits: u8, value: i128) -> Result<Self, SerdeErr> {
        if bits == 0 || bits > 127 {
            return Err(SerdeErr::OutOfRange {
                type_name: "SerdeInteger bit width",
            });
        }

        if !signed && value < 0 {
            return Err(SerdeErr::OutOfRange {
                type_name: "unsigned SerdeInteger",
            });
        }

        if !variable {
            let max_value: i128 = 2_i128.pow(u32::from(bits));
            if value >= max_value || (signed && value <= -max_value) {
                return Err(SerdeErr::OutOfRange {
                    type_name: "fixed-width SerdeInteger",
                });
            }
        }

        Ok(Self::new_unchecked(signed, variable, bits, value))
    }

    fn new_unchecked(signed: bool, variable: bool, bits: u8, value: i128) -> Self {
        Self {
            inner_value: value,
            signed,
            variable,
            bits,
        }
    }

    fn get(&self) -> i128 {
        self.inner_value
    }

    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value: u128 = self.inner_value.unsigned_abs();

        if self.signed {
            writer.write_bit(self.inner_value < 0);
        }

        if self.variable {
            loop {
                let proceed = value >= 2_u128.pow(u32::from(self.bits));
                writer.write_bit(proceed);
                for _ in 0..self.bits {
                    writer.write_bit(value & 1 != 0);
                    value >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        } else {
            for _ in 0..self.bits {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader, signed: bool, variable: bool, bits: u8) -> Result<Self, SerdeErr> {
        let mut negative = false;
        if signed {
            negative = reader.read_bit()?;
        }

        let mut total_bits: u32 = 0;
        let mut output: u128 = 0;

        loop {
            let proceed = if variable { reader.read_bit()? } else { false };

            for _ in 0..bits {
                // a malicious stream could keep the proceed bit set forever
                if total_bits >= 127 {
                    return Err(SerdeErr::OutOfRange {
                        type_name: "variable SerdeInteger",
                    });
                }
                if reader.read_bit()? {
                    output |= 1u128 << total_bits;
                }
                total_bits += 1;
            }

            if !proceed {
                break;
            }
        }

        let value = output as i128;
        let value = if negative { -value } else { value };
        Ok(Self::new_unchecked(signed, variable, bits, value))
    }

    fn bit_length(&self) -> u32 {
        let mut output: u32 = 0;

        if self.signed {
            output += 1;
        }

        if self.variable {
            let mut value = self.inner_value.unsigned_abs();
            loop {
                let proceed = value >= 2_u128.pow(u32::from(self.bits));
                output += 1 + u32::from(self.bits);
                value >>= self.bits;
                if !proceed {
                    break;
                }
            }
        } else {
            output += u32::from(self.bits);
        }
        output
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    /// Creates a new integer, checking it fits the encoding
    pub fn try_new<T: Into<i128>>(value: T) -> Result<Self, SerdeErr> {
        Ok(Self {
            inner: SerdeIntegerInner::try_new(SIGNED, VARIABLE, BITS, value.into())?,
        })
    }

    /// Creates a new integer
    ///
    /// # Panics
    ///
    /// Panics if the value can't be represented by this encoding, e.g. a
    /// negative value in an unsigned integer.
    pub fn new<T: Into<i128>>(value: T) -> Self {
        match Self::try_new(value) {
            Ok(integer) => integer,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn get(&self) -> i128 {
        self.inner.get()
    }

    /// Converts into a concrete integer type, failing if it is out of range
    pub fn try_to<T: TryFrom<i128>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.inner.get()).map_err(|_| SerdeErr::OutOfRange {
            type_name: std::any::type_name::<T>(),
        })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<SIGNED, VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = SerdeIntegerInner::de(reader, SIGNED, VARIABLE, BITS)?;
        Ok(Self { inner })
    }

    fn bit_length(&self) -> u32 {
        self.inner.bit_length()
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        let mut output: u32 = 0;
        if SIGNED {
            output += 1;
        }
        output + u32::from(BITS)
    }
}

// Tests
