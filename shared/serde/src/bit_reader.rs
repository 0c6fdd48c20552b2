use crate::error::SerdeErr;

/// Reads bits back out of a buffer produced by `BitWriter`
pub struct BitReader<'b> {
    buffer: &'b [u8],
    buffer_index: usize,
    scratch: u8,
    scratch_index: u8,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            buffer_index: 0,
            scratch: 0,
            scratch_index: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.scratch_index == 0 {
            let Some(byte) = self.buffer.get(self.buffer_index) else {
                return Err(SerdeErr::UnexpectedEnd);
            };
            self.scratch = *byte;
            self.buffer_index += 1;
            self.scratch_index = 8;
        }

        let value = self.scratch & 1;
        self.scratch >>= 1;
        self.scratch_index -= 1;

        Ok(value != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0;
        for index in 0..8 {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }

    /// Advances past `bits` bits without interpreting them
    pub fn skip_bits(&mut self, bits: u32) -> Result<(), SerdeErr> {
        if bits > self.bits_remaining() {
            return Err(SerdeErr::UnexpectedEnd);
        }
        for _ in 0..bits {
            self.read_bit()?;
        }
        Ok(())
    }

    pub fn bits_remaining(&self) -> u32 {
        let unread_bytes = self.buffer.len().saturating_sub(self.buffer_index);
        let unread_bits = unread_bytes.saturating_mul(8) + usize::from(self.scratch_index);
        u32::try_from(unread_bits).unwrap_or(u32::MAX)
    }
}
