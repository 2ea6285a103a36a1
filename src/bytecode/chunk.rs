//! Bytecode chunk containing instructions and constants.

use crate::bytecode::instruction::OpCode;
use crate::bytecode::value::Value;

/// A compiled unit: instruction bytes, the constant pool, and one source line
/// per byte. Built by the compiler, then only read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    code: Vec<u8>,
    constants: Vec<Value>,
    lines: Vec<usize>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw byte to the chunk.
    pub fn write(&mut self, byte: u8, line: usize) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Write an opcode to the chunk.
    pub fn write_op(&mut self, op: OpCode, line: usize) {
        self.write(op.into(), line);
    }

    /// Write a 16-bit operand (big-endian).
    pub fn write_u16(&mut self, value: u16, line: usize) {
        let [hi, lo] = value.to_be_bytes();
        self.write(hi, line);
        self.write(lo, line);
    }

    /// Read a big-endian 16-bit operand at offset.
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        let hi = *self.code.get(offset)?;
        let lo = *self.code.get(offset + 1)?;
        Some(u16::from_be_bytes([hi, lo]))
    }

    /// Overwrite a previously written 16-bit operand.
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.code[offset] = hi;
        self.code[offset + 1] = lo;
    }

    /// Append a constant and return its index. The pool never deduplicates;
    /// range checks belong to the compiler.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    /// Get the source line of the byte at offset, or 0 when out of range.
    pub fn get_line(&self, offset: usize) -> usize {
        self.lines.get(offset).copied().unwrap_or(0)
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_basics() {
        let mut chunk = Chunk::new();
        let idx = chunk.add_constant(Value::Number(1.5));
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(idx as u8, 1);
        chunk.write_op(OpCode::Return, 2);

        assert_eq!(chunk.len(), 3);
        assert_eq!(chunk.code(), &[OpCode::Constant as u8, 0, OpCode::Return as u8]);
        assert_eq!(chunk.lines(), &[1, 1, 2]);
        assert_eq!(chunk.constants(), &[Value::Number(1.5)]);
    }

    #[test]
    fn test_constant_pool_is_append_only() {
        let mut chunk = Chunk::new();
        let idx1 = chunk.add_constant(Value::Number(42.0));
        let idx2 = chunk.add_constant(Value::Number(42.0));
        let idx3 = chunk.add_constant(Value::String("hello".to_string()));

        assert_eq!((idx1, idx2, idx3), (0, 1, 2));
    }

    #[test]
    fn test_u16_is_big_endian() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Jump, 1);
        chunk.write_u16(0x0102, 1);

        assert_eq!(&chunk.code()[1..], &[0x01, 0x02]);
        assert_eq!(chunk.read_u16(1), Some(0x0102));
        assert_eq!(chunk.read_u16(2), None);
    }

    #[test]
    fn test_patch_u16() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::JumpIfFalse, 1);
        chunk.write_u16(0xFFFF, 1);
        chunk.write_op(OpCode::Pop, 1);
        chunk.patch_u16(1, 1);

        assert_eq!(chunk.read_u16(1), Some(1));
    }

    #[test]
    fn test_get_line_out_of_range() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Nil, 7);
        assert_eq!(chunk.get_line(0), 7);
        assert_eq!(chunk.get_line(1), 0);
    }
}
