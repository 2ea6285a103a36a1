//! Bytecode disassembler for debug output, `--disassemble` and execution tracing.

use super::chunk::Chunk;
use super::instruction::OpCode;

/// Disassemble a whole chunk under a `== name ==` header.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = format!("== {} ==\n", name);
    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut out);
        out.push('\n');
    }
    out
}

/// Disassemble the instruction at `offset` (without a trailing newline) and
/// return the offset of the next one.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    out.push_str(&format!("{:04} ", offset));

    let line = chunk.get_line(offset);
    if offset > 0 && line == chunk.get_line(offset - 1) {
        out.push_str("   | ");
    } else {
        out.push_str(&format!("{:4} ", line));
    }

    let Some(&byte) = chunk.code().get(offset) else {
        out.push_str("<end of chunk>");
        return offset + 1;
    };
    let Some(op) = OpCode::from_u8(byte) else {
        out.push_str(&format!("Unknown opcode {}", byte));
        return offset + 1;
    };

    match op.operand_size() {
        0 => {
            out.push_str(op.name());
            offset + 1
        }
        1 => operand_instruction(op, chunk, offset, out),
        _ => jump_instruction(op, chunk, offset, out),
    }
}

fn operand_instruction(op: OpCode, chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let Some(&operand) = chunk.code().get(offset + 1) else {
        out.push_str(&format!("{:<16} <truncated>", op.name()));
        return chunk.len();
    };

    match op {
        OpCode::GetLocal | OpCode::SetLocal => {
            out.push_str(&format!("{:<16} {:4}", op.name(), operand));
        }
        _ => {
            let value = chunk
                .constants()
                .get(operand as usize)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "<missing>".to_string());
            out.push_str(&format!("{:<16} {:4} '{}'", op.name(), operand, value));
        }
    }
    offset + 2
}

fn jump_instruction(op: OpCode, chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let Some(jump) = chunk.read_u16(offset + 1) else {
        out.push_str(&format!("{:<16} <truncated>", op.name()));
        return chunk.len();
    };

    let next = offset as i64 + 3;
    let target = match op {
        OpCode::Loop => next - jump as i64,
        _ => next + jump as i64,
    };
    out.push_str(&format!("{:<16} {:4} -> {}", op.name(), offset, target));
    offset + 3
}
