//! Bytecode instruction definitions for the Ferrule VM.

/// Opcodes for the bytecode virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    // ============ Constants & Stack ============
    /// Load a constant from the constant pool: CONSTANT <index:u8>
    Constant = 0,
    /// Push nil onto the stack
    Nil,
    /// Push true onto the stack
    True,
    /// Push false onto the stack
    False,
    /// Pop the top value from the stack
    Pop,

    // ============ Variables ============
    /// Push a local variable: GET_LOCAL <slot:u8>
    GetLocal,
    /// Store the top of the stack into a local, leaving it on the stack: SET_LOCAL <slot:u8>
    SetLocal,
    /// Push a global variable: GET_GLOBAL <name_index:u8>
    GetGlobal,
    /// Pop the top of the stack into a new or existing global: DEFINE_GLOBAL <name_index:u8>
    DefineGlobal,
    /// Store the top of the stack into an existing global: SET_GLOBAL <name_index:u8>
    SetGlobal,

    // ============ Arithmetic ============
    /// Add two numbers: a + b
    Add,
    /// Subtract two numbers: a - b
    Subtract,
    /// Multiply two numbers: a * b
    Multiply,
    /// Divide two numbers: a / b
    Divide,
    /// Negate a number: -a
    Negate,

    // ============ Comparison & Logic ============
    /// Structural equality: a == b
    Equal,
    /// Greater than: a > b
    Greater,
    /// Less than: a < b
    Less,
    /// Logical not by falsiness: !a
    Not,

    // ============ Control Flow ============
    /// Unconditional forward jump: JUMP <offset:u16>
    Jump,
    /// Forward jump if the top of the stack is falsy, without popping: JUMP_IF_FALSE <offset:u16>
    JumpIfFalse,
    /// Backward jump: LOOP <offset:u16>
    Loop,

    // ============ Output & Exit ============
    /// Pop and print the top of the stack
    Print,
    /// Pop the script's result and halt
    Return,
}

impl OpCode {
    /// Get the number of operand bytes for this opcode.
    pub fn operand_size(self) -> usize {
        match self {
            OpCode::Nil
            | OpCode::True
            | OpCode::False
            | OpCode::Pop
            | OpCode::Add
            | OpCode::Subtract
            | OpCode::Multiply
            | OpCode::Divide
            | OpCode::Negate
            | OpCode::Equal
            | OpCode::Greater
            | OpCode::Less
            | OpCode::Not
            | OpCode::Print
            | OpCode::Return => 0,

            OpCode::Constant
            | OpCode::GetLocal
            | OpCode::SetLocal
            | OpCode::GetGlobal
            | OpCode::DefineGlobal
            | OpCode::SetGlobal => 1,

            OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => 2,
        }
    }

    /// Convert from u8 to OpCode.
    pub fn from_u8(byte: u8) -> Option<OpCode> {
        let op = match byte {
            0 => OpCode::Constant,
            1 => OpCode::Nil,
            2 => OpCode::True,
            3 => OpCode::False,
            4 => OpCode::Pop,
            5 => OpCode::GetLocal,
            6 => OpCode::SetLocal,
            7 => OpCode::GetGlobal,
            8 => OpCode::DefineGlobal,
            9 => OpCode::SetGlobal,
            10 => OpCode::Add,
            11 => OpCode::Subtract,
            12 => OpCode::Multiply,
            13 => OpCode::Divide,
            14 => OpCode::Negate,
            15 => OpCode::Equal,
            16 => OpCode::Greater,
            17 => OpCode::Less,
            18 => OpCode::Not,
            19 => OpCode::Jump,
            20 => OpCode::JumpIfFalse,
            21 => OpCode::Loop,
            22 => OpCode::Print,
            23 => OpCode::Return,
            _ => return None,
        };
        Some(op)
    }

    /// Mnemonic used by the disassembler.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Constant => "CONSTANT",
            OpCode::Nil => "NIL",
            OpCode::True => "TRUE",
            OpCode::False => "FALSE",
            OpCode::Pop => "POP",
            OpCode::GetLocal => "GET_LOCAL",
            OpCode::SetLocal => "SET_LOCAL",
            OpCode::GetGlobal => "GET_GLOBAL",
            OpCode::DefineGlobal => "DEFINE_GLOBAL",
            OpCode::SetGlobal => "SET_GLOBAL",
            OpCode::Add => "ADD",
            OpCode::Subtract => "SUBTRACT",
            OpCode::Multiply => "MULTIPLY",
            OpCode::Divide => "DIVIDE",
            OpCode::Negate => "NEGATE",
            OpCode::Equal => "EQUAL",
            OpCode::Greater => "GREATER",
            OpCode::Less => "LESS",
            OpCode::Not => "NOT",
            OpCode::Jump => "JUMP",
            OpCode::JumpIfFalse => "JUMP_IF_FALSE",
            OpCode::Loop => "LOOP",
            OpCode::Print => "PRINT",
            OpCode::Return => "RETURN",
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}
