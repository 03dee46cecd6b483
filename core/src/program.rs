//! Bytecode programs and their binary framing.
//!
//! A program is a flat sequence of records, one per instruction:
//!
//! ```text
//! ┌──────────┬─────────────────┬──────────────┬────────────────┐
//! │ name len │   opcode name   │ operand len  │    operand     │
//! │   (u8)   │ (UTF-8, 1..255) │ (u16, big e.)│ (0..65535 B)   │
//! └──────────┴─────────────────┴──────────────┴────────────────┘
//! ```
//!
//! Opcodes travel by name because the instruction set itself is defined at
//! runtime; numbering would tie programs to one definition's ordering.

use core::fmt;

use thiserror::Error;

use crate::{String, ToString, Vec};

pub const MAX_OPCODE_LEN: usize = u8::MAX as usize;
pub const MAX_OPERAND_LEN: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("truncated instruction at byte {offset}")]
    Truncated { offset: usize },

    #[error("empty opcode at byte {offset}")]
    EmptyOpcode { offset: usize },

    #[error("opcode at byte {offset} is not valid UTF-8")]
    InvalidOpcode { offset: usize },

    #[error("opcode `{opcode}` is longer than {MAX_OPCODE_LEN} bytes")]
    OpcodeTooLong { opcode: String },

    #[error("operand of `{opcode}` is {len} bytes, the maximum is {MAX_OPERAND_LEN}")]
    OperandTooLong { opcode: String, len: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("cannot read program `{path}`: {message}")]
    Io { path: String, message: String },
}

/// One decoded instruction: an opcode name and its raw operand bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInstruction {
    pub opcode: String,
    pub params: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<ProgramInstruction>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction, checking it fits the framing.
    pub fn push(
        &mut self,
        opcode: impl Into<String>,
        params: impl Into<Vec<u8>>,
    ) -> Result<&mut Self, ProgramError> {
        let opcode = opcode.into();
        let params = params.into();
        if opcode.is_empty() {
            return Err(ProgramError::EmptyOpcode {
                offset: self.encoded_len(),
            });
        }
        if opcode.len() > MAX_OPCODE_LEN {
            return Err(ProgramError::OpcodeTooLong { opcode });
        }
        if params.len() > MAX_OPERAND_LEN {
            return Err(ProgramError::OperandTooLong {
                len: params.len(),
                opcode,
            });
        }
        self.instructions.push(ProgramInstruction { opcode, params });
        Ok(self)
    }

    /// Builder-style [`Program::push`].
    pub fn with(
        mut self,
        opcode: impl Into<String>,
        params: impl Into<Vec<u8>>,
    ) -> Result<Self, ProgramError> {
        self.push(opcode, params)?;
        Ok(self)
    }

    /// Decode a framed byte stream.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProgramError> {
        let mut instructions = Vec::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let start = offset;
            let name_len = bytes[offset] as usize;
            offset += 1;
            if name_len == 0 {
                return Err(ProgramError::EmptyOpcode { offset: start });
            }

            let name = bytes
                .get(offset..offset + name_len)
                .ok_or(ProgramError::Truncated { offset: start })?;
            let opcode = core::str::from_utf8(name)
                .map_err(|_| ProgramError::InvalidOpcode { offset: start })?;
            offset += name_len;

            let len_bytes = bytes
                .get(offset..offset + 2)
                .ok_or(ProgramError::Truncated { offset: start })?;
            let operand_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
            offset += 2;

            let params = bytes
                .get(offset..offset + operand_len)
                .ok_or(ProgramError::Truncated { offset: start })?;
            offset += operand_len;

            instructions.push(ProgramInstruction {
                opcode: opcode.into(),
                params: params.into(),
            });
        }
        tracing::debug!(bytes = bytes.len(), instructions = instructions.len(), "Decoded program");
        Ok(Self { instructions })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        for instruction in &self.instructions {
            // Lengths were checked by `push` or `decode`.
            out.push(instruction.opcode.len() as u8);
            out.extend_from_slice(instruction.opcode.as_bytes());
            out.extend_from_slice(&(instruction.params.len() as u16).to_be_bytes());
            out.extend_from_slice(&instruction.params);
        }
        out
    }

    fn encoded_len(&self) -> usize {
        self.instructions
            .iter()
            .map(|i| 1 + i.opcode.len() + 2 + i.params.len())
            .sum()
    }

    /// Decode a program written as hex text. Whitespace is ignored.
    pub fn from_hex(text: &str) -> Result<Self, ProgramError> {
        let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let digits = digits.strip_prefix("0x").unwrap_or(&digits);
        let bytes = hex::decode(digits).map_err(|err| ProgramError::InvalidHex(err.to_string()))?;
        Self::decode(&bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Open a program file, read it fully and decode it.
    #[cfg(feature = "std")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ProgramError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| ProgramError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::decode(&bytes)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProgramInstruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgramInstruction> {
        self.instructions.iter()
    }
}

/// One line per instruction: `address  OPCODE  operand-hex`.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (address, instruction) in self.instructions.iter().enumerate() {
            write!(f, "{:04}  {}", address, instruction.opcode)?;
            if !instruction.params.is_empty() {
                write!(f, "  0x{}", hex::encode(&instruction.params))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_layout() {
        let program = Program::new().with("ADD", []).unwrap().with("PUSH", [7u8]).unwrap();
        assert_eq!(
            program.encode(),
            vec![3, b'A', b'D', b'D', 0, 0, 4, b'P', b'U', b'S', b'H', 0, 1, 7]
        );
        assert_eq!(Program::decode(&program.encode()), Ok(program));
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(Program::decode(&[]), Ok(Program::new()));
    }

    #[test]
    fn test_decode_truncated() {
        // Second record claims 5 operand bytes but carries 1.
        let bytes = [1, b'A', 0, 0, 1, b'B', 0, 5, 9];
        assert_eq!(
            Program::decode(&bytes),
            Err(ProgramError::Truncated { offset: 4 })
        );
        assert_eq!(
            Program::decode(&[2, b'A']),
            Err(ProgramError::Truncated { offset: 0 })
        );
    }

    #[test]
    fn test_decode_rejects_bad_names() {
        assert_eq!(
            Program::decode(&[0, 0, 0]),
            Err(ProgramError::EmptyOpcode { offset: 0 })
        );
        assert_eq!(
            Program::decode(&[1, 0xff, 0, 0]),
            Err(ProgramError::InvalidOpcode { offset: 0 })
        );
    }

    #[test]
    fn test_push_limits() {
        let mut program = Program::new();
        let long_name: String = core::iter::repeat('X').take(256).collect();
        assert!(matches!(
            program.push(long_name, []),
            Err(ProgramError::OpcodeTooLong { .. })
        ));
        assert!(matches!(
            program.push("BIG", vec![0u8; MAX_OPERAND_LEN + 1]),
            Err(ProgramError::OperandTooLong { len, .. }) if len == MAX_OPERAND_LEN + 1
        ));
        assert!(program.is_empty());
    }

    #[test]
    fn test_hex() {
        let program = Program::from_hex("0x01 41 0001 ff").unwrap();
        assert_eq!(
            program.get(0),
            Some(&ProgramInstruction {
                opcode: "A".into(),
                params: vec![0xff],
            })
        );
        assert_eq!(program.to_hex(), "01410001ff");
    }

    #[test]
    fn test_hex_errors() {
        // Odd number of digits
        assert!(matches!(
            Program::from_hex("0AA"),
            Err(ProgramError::InvalidHex(_))
        ));
        assert!(matches!(
            Program::from_hex("zz"),
            Err(ProgramError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_display() {
        let program = Program::new()
            .with("PUSH", [0, 5])
            .unwrap()
            .with("HALT", [])
            .unwrap();
        assert_eq!(program.to_string(), "0000  PUSH  0x0005\n0001  HALT\n");
    }
}
