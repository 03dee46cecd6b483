use core::fmt;

use crate::Vec;
use crate::vm::HandlerError;

/// A value held on the stack or in a memory slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Value {
    /// Content of memory slots that were never written.
    #[default]
    Nil,
    Int(i64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Int(_) => "Int",
            Value::Bool(_) => "Bool",
            Value::Bytes(_) => "Bytes",
        }
    }

    pub fn as_int(&self) -> Result<i64, HandlerError> {
        match self {
            Value::Int(value) => Ok(*value),
            other => Err(HandlerError::type_mismatch("Int", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, HandlerError> {
        match self {
            Value::Bool(value) => Ok(*value),
            other => Err(HandlerError::type_mismatch("Bool", other)),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], HandlerError> {
        match self {
            Value::Bytes(value) => Ok(value),
            other => Err(HandlerError::type_mismatch("Bytes", other)),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Int(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Bytes(bytes) => {
                write!(f, "0x")?;
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}
