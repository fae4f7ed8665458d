use crate::isa::Mnemonic;

/// Operand tokens that could not be resolved.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OperandError {
    #[error("invalid register `{0}`")]
    InvalidRegister(String),
    #[error("invalid immediate `{0}`")]
    InvalidImmediate(String),
    #[error("malformed memory operand `{0}`, expected offset(base)")]
    MalformedOperand(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AsmError {
    #[error("{mnemonic}: {source}")]
    Encode {
        mnemonic: Mnemonic,
        #[source]
        source: OperandError,
    },
    #[error("append after the program was finalized")]
    EmitterFinalized,
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),
}

impl AsmError {
    pub(crate) fn encode(mnemonic: Mnemonic) -> impl FnOnce(OperandError) -> AsmError {
        move |source| AsmError::Encode { mnemonic, source }
    }

    /// The operand-level cause, if this is an encoding failure.
    pub fn operand(&self) -> Option<&OperandError> {
        match self {
            AsmError::Encode { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T, E = AsmError> = std::result::Result<T, E>;
