//! Program Loader.
//!
//! This module reads harness programs. It performs:
//! 1. **Parsing:** Deserializes a JSON document of tagged instructions.
//! 2. **Preloads:** Carries scratchpad words to be written before the first issue.
//! 3. **File access:** Reads the document from disk.
//!
//! A program document looks like:
//!
//! ```json
//! {
//!   "preload": [ { "addr": 256, "words": [0, 2] } ],
//!   "instructions": [
//!     { "op": "set_dma_reg", "half_index": 16, "value": 16 },
//!     { "op": "at_inc_get_ptr", "increment_log2": 0, "int_width": 3,
//!       "offset": 1, "result_reg": 0, "base_reg": 8 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::LoadError;
use crate::isa::instruction::Instruction;

/// Little-endian 32-bit words written into the scratchpad at `addr` before execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preload {
    /// Byte address of the first word.
    pub addr: u64,
    /// Words to write, in ascending address order.
    pub words: Vec<u32>,
}

impl Preload {
    /// The preload as raw little-endian bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

/// An instruction stream plus its initial scratchpad contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Instructions in issue order.
    pub instructions: Vec<Instruction>,
    /// Scratchpad initialisation.
    #[serde(default)]
    pub preload: Vec<Preload>,
}

impl Program {
    /// Creates a program with no preloads.
    pub const fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            preload: Vec::new(),
        }
    }

    /// Appends an instruction.
    pub fn push(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    /// Adds a preload of `words` at `addr`.
    #[must_use]
    pub fn with_preload(mut self, addr: u64, words: Vec<u32>) -> Self {
        self.preload.push(Preload { addr, words });
        self
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Parses a program document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for malformed JSON or unknown instructions.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a program file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, otherwise as
    /// [`Program::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}
