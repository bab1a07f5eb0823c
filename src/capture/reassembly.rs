//! Line reassembly across chunk boundaries
//!
//! Serial reads split the stream at arbitrary points. [`LineAssembler`] keeps
//! the unterminated tail between pushes and hands back only lines whose
//! terminator has been seen.
//!
//! Line endings are normalized before splitting: every CR-LF pair and every
//! lone CR count as one LF. A CR-LF pair split across two pushes therefore
//! yields an extra empty line, which callers skip along with any other blank
//! line.

/// Reassembly buffer holding the tail after the last line separator
#[derive(Debug, Default, Clone)]
pub struct LineAssembler {
    tail: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and return every line it completes, in order
    ///
    /// Returned lines exclude their terminator and may be empty. The tail
    /// left behind never contains CR or LF.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        let mut iter = bytes.iter().copied().peekable();

        while let Some(byte) = iter.next() {
            match byte {
                b'\r' => {
                    // CR-LF inside this push collapses to one separator
                    if iter.peek() == Some(&b'\n') {
                        iter.next();
                    }
                    lines.push(std::mem::take(&mut self.tail));
                }
                b'\n' => lines.push(std::mem::take(&mut self.tail)),
                other => self.tail.push(other),
            }
        }

        lines
    }

    /// Bytes received since the last separator
    pub fn pending(&self) -> &[u8] {
        &self.tail
    }

    pub fn is_empty(&self) -> bool {
        self.tail.is_empty()
    }

    /// Discard the unterminated tail
    pub fn clear(&mut self) {
        self.tail.clear();
    }
}
