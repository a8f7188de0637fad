//! # Workspace Pattern for Viterbi Buffers
//!
//! Pre-allocated buffers for Viterbi decoding to avoid repeated allocations
//! when the same worker decodes many chromosomes.
//!
//! The decoder itself stays immutable and shareable across threads; each
//! worker owns a workspace and passes `&mut ViterbiWorkspace` to every decode.

/// Workspace for one Viterbi decode
#[derive(Debug, Default)]
pub struct ViterbiWorkspace {
    /// Best log-likelihood ending in each state at the previous SNP (n_states)
    pub prev: Vec<f64>,

    /// Best log-likelihood ending in each state at the current SNP (n_states)
    pub curr: Vec<f64>,

    /// Per-state log emission at the current SNP (n_states)
    pub emit: Vec<f64>,

    /// Back-pointers, `(n_snps - 1) x n_states`, row-major.
    /// u32 saves 50% memory vs usize
    pub lattice: Vec<u32>,
}

impl ViterbiWorkspace {
    /// Create a new workspace with given capacities
    pub fn new(n_states: usize, n_snps: usize) -> Self {
        let mut ws = Self::default();
        ws.resize(n_states, n_snps);
        ws
    }

    /// Resize buffers for new dimensions, reusing existing capacity
    pub fn resize(&mut self, n_states: usize, n_snps: usize) {
        self.prev.clear();
        self.prev.resize(n_states, f64::NEG_INFINITY);
        self.curr.clear();
        self.curr.resize(n_states, f64::NEG_INFINITY);
        self.emit.clear();
        self.emit.resize(n_states, 0.0);
        self.lattice.clear();
        self.lattice.resize(n_snps.saturating_sub(1) * n_states, 0);
    }

    /// Bytes currently reserved by the buffers
    pub fn capacity_bytes(&self) -> usize {
        (self.prev.capacity() + self.curr.capacity() + self.emit.capacity())
            * std::mem::size_of::<f64>()
            + self.lattice.capacity() * std::mem::size_of::<u32>()
    }
}
