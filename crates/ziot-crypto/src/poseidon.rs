//! # Poseidon-Style Commitment Hash
//!
//! An algebraic, collision-resistant hash over the BN254 scalar field,
//! usable both natively (registration-time commitment computation) and
//! inside the arithmetic circuit in `ziot-zkp` (the prover re-derives the
//! same commitment from the secret witness). Width `t = arity + 1`, x^5
//! S-box, 8 full rounds with a per-width partial-round schedule.
//!
//! ## Parameters
//!
//! Round constants and the MDS matrix are generated deterministically at
//! [`PoseidonHasher::init`] time: constants from counter-mode SHA-256 over
//! a fixed domain tag, the MDS as a Cauchy matrix (pairwise-distinct
//! generators, hence invertible). Generation is the expensive, one-time
//! initialization the protocol requires — roughly seven hundred
//! hash-to-field derivations and `t²` field inversions per width.
//!
//! This is a self-defined instance: prover, verifier, and authority all
//! live in this workspace and share these parameters through
//! [`PoseidonParams`], so no external constant set is involved.
//!
//! ## Readiness
//!
//! Consumers never hold a `PoseidonHasher` directly at startup; they hold
//! a [`HasherHandle`] and call [`HasherHandle::get`], which fails with
//! [`CryptoError::NotInitialized`] until the initialized hasher has been
//! installed. There is no lazy first-use path.

use std::sync::Arc;

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField, Zero};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use ziot_core::Commitment;

use crate::error::CryptoError;
use crate::field::{fr_from_decimal_mod, fr_to_decimal};

/// Largest supported input arity. The authority itself only hashes a
/// single scalar (the normalized secret), but the ledger id-hash and
/// future multi-input commitments fit within this bound.
pub const MAX_ARITY: usize = 4;

/// Number of full rounds (split evenly before and after the partial run).
pub const FULL_ROUNDS: usize = 8;

/// Partial rounds per arity (width t = arity + 1).
const PARTIAL_ROUNDS: [usize; MAX_ARITY] = [56, 57, 56, 60];

/// Domain tag for round-constant derivation.
const RC_DOMAIN: &[u8] = b"ziot.poseidon.rc.v1";

/// Parameter set for one permutation width.
#[derive(Debug, Clone)]
pub struct PoseidonParams {
    /// State width (`arity + 1`; index 0 is the capacity element).
    pub width: usize,
    /// Full rounds, evenly split around the partial rounds.
    pub full_rounds: usize,
    /// Partial rounds (S-box applied to the first state element only).
    pub partial_rounds: usize,
    /// Round constants, `(full_rounds + partial_rounds) * width` entries,
    /// consumed row by row.
    pub round_constants: Vec<Fr>,
    /// `width × width` MDS mixing matrix.
    pub mds: Vec<Vec<Fr>>,
}

impl PoseidonParams {
    fn generate(arity: usize) -> Result<Self, CryptoError> {
        let width = arity + 1;
        let partial_rounds = PARTIAL_ROUNDS[arity - 1];
        let rounds = FULL_ROUNDS + partial_rounds;

        let mut round_constants = Vec::with_capacity(rounds * width);
        for i in 0..(rounds * width) as u32 {
            let mut hasher = Sha256::new();
            hasher.update(RC_DOMAIN);
            hasher.update([width as u8]);
            hasher.update(i.to_be_bytes());
            round_constants.push(Fr::from_be_bytes_mod_order(&hasher.finalize()));
        }

        // Cauchy matrix m[i][j] = 1 / (x_i + y_j) with x_i = i, y_j = width + j.
        // All denominators lie in [width, 3*width - 2], so every inverse exists.
        let mut mds = Vec::with_capacity(width);
        for i in 0..width {
            let mut row = Vec::with_capacity(width);
            for j in 0..width {
                let denom = Fr::from((i + width + j) as u64);
                let inv = denom.inverse().ok_or_else(|| {
                    CryptoError::ParameterGeneration(format!(
                        "non-invertible MDS denominator at ({i},{j})"
                    ))
                })?;
                row.push(inv);
            }
            mds.push(row);
        }

        Ok(Self {
            width,
            full_rounds: FULL_ROUNDS,
            partial_rounds,
            round_constants,
            mds,
        })
    }

    /// Run the permutation in place. `state.len()` must equal `self.width`.
    pub fn permute(&self, state: &mut [Fr]) {
        debug_assert_eq!(state.len(), self.width);
        let half_full = self.full_rounds / 2;
        let total = self.full_rounds + self.partial_rounds;

        for round in 0..total {
            for (i, s) in state.iter_mut().enumerate() {
                *s += self.round_constants[round * self.width + i];
            }

            let full = round < half_full || round >= half_full + self.partial_rounds;
            if full {
                for s in state.iter_mut() {
                    *s = pow5(*s);
                }
            } else {
                state[0] = pow5(state[0]);
            }

            let previous = state.to_vec();
            for (i, s) in state.iter_mut().enumerate() {
                let mut acc = Fr::zero();
                for (j, p) in previous.iter().enumerate() {
                    acc += self.mds[i][j] * p;
                }
                *s = acc;
            }
        }
    }
}

fn pow5(x: Fr) -> Fr {
    let x2 = x.square();
    x2.square() * x
}

/// The initialized commitment hasher: one parameter set per arity.
#[derive(Debug)]
pub struct PoseidonHasher {
    params: Vec<PoseidonParams>,
}

impl PoseidonHasher {
    /// Generate parameters for every supported arity.
    ///
    /// This is the one-time, process-wide expensive step. It must complete
    /// and be installed into a [`HasherHandle`] before any registration or
    /// verification request is served.
    pub fn init() -> Result<Self, CryptoError> {
        let mut params = Vec::with_capacity(MAX_ARITY);
        for arity in 1..=MAX_ARITY {
            params.push(PoseidonParams::generate(arity)?);
        }
        Ok(Self { params })
    }

    /// Parameter set for a given input arity.
    pub fn params(&self, arity: usize) -> Result<&PoseidonParams, CryptoError> {
        if arity == 0 || arity > MAX_ARITY {
            return Err(CryptoError::UnsupportedArity(arity));
        }
        Ok(&self.params[arity - 1])
    }

    /// Hash a sequence of field elements into one.
    ///
    /// Sponge with capacity 1: `state = [0, inputs...]`, one permutation,
    /// output `state[0]`.
    pub fn hash(&self, inputs: &[Fr]) -> Result<Fr, CryptoError> {
        let params = self.params(inputs.len())?;
        let mut state = vec![Fr::zero(); params.width];
        state[1..].copy_from_slice(inputs);
        params.permute(&mut state);
        Ok(state[0])
    }

    /// Compute the public commitment for a normalized secret scalar.
    ///
    /// `normalized` is the decimal output of
    /// [`normalize_secret`](crate::secret::normalize_secret); it may exceed
    /// the field modulus and is reduced here, exactly as the circuit does.
    pub fn commitment(&self, normalized: &str) -> Result<Commitment, CryptoError> {
        let scalar = fr_from_decimal_mod(normalized)?;
        let digest = self.hash(&[scalar])?;
        Commitment::new(fr_to_decimal(&digest))
            .map_err(|e| CryptoError::InvalidFieldElement(e.to_string()))
    }
}

/// Shared readiness gate for the commitment hasher.
///
/// The handle starts empty; the bootstrap path runs [`PoseidonHasher::init`]
/// (typically on a blocking worker) and installs the result. Every consumer
/// goes through [`HasherHandle::get`], which yields the retryable
/// [`CryptoError::NotInitialized`] during warm-up.
#[derive(Debug, Clone, Default)]
pub struct HasherHandle {
    inner: Arc<RwLock<Option<Arc<PoseidonHasher>>>>,
}

impl HasherHandle {
    /// Create an empty (not ready) handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the initialized hasher, flipping the handle to ready.
    pub fn install(&self, hasher: PoseidonHasher) {
        *self.inner.write() = Some(Arc::new(hasher));
    }

    /// Fetch the hasher, or fail retryably during warm-up.
    pub fn get(&self) -> Result<Arc<PoseidonHasher>, CryptoError> {
        self.inner
            .read()
            .as_ref()
            .cloned()
            .ok_or(CryptoError::NotInitialized)
    }

    /// Whether initialization has completed.
    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }
}
