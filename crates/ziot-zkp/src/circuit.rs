//! # Commitment Circuit
//!
//! R1CS statement `commitment = Poseidon(secret)`: the commitment is the
//! sole public input, the secret the sole witness. The Poseidon gadget
//! mirrors the native permutation in `ziot-crypto` constant for constant,
//! so a commitment computed at registration time is exactly the value the
//! circuit reproduces from the secret at proving time.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use ziot_crypto::PoseidonParams;

/// Proves knowledge of `secret` such that `Poseidon(secret) == commitment`.
///
/// Assignments are `None` during setup (only the constraint shape is
/// consumed) and `Some` during proving.
#[derive(Clone)]
pub struct CommitmentCircuit {
    /// Poseidon parameters for arity 1 (width 2), shared with the native
    /// hasher.
    pub params: PoseidonParams,
    /// Witness: the normalized secret, reduced into the scalar field.
    pub secret: Option<Fr>,
    /// Public input: the commitment on file.
    pub commitment: Option<Fr>,
}

impl ConstraintSynthesizer<Fr> for CommitmentCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Input allocation order defines the publicSignals order; the
        // commitment must be signal 0.
        let commitment = FpVar::new_input(cs.clone(), || {
            self.commitment.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let secret = FpVar::new_witness(cs, || {
            self.secret.ok_or(SynthesisError::AssignmentMissing)
        })?;

        let digest = poseidon_gadget(&self.params, &[secret])?;
        digest.enforce_equal(&commitment)
    }
}

/// Poseidon sponge over circuit variables: capacity element zero, inputs
/// absorbed into the remaining lanes, one permutation, first lane out.
pub fn poseidon_gadget(
    params: &PoseidonParams,
    inputs: &[FpVar<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    debug_assert_eq!(inputs.len() + 1, params.width);
    let mut state: Vec<FpVar<Fr>> = Vec::with_capacity(params.width);
    state.push(FpVar::constant(Fr::zero()));
    state.extend_from_slice(inputs);
    permute_gadget(params, &mut state)?;
    Ok(state.swap_remove(0))
}

fn permute_gadget(
    params: &PoseidonParams,
    state: &mut Vec<FpVar<Fr>>,
) -> Result<(), SynthesisError> {
    let width = params.width;
    let half_full = params.full_rounds / 2;
    let total = params.full_rounds + params.partial_rounds;

    for round in 0..total {
        for (i, lane) in state.iter_mut().enumerate() {
            *lane = &*lane + FpVar::constant(params.round_constants[round * width + i]);
        }

        let full = round < half_full || round >= half_full + params.partial_rounds;
        if full {
            for lane in state.iter_mut() {
                *lane = pow5_var(lane)?;
            }
        } else {
            state[0] = pow5_var(&state[0])?;
        }

        let mut mixed = Vec::with_capacity(width);
        for row in &params.mds {
            let mut acc = FpVar::constant(Fr::zero());
            for (j, lane) in state.iter().enumerate() {
                acc = acc + lane * FpVar::constant(row[j]);
            }
            mixed.push(acc);
        }
        *state = mixed;
    }
    Ok(())
}

fn pow5_var(x: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let x2 = x * x;
    let x4 = &x2 * &x2;
    Ok(&x4 * x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::{ConstraintSystem, OptimizationGoal};
    use ziot_crypto::{fr_from_decimal_mod, normalize_secret, PoseidonHasher};

    fn params() -> PoseidonParams {
        PoseidonHasher::init().unwrap().params(1).unwrap().clone()
    }

    #[test]
    fn satisfied_with_matching_assignment() {
        let hasher = PoseidonHasher::init().unwrap();
        let secret = fr_from_decimal_mod(&normalize_secret("secret1")).unwrap();
        let commitment = hasher.hash(&[secret]).unwrap();

        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);
        CommitmentCircuit {
            params: params(),
            secret: Some(secret),
            commitment: Some(commitment),
        }
        .generate_constraints(cs.clone())
        .unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn unsatisfied_with_wrong_commitment() {
        let hasher = PoseidonHasher::init().unwrap();
        let secret = fr_from_decimal_mod(&normalize_secret("secret1")).unwrap();
        let wrong = hasher.hash(&[secret]).unwrap() + Fr::from(1u64);

        let cs = ConstraintSystem::<Fr>::new_ref();
        CommitmentCircuit {
            params: params(),
            secret: Some(secret),
            commitment: Some(wrong),
        }
        .generate_constraints(cs.clone())
        .unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn gadget_agrees_with_native_hash() {
        let hasher = PoseidonHasher::init().unwrap();
        let input = Fr::from(7u64);
        let expected = hasher.hash(&[input]).unwrap();

        let cs = ConstraintSystem::<Fr>::new_ref();
        let var = FpVar::new_witness(cs.clone(), || Ok(input)).unwrap();
        let digest = poseidon_gadget(hasher.params(1).unwrap(), &[var]).unwrap();
        assert_eq!(digest.value().unwrap(), expected);
    }

    #[test]
    fn commitment_is_the_only_public_input() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        CommitmentCircuit {
            params: params(),
            secret: Some(Fr::from(3u64)),
            commitment: Some(Fr::from(5u64)),
        }
        .generate_constraints(cs.clone())
        .unwrap();
        // Instance column: the constant "one" plus exactly one input.
        assert_eq!(cs.num_instance_variables(), 2);
    }
}
