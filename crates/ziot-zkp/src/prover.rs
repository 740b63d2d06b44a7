//! # Trusted Setup & Prover
//!
//! Circuit-specific Groth16 setup and proof generation for the commitment
//! circuit. The authority itself never proves — proving lives in the CLI,
//! in device-side tooling, and behind the API's `dev-prover` helper route.

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, ProvingKey, VerifyingKey};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use ark_std::rand::{CryptoRng, RngCore};

use ziot_crypto::{fr_from_decimal_mod, fr_to_decimal, normalize_secret, PoseidonHasher};

use crate::circuit::CommitmentCircuit;
use crate::error::ZkpError;
use crate::proof::{Proof, ProofBundle};

/// Key pair produced by the trusted setup.
#[derive(Debug)]
pub struct CircuitArtifacts {
    /// Proving key (large; stays with the proving side).
    pub proving_key: ProvingKey<Bn254>,
    /// Verifying key (small; the authority loads only this).
    pub verifying_key: VerifyingKey<Bn254>,
}

/// Run the circuit-specific Groth16 setup for the commitment circuit.
///
/// The hasher must be initialized: the circuit embeds its Poseidon
/// parameters, so keys are bound to one parameter set. Regenerating
/// parameters invalidates all previously issued keys and proofs.
pub fn setup<R: RngCore + CryptoRng>(
    hasher: &PoseidonHasher,
    rng: &mut R,
) -> Result<CircuitArtifacts, ZkpError> {
    let circuit = CommitmentCircuit {
        params: hasher.params(1)?.clone(),
        secret: None,
        commitment: None,
    };
    let (proving_key, verifying_key) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)?;
    Ok(CircuitArtifacts {
        proving_key,
        verifying_key,
    })
}

/// Generate a proof of knowledge of `secret` for its own commitment.
///
/// Returns the wire-format bundle: `publicSignals[0]` is the commitment
/// the authority must have on file for verification to mean anything.
pub fn prove<R: RngCore + CryptoRng>(
    hasher: &PoseidonHasher,
    proving_key: &ProvingKey<Bn254>,
    secret: &str,
    rng: &mut R,
) -> Result<ProofBundle, ZkpError> {
    let scalar = fr_from_decimal_mod(&normalize_secret(secret))?;
    let commitment: Fr = hasher.hash(&[scalar])?;

    let circuit = CommitmentCircuit {
        params: hasher.params(1)?.clone(),
        secret: Some(scalar),
        commitment: Some(commitment),
    };
    let proof = Groth16::<Bn254>::prove(proving_key, circuit, rng)?;

    Ok(ProofBundle {
        proof: Proof::from_ark(&proof),
        public_signals: vec![fr_to_decimal(&commitment)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_groth16::prepare_verifying_key;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ziot_crypto::fr_from_decimal;

    #[test]
    fn prove_then_verify_round_trip() {
        let hasher = PoseidonHasher::init().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let artifacts = setup(&hasher, &mut rng).unwrap();

        let bundle = prove(&hasher, &artifacts.proving_key, "secret1", &mut rng).unwrap();
        assert_eq!(bundle.public_signals.len(), 1);

        let pvk = prepare_verifying_key(&artifacts.verifying_key);
        let proof = bundle.proof.to_ark().unwrap();
        let signal = fr_from_decimal(&bundle.public_signals[0]).unwrap();
        assert!(Groth16::<Bn254>::verify_proof(&pvk, &proof, &[signal]).unwrap());
    }

    #[test]
    fn proof_binds_to_its_commitment() {
        let hasher = PoseidonHasher::init().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let artifacts = setup(&hasher, &mut rng).unwrap();

        let bundle = prove(&hasher, &artifacts.proving_key, "secretA", &mut rng).unwrap();
        let other = hasher
            .commitment(&normalize_secret("secretB"))
            .unwrap();

        let pvk = prepare_verifying_key(&artifacts.verifying_key);
        let proof = bundle.proof.to_ark().unwrap();
        let wrong_signal = fr_from_decimal(other.as_str()).unwrap();
        assert!(!Groth16::<Bn254>::verify_proof(&pvk, &proof, &[wrong_signal]).unwrap());
    }

    #[test]
    fn public_signal_matches_native_commitment() {
        let hasher = PoseidonHasher::init().unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let artifacts = setup(&hasher, &mut rng).unwrap();

        let bundle = prove(&hasher, &artifacts.proving_key, "secret1", &mut rng).unwrap();
        let expected = hasher.commitment(&normalize_secret("secret1")).unwrap();
        assert_eq!(bundle.public_signals[0], expected.as_str());
    }
}
