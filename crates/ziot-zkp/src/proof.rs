//! # Proof Wire Format
//!
//! The protocol exchanges Groth16 proofs as decimal-string curve
//! coordinates: `a` and `c` are G1 points (`[x, y]`), `b` is a G2 point
//! (`[[x0, x1], [y0, y1]]`, tower components in ascending order), and
//! `publicSignals` is an ordered sequence of scalar-field decimal strings
//! where index 0 carries the claimed commitment.
//!
//! Parsing is strict: every coordinate must be a canonical base-field
//! element, every point must lie on the curve and in the prime-order
//! subgroup. Anything less is a malformed proof, which the verifier
//! reports as `false` rather than an error.

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_groth16::Proof as ArkProof;
use serde::{Deserialize, Serialize};

use ziot_crypto::fp_from_decimal;

use crate::error::ZkpError;

/// A Groth16 proof in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// G1 point, affine `[x, y]`.
    pub a: [String; 2],
    /// G2 point, affine `[[x0, x1], [y0, y1]]`.
    pub b: [[String; 2]; 2],
    /// G1 point, affine `[x, y]`.
    pub c: [String; 2],
}

/// A proof together with its ordered public signals, as produced by the
/// prover and presented to the authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBundle {
    /// The Groth16 proof.
    pub proof: Proof,
    /// Ordered public signals; `public_signals[0]` is the commitment.
    #[serde(rename = "publicSignals")]
    pub public_signals: Vec<String>,
}

impl Proof {
    /// Parse into an arkworks proof, enforcing curve and subgroup
    /// membership for every point.
    pub fn to_ark(&self) -> Result<ArkProof<Bn254>, ZkpError> {
        let a = parse_g1(&self.a, "a")?;
        let b = parse_g2(&self.b, "b")?;
        let c = parse_g1(&self.c, "c")?;
        Ok(ArkProof { a, b, c })
    }

    /// Render an arkworks proof into wire form.
    pub fn from_ark(proof: &ArkProof<Bn254>) -> Self {
        Self {
            a: g1_coords(&proof.a),
            b: g2_coords(&proof.b),
            c: g1_coords(&proof.c),
        }
    }
}

fn parse_fq(s: &str, component: &str) -> Result<Fq, ZkpError> {
    fp_from_decimal(s)
        .map_err(|_| ZkpError::MalformedProof(format!("{component} is not a field element: {s:?}")))
}

fn parse_g1(coords: &[String; 2], component: &str) -> Result<G1Affine, ZkpError> {
    let x = parse_fq(&coords[0], component)?;
    let y = parse_fq(&coords[1], component)?;
    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ZkpError::MalformedProof(format!(
            "{component} is not a valid G1 point"
        )));
    }
    Ok(point)
}

fn parse_g2(coords: &[[String; 2]; 2], component: &str) -> Result<G2Affine, ZkpError> {
    let x = Fq2::new(
        parse_fq(&coords[0][0], component)?,
        parse_fq(&coords[0][1], component)?,
    );
    let y = Fq2::new(
        parse_fq(&coords[1][0], component)?,
        parse_fq(&coords[1][1], component)?,
    );
    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ZkpError::MalformedProof(format!(
            "{component} is not a valid G2 point"
        )));
    }
    Ok(point)
}

fn g1_coords(point: &G1Affine) -> [String; 2] {
    match point.xy() {
        Some((x, y)) => [
            ziot_crypto::fp_to_decimal(x),
            ziot_crypto::fp_to_decimal(y),
        ],
        // The prover never emits the identity; encode it as the one pair
        // that can never parse back, so round-trips stay honest.
        None => ["0".to_string(), "0".to_string()],
    }
}

fn g2_coords(point: &G2Affine) -> [[String; 2]; 2] {
    match point.xy() {
        Some((x, y)) => [
            [
                ziot_crypto::fp_to_decimal(&x.c0),
                ziot_crypto::fp_to_decimal(&x.c1),
            ],
            [
                ziot_crypto::fp_to_decimal(&y.c0),
                ziot_crypto::fp_to_decimal(&y.c1),
            ],
        ],
        None => [
            ["0".to_string(), "0".to_string()],
            ["0".to_string(), "0".to_string()],
        ],
    }
}
