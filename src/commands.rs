use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use ark_bn254::{Fr, G1Projective};
use ark_std::UniformRand;
use eyre::WrapErr;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sparse_core::SparseVector;

/// On-disk encoding of a sparse vector file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Binary,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub domain_size: usize,
    pub len: usize,
    pub size_in_bits: usize,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulateReport {
    pub accumulated: G1Projective,
    pub residual: SparseVector<G1Projective>,
}

pub fn write_vector(
    path: &Path,
    vector: &SparseVector<G1Projective>,
    encoding: Encoding,
) -> eyre::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    match encoding {
        Encoding::Binary => file.write_all(&vector.to_bytes()?)?,
        Encoding::Text => file.write_all(vector.to_string().as_bytes())?,
    }
    Ok(())
}

pub fn read_vector(path: &Path, encoding: Encoding) -> eyre::Result<SparseVector<G1Projective>> {
    let vector = match encoding {
        Encoding::Binary => {
            let bytes = fs::read(path)?;
            SparseVector::from_bytes(&bytes)
        }
        Encoding::Text => fs::read_to_string(path)?.parse(),
    }
    .wrap_err_with(|| format!("failed to decode {}", path.display()))?;
    Ok(vector)
}

/// Writes a random G1 vector in which each position is recorded with
/// probability `density`.
#[tracing::instrument(skip_all)]
pub fn generate(
    path: &Path,
    domain_size: usize,
    density: f64,
    seed: u64,
    encoding: Encoding,
) -> eyre::Result<Summary> {
    if !(0.0..=1.0).contains(&density) {
        eyre::bail!("density must lie in [0, 1], got {density}");
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let vector = SparseVector::<G1Projective>::random(domain_size, density, &mut rng);
    write_vector(path, &vector, encoding)?;
    tracing::info!("wrote {} entries to {}", vector.len(), path.display());
    Ok(summarize(&vector))
}

pub fn inspect(path: &Path, encoding: Encoding) -> eyre::Result<Summary> {
    Ok(summarize(&read_vector(path, encoding)?))
}

/// Folds the stored vector against `len` random weights starting at
/// `offset`. The residual is written to `residual_path` when given.
#[tracing::instrument(skip_all)]
pub fn accumulate(
    path: &Path,
    offset: usize,
    len: usize,
    seed: u64,
    encoding: Encoding,
    residual_path: Option<&Path>,
) -> eyre::Result<AccumulateReport> {
    let vector = read_vector(path, encoding)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let weights: Vec<Fr> = (0..len).map(|_| Fr::rand(&mut rng)).collect();

    let (accumulated, residual) = vector.accumulate_checked(&weights, offset)?;
    tracing::info!(
        "folded {} of {} entries, {} left over",
        vector.len() - residual.len(),
        vector.len(),
        residual.len()
    );

    if let Some(residual_path) = residual_path {
        write_vector(residual_path, &residual, encoding)?;
    }
    Ok(AccumulateReport {
        accumulated,
        residual,
    })
}

fn summarize(vector: &SparseVector<G1Projective>) -> Summary {
    Summary {
        domain_size: vector.domain_size(),
        len: vector.len(),
        size_in_bits: vector.size_in_bits(),
        valid: vector.is_valid(),
    }
}
