//! Crossover operators for strategy genomes
//!
//! Adjacent selected individuals are paired and recombined gene by gene.

use rand::Rng;

use crate::population::Individual;

/// Uniform crossover: swap each position between two genomes with
/// probability `swap_rate`.
///
/// Works on genomes of any length; positions past the shorter genome are
/// left alone. Returns the number of positions swapped.
pub fn uniform_crossover<R: Rng + ?Sized>(
    a: &mut [usize],
    b: &mut [usize],
    swap_rate: f64,
    rng: &mut R,
) -> usize {
    let mut swapped = 0;
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        if rng.gen_bool(swap_rate) {
            std::mem::swap(x, y);
            swapped += 1;
        }
    }
    swapped
}

/// Recombine pairs (0,1), (2,3), ... with probability `crossover_rate`.
///
/// Both members of a recombined pair lose their fitness, whether or not any
/// gene actually moved. A trailing unpaired individual is untouched.
/// Returns the number of pairs recombined.
pub fn crossover_pairs<R: Rng + ?Sized>(
    population: &mut [Individual],
    crossover_rate: f64,
    gene_swap_rate: f64,
    rng: &mut R,
) -> usize {
    let mut recombined = 0;
    for pair in population.chunks_exact_mut(2) {
        if !rng.gen_bool(crossover_rate) {
            continue;
        }

        let (left, right) = pair.split_at_mut(1);
        let (a, b) = (&mut left[0], &mut right[0]);
        uniform_crossover(
            std::slice::from_mut(&mut a.gene),
            std::slice::from_mut(&mut b.gene),
            gene_swap_rate,
            rng,
        );
        a.invalidate();
        b.invalidate();
        recombined += 1;
    }
    recombined
}
