//! Shrinkage ("Bayesian average") scoring of restaurant ratings.

use crate::candidate::Candidate;

/// Weight of the prior, in reviews. A restaurant needs this many reviews
/// before its own rating counts as much as the mean.
pub const PRIOR_WEIGHT: f64 = 100.0;

/// Pull `rating` toward `global_mean` in proportion to how little evidence
/// backs it.
///
/// `score = v/(v+m) * rating + m/(v+m) * global_mean` with `v = review_count`
/// and `m = PRIOR_WEIGHT`. The result always lies between `rating` and
/// `global_mean`.
#[must_use]
pub fn bayesian_score(rating: f64, review_count: u32, global_mean: f64) -> f64 {
    let v = f64::from(review_count);
    let m = PRIOR_WEIGHT;
    (v / (v + m)) * rating + (m / (v + m)) * global_mean
}

/// Arithmetic mean of `rating` over every candidate, unrated ones included
/// as zero. Returns `0.0` for an empty slice.
#[must_use]
pub fn global_mean<'a, I>(candidates: I) -> f64
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let (sum, count) = candidates
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, count), c| (sum + c.rating, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_reviews_returns_mean() {
        assert!((bayesian_score(5.0, 0, 3.5) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn equal_weight_at_prior_review_count() {
        let score = bayesian_score(5.0, 100, 3.0);
        assert!((score - 4.0).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn many_reviews_approach_raw_rating() {
        let score = bayesian_score(4.5, 100_000, 3.0);
        assert!((score - 4.5).abs() < 0.01, "got {score}");
    }

    #[test]
    fn score_never_overshoots_bounds() {
        for rating in [0.0, 1.3, 2.5, 4.1, 5.0] {
            for mean in [0.0, 2.0, 3.7, 5.0] {
                for reviews in [0, 1, 5, 99, 100, 101, 5_000, u32::MAX] {
                    let score = bayesian_score(rating, reviews, mean);
                    let lo = rating.min(mean);
                    let hi = rating.max(mean);
                    assert!(
                        score >= lo - 1e-9 && score <= hi + 1e-9,
                        "score {score} outside [{lo}, {hi}] for r={rating} v={reviews} C={mean}"
                    );
                }
            }
        }
    }

    #[test]
    fn monotone_in_review_count_above_mean() {
        let mut previous = f64::MIN;
        for reviews in [0, 1, 10, 50, 100, 500, 10_000] {
            let score = bayesian_score(4.8, reviews, 4.0);
            assert!(score >= previous, "score dropped at {reviews} reviews");
            previous = score;
        }
    }

    #[test]
    fn monotone_in_review_count_below_mean() {
        let mut previous = f64::MAX;
        for reviews in [0, 1, 10, 50, 100, 500, 10_000] {
            let score = bayesian_score(3.1, reviews, 4.0);
            assert!(score <= previous, "score rose at {reviews} reviews");
            previous = score;
        }
    }

    #[test]
    fn well_reviewed_outranks_sparse_five_star() {
        let sparse = bayesian_score(4.8, 5, 4.4);
        let trusted = bayesian_score(4.5, 4_000, 4.4);
        assert!(trusted > sparse, "trusted {trusted} vs sparse {sparse}");
    }

    #[test]
    fn global_mean_of_empty_is_zero() {
        assert_eq!(global_mean(&Vec::<Candidate>::new()), 0.0);
    }
}
