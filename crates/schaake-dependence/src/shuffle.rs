use rand::Rng;
use schaake_frame::{WideRow, WideTable};
use schaake_stats::{matrix::Matrix, rank::rank_shuffle};

/// Reorders the values of one group so their ranks follow `templates`.
///
/// `rows` are the positions of the group's rows in `wide`; template row `i`
/// belongs to `rows[i]`. Each horizon column is shuffled independently, and
/// metadata cells stay with their row.
///
/// # Panics
///
/// Panics if `templates` is not `rows.len() × wide.horizons().len()`.
pub fn shuffle_group<R>(wide: &WideTable, rows: &[usize], templates: &Matrix, rng: &mut R) -> Vec<WideRow>
where
    R: Rng + ?Sized,
{
    let shuffled = rank_shuffle(&wide.values(rows), templates, rng);
    rows.iter()
        .zip(shuffled.rows())
        .map(|(&r, values)| WideRow {
            meta: wide.rows()[r].meta.clone(),
            values: values.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::fixtures::{SHUFFLED, templates, wide_model_out};

    #[test]
    fn test_fig2_group() {
        let wide = wide_model_out();
        let rows = (0..10).collect::<Vec<_>>();
        let shuffled = shuffle_group(&wide, &rows, &templates(), &mut Pcg32::seed_from_u64(0));
        for (j, expected) in SHUFFLED.iter().enumerate() {
            let actual = shuffled.iter().map(|r| r.values[j]).collect::<Vec<_>>();
            assert_eq!(actual, expected);
        }
        for (row, &r) in shuffled.iter().zip(&rows) {
            assert_eq!(row.meta, wide.rows()[r].meta);
        }
    }

    #[test]
    fn test_later_group_keeps_its_metadata() {
        let wide = wide_model_out();
        let rows = (30..40).collect::<Vec<_>>();
        let shuffled = shuffle_group(&wide, &rows, &templates(), &mut Pcg32::seed_from_u64(0));
        // b/old at 2020-01-15 is the Fig. 2 ensemble shifted by -2
        let expected = SHUFFLED[0].map(|v| v - 2.0);
        assert_eq!(shuffled.iter().map(|r| r.values[0]).collect::<Vec<_>>(), expected);
        assert!(shuffled.iter().zip(&rows).all(|(row, &r)| row.meta == wide.rows()[r].meta));
    }
}
