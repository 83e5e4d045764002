/// Lowest and highest amplitude seen in one pixel column.
pub type ColumnPeak = (i16, i16);

/// Build the min/max envelope for `columns` pixel columns starting at `page_start`.
///
/// Column `x` covers samples `[page_start + x * spp, page_start + (x + 1) * spp)`; a column whose
/// span is empty still reads the sample at its start. Extremes start from zero so every column
/// straddles the center line. Columns past the end of the buffer stay flat.
pub fn column_envelope(
    samples: &[i16],
    page_start: usize,
    samples_per_pixel: usize,
    columns: usize,
) -> Vec<ColumnPeak> {
    let mut peaks = vec![(0, 0); columns];
    let total = samples.len();
    for (x, peak) in peaks.iter_mut().enumerate() {
        let start = x
            .saturating_mul(samples_per_pixel)
            .saturating_add(page_start);
        if start >= total {
            break;
        }
        let mut end = (x + 1)
            .saturating_mul(samples_per_pixel)
            .saturating_add(page_start);
        if end == start {
            end += 1;
        }
        let (min, max) = samples[start..end.min(total)]
            .iter()
            .fold((0i16, 0i16), |(min, max), &s| (min.min(s), max.max(s)));
        *peak = (min, max);
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_cover_consecutive_spans() {
        let samples = [5, -3, 2, 8, -9, 1];
        let peaks = column_envelope(&samples, 0, 2, 3);
        assert_eq!(peaks, vec![(-3, 5), (0, 8), (-9, 1)]);
    }

    #[test]
    fn envelope_starts_at_page_offset() {
        let samples = [100, 100, -4, 6, 7, -8];
        let peaks = column_envelope(&samples, 2, 2, 2);
        assert_eq!(peaks, vec![(-4, 6), (-8, 7)]);
    }

    #[test]
    fn zero_width_columns_read_one_sample() {
        let samples = [3, -2];
        let peaks = column_envelope(&samples, 1, 0, 2);
        assert_eq!(peaks, vec![(-2, 0), (-2, 0)]);
    }

    #[test]
    fn columns_past_the_end_stay_flat() {
        let samples = [4, 4, 4];
        let peaks = column_envelope(&samples, 0, 2, 4);
        assert_eq!(peaks, vec![(0, 4), (0, 4), (0, 0), (0, 0)]);
    }

    #[test]
    fn empty_buffer_yields_flat_columns() {
        assert_eq!(column_envelope(&[], 0, 4, 3), vec![(0, 0); 3]);
    }
}
