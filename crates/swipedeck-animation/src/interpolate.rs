/// Piecewise linear mapping of `value` from `input_range` onto
/// `output_range`.
///
/// Values outside the input range saturate at the first or last output.
/// Both ranges must have the same length (at least two points) and the input
/// range must be non-decreasing. In release builds extra points on the
/// longer range are ignored, and a single point maps every value to its
/// output.
pub fn interpolate(value: f32, input_range: &[f32], output_range: &[f32]) -> f32 {
    debug_assert!(
        input_range.len() >= 2 && input_range.len() == output_range.len(),
        "interpolate needs matching ranges of at least two points"
    );
    debug_assert!(
        input_range.windows(2).all(|pair| pair[0] <= pair[1]),
        "input range must be non-decreasing"
    );

    let len = input_range.len().min(output_range.len());
    let (input_range, output_range) = (&input_range[..len], &output_range[..len]);
    match len {
        0 => return value,
        1 => return output_range[0],
        _ => {}
    }
    let last = len - 1;
    if value.is_nan() {
        return value;
    }
    if value <= input_range[0] {
        return output_range[0];
    }
    if value >= input_range[last] {
        return output_range[last];
    }

    let segment = input_range
        .windows(2)
        .position(|pair| value <= pair[1])
        .unwrap_or(last - 1);
    let (in_start, in_end) = (input_range[segment], input_range[segment + 1]);
    let (out_start, out_end) = (output_range[segment], output_range[segment + 1]);
    let span = in_end - in_start;
    if span <= f32::EPSILON {
        return out_end;
    }
    let fraction = (value - in_start) / span;
    out_start + (out_end - out_start) * fraction
}
