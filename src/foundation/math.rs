/// `n` evenly spaced values over `[a, b]`, endpoints included.
pub(crate) fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![a],
        _ => {
            let step = (b - a) / ((n - 1) as f64);
            (0..n).map(|i| a + step * (i as f64)).collect()
        }
    }
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
