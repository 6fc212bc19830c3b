use std::path::Path;

/// Row centres per crop as `(crop, N, P, K, ph)`.
pub const CROP_CENTRES: [(&str, f32, f32, f32, f32); 4] = [
    ("rice", 80.0, 45.0, 40.0, 6.4),
    ("chickpea", 40.0, 68.0, 80.0, 7.3),
    ("coffee", 101.0, 28.0, 30.0, 5.8),
    ("maize", 77.0, 48.0, 20.0, 6.2),
];

/// Write a small, well-separated soil table with `rows_per_crop` rows per crop.
pub fn write_soil_csv(path: &Path, rows_per_crop: usize) {
    let mut csv = String::from("N,P,K,ph,crop\n");
    for i in 0..rows_per_crop {
        let jitter = (i % 5) as f32 - 2.0;
        for (crop, n, p, k, ph) in CROP_CENTRES {
            csv.push_str(&format!(
                "{},{},{},{:.2},{crop}\n",
                n + jitter,
                p - jitter,
                k + jitter * 0.5,
                ph + jitter * 0.05
            ));
        }
    }
    std::fs::write(path, csv).expect("write soil csv");
}
