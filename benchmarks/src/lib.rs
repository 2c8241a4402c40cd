//! Synthetic fixtures for the benchmarks.

use geojson_vt::{SimplifiedLine, SimplifiedPoint, SourceFeature, SourceGeometry};

// https://tile.openstreetmap.org/8/40/88.png
pub const SALISH_SEA: (u8, u32, u32) = (8, 40, 88);

/// A grid of jagged polygons covering the tile, each ring with `ring_len` points.
pub fn polygons(count: usize, ring_len: usize) -> Vec<SourceFeature> {
    let (z, x, y) = SALISH_SEA;
    let tile_size = 1.0 / f64::from(1u32 << z);
    let (min_x, min_y) = (f64::from(x) * tile_size, f64::from(y) * tile_size);
    let cell = tile_size / count as f64;

    let mut features = Vec::with_capacity(count * count);
    for row in 0..count {
        for column in 0..count {
            let center_x = min_x + (column as f64 + 0.5) * cell;
            let center_y = min_y + (row as f64 + 0.5) * cell;
            let points = (0..ring_len)
                .map(|i| {
                    let angle = i as f64 / ring_len as f64 * std::f64::consts::TAU;
                    let radius = cell * if i % 2 == 0 { 0.45 } else { 0.4 };
                    let importance = if i % 8 == 0 { 1.0 } else { (i % 8) as f64 * 1e-14 };
                    SimplifiedPoint::new(
                        center_x + radius * angle.cos(),
                        center_y + radius * angle.sin(),
                        importance,
                    )
                })
                .collect();
            features.push(SourceFeature::new(SourceGeometry::Polygon(vec![
                SimplifiedLine::new(points, cell * cell * 0.5),
            ])));
        }
    }
    features
}
